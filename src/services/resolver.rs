use tracing::info;

use crate::error::{AppError, Result};
use crate::locks::KeyedMutex;
use crate::models::{Thermometer, Towable, Truck};
use crate::repositories::{ThermometerRepository, TrackablesRepository};

enum Target<'a> {
    Truck(&'a Truck),
    Towable(&'a Towable),
}

/// Maps a physical sensor address to the logical thermometer mounted on a
/// vehicle, archiving stale mounts so that at most one active record exists
/// per sensor and per vehicle at any time.
pub struct ThermometerResolver {
    thermometers: ThermometerRepository,
    trackables: TrackablesRepository,
    locks: KeyedMutex,
}

impl ThermometerResolver {
    pub fn new(
        thermometers: ThermometerRepository,
        trackables: TrackablesRepository,
        locks: KeyedMutex,
    ) -> Self {
        Self {
            thermometers,
            trackables,
            locks,
        }
    }

    /// Exactly one of `target_truck`/`target_towable` must be given; the
    /// caller has already resolved the owning vehicle from
    /// `device_identifier`.
    pub async fn resolve(
        &self,
        hardware_sensor_id: &str,
        device_identifier: &str,
        target_truck: Option<&Truck>,
        target_towable: Option<&Towable>,
    ) -> Result<Thermometer> {
        let target = match (target_truck, target_towable) {
            (Some(truck), None) => Target::Truck(truck),
            (None, Some(towable)) => Target::Towable(towable),
            _ => {
                return Err(AppError::InvalidArgument(
                    "Exactly one of target truck or towable must be given".to_string(),
                ))
            }
        };

        let vehicle_key = match &target {
            Target::Truck(truck) => format!("truck:{}", truck.id),
            Target::Towable(towable) => format!("towable:{}", towable.id),
        };
        let sensor_key = format!("sensor:{}", hardware_sensor_id);
        let _guards = self.locks.lock_pair(&sensor_key, &vehicle_key).await;

        // The thermometer currently mounted on the target vehicle, if any.
        let current = match &target {
            Target::Truck(truck) => self.thermometers.find_active_by_truck(truck.id).await?,
            Target::Towable(towable) => {
                self.thermometers.find_active_by_towable(towable.id).await?
            }
        };

        if let Some(current) = current {
            if current.hardware_sensor_id == hardware_sensor_id {
                return Ok(current);
            }
            // The vehicle now carries a different physical sensor.
            self.thermometers.archive(current.id).await?;
            info!(
                thermometer_id = current.id,
                hardware_sensor_id = %current.hardware_sensor_id,
                "archived thermometer replaced on its vehicle"
            );
        }

        // The sensor may still be registered as active on another vehicle.
        if let Some(existing) = self
            .thermometers
            .find_active_by_sensor(hardware_sensor_id)
            .await?
        {
            let owner_imei = self.owner_imei(&existing).await?;
            if owner_imei.as_deref() == Some(device_identifier) {
                return Ok(existing);
            }
            self.thermometers.archive(existing.id).await?;
            info!(
                thermometer_id = existing.id,
                hardware_sensor_id,
                "archived thermometer after its sensor moved to another vehicle"
            );
        }

        let (truck_id, towable_id) = match &target {
            Target::Truck(truck) => (Some(truck.id), None),
            Target::Towable(towable) => (None, Some(towable.id)),
        };
        let created = self
            .thermometers
            .create(hardware_sensor_id, truck_id, towable_id)
            .await?;
        info!(
            thermometer_id = created.id,
            hardware_sensor_id, "created thermometer"
        );

        Ok(created)
    }

    async fn owner_imei(&self, thermometer: &Thermometer) -> Result<Option<String>> {
        if let Some(truck_id) = thermometer.truck_id {
            Ok(self
                .trackables
                .find_truck(truck_id)
                .await?
                .and_then(|truck| truck.imei))
        } else if let Some(towable_id) = thermometer.towable_id {
            Ok(self
                .trackables
                .find_towable(towable_id)
                .await?
                .and_then(|towable| towable.imei))
        } else {
            Ok(None)
        }
    }
}
