use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::db::DbPool;
use crate::error::Result;
use crate::locks::KeyedMutex;
use crate::models::{
    DriveStateKind, TemperatureReading, Thermometer, Truck, TruckDriveState, TruckLocation,
    TruckOdometerReading, TruckSpeed, WorkEventMessage, WorkEventType,
};
use crate::repositories::{
    DriveStateRepository, LocationRepository, OdometerRepository, OutboxRepository,
    TemperatureRepository,
};
use crate::services::drivers::{Driver, DriverDirectory};

/// Result of pushing one reading through a pipeline. Field devices resend
/// the last known sample on every uplink cycle, so `Duplicate` and
/// `Suppressed` are ordinary outcomes, not failures.
#[derive(Debug)]
pub enum IngestOutcome<T> {
    /// A new record was persisted.
    Created(T),
    /// The exact (subject, timestamp) record already exists; nothing written.
    Duplicate(T),
    /// The reading carries no new information; nothing written.
    Suppressed,
}

impl<T> IngestOutcome<T> {
    pub fn is_created(&self) -> bool {
        matches!(self, IngestOutcome::Created(_))
    }
}

#[derive(Debug, Clone)]
pub struct DriveStatePayload {
    pub state: DriveStateKind,
    pub ts: DateTime<Utc>,
    pub driver_card_id: Option<String>,
}

pub struct TelemetryIngestService {
    pool: DbPool,
    temperature: TemperatureRepository,
    drive_states: DriveStateRepository,
    odometers: OdometerRepository,
    locations: LocationRepository,
    drivers: Arc<dyn DriverDirectory>,
    locks: KeyedMutex,
}

impl TelemetryIngestService {
    pub fn new(pool: DbPool, drivers: Arc<dyn DriverDirectory>, locks: KeyedMutex) -> Self {
        Self {
            temperature: TemperatureRepository::new(pool.clone()),
            drive_states: DriveStateRepository::new(pool.clone()),
            odometers: OdometerRepository::new(pool.clone()),
            locations: LocationRepository::new(pool.clone()),
            pool,
            drivers,
            locks,
        }
    }

    pub async fn ingest_temperature(
        &self,
        thermometer: &Thermometer,
        value: f64,
        ts: DateTime<Utc>,
    ) -> Result<IngestOutcome<TemperatureReading>> {
        let _guard = self
            .locks
            .lock(&format!("thermometer:{}", thermometer.id))
            .await;

        if let Some(existing) = self
            .temperature
            .find_by_thermometer_and_ts(thermometer.id, ts)
            .await?
        {
            debug!(
                thermometer_id = thermometer.id,
                ts = %ts,
                "temperature reading already recorded"
            );
            return Ok(IngestOutcome::Duplicate(existing));
        }

        let created = self.temperature.insert(thermometer.id, value, ts).await?;
        Ok(IngestOutcome::Created(created))
    }

    pub async fn ingest_drive_state(
        &self,
        truck: &Truck,
        payload: DriveStatePayload,
    ) -> Result<IngestOutcome<TruckDriveState>> {
        let _guard = self.locks.lock(&format!("truck:{}", truck.id)).await;

        if let Some(existing) = self
            .drive_states
            .find_by_truck_and_ts(truck.id, payload.ts)
            .await?
        {
            debug!(truck_id = truck.id, ts = %payload.ts, "drive state already recorded");
            return Ok(IngestOutcome::Duplicate(existing));
        }

        let driver = self
            .resolve_driver(payload.driver_card_id.as_deref())
            .await;
        let driver_id = driver.map(|driver| driver.id);

        if let Some(previous) = self
            .drive_states
            .find_latest_at_or_before(truck.id, payload.ts)
            .await?
        {
            if previous.ts < payload.ts
                && Self::drive_state_unchanged(&previous, &payload, driver_id.as_deref())
            {
                debug!(
                    truck_id = truck.id,
                    state = %payload.state,
                    "suppressing unchanged drive state"
                );
                return Ok(IngestOutcome::Suppressed);
            }
        }

        let mut tx = self.pool.begin().await?;
        let created = DriveStateRepository::insert_in_tx(
            &mut tx,
            truck.id,
            payload.state,
            payload.ts,
            payload.driver_card_id.as_deref(),
            driver_id.as_deref(),
        )
        .await?;

        match &created.driver_id {
            Some(driver_id) => {
                let event = WorkEventMessage {
                    driver_id: driver_id.clone(),
                    work_event_type: WorkEventType::from(created.state),
                    time: created.ts,
                };
                OutboxRepository::insert_in_tx(&mut tx, &created.id.to_string(), &event).await?;
            }
            None => {
                warn!(
                    truck_id = truck.id,
                    ts = %created.ts,
                    "no driver resolved for new drive state, skipping work event"
                );
            }
        }
        tx.commit().await?;

        Ok(IngestOutcome::Created(created))
    }

    pub async fn ingest_odometer(
        &self,
        truck: &Truck,
        odometer_reading: i64,
        ts: DateTime<Utc>,
    ) -> Result<IngestOutcome<TruckOdometerReading>> {
        let _guard = self.locks.lock(&format!("truck:{}", truck.id)).await;

        if let Some(existing) = self.odometers.find_by_truck_and_ts(truck.id, ts).await? {
            debug!(truck_id = truck.id, ts = %ts, "odometer reading already recorded");
            return Ok(IngestOutcome::Duplicate(existing));
        }

        if let Some(previous) = self.odometers.find_latest_at_or_before(truck.id, ts).await? {
            if previous.ts < ts && previous.odometer_reading == odometer_reading {
                debug!(
                    truck_id = truck.id,
                    odometer_reading, "suppressing non-advancing odometer reading"
                );
                return Ok(IngestOutcome::Suppressed);
            }
        }

        let created = self.odometers.insert(truck.id, odometer_reading, ts).await?;
        Ok(IngestOutcome::Created(created))
    }

    pub async fn ingest_location(
        &self,
        truck: &Truck,
        ts: DateTime<Utc>,
        latitude: f64,
        longitude: f64,
        heading: f64,
    ) -> Result<IngestOutcome<TruckLocation>> {
        let _guard = self.locks.lock(&format!("truck:{}", truck.id)).await;

        if let Some(existing) = self
            .locations
            .find_location_by_truck_and_ts(truck.id, ts)
            .await?
        {
            debug!(truck_id = truck.id, ts = %ts, "location already recorded");
            return Ok(IngestOutcome::Duplicate(existing));
        }

        let created = self
            .locations
            .insert_location(truck.id, ts, latitude, longitude, heading)
            .await?;
        Ok(IngestOutcome::Created(created))
    }

    pub async fn ingest_speed(
        &self,
        truck: &Truck,
        ts: DateTime<Utc>,
        speed: f64,
    ) -> Result<IngestOutcome<TruckSpeed>> {
        let _guard = self.locks.lock(&format!("truck:{}", truck.id)).await;

        if let Some(existing) = self
            .locations
            .find_speed_by_truck_and_ts(truck.id, ts)
            .await?
        {
            debug!(truck_id = truck.id, ts = %ts, "speed already recorded");
            return Ok(IngestOutcome::Duplicate(existing));
        }

        let created = self.locations.insert_speed(truck.id, ts, speed).await?;
        Ok(IngestOutcome::Created(created))
    }

    /// A reading must never be lost because the driver service is down, so
    /// any lookup failure resolves to "no driver".
    async fn resolve_driver(&self, driver_card_id: Option<&str>) -> Option<Driver> {
        let card_id = driver_card_id?;
        match self.drivers.find_by_card_id(card_id).await {
            Ok(driver) => driver,
            Err(e) => {
                warn!(
                    driver_card_id = card_id,
                    "driver lookup failed, treating as unresolved: {}", e
                );
                None
            }
        }
    }

    fn drive_state_unchanged(
        previous: &TruckDriveState,
        payload: &DriveStatePayload,
        resolved_driver_id: Option<&str>,
    ) -> bool {
        previous.state == payload.state
            && previous.driver_card_id.as_deref() == payload.driver_card_id.as_deref()
            && previous.driver_id.as_deref() == resolved_driver_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn previous_state() -> TruckDriveState {
        TruckDriveState {
            id: 1,
            truck_id: 7,
            state: DriveStateKind::Drive,
            ts: DateTime::from_timestamp(100, 0).unwrap(),
            driver_card_id: Some("card-1".to_string()),
            driver_id: Some("driver-1".to_string()),
        }
    }

    fn payload(state: DriveStateKind, driver_card_id: Option<&str>) -> DriveStatePayload {
        DriveStatePayload {
            state,
            ts: DateTime::from_timestamp(101, 0).unwrap(),
            driver_card_id: driver_card_id.map(str::to_string),
        }
    }

    #[test]
    fn test_unchanged_when_state_card_and_driver_match() {
        let previous = previous_state();
        let payload = payload(DriveStateKind::Drive, Some("card-1"));

        assert!(TelemetryIngestService::drive_state_unchanged(
            &previous,
            &payload,
            Some("driver-1")
        ));
    }

    #[test]
    fn test_changed_when_state_differs() {
        let previous = previous_state();
        let payload = payload(DriveStateKind::Rest, Some("card-1"));

        assert!(!TelemetryIngestService::drive_state_unchanged(
            &previous,
            &payload,
            Some("driver-1")
        ));
    }

    #[test]
    fn test_changed_when_card_differs() {
        let previous = previous_state();
        let payload = payload(DriveStateKind::Drive, Some("card-2"));

        assert!(!TelemetryIngestService::drive_state_unchanged(
            &previous,
            &payload,
            Some("driver-1")
        ));
    }

    #[test]
    fn test_changed_when_resolved_driver_differs() {
        let previous = previous_state();
        let payload = payload(DriveStateKind::Drive, Some("card-1"));

        assert!(!TelemetryIngestService::drive_state_unchanged(
            &previous,
            &payload,
            Some("driver-2")
        ));
        assert!(!TelemetryIngestService::drive_state_unchanged(
            &previous, &payload, None
        ));
    }

    #[test]
    fn test_unchanged_without_any_driver() {
        let mut previous = previous_state();
        previous.driver_card_id = None;
        previous.driver_id = None;
        let payload = payload(DriveStateKind::Drive, None);

        assert!(TelemetryIngestService::drive_state_unchanged(
            &previous, &payload, None
        ));
    }
}
