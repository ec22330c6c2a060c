use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One mount of a physical temperature sensor on a vehicle.
///
/// `hardware_sensor_id` is the sensor's physical address and is not unique
/// across time: when a sensor is moved to another vehicle, or a vehicle gets
/// a different sensor, the old record is archived and a new one is created.
/// The rows for a given sensor therefore form a closed-interval history
/// (`created_at` .. `archived_at`); archived rows are never reused.
///
/// Exactly one of `truck_id`/`towable_id` is set on an active record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Thermometer {
    pub id: i64,
    pub hardware_sensor_id: String,
    pub truck_id: Option<i64>,
    pub towable_id: Option<i64>,
    pub name: Option<String>,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Thermometer {
    pub fn is_active(&self) -> bool {
        self.archived_at.is_none()
    }
}
