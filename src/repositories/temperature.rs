use chrono::{DateTime, Utc};

use crate::db::DbPool;
use crate::error::Result;
use crate::models::TemperatureReading;

#[derive(Clone)]
pub struct TemperatureRepository {
    pool: DbPool,
}

impl TemperatureRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_thermometer_and_ts(
        &self,
        thermometer_id: i64,
        ts: DateTime<Utc>,
    ) -> Result<Option<TemperatureReading>> {
        let reading = sqlx::query_as::<_, TemperatureReading>(
            "SELECT id, thermometer_id, value, ts FROM temperature_readings
             WHERE thermometer_id = $1 AND ts = $2",
        )
        .bind(thermometer_id)
        .bind(ts)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reading)
    }

    pub async fn insert(
        &self,
        thermometer_id: i64,
        value: f64,
        ts: DateTime<Utc>,
    ) -> Result<TemperatureReading> {
        let reading = sqlx::query_as::<_, TemperatureReading>(
            "INSERT INTO temperature_readings (thermometer_id, value, ts)
             VALUES ($1, $2, $3)
             RETURNING id, thermometer_id, value, ts",
        )
        .bind(thermometer_id)
        .bind(value)
        .bind(ts)
        .fetch_one(&self.pool)
        .await?;

        Ok(reading)
    }
}
