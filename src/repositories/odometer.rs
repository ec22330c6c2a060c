use chrono::{DateTime, Utc};

use crate::db::DbPool;
use crate::error::Result;
use crate::models::TruckOdometerReading;

const COLUMNS: &str = "id, truck_id, ts, odometer_reading";

#[derive(Clone)]
pub struct OdometerRepository {
    pool: DbPool,
}

impl OdometerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_truck_and_ts(
        &self,
        truck_id: i64,
        ts: DateTime<Utc>,
    ) -> Result<Option<TruckOdometerReading>> {
        let reading = sqlx::query_as::<_, TruckOdometerReading>(&format!(
            "SELECT {} FROM truck_odometer_readings WHERE truck_id = $1 AND ts = $2",
            COLUMNS
        ))
        .bind(truck_id)
        .bind(ts)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reading)
    }

    pub async fn find_latest_at_or_before(
        &self,
        truck_id: i64,
        ts: DateTime<Utc>,
    ) -> Result<Option<TruckOdometerReading>> {
        let reading = sqlx::query_as::<_, TruckOdometerReading>(&format!(
            "SELECT {} FROM truck_odometer_readings
             WHERE truck_id = $1 AND ts <= $2
             ORDER BY ts DESC LIMIT 1",
            COLUMNS
        ))
        .bind(truck_id)
        .bind(ts)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reading)
    }

    pub async fn insert(
        &self,
        truck_id: i64,
        odometer_reading: i64,
        ts: DateTime<Utc>,
    ) -> Result<TruckOdometerReading> {
        let reading = sqlx::query_as::<_, TruckOdometerReading>(&format!(
            "INSERT INTO truck_odometer_readings (truck_id, ts, odometer_reading)
             VALUES ($1, $2, $3)
             RETURNING {}",
            COLUMNS
        ))
        .bind(truck_id)
        .bind(ts)
        .bind(odometer_reading)
        .fetch_one(&self.pool)
        .await?;

        Ok(reading)
    }
}
