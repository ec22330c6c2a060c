use chrono::{DateTime, Utc};

use crate::db::DbPool;
use crate::error::Result;
use crate::models::{TruckLocation, TruckSpeed};

/// Location and speed rows arrive in the same uplink payload but are
/// deduplicated and stored independently.
#[derive(Clone)]
pub struct LocationRepository {
    pool: DbPool,
}

impl LocationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_location_by_truck_and_ts(
        &self,
        truck_id: i64,
        ts: DateTime<Utc>,
    ) -> Result<Option<TruckLocation>> {
        let location = sqlx::query_as::<_, TruckLocation>(
            "SELECT id, truck_id, ts, latitude, longitude, heading
             FROM truck_locations WHERE truck_id = $1 AND ts = $2",
        )
        .bind(truck_id)
        .bind(ts)
        .fetch_optional(&self.pool)
        .await?;

        Ok(location)
    }

    pub async fn insert_location(
        &self,
        truck_id: i64,
        ts: DateTime<Utc>,
        latitude: f64,
        longitude: f64,
        heading: f64,
    ) -> Result<TruckLocation> {
        let location = sqlx::query_as::<_, TruckLocation>(
            "INSERT INTO truck_locations (truck_id, ts, latitude, longitude, heading)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, truck_id, ts, latitude, longitude, heading",
        )
        .bind(truck_id)
        .bind(ts)
        .bind(latitude)
        .bind(longitude)
        .bind(heading)
        .fetch_one(&self.pool)
        .await?;

        Ok(location)
    }

    pub async fn find_speed_by_truck_and_ts(
        &self,
        truck_id: i64,
        ts: DateTime<Utc>,
    ) -> Result<Option<TruckSpeed>> {
        let speed = sqlx::query_as::<_, TruckSpeed>(
            "SELECT id, truck_id, ts, speed FROM truck_speeds WHERE truck_id = $1 AND ts = $2",
        )
        .bind(truck_id)
        .bind(ts)
        .fetch_optional(&self.pool)
        .await?;

        Ok(speed)
    }

    pub async fn insert_speed(
        &self,
        truck_id: i64,
        ts: DateTime<Utc>,
        speed: f64,
    ) -> Result<TruckSpeed> {
        let speed = sqlx::query_as::<_, TruckSpeed>(
            "INSERT INTO truck_speeds (truck_id, ts, speed)
             VALUES ($1, $2, $3)
             RETURNING id, truck_id, ts, speed",
        )
        .bind(truck_id)
        .bind(ts)
        .bind(speed)
        .fetch_one(&self.pool)
        .await?;

        Ok(speed)
    }
}
