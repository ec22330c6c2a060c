use crate::db::DbPool;
use crate::error::Result;
use crate::models::{Towable, Truck};

/// Read side of the vehicle identity store. Truck/Towable rows are owned by
/// the back-office CRUD layer; the ingestion core only looks them up.
#[derive(Clone)]
pub struct TrackablesRepository {
    pool: DbPool,
}

impl TrackablesRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_truck_by_imei(&self, imei: &str) -> Result<Option<Truck>> {
        let truck = sqlx::query_as::<_, Truck>(
            "SELECT id, imei, plate_number, vin FROM trucks WHERE imei = $1",
        )
        .bind(imei)
        .fetch_optional(&self.pool)
        .await?;

        Ok(truck)
    }

    pub async fn find_towable_by_imei(&self, imei: &str) -> Result<Option<Towable>> {
        let towable = sqlx::query_as::<_, Towable>(
            "SELECT id, imei, plate_number, vin FROM towables WHERE imei = $1",
        )
        .bind(imei)
        .fetch_optional(&self.pool)
        .await?;

        Ok(towable)
    }

    pub async fn find_truck(&self, id: i64) -> Result<Option<Truck>> {
        let truck = sqlx::query_as::<_, Truck>(
            "SELECT id, imei, plate_number, vin FROM trucks WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(truck)
    }

    pub async fn find_towable(&self, id: i64) -> Result<Option<Towable>> {
        let towable = sqlx::query_as::<_, Towable>(
            "SELECT id, imei, plate_number, vin FROM towables WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(towable)
    }
}
