use crate::db::DbPool;
use crate::error::Result;
use crate::models::Thermometer;

const COLUMNS: &str =
    "id, hardware_sensor_id, truck_id, towable_id, name, archived_at, created_at, modified_at";

#[derive(Clone)]
pub struct ThermometerRepository {
    pool: DbPool,
}

impl ThermometerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_active_by_truck(&self, truck_id: i64) -> Result<Option<Thermometer>> {
        let thermometer = sqlx::query_as::<_, Thermometer>(&format!(
            "SELECT {} FROM thermometers WHERE truck_id = $1 AND archived_at IS NULL",
            COLUMNS
        ))
        .bind(truck_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(thermometer)
    }

    pub async fn find_active_by_towable(&self, towable_id: i64) -> Result<Option<Thermometer>> {
        let thermometer = sqlx::query_as::<_, Thermometer>(&format!(
            "SELECT {} FROM thermometers WHERE towable_id = $1 AND archived_at IS NULL",
            COLUMNS
        ))
        .bind(towable_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(thermometer)
    }

    pub async fn find_active_by_sensor(&self, hardware_sensor_id: &str) -> Result<Option<Thermometer>> {
        let thermometer = sqlx::query_as::<_, Thermometer>(&format!(
            "SELECT {} FROM thermometers WHERE hardware_sensor_id = $1 AND archived_at IS NULL",
            COLUMNS
        ))
        .bind(hardware_sensor_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(thermometer)
    }

    /// Close the record. Archived rows stay behind as mount history and are
    /// never reactivated.
    pub async fn archive(&self, id: i64) -> Result<()> {
        sqlx::query(
            "UPDATE thermometers SET archived_at = NOW(), modified_at = NOW()
             WHERE id = $1 AND archived_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn create(
        &self,
        hardware_sensor_id: &str,
        truck_id: Option<i64>,
        towable_id: Option<i64>,
    ) -> Result<Thermometer> {
        let thermometer = sqlx::query_as::<_, Thermometer>(&format!(
            "INSERT INTO thermometers (hardware_sensor_id, truck_id, towable_id, created_at, modified_at)
             VALUES ($1, $2, $3, NOW(), NOW())
             RETURNING {}",
            COLUMNS
        ))
        .bind(hardware_sensor_id)
        .bind(truck_id)
        .bind(towable_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(thermometer)
    }

    pub async fn find_all(&self, include_archived: bool) -> Result<Vec<Thermometer>> {
        let query = if include_archived {
            format!("SELECT {} FROM thermometers ORDER BY id", COLUMNS)
        } else {
            format!(
                "SELECT {} FROM thermometers WHERE archived_at IS NULL ORDER BY id",
                COLUMNS
            )
        };

        let thermometers = sqlx::query_as::<_, Thermometer>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(thermometers)
    }
}
