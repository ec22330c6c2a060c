use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{Postgres, Row, Transaction};

use crate::db::DbPool;
use crate::error::Result;
use crate::models::{DriveStateKind, TruckDriveState};

const COLUMNS: &str = "id, truck_id, state, ts, driver_card_id, driver_id";

#[derive(Clone)]
pub struct DriveStateRepository {
    pool: DbPool,
}

fn from_row(row: &PgRow) -> TruckDriveState {
    let state: String = row.get("state");

    TruckDriveState {
        id: row.get("id"),
        truck_id: row.get("truck_id"),
        state: DriveStateKind::from(state.as_str()),
        ts: row.get("ts"),
        driver_card_id: row.get("driver_card_id"),
        driver_id: row.get("driver_id"),
    }
}

impl DriveStateRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_truck_and_ts(
        &self,
        truck_id: i64,
        ts: DateTime<Utc>,
    ) -> Result<Option<TruckDriveState>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM truck_drive_states WHERE truck_id = $1 AND ts = $2",
            COLUMNS
        ))
        .bind(truck_id)
        .bind(ts)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(from_row))
    }

    /// Most recent state at or before `ts` for this truck.
    pub async fn find_latest_at_or_before(
        &self,
        truck_id: i64,
        ts: DateTime<Utc>,
    ) -> Result<Option<TruckDriveState>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM truck_drive_states
             WHERE truck_id = $1 AND ts <= $2
             ORDER BY ts DESC LIMIT 1",
            COLUMNS
        ))
        .bind(truck_id)
        .bind(ts)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(from_row))
    }

    /// Insert within an existing transaction, so a derived outbox entry can
    /// be committed atomically with the state row.
    pub async fn insert_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        truck_id: i64,
        state: DriveStateKind,
        ts: DateTime<Utc>,
        driver_card_id: Option<&str>,
        driver_id: Option<&str>,
    ) -> Result<TruckDriveState> {
        let row = sqlx::query(&format!(
            "INSERT INTO truck_drive_states (truck_id, state, ts, driver_card_id, driver_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            COLUMNS
        ))
        .bind(truck_id)
        .bind(state.as_str())
        .bind(ts)
        .bind(driver_card_id)
        .bind(driver_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(from_row(&row))
    }
}
