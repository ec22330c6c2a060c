use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Postgres, Transaction};

use crate::db::DbPool;
use crate::error::Result;
use crate::models::WorkEventMessage;

const AGGREGATE_TYPE: &str = "truck_drive_state";
const EVENT_TYPE: &str = "work_event";
const DEFAULT_MAX_RETRIES: i32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OutboxEntry {
    pub id: i64,
    pub aggregate_type: String,
    pub aggregate_id: String,
    pub event_type: String,
    pub payload: serde_json::Value,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub retry_count: i32,
    pub max_retries: i32,
}

#[derive(Debug, Clone)]
pub struct OutboxRepository {
    pool: DbPool,
}

impl OutboxRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Enqueue a work event within an existing transaction, so the event and
    /// the record it was derived from commit atomically.
    pub async fn insert_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        aggregate_id: &str,
        event: &WorkEventMessage,
    ) -> Result<OutboxEntry> {
        let payload = serde_json::to_value(event)?;

        let entry = sqlx::query_as::<_, OutboxEntry>(
            r#"
            INSERT INTO outbox (
                aggregate_type,
                aggregate_id,
                event_type,
                payload,
                status,
                created_at,
                retry_count,
                max_retries
            ) VALUES ($1, $2, $3, $4, 'pending', NOW(), 0, $5)
            RETURNING *
            "#,
        )
        .bind(AGGREGATE_TYPE)
        .bind(aggregate_id)
        .bind(EVENT_TYPE)
        .bind(payload)
        .bind(DEFAULT_MAX_RETRIES)
        .fetch_one(&mut **tx)
        .await?;

        Ok(entry)
    }

    /// Pending entries with retries left, oldest first.
    pub async fn get_pending(&self, limit: i64) -> Result<Vec<OutboxEntry>> {
        let entries = sqlx::query_as::<_, OutboxEntry>(
            r#"
            SELECT * FROM outbox
            WHERE status = 'pending'
              AND retry_count < max_retries
            ORDER BY created_at ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn mark_published(&self, id: i64) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE outbox
            SET status = 'published', published_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn mark_failed(&self, id: i64, error_message: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE outbox
            SET status = 'failed', error_message = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(error_message)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn increment_retry(&self, id: i64, error_message: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE outbox
            SET retry_count = retry_count + 1, error_message = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(error_message)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
