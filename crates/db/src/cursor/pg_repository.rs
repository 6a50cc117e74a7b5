use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::cursor::models::TimestampCursor;
use crate::cursor::repositories::TimestampCursorRepository;
use zensync_common::error::{ZensyncError, ZensyncResult};

#[derive(Clone)]
pub struct PgTimestampCursorRepository {
    pool: PgPool,
}

impl PgTimestampCursorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_row(row: sqlx::postgres::PgRow) -> TimestampCursor {
        TimestampCursor {
            id: row.get("id"),
            connector_id: row.get("connector_id"),
            timestamp_cursor: row.get("timestamp_cursor"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

#[async_trait]
impl TimestampCursorRepository for PgTimestampCursorRepository {
    async fn get_or_create(&self, connector_id: i64) -> ZensyncResult<TimestampCursor> {
        // The no-op update makes `returning` yield the existing row on conflict.
        let row = sqlx::query(
            "insert into zendesk_timestamp_cursors (connector_id, timestamp_cursor)
             values ($1, null)
             on conflict (connector_id) do update set connector_id = excluded.connector_id
             returning id, connector_id, timestamp_cursor, created_at, updated_at",
        )
        .bind(connector_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ZensyncError::Database(e.to_string()))?;

        Ok(Self::map_row(row))
    }

    async fn set_cursor(
        &self,
        connector_id: i64,
        timestamp_cursor: DateTime<Utc>,
    ) -> ZensyncResult<TimestampCursor> {
        let row = sqlx::query(
            "update zendesk_timestamp_cursors
             set timestamp_cursor = $1, updated_at = $2
             where connector_id = $3
             returning id, connector_id, timestamp_cursor, created_at, updated_at",
        )
        .bind(timestamp_cursor)
        .bind(Utc::now())
        .bind(connector_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ZensyncError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Self::map_row(r)),
            None => Err(ZensyncError::NotFound(format!(
                "timestamp cursor for connector {connector_id}"
            ))),
        }
    }
}
