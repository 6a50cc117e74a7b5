use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::cursor::models::TimestampCursor;
use zensync_common::error::ZensyncResult;

#[async_trait]
pub trait TimestampCursorRepository: Send + Sync {
    /// Get the cursor row for a connector, inserting an empty one if absent.
    async fn get_or_create(&self, connector_id: i64) -> ZensyncResult<TimestampCursor>;

    /// Overwrite the stored cursor. Fails with `NotFound` if the row was never created.
    async fn set_cursor(
        &self,
        connector_id: i64,
        timestamp_cursor: DateTime<Utc>,
    ) -> ZensyncResult<TimestampCursor>;
}
