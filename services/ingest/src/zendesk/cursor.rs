use chrono::{DateTime, Duration, Utc};

use zensync_common::error::ZensyncResult;

use super::activities::ZendeskActivities;

/// Zendesk rejects incremental exports whose start time is less than a minute old.
pub const MIN_CURSOR_LAG_SECS: i64 = 60;

/// Read-side clamp: never later than `now - 60s`, and `now - 60s` when nothing
/// has been committed yet.
pub fn clamp_cursor(stored: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
    let floor = now - Duration::seconds(MIN_CURSOR_LAG_SECS);
    match stored {
        Some(cursor) => cursor.min(floor),
        None => floor,
    }
}

impl ZendeskActivities {
    /// Start time for this run: the last successful sync's start date, clamped.
    /// Creates the cursor row on first use.
    pub async fn get_timestamp_cursor(&self, connector_id: i64) -> ZensyncResult<DateTime<Utc>> {
        let cursor = self.cursors.get_or_create(connector_id).await?;
        let start = clamp_cursor(cursor.timestamp_cursor, Utc::now());
        tracing::debug!(connector_id, start = %start, stored = ?cursor.timestamp_cursor, "read timestamp cursor");
        Ok(start)
    }

    /// Record `current_sync_date` as the new baseline. Fails with `NotFound`
    /// if `get_timestamp_cursor` was never called for this connector.
    pub async fn set_timestamp_cursor(
        &self,
        connector_id: i64,
        current_sync_date: DateTime<Utc>,
    ) -> ZensyncResult<()> {
        self.cursors
            .set_cursor(connector_id, current_sync_date)
            .await?;
        tracing::info!(connector_id, cursor = %current_sync_date, "committed timestamp cursor");
        Ok(())
    }
}
