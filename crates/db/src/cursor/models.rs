use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Start date of the last successful incremental sync for one connector.
///
/// `timestamp_cursor` stays `None` until a run completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimestampCursor {
    pub id: i64,
    pub connector_id: i64,
    pub timestamp_cursor: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
