use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tenant's Zendesk connection: where to sync from and where the documents land.
#[derive(Clone, Serialize, Deserialize)]
pub struct ConnectorRecord {
    pub id: i64,
    pub workspace_id: String,
    pub data_source_id: String,
    pub subdomain: String,
    #[serde(skip_serializing)]
    pub access_token: String,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for ConnectorRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectorRecord")
            .field("id", &self.id)
            .field("workspace_id", &self.workspace_id)
            .field("data_source_id", &self.data_source_id)
            .field("subdomain", &self.subdomain)
            .field("access_token", &"<redacted>")
            .finish()
    }
}
