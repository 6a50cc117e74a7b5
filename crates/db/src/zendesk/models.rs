use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a brand, category or ticket stream was selected for ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourcePermission {
    Read,
    None,
}

impl ResourcePermission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::None => "none",
        }
    }

    /// Unknown values are treated as not selected.
    pub fn from_db(value: &str) -> Self {
        match value {
            "read" => Self::Read,
            _ => Self::None,
        }
    }

    pub fn is_read(&self) -> bool {
        matches!(self, Self::Read)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZendeskBrand {
    pub connector_id: i64,
    pub brand_id: i64,
    pub name: String,
    pub help_center_permission: ResourcePermission,
    pub tickets_permission: ResourcePermission,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZendeskCategory {
    pub connector_id: i64,
    pub brand_id: i64,
    pub category_id: i64,
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    pub permission: ResourcePermission,
    pub created_at: DateTime<Utc>,
}
