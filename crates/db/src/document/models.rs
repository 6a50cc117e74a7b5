use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Article,
    Ticket,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Ticket => "ticket",
        }
    }
}

/// A rendered article or ticket as written to the downstream store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub connector_id: i64,
    pub document_id: String,
    pub kind: DocumentKind,
    pub title: String,
    pub source_url: Option<String>,
    pub content: String,
    pub tags: Vec<String>,
    /// Upstream `updated_at`; an upsert only rewrites when this moves forward.
    pub source_updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Upserted,
    /// The stored copy is at least as recent; nothing was written.
    Unchanged,
}

/// `zendesk-article-{connector}-{article}`
pub fn article_document_id(connector_id: i64, article_id: i64) -> String {
    format!("zendesk-article-{connector_id}-{article_id}")
}

/// `zendesk-ticket-{connector}-{ticket}`
pub fn ticket_document_id(connector_id: i64, ticket_id: i64) -> String {
    format!("zendesk-ticket-{connector_id}-{ticket_id}")
}
