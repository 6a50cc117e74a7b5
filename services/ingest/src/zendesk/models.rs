use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One page of `/api/v2/help_center/incremental/articles`.
#[derive(Debug, Clone, Deserialize)]
pub struct ArticlePage {
    #[serde(default)]
    pub articles: Vec<ZendeskArticle>,
    /// Window end in unix seconds; the start time of the following page.
    pub end_time: i64,
    pub next_page: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZendeskArticle {
    pub id: i64,
    pub html_url: Option<String>,
    pub author_id: i64,
    pub section_id: i64,
    pub title: String,
    pub body: Option<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub label_names: Vec<String>,
    pub locale: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectionResponse {
    pub section: ZendeskSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZendeskSection {
    pub id: i64,
    pub name: String,
    pub category_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryResponse {
    pub category: ZendeskApiCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZendeskApiCategory {
    pub id: i64,
    pub name: Option<String>,
    pub html_url: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrandResponse {
    pub brand: ZendeskApiBrand,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZendeskApiBrand {
    pub id: i64,
    pub name: String,
    pub subdomain: String,
    #[serde(default)]
    pub has_help_center: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserResponse {
    pub user: ZendeskUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UsersResponse {
    #[serde(default)]
    pub users: Vec<ZendeskUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZendeskUser {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
}

/// One page of `/api/v2/incremental/tickets/cursor`.
#[derive(Debug, Clone, Deserialize)]
pub struct TicketPage {
    #[serde(default)]
    pub tickets: Vec<ZendeskTicket>,
    pub after_cursor: Option<String>,
    pub end_of_stream: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    New,
    Open,
    Pending,
    Hold,
    Solved,
    Closed,
    Deleted,
    #[serde(other)]
    Unknown,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Open => "open",
            Self::Pending => "pending",
            Self::Hold => "hold",
            Self::Solved => "solved",
            Self::Closed => "closed",
            Self::Deleted => "deleted",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZendeskTicket {
    pub id: i64,
    pub url: Option<String>,
    pub subject: Option<String>,
    pub status: TicketStatus,
    pub priority: Option<String>,
    #[serde(rename = "type")]
    pub ticket_type: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub requester_id: Option<i64>,
    pub brand_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentsResponse {
    #[serde(default)]
    pub comments: Vec<ZendeskComment>,
    pub next_page: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZendeskComment {
    pub id: i64,
    pub author_id: i64,
    #[serde(default)]
    pub body: String,
    #[serde(default = "default_public")]
    pub public: bool,
    pub created_at: DateTime<Utc>,
}

fn default_public() -> bool {
    true
}

/// Where a ticket page starts: a unix timestamp for the first page, then the
/// opaque `after_cursor` of the previous page. Never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketPageCursor {
    StartTime(i64),
    After(String),
}

impl TicketPageCursor {
    /// The single query parameter to send for this cursor.
    pub fn query_param(&self) -> (&'static str, String) {
        match self {
            Self::StartTime(ts) => ("start_time", ts.to_string()),
            Self::After(cursor) => ("cursor", cursor.clone()),
        }
    }
}
