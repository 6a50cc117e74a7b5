use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use zensync_common::error::{ZensyncError, ZensyncResult};

use super::models::{
    ArticlePage, BrandResponse, CategoryResponse, CommentsResponse, SectionResponse,
    TicketPage, TicketPageCursor, UserResponse, UsersResponse, ZendeskApiBrand,
    ZendeskApiCategory, ZendeskComment, ZendeskSection, ZendeskUser,
};

/// `show_many` accepts at most this many ids per call.
const SHOW_MANY_LIMIT: usize = 100;

#[derive(Debug, Clone)]
pub struct ZendeskClientConfig {
    /// Host suffix appended to a subdomain, e.g. `zendesk.com`.
    pub domain: String,
    pub max_retries: u32,
    pub timeout_secs: u64,
    /// Send every request here instead of `https://{subdomain}.{domain}`.
    pub base_url_override: Option<String>,
}

impl ZendeskClientConfig {
    /// Read `ZENDESK_*` settings. Unparseable numbers fail instead of
    /// falling back to defaults.
    pub fn from_env() -> ZensyncResult<Self> {
        let domain = std::env::var("ZENDESK_DOMAIN").unwrap_or_else(|_| "zendesk.com".to_string());
        let max_retries = parse_env_or("ZENDESK_MAX_RETRIES", 3)?;
        let timeout_secs = parse_env_or("ZENDESK_TIMEOUT_SECS", 30)?;
        let base_url_override = std::env::var("ZENDESK_BASE_URL").ok();

        Ok(Self {
            domain,
            max_retries,
            timeout_secs,
            base_url_override,
        })
    }
}

fn parse_env_or<T>(key: &str, default: T) -> ZensyncResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ZensyncError::Config(format!("invalid {key}: {e}"))),
        Err(_) => Ok(default),
    }
}

/// HTTP client bound to one Zendesk subdomain.
///
/// Switching brands produces a new client via [`ZendeskClient::for_subdomain`];
/// nothing is mutated, so concurrent batches cannot see each other's subdomain.
#[derive(Clone)]
pub struct ZendeskClient {
    client: Client,
    config: ZendeskClientConfig,
    subdomain: String,
    access_token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ZendeskClientError {
    #[error("HTTP {status}: {body}")]
    HttpError { status: StatusCode, body: String },

    #[error("request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl ZendeskClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::HttpError { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

impl ZendeskClient {
    pub fn new(
        config: ZendeskClientConfig,
        subdomain: &str,
        access_token: &str,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            config,
            subdomain: subdomain.to_string(),
            access_token: access_token.to_string(),
        })
    }

    /// A client for another brand of the same account, sharing the connection pool.
    pub fn for_subdomain(&self, subdomain: &str) -> Self {
        Self {
            client: self.client.clone(),
            config: self.config.clone(),
            subdomain: subdomain.to_string(),
            access_token: self.access_token.clone(),
        }
    }

    /// For testing: create a client pointing at a specific base URL (e.g., wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.config.base_url_override = Some(base_url.to_string());
        self
    }

    fn base_url(&self) -> String {
        match &self.config.base_url_override {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.{}", self.subdomain, self.config.domain),
        }
    }

    pub async fn fetch_brand(&self, brand_id: i64) -> Result<ZendeskApiBrand, ZendeskClientError> {
        let url = format!("{}/api/v2/brands/{brand_id}.json", self.base_url());
        let response: BrandResponse = self.get_with_retry(&url).await?;
        Ok(response.brand)
    }

    /// One page of articles changed since `start_time` (unix seconds).
    pub async fn fetch_recently_updated_articles(
        &self,
        start_time: i64,
    ) -> Result<ArticlePage, ZendeskClientError> {
        let url = format!(
            "{}/api/v2/help_center/incremental/articles.json?start_time={start_time}",
            self.base_url()
        );
        self.get_with_retry(&url).await
    }

    /// One page of tickets changed since a timestamp or after a cursor.
    pub async fn fetch_recently_updated_tickets(
        &self,
        cursor: &TicketPageCursor,
    ) -> Result<TicketPage, ZendeskClientError> {
        let (param, value) = cursor.query_param();
        let url = reqwest::Url::parse_with_params(
            &format!("{}/api/v2/incremental/tickets/cursor.json", self.base_url()),
            &[(param, value)],
        )
        .map_err(|e| ZendeskClientError::InvalidUrl(e.to_string()))?;
        self.get_with_retry(url.as_str()).await
    }

    pub async fn fetch_section(&self, section_id: i64) -> Result<ZendeskSection, ZendeskClientError> {
        let url = format!(
            "{}/api/v2/help_center/sections/{section_id}.json",
            self.base_url()
        );
        let response: SectionResponse = self.get_with_retry(&url).await?;
        Ok(response.section)
    }

    /// `None` when the category no longer exists upstream.
    pub async fn fetch_category(
        &self,
        category_id: i64,
    ) -> Result<Option<ZendeskApiCategory>, ZendeskClientError> {
        let url = format!(
            "{}/api/v2/help_center/categories/{category_id}.json",
            self.base_url()
        );
        let response: Option<CategoryResponse> = self.get_optional(&url).await?;
        Ok(response.map(|r| r.category))
    }

    /// `None` when the user was deleted.
    pub async fn fetch_user(&self, user_id: i64) -> Result<Option<ZendeskUser>, ZendeskClientError> {
        let url = format!("{}/api/v2/users/{user_id}.json", self.base_url());
        let response: Option<UserResponse> = self.get_optional(&url).await?;
        Ok(response.map(|r| r.user))
    }

    /// Look up several users at once. Ids are de-duplicated; an empty list makes no call.
    pub async fn fetch_users(&self, user_ids: &[i64]) -> Result<Vec<ZendeskUser>, ZendeskClientError> {
        let mut ids = user_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let mut users = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(SHOW_MANY_LIMIT) {
            let joined: Vec<String> = chunk.iter().map(|id| id.to_string()).collect();
            let url = format!(
                "{}/api/v2/users/show_many.json?ids={}",
                self.base_url(),
                joined.join(",")
            );
            let response: UsersResponse = self.get_with_retry(&url).await?;
            users.extend(response.users);
        }
        Ok(users)
    }

    /// Every comment of a ticket, following `next_page` links.
    pub async fn fetch_ticket_comments(
        &self,
        ticket_id: i64,
    ) -> Result<Vec<ZendeskComment>, ZendeskClientError> {
        let mut url = format!("{}/api/v2/tickets/{ticket_id}/comments.json", self.base_url());
        let mut comments = Vec::new();

        loop {
            let page: CommentsResponse = self.get_with_retry(&url).await?;
            comments.extend(page.comments);
            match page.next_page {
                Some(next) if next != url => url = next,
                _ => break,
            }
        }

        Ok(comments)
    }

    async fn get_optional<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<Option<T>, ZendeskClientError> {
        match self.get_with_retry(url).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn get_with_retry<T: DeserializeOwned>(&self, url: &str) -> Result<T, ZendeskClientError> {
        let mut last_error = String::new();

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let backoff_secs = std::cmp::min(1u64 << attempt, 30);
                tracing::warn!(attempt, backoff_secs, url, "retrying after backoff");
                tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
            }

            let response = match self
                .client
                .get(url)
                .bearer_auth(&self.access_token)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(e) => {
                    last_error = e.to_string();
                    if e.is_timeout() || e.is_connect() {
                        continue;
                    }
                    return Err(ZendeskClientError::RequestError(e));
                }
            };

            let status = response.status();

            if status.is_success() {
                return response
                    .json::<T>()
                    .await
                    .map_err(ZendeskClientError::RequestError);
            }

            // Honor Retry-After header for 429
            if status == StatusCode::TOO_MANY_REQUESTS {
                if let Some(retry_after) = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                {
                    let wait = std::cmp::min(retry_after, 60);
                    tracing::warn!(wait, "rate-limited, waiting Retry-After");
                    tokio::time::sleep(Duration::from_secs(wait)).await;
                }
                last_error = "429 Too Many Requests".to_string();
                continue;
            }

            if status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                last_error = format!("{status}: {body}");
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            return Err(ZendeskClientError::HttpError { status, body });
        }

        Err(ZendeskClientError::MaxRetriesExceeded {
            attempts: self.config.max_retries + 1,
            last_error,
        })
    }
}
