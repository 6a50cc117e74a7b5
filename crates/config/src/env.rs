use serde::Deserialize;
use std::env;
use zensync_common::error::{ZensyncError, ZensyncResult};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub log_level: String,
    /// Maximum number of articles/tickets applied concurrently within one page.
    pub item_concurrency: usize,
    /// Attempts per batch activity before the run is abandoned.
    pub activity_max_attempts: u32,
    /// Restrict the run to these connectors. Empty means every Zendesk connector.
    pub connector_ids: Vec<i64>,
    /// Rewrite every fetched document even when the stored copy is current.
    pub force_resync: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    /// Loads `.env` file if present, then reads required vars.
    pub fn from_env() -> ZensyncResult<Self> {
        // Best-effort .env load; ignore if missing
        let _ = dotenvy::dotenv();

        let item_concurrency: usize = get_var_or("ZENDESK_ITEM_CONCURRENCY", "10")
            .parse()
            .map_err(|e| ZensyncError::Config(format!("invalid ZENDESK_ITEM_CONCURRENCY: {e}")))?;
        if item_concurrency == 0 {
            return Err(ZensyncError::Config(
                "ZENDESK_ITEM_CONCURRENCY must be at least 1".to_owned(),
            ));
        }

        let activity_max_attempts: u32 = get_var_or("ZENDESK_ACTIVITY_MAX_ATTEMPTS", "3")
            .parse()
            .map_err(|e| {
                ZensyncError::Config(format!("invalid ZENDESK_ACTIVITY_MAX_ATTEMPTS: {e}"))
            })?;

        Ok(Self {
            database_url: get_var("DATABASE_URL")?,
            log_level: get_var_or("LOG_LEVEL", "info"),
            item_concurrency,
            activity_max_attempts: activity_max_attempts.max(1),
            connector_ids: parse_connector_ids(&get_var_or("ZENDESK_CONNECTOR_IDS", ""))?,
            force_resync: parse_flag(
                "ZENDESK_FORCE_RESYNC",
                &get_var_or("ZENDESK_FORCE_RESYNC", "false"),
            )?,
        })
    }
}

/// Parse a comma-separated list of connector ids. Blank entries are ignored.
pub fn parse_connector_ids(raw: &str) -> ZensyncResult<Vec<i64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| ZensyncError::Config(format!("invalid connector id: {s:?}")))
        })
        .collect()
}

fn parse_flag(key: &str, raw: &str) -> ZensyncResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        other => Err(ZensyncError::Config(format!("invalid {key}: {other:?}"))),
    }
}

fn get_var(key: &str) -> ZensyncResult<String> {
    env::var(key).map_err(|_| ZensyncError::Config(format!("{key} is required but not set")))
}

fn get_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}
