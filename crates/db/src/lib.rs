pub mod connector;
pub mod cursor;
pub mod document;
pub mod zendesk;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use zensync_common::error::{ZensyncError, ZensyncResult};

/// Create a Postgres connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> ZensyncResult<PgPool> {
    tracing::info!("connecting to database");
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(|e| ZensyncError::Database(e.to_string()))
}
