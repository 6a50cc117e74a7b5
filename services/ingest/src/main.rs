mod connector;
mod executor;
mod zendesk;

use std::sync::Arc;
use std::time::Duration;

use zensync_config::{init_tracing, AppConfig};
use zensync_db::connector::pg_repository::PgConnectorRepository;
use zensync_db::connector::repositories::ConnectorRepository;
use zensync_db::cursor::pg_repository::PgTimestampCursorRepository;
use zensync_db::document::pg_repository::PgDocumentRepository;
use zensync_db::zendesk::pg_repository::PgZendeskResourceRepository;

use crate::connector::Connector;
use crate::zendesk::activities::ZendeskActivities;
use crate::zendesk::client::ZendeskClientConfig;
use crate::zendesk::workflow::ZendeskIncrementalSyncer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = AppConfig::from_env()?;
    init_tracing(&config.log_level);

    tracing::info!(service = "zensync-ingest", "starting");

    let pool = zensync_db::create_pool(&config.database_url).await?;

    let connectors = Arc::new(PgConnectorRepository::new(pool.clone()));
    let activities = Arc::new(
        ZendeskActivities::new(
            connectors.clone(),
            Arc::new(PgTimestampCursorRepository::new(pool.clone())),
            Arc::new(PgZendeskResourceRepository::new(pool.clone())),
            Arc::new(PgDocumentRepository::new(pool.clone())),
            ZendeskClientConfig::from_env()?,
        )
        .with_item_concurrency(config.item_concurrency)
        .with_force_resync(config.force_resync),
    );

    let connector_ids = if config.connector_ids.is_empty() {
        connectors.list_ids().await?
    } else {
        config.connector_ids.clone()
    };

    if connector_ids.is_empty() {
        tracing::info!("no zendesk connectors configured, nothing to sync");
    }

    let mut failed = 0;
    for connector_id in connector_ids {
        let syncer = ZendeskIncrementalSyncer::new(connector_id, activities.clone())
            .with_retry_policy(config.activity_max_attempts, Duration::from_secs(1));
        tracing::info!(connector_id, source = syncer.source_name(), "starting connector sync");

        match syncer.sync().await {
            Ok(result) => {
                tracing::info!(
                    connector_id,
                    source = result.source,
                    upserted = result.upserted,
                    unchanged = result.unchanged,
                    deleted = result.deleted,
                    skipped = result.skipped,
                    errors = result.errors,
                    "zendesk sync completed"
                );
            }
            Err(e) => {
                failed += 1;
                tracing::error!(connector_id, error = %e, "zendesk sync failed");
            }
        }
    }

    tracing::info!(failed, "ingest service finished");
    Ok(())
}
