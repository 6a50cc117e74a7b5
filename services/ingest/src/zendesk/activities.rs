use std::sync::Arc;

use zensync_common::error::{ZensyncError, ZensyncResult};
use zensync_db::connector::models::ConnectorRecord;
use zensync_db::connector::repositories::ConnectorRepository;
use zensync_db::cursor::repositories::TimestampCursorRepository;
use zensync_db::document::repositories::DocumentRepository;
use zensync_db::zendesk::models::ZendeskBrand;
use zensync_db::zendesk::repositories::ZendeskResourceRepository;

use super::client::{ZendeskClient, ZendeskClientConfig, ZendeskClientError};

/// Items of one page applied concurrently unless configured otherwise.
pub const DEFAULT_ITEM_CONCURRENCY: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error(transparent)]
    Store(#[from] ZensyncError),

    #[error("zendesk request failed: {0}")]
    Client(#[from] ZendeskClientError),

    #[error("{failed} of {total} items failed, first error: {first_error}")]
    ItemsFailed {
        failed: usize,
        total: usize,
        first_error: String,
    },
}

/// Why an item was deliberately not written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoCategory,
    CategoryUnavailable,
    CategoryNotSelected,
    Draft,
    TicketNotFinal,
}

/// What applying a single article or ticket did downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemAction {
    Upserted,
    Unchanged,
    Deleted,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub upserted: usize,
    pub unchanged: usize,
    pub deleted: usize,
    pub skipped: usize,
}

impl BatchReport {
    /// Count per-item outcomes. Any failed item turns the page into `ItemsFailed`,
    /// so the caller retries it instead of moving past it.
    pub fn tally(outcomes: Vec<Result<ItemAction, BatchError>>) -> Result<Self, BatchError> {
        let total = outcomes.len();
        let mut report = Self::default();
        let mut failed = 0;
        let mut first_error = None;

        for outcome in outcomes {
            match outcome {
                Ok(ItemAction::Upserted) => report.upserted += 1,
                Ok(ItemAction::Unchanged) => report.unchanged += 1,
                Ok(ItemAction::Deleted) => report.deleted += 1,
                Ok(ItemAction::Skipped(_)) => report.skipped += 1,
                Err(e) => {
                    failed += 1;
                    if first_error.is_none() {
                        first_error = Some(e.to_string());
                    }
                }
            }
        }

        match first_error {
            Some(first_error) => Err(BatchError::ItemsFailed {
                failed,
                total,
                first_error,
            }),
            None => Ok(report),
        }
    }

    pub fn merge(&mut self, other: &Self) {
        self.upserted += other.upserted;
        self.unchanged += other.unchanged;
        self.deleted += other.deleted;
        self.skipped += other.skipped;
    }
}

/// The Zendesk sync operations a scheduler invokes: cursor reads/commits and
/// one-page article and ticket batches.
pub struct ZendeskActivities {
    pub(crate) connectors: Arc<dyn ConnectorRepository>,
    pub(crate) cursors: Arc<dyn TimestampCursorRepository>,
    pub(crate) resources: Arc<dyn ZendeskResourceRepository>,
    pub(crate) documents: Arc<dyn DocumentRepository>,
    pub(crate) client_config: ZendeskClientConfig,
    pub(crate) item_concurrency: usize,
    /// Rewrite documents even when the stored copy is as recent as upstream.
    pub(crate) force_resync: bool,
}

impl ZendeskActivities {
    pub fn new(
        connectors: Arc<dyn ConnectorRepository>,
        cursors: Arc<dyn TimestampCursorRepository>,
        resources: Arc<dyn ZendeskResourceRepository>,
        documents: Arc<dyn DocumentRepository>,
        client_config: ZendeskClientConfig,
    ) -> Self {
        Self {
            connectors,
            cursors,
            resources,
            documents,
            client_config,
            item_concurrency: DEFAULT_ITEM_CONCURRENCY,
            force_resync: false,
        }
    }

    pub fn with_item_concurrency(mut self, item_concurrency: usize) -> Self {
        self.item_concurrency = item_concurrency.max(1);
        self
    }

    pub fn with_force_resync(mut self, force_resync: bool) -> Self {
        self.force_resync = force_resync;
        self
    }

    pub async fn fetch_connector(&self, connector_id: i64) -> ZensyncResult<ConnectorRecord> {
        self.connectors
            .fetch_by_id(connector_id)
            .await?
            .ok_or_else(|| ZensyncError::NotFound(format!("connector {connector_id}")))
    }

    /// Brands of a connector in the order they are synced.
    pub async fn list_brands(&self, connector_id: i64) -> ZensyncResult<Vec<ZendeskBrand>> {
        self.resources.list_brands(connector_id).await
    }

    /// A client scoped to one brand's subdomain, resolved through the account's
    /// main subdomain.
    pub(crate) async fn brand_client(
        &self,
        connector: &ConnectorRecord,
        brand_id: i64,
    ) -> Result<ZendeskClient, BatchError> {
        let account = ZendeskClient::new(
            self.client_config.clone(),
            &connector.subdomain,
            &connector.access_token,
        )
        .map_err(ZendeskClientError::RequestError)?;
        let brand = account.fetch_brand(brand_id).await?;
        Ok(account.for_subdomain(&brand.subdomain))
    }
}
