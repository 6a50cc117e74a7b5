use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use zensync_common::error::ZensyncError;

use super::activities::{BatchError, BatchReport, ZendeskActivities};
use super::models::TicketPageCursor;
use crate::connector::{Connector, SyncReport};

const SOURCE_NAME: &str = "zendesk";

#[derive(Debug, thiserror::Error)]
pub enum SyncRunError {
    #[error("{activity} failed after {attempts} attempt(s): {source}")]
    ActivityFailed {
        activity: &'static str,
        attempts: u32,
        #[source]
        source: BatchError,
    },

    #[error(transparent)]
    Store(#[from] ZensyncError),
}

/// Drives one incremental run for a connector: every article and ticket page
/// of every selected brand, then a single cursor commit.
///
/// Stands in for the workflow engine, so it owns the retry policy: a failed
/// batch is re-run from the same page, and the cursor only moves once all
/// pages have been applied.
pub struct ZendeskIncrementalSyncer {
    connector_id: i64,
    activities: Arc<ZendeskActivities>,
    max_attempts: u32,
    retry_backoff: Duration,
}

impl ZendeskIncrementalSyncer {
    pub fn new(connector_id: i64, activities: Arc<ZendeskActivities>) -> Self {
        Self {
            connector_id,
            activities,
            max_attempts: 3,
            retry_backoff: Duration::from_secs(1),
        }
    }

    pub fn with_retry_policy(mut self, max_attempts: u32, retry_backoff: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.retry_backoff = retry_backoff;
        self
    }

    pub async fn run(&self) -> Result<SyncReport, SyncRunError> {
        let connector_id = self.connector_id;
        let current_sync_date = Utc::now();

        self.activities.fetch_connector(connector_id).await?;
        let start = self.activities.get_timestamp_cursor(connector_id).await?;
        let start_time = start.timestamp();
        let brands = self.activities.list_brands(connector_id).await?;

        tracing::info!(connector_id, start = %start, brands = brands.len(), "starting incremental sync");

        let mut totals = BatchReport::default();
        let mut errors = 0;

        for brand in &brands {
            let brand_id = brand.brand_id;

            if brand.help_center_permission.is_read() {
                let mut next = Some(start_time);
                while let Some(page_start) = next {
                    let outcome = self
                        .run_activity("sync_article_batch", &mut errors, || {
                            self.activities
                                .sync_article_batch(connector_id, brand_id, page_start)
                        })
                        .await?;
                    totals.merge(&outcome.report);
                    next = outcome.next_start_time;
                }
            }

            if brand.tickets_permission.is_read() {
                let mut cursor = TicketPageCursor::StartTime(start_time);
                loop {
                    let page_cursor = cursor.clone();
                    let outcome = self
                        .run_activity("sync_ticket_batch", &mut errors, || {
                            self.activities
                                .sync_ticket_batch(connector_id, brand_id, &page_cursor)
                        })
                        .await?;
                    totals.merge(&outcome.report);

                    if !outcome.has_more {
                        break;
                    }
                    match outcome.after_cursor {
                        Some(after) => cursor = TicketPageCursor::After(after),
                        None => {
                            let detail = format!(
                                "ticket page for brand {brand_id} has more results but no after_cursor"
                            );
                            return Err(SyncRunError::ActivityFailed {
                                activity: "sync_ticket_batch",
                                attempts: 1,
                                source: BatchError::Store(ZensyncError::Upstream(detail)),
                            });
                        }
                    }
                }
            }
        }

        self.activities
            .set_timestamp_cursor(connector_id, current_sync_date)
            .await?;

        Ok(SyncReport {
            source: SOURCE_NAME.to_string(),
            upserted: totals.upserted,
            unchanged: totals.unchanged,
            deleted: totals.deleted,
            skipped: totals.skipped,
            errors,
        })
    }

    async fn run_activity<T, F, Fut>(
        &self,
        activity: &'static str,
        errors: &mut usize,
        mut call: F,
    ) -> Result<T, SyncRunError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, BatchError>>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match call().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_attempts && is_retryable(&e) => {
                    *errors += 1;
                    let backoff = self
                        .retry_backoff
                        .saturating_mul(2u32.saturating_pow(attempt - 1));
                    tracing::warn!(
                        connector_id = self.connector_id,
                        activity,
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %e,
                        "activity failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(source) => {
                    return Err(SyncRunError::ActivityFailed {
                        activity,
                        attempts: attempt,
                        source,
                    })
                }
            }
        }
    }
}

/// A missing connector or cursor will not appear on retry.
fn is_retryable(error: &BatchError) -> bool {
    !matches!(error, BatchError::Store(ZensyncError::NotFound(_)))
}

#[async_trait]
impl Connector for ZendeskIncrementalSyncer {
    fn source_name(&self) -> &str {
        SOURCE_NAME
    }

    async fn sync(&self) -> Result<SyncReport, Box<dyn std::error::Error + Send + Sync>> {
        match self.run().await {
            Ok(report) => {
                tracing::info!(connector_id = self.connector_id, ?report, "zendesk sync completed");
                Ok(report)
            }
            Err(e) => {
                tracing::error!(connector_id = self.connector_id, error = %e, "zendesk sync failed, cursor not advanced");
                Err(Box::new(e))
            }
        }
    }
}
