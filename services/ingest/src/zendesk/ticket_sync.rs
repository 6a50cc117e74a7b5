use zensync_db::document::models::{ticket_document_id, UpsertOutcome};

use super::activities::{BatchError, BatchReport, ItemAction, SkipReason, ZendeskActivities};
use super::client::ZendeskClient;
use super::models::{TicketPageCursor, TicketStatus, ZendeskTicket};
use super::render::ticket_to_document;
use crate::executor::run_bounded;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketBatchOutcome {
    pub has_more: bool,
    /// Continuation token for the next page; only meaningful when `has_more`.
    pub after_cursor: Option<String>,
    pub report: BatchReport,
}

impl ZendeskActivities {
    /// Fetch one page of recently updated tickets for a brand and apply it.
    pub async fn sync_ticket_batch(
        &self,
        connector_id: i64,
        brand_id: i64,
        cursor: &TicketPageCursor,
    ) -> Result<TicketBatchOutcome, BatchError> {
        let connector = self.fetch_connector(connector_id).await?;
        let client = self.brand_client(&connector, brand_id).await?;
        let page = client.fetch_recently_updated_tickets(cursor).await?;
        let count = page.tickets.len();

        let client = &client;
        let outcomes = run_bounded(page.tickets, self.item_concurrency, |ticket| async move {
            let ticket_id = ticket.id;
            let result = self.apply_ticket(client, connector_id, ticket).await;
            if let Err(e) = &result {
                tracing::warn!(connector_id, brand_id, ticket_id, error = %e, "failed to sync ticket");
            }
            result
        })
        .await;
        let report = BatchReport::tally(outcomes)?;

        tracing::info!(
            connector_id,
            brand_id,
            cursor = ?cursor,
            count,
            upserted = report.upserted,
            deleted = report.deleted,
            skipped = report.skipped,
            end_of_stream = page.end_of_stream,
            "applied ticket batch"
        );

        Ok(TicketBatchOutcome {
            has_more: !page.end_of_stream,
            after_cursor: page.after_cursor,
            report,
        })
    }

    async fn apply_ticket(
        &self,
        client: &ZendeskClient,
        connector_id: i64,
        ticket: ZendeskTicket,
    ) -> Result<ItemAction, BatchError> {
        match ticket.status {
            TicketStatus::Deleted => {
                let document_id = ticket_document_id(connector_id, ticket.id);
                let existed = self
                    .documents
                    .delete_document(connector_id, &document_id)
                    .await?;
                tracing::debug!(connector_id, ticket_id = ticket.id, existed, "deleted ticket document");
                Ok(ItemAction::Deleted)
            }
            TicketStatus::Solved => {
                let comments = client.fetch_ticket_comments(ticket.id).await?;
                let mut user_ids: Vec<i64> = comments.iter().map(|c| c.author_id).collect();
                user_ids.extend(ticket.requester_id);
                let users = client.fetch_users(&user_ids).await?;

                let document = ticket_to_document(connector_id, &ticket, &comments, &users);
                let outcome = self
                    .documents
                    .upsert_document(&document, self.force_resync)
                    .await?;
                Ok(match outcome {
                    UpsertOutcome::Upserted => ItemAction::Upserted,
                    UpsertOutcome::Unchanged => ItemAction::Unchanged,
                })
            }
            _ => Ok(ItemAction::Skipped(SkipReason::TicketNotFinal)),
        }
    }
}
