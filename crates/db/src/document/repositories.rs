use async_trait::async_trait;

use crate::document::models::{Document, UpsertOutcome};
use zensync_common::error::ZensyncResult;

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Write a document. Without `force`, a stored copy with the same or a newer
    /// `source_updated_at` is left alone and `Unchanged` is returned.
    async fn upsert_document(&self, document: &Document, force: bool)
        -> ZensyncResult<UpsertOutcome>;

    /// Remove a document. Returns `false` if it did not exist; that is not an error.
    async fn delete_document(&self, connector_id: i64, document_id: &str) -> ZensyncResult<bool>;
}
