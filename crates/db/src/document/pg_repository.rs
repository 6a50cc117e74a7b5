use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::document::models::{Document, UpsertOutcome};
use crate::document::repositories::DocumentRepository;
use zensync_common::error::{ZensyncError, ZensyncResult};

#[derive(Clone)]
pub struct PgDocumentRepository {
    pool: PgPool,
}

impl PgDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentRepository for PgDocumentRepository {
    async fn upsert_document(
        &self,
        document: &Document,
        force: bool,
    ) -> ZensyncResult<UpsertOutcome> {
        let written: Option<String> = sqlx::query_scalar(
            "insert into zendesk_documents
             (id, connector_id, document_id, kind, title, source_url, content, tags, source_updated_at)
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             on conflict (connector_id, document_id) do update set
               kind = excluded.kind,
               title = excluded.title,
               source_url = excluded.source_url,
               content = excluded.content,
               tags = excluded.tags,
               source_updated_at = excluded.source_updated_at,
               last_upserted_at = now()
             where $10 or zendesk_documents.source_updated_at < excluded.source_updated_at
             returning document_id",
        )
        .bind(Uuid::new_v4())
        .bind(document.connector_id)
        .bind(&document.document_id)
        .bind(document.kind.as_str())
        .bind(&document.title)
        .bind(&document.source_url)
        .bind(&document.content)
        .bind(&document.tags)
        .bind(document.source_updated_at)
        .bind(force)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ZensyncError::Database(e.to_string()))?;

        Ok(match written {
            Some(_) => UpsertOutcome::Upserted,
            None => UpsertOutcome::Unchanged,
        })
    }

    async fn delete_document(&self, connector_id: i64, document_id: &str) -> ZensyncResult<bool> {
        let result = sqlx::query(
            "delete from zendesk_documents where connector_id = $1 and document_id = $2",
        )
        .bind(connector_id)
        .bind(document_id)
        .execute(&self.pool)
        .await
        .map_err(|e| ZensyncError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
