use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::connector::models::ConnectorRecord;
use crate::connector::repositories::ConnectorRepository;
use zensync_common::error::{ZensyncError, ZensyncResult};

#[derive(Clone)]
pub struct PgConnectorRepository {
    pool: PgPool,
}

impl PgConnectorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_row(row: sqlx::postgres::PgRow) -> ConnectorRecord {
        ConnectorRecord {
            id: row.get("id"),
            workspace_id: row.get("workspace_id"),
            data_source_id: row.get("data_source_id"),
            subdomain: row.get("subdomain"),
            access_token: row.get("access_token"),
            created_at: row.get("created_at"),
        }
    }
}

#[async_trait]
impl ConnectorRepository for PgConnectorRepository {
    async fn fetch_by_id(&self, connector_id: i64) -> ZensyncResult<Option<ConnectorRecord>> {
        let row = sqlx::query(
            "select id, workspace_id, data_source_id, subdomain, access_token, created_at
             from connectors
             where id = $1",
        )
        .bind(connector_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ZensyncError::Database(e.to_string()))?;

        Ok(row.map(Self::map_row))
    }

    async fn list_ids(&self) -> ZensyncResult<Vec<i64>> {
        sqlx::query_scalar("select id from connectors order by id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ZensyncError::Database(e.to_string()))
    }
}
