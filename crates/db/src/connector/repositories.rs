use async_trait::async_trait;

use crate::connector::models::ConnectorRecord;
use zensync_common::error::ZensyncResult;

#[async_trait]
pub trait ConnectorRepository: Send + Sync {
    async fn fetch_by_id(&self, connector_id: i64) -> ZensyncResult<Option<ConnectorRecord>>;

    /// Ids of every configured connector, ascending.
    async fn list_ids(&self) -> ZensyncResult<Vec<i64>>;
}
