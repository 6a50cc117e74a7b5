use async_trait::async_trait;

use crate::zendesk::models::{ZendeskBrand, ZendeskCategory};
use zensync_common::error::ZensyncResult;

#[async_trait]
pub trait ZendeskResourceRepository: Send + Sync {
    async fn fetch_brand(
        &self,
        connector_id: i64,
        brand_id: i64,
    ) -> ZensyncResult<Option<ZendeskBrand>>;

    /// All brands of a connector, ordered by brand id.
    async fn list_brands(&self, connector_id: i64) -> ZensyncResult<Vec<ZendeskBrand>>;

    async fn fetch_category(
        &self,
        connector_id: i64,
        category_id: i64,
    ) -> ZensyncResult<Option<ZendeskCategory>>;

    /// Insert a category unless one with the same id already exists.
    /// Returns the stored row, which is the existing one when two callers race.
    async fn create_category(&self, category: &ZendeskCategory) -> ZensyncResult<ZendeskCategory>;
}
