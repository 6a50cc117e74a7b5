use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::zendesk::models::{ResourcePermission, ZendeskBrand, ZendeskCategory};
use crate::zendesk::repositories::ZendeskResourceRepository;
use zensync_common::error::{ZensyncError, ZensyncResult};

#[derive(Clone)]
pub struct PgZendeskResourceRepository {
    pool: PgPool,
}

impl PgZendeskResourceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_brand(row: sqlx::postgres::PgRow) -> ZendeskBrand {
        ZendeskBrand {
            connector_id: row.get("connector_id"),
            brand_id: row.get("brand_id"),
            name: row.get("name"),
            help_center_permission: ResourcePermission::from_db(
                &row.get::<String, _>("help_center_permission"),
            ),
            tickets_permission: ResourcePermission::from_db(
                &row.get::<String, _>("tickets_permission"),
            ),
        }
    }

    fn map_category(row: sqlx::postgres::PgRow) -> ZendeskCategory {
        ZendeskCategory {
            connector_id: row.get("connector_id"),
            brand_id: row.get("brand_id"),
            category_id: row.get("category_id"),
            name: row.get("name"),
            url: row.get("url"),
            description: row.get("description"),
            permission: ResourcePermission::from_db(&row.get::<String, _>("permission")),
            created_at: row.get("created_at"),
        }
    }
}

#[async_trait]
impl ZendeskResourceRepository for PgZendeskResourceRepository {
    async fn fetch_brand(
        &self,
        connector_id: i64,
        brand_id: i64,
    ) -> ZensyncResult<Option<ZendeskBrand>> {
        let row = sqlx::query(
            "select connector_id, brand_id, name, help_center_permission, tickets_permission
             from zendesk_brands
             where connector_id = $1 and brand_id = $2",
        )
        .bind(connector_id)
        .bind(brand_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ZensyncError::Database(e.to_string()))?;

        Ok(row.map(Self::map_brand))
    }

    async fn list_brands(&self, connector_id: i64) -> ZensyncResult<Vec<ZendeskBrand>> {
        let rows = sqlx::query(
            "select connector_id, brand_id, name, help_center_permission, tickets_permission
             from zendesk_brands
             where connector_id = $1
             order by brand_id",
        )
        .bind(connector_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ZensyncError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Self::map_brand).collect())
    }

    async fn fetch_category(
        &self,
        connector_id: i64,
        category_id: i64,
    ) -> ZensyncResult<Option<ZendeskCategory>> {
        let row = sqlx::query(
            "select connector_id, brand_id, category_id, name, url, description, permission, created_at
             from zendesk_categories
             where connector_id = $1 and category_id = $2",
        )
        .bind(connector_id)
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ZensyncError::Database(e.to_string()))?;

        Ok(row.map(Self::map_category))
    }

    async fn create_category(&self, category: &ZendeskCategory) -> ZensyncResult<ZendeskCategory> {
        sqlx::query(
            "insert into zendesk_categories
             (connector_id, brand_id, category_id, name, url, description, permission)
             values ($1, $2, $3, $4, $5, $6, $7)
             on conflict (connector_id, category_id) do nothing",
        )
        .bind(category.connector_id)
        .bind(category.brand_id)
        .bind(category.category_id)
        .bind(&category.name)
        .bind(&category.url)
        .bind(&category.description)
        .bind(category.permission.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| ZensyncError::Database(e.to_string()))?;

        self.fetch_category(category.connector_id, category.category_id)
            .await?
            .ok_or_else(|| {
                ZensyncError::Internal(format!(
                    "category {} vanished after insert",
                    category.category_id
                ))
            })
    }
}
