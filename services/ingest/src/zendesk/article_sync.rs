use chrono::Utc;

use zensync_db::document::models::UpsertOutcome;
use zensync_db::zendesk::models::{ResourcePermission, ZendeskCategory};

use super::activities::{BatchError, BatchReport, ItemAction, SkipReason, ZendeskActivities};
use super::client::ZendeskClient;
use super::models::ZendeskArticle;
use super::render::article_to_document;
use crate::executor::run_bounded;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleBatchOutcome {
    /// Start time of the next page, `None` once the export is exhausted.
    pub next_start_time: Option<i64>,
    pub report: BatchReport,
}

/// Per-brand facts every article of a page needs.
struct ArticleContext<'a> {
    client: &'a ZendeskClient,
    connector_id: i64,
    brand_id: i64,
    help_center_enabled: bool,
}

impl ZendeskActivities {
    /// Fetch one page of recently updated articles for a brand and apply it.
    pub async fn sync_article_batch(
        &self,
        connector_id: i64,
        brand_id: i64,
        start_time: i64,
    ) -> Result<ArticleBatchOutcome, BatchError> {
        let connector = self.fetch_connector(connector_id).await?;
        let help_center_enabled = self
            .resources
            .fetch_brand(connector_id, brand_id)
            .await?
            .map(|b| b.help_center_permission.is_read())
            .unwrap_or(false);

        let client = self.brand_client(&connector, brand_id).await?;
        let page = client.fetch_recently_updated_articles(start_time).await?;
        let count = page.articles.len();

        let ctx = ArticleContext {
            client: &client,
            connector_id,
            brand_id,
            help_center_enabled,
        };
        let outcomes = run_bounded(page.articles, self.item_concurrency, |article| {
            let ctx = &ctx;
            async move {
                let article_id = article.id;
                let result = self.apply_article(ctx, article).await;
                if let Err(e) = &result {
                    tracing::warn!(connector_id, brand_id, article_id, error = %e, "failed to sync article");
                }
                result
            }
        })
        .await;
        let report = BatchReport::tally(outcomes)?;

        let next_start_time = page.next_page.as_ref().map(|_| page.end_time);
        tracing::info!(
            connector_id,
            brand_id,
            start_time,
            count,
            upserted = report.upserted,
            skipped = report.skipped,
            has_more = next_start_time.is_some(),
            "applied article batch"
        );

        Ok(ArticleBatchOutcome {
            next_start_time,
            report,
        })
    }

    async fn apply_article(
        &self,
        ctx: &ArticleContext<'_>,
        article: ZendeskArticle,
    ) -> Result<ItemAction, BatchError> {
        if article.draft {
            return Ok(ItemAction::Skipped(SkipReason::Draft));
        }

        let section = ctx.client.fetch_section(article.section_id).await?;
        let Some(category_id) = section.category_id else {
            return Ok(ItemAction::Skipped(SkipReason::NoCategory));
        };

        let category = match self
            .resources
            .fetch_category(ctx.connector_id, category_id)
            .await?
        {
            Some(category) => Some(category),
            None if ctx.help_center_enabled => {
                self.discover_category(ctx, category_id, article.id).await?
            }
            None => None,
        };

        let category = match category {
            Some(c) if c.permission.is_read() => c,
            Some(_) => return Ok(ItemAction::Skipped(SkipReason::CategoryNotSelected)),
            None if ctx.help_center_enabled => {
                return Ok(ItemAction::Skipped(SkipReason::CategoryUnavailable))
            }
            None => return Ok(ItemAction::Skipped(SkipReason::CategoryNotSelected)),
        };

        let author = ctx.client.fetch_user(article.author_id).await?;
        let document = article_to_document(
            ctx.connector_id,
            &article,
            &section,
            &category,
            author.as_ref(),
        );

        let outcome = self
            .documents
            .upsert_document(&document, self.force_resync)
            .await?;
        Ok(match outcome {
            UpsertOutcome::Upserted => ItemAction::Upserted,
            UpsertOutcome::Unchanged => ItemAction::Unchanged,
        })
    }

    /// Fetch a category first seen through one of its articles and store it as
    /// selected. Upstream failures are logged and yield `None`.
    async fn discover_category(
        &self,
        ctx: &ArticleContext<'_>,
        category_id: i64,
        article_id: i64,
    ) -> Result<Option<ZendeskCategory>, BatchError> {
        let fetched = match ctx.client.fetch_category(category_id).await {
            Ok(Some(fetched)) => fetched,
            Ok(None) => {
                tracing::error!(article_id, category_id, "category could not be fetched");
                return Ok(None);
            }
            Err(e) => {
                tracing::error!(article_id, category_id, error = %e, "category could not be fetched");
                return Ok(None);
            }
        };

        let category = ZendeskCategory {
            connector_id: ctx.connector_id,
            brand_id: ctx.brand_id,
            category_id,
            name: fetched.name.unwrap_or_else(|| "Category".to_string()),
            url: fetched.html_url,
            description: fetched.description,
            permission: ResourcePermission::Read,
            created_at: Utc::now(),
        };
        Ok(Some(self.resources.create_category(&category).await?))
    }
}
