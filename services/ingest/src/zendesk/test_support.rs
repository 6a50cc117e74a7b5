//! In-memory repositories and wiremock fixtures shared by the Zendesk tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use zensync_common::error::{ZensyncError, ZensyncResult};
use zensync_db::connector::models::ConnectorRecord;
use zensync_db::connector::repositories::ConnectorRepository;
use zensync_db::cursor::models::TimestampCursor;
use zensync_db::cursor::repositories::TimestampCursorRepository;
use zensync_db::document::models::{Document, UpsertOutcome};
use zensync_db::document::repositories::DocumentRepository;
use zensync_db::zendesk::models::{ResourcePermission, ZendeskBrand, ZendeskCategory};
use zensync_db::zendesk::repositories::ZendeskResourceRepository;

use super::activities::ZendeskActivities;
use super::client::ZendeskClientConfig;

pub const CONNECTOR_ID: i64 = 1;
pub const BRAND_ID: i64 = 10;

// -- Mock ConnectorRepository -------------------------------------------

pub struct MockConnectorRepo {
    pub connectors: Vec<ConnectorRecord>,
}

#[async_trait]
impl ConnectorRepository for MockConnectorRepo {
    async fn fetch_by_id(&self, connector_id: i64) -> ZensyncResult<Option<ConnectorRecord>> {
        Ok(self
            .connectors
            .iter()
            .find(|c| c.id == connector_id)
            .cloned())
    }

    async fn list_ids(&self) -> ZensyncResult<Vec<i64>> {
        Ok(self.connectors.iter().map(|c| c.id).collect())
    }
}

// -- Mock TimestampCursorRepository -------------------------------------

#[derive(Default)]
pub struct MockCursorRepo {
    pub cursors: Mutex<HashMap<i64, Option<DateTime<Utc>>>>,
    pub commits: Mutex<Vec<(i64, DateTime<Utc>)>>,
}

impl MockCursorRepo {
    fn row(connector_id: i64, timestamp_cursor: Option<DateTime<Utc>>) -> TimestampCursor {
        TimestampCursor {
            id: connector_id,
            connector_id,
            timestamp_cursor,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[async_trait]
impl TimestampCursorRepository for MockCursorRepo {
    async fn get_or_create(&self, connector_id: i64) -> ZensyncResult<TimestampCursor> {
        let mut cursors = self.cursors.lock().unwrap();
        let stored = *cursors.entry(connector_id).or_insert(None);
        Ok(Self::row(connector_id, stored))
    }

    async fn set_cursor(
        &self,
        connector_id: i64,
        timestamp_cursor: DateTime<Utc>,
    ) -> ZensyncResult<TimestampCursor> {
        let mut cursors = self.cursors.lock().unwrap();
        match cursors.get_mut(&connector_id) {
            Some(slot) => {
                *slot = Some(timestamp_cursor);
                self.commits
                    .lock()
                    .unwrap()
                    .push((connector_id, timestamp_cursor));
                Ok(Self::row(connector_id, Some(timestamp_cursor)))
            }
            None => Err(ZensyncError::NotFound(format!(
                "timestamp cursor for connector {connector_id}"
            ))),
        }
    }
}

// -- Mock ZendeskResourceRepository -------------------------------------

#[derive(Default)]
pub struct MockResourceRepo {
    pub brands: Vec<ZendeskBrand>,
    pub categories: Mutex<HashMap<i64, ZendeskCategory>>,
}

#[async_trait]
impl ZendeskResourceRepository for MockResourceRepo {
    async fn fetch_brand(
        &self,
        connector_id: i64,
        brand_id: i64,
    ) -> ZensyncResult<Option<ZendeskBrand>> {
        Ok(self
            .brands
            .iter()
            .find(|b| b.connector_id == connector_id && b.brand_id == brand_id)
            .cloned())
    }

    async fn list_brands(&self, connector_id: i64) -> ZensyncResult<Vec<ZendeskBrand>> {
        let mut brands: Vec<ZendeskBrand> = self
            .brands
            .iter()
            .filter(|b| b.connector_id == connector_id)
            .cloned()
            .collect();
        brands.sort_by_key(|b| b.brand_id);
        Ok(brands)
    }

    async fn fetch_category(
        &self,
        _connector_id: i64,
        category_id: i64,
    ) -> ZensyncResult<Option<ZendeskCategory>> {
        Ok(self.categories.lock().unwrap().get(&category_id).cloned())
    }

    async fn create_category(&self, category: &ZendeskCategory) -> ZensyncResult<ZendeskCategory> {
        let mut categories = self.categories.lock().unwrap();
        Ok(categories
            .entry(category.category_id)
            .or_insert_with(|| category.clone())
            .clone())
    }
}

// -- Mock DocumentRepository --------------------------------------------

#[derive(Default)]
pub struct MockDocumentRepo {
    pub upserts: Mutex<Vec<Document>>,
    pub deletes: Mutex<Vec<String>>,
    /// Upserts of these document ids fail.
    pub failing_ids: Vec<String>,
    /// When set, every upsert records how many cursor commits had happened.
    pub commit_probe: Option<Arc<MockCursorRepo>>,
    pub commits_seen_at_upsert: Mutex<Vec<usize>>,
}

#[async_trait]
impl DocumentRepository for MockDocumentRepo {
    async fn upsert_document(
        &self,
        document: &Document,
        _force: bool,
    ) -> ZensyncResult<UpsertOutcome> {
        if self.failing_ids.contains(&document.document_id) {
            return Err(ZensyncError::Database(format!(
                "write rejected for {}",
                document.document_id
            )));
        }
        if let Some(probe) = &self.commit_probe {
            let commits = probe.commits.lock().unwrap().len();
            self.commits_seen_at_upsert.lock().unwrap().push(commits);
        }
        self.upserts.lock().unwrap().push(document.clone());
        Ok(UpsertOutcome::Upserted)
    }

    async fn delete_document(&self, _connector_id: i64, document_id: &str) -> ZensyncResult<bool> {
        self.deletes.lock().unwrap().push(document_id.to_string());
        Ok(false)
    }
}

// -- Harness ------------------------------------------------------------

pub fn brand(help_center: ResourcePermission, tickets: ResourcePermission) -> ZendeskBrand {
    ZendeskBrand {
        connector_id: CONNECTOR_ID,
        brand_id: BRAND_ID,
        name: "Acme".to_string(),
        help_center_permission: help_center,
        tickets_permission: tickets,
    }
}

pub fn category(category_id: i64, permission: ResourcePermission) -> ZendeskCategory {
    ZendeskCategory {
        connector_id: CONNECTOR_ID,
        brand_id: BRAND_ID,
        category_id,
        name: format!("Category {category_id}"),
        url: format!("https://acme.zendesk.com/hc/categories/{category_id}"),
        description: None,
        permission,
        created_at: Utc::now(),
    }
}

pub struct Harness {
    pub connectors: Arc<MockConnectorRepo>,
    pub cursors: Arc<MockCursorRepo>,
    pub resources: Arc<MockResourceRepo>,
    pub documents: Arc<MockDocumentRepo>,
}

impl Harness {
    pub fn new(brands: Vec<ZendeskBrand>, categories: Vec<ZendeskCategory>) -> Self {
        Self::with_documents(brands, categories, MockDocumentRepo::default())
    }

    pub fn with_documents(
        brands: Vec<ZendeskBrand>,
        categories: Vec<ZendeskCategory>,
        mut documents: MockDocumentRepo,
    ) -> Self {
        let cursors = Arc::new(MockCursorRepo::default());
        documents.commit_probe = Some(cursors.clone());
        let connector = ConnectorRecord {
            id: CONNECTOR_ID,
            workspace_id: "ws".to_string(),
            data_source_id: "ds".to_string(),
            subdomain: "acme".to_string(),
            access_token: "token".to_string(),
            created_at: Utc::now(),
        };
        Self {
            connectors: Arc::new(MockConnectorRepo {
                connectors: vec![connector],
            }),
            cursors,
            resources: Arc::new(MockResourceRepo {
                brands,
                categories: Mutex::new(
                    categories
                        .into_iter()
                        .map(|c| (c.category_id, c))
                        .collect(),
                ),
            }),
            documents: Arc::new(documents),
        }
    }

    pub fn activities(&self, server: &MockServer) -> ZendeskActivities {
        let config = ZendeskClientConfig {
            domain: "zendesk.com".to_string(),
            max_retries: 0,
            timeout_secs: 5,
            base_url_override: Some(server.uri()),
        };
        ZendeskActivities::new(
            self.connectors.clone(),
            self.cursors.clone(),
            self.resources.clone(),
            self.documents.clone(),
            config,
        )
    }

    pub fn upserted_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .documents
            .upserts
            .lock()
            .unwrap()
            .iter()
            .map(|d| d.document_id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn deleted_ids(&self) -> Vec<String> {
        self.documents.deletes.lock().unwrap().clone()
    }
}

// -- Wiremock fixtures --------------------------------------------------

pub async fn mount_brand(server: &MockServer, brand_id: i64) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v2/brands/{brand_id}.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "brand": {
                "id": brand_id,
                "name": "Acme",
                "subdomain": format!("acme-{brand_id}"),
                "has_help_center": true
            }
        })))
        .mount(server)
        .await;
}

pub async fn mount_json(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub fn article_json(id: i64, section_id: i64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "html_url": format!("https://acme.zendesk.com/hc/articles/{id}"),
        "author_id": 500,
        "section_id": section_id,
        "title": format!("Article {id}"),
        "body": "<p>body</p>",
        "draft": false,
        "label_names": [],
        "created_at": "2026-09-01T10:00:00Z",
        "updated_at": "2026-09-02T10:00:00Z"
    })
}

pub fn ticket_json(id: i64, status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "subject": format!("Ticket {id}"),
        "status": status,
        "requester_id": 700,
        "tags": [],
        "created_at": "2026-09-01T10:00:00Z",
        "updated_at": "2026-09-02T10:00:00Z"
    })
}
