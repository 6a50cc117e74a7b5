use async_trait::async_trait;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub source: String,
    pub upserted: usize,
    pub unchanged: usize,
    pub deleted: usize,
    pub skipped: usize,
    pub errors: usize,
}

#[async_trait]
pub trait Connector: Send + Sync {
    fn source_name(&self) -> &str;
    async fn sync(&self) -> Result<SyncReport, Box<dyn std::error::Error + Send + Sync>>;
}
