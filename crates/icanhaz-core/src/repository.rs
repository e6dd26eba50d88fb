use crate::error::StorageError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A stored link in the repository.
///
/// Serialises as `{"id": <url>, "count": <hits>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// The URL the short code points at.
    #[serde(rename = "id")]
    pub target_url: String,
    /// Successful resolutions since the record was last written.
    #[serde(rename = "count")]
    pub hit_count: u64,
}

impl LinkRecord {
    /// Creates a fresh record with a zero hit count.
    pub fn new(target_url: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
            hit_count: 0,
        }
    }
}

/// A read-only view of a repository.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the link record for a given short code.
    /// Returns `None` if the code does not exist.
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>>;

    /// Checks whether a short code currently has a record.
    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.get(code).await?.is_some())
    }
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Stores `record` under `code`, replacing whatever was there.
    /// Returns the evicted record, if any.
    async fn put(&self, code: &ShortCode, record: LinkRecord) -> Result<Option<LinkRecord>>;

    /// Increments the hit count of the record at `code` as one atomic step
    /// and returns the updated record.
    /// Returns `None` without writing anything if the code does not exist.
    async fn record_hit(&self, code: &ShortCode) -> Result<Option<LinkRecord>>;
}
