use async_trait::async_trait;
use dashmap::DashMap;
use icanhaz_core::repository::{ReadRepository, Repository, Result};
use icanhaz_core::{LinkRecord, ShortCode};

/// In-memory implementation of the Repository trait using DashMap.
///
/// Hit counts are bumped while holding the shard's write guard, so concurrent
/// lookups of the same code never lose an increment.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    storage: DashMap<String, LinkRecord>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
        }
    }

    /// Creates a new in-memory repository with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: DashMap::with_capacity(capacity),
        }
    }

    /// Number of stored links.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        Ok(self
            .storage
            .get(code.as_str())
            .map(|entry| entry.value().clone()))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn put(&self, code: &ShortCode, record: LinkRecord) -> Result<Option<LinkRecord>> {
        Ok(self.storage.insert(code.as_str().to_owned(), record))
    }

    async fn record_hit(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        let Some(mut entry) = self.storage.get_mut(code.as_str()) else {
            return Ok(None);
        };

        entry.hit_count = entry.hit_count.saturating_add(1);
        Ok(Some(entry.clone()))
    }
}
