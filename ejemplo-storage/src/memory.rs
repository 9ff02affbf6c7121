//! In-memory content store
//!
//! Backs the server when no external store is wired in and serves as the
//! test double for the retrieval pipeline. Records are kept ordered by id,
//! which is the order queries return them in.

use async_trait::async_trait;
use ejemplo_core::{BodyFormat, CacheMetadata, ContentItem, NodeId, StorageError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::query::{ContentQuery, ARTICLE_TYPE};
use crate::store::{ContentStore, StorageResult, StoredContent};

/// Shape of one record in a JSON seed file.
///
/// Everything except `id`, `title` and `language` has a default; records
/// without `cache` get [`CacheMetadata::for_node`].
#[derive(Debug, Deserialize)]
struct SeedRecord {
    id: NodeId,
    #[serde(rename = "type", default = "default_content_type")]
    content_type: String,
    #[serde(default = "default_published")]
    published: bool,
    language: String,
    title: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    body_format: BodyFormat,
    #[serde(default)]
    cache: Option<CacheMetadata>,
}

fn default_content_type() -> String {
    ARTICLE_TYPE.to_string()
}

fn default_published() -> bool {
    true
}

impl From<SeedRecord> for StoredContent {
    fn from(seed: SeedRecord) -> Self {
        let cache = seed.cache.unwrap_or_else(|| CacheMetadata::for_node(seed.id));
        StoredContent {
            item: ContentItem {
                id: seed.id,
                title: seed.title,
                body: seed.body,
                body_format: seed.body_format,
                cache,
            },
            content_type: seed.content_type,
            published: seed.published,
            language: seed.language,
        }
    }
}

/// Content store holding every record in memory.
#[derive(Debug, Default)]
pub struct InMemoryContentStore {
    records: Arc<RwLock<BTreeMap<NodeId, StoredContent>>>,
    queries: AtomicUsize,
}

impl InMemoryContentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `records`.
    pub fn with_records(records: impl IntoIterator<Item = StoredContent>) -> Self {
        let map = records
            .into_iter()
            .map(|record| (record.item.id, record))
            .collect();
        Self {
            records: Arc::new(RwLock::new(map)),
            queries: AtomicUsize::new(0),
        }
    }

    /// Parse a JSON array of seed records.
    pub fn from_json_str(json: &str) -> StorageResult<Self> {
        let seeds: Vec<SeedRecord> = serde_json::from_str(json).map_err(|e| StorageError::Seed {
            reason: e.to_string(),
        })?;
        Ok(Self::with_records(seeds.into_iter().map(StoredContent::from)))
    }

    /// Load a JSON seed file.
    pub fn from_seed_file(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| StorageError::Seed {
            reason: format!("{}: {}", path.display(), e),
        })?;
        Self::from_json_str(&json)
    }

    /// Number of stored records.
    pub fn len(&self) -> StorageResult<usize> {
        Ok(self.records.read().map_err(|_| StorageError::LockPoisoned)?.len())
    }

    pub fn is_empty(&self) -> StorageResult<bool> {
        self.len().map(|len| len == 0)
    }

    /// Number of queries executed so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn query(&self, query: &ContentQuery) -> StorageResult<Vec<ContentItem>> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        let records = self.records.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(records
            .values()
            .filter(|record| record.matches(query))
            .map(|record| record.item.clone())
            .collect())
    }

    async fn ping(&self) -> StorageResult<()> {
        self.records
            .read()
            .map(|_| ())
            .map_err(|_| StorageError::LockPoisoned)
    }
}
