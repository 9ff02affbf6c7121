//! Content store seam
//!
//! The retrieval pipeline only ever reads through [`ContentStore`]. Backends
//! decide how a [`ContentQuery`] is executed; they return matching items
//! with the cache metadata captured at load time.

use async_trait::async_trait;
use ejemplo_core::{ContentItem, StorageError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::query::{ContentQuery, QueryField};

/// Result type for store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Read-only access to stored content.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Execute `query`, returning matching items in store order.
    async fn query(&self, query: &ContentQuery) -> StorageResult<Vec<ContentItem>>;

    /// Cheap availability probe for readiness checks.
    async fn ping(&self) -> StorageResult<()>;
}

/// A stored content record: the loadable item plus the fields queries filter on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredContent {
    #[serde(flatten)]
    pub item: ContentItem,
    #[serde(rename = "type")]
    pub content_type: String,
    pub published: bool,
    pub language: String,
}

impl StoredContent {
    /// Value of `field`, in the representation conditions compare against.
    pub fn field_value(&self, field: QueryField) -> Value {
        match field {
            QueryField::Type => Value::from(self.content_type.as_str()),
            QueryField::Status => Value::from(self.published),
            QueryField::Language => Value::from(self.language.as_str()),
            QueryField::Nid => Value::from(self.item.id.get()),
        }
    }

    /// True when every condition of `query` holds.
    pub fn matches(&self, query: &ContentQuery) -> bool {
        query
            .conditions()
            .iter()
            .all(|condition| condition.matches(&self.field_value(condition.field)))
    }
}
