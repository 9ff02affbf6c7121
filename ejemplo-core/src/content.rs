//! Content items and the response payload built from them

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::{CacheMetadata, NodeId};

/// Text format of a stored body field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum BodyFormat {
    /// Restricted HTML, rendered with unsafe elements removed.
    #[default]
    BasicHtml,
    /// Plain text, escaped and broken into paragraphs.
    PlainText,
}

/// A content item as loaded from the store, before rendering.
///
/// `cache` is captured at load time so the response cache contract reflects
/// the stored object rather than any render-time state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: NodeId,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub body_format: BodyFormat,
    pub cache: CacheMetadata,
}

impl ContentItem {
    /// Item with default cache metadata for its id.
    pub fn new(id: NodeId, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            body: body.into(),
            body_format: BodyFormat::default(),
            cache: CacheMetadata::for_node(id),
        }
    }

    pub fn with_format(mut self, body_format: BodyFormat) -> Self {
        self.body_format = body_format;
        self
    }

    pub fn with_cache(mut self, cache: CacheMetadata) -> Self {
        self.cache = cache;
        self
    }
}

/// Items returned by the store plus the requested ids it did not return.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RetrievalResult {
    /// In store order.
    pub items: Vec<ContentItem>,
    /// Always empty when the filter requested "all".
    pub missing_ids: BTreeSet<NodeId>,
}

impl RetrievalResult {
    pub fn is_complete(&self) -> bool {
        self.missing_ids.is_empty()
    }
}

/// One rendered entry of the response `data` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ContentEntry {
    #[serde(rename = "titulo")]
    pub title: String,
    /// Rendered, trimmed body.
    #[serde(rename = "contenido")]
    pub content: String,
}

/// JSON body of a successful retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ResponsePayload {
    pub message: String,
    pub data: Vec<ContentEntry>,
    /// Unix timestamp (seconds) of when the request was served.
    pub time: i64,
}
