//! Ejemplo Test Utilities
//!
//! Centralized test infrastructure for the Ejemplo workspace:
//! - Proptest generators for identifier tokens
//! - Failing collaborators for error-path tests
//! - Test fixtures for common store contents
//! - Custom assertions for retrieval results

// Re-export core and storage types for convenience
pub use ejemplo_core::{
    BodyFormat, CacheContract, CacheMetadata, ContentItem, EjemploError, EjemploResult, Filter,
    MaxAge, NodeId, RenderError, StorageError, ValidationError,
};
pub use ejemplo_storage::{
    BodyRenderer, ContentQuery, ContentStore, InMemoryContentStore, Renderer, StorageResult,
    StoredContent, ARTICLE_TYPE,
};

use async_trait::async_trait;

// ============================================================================
// FAILING COLLABORATORS
// ============================================================================

/// Content store whose every operation fails.
#[derive(Debug, Clone)]
pub struct FailingContentStore {
    reason: String,
}

impl FailingContentStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for FailingContentStore {
    fn default() -> Self {
        Self::new("store unavailable")
    }
}

#[async_trait]
impl ContentStore for FailingContentStore {
    async fn query(&self, _query: &ContentQuery) -> StorageResult<Vec<ContentItem>> {
        Err(StorageError::QueryFailed {
            reason: self.reason.clone(),
        })
    }

    async fn ping(&self) -> StorageResult<()> {
        Err(StorageError::QueryFailed {
            reason: self.reason.clone(),
        })
    }
}

/// Renderer that fails for every item.
#[derive(Debug, Clone, Default)]
pub struct FailingRenderer;

impl Renderer for FailingRenderer {
    fn render(&self, item: &ContentItem) -> Result<String, RenderError> {
        Err(RenderError::Failed {
            id: item.id,
            reason: "renderer failure".to_string(),
        })
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for request tokens and stored content.

    use super::*;
    use proptest::prelude::*;

    /// A token that parses to a valid node id: digits (possibly with
    /// leading zeros) padded with optional whitespace.
    pub fn node_id_token() -> impl Strategy<Value = String> {
        (1u64..1_000_000, 0usize..3, " {0,2}", " {0,2}").prop_map(
            |(id, zeros, lead, trail)| format!("{}{}{}{}", lead, "0".repeat(zeros), id, trail),
        )
    }

    /// A non-empty token that is never a valid node id and never the
    /// literal `all`.
    pub fn invalid_token() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("0".to_string()),
            Just("000".to_string()),
            "[a-zA-Z]{1,8}".prop_filter("literal all is special", |s| s != "all"),
            (1u64..1000).prop_map(|n| format!("-{}", n)),
            (1u64..1000).prop_map(|n| format!("+{}", n)),
            (1u64..1000, "[a-z]{1,3}").prop_map(|(n, s)| format!("{}{}", n, s)),
            (1u64..1000, 1u64..100).prop_map(|(a, b)| format!("{}.{}", a, b)),
            Just("18446744073709551616".to_string()),
        ]
    }

    /// A token whose only non-markup content is a valid id.
    pub fn markup_token() -> impl Strategy<Value = String> {
        (1u64..1_000_000, "[a-z]{1,6}").prop_flat_map(|(id, tag)| {
            prop_oneof![
                Just(format!("<{tag}>{id}</{tag}>")),
                Just(format!("{id}<{tag}>")),
                Just(format!("<!-- {tag} -->{id}")),
                Just(format!("javascript:{id}")),
            ]
        })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built records and stores for common scenarios.

    use super::*;

    /// Build a node id from a literal.
    ///
    /// # Panics
    /// Panics on zero.
    pub fn node(id: u64) -> NodeId {
        NodeId::new(id).expect("fixture node ids are non-zero")
    }

    /// A published article titled `T<id>` with body `B<id>`.
    pub fn article(id: u64, language: &str) -> StoredContent {
        let id = node(id);
        StoredContent {
            item: ContentItem::new(id, format!("T{}", id), format!("B{}", id)),
            content_type: ARTICLE_TYPE.to_string(),
            published: true,
            language: language.to_string(),
        }
    }

    /// An unpublished article.
    pub fn draft(id: u64, language: &str) -> StoredContent {
        StoredContent {
            published: false,
            ..article(id, language)
        }
    }

    /// A published record of a type other than article.
    pub fn page(id: u64, language: &str) -> StoredContent {
        StoredContent {
            content_type: "page".to_string(),
            ..article(id, language)
        }
    }

    /// Store holding `records`.
    pub fn store_with(records: impl IntoIterator<Item = StoredContent>) -> InMemoryContentStore {
        InMemoryContentStore::with_records(records)
    }

    /// English articles 5 and 9, Spanish article 7, an English draft 6 and
    /// an English page 8.
    pub fn mixed_store() -> InMemoryContentStore {
        store_with([
            article(5, "en"),
            article(9, "en"),
            article(7, "es"),
            draft(6, "en"),
            page(8, "en"),
        ])
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions for retrieval results.

    use super::*;

    /// Assert that a result is a NotFound error listing exactly `missing`.
    #[track_caller]
    pub fn assert_not_found<T: std::fmt::Debug>(result: &EjemploResult<T>, missing: &[u64]) {
        match result {
            Err(EjemploError::NotFound { missing: found }) => {
                let found: Vec<u64> = found.iter().map(|id| id.get()).collect();
                assert_eq!(found, missing, "Wrong ids in NotFound error");
            }
            other => panic!("Expected NotFound error for {:?}, got: {:?}", missing, other),
        }
    }

    /// Assert that a result is a validation error naming `value`.
    #[track_caller]
    pub fn assert_invalid_value<T: std::fmt::Debug>(result: &EjemploResult<T>, value: &str) {
        match result {
            Err(EjemploError::Validation(ValidationError::InvalidIdentifier { value: found })) => {
                assert_eq!(found, value, "Wrong value in validation error");
            }
            other => panic!("Expected invalid value {:?}, got: {:?}", value, other),
        }
    }
}
