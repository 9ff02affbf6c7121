//! Normalized retrieval filter
//!
//! A [`Filter`] is what the request layer hands to the query builder once the
//! raw query parameters have been validated. It is request-local and never
//! re-inspected for its original wire shape.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::NodeId;

/// Language used when the caller does not provide one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Identifier and language constraints for one retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Filter {
    /// Requested ids. Empty means "all": no identifier constraint.
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<u64>))]
    pub identifiers: BTreeSet<NodeId>,
    /// Opaque language key matched against the stored language field.
    pub language: String,
}

impl Filter {
    /// Filter selecting every item in `language`.
    pub fn all(language: impl Into<String>) -> Self {
        Self {
            identifiers: BTreeSet::new(),
            language: language.into(),
        }
    }

    /// Filter selecting exactly `identifiers` in `language`.
    pub fn for_ids(identifiers: impl IntoIterator<Item = NodeId>, language: impl Into<String>) -> Self {
        Self {
            identifiers: identifiers.into_iter().collect(),
            language: language.into(),
        }
    }

    /// True when no identifier constraint applies.
    pub fn is_all(&self) -> bool {
        self.identifiers.is_empty()
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::all(DEFAULT_LANGUAGE)
    }
}
