//! Cacheability metadata and the aggregated response cache contract
//!
//! Every loaded content item carries a [`CacheMetadata`]: the tags that
//! invalidate it, the request contexts it varies by, and how long it may be
//! cached. A response combines the metadata of everything it was built from
//! into a [`CacheContract`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::NodeId;

/// Context added to every response built from query arguments.
pub const QUERY_ARGS_CONTEXT: &str = "url.path.query_args";

// ============================================================================
// MAX AGE
// ============================================================================

/// How long a piece of content may be cached.
///
/// Serialized as an integer: `-1` for permanent, `0` for uncacheable,
/// and a positive number of seconds otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum MaxAge {
    /// No upper bound; invalidated only through tags.
    #[default]
    Permanent,
    /// Bounded lifetime in seconds. Zero means uncacheable.
    Seconds(u32),
}

impl MaxAge {
    /// Must not be cached at all.
    pub const UNCACHEABLE: MaxAge = MaxAge::Seconds(0);

    /// Combine two max-ages, keeping the stricter one.
    pub fn merge(self, other: MaxAge) -> MaxAge {
        match (self, other) {
            (MaxAge::Permanent, other) => other,
            (this, MaxAge::Permanent) => this,
            (MaxAge::Seconds(a), MaxAge::Seconds(b)) => MaxAge::Seconds(a.min(b)),
        }
    }

    pub fn is_uncacheable(self) -> bool {
        self == MaxAge::UNCACHEABLE
    }

    pub fn is_permanent(self) -> bool {
        self == MaxAge::Permanent
    }
}

/// Error for integers that are not a valid max-age.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidMaxAge(pub i64);

impl fmt::Display for InvalidMaxAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid max-age {}: expected -1 (permanent) or 0..={}",
            self.0,
            u32::MAX
        )
    }
}

impl std::error::Error for InvalidMaxAge {}

impl TryFrom<i64> for MaxAge {
    type Error = InvalidMaxAge;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(MaxAge::Permanent),
            v => u32::try_from(v)
                .map(MaxAge::Seconds)
                .map_err(|_| InvalidMaxAge(v)),
        }
    }
}

impl From<MaxAge> for i64 {
    fn from(max_age: MaxAge) -> Self {
        match max_age {
            MaxAge::Permanent => -1,
            MaxAge::Seconds(secs) => i64::from(secs),
        }
    }
}

// ============================================================================
// PER-ITEM METADATA
// ============================================================================

/// Cacheability of a single loaded content item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CacheMetadata {
    /// Invalidation tags, e.g. `node:5`.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Request contexts the item varies by.
    #[serde(default)]
    pub contexts: BTreeSet<String>,
    #[serde(default)]
    pub max_age: MaxAge,
}

impl CacheMetadata {
    /// Default metadata for a node: its own tag, no contexts, permanent.
    pub fn for_node(id: NodeId) -> Self {
        Self {
            tags: BTreeSet::from([format!("node:{}", id)]),
            contexts: BTreeSet::new(),
            max_age: MaxAge::Permanent,
        }
    }

    /// Builder-style max-age override.
    pub fn with_max_age(mut self, max_age: MaxAge) -> Self {
        self.max_age = max_age;
        self
    }

    /// Builder-style tag addition.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Builder-style context addition.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.contexts.insert(context.into());
        self
    }
}

// ============================================================================
// RESPONSE CONTRACT
// ============================================================================

/// Aggregated cache metadata of one response.
///
/// Always varies by [`QUERY_ARGS_CONTEXT`]; fields are private so that
/// invariant cannot be undone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheContract {
    tags: BTreeSet<String>,
    contexts: BTreeSet<String>,
    max_age: MaxAge,
}

impl CacheContract {
    /// Empty contract: no tags, the query-args context, permanent.
    pub fn new() -> Self {
        Self {
            tags: BTreeSet::new(),
            contexts: BTreeSet::from([QUERY_ARGS_CONTEXT.to_string()]),
            max_age: MaxAge::Permanent,
        }
    }

    /// Fold every item's metadata into a fresh contract.
    pub fn aggregate<'a, I>(dependencies: I) -> Self
    where
        I: IntoIterator<Item = &'a CacheMetadata>,
    {
        dependencies
            .into_iter()
            .fold(Self::new(), |mut contract, metadata| {
                contract.add_dependency(metadata);
                contract
            })
    }

    /// Union tags and contexts, keep the stricter max-age.
    pub fn add_dependency(&mut self, metadata: &CacheMetadata) {
        self.tags.extend(metadata.tags.iter().cloned());
        self.contexts.extend(metadata.contexts.iter().cloned());
        self.max_age = self.max_age.merge(metadata.max_age);
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn contexts(&self) -> &BTreeSet<String> {
        &self.contexts
    }

    pub fn max_age(&self) -> MaxAge {
        self.max_age
    }
}

impl Default for CacheContract {
    fn default() -> Self {
        Self::new()
    }
}
