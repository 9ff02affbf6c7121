//! Identity types for content nodes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;

/// Identifier of a content node.
///
/// Always a positive integer; zero is unrepresentable. Ordering is numeric,
/// so ordered sets of ids iterate ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", schema(value_type = u64))]
#[serde(try_from = "u64", into = "u64")]
pub struct NodeId(NonZeroU64);

impl NodeId {
    /// Create a node id, returning `None` for zero.
    pub fn new(value: u64) -> Option<Self> {
        NonZeroU64::new(value).map(Self)
    }

    /// The raw integer value.
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when converting zero into a [`NodeId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZeroNodeId;

impl fmt::Display for ZeroNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("node id must be a positive integer")
    }
}

impl std::error::Error for ZeroNodeId {}

impl TryFrom<u64> for NodeId {
    type Error = ZeroNodeId;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(ZeroNodeId)
    }
}

impl From<NodeId> for u64 {
    fn from(id: NodeId) -> Self {
        id.get()
    }
}

/// Join node ids into a `", "`-separated list, in iteration order.
pub fn format_node_list<'a, I>(ids: I) -> String
where
    I: IntoIterator<Item = &'a NodeId>,
{
    ids.into_iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
