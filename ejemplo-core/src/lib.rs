//! Ejemplo Core - Data Types
//!
//! Pure data structures shared by the storage and API crates: node ids, the
//! normalized filter, loaded content, the response payload, cache metadata
//! and the error taxonomy.

pub mod cache;
pub mod content;
pub mod error;
pub mod filter;
pub mod identity;

pub use cache::{CacheContract, CacheMetadata, InvalidMaxAge, MaxAge, QUERY_ARGS_CONTEXT};
pub use content::{BodyFormat, ContentEntry, ContentItem, ResponsePayload, RetrievalResult};
pub use error::{EjemploError, EjemploResult, RenderError, StorageError, ValidationError};
pub use filter::{Filter, DEFAULT_LANGUAGE};
pub use identity::{format_node_list, NodeId, ZeroNodeId};
