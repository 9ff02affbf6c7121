//! Ejemplo Storage - Content Store and Renderer Seams
//!
//! Defines the collaborator interfaces the retrieval pipeline reads through
//! (`ContentStore`, `Renderer`), the query representation handed to stores,
//! and the built-in in-memory store and body renderer.

pub mod memory;
pub mod query;
pub mod render;
pub mod store;

pub use memory::InMemoryContentStore;
pub use query::{ContentQuery, QueryCondition, QueryField, QueryOperator, ARTICLE_TYPE};
pub use render::{escape_html, BodyRenderer, Renderer};
pub use store::{ContentStore, StorageResult, StoredContent};
