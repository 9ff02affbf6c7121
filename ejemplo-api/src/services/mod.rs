//! Service Layer
//!
//! Business logic behind the route handlers. Services own the
//! collaborators (content store, renderer) and keep handlers limited to
//! request parsing and response shaping.

mod retrieval_service;

pub use retrieval_service::*;
