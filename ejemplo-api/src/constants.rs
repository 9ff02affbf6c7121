//! Constants for Ejemplo API
//!
//! This module contains all constant values used throughout the API.

// ============================================================================
// ROUTES AND PARAMETERS
// ============================================================================

/// Path of the content retrieval endpoint
pub const EJEMPLO_PATH: &str = "/rest/ejemplo";

/// Query parameter naming the requested nodes
pub const NODE_IDS_PARAM: &str = "node_ids";

/// Bracketed form of [`NODE_IDS_PARAM`] sent by PHP-style clients
pub const NODE_IDS_ARRAY_PARAM: &str = "node_ids[]";

/// Query parameter naming the content language
pub const LANG_PARAM: &str = "lang";

/// Literal `node_ids` value selecting every article
pub const ALL_NODES: &str = "all";

// ============================================================================
// MESSAGES
// ============================================================================

/// Message returned when `node_ids` is absent or empty
pub const MISSING_NODES_MESSAGE: &str = "You must provide the nodes to get.";

// ============================================================================
// CACHING
// ============================================================================

/// Cache-Control value for responses that must not be cached
pub const UNCACHEABLE_CACHE_CONTROL: &str = "no-cache, private";

/// Header listing the cache tags of a response
pub const CACHE_TAGS_HEADER: &str = "x-cache-tags";

/// Header listing the cache contexts of a response
pub const CACHE_CONTEXTS_HEADER: &str = "x-cache-contexts";

/// Default max-age in seconds applied to permanently cacheable responses (1 hour)
pub const DEFAULT_PAGE_CACHE_MAX_AGE_SECS: u32 = 3600;

// ============================================================================
// CORS
// ============================================================================

/// Default CORS max age in seconds (24 hours)
pub const DEFAULT_CORS_MAX_AGE_SECS: u64 = 86400;

// ============================================================================
// SERVER
// ============================================================================

/// Default bind host
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_PORT: u16 = 3000;
