//! API Configuration Module
//!
//! Configuration for the retrieval endpoint, CORS and the server socket.
//! Values are loaded from environment variables with defaults suitable for
//! development.

use std::net::SocketAddr;
use std::path::PathBuf;

use ejemplo_core::DEFAULT_LANGUAGE;

use crate::constants::{
    DEFAULT_BIND_HOST, DEFAULT_CORS_MAX_AGE_SECS, DEFAULT_PAGE_CACHE_MAX_AGE_SECS, DEFAULT_PORT,
};
use crate::error::{ApiError, ApiResult};

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    // ========================================================================
    // Server
    // ========================================================================
    /// Host to bind.
    pub bind_host: String,

    /// Port to listen on.
    pub port: u16,

    // ========================================================================
    // Retrieval
    // ========================================================================
    /// Language used when a request has no `lang`.
    pub default_language: String,

    /// Max-age sent for responses whose content is permanently cacheable.
    pub page_cache_max_age_secs: u32,

    /// JSON seed file loaded into the in-memory store at startup.
    pub content_seed: Option<PathBuf>,

    // ========================================================================
    // CORS Configuration
    // ========================================================================
    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins (dev mode).
    pub cors_origins: Vec<String>,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_host: DEFAULT_BIND_HOST.to_string(),
            port: DEFAULT_PORT,
            default_language: DEFAULT_LANGUAGE.to_string(),
            page_cache_max_age_secs: DEFAULT_PAGE_CACHE_MAX_AGE_SECS,
            content_seed: None,
            cors_origins: Vec::new(),
            cors_max_age_secs: DEFAULT_CORS_MAX_AGE_SECS,
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `EJEMPLO_API_BIND`: Host to bind (default: 0.0.0.0)
    /// - `PORT` or `EJEMPLO_API_PORT`: Port to listen on (default: 3000)
    /// - `EJEMPLO_DEFAULT_LANGUAGE`: Fallback language (default: en)
    /// - `EJEMPLO_PAGE_CACHE_MAX_AGE`: Max-age for permanent content (default: 3600)
    /// - `EJEMPLO_CONTENT_SEED`: Path to a JSON seed file (default: none)
    /// - `EJEMPLO_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `EJEMPLO_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    ///
    /// An unparseable port is an error; other unparseable values fall back
    /// to their defaults.
    pub fn from_env() -> ApiResult<Self> {
        let defaults = Self::default();

        let bind_host = std::env::var("EJEMPLO_API_BIND").unwrap_or(defaults.bind_host);

        let port = match std::env::var("PORT")
            .ok()
            .or_else(|| std::env::var("EJEMPLO_API_PORT").ok())
        {
            Some(port_str) => port_str.parse::<u16>().map_err(|_| {
                ApiError::invalid_input(format!("Invalid port value: {}", port_str))
            })?,
            None => defaults.port,
        };

        let default_language = std::env::var("EJEMPLO_DEFAULT_LANGUAGE")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.default_language);

        let page_cache_max_age_secs = std::env::var("EJEMPLO_PAGE_CACHE_MAX_AGE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.page_cache_max_age_secs);

        let content_seed = std::env::var("EJEMPLO_CONTENT_SEED")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let cors_origins = std::env::var("EJEMPLO_CORS_ORIGINS")
            .ok()
            .map(|s| parse_origins(&s))
            .unwrap_or_default();

        let cors_max_age_secs = std::env::var("EJEMPLO_CORS_MAX_AGE_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.cors_max_age_secs);

        Ok(Self {
            bind_host,
            port,
            default_language,
            page_cache_max_age_secs,
            content_seed,
            cors_origins,
            cors_max_age_secs,
        })
    }

    /// Socket address the server listens on.
    pub fn bind_addr(&self) -> ApiResult<SocketAddr> {
        let addr = format!("{}:{}", self.bind_host, self.port);
        addr.parse::<SocketAddr>().map_err(|e| {
            ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e))
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect()
}
