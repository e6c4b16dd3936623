//! Session error types.

use catalog_core::CatalogError;
use thiserror::Error;

/// Errors returned to callers of the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The change was rejected before reaching the session. Nothing changed.
    #[error(transparent)]
    InvalidParameter(#[from] CatalogError),

    /// The session task has stopped.
    #[error("Search session has stopped")]
    Closed,

    /// The session could not be started with this configuration.
    #[error("Invalid session config: {0}")]
    Config(#[from] SessionConfigError),
}

/// Problems found by `SessionConfig::validate`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionConfigError {
    #[error("default_page_size must be at least 1")]
    ZeroPageSize,

    #[error("max_page_size {max} is below default_page_size {default}")]
    MaxBelowDefault { default: u32, max: u32 },

    #[error("fetch_timeout_ms must be greater than zero")]
    ZeroTimeout,

    #[error("event_capacity must be at least 1")]
    ZeroEventCapacity,
}
