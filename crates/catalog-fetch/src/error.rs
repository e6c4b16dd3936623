//! Fetch error types.

use std::time::Duration;

use catalog_core::{ErrorKind, NetworkFailure};
use thiserror::Error;

/// Errors that can occur while fetching a result page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Transport failure, timeout, or non-success status.
    #[error("Network error: {0}")]
    Network(NetworkFailure),

    /// The response body does not describe a result page.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    pub fn timeout(after: Duration) -> Self {
        Self::Network(NetworkFailure::Timeout(after))
    }

    pub fn connect(msg: impl Into<String>) -> Self {
        Self::Network(NetworkFailure::Connect(msg.into()))
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Network(NetworkFailure::Transport(msg.into()))
    }

    pub fn status(code: u16) -> Self {
        Self::Network(NetworkFailure::Status(code))
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    /// What the view records for this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(failure) => ErrorKind::Network(failure.clone()),
            Self::Malformed(msg) => ErrorKind::MalformedResponse(msg.clone()),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Network(NetworkFailure::Timeout(_)))
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }
}

impl From<FetchError> for ErrorKind {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Network(failure) => ErrorKind::Network(failure),
            FetchError::Malformed(msg) => ErrorKind::MalformedResponse(msg),
        }
    }
}

/// Errors in fetcher configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid base URL {0:?}: must start with http:// or https://")]
    InvalidBaseUrl(String),

    #[error("Query parameter name for {0} must not be empty")]
    EmptyParamName(&'static str),

    #[error("Timeout {0} must be greater than zero")]
    ZeroTimeout(&'static str),
}
