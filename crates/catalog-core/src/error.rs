//! Catalog error types.

use thiserror::Error;

/// Errors raised while building catalog values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A query parameter violated its constraint. The previous value is kept.
    #[error("Invalid parameter {name}={value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: i64,
        reason: &'static str,
    },
}

impl CatalogError {
    pub(crate) fn invalid(name: &'static str, value: i64, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}
