//! Failures shared by every catalog crate.
//!
//! Catalog-specific errors wrap this type; the api layer never matches on the
//! message strings, only on the variant.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed input such as an unknown shop-context token.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Internal state the catalog relies on is broken (poisoned lock,
    /// missing configuration).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// A raw identifier was zero, negative or not a number.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("not found")]
    NotFound,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
