//! Errors for malformed domain input.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Input that cannot become a domain value: an unparsable id, a catalog
/// record with a negative quantity, and so on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
