//! Domain error model.

use thiserror::Error;

use crate::id::ProductId;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// lookups, rating conversion). Filesystem and parsing concerns belong to the
/// infrastructure crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. blank name, negative price).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A star rating ordinal was outside `0..=5`.
    #[error("invalid rating ordinal: {0} (expected 0..=5)")]
    InvalidRating(i64),

    /// No product with the requested id exists in the catalog.
    #[error("product with id {0} not found")]
    NotFound(ProductId),

    /// Unexpected internal fault (e.g. a poisoned lock). Isolated to the
    /// failing call.
    #[error("internal fault: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn not_found(id: ProductId) -> Self {
        Self::NotFound(id)
    }

    /// `true` for the conditions callers are expected to handle as part of
    /// the normal contract (lookups and bad input).
    pub fn is_expected(&self) -> bool {
        !matches!(self, Self::Internal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_id() {
        let err = DomainError::not_found(ProductId::new(42));
        assert_eq!(err.to_string(), "product with id 42 not found");
    }

    #[test]
    fn internal_faults_are_not_expected() {
        assert!(DomainError::validation("x").is_expected());
        assert!(DomainError::InvalidRating(9).is_expected());
        assert!(!DomainError::internal("lock poisoned").is_expected());
    }
}
