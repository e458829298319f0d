//! # Error Types
//!
//! Validation errors for the pure core. Storage and lifecycle errors live
//! in their own crates (kassa-db's `DbError`, kassa-engine's
//! `EngineError`) and wrap these where input checking is the cause.

use thiserror::Error;

/// Input validation errors.
///
/// Raised once at the operation boundary; downstream code never re-checks
/// what a validator already established.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field or selection is missing.
    #[error("{field} is required")]
    Required { field: String },

    /// A collection or string that must carry content is empty.
    #[error("{field} must not be empty")]
    Empty { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required { field: field.into() }
    }

    pub fn empty(field: impl Into<String>) -> Self {
        ValidationError::Empty { field: field.into() }
    }
}

/// Convenience type alias for validation results.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
