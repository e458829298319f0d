//! # Engine Error Taxonomy
//!
//! Every operation reports its failure synchronously to its caller, typed
//! by what the operator should do next:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Validation    fix the input, no retry                                  │
//! │  Unauthorized  aborted before any write                                 │
//! │  Sequencing    no order was created; safe to retry                      │
//! │  Persistence   underlying cause attached; partial writes are surfaced   │
//! │                loudly, never silently retried                           │
//! │  NotFound      user-facing, no system action                            │
//! │  AlreadyVoided user-facing; void is NOT idempotent by design            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine itself never retries finalize or void (duplicate submission
//! risk); `is_retryable` tells the operator-facing layer which failures a
//! resubmission can plausibly clear.

use thiserror::Error;

use kassa_core::ValidationError;
use kassa_db::DbError;

/// Errors raised by engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Input rejected at the operation boundary (missing bar, empty cart,
    /// blank void reason, ...).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Identity check failed. Raised before any persistence is touched.
    /// The message is uniform: it never reveals which PINs exist.
    #[error("Unauthorized")]
    Unauthorized,

    /// The receipt counter was unreachable or returned no value. Hard
    /// precondition: no number, no sale. The counter call has no side
    /// effect until it returns a number, so retrying is safe.
    #[error("Receipt numbering unavailable: {0}")]
    Sequencing(String),

    /// A storage step failed, with the underlying cause.
    #[error("Persistence failure: {0}")]
    Persistence(#[from] DbError),

    /// Lookup miss. The message is uniform on purpose: for public tokens
    /// it must not distinguish malformed from absent.
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// The order was already voided. Repeating a void is an error, not a
    /// no-op: silently absorbing it would mask double-processing.
    #[error("Order {receipt_number} is already voided")]
    AlreadyVoided { receipt_number: String },
}

impl EngineError {
    /// Creates a NotFound error.
    pub fn not_found(entity: &'static str) -> Self {
        EngineError::NotFound { entity }
    }

    /// Whether resubmitting the same operation can plausibly succeed.
    /// Sequencing failures always qualify; persistence failures only when
    /// transient (pool exhausted, connection lost).
    pub fn is_retryable(&self) -> bool {
        match self {
            EngineError::Sequencing(_) => true,
            EngineError::Persistence(db) => db.is_transient(),
            _ => false,
        }
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryability() {
        assert!(EngineError::Sequencing("counter down".to_string()).is_retryable());
        assert!(EngineError::Persistence(DbError::PoolExhausted).is_retryable());

        assert!(!EngineError::Unauthorized.is_retryable());
        assert!(!EngineError::not_found("Order").is_retryable());
        assert!(!EngineError::AlreadyVoided {
            receipt_number: "SEEFES-00001".to_string()
        }
        .is_retryable());
        assert!(
            !EngineError::Persistence(DbError::QueryFailed("boom".to_string())).is_retryable()
        );
    }

    #[test]
    fn test_unauthorized_message_is_uniform() {
        assert_eq!(EngineError::Unauthorized.to_string(), "Unauthorized");
    }

    #[test]
    fn test_validation_conversion() {
        let err: EngineError = ValidationError::required("bar").into();
        assert!(matches!(err, EngineError::Validation(_)));
    }
}
