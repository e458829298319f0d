//! # Validation
//!
//! Business rule validation, applied at the engine/repository boundary.
//! Each check runs exactly once per operation; nothing downstream
//! re-validates.

use crate::error::{ValidationError, ValidationResult};

/// Validates a product display name: non-empty after trimming, bounded.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("name"));
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a gross unit price: strictly positive cents.
pub fn validate_price_cents(price_cents: i64) -> ValidationResult<()> {
    if price_cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates an administrative void reason: non-empty after trimming,
/// bounded. The self-service path stores an empty reason and never calls
/// this.
pub fn validate_void_reason(reason: &str) -> ValidationResult<()> {
    let reason = reason.trim();

    if reason.is_empty() {
        return Err(ValidationError::empty("reason"));
    }

    if reason.len() > 500 {
        return Err(ValidationError::TooLong {
            field: "reason".to_string(),
            max: 500,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
