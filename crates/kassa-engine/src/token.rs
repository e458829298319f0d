//! # Public Receipt Tokens
//!
//! The public token is the sole access control on a receipt's public view,
//! so predictability here is a direct data leak. Tokens are drawn from the
//! thread-local CSPRNG over a uniform alphanumeric alphabet; at 40
//! characters that is ~238 bits, far beyond guessing range.

use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

/// Length of a public receipt token.
pub const PUBLIC_TOKEN_LEN: usize = 40;

/// Generates a fresh unguessable public token.
pub fn generate_public_token() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(PUBLIC_TOKEN_LEN)
        .map(char::from)
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
