//! # Identity Boundary
//!
//! Staff-PIN verification is an external collaborator: the engine hands a
//! secret over and gets back an identity or a uniform failure. The result
//! is validated here, once; downstream code works with an `Identity` and
//! never re-checks PINs.
//!
//! ## Trust model
//! The failure response must not leak which PINs exist: a wrong PIN and a
//! nonexistent PIN both come back as `Ok(None)`. `Err(..)` is reserved for
//! the collaborator itself failing (timeout, connection), which the caller
//! surfaces as retryable instead of treating as a denial.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use kassa_core::Role;

/// An authenticated staff member, as snapshotted onto orders and audit
/// records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl Identity {
    /// `role:name` label used on receipts and void records.
    pub fn label(&self) -> String {
        format!("{}:{}", self.role.as_str(), self.name)
    }

    /// Whether this identity may use the administrative void path.
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// The identity-check collaborator contract.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves a PIN to an identity. `Ok(None)` is the uniform failure
    /// for any unknown or wrong secret; `Err` means the check itself could
    /// not be performed.
    async fn check_pin(&self, secret: &str) -> EngineResult<Option<Identity>>;
}

/// In-process PIN directory for single-instance deployments and tests.
///
/// Strictly per-identity: every staff member has their own PIN and their
/// own role snapshot. There is deliberately no shared house secret.
#[derive(Debug, Clone, Default)]
pub struct StaticPinDirectory {
    pins: HashMap<String, Identity>,
}

impl StaticPinDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        StaticPinDirectory {
            pins: HashMap::new(),
        }
    }

    /// Registers an identity under its PIN.
    pub fn with_identity(mut self, pin: impl Into<String>, identity: Identity) -> Self {
        self.pins.insert(pin.into(), identity);
        self
    }
}

#[async_trait]
impl IdentityProvider for StaticPinDirectory {
    async fn check_pin(&self, secret: &str) -> EngineResult<Option<Identity>> {
        Ok(self.pins.get(secret).cloned())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
