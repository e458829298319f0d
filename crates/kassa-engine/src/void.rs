//! # Void / Audit Policy
//!
//! Two authorization paths over the same state transition:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Self-service void                                                       │
//! │    target:  ONLY the session's most recently finalized order            │
//! │    who:     any authenticated role (staff or admin)                     │
//! │    reason:  recorded as ""                                              │
//! │    intent:  instant correction of a mistake, bounded blast radius       │
//! │                                                                         │
//! │  Administrative void                                                    │
//! │    target:  any order, by receipt number                                │
//! │    who:     admin role only                                             │
//! │    reason:  mandatory, non-empty                                        │
//! │    intent:  after-the-fact correction with a complete audit trail       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both paths end in the repository's guarded transition, which flips
//! status and writes the VoidRecord in one transaction. A failed identity
//! check aborts before any persistence call; a repeated void is an error
//! (`AlreadyVoided`), never a silent no-op.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::auth::{Identity, IdentityProvider};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::session::Session;
use kassa_core::validation::validate_void_reason;
use kassa_core::VoidRecord;
use kassa_db::Database;

/// The void/audit policy over the order lifecycle.
#[derive(Clone)]
pub struct VoidService {
    db: Database,
    auth: Arc<dyn IdentityProvider>,
    config: EngineConfig,
}

impl VoidService {
    pub(crate) fn new(db: Database, auth: Arc<dyn IdentityProvider>, config: EngineConfig) -> Self {
        VoidService { db, auth, config }
    }

    /// Self-service void: reverses the session's most recent receipt.
    ///
    /// Any authenticated role suffices; there is no way to pass a
    /// different target through this path. The reason is recorded empty.
    pub async fn void_last(&self, session: &Session, pin: &str) -> EngineResult<VoidRecord> {
        let identity = self.authenticate(pin).await?;

        let target = session
            .last_receipt()
            .ok_or_else(|| EngineError::not_found("Receipt"))?;

        let record = self.transition(&target.order_id, &identity, "").await?;
        session.clear_last_receipt();

        Ok(record)
    }

    /// Administrative void: reverses any order by receipt number.
    ///
    /// Requires an admin identity and a non-empty reason; a blank reason
    /// is rejected before anything is read or written.
    pub async fn void_by_receipt(
        &self,
        pin: &str,
        receipt_number: &str,
        reason: &str,
    ) -> EngineResult<VoidRecord> {
        validate_void_reason(reason)?;

        let identity = self.authenticate(pin).await?;
        if !identity.is_admin() {
            return Err(EngineError::Unauthorized);
        }

        let order = self
            .db
            .orders()
            .get_by_receipt(&self.config.event_id, receipt_number)
            .await?
            .ok_or_else(|| EngineError::not_found("Order"))?;

        if order.is_voided() {
            return Err(EngineError::AlreadyVoided {
                receipt_number: order.receipt_number,
            });
        }

        self.transition(&order.id, &identity, reason.trim()).await
    }

    /// Identity gate shared by both paths. Runs before any persistence is
    /// touched; a collaborator failure propagates as retryable instead of
    /// being treated as a denial.
    async fn authenticate(&self, pin: &str) -> EngineResult<Identity> {
        self.auth
            .check_pin(pin)
            .await?
            .ok_or(EngineError::Unauthorized)
    }

    /// The completed → voided transition. The repository guard decides the
    /// race: when it reports no row flipped, the order either never
    /// existed or was already voided, and the distinction is re-read for
    /// the error.
    async fn transition(
        &self,
        order_id: &str,
        actor: &Identity,
        reason: &str,
    ) -> EngineResult<VoidRecord> {
        let voided = self
            .db
            .orders()
            .void_order(order_id, &actor.label(), reason, Utc::now())
            .await?;

        match voided {
            Some(record) => {
                info!(
                    order_id = %order_id,
                    actor = %record.actor,
                    "Order voided"
                );
                Ok(record)
            }
            None => match self.db.orders().get_by_id(order_id).await? {
                Some(order) => Err(EngineError::AlreadyVoided {
                    receipt_number: order.receipt_number,
                }),
                None => Err(EngineError::not_found("Order")),
            },
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
