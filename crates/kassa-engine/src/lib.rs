//! # kassa-engine: Order & Receipt Lifecycle Engine
//!
//! The rules that turn a cart into a durable, uniquely numbered,
//! tax-correct receipt, and everything layered on that: the void/audit
//! policy, reprints, the public receipt view, and reporting.
//!
//! ## Control Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  UI / device shell                                                       │
//! │      │                                                                   │
//! │      ▼                                                                   │
//! │  Session (bar, cart, cashier, last receipt)                              │
//! │      │                                                                   │
//! │      ▼                                                                   │
//! │  CheckoutService.finalize ──► Sequencer.next (atomic counter)            │
//! │      │                        └─ no number, no sale                      │
//! │      ├──► Money split ──► Order + OrderItems (one transaction)           │
//! │      ├──► ReceiptDocument.render ──► PrintJob enqueue (best-effort)      │
//! │      └──► Receipt back to the caller, cart cleared                       │
//! │                                                                          │
//! │  VoidService ──► guarded transition + VoidRecord (one transaction)       │
//! │  ReportService ──► completed-only rollups                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency Model
//! Sessions are per-device and independently concurrent; the only shared
//! contended resource is the receipt counter behind [`sequence::Sequencer`].
//! All operations here are request/response - they block on storage and the
//! identity collaborator but own no background lifecycle.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod checkout;
pub mod config;
pub mod error;
pub mod reporting;
pub mod sequence;
pub mod session;
pub mod token;
pub mod void;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use auth::{Identity, IdentityProvider, StaticPinDirectory};
pub use checkout::{CheckoutService, Receipt};
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use reporting::{ReportRange, ReportService, SalesReport};
pub use sequence::{MemorySequencer, ReceiptIdentity, Sequencer, SqliteSequencer};
pub use session::{BarSelection, LastReceipt, Session};
pub use token::generate_public_token;
pub use void::VoidService;

use std::sync::Arc;

use kassa_db::Database;

// =============================================================================
// Engine
// =============================================================================

/// The assembled engine: storage, sequencer, identity collaborator, and
/// configuration. Hands out the per-concern services; each is a cheap
/// clone-and-go view over the same shared state.
#[derive(Clone)]
pub struct Engine {
    db: Database,
    sequencer: Arc<dyn Sequencer>,
    auth: Arc<dyn IdentityProvider>,
    config: EngineConfig,
}

impl Engine {
    /// Assembles an engine from its collaborators.
    pub fn new(
        db: Database,
        sequencer: Arc<dyn Sequencer>,
        auth: Arc<dyn IdentityProvider>,
        config: EngineConfig,
    ) -> Self {
        Engine {
            db,
            sequencer,
            auth,
            config,
        }
    }

    /// Assembles an engine over the store's atomic counter - the right
    /// sequencer whenever more than one engine instance may share the
    /// database.
    pub fn with_store_sequencer(
        db: Database,
        auth: Arc<dyn IdentityProvider>,
        config: EngineConfig,
    ) -> Self {
        let sequencer: Arc<dyn Sequencer> = Arc::new(SqliteSequencer::new(&db));
        Engine::new(db, sequencer, auth, config)
    }

    /// Finalize, reprint, and the public receipt view.
    pub fn checkout(&self) -> CheckoutService {
        CheckoutService::new(self.db.clone(), self.sequencer.clone(), self.config.clone())
    }

    /// The void/audit policy.
    pub fn voids(&self) -> VoidService {
        VoidService::new(self.db.clone(), self.auth.clone(), self.config.clone())
    }

    /// The reporting aggregator.
    pub fn reports(&self) -> ReportService {
        ReportService::new(self.db.clone(), self.config.clone())
    }

    /// The underlying database handle.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

// =============================================================================
// Shared Test Rig
// =============================================================================
