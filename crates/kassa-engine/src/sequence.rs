//! # Sequencer
//!
//! Issues gapless, strictly increasing receipt identifiers per event, under
//! concurrent callers. This is the system's one hard mutual-exclusion
//! requirement: two cashiers finalizing simultaneously is steady-state
//! load, and no two calls may ever observe the same short number.
//!
//! The trait is the swap point: production uses the store's atomic counter
//! ([`SqliteSequencer`]); a guaranteed-single-instance deployment (or a
//! test) can use the in-process [`MemorySequencer`] without changing any
//! caller.
//!
//! Failure contract: when the counter resource is unreachable, `next`
//! fails with [`EngineError::Sequencing`] and the caller MUST NOT create an
//! order — no number, no sale. The call has no side effect until it
//! returns a number, so it is safe to retry.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{EngineError, EngineResult};
use kassa_core::format_receipt_number;
use kassa_db::{CounterRepository, Database};

/// A freshly issued receipt identity: the durable human-readable number
/// and the monotonic integer behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptIdentity {
    pub receipt_number: String,
    pub short_number: i64,
}

/// Issues receipt identifiers. Implementations must guarantee that
/// concurrent `next` calls for the same event never return the same short
/// number, and that numbers are strictly increasing with no gaps.
#[async_trait]
pub trait Sequencer: Send + Sync {
    async fn next(&self, event_id: &str) -> EngineResult<ReceiptIdentity>;
}

// =============================================================================
// Store-backed Sequencer
// =============================================================================

/// Sequencer over the database's atomic counter increment. Safe across
/// any number of engine instances sharing the store.
#[derive(Debug, Clone)]
pub struct SqliteSequencer {
    counters: CounterRepository,
}

impl SqliteSequencer {
    /// Creates a sequencer over the given database.
    pub fn new(db: &Database) -> Self {
        SqliteSequencer {
            counters: db.counters(),
        }
    }
}

#[async_trait]
impl Sequencer for SqliteSequencer {
    async fn next(&self, event_id: &str) -> EngineResult<ReceiptIdentity> {
        let short_number = self
            .counters
            .next_value(event_id)
            .await
            .map_err(|e| EngineError::Sequencing(e.to_string()))?;

        Ok(ReceiptIdentity {
            receipt_number: format_receipt_number(event_id, short_number),
            short_number,
        })
    }
}

// =============================================================================
// In-process Sequencer
// =============================================================================

/// Mutex-guarded in-process counters. Correct ONLY when this process is
/// the sole issuer for the event; multi-instance deployments must use the
/// store-backed sequencer.
#[derive(Debug, Default)]
pub struct MemorySequencer {
    counters: Mutex<HashMap<String, i64>>,
}

impl MemorySequencer {
    /// Creates a sequencer with all counters at zero.
    pub fn new() -> Self {
        MemorySequencer::default()
    }
}

#[async_trait]
impl Sequencer for MemorySequencer {
    async fn next(&self, event_id: &str) -> EngineResult<ReceiptIdentity> {
        let mut counters = self
            .counters
            .lock()
            .map_err(|_| EngineError::Sequencing("counter state poisoned".to_string()))?;

        let value = counters.entry(event_id.to_string()).or_insert(0);
        *value += 1;
        let short_number = *value;

        Ok(ReceiptIdentity {
            receipt_number: format_receipt_number(event_id, short_number),
            short_number,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
