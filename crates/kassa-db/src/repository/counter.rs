//! # Receipt Counter Repository
//!
//! The shared, contended resource behind receipt numbers: one monotonic
//! integer per event.
//!
//! ## Atomicity
//! `next_value` is a single upsert-increment-and-read statement. Two
//! cashiers finalizing simultaneously is steady-state load here, not an
//! edge case, so the increment must never decompose into read-then-write:
//! SQLite executes the statement atomically, and `RETURNING` hands back
//! the value this caller produced, not whatever the row holds later.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Repository for the per-event receipt counters.
#[derive(Debug, Clone)]
pub struct CounterRepository {
    pool: SqlitePool,
}

impl CounterRepository {
    /// Creates a new CounterRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CounterRepository { pool }
    }

    /// Atomically increments the event's counter and returns the new
    /// value. The first call for an event returns 1.
    pub async fn next_value(&self, event_id: &str) -> DbResult<i64> {
        let value: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO receipt_counters (event_id, value)
            VALUES (?1, 1)
            ON CONFLICT (event_id) DO UPDATE SET value = value + 1
            RETURNING value
            "#,
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        debug!(event_id = %event_id, value = %value, "Issued short number");

        Ok(value)
    }

    /// Reads the current counter value without incrementing, for
    /// diagnostics. None if the event has never issued a number.
    pub async fn current(&self, event_id: &str) -> DbResult<Option<i64>> {
        let value: Option<i64> =
            sqlx::query_scalar("SELECT value FROM receipt_counters WHERE event_id = ?1")
                .bind(event_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(value)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
