//! # Print Job Repository
//!
//! The append-only queue between the register and the physical printer.
//!
//! ## Ownership Split
//! The engine inserts jobs with status `queued` and never looks at them
//! again — printing is best-effort and must not block or roll back a sale.
//! The external printer worker polls `fetch_queued`, prints the payload,
//! and calls `mark_printed`; that status transition belongs to the worker
//! alone.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kassa_core::PrintJob;

/// Repository for print job database operations.
#[derive(Debug, Clone)]
pub struct PrintJobRepository {
    pool: SqlitePool,
}

impl PrintJobRepository {
    /// Creates a new PrintJobRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PrintJobRepository { pool }
    }

    /// Appends a rendered receipt to the queue.
    pub async fn enqueue(&self, job: &PrintJob) -> DbResult<()> {
        debug!(id = %job.id, order_id = %job.order_id, "Enqueueing print job");

        sqlx::query(
            r#"
            INSERT INTO print_jobs (
                id, event_id, order_id, payload, status, created_at, printed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&job.id)
        .bind(&job.event_id)
        .bind(&job.order_id)
        .bind(&job.payload)
        .bind(job.status)
        .bind(job.created_at)
        .bind(job.printed_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Worker-side: the oldest still-queued jobs, FIFO.
    pub async fn fetch_queued(&self, limit: u32) -> DbResult<Vec<PrintJob>> {
        let jobs = sqlx::query_as::<_, PrintJob>(
            r#"
            SELECT id, event_id, order_id, payload, status, created_at, printed_at
            FROM print_jobs
            WHERE status = 'queued'
            ORDER BY created_at
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(jobs)
    }

    /// Worker-side: retires a job after it came off the printer.
    pub async fn mark_printed(&self, id: &str, printed_at: DateTime<Utc>) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE print_jobs
            SET status = 'printed', printed_at = ?2
            WHERE id = ?1 AND status = 'queued'
            "#,
        )
        .bind(id)
        .bind(printed_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("PrintJob (queued)", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use kassa_core::{Bar, Order, OrderStatus, PaymentMethod, PrintJobStatus};
    use uuid::Uuid;

    async fn seeded_order(db: &Database) -> Order {
        let bar = Bar {
            id: Uuid::new_v4().to_string(),
            event_id: "seefest-2026".to_string(),
            name: "Beer Garden".to_string(),
            is_active: true,
            created_at: Utc::now(),
        };
        db.bars().insert(&bar).await.unwrap();

        let order = Order {
            id: Uuid::new_v4().to_string(),
            event_id: "seefest-2026".to_string(),
            bar_id: bar.id,
            device_id: "pos-01".to_string(),
            cashier_id: None,
            cashier_name: None,
            cashier_role: None,
            receipt_number: "SEEFES-00001".to_string(),
            short_number: 1,
            public_token: Uuid::new_v4().to_string(),
            payment_method: PaymentMethod::Cash,
            status: OrderStatus::Completed,
            gross_cents: 250,
            tax_cents: 42,
            net_cents: 208,
            tax_rate_bps: 2000,
            created_at: Utc::now(),
            voided_at: None,
        };
        db.orders().insert_with_items(&order, &[]).await.unwrap();
        order
    }

    fn job(order: &Order, payload: &str) -> PrintJob {
        PrintJob {
            id: Uuid::new_v4().to_string(),
            event_id: order.event_id.clone(),
            order_id: order.id.clone(),
            payload: payload.to_string(),
            status: PrintJobStatus::Queued,
            created_at: Utc::now(),
            printed_at: None,
        }
    }

    #[tokio::test]
    async fn test_enqueue_and_fetch_fifo() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let order = seeded_order(&db).await;
        let repo = db.print_jobs();

        let mut first = job(&order, "first");
        first.created_at = Utc::now() - chrono::Duration::seconds(10);
        repo.enqueue(&first).await.unwrap();
        repo.enqueue(&job(&order, "second")).await.unwrap();

        let queued = repo.fetch_queued(10).await.unwrap();
        assert_eq!(queued.len(), 2);
        assert_eq!(queued[0].payload, "first");
        assert_eq!(queued[1].payload, "second");
        assert!(queued.iter().all(|j| j.status == PrintJobStatus::Queued));
    }

    #[tokio::test]
    async fn test_mark_printed_retires_job() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let order = seeded_order(&db).await;
        let repo = db.print_jobs();

        let j = job(&order, "payload");
        repo.enqueue(&j).await.unwrap();

        repo.mark_printed(&j.id, Utc::now()).await.unwrap();
        assert!(repo.fetch_queued(10).await.unwrap().is_empty());

        // Retiring twice is the worker's bug, not a silent success
        assert!(repo.mark_printed(&j.id, Utc::now()).await.is_err());
    }
}
