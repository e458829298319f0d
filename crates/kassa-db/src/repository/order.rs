//! # Order Repository
//!
//! Database operations for orders, their items, and the void audit trail.
//!
//! ## Transaction Boundaries
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  insert_with_items:  INSERT order + INSERT items   (one transaction)    │
//! │     A committed order always has its items; readers never see a sale   │
//! │     without lines.                                                      │
//! │                                                                         │
//! │  void_order:  guarded UPDATE status + INSERT void_record (one txn)      │
//! │     An order is never voided without its audit record, and vice versa. │
//! │     The UPDATE is guarded on status='completed', so a concurrent       │
//! │     double-void loses the race and reports it instead of recording a   │
//! │     second reversal.                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use kassa_core::{Order, OrderItem, VoidRecord};

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Persists an order and its items as a single logical unit.
    ///
    /// Everything commits or nothing does; a failure at any item leaves no
    /// partial order visible to readers.
    pub async fn insert_with_items(&self, order: &Order, items: &[OrderItem]) -> DbResult<()> {
        debug!(
            id = %order.id,
            receipt_number = %order.receipt_number,
            items = items.len(),
            "Inserting order"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, event_id, bar_id, device_id,
                cashier_id, cashier_name, cashier_role,
                receipt_number, short_number, public_token,
                payment_method, status,
                gross_cents, tax_cents, net_cents, tax_rate_bps,
                created_at, voided_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7,
                ?8, ?9, ?10,
                ?11, ?12,
                ?13, ?14, ?15, ?16,
                ?17, ?18
            )
            "#,
        )
        .bind(&order.id)
        .bind(&order.event_id)
        .bind(&order.bar_id)
        .bind(&order.device_id)
        .bind(&order.cashier_id)
        .bind(&order.cashier_name)
        .bind(order.cashier_role)
        .bind(&order.receipt_number)
        .bind(order.short_number)
        .bind(&order.public_token)
        .bind(order.payment_method)
        .bind(order.status)
        .bind(order.gross_cents)
        .bind(order.tax_cents)
        .bind(order.net_cents)
        .bind(order.tax_rate_bps)
        .bind(order.created_at)
        .bind(order.voided_at)
        .execute(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO order_items (
                    id, order_id, name_snapshot, unit_price_cents,
                    quantity, line_total_cents, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(&item.id)
            .bind(&item.order_id)
            .bind(&item.name_snapshot)
            .bind(item.unit_price_cents)
            .bind(item.quantity)
            .bind(item.line_total_cents)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, event_id, bar_id, device_id,
                   cashier_id, cashier_name, cashier_role,
                   receipt_number, short_number, public_token,
                   payment_method, status,
                   gross_cents, tax_cents, net_cents, tax_rate_bps,
                   created_at, voided_at
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets an order by its per-event receipt number.
    pub async fn get_by_receipt(
        &self,
        event_id: &str,
        receipt_number: &str,
    ) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, event_id, bar_id, device_id,
                   cashier_id, cashier_name, cashier_role,
                   receipt_number, short_number, public_token,
                   payment_method, status,
                   gross_cents, tax_cents, net_cents, tax_rate_bps,
                   created_at, voided_at
            FROM orders
            WHERE event_id = ?1 AND receipt_number = ?2
            "#,
        )
        .bind(event_id)
        .bind(receipt_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets an order by its public access token. The token is the sole
    /// access control on the public receipt view; callers must treat a
    /// miss as a uniform not-found.
    pub async fn get_by_token(&self, public_token: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, event_id, bar_id, device_id,
                   cashier_id, cashier_name, cashier_role,
                   receipt_number, short_number, public_token,
                   payment_method, status,
                   gross_cents, tax_cents, net_cents, tax_rate_bps,
                   created_at, voided_at
            FROM orders
            WHERE public_token = ?1
            "#,
        )
        .bind(public_token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets all items of an order, in ring-up order.
    pub async fn items(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, name_snapshot, unit_price_cents,
                   quantity, line_total_cents, created_at
            FROM order_items
            WHERE order_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Performs the completed → voided transition with its audit record,
    /// atomically.
    ///
    /// Returns `None` when the status guard matched no row: the order was
    /// already voided (possibly by a concurrent caller). The caller maps
    /// that to its AlreadyVoided error; it is never silently absorbed.
    pub async fn void_order(
        &self,
        order_id: &str,
        actor: &str,
        reason: &str,
        voided_at: DateTime<Utc>,
    ) -> DbResult<Option<VoidRecord>> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = 'voided', voided_at = ?2
            WHERE id = ?1 AND status = 'completed'
            "#,
        )
        .bind(order_id)
        .bind(voided_at)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let record = VoidRecord {
            id: Uuid::new_v4().to_string(),
            order_id: order_id.to_string(),
            actor: actor.to_string(),
            reason: reason.to_string(),
            created_at: voided_at,
        };

        sqlx::query(
            r#"
            INSERT INTO void_records (id, order_id, actor, reason, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&record.id)
        .bind(&record.order_id)
        .bind(&record.actor)
        .bind(&record.reason)
        .bind(record.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(order_id = %order_id, actor = %actor, "Order voided");

        Ok(Some(record))
    }

    /// Gets the audit records of an order, oldest first.
    pub async fn void_records(&self, order_id: &str) -> DbResult<Vec<VoidRecord>> {
        let records = sqlx::query_as::<_, VoidRecord>(
            r#"
            SELECT id, order_id, actor, reason, created_at
            FROM void_records
            WHERE order_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
