//! # Report Repository
//!
//! Read-side rollups over completed orders. Voided orders are excluded by
//! filtering on `status = 'completed'` inside every query — the exclusion
//! happens at the query boundary, never by post-processing rows that were
//! already fetched.
//!
//! All sums run over integer cents, so accumulating thousands of rows is
//! exact; there is no float drift to round away.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::DbResult;

/// Grand totals over completed orders in range.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TotalsRow {
    pub order_count: i64,
    pub gross_cents: i64,
    pub tax_cents: i64,
    pub net_cents: i64,
}

/// Per-bar rollup. Grouped by bar name, descending by gross.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct BarTotalsRow {
    pub bar_name: String,
    pub gross_cents: i64,
    pub order_count: i64,
}

/// Per-product rollup. Grouped by the name snapshot — not the product id —
/// so historical reports stay stable when a product is renamed or deleted.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ProductTotalsRow {
    pub name: String,
    pub quantity: i64,
    pub gross_cents: i64,
}

/// Repository for report aggregation queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Count and money totals of completed orders, optionally restricted
    /// to those created at or after `since`.
    pub async fn grand_totals(
        &self,
        event_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> DbResult<TotalsRow> {
        let row = sqlx::query_as::<_, TotalsRow>(
            r#"
            SELECT COUNT(*)                      AS order_count,
                   COALESCE(SUM(gross_cents), 0) AS gross_cents,
                   COALESCE(SUM(tax_cents), 0)   AS tax_cents,
                   COALESCE(SUM(net_cents), 0)   AS net_cents
            FROM orders
            WHERE event_id = ?1
              AND status = 'completed'
              AND (?2 IS NULL OR created_at >= ?2)
            "#,
        )
        .bind(event_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Gross and order count per bar name, descending by gross.
    pub async fn totals_by_bar(
        &self,
        event_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> DbResult<Vec<BarTotalsRow>> {
        let rows = sqlx::query_as::<_, BarTotalsRow>(
            r#"
            SELECT b.name                 AS bar_name,
                   SUM(o.gross_cents)     AS gross_cents,
                   COUNT(*)               AS order_count
            FROM orders o
            INNER JOIN bars b ON b.id = o.bar_id
            WHERE o.event_id = ?1
              AND o.status = 'completed'
              AND (?2 IS NULL OR o.created_at >= ?2)
            GROUP BY b.name
            ORDER BY gross_cents DESC, bar_name
            "#,
        )
        .bind(event_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Quantity and gross per product name snapshot, descending by gross,
    /// truncated to the top `limit` entries.
    pub async fn totals_by_product(
        &self,
        event_id: &str,
        since: Option<DateTime<Utc>>,
        limit: u32,
    ) -> DbResult<Vec<ProductTotalsRow>> {
        let rows = sqlx::query_as::<_, ProductTotalsRow>(
            r#"
            SELECT i.name_snapshot          AS name,
                   SUM(i.quantity)          AS quantity,
                   SUM(i.line_total_cents)  AS gross_cents
            FROM order_items i
            INNER JOIN orders o ON o.id = i.order_id
            WHERE o.event_id = ?1
              AND o.status = 'completed'
              AND (?2 IS NULL OR o.created_at >= ?2)
            GROUP BY i.name_snapshot
            ORDER BY gross_cents DESC, name
            LIMIT ?3
            "#,
        )
        .bind(event_id)
        .bind(since)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
