//! # Reporting
//!
//! Read-side rollups over completed orders: grand totals, per-bar, and
//! per-product breakdowns for a time range. Voided orders never enter any
//! figure - the repository filters on status at the query boundary, so
//! there is nothing to subtract out afterwards.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::EngineResult;
use kassa_db::repository::report::{BarTotalsRow, ProductTotalsRow};
use kassa_db::Database;

/// Time range of a report run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportRange {
    /// Everything the event has sold.
    All,
    /// Since the start of the current UTC day. Deterministic across
    /// devices, which matters more here than local midnight.
    Today,
}

impl ReportRange {
    /// Lower bound for the query, if any.
    pub fn since(&self) -> Option<DateTime<Utc>> {
        match self {
            ReportRange::All => None,
            ReportRange::Today => {
                Some(Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc())
            }
        }
    }
}

/// A complete report run over one event.
#[derive(Debug, Clone)]
pub struct SalesReport {
    pub range: ReportRange,

    /// Completed orders in range.
    pub order_count: i64,
    pub gross_cents: i64,
    pub tax_cents: i64,
    pub net_cents: i64,

    /// Per-bar breakdown, descending by gross.
    pub by_bar: Vec<BarTotalsRow>,

    /// Per-product breakdown (grouped by name snapshot), descending by
    /// gross, truncated to the configured top-N.
    pub top_products: Vec<ProductTotalsRow>,
}

/// The reporting aggregator.
#[derive(Clone)]
pub struct ReportService {
    db: Database,
    config: EngineConfig,
}

impl ReportService {
    pub(crate) fn new(db: Database, config: EngineConfig) -> Self {
        ReportService { db, config }
    }

    /// Runs the full rollup for the configured event.
    pub async fn sales_report(&self, range: ReportRange) -> EngineResult<SalesReport> {
        let since = range.since();
        let event_id = &self.config.event_id;

        debug!(event_id = %event_id, ?range, "Running sales report");

        let totals = self.db.reports().grand_totals(event_id, since).await?;
        let by_bar = self.db.reports().totals_by_bar(event_id, since).await?;
        let top_products = self
            .db
            .reports()
            .totals_by_product(event_id, since, self.config.report_top_products)
            .await?;

        Ok(SalesReport {
            range,
            order_count: totals.order_count,
            gross_cents: totals.gross_cents,
            tax_cents: totals.tax_cents,
            net_cents: totals.net_cents,
            by_bar,
            top_products,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{rigged_engine, session_with_sale, ADMIN_PIN, TestRig};
    use kassa_core::PaymentMethod;

    #[tokio::test]
    async fn test_report_rolls_up_completed_orders() {
        let rig = rigged_engine().await;

        for _ in 0..2 {
            let session = session_with_sale(&rig);
            rig.engine
                .checkout()
                .finalize(&session, PaymentMethod::Cash, false)
                .await
                .unwrap();
        }

        let report = rig
            .engine
            .reports()
            .sales_report(ReportRange::All)
            .await
            .unwrap();

        assert_eq!(report.order_count, 2);
        assert_eq!(report.gross_cents, 1600);
        assert_eq!(report.gross_cents, report.tax_cents + report.net_cents);

        assert_eq!(report.by_bar.len(), 1);
        assert_eq!(report.by_bar[0].bar_name, "Beer Garden");
        assert_eq!(report.by_bar[0].gross_cents, 1600);
        assert_eq!(report.by_bar[0].order_count, 2);

        // Beer: 2×2 units à 250 = 1000; Bratwurst: 2×1 à 300 = 600.
        assert_eq!(report.top_products.len(), 2);
        assert_eq!(report.top_products[0].name, "Beer 0.5l");
        assert_eq!(report.top_products[0].quantity, 4);
        assert_eq!(report.top_products[0].gross_cents, 1000);
        assert_eq!(report.top_products[1].name, "Bratwurst");
    }

    /// Voiding an order removes it from the next run without touching the
    /// other totals.
    #[tokio::test]
    async fn test_void_removes_order_from_next_run() {
        let rig = rigged_engine().await;

        let keep_session = session_with_sale(&rig);
        rig.engine
            .checkout()
            .finalize(&keep_session, PaymentMethod::Cash, false)
            .await
            .unwrap();

        let void_session = session_with_sale(&rig);
        let voided = rig
            .engine
            .checkout()
            .finalize(&void_session, PaymentMethod::Cash, false)
            .await
            .unwrap();

        let before = rig
            .engine
            .reports()
            .sales_report(ReportRange::All)
            .await
            .unwrap();
        assert_eq!(before.order_count, 2);

        rig.engine
            .voids()
            .void_by_receipt(ADMIN_PIN, &voided.receipt_number, "report test")
            .await
            .unwrap();

        let after = rig
            .engine
            .reports()
            .sales_report(ReportRange::All)
            .await
            .unwrap();
        assert_eq!(after.order_count, 1);
        assert_eq!(after.gross_cents, before.gross_cents - voided.gross_cents);
        assert_eq!(after.by_bar[0].order_count, 1);
    }

    #[tokio::test]
    async fn test_today_range_includes_fresh_orders() {
        let rig = rigged_engine().await;
        let session = session_with_sale(&rig);
        rig.engine
            .checkout()
            .finalize(&session, PaymentMethod::Cash, false)
            .await
            .unwrap();

        let report = rig
            .engine
            .reports()
            .sales_report(ReportRange::Today)
            .await
            .unwrap();
        assert_eq!(report.order_count, 1);
    }

    #[tokio::test]
    async fn test_top_products_honors_configured_truncation() {
        let rig = TestRig::with_config(|c| c.report_top_products(1)).await;
        let session = session_with_sale(&rig);
        rig.engine
            .checkout()
            .finalize(&session, PaymentMethod::Cash, false)
            .await
            .unwrap();

        let report = rig
            .engine
            .reports()
            .sales_report(ReportRange::All)
            .await
            .unwrap();
        assert_eq!(report.top_products.len(), 1);
        assert_eq!(report.top_products[0].name, "Beer 0.5l");
    }
}
