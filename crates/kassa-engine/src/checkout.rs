//! # Checkout
//!
//! The order lifecycle state machine:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Draft (a Cart, never persisted)                                         │
//! │      │ finalize                                                          │
//! │      ▼                                                                   │
//! │  Completed (persisted, numbered, totals frozen)                          │
//! │      │ void (see void.rs)                                                │
//! │      ▼                                                                   │
//! │  Voided (terminal)                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Finalize ordering
//! The receipt number is obtained BEFORE anything is persisted, so a
//! persisted order always carries a valid unique number, and a sequencer
//! failure leaves nothing behind. Order and items commit in one
//! transaction. Printing comes last and is best-effort: an enqueue failure
//! is reported, the completed sale stands.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::sequence::Sequencer;
use crate::session::{LastReceipt, Session};
use crate::token::generate_public_token;
use kassa_core::{
    Order, OrderItem, OrderStatus, PaymentMethod, PrintJob, PrintJobStatus, ReceiptDocument,
    ValidationError,
};
use kassa_db::Database;

/// What the caller gets back from a successful finalize: the identifiers
/// and frozen totals of the new receipt.
#[derive(Debug, Clone)]
pub struct Receipt {
    pub order_id: String,
    pub receipt_number: String,
    pub short_number: i64,
    pub public_token: String,
    pub gross_cents: i64,
    pub tax_cents: i64,
    pub net_cents: i64,

    /// False when printing was requested but the enqueue failed; the sale
    /// itself stands either way.
    pub print_queued: bool,
}

/// Finalize, reprint, and the public receipt view.
#[derive(Clone)]
pub struct CheckoutService {
    db: Database,
    sequencer: Arc<dyn Sequencer>,
    config: EngineConfig,
}

impl CheckoutService {
    pub(crate) fn new(db: Database, sequencer: Arc<dyn Sequencer>, config: EngineConfig) -> Self {
        CheckoutService {
            db,
            sequencer,
            config,
        }
    }

    /// Turns the session's cart into a completed, numbered order.
    ///
    /// Preconditions: a bar is selected, the cart is non-empty, and a
    /// cashier is signed in when the deployment requires one. On success
    /// the session's cart is cleared and its last-receipt reference is
    /// updated for the self-service void window.
    pub async fn finalize(
        &self,
        session: &Session,
        payment_method: PaymentMethod,
        print_requested: bool,
    ) -> EngineResult<Receipt> {
        let (bar, cart, cashier) = session.checkout_snapshot();

        let bar = bar.ok_or_else(|| ValidationError::required("bar"))?;
        if cart.is_empty() {
            return Err(ValidationError::empty("cart").into());
        }
        if self.config.require_cashier && cashier.is_none() {
            return Err(ValidationError::required("cashier").into());
        }

        // Number first: no number, no sale.
        let numbering = self.sequencer.next(&self.config.event_id).await?;

        let breakdown = cart.gross_total().split_inclusive(self.config.tax_rate());
        let public_token = generate_public_token();
        let now = Utc::now();
        let order_id = Uuid::new_v4().to_string();

        let order = Order {
            id: order_id.clone(),
            event_id: self.config.event_id.clone(),
            bar_id: bar.bar_id.clone(),
            device_id: self.config.device_id.clone(),
            cashier_id: cashier.as_ref().map(|c| c.id.clone()),
            cashier_name: cashier.as_ref().map(|c| c.name.clone()),
            cashier_role: cashier.as_ref().map(|c| c.role),
            receipt_number: numbering.receipt_number.clone(),
            short_number: numbering.short_number,
            public_token: public_token.clone(),
            payment_method,
            status: OrderStatus::Completed,
            gross_cents: breakdown.gross.cents(),
            tax_cents: breakdown.tax.cents(),
            net_cents: breakdown.net.cents(),
            tax_rate_bps: self.config.tax_rate_bps,
            created_at: now,
            voided_at: None,
        };

        let items: Vec<OrderItem> = cart
            .lines()
            .iter()
            .map(|line| OrderItem {
                id: Uuid::new_v4().to_string(),
                order_id: order_id.clone(),
                name_snapshot: line.name.clone(),
                unit_price_cents: line.unit_price_cents,
                quantity: line.quantity,
                line_total_cents: line.line_total_cents(),
                created_at: now,
            })
            .collect();

        self.db.orders().insert_with_items(&order, &items).await?;

        let mut print_queued = false;
        if print_requested {
            let payload = ReceiptDocument::from_order(&order, &items, &bar.bar_name).render();
            match self.enqueue_print(&order.id, payload).await {
                Ok(()) => print_queued = true,
                Err(e) => {
                    // The sale stands; the operator sees print_queued=false
                    // and this log line.
                    error!(
                        order_id = %order.id,
                        receipt_number = %order.receipt_number,
                        error = %e,
                        "Print enqueue failed after completed sale"
                    );
                }
            }
        }

        session.complete_sale(LastReceipt {
            order_id: order.id.clone(),
            receipt_number: order.receipt_number.clone(),
        });

        info!(
            order_id = %order.id,
            receipt_number = %order.receipt_number,
            gross_cents = order.gross_cents,
            items = items.len(),
            "Sale finalized"
        );

        Ok(Receipt {
            order_id: order.id,
            receipt_number: order.receipt_number,
            short_number: order.short_number,
            public_token,
            gross_cents: order.gross_cents,
            tax_cents: order.tax_cents,
            net_cents: order.net_cents,
            print_queued,
        })
    }

    /// Re-renders a receipt through the same renderer used at finalize
    /// time and enqueues a new print job. Voided orders reprint too (for
    /// records), with their status marked in the rendered text.
    pub async fn reprint(&self, receipt_number: &str) -> EngineResult<()> {
        let order = self
            .db
            .orders()
            .get_by_receipt(&self.config.event_id, receipt_number)
            .await?
            .ok_or_else(|| EngineError::not_found("Order"))?;

        let payload = self.render_order(&order).await?;
        self.enqueue_print(&order.id, payload).await?;

        info!(
            order_id = %order.id,
            receipt_number = %order.receipt_number,
            voided = order.is_voided(),
            "Receipt reprint queued"
        );

        Ok(())
    }

    /// Public receipt view: resolves a token to its rendered receipt.
    /// Unknown tokens get a uniform not-found, with no hint whether the
    /// token was malformed or simply absent.
    pub async fn receipt_by_token(&self, public_token: &str) -> EngineResult<String> {
        let order = self
            .db
            .orders()
            .get_by_token(public_token)
            .await?
            .ok_or_else(|| EngineError::not_found("Receipt"))?;

        debug!(order_id = %order.id, "Public receipt lookup");

        self.render_order(&order).await
    }

    /// Loads an order's items and bar name and renders the receipt text.
    async fn render_order(&self, order: &Order) -> EngineResult<String> {
        let items = self.db.orders().items(&order.id).await?;
        let bar = self
            .db
            .bars()
            .get_by_id(&order.bar_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Bar"))?;

        Ok(ReceiptDocument::from_order(order, &items, &bar.name).render())
    }

    async fn enqueue_print(&self, order_id: &str, payload: String) -> EngineResult<()> {
        let job = PrintJob {
            id: Uuid::new_v4().to_string(),
            event_id: self.config.event_id.clone(),
            order_id: order_id.to_string(),
            payload,
            status: PrintJobStatus::Queued,
            created_at: Utc::now(),
            printed_at: None,
        };
        self.db.print_jobs().enqueue(&job).await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::sequence::ReceiptIdentity;
    use crate::testutil::{rigged_engine, session_with_sale, staff, TestRig};
    use async_trait::async_trait;

    #[tokio::test]
    async fn test_finalize_happy_path() {
        let rig = rigged_engine().await;
        let session = session_with_sale(&rig);

        let receipt = rig
            .engine
            .checkout()
            .finalize(&session, PaymentMethod::Cash, true)
            .await
            .unwrap();

        assert_eq!(receipt.receipt_number, "SEEFES-00001");
        assert_eq!(receipt.short_number, 1);
        assert_eq!(receipt.public_token.len(), 40);
        assert_eq!(receipt.gross_cents, 800);
        assert_eq!(receipt.tax_cents, 133);
        assert_eq!(receipt.net_cents, 667);
        assert!(receipt.print_queued);

        // The persisted order is completed with frozen totals...
        let order = rig
            .engine
            .db()
            .orders()
            .get_by_id(&receipt.order_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.gross_cents, order.tax_cents + order.net_cents);
        assert_eq!(order.cashier_label().as_deref(), Some("staff:Alice"));

        // ...and its items sum to the gross.
        let items = rig.engine.db().orders().items(&order.id).await.unwrap();
        assert!(!items.is_empty());
        let line_sum: i64 = items.iter().map(|i| i.line_total_cents).sum();
        assert_eq!(line_sum, order.gross_cents);

        // The session moved on: cart cleared, last receipt recorded.
        assert!(session.cart().is_empty());
        assert_eq!(
            session.last_receipt().unwrap().receipt_number,
            "SEEFES-00001"
        );
    }

    /// The queued payload is exactly what re-rendering the stored order
    /// produces - reprints will be byte-identical.
    #[tokio::test]
    async fn test_finalize_enqueues_rendered_receipt() {
        let rig = rigged_engine().await;
        let session = session_with_sale(&rig);

        let receipt = rig
            .engine
            .checkout()
            .finalize(&session, PaymentMethod::Cash, true)
            .await
            .unwrap();

        let jobs = rig.engine.db().print_jobs().fetch_queued(10).await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].order_id, receipt.order_id);
        assert!(jobs[0].payload.contains("SEEFES-00001"));
        assert!(jobs[0].payload.contains("Beer Garden"));

        let order = rig
            .engine
            .db()
            .orders()
            .get_by_id(&receipt.order_id)
            .await
            .unwrap()
            .unwrap();
        let items = rig.engine.db().orders().items(&order.id).await.unwrap();
        let expected = ReceiptDocument::from_order(&order, &items, "Beer Garden").render();
        assert_eq!(jobs[0].payload, expected);
    }

    #[tokio::test]
    async fn test_finalize_without_print_queues_nothing() {
        let rig = rigged_engine().await;
        let session = session_with_sale(&rig);

        let receipt = rig
            .engine
            .checkout()
            .finalize(&session, PaymentMethod::Card, false)
            .await
            .unwrap();

        assert!(!receipt.print_queued);
        assert!(rig
            .engine
            .db()
            .print_jobs()
            .fetch_queued(10)
            .await
            .unwrap()
            .is_empty());
    }

    /// Two independent callers in rapid succession get consecutive,
    /// non-colliding short numbers.
    #[tokio::test]
    async fn test_consecutive_finalizes_get_consecutive_numbers() {
        let rig = rigged_engine().await;

        let first_session = session_with_sale(&rig);
        let second_session = session_with_sale(&rig);

        let first = rig
            .engine
            .checkout()
            .finalize(&first_session, PaymentMethod::Cash, false)
            .await
            .unwrap();
        let second = rig
            .engine
            .checkout()
            .finalize(&second_session, PaymentMethod::Cash, false)
            .await
            .unwrap();

        assert_eq!(first.short_number + 1, second.short_number);
        assert_ne!(first.receipt_number, second.receipt_number);
        assert_ne!(first.public_token, second.public_token);
    }

    #[tokio::test]
    async fn test_finalize_rejects_missing_bar() {
        let rig = rigged_engine().await;
        let session = Session::new();
        session.sign_in(staff());

        let err = rig
            .engine
            .checkout()
            .finalize(&session, PaymentMethod::Cash, false)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        // Nothing was numbered or written.
        assert_eq!(
            rig.engine.db().counters().current(&rig.engine.config().event_id).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_finalize_rejects_empty_cart() {
        let rig = rigged_engine().await;
        let session = Session::new();
        session.select_bar(&rig.bar);
        session.sign_in(staff());

        let err = rig
            .engine
            .checkout()
            .finalize(&session, PaymentMethod::Cash, false)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[tokio::test]
    async fn test_finalize_rejects_missing_cashier_when_required() {
        let rig = rigged_engine().await;
        let session = Session::new();
        session.select_bar(&rig.bar);
        session.add_to_cart(&rig.products[0]);

        let err = rig
            .engine
            .checkout()
            .finalize(&session, PaymentMethod::Cash, false)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[tokio::test]
    async fn test_anonymous_finalize_when_not_required() {
        let rig = TestRig::with_config(|c| c.require_cashier(false)).await;
        let session = Session::new();
        session.select_bar(&rig.bar);
        session.add_to_cart(&rig.products[0]);

        let receipt = rig
            .engine
            .checkout()
            .finalize(&session, PaymentMethod::Cash, false)
            .await
            .unwrap();

        let order = rig
            .engine
            .db()
            .orders()
            .get_by_id(&receipt.order_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(order.cashier_id, None);
        assert_eq!(order.cashier_label(), None);
    }

    struct FailingSequencer;

    #[async_trait]
    impl Sequencer for FailingSequencer {
        async fn next(&self, _event_id: &str) -> EngineResult<ReceiptIdentity> {
            Err(EngineError::Sequencing("counter offline".to_string()))
        }
    }

    /// No number, no sale: a sequencer failure must leave zero orders.
    #[tokio::test]
    async fn test_sequencing_failure_creates_no_order() {
        let rig = TestRig::with_sequencer(Arc::new(FailingSequencer)).await;
        let session = session_with_sale(&rig);

        let err = rig
            .engine
            .checkout()
            .finalize(&session, PaymentMethod::Cash, true)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Sequencing(_)));
        assert!(err.is_retryable());

        let totals = rig
            .engine
            .db()
            .reports()
            .grand_totals(&rig.engine.config().event_id, None)
            .await
            .unwrap();
        assert_eq!(totals.order_count, 0);

        // The cart survives for a retry.
        assert!(!session.cart().is_empty());
    }

    #[tokio::test]
    async fn test_reprint_is_byte_identical() {
        let rig = rigged_engine().await;
        let session = session_with_sale(&rig);

        let receipt = rig
            .engine
            .checkout()
            .finalize(&session, PaymentMethod::Cash, true)
            .await
            .unwrap();

        rig.engine
            .checkout()
            .reprint(&receipt.receipt_number)
            .await
            .unwrap();

        let jobs = rig.engine.db().print_jobs().fetch_queued(10).await.unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].payload, jobs[1].payload);
    }

    #[tokio::test]
    async fn test_reprint_of_voided_order_shows_status() {
        let rig = rigged_engine().await;
        let session = session_with_sale(&rig);

        let receipt = rig
            .engine
            .checkout()
            .finalize(&session, PaymentMethod::Cash, false)
            .await
            .unwrap();

        rig.engine
            .db()
            .orders()
            .void_order(&receipt.order_id, "admin:Bob", "test", Utc::now())
            .await
            .unwrap()
            .unwrap();

        rig.engine
            .checkout()
            .reprint(&receipt.receipt_number)
            .await
            .unwrap();

        let jobs = rig.engine.db().print_jobs().fetch_queued(10).await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert!(jobs[0].payload.contains("*** VOIDED ***"));
        // Item lines and totals render unchanged.
        assert!(jobs[0].payload.contains("Beer 0.5l"));
        assert!(jobs[0].payload.contains("€8.00"));
    }

    #[tokio::test]
    async fn test_reprint_unknown_receipt() {
        let rig = rigged_engine().await;

        let err = rig
            .engine
            .checkout()
            .reprint("SEEFES-99999")
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_public_receipt_lookup() {
        let rig = rigged_engine().await;
        let session = session_with_sale(&rig);

        let receipt = rig
            .engine
            .checkout()
            .finalize(&session, PaymentMethod::Cash, false)
            .await
            .unwrap();

        let text = rig
            .engine
            .checkout()
            .receipt_by_token(&receipt.public_token)
            .await
            .unwrap();
        assert!(text.contains(&receipt.receipt_number));
        assert!(text.contains("€8.00"));
    }

    /// Unknown and malformed tokens are indistinguishable.
    #[tokio::test]
    async fn test_public_lookup_unknown_token_is_uniform() {
        let rig = rigged_engine().await;

        let absent = rig
            .engine
            .checkout()
            .receipt_by_token(&"a".repeat(40))
            .await
            .unwrap_err();
        let malformed = rig
            .engine
            .checkout()
            .receipt_by_token("!!")
            .await
            .unwrap_err();

        assert_eq!(absent.to_string(), malformed.to_string());
        assert!(matches!(absent, EngineError::NotFound { .. }));
    }
}
