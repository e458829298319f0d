//! # Session State
//!
//! One register session: the selected bar, the cart, the signed-in
//! cashier, and the last finalized receipt. A session belongs to exactly
//! one device; the mutex exists because the surrounding command handlers
//! may run on different executor threads, not because sessions are shared.
//!
//! ## Cart lifetime
//! The cart is cleared on finalize, cancel, bar change, and sign-out — a
//! cart never survives a context switch it wasn't built in.
//!
//! ## Last receipt
//! The self-service void path may target only the most recently finalized
//! order of this session. That reference is tracked HERE, server-side,
//! rather than trusting a client-held order id — an explicit trust
//! boundary for the kiosk threat model.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::auth::Identity;
use kassa_core::{Bar, Cart, Product};

/// Bar selection snapshot. The name is captured at selection time so
/// finalize can render receipts without re-reading the bar row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarSelection {
    pub bar_id: String,
    pub bar_name: String,
}

/// The most recently finalized order of this session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastReceipt {
    pub order_id: String,
    pub receipt_number: String,
}

#[derive(Debug, Default)]
struct SessionInner {
    bar: Option<BarSelection>,
    cart: Cart,
    cashier: Option<Identity>,
    last_receipt: Option<LastReceipt>,
}

/// Mutex-guarded session state for one device.
#[derive(Debug, Default)]
pub struct Session {
    inner: Mutex<SessionInner>,
}

impl Session {
    /// Creates a fresh session: no bar, empty cart, nobody signed in.
    pub fn new() -> Self {
        Session::default()
    }

    /// Selects a bar and clears the cart.
    pub fn select_bar(&self, bar: &Bar) {
        let mut inner = self.lock();
        inner.bar = Some(BarSelection {
            bar_id: bar.id.clone(),
            bar_name: bar.name.clone(),
        });
        inner.cart.clear();
    }

    /// The currently selected bar, if any.
    pub fn selected_bar(&self) -> Option<BarSelection> {
        self.lock().bar.clone()
    }

    /// Signs a cashier in.
    pub fn sign_in(&self, identity: Identity) {
        self.lock().cashier = Some(identity);
    }

    /// Signs the cashier out and clears the cart.
    pub fn sign_out(&self) {
        let mut inner = self.lock();
        inner.cashier = None;
        inner.cart.clear();
    }

    /// The signed-in cashier, if any.
    pub fn cashier(&self) -> Option<Identity> {
        self.lock().cashier.clone()
    }

    /// Adds one unit of a product to the cart.
    pub fn add_to_cart(&self, product: &Product) {
        self.lock().cart.add(product);
    }

    /// Adds one unit to an existing cart line (no-op on unknown ids).
    pub fn increment(&self, product_id: &str) {
        self.lock().cart.increment(product_id);
    }

    /// Removes one unit from a cart line (no-op on unknown ids).
    pub fn decrement(&self, product_id: &str) {
        self.lock().cart.decrement(product_id);
    }

    /// Abandons the current cart without selling.
    pub fn cancel_sale(&self) {
        self.lock().cart.clear();
    }

    /// A copy of the current cart, for display.
    pub fn cart(&self) -> Cart {
        self.lock().cart.clone()
    }

    /// The session's most recently finalized receipt, if any.
    pub fn last_receipt(&self) -> Option<LastReceipt> {
        self.lock().last_receipt.clone()
    }

    /// Everything finalize needs, captured under one lock.
    pub(crate) fn checkout_snapshot(&self) -> (Option<BarSelection>, Cart, Option<Identity>) {
        let inner = self.lock();
        (inner.bar.clone(), inner.cart.clone(), inner.cashier.clone())
    }

    /// Records a completed sale: clears the cart and remembers the receipt
    /// for the self-service void window.
    pub(crate) fn complete_sale(&self, receipt: LastReceipt) {
        let mut inner = self.lock();
        inner.cart.clear();
        inner.last_receipt = Some(receipt);
    }

    /// Forgets the last receipt (it was voided).
    pub(crate) fn clear_last_receipt(&self) {
        self.lock().last_receipt = None;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionInner> {
        self.inner.lock().expect("session mutex poisoned")
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kassa_core::Role;

    fn bar(name: &str) -> Bar {
        Bar {
            id: format!("bar-{}", name),
            event_id: "seefest-2026".to_string(),
            name: name.to_string(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn product(id: &str, price_cents: i64) -> Product {
        Product {
            id: id.to_string(),
            bar_id: "bar-1".to_string(),
            name: format!("Product {}", id),
            price_cents,
            sort_order: 0,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_bar_change_clears_cart() {
        let session = Session::new();
        session.select_bar(&bar("Beer Garden"));
        session.add_to_cart(&product("p-1", 250));
        assert!(!session.cart().is_empty());

        session.select_bar(&bar("Wine Stand"));
        assert!(session.cart().is_empty());
        assert_eq!(session.selected_bar().unwrap().bar_name, "Wine Stand");
    }

    #[test]
    fn test_sign_out_clears_cart_and_cashier() {
        let session = Session::new();
        session.sign_in(Identity {
            id: "u-1".to_string(),
            name: "Alice".to_string(),
            role: Role::Staff,
        });
        session.add_to_cart(&product("p-1", 250));

        session.sign_out();
        assert!(session.cashier().is_none());
        assert!(session.cart().is_empty());
    }

    #[test]
    fn test_cancel_clears_cart_only() {
        let session = Session::new();
        session.select_bar(&bar("Beer Garden"));
        session.add_to_cart(&product("p-1", 250));

        session.cancel_sale();
        assert!(session.cart().is_empty());
        assert!(session.selected_bar().is_some());
    }

    #[test]
    fn test_complete_sale_records_last_receipt() {
        let session = Session::new();
        session.add_to_cart(&product("p-1", 250));

        session.complete_sale(LastReceipt {
            order_id: "o-1".to_string(),
            receipt_number: "SEEFES-00001".to_string(),
        });

        assert!(session.cart().is_empty());
        assert_eq!(
            session.last_receipt().unwrap().receipt_number,
            "SEEFES-00001"
        );

        session.clear_last_receipt();
        assert!(session.last_receipt().is_none());
    }

    #[test]
    fn test_cart_operations_pass_through() {
        let session = Session::new();
        let beer = product("p-1", 250);

        session.add_to_cart(&beer);
        session.increment("p-1");
        session.increment("ghost");
        assert_eq!(session.cart().total_quantity(), 2);

        session.decrement("p-1");
        session.decrement("p-1");
        assert!(session.cart().is_empty());
    }
}
