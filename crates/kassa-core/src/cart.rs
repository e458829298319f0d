//! # Cart
//!
//! The in-memory draft of a sale: product lines with quantities, owned by
//! exactly one session. Pure value semantics; the cart never touches
//! persistence and has no side effects beyond its own state.
//!
//! ## Lifetime
//! Created empty when a bar is selected; cleared on finalize, cancel, bar
//! change, and logout. A persisted order is born from a cart snapshot, the
//! cart itself is never stored.
//!
//! ## Forgiving operations
//! `increment`/`decrement` on a product id that is not in the cart are
//! no-ops, not errors: the UI fires them from buttons that may be
//! double-clicked or raced against a clear.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::Product;

/// One line of the cart.
///
/// Name and price are copied from the product at add time (snapshot
/// pattern), so a menu edit mid-sale cannot change a cart under the
/// cashier's hands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Gross unit price in cents at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Always ≥ 1; a line at quantity 0 is removed instead.
    pub quantity: i64,
}

impl CartLine {
    /// Line total (unit price × quantity), exact in cents.
    #[inline]
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents())
    }
}

/// The cart: lines keyed by product id, kept in insertion order so the
/// receipt prints items in the order they were rung up.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds one unit of a product: increments the existing line or inserts
    /// a new one at quantity 1.
    pub fn add(&mut self, product: &Product) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            line.quantity += 1;
            return;
        }

        self.lines.push(CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price_cents: product.price_cents,
            quantity: 1,
        });
    }

    /// Adds one unit to an existing line. Unknown product ids are a no-op.
    pub fn increment(&mut self, product_id: &str) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity += 1;
        }
    }

    /// Removes one unit from an existing line; removing the last unit
    /// removes the line entirely. Unknown product ids are a no-op.
    pub fn decrement(&mut self, product_id: &str) {
        if let Some(pos) = self.lines.iter().position(|l| l.product_id == product_id) {
            if self.lines[pos].quantity > 1 {
                self.lines[pos].quantity -= 1;
            } else {
                self.lines.remove(pos);
            }
        }
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Gross total in cents: Σ unit price × quantity. Exact, no rounding.
    pub fn gross_total_cents(&self) -> i64 {
        self.lines.iter().map(|l| l.line_total_cents()).sum()
    }

    /// Gross total as Money.
    pub fn gross_total(&self) -> Money {
        Money::from_cents(self.gross_total_cents())
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
