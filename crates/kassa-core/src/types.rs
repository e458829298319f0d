//! # Domain Types
//!
//! Core domain types of the order & receipt lifecycle.
//!
//! ## Entity Relationships
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Bar 1──n Product                  (live menu, editable)                │
//! │                                                                         │
//! │  Order 1──n OrderItem              (frozen snapshots, immutable)        │
//! │    │ 1──n VoidRecord               (append-only audit trail)            │
//! │    │ 1──n PrintJob                 (queue for the printer worker)       │
//! │                                                                         │
//! │  Orders snapshot product name/price at sale time: renaming or deleting │
//! │  a product never rewrites history.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Immutability
//! An `Order` is created with status `Completed` and frozen totals. The only
//! permitted mutation is the one-way transition to `Voided` (status +
//! `voided_at`); every other field is write-once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::{Money, TaxRate};

// =============================================================================
// Bar
// =============================================================================

/// A physical sales point within the event, owning its own product menu.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Bar {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Event this bar belongs to.
    pub event_id: String,

    /// Display name shown to cashiers and on receipts.
    pub name: String,

    /// Whether the bar is selectable (soft delete).
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A product on a bar's menu.
///
/// The stored price is gross (tax-inclusive). Orders copy name and price
/// into item snapshots, so this row may change freely afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Bar that sells this product.
    pub bar_id: String,

    /// Display name shown to cashier and on receipt.
    pub name: String,

    /// Gross unit price in cents (tax-inclusive).
    pub price_cents: i64,

    /// Position on the cashier's button grid.
    pub sort_order: i64,

    /// Whether the product is sellable (soft delete).
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the gross unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle status of an order.
///
/// Draft exists only as a Cart and is never persisted; persisted orders are
/// born `Completed`. `Voided` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Sale has been finalized; totals are frozen.
    Completed,
    /// Sale was reversed. The record is retained, never deleted.
    Voided,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer paid. A label only; no processor integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
}

impl PaymentMethod {
    /// Stable lowercase label used on receipts.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
        }
    }
}

// =============================================================================
// Role
// =============================================================================

/// Staff role carried by a cashier identity snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Staff,
    Admin,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Staff => "staff",
            Role::Admin => "admin",
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// The atomic unit of sale: a numbered, tax-decomposed, immutable receipt.
///
/// Invariants:
/// - `gross_cents == tax_cents + net_cents`
/// - `gross_cents` equals the sum of the order's item line totals
/// - `(event_id, receipt_number)`, `(event_id, short_number)` and
///   `public_token` are unique
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,
    pub event_id: String,
    pub bar_id: String,
    pub device_id: String,

    /// Cashier identity snapshot. All three are NULL for unauthenticated
    /// sessions.
    pub cashier_id: Option<String>,
    pub cashier_name: Option<String>,
    pub cashier_role: Option<Role>,

    /// Durable human-readable identifier, unique per event.
    pub receipt_number: String,

    /// The monotonic integer behind the receipt number.
    pub short_number: i64,

    /// Unguessable credential for the public receipt view.
    pub public_token: String,

    pub payment_method: PaymentMethod,
    pub status: OrderStatus,

    pub gross_cents: i64,
    pub tax_cents: i64,
    pub net_cents: i64,
    pub tax_rate_bps: u32,

    pub created_at: DateTime<Utc>,
    pub voided_at: Option<DateTime<Utc>>,
}

impl Order {
    #[inline]
    pub fn gross(&self) -> Money {
        Money::from_cents(self.gross_cents)
    }

    #[inline]
    pub fn tax(&self) -> Money {
        Money::from_cents(self.tax_cents)
    }

    #[inline]
    pub fn net(&self) -> Money {
        Money::from_cents(self.net_cents)
    }

    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    #[inline]
    pub fn is_voided(&self) -> bool {
        self.status == OrderStatus::Voided
    }

    /// `role:name` label for receipts, or None for unauthenticated sales.
    pub fn cashier_label(&self) -> Option<String> {
        match (&self.cashier_role, &self.cashier_name) {
            (Some(role), Some(name)) => Some(format!("{}:{}", role.as_str(), name)),
            _ => None,
        }
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line of an order. Snapshot pattern: product name and unit price are
/// copied at sale time and never touched again.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: String,

    /// Owning order. Items are created atomically with it and cannot
    /// outlive it.
    pub order_id: String,

    /// Product name at time of sale (frozen).
    pub name_snapshot: String,

    /// Gross unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,

    pub quantity: i64,

    /// unit price × quantity, in cents.
    pub line_total_cents: i64,

    pub created_at: DateTime<Utc>,
}

impl OrderItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

// =============================================================================
// Void Record
// =============================================================================

/// Append-only audit record written with every void, in the same
/// transaction as the order's status transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct VoidRecord {
    pub id: String,
    pub order_id: String,

    /// Who voided, as `role:name`.
    pub actor: String,

    /// Mandatory for administrative voids; empty string for the
    /// self-service path.
    pub reason: String,

    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Print Job
// =============================================================================

/// Status of a queued print job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum PrintJobStatus {
    Queued,
    Printed,
}

/// A rendering queued for the external printer worker.
///
/// The engine only ever inserts rows with status `Queued`; the
/// queued → printed transition belongs exclusively to the worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PrintJob {
    pub id: String,
    pub event_id: String,
    pub order_id: String,

    /// Rendered receipt text, ready for the printer.
    pub payload: String,

    pub status: PrintJobStatus,
    pub created_at: DateTime<Utc>,
    pub printed_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Receipt Numbers
// =============================================================================

/// Formats a short number into the durable receipt number.
///
/// The prefix is derived deterministically from the event id (first six
/// alphanumeric characters, uppercased), so the full number stays
/// human-readable and unique per event as long as the short number is.
///
/// ## Example
/// ```rust
/// use kassa_core::types::format_receipt_number;
///
/// assert_eq!(format_receipt_number("seefest-2026", 42), "SEEFES-00042");
/// ```
pub fn format_receipt_number(event_id: &str, short_number: i64) -> String {
    let prefix: String = event_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(6)
        .collect::<String>()
        .to_ascii_uppercase();
    let prefix = if prefix.is_empty() { "EVENT".to_string() } else { prefix };
    format!("{}-{:05}", prefix, short_number)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_number_formatting() {
        assert_eq!(format_receipt_number("seefest-2026", 1), "SEEFES-00001");
        assert_eq!(format_receipt_number("seefest-2026", 42), "SEEFES-00042");
        // Wider numbers grow instead of truncating
        assert_eq!(format_receipt_number("fest", 123456), "FEST-123456");
        // Non-alphanumeric event ids fall back to a fixed prefix
        assert_eq!(format_receipt_number("***", 7), "EVENT-00007");
    }

    #[test]
    fn test_receipt_number_deterministic() {
        assert_eq!(
            format_receipt_number("seefest-2026", 99),
            format_receipt_number("seefest-2026", 99)
        );
    }

    #[test]
    fn test_payment_method_labels() {
        assert_eq!(PaymentMethod::Cash.as_str(), "cash");
        assert_eq!(PaymentMethod::Card.as_str(), "card");
    }

    #[test]
    fn test_cashier_label() {
        let order = sample_order();
        assert_eq!(order.cashier_label().as_deref(), Some("staff:Alice"));

        let mut anonymous = sample_order();
        anonymous.cashier_id = None;
        anonymous.cashier_name = None;
        anonymous.cashier_role = None;
        assert_eq!(anonymous.cashier_label(), None);
    }

    fn sample_order() -> Order {
        Order {
            id: "o-1".to_string(),
            event_id: "seefest-2026".to_string(),
            bar_id: "b-1".to_string(),
            device_id: "pos-01".to_string(),
            cashier_id: Some("u-1".to_string()),
            cashier_name: Some("Alice".to_string()),
            cashier_role: Some(Role::Staff),
            receipt_number: "SEEFES-00001".to_string(),
            short_number: 1,
            public_token: "t".repeat(40),
            payment_method: PaymentMethod::Cash,
            status: OrderStatus::Completed,
            gross_cents: 800,
            tax_cents: 133,
            net_cents: 667,
            tax_rate_bps: 2000,
            created_at: Utc::now(),
            voided_at: None,
        }
    }
}
