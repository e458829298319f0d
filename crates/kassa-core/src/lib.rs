//! # kassa-core: Pure Business Logic
//!
//! The heart of the festival POS: money and tax decomposition, the cart,
//! domain types, receipt rendering, and validation — all as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  UI / device shell (external)                                           │
//! │        │                                                                │
//! │  kassa-engine ── order lifecycle, void policy, sequencing, reports      │
//! │        │                                                                │
//! │  ★ kassa-core (THIS CRATE) ★                                            │
//! │     money · cart · types · receipt · validation                         │
//! │     NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS                  │
//! │        │                                                                │
//! │  kassa-db ── SQLite queries, migrations, repositories                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money in integer cents, inclusive tax split
//! - [`types`] - Domain types (Bar, Product, Order, OrderItem, ...)
//! - [`cart`] - The in-memory draft of a sale
//! - [`receipt`] - Deterministic receipt rendering
//! - [`error`] / [`validation`] - Input checking, once per boundary

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod receipt;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine};
pub use error::ValidationError;
pub use money::{Money, TaxBreakdown, TaxRate};
pub use receipt::{ReceiptDocument, ReceiptLine};
pub use types::{
    format_receipt_number, Bar, Order, OrderItem, OrderStatus, PaymentMethod, PrintJob,
    PrintJobStatus, Product, Role, VoidRecord,
};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// The single tax rate applied to all products, in basis points.
///
/// Prices are tax-inclusive; multi-rate menus are out of scope. Deployments
/// override this through the engine configuration.
pub const DEFAULT_TAX_RATE_BPS: u32 = 2000;
