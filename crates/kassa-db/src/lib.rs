//! # kassa-db: Database Layer
//!
//! SQLite persistence for the festival POS: connection pool, embedded
//! migrations, and one repository per entity.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  kassa-engine (finalize / void / report services)                       │
//! │       │                                                                 │
//! │  ┌────▼────────────────────────────────────────────────────────────┐   │
//! │  │                     kassa-db (THIS CRATE)                        │   │
//! │  │                                                                  │   │
//! │  │   Database (pool.rs)      repositories/      migrations/         │   │
//! │  │   SqlitePool, WAL         bar product        001_initial_...     │   │
//! │  │                           order counter                          │   │
//! │  │                           print report                           │   │
//! │  └────┬────────────────────────────────────────────────────────────┘   │
//! │       ▼                                                                 │
//! │  SQLite database file (one per device / one shared per event)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kassa_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("kassa.db")).await?;
//! let menu = db.products().list_active(&bar_id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::bar::BarRepository;
pub use repository::counter::CounterRepository;
pub use repository::order::OrderRepository;
pub use repository::print::PrintJobRepository;
pub use repository::product::ProductRepository;
pub use repository::report::ReportRepository;
