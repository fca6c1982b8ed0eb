//! # tread-db: Database Layer for Tread POS
//!
//! SQLite persistence for the Tread POS core: connection pool, embedded
//! migrations, and one repository per component.
//!
//! ## Architecture Position
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Desktop shell command (create_invoice, get_low_stock, ...)  │
//! │       │                                                      │
//! │  ┌────▼─────────────────────────────────────────────────┐    │
//! │  │                tread-db (THIS CRATE)                 │    │
//! │  │                                                      │    │
//! │  │  Database (pool.rs)      Repositories                │    │
//! │  │  SqlitePool, WAL      catalog • product • stock      │    │
//! │  │  Migrations           invoice • report               │    │
//! │  └────┬─────────────────────────────────────────────────┘    │
//! │       │                                                      │
//! │  ┌────▼─────────────────────────────────────────────────┐    │
//! │  │            SQLite database file (tread.db)           │    │
//! │  └──────────────────────────────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tread_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/tread.db")).await?;
//!
//! let products = db.products().get_by_size("205/55R16").await?;
//! let created = db.invoices().create(&draft).await?;
//! let report = db.reports().daily_sales(BusinessDate::today()).await?;
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
pub use repository::catalog::CatalogRepository;
pub use repository::invoice::InvoiceRepository;
pub use repository::product::ProductRepository;
pub use repository::report::ReportRepository;
pub use repository::stock::StockRepository;
