//! # tread-core: Pure Business Logic for Tread POS
//!
//! The heart of Tread POS, a single-tenant offline point-of-sale and
//! inventory manager for a tire/wheel retailer. Everything in this crate
//! is pure: no database, no network, no file system.
//!
//! ## Architecture Position
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Desktop shell (UI, receipts, backup export) — external      │
//! │                            │                                 │
//! │  ┌─────────────────────────▼─────────────────────────────┐   │
//! │  │              ★ tread-core (THIS CRATE) ★              │   │
//! │  │                                                       │   │
//! │  │  types • money • size • date • request • validation   │   │
//! │  │                                                       │   │
//! │  │  NO I/O • NO DATABASE • PURE FUNCTIONS                │   │
//! │  └─────────────────────────┬─────────────────────────────┘   │
//! │                            │                                 │
//! │  ┌─────────────────────────▼─────────────────────────────┐   │
//! │  │           tread-db (SQLite storage layer)             │   │
//! │  └───────────────────────────────────────────────────────┘   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Persisted entities (Product, Invoice, StockMovement, ...)
//! - [`request`] - Request structs, including the tagged product spec union
//! - [`money`] - Integer-cents money type (no floating point)
//! - [`size`] - Tire/wheel size label derivation
//! - [`date`] - Local wall-clock timestamps and business dates
//! - [`validation`] - Business rule validation
//! - [`error`] - Domain error types
//! - [`reports`] - Read-side report shapes

// =============================================================================
// Module Declarations
// =============================================================================

pub mod date;
pub mod error;
pub mod money;
pub mod reports;
pub mod request;
pub mod size;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use date::{local_now, BusinessDate};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use request::*;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default low-stock threshold applied when a product is created without
/// an explicit one.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

/// Default invoice status. The current system never moves an invoice out
/// of this state; the column exists so refunds can be modelled later.
pub const INVOICE_STATUS_COMPLETED: &str = "completed";

/// How many invoices `get_all` returns when the caller does not say.
pub const DEFAULT_INVOICE_PAGE: i64 = 50;

/// Trailing window, in local days, that separates a slow mover from a
/// product that is merely quiet.
pub const SLOW_MOVER_WINDOW_DAYS: i64 = 30;
