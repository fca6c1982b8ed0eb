//! # Repository Module
//!
//! Database repository implementations for Tread POS. Each repository
//! wraps the shared pool behind a focused API; SQL never leaks out of
//! this module tree.
//!
//! ## Available Repositories
//!
//! - [`catalog::CatalogRepository`] - Brands and tire/wheel size lists
//! - [`product::ProductRepository`] - Product CRUD, search, cascade delete
//! - [`stock::StockRepository`] - Stock ledger: adjustments and movements
//! - [`invoice::InvoiceRepository`] - The atomic invoice transaction
//! - [`report::ReportRepository`] - Read-only sales/stock/customer reports

pub mod catalog;
pub mod invoice;
pub mod product;
pub mod report;
pub mod stock;
