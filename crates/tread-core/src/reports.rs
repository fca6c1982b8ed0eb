//! # Report Types
//!
//! Read-side shapes produced by the reporting aggregator. Pure data; the
//! queries that fill them live in tread-db. Absent data yields zeroed
//! sums and empty lists, never an error.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::date::BusinessDate;
use crate::money::Money;
use crate::types::{PaymentMethod, Product};

// =============================================================================
// Shared Rows
// =============================================================================

/// Aggregate sums over a set of invoices.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SalesTotals {
    pub total_invoices: i64,
    pub total_cents: i64,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub discount_cents: i64,
}

impl SalesTotals {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A product ranked by what it earned or how much of it sold.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ProductRevenue {
    pub product_id: String,
    /// Snapshot name from the invoice items, not the live product row.
    pub product_name: String,
    pub quantity_sold: i64,
    pub revenue_cents: i64,
}

/// Revenue and invoice count for one local calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct DayBreakdown {
    pub date: BusinessDate,
    pub invoice_count: i64,
    pub revenue_cents: i64,
}

/// Totals grouped by how invoices were settled.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PaymentBreakdown {
    pub payment_method: PaymentMethod,
    pub invoice_count: i64,
    pub amount_cents: i64,
}

/// A customer ranked by total spend.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CustomerSpend {
    pub customer_name: String,
    pub invoice_count: i64,
    pub total_spent_cents: i64,
}

// =============================================================================
// Reports
// =============================================================================

/// One calendar day of sales.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailySalesReport {
    pub date: BusinessDate,
    pub totals: SalesTotals,
    /// Top 10 products by revenue for this day.
    pub top_products: Vec<ProductRevenue>,
}

/// Sales over an inclusive date range.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RangeSalesReport {
    pub start: BusinessDate,
    pub end: BusinessDate,
    pub totals: SalesTotals,
    /// Mean of invoice totals over the range; 0 when empty.
    pub average_invoice_cents: i64,
    pub daily: Vec<DayBreakdown>,
    /// Top 10 products by revenue over the range.
    pub top_products: Vec<ProductRevenue>,
    pub payment_methods: Vec<PaymentBreakdown>,
}

/// Best and worst moving products.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductPerformanceReport {
    /// Top 10 by total quantity sold, all time.
    pub best_sellers: Vec<ProductRevenue>,
    /// In stock but not sold in the trailing 30 days (or never sold),
    /// most stock first.
    pub slow_movers: Vec<Product>,
}

/// Customer base summary.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerReport {
    /// Distinct non-empty customer names.
    pub total_customers: i64,
    /// Customers with more than one invoice.
    pub repeat_customers: i64,
    /// Mean of invoice totals across all invoices; 0 when empty.
    pub average_invoice_cents: i64,
    /// Top 10 customers by total spend.
    pub top_customers: Vec<CustomerSpend>,
}
