//! # Domain Types
//!
//! Persisted entities and enums for Tread POS.
//!
//! ## Identity
//! Every entity has a UUID v4 `id` used for relations, plus a business
//! identifier where one exists (`sku`, `invoice_number`, `name`).
//!
//! ## Snapshots
//! Invoice items freeze `product_name` and `unit_price_cents` at sale
//! time. Later product edits or deletions never change what a historical
//! invoice displays.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product Type
// =============================================================================

/// Classification of a catalog product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    /// A tire (width/aspect/diameter sizing).
    Tire,
    /// An alloy wheel (diameter x width sizing, PCD, studs).
    AlloyWheel,
    /// Anything else sold over the counter (valves, weights, services).
    General,
}

impl Default for ProductType {
    fn default() -> Self {
        ProductType::General
    }
}

impl ProductType {
    /// Storage/wire name for this type.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ProductType::Tire => "tire",
            ProductType::AlloyWheel => "alloy_wheel",
            ProductType::General => "general",
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How an invoice was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash.
    Cash,
    /// Card on the external terminal.
    Card,
    /// On account, settled later.
    Credit,
    /// Direct bank transfer.
    BankTransfer,
}

impl PaymentMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Credit => "credit",
            PaymentMethod::BankTransfer => "bank_transfer",
        }
    }
}

// =============================================================================
// Stock Movement Type
// =============================================================================

/// Why a product's stock level changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Decrement from an invoice line. Records the positive sold quantity;
    /// the type carries the direction.
    Sale,
    /// Incoming stock from a supplier.
    Purchase,
    /// Manual correction. Records the signed applied delta.
    Adjustment,
    /// Customer return back into stock.
    Return,
}

// =============================================================================
// Brand
// =============================================================================

/// A tire/wheel brand. Referenced by convention only (product names may
/// carry a brand prefix); there is no foreign key from products.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Brand {
    pub id: String,
    /// Unique, case-sensitive as stored.
    pub name: String,
    #[ts(as = "String")]
    pub created_at: NaiveDateTime,
}

// =============================================================================
// Tire Size
// =============================================================================

/// A predefined tire size used to populate product forms.
///
/// Unique on (width, aspect_ratio, diameter, load_index, speed_rating),
/// exact-match — ratings differing only in letter case are distinct rows.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct TireSize {
    pub id: String,
    /// Section width in millimetres (205).
    pub width: i64,
    /// Aspect ratio percent (55).
    pub aspect_ratio: i64,
    /// Rim diameter in inches (16).
    pub diameter: i64,
    /// Load index ("91").
    pub load_index: Option<String>,
    /// Speed rating ("V").
    pub speed_rating: Option<String>,
    /// Derived label, e.g. `205/55R16 91V`.
    pub size_display: String,
    #[ts(as = "String")]
    pub created_at: NaiveDateTime,
}

// =============================================================================
// Wheel Size
// =============================================================================

/// A predefined alloy wheel size.
///
/// Unique on (diameter, width, pcd, offset, center_bore, stud_count,
/// stud_type). Stud count and stud type are required for new rows by the
/// validation layer, not by storage.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct WheelSize {
    pub id: String,
    /// Rim diameter in inches (16, 16.5).
    pub diameter: f64,
    /// Rim width in inches (7, 7.5).
    pub width: f64,
    /// Pitch circle diameter ("4x100").
    pub pcd: Option<String>,
    /// Offset in millimetres (ET).
    pub offset: Option<f64>,
    /// Center bore in millimetres.
    pub center_bore: Option<f64>,
    pub stud_count: Option<i64>,
    /// e.g. "Long Stud", "Short Stud".
    pub stud_type: Option<String>,
    /// Derived label, e.g. `16x7 PCD:4x100 5 Stud (Long Stud)`.
    pub size_display: String,
    #[ts(as = "String")]
    pub created_at: NaiveDateTime,
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product: tire, alloy wheel or general goods.
///
/// Attribute columns irrelevant to the product's type stay NULL; storage
/// does not enforce mutual exclusivity. `size_display` is denormalized at
/// write time for fast substring search.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: String,
    /// Unique when present.
    pub sku: Option<String>,
    pub name: String,
    /// Selling price in cents, strictly positive.
    pub price_cents: i64,
    /// Cost price in cents, non-negative.
    pub cost_price_cents: i64,
    /// May go negative through sale-path over-sell (no floor on the
    /// invoice decrement).
    pub stock_quantity: i64,
    pub low_stock_threshold: i64,
    pub product_type: ProductType,
    // Tire attributes
    pub tire_width: Option<i64>,
    pub tire_aspect_ratio: Option<i64>,
    pub tire_diameter: Option<i64>,
    pub tire_load_index: Option<String>,
    pub tire_speed_rating: Option<String>,
    // Wheel attributes
    pub wheel_diameter: Option<f64>,
    pub wheel_width: Option<f64>,
    pub wheel_pcd: Option<String>,
    pub wheel_offset: Option<f64>,
    pub wheel_center_bore: Option<f64>,
    pub wheel_stud_count: Option<i64>,
    pub wheel_stud_type: Option<String>,
    /// Derived size label; NULL for general goods.
    pub size_display: Option<String>,
    #[ts(as = "String")]
    pub created_at: NaiveDateTime,
    #[ts(as = "String")]
    pub updated_at: NaiveDateTime,
}

impl Product {
    /// Selling price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Cost price as Money.
    #[inline]
    pub fn cost_price(&self) -> Money {
        Money::from_cents(self.cost_price_cents)
    }

    /// Whether the product sits at or under its low-stock threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity <= self.low_stock_threshold
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// A completed sale. Invoices are an append-only ledger: once created
/// they are never updated or deleted through this API.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Invoice {
    pub id: String,
    /// Generated `INV-{epoch-millis}`, unique.
    pub invoice_number: String,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub discount_cents: i64,
    /// subtotal + tax − discount.
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
    /// Always "completed" in the current system.
    pub status: String,
    /// Local wall-clock time; reports bucket on its date portion.
    #[ts(as = "String")]
    pub created_at: NaiveDateTime,
    #[ts(as = "String")]
    pub updated_at: NaiveDateTime,
}

impl Invoice {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Invoice Item
// =============================================================================

/// A line on an invoice, frozen at sale time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InvoiceItem {
    pub id: String,
    pub invoice_id: String,
    pub product_id: String,
    /// Name at time of sale (frozen).
    pub product_name: String,
    /// Always >= 1.
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// quantity × unit_price_cents.
    pub total_price_cents: i64,
}

impl InvoiceItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }
}

/// An invoice joined with its items, as returned by lookups feeding the
/// receipt renderer.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceWithItems {
    pub invoice: Invoice,
    pub items: Vec<InvoiceItem>,
}

/// Result of creating an invoice.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreatedInvoice {
    pub id: String,
    pub invoice_number: String,
}

// =============================================================================
// Stock Movement
// =============================================================================

/// One entry in the append-only stock audit trail.
///
/// Sale movements carry the positive sold quantity (`reference_id` points
/// at the invoice); adjustments carry the signed applied delta.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StockMovement {
    pub id: String,
    pub product_id: String,
    pub movement_type: MovementType,
    pub quantity: i64,
    /// Invoice id for sale movements.
    pub reference_id: Option<String>,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: NaiveDateTime,
}

// =============================================================================
// Stock Adjustment Mode
// =============================================================================

/// How a manual stock adjustment interprets its amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockAdjustMode {
    /// New stock = current + amount.
    Add,
    /// New stock = max(0, current − amount). Manual subtraction floors at
    /// zero; the sale path deliberately does not.
    Subtract,
    /// New stock = amount.
    Set,
}

impl StockAdjustMode {
    /// Computes the resulting stock level for the given current value.
    pub fn apply(&self, current: i64, amount: i64) -> i64 {
        match self {
            StockAdjustMode::Add => current + amount,
            StockAdjustMode::Subtract => (current - amount).max(0),
            StockAdjustMode::Set => amount,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
