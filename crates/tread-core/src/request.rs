//! # Request Types
//!
//! Explicit request structs for everything the stores accept. Product
//! creation carries a tagged union over the three product types, so a
//! tire request physically cannot smuggle wheel attributes in.
//!
//! All requests are validated by [`crate::validation`] before they reach
//! a repository.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::size::{tire_size_display, wheel_size_display};
use crate::types::{PaymentMethod, ProductType};

// =============================================================================
// Product Requests
// =============================================================================

/// Tire-specific attributes on a product request.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TireAttributes {
    pub width: i64,
    pub aspect_ratio: i64,
    pub diameter: i64,
    pub load_index: Option<String>,
    pub speed_rating: Option<String>,
}

/// Wheel-specific attributes on a product request.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WheelAttributes {
    pub diameter: f64,
    pub width: f64,
    pub pcd: Option<String>,
    pub offset: Option<f64>,
    pub center_bore: Option<f64>,
    pub stud_count: Option<i64>,
    pub stud_type: Option<String>,
}

/// Type-specific part of a product request (tagged union).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "product_type", rename_all = "snake_case")]
pub enum ProductSpec {
    Tire(TireAttributes),
    AlloyWheel(WheelAttributes),
    General,
}

impl ProductSpec {
    /// The product type this spec resolves to.
    pub fn product_type(&self) -> ProductType {
        match self {
            ProductSpec::Tire(_) => ProductType::Tire,
            ProductSpec::AlloyWheel(_) => ProductType::AlloyWheel,
            ProductSpec::General => ProductType::General,
        }
    }

    /// Derives the size label for this spec; None for general goods.
    pub fn size_display(&self) -> Option<String> {
        match self {
            ProductSpec::Tire(t) => Some(tire_size_display(
                t.width,
                t.aspect_ratio,
                t.diameter,
                t.load_index.as_deref(),
                t.speed_rating.as_deref(),
            )),
            ProductSpec::AlloyWheel(w) => Some(wheel_size_display(
                w.diameter,
                w.width,
                w.pcd.as_deref(),
                w.stud_count,
                w.stud_type.as_deref(),
            )),
            ProductSpec::General => None,
        }
    }
}

/// Request to create or replace a product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub sku: Option<String>,
    pub name: String,
    pub price_cents: i64,
    #[serde(default)]
    pub cost_price_cents: i64,
    pub stock_quantity: i64,
    /// Defaults to 10 when not supplied.
    pub low_stock_threshold: Option<i64>,
    pub spec: ProductSpec,
}

// =============================================================================
// Catalog Requests
// =============================================================================

/// Request to create a tire size catalog row.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewTireSize {
    pub width: i64,
    pub aspect_ratio: i64,
    pub diameter: i64,
    pub load_index: Option<String>,
    pub speed_rating: Option<String>,
    /// Derived from the fields above when not supplied.
    pub size_display: Option<String>,
}

impl NewTireSize {
    /// The label to store: the explicit one, or the derived one.
    pub fn display(&self) -> String {
        self.size_display.clone().unwrap_or_else(|| {
            tire_size_display(
                self.width,
                self.aspect_ratio,
                self.diameter,
                self.load_index.as_deref(),
                self.speed_rating.as_deref(),
            )
        })
    }
}

/// Request to create a wheel size catalog row.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewWheelSize {
    pub diameter: f64,
    pub width: f64,
    pub pcd: Option<String>,
    pub offset: Option<f64>,
    pub center_bore: Option<f64>,
    pub stud_count: Option<i64>,
    pub stud_type: Option<String>,
    /// Derived from the fields above when not supplied.
    pub size_display: Option<String>,
}

impl NewWheelSize {
    /// The label to store: the explicit one, or the derived one.
    pub fn display(&self) -> String {
        self.size_display.clone().unwrap_or_else(|| {
            wheel_size_display(
                self.diameter,
                self.width,
                self.pcd.as_deref(),
                self.stud_count,
                self.stud_type.as_deref(),
            )
        })
    }
}

// =============================================================================
// Invoice Requests
// =============================================================================

/// One cart line handed to the invoice engine.
///
/// Priced at add-to-cart time; the engine does NOT re-read the live
/// product price, so a price edit mid-cart is not reconciled.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

impl CartLine {
    /// quantity × unit price.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.unit_price_cents) * self.quantity
    }
}

/// Optional customer details captured on an invoice.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerInfo {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Everything needed to create an invoice in one transaction.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceDraft {
    pub lines: Vec<CartLine>,
    #[serde(default)]
    pub customer: CustomerInfo,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub tax_cents: i64,
    #[serde(default)]
    pub discount_cents: i64,
}

impl InvoiceDraft {
    /// Sum of line totals.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// subtotal + tax − discount.
    pub fn total(&self) -> Money {
        self.subtotal() + Money::from_cents(self.tax_cents) - Money::from_cents(self.discount_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(qty: i64, unit_cents: i64) -> CartLine {
        CartLine {
            product_id: "p1".to_string(),
            product_name: "205/55R16 Touring".to_string(),
            quantity: qty,
            unit_price_cents: unit_cents,
        }
    }

    #[test]
    fn test_spec_product_type() {
        assert_eq!(ProductSpec::General.product_type(), ProductType::General);
        let tire = ProductSpec::Tire(TireAttributes {
            width: 205,
            aspect_ratio: 55,
            diameter: 16,
            load_index: None,
            speed_rating: None,
        });
        assert_eq!(tire.product_type(), ProductType::Tire);
    }

    #[test]
    fn test_spec_size_display() {
        let tire = ProductSpec::Tire(TireAttributes {
            width: 205,
            aspect_ratio: 55,
            diameter: 16,
            load_index: Some("91".to_string()),
            speed_rating: Some("V".to_string()),
        });
        assert_eq!(tire.size_display().as_deref(), Some("205/55R16 91V"));
        assert_eq!(ProductSpec::General.size_display(), None);
    }

    #[test]
    fn test_new_tire_size_prefers_explicit_display() {
        let size = NewTireSize {
            width: 205,
            aspect_ratio: 55,
            diameter: 16,
            load_index: None,
            speed_rating: None,
            size_display: Some("custom".to_string()),
        };
        assert_eq!(size.display(), "custom");
    }

    #[test]
    fn test_draft_totals() {
        let draft = InvoiceDraft {
            lines: vec![line(3, 1000), line(1, 500)],
            customer: CustomerInfo::default(),
            payment_method: PaymentMethod::Cash,
            tax_cents: 100,
            discount_cents: 50,
        };
        assert_eq!(draft.subtotal().cents(), 3500);
        assert_eq!(draft.total().cents(), 3550);
    }

    #[test]
    fn test_tagged_union_json_shape() {
        let spec = ProductSpec::Tire(TireAttributes {
            width: 205,
            aspect_ratio: 55,
            diameter: 16,
            load_index: None,
            speed_rating: None,
        });
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["product_type"], "tire");
        assert_eq!(json["width"], 205);
    }
}
