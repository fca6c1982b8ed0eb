//! # Validation Module
//!
//! Business rule validation for incoming requests. Runs before any
//! storage call; storage constraints (NOT NULL, UNIQUE) remain as the
//! backstop underneath.
//!
//! ## Usage
//! ```rust
//! use tread_core::request::NewWheelSize;
//! use tread_core::validation::validate_new_wheel_size;
//!
//! let size = NewWheelSize {
//!     diameter: 16.0,
//!     width: 7.0,
//!     pcd: Some("4x100".to_string()),
//!     offset: None,
//!     center_bore: None,
//!     stud_count: None,
//!     stud_type: None,
//!     size_display: None,
//! };
//! // Stud fields are required for new wheel sizes
//! assert!(validate_new_wheel_size(&size).is_err());
//! ```

use crate::error::ValidationError;
use crate::request::{InvoiceDraft, NewProduct, NewTireSize, NewWheelSize, ProductSpec};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted name for brands and products.
pub const MAX_NAME_LEN: usize = 200;

/// Longest accepted SKU.
pub const MAX_SKU_LEN: usize = 50;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a brand or product name: non-empty, bounded length.
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an optional SKU: when present it must be non-empty, bounded,
/// and limited to alphanumerics, hyphens and underscores.
pub fn validate_sku(sku: Option<&str>) -> ValidationResult<()> {
    let Some(sku) = sku else { return Ok(()) };
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > MAX_SKU_LEN {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: MAX_SKU_LEN,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

fn require_positive(field: &str, value: i64) -> ValidationResult<()> {
    if value <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn require_non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Request Validators
// =============================================================================

/// Validates a product create/update request.
///
/// Selling price must be strictly positive (a zero-priced product cannot
/// be invoiced); stock must be supplied and non-negative on the way in.
pub fn validate_new_product(req: &NewProduct) -> ValidationResult<()> {
    validate_name(&req.name)?;
    validate_sku(req.sku.as_deref())?;
    require_positive("price", req.price_cents)?;
    require_non_negative("cost_price", req.cost_price_cents)?;
    require_non_negative("stock_quantity", req.stock_quantity)?;

    if let Some(threshold) = req.low_stock_threshold {
        require_non_negative("low_stock_threshold", threshold)?;
    }

    match &req.spec {
        ProductSpec::Tire(t) => {
            require_positive("tire_width", t.width)?;
            require_positive("tire_aspect_ratio", t.aspect_ratio)?;
            require_positive("tire_diameter", t.diameter)?;
        }
        ProductSpec::AlloyWheel(w) => {
            if w.diameter <= 0.0 {
                return Err(ValidationError::MustBePositive {
                    field: "wheel_diameter".to_string(),
                });
            }
            if w.width <= 0.0 {
                return Err(ValidationError::MustBePositive {
                    field: "wheel_width".to_string(),
                });
            }
        }
        ProductSpec::General => {}
    }

    Ok(())
}

/// Validates a tire size catalog request.
pub fn validate_new_tire_size(req: &NewTireSize) -> ValidationResult<()> {
    require_positive("width", req.width)?;
    require_positive("aspect_ratio", req.aspect_ratio)?;
    require_positive("diameter", req.diameter)?;
    Ok(())
}

/// Validates a wheel size catalog request.
///
/// Stud count and stud type are required for new wheel sizes. This is a
/// business rule enforced here, not a storage constraint.
pub fn validate_new_wheel_size(req: &NewWheelSize) -> ValidationResult<()> {
    if req.diameter <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "diameter".to_string(),
        });
    }
    if req.width <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "width".to_string(),
        });
    }

    match req.stud_count {
        None => {
            return Err(ValidationError::Required {
                field: "stud_count".to_string(),
            })
        }
        Some(count) => require_positive("stud_count", count)?,
    }

    if req
        .stud_type
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .is_none()
    {
        return Err(ValidationError::Required {
            field: "stud_type".to_string(),
        });
    }

    Ok(())
}

/// Validates an invoice draft before the transaction starts.
pub fn validate_invoice_draft(draft: &InvoiceDraft) -> ValidationResult<()> {
    if draft.lines.is_empty() {
        return Err(ValidationError::Required {
            field: "lines".to_string(),
        });
    }

    for line in &draft.lines {
        require_positive("quantity", line.quantity)?;
        require_non_negative("unit_price", line.unit_price_cents)?;
        if line.product_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "product_id".to_string(),
            });
        }
    }

    require_non_negative("tax_amount", draft.tax_cents)?;
    require_non_negative("discount_amount", draft.discount_cents)?;

    Ok(())
}

/// Validates a manual stock adjustment amount.
pub fn validate_adjustment_amount(amount: i64) -> ValidationResult<()> {
    require_non_negative("amount", amount)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{CartLine, CustomerInfo, TireAttributes, WheelAttributes};
    use crate::types::PaymentMethod;

    fn general_product() -> NewProduct {
        NewProduct {
            sku: None,
            name: "Valve stem".to_string(),
            price_cents: 250,
            cost_price_cents: 100,
            stock_quantity: 40,
            low_stock_threshold: None,
            spec: ProductSpec::General,
        }
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Bridgestone Turanza").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku(None).is_ok());
        assert!(validate_sku(Some("TYR-205-55-16")).is_ok());
        assert!(validate_sku(Some("")).is_err());
        assert!(validate_sku(Some("has space")).is_err());
        assert!(validate_sku(Some(&"A".repeat(100))).is_err());
    }

    #[test]
    fn test_product_requires_positive_price() {
        let mut req = general_product();
        assert!(validate_new_product(&req).is_ok());

        req.price_cents = 0;
        assert!(validate_new_product(&req).is_err());

        req.price_cents = -100;
        assert!(validate_new_product(&req).is_err());
    }

    #[test]
    fn test_product_requires_non_negative_stock() {
        let mut req = general_product();
        req.stock_quantity = -1;
        assert!(validate_new_product(&req).is_err());

        req.stock_quantity = 0;
        assert!(validate_new_product(&req).is_ok());
    }

    #[test]
    fn test_tire_product_attrs_checked() {
        let mut req = general_product();
        req.spec = ProductSpec::Tire(TireAttributes {
            width: 0,
            aspect_ratio: 55,
            diameter: 16,
            load_index: None,
            speed_rating: None,
        });
        assert!(validate_new_product(&req).is_err());
    }

    #[test]
    fn test_wheel_size_requires_stud_fields() {
        let mut req = NewWheelSize {
            diameter: 16.0,
            width: 7.0,
            pcd: Some("4x100".to_string()),
            offset: None,
            center_bore: None,
            stud_count: Some(5),
            stud_type: Some("Long Stud".to_string()),
            size_display: None,
        };
        assert!(validate_new_wheel_size(&req).is_ok());

        req.stud_count = None;
        assert!(validate_new_wheel_size(&req).is_err());

        req.stud_count = Some(5);
        req.stud_type = Some("  ".to_string());
        assert!(validate_new_wheel_size(&req).is_err());
    }

    #[test]
    fn test_invoice_draft_rejects_empty_cart() {
        let draft = InvoiceDraft {
            lines: vec![],
            customer: CustomerInfo::default(),
            payment_method: PaymentMethod::Cash,
            tax_cents: 0,
            discount_cents: 0,
        };
        assert!(validate_invoice_draft(&draft).is_err());
    }

    #[test]
    fn test_invoice_draft_rejects_zero_quantity() {
        let draft = InvoiceDraft {
            lines: vec![CartLine {
                product_id: "p1".to_string(),
                product_name: "Tire".to_string(),
                quantity: 0,
                unit_price_cents: 1000,
            }],
            customer: CustomerInfo::default(),
            payment_method: PaymentMethod::Cash,
            tax_cents: 0,
            discount_cents: 0,
        };
        assert!(validate_invoice_draft(&draft).is_err());
    }

    #[test]
    fn test_adjustment_amount() {
        assert!(validate_adjustment_amount(0).is_ok());
        assert!(validate_adjustment_amount(25).is_ok());
        assert!(validate_adjustment_amount(-1).is_err());
    }
}
