//! # Validation Module
//!
//! Input validation for the order backend.
//!
//! Transport-level schema validation happens before the core logic runs (an
//! external collaborator); this module is the second layer that enforces the
//! business-rule bounds, and the database constraints are the last.
//!
//! ## Usage
//! ```rust
//! use atlas_core::validation::{validate_line_quantity, validate_entity_id};
//!
//! validate_entity_id("order id", "550e8400-e29b-41d4-a716-446655440000").unwrap();
//! validate_line_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::types::{LineItem, Product};
use crate::{MAX_LINE_QUANTITY, MAX_REQUEST_LINES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates an entity id (UUID v4 string).
///
/// ```rust
/// use atlas_core::validation::validate_entity_id;
///
/// assert!(validate_entity_id("product id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_entity_id("product id", "not-a-uuid").is_err());
/// ```
pub fn validate_entity_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity: positive and within the per-line bound.
pub fn validate_line_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if quantity > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed (free items).
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a stock quantity for catalog writes. Zero is allowed.
pub fn validate_stock_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 0 {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "productName".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "productName".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Request Validators
// =============================================================================

/// Validates a product before a catalog write.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_entity_id("companyId", &product.company_id)?;
    validate_product_name(&product.name)?;
    validate_price_cents(product.selling_price_cents)?;
    if let Some(cents) = product.buying_price_cents {
        validate_price_cents(cents)?;
    }
    validate_stock_quantity(product.quantity)?;

    Ok(())
}

/// Validates a requested set of order lines: each product id is a UUID and
/// each quantity is positive, and the set itself is of sane size.
///
/// Runs before any store access, so a rejected request mutates nothing.
pub fn validate_order_lines(lines: &[LineItem]) -> ValidationResult<()> {
    if lines.len() > MAX_REQUEST_LINES {
        return Err(ValidationError::TooManyEntries {
            field: "products".to_string(),
            max: MAX_REQUEST_LINES,
        });
    }

    for line in lines {
        validate_entity_id("productId", &line.product_id)?;
        validate_line_quantity(line.quantity)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: &str, quantity: i64) -> LineItem {
        LineItem {
            product_id: product_id.to_string(),
            quantity,
        }
    }

    const UUID_A: &str = "550e8400-e29b-41d4-a716-446655440000";

    #[test]
    fn test_validate_entity_id() {
        assert!(validate_entity_id("id", UUID_A).is_ok());
        assert!(validate_entity_id("id", "").is_err());
        assert!(validate_entity_id("id", "   ").is_err());
        assert!(validate_entity_id("id", "123").is_err());
    }

    #[test]
    fn test_validate_line_quantity() {
        assert!(validate_line_quantity(1).is_ok());
        assert!(validate_line_quantity(9_999).is_ok());

        assert!(validate_line_quantity(0).is_err());
        assert!(validate_line_quantity(-1).is_err());
        assert!(validate_line_quantity(10_000).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(-1).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Basmati Rice 5kg").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_product() {
        use crate::types::Unit;
        use chrono::Utc;

        let now = Utc::now();
        let mut product = Product {
            id: UUID_A.to_string(),
            company_id: UUID_A.to_string(),
            category_id: None,
            name: "Basmati Rice 5kg".to_string(),
            code: Some("RICE-5".to_string()),
            description: None,
            unit: Some(Unit::Kilogram),
            selling_price_cents: 1000,
            buying_price_cents: Some(800),
            quantity: 10,
            created_at: now,
            updated_at: now,
        };
        assert!(validate_product(&product).is_ok());

        product.selling_price_cents = -1;
        assert!(validate_product(&product).is_err());

        product.selling_price_cents = 1000;
        product.quantity = -5;
        assert!(validate_product(&product).is_err());
    }

    #[test]
    fn test_validate_order_lines() {
        assert!(validate_order_lines(&[line(UUID_A, 3)]).is_ok());
        assert!(validate_order_lines(&[]).is_ok());

        assert!(validate_order_lines(&[line("bogus", 3)]).is_err());
        assert!(validate_order_lines(&[line(UUID_A, 0)]).is_err());

        let too_many: Vec<LineItem> = (0..101).map(|_| line(UUID_A, 1)).collect();
        assert!(validate_order_lines(&too_many).is_err());
    }
}
