//! # Validation Module
//!
//! Entry-boundary validation for BizFinance.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front end / AI candidate normalization                       │
//! │  ├── Defaults for missing quantity (1) and price (0)                   │
//! │  └── Attachment size limit                                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: InvoiceDraft (Rust)                                          │
//! │  └── THIS MODULE: names, quantities, prices, tax rates                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Ledger aggregator                                                     │
//! │  └── NO validation: assumes well-formed invoices, never fails          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Negative amounts are stopped here: a draft cannot hold a negative unit
//! price or a non-positive quantity, so a drafted invoice never carries a
//! negative amount.

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Quantity, TaxRate};
use crate::{MAX_ITEM_QUANTITY, MAX_LINE_ITEMS, MAX_NAME_CHARS, MAX_UNIT_CHARS};
use rust_decimal::Decimal;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

fn validate_required_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates the customer or supplier name.
///
/// ## Example
/// ```rust
/// use bizfin_core::validation::validate_counterparty_name;
///
/// assert!(validate_counterparty_name("Công ty ABC").is_ok());
/// assert!(validate_counterparty_name("   ").is_err());
/// ```
pub fn validate_counterparty_name(name: &str) -> ValidationResult<()> {
    validate_required_text("counterparty name", name, MAX_NAME_CHARS)
}

/// Validates a line item's goods/service name.
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    validate_required_text("item name", name, MAX_NAME_CHARS)
}

/// Validates a unit of measure. Empty is allowed (the default unit applies).
pub fn validate_unit(unit: &str) -> ValidationResult<()> {
    if unit.trim().chars().count() > MAX_UNIT_CHARS {
        return Err(ValidationError::TooLong {
            field: "unit".to_string(),
            max: MAX_UNIT_CHARS,
        });
    }

    Ok(())
}

/// Validates a search query and returns it trimmed.
///
/// Empty is fine (matches everything); at most 100 characters.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line-item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY
pub fn validate_quantity(qty: Quantity) -> ValidationResult<()> {
    if !qty.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty.as_decimal() > Decimal::from(MAX_ITEM_QUANTITY) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price.
///
/// ## Example
/// ```rust
/// use bizfin_core::money::Money;
/// use bizfin_core::validation::validate_unit_price;
///
/// assert!(validate_unit_price(Money::from_dong(50_000)).is_ok());
/// assert!(validate_unit_price(Money::zero()).is_ok());   // free item
/// assert!(validate_unit_price(Money::from_dong(-1)).is_err());
/// ```
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "unit price".to_string(),
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points (0% to 100%).
pub fn validate_tax_rate(rate: TaxRate) -> ValidationResult<()> {
    if rate.bps() > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax rate".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

/// Validates a tax rate given as a raw percentage, before conversion.
pub fn validate_tax_rate_percentage(pct: f64) -> ValidationResult<()> {
    if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
        return Err(ValidationError::OutOfRange {
            field: "tax rate".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

// =============================================================================
// Collection / Payload Validators
// =============================================================================

/// Validates the number of line items already on a draft before adding one.
pub fn validate_line_item_count(current_items: usize) -> ValidationResult<()> {
    if current_items >= MAX_LINE_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "line items".to_string(),
            min: 1,
            max: MAX_LINE_ITEMS as i64,
        });
    }

    Ok(())
}

/// Validates the size of an invoice image before it is sent for extraction.
///
/// `max` is the configured limit, normally [`crate::MAX_ATTACHMENT_BYTES`].
pub fn validate_attachment_size(bytes: usize, max: usize) -> ValidationResult<()> {
    if bytes == 0 {
        return Err(ValidationError::Required {
            field: "attachment".to_string(),
        });
    }

    if bytes > max {
        return Err(ValidationError::OutOfRange {
            field: "attachment size".to_string(),
            min: 1,
            max: i64::try_from(max).unwrap_or(i64::MAX),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
