//! # Validation Module
//!
//! Operator-input validation, run before any business logic or storage
//! call. Mirrors the checks the original register applies at its entry
//! fields: barcodes, product names, bulk figures, amounts, phone numbers,
//! manually keyed exchange rates.
//!
//! ## Usage
//! ```rust
//! use caja_core::validation::{validate_barcode, validate_phone_number};
//!
//! validate_barcode("7591001234567").unwrap();
//! validate_phone_number("04141234567").unwrap();
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;

/// Mobile prefixes the recharge module accepts.
pub const PHONE_PREFIXES: [&str; 6] = ["0414", "0424", "0412", "0422", "0416", "0426"];

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product barcode.
///
/// ## Rules
/// - non-empty after trimming
/// - at most 64 characters
/// - alphanumeric, hyphens and underscores only (scanner output)
pub fn validate_barcode(barcode: &str) -> ValidationResult<()> {
    let barcode = barcode.trim();

    if barcode.is_empty() {
        return Err(ValidationError::Required {
            field: "barcode".to_string(),
        });
    }

    if barcode.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "barcode".to_string(),
            max: 64,
        });
    }

    if !barcode
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product display name (non-empty, at most 200 chars).
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a recharge phone number: a known mobile prefix followed by
/// exactly 7 digits.
pub fn validate_phone_number(number: &str) -> ValidationResult<()> {
    let number = number.trim();

    if number.is_empty() {
        return Err(ValidationError::Required {
            field: "phone_number".to_string(),
        });
    }

    // prefix check first: it guarantees the first 4 bytes are ASCII, so
    // the slice below cannot split a character
    let prefix_ok = PHONE_PREFIXES
        .iter()
        .any(|prefix| number.starts_with(prefix));
    let rest_ok = prefix_ok
        && number.len() == 11
        && number[4..].chars().all(|c| c.is_ascii_digit());

    if !prefix_ok || !rest_ok {
        return Err(ValidationError::InvalidFormat {
            field: "phone_number".to_string(),
            reason: "expected a mobile prefix followed by 7 digits".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a strictly positive amount (advance principal, recharge base,
/// restock bulk count entered as money... anything that must be > 0).
pub fn validate_positive_amount(amount: Money, field: &str) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a units-per-bulk figure (> 0; fractional allowed).
pub fn validate_units_per_bulk(units: f64) -> ValidationResult<()> {
    if !(units > 0.0) {
        return Err(ValidationError::MustBePositive {
            field: "units_per_bulk".to_string(),
        });
    }
    Ok(())
}

/// Validates a bulk count for restocking (> 0; fractional allowed).
pub fn validate_bulk_count(bulks: f64) -> ValidationResult<()> {
    if !(bulks > 0.0) {
        return Err(ValidationError::MustBePositive {
            field: "bulk_count".to_string(),
        });
    }
    Ok(())
}

/// Validates a profit margin percent (0 <= pct < 100).
pub fn validate_margin_pct(pct: f64) -> ValidationResult<()> {
    if pct < 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "margin_pct".to_string(),
        });
    }
    if pct >= 100.0 {
        return Err(ValidationError::MarginTooHigh { pct });
    }
    Ok(())
}

/// Validates a manually keyed exchange rate (> 0, finite).
pub fn validate_manual_rate(rate: f64) -> ValidationResult<()> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "rate".to_string(),
        });
    }
    Ok(())
}

/// Parses an operator-typed decimal that may use a comma as the decimal
/// separator ("1.000,50" is not accepted; "1000,50" is). Returns cents.
pub fn parse_amount(input: &str, field: &str) -> ValidationResult<Money> {
    let normalized = input.trim().replace(',', ".");

    if normalized.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let value: f64 = normalized
        .parse()
        .map_err(|_| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a number".to_string(),
        })?;

    if !value.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a number".to_string(),
        });
    }

    Ok(Money::from_cents((value * 100.0).round() as i64))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn barcode_rules() {
        assert!(validate_barcode("7591001234567").is_ok());
        assert!(validate_barcode("ABC-123_x").is_ok());

        assert!(validate_barcode("").is_err());
        assert!(validate_barcode("   ").is_err());
        assert!(validate_barcode("has space").is_err());
        assert!(validate_barcode(&"9".repeat(100)).is_err());
    }

    #[test]
    fn product_name_rules() {
        assert!(validate_product_name("Harina PAN 1kg").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn phone_number_rules() {
        assert!(validate_phone_number("04141234567").is_ok());
        assert!(validate_phone_number("04261234567").is_ok());

        assert!(validate_phone_number("").is_err());
        assert!(validate_phone_number("0414123456").is_err()); // 6 digits
        assert!(validate_phone_number("041412345678").is_err()); // 8 digits
        assert!(validate_phone_number("02121234567").is_err()); // landline prefix
        assert!(validate_phone_number("0414123456a").is_err());
    }

    #[test]
    fn positive_amount_rules() {
        assert!(validate_positive_amount(Money::from_cents(1), "principal").is_ok());
        assert!(validate_positive_amount(Money::zero(), "principal").is_err());
        assert!(validate_positive_amount(Money::from_cents(-100), "principal").is_err());
    }

    #[test]
    fn margin_rules() {
        assert!(validate_margin_pct(0.0).is_ok());
        assert!(validate_margin_pct(99.9).is_ok());
        assert!(validate_margin_pct(100.0).is_err());
        assert!(validate_margin_pct(-1.0).is_err());
    }

    #[test]
    fn units_per_bulk_rules() {
        assert!(validate_units_per_bulk(12.0).is_ok());
        assert!(validate_units_per_bulk(0.5).is_ok());
        assert!(validate_units_per_bulk(0.0).is_err());
        assert!(validate_units_per_bulk(f64::NAN).is_err());
    }

    #[test]
    fn manual_rate_rules() {
        assert!(validate_manual_rate(36.5).is_ok());
        assert!(validate_manual_rate(0.0).is_err());
        assert!(validate_manual_rate(-1.0).is_err());
        assert!(validate_manual_rate(f64::INFINITY).is_err());
    }

    #[test]
    fn parse_amount_accepts_comma_decimal() {
        assert_eq!(parse_amount("100", "x").unwrap().cents(), 10_000);
        assert_eq!(parse_amount("100.50", "x").unwrap().cents(), 10_050);
        assert_eq!(parse_amount("100,50", "x").unwrap().cents(), 10_050);
        assert!(parse_amount("", "x").is_err());
        assert!(parse_amount("abc", "x").is_err());
    }
}
