//! # Price Derivation
//!
//! The unit sale price is never entered directly. The operator enters the
//! bulk purchase cost, the units per bulk, and the desired profit margin;
//! both unit prices are derived:
//!
//! ```text
//!   unit_cost  = bulk_cost / units_per_bulk
//!   sale_price = unit_cost / ((100 - margin_pct) / 100)
//! ```
//!
//! The margin is a *sales margin*, not a markup: at 20% margin, 20% of the
//! final sale price is profit. `margin_pct >= 100` makes the divisor zero
//! or negative and is rejected. Re-run on every product create/edit.

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;

/// Derived unit purchase cost and unit sale price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitPricing {
    pub cost: Money,
    pub price: Money,
}

/// Derives unit cost and sale price from the bulk figures.
///
/// ## Errors
/// - `units_per_bulk <= 0` - the unit cost is undefined
/// - `margin_pct >= 100` - the margin factor is zero or negative
/// - derived price rounds to zero or below - the product would sell at
///   nothing; the operator needs to fix the bulk cost or units
///
/// ## Example
/// ```rust
/// use caja_core::money::Money;
/// use caja_core::pricing::derive_unit_pricing;
///
/// // Case of 12 at $30.00, 20% margin:
/// let pricing = derive_unit_pricing(Money::from_cents(3000), 12.0, 20.0).unwrap();
/// assert_eq!(pricing.cost.cents(), 250);   // $2.50 per unit
/// assert_eq!(pricing.price.cents(), 313);  // $2.50 / 0.8 = $3.125, rounded
/// ```
pub fn derive_unit_pricing(
    bulk_cost: Money,
    units_per_bulk: f64,
    margin_pct: f64,
) -> CoreResult<UnitPricing> {
    if units_per_bulk <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "units_per_bulk".to_string(),
        }
        .into());
    }
    if margin_pct >= 100.0 {
        return Err(ValidationError::MarginTooHigh { pct: margin_pct }.into());
    }
    if margin_pct < 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "margin_pct".to_string(),
        }
        .into());
    }

    let unit_cost = bulk_cost.cents() as f64 / units_per_bulk;
    let margin_factor = (100.0 - margin_pct) / 100.0;
    let unit_price = unit_cost / margin_factor;

    let cost = Money::from_cents(unit_cost.round() as i64);
    let price = Money::from_cents(unit_price.round() as i64);

    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "derived sale price".to_string(),
        }
        .into());
    }

    Ok(UnitPricing { cost, price })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn derives_cost_and_price() {
        let pricing = derive_unit_pricing(Money::from_cents(3000), 12.0, 20.0).unwrap();
        assert_eq!(pricing.cost.cents(), 250);
        assert_eq!(pricing.price.cents(), 313);
    }

    #[test]
    fn zero_margin_sells_at_cost() {
        let pricing = derive_unit_pricing(Money::from_cents(2400), 24.0, 0.0).unwrap();
        assert_eq!(pricing.cost.cents(), 100);
        assert_eq!(pricing.price.cents(), 100);
    }

    #[test]
    fn fractional_units_per_bulk_supported() {
        // 1.5 kg sacks sold by the kilo
        let pricing = derive_unit_pricing(Money::from_cents(300), 1.5, 50.0).unwrap();
        assert_eq!(pricing.cost.cents(), 200);
        assert_eq!(pricing.price.cents(), 400);
    }

    #[test]
    fn rejects_margin_at_or_above_hundred() {
        for pct in [100.0, 150.0] {
            let err = derive_unit_pricing(Money::from_cents(3000), 12.0, pct).unwrap_err();
            assert!(matches!(
                err,
                CoreError::Validation(ValidationError::MarginTooHigh { .. })
            ));
        }
    }

    #[test]
    fn rejects_non_positive_units_per_bulk() {
        assert!(derive_unit_pricing(Money::from_cents(3000), 0.0, 20.0).is_err());
        assert!(derive_unit_pricing(Money::from_cents(3000), -1.0, 20.0).is_err());
    }

    #[test]
    fn rejects_zero_derived_price() {
        // Free bulk cost derives a zero sale price
        assert!(derive_unit_pricing(Money::zero(), 12.0, 20.0).is_err());
    }

    #[test]
    fn rejects_negative_margin() {
        assert!(derive_unit_pricing(Money::from_cents(3000), 12.0, -5.0).is_err());
    }
}
