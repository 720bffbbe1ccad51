use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

mod engine;

pub use engine::PromoEngine;

// ============================================================================
// Promo Domain - Percentage Discounts
// ============================================================================
//
// Money policy: amounts are fixed-point `Decimal`. Line totals are exact
// products; a discounted total is rounded to 2 decimal places, half-up
// (midpoint away from zero).
//
// ============================================================================

/// Immutable reference data, looked up by exact code match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoCode {
    pub code: String,
    pub percent_off: Decimal,
}

impl PromoCode {
    pub fn new(code: impl Into<String>, percent_off: Decimal) -> Result<Self, CoreError> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(CoreError::validation("promo code cannot be blank"));
        }
        if percent_off < Decimal::ZERO || percent_off > Decimal::ONE_HUNDRED {
            return Err(CoreError::validation(
                "discount percentage must be between 0 and 100",
            ));
        }
        Ok(Self { code, percent_off })
    }

    /// The discounted amount, rounded to cents.
    pub fn apply(&self, total: Decimal) -> Decimal {
        apply_discount(total, self.percent_off)
    }
}

/// `total * (1 - percent_off / 100)`, rounded to cents half-up.
pub fn apply_discount(total: Decimal, percent_off: Decimal) -> Decimal {
    let discounted = total * (Decimal::ONE - percent_off / Decimal::ONE_HUNDRED);
    round_to_cents(discounted)
}

/// Round a monetary amount to 2 decimal places, midpoint away from zero.
pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn twenty_percent_off_one_hundred_is_eighty() {
        let promo = PromoCode::new("SAVE20", dec!(20)).unwrap();
        assert_eq!(promo.apply(dec!(100)), dec!(80.00));
    }

    #[test]
    fn zero_percent_leaves_total_unchanged() {
        assert_eq!(apply_discount(dec!(59.99), Decimal::ZERO), dec!(59.99));
    }

    #[test]
    fn full_discount_is_zero() {
        assert_eq!(apply_discount(dec!(42), dec!(100)), Decimal::ZERO);
    }

    #[test]
    fn midpoints_round_away_from_zero() {
        // 15% off 10.03 = 8.5255 -> 8.53
        assert_eq!(apply_discount(dec!(10.03), dec!(15)), dec!(8.53));
        assert_eq!(round_to_cents(dec!(1.005)), dec!(1.01));
        assert_eq!(round_to_cents(dec!(1.004)), dec!(1.00));
    }

    #[test]
    fn out_of_range_percentage_is_rejected() {
        assert!(PromoCode::new("X", dec!(-1)).is_err());
        assert!(PromoCode::new("X", dec!(101)).is_err());
        assert!(PromoCode::new("X", dec!(100)).is_ok());
    }

    #[test]
    fn blank_code_is_rejected() {
        assert!(matches!(
            PromoCode::new("   ", dec!(10)),
            Err(CoreError::Validation(_))
        ));
    }
}
