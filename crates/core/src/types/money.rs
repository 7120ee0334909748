//! Money arithmetic helpers.
//!
//! Prices are carried as [`rust_decimal::Decimal`] in whole currency units.
//! Discounted totals are rounded to the nearest integer unit exactly once,
//! at the end of the pricing pipeline.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round a total to the nearest whole currency unit.
///
/// Midpoints round away from zero (so 6300.5 becomes 6301), matching the
/// storefront's display expectations rather than banker's rounding.
#[must_use]
pub fn round_to_unit(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_to_unit_exact() {
        assert_eq!(round_to_unit(dec!(6300)), dec!(6300));
    }

    #[test]
    fn test_round_to_unit_midpoint_away_from_zero() {
        assert_eq!(round_to_unit(dec!(6300.5)), dec!(6301));
        assert_eq!(round_to_unit(dec!(6299.5)), dec!(6300));
    }

    #[test]
    fn test_round_to_unit_down() {
        assert_eq!(round_to_unit(dec!(6300.4)), dec!(6300));
    }

    #[test]
    fn test_discount_never_exceeds_total() {
        let total = dec!(7000);
        for d in ["0.1", "0.25", "0.5", "0.99"] {
            let fraction: Decimal = d.parse().expect("valid decimal");
            let discounted = round_to_unit(total * (Decimal::ONE - fraction));
            assert!(discounted <= total, "discounted {discounted} > {total}");
        }
    }
}
