//! Group buy discount arithmetic.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PricingError {
    /// The discounted amount could not be represented in minor units.
    #[error("discounted price overflowed")]
    Overflow,
}

/// Apply a whole-number percentage discount to a price in minor units.
///
/// The result is rounded to the nearest minor unit, with halves rounded up.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the computation cannot be represented.
pub fn discounted_price(original: u64, discount_percentage: u8) -> Result<u64, PricingError> {
    let remaining = Decimal::from(100_u8.saturating_sub(discount_percentage));

    let applied = Decimal::from(original)
        .checked_mul(remaining)
        .and_then(|value| value.checked_div(Decimal::ONE_HUNDRED))
        .ok_or(PricingError::Overflow)?;

    applied
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or(PricingError::Overflow)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn twenty_percent_off_one_hundred() -> TestResult {
        assert_eq!(discounted_price(100_00, 20)?, 80_00);

        Ok(())
    }

    #[test]
    fn halves_round_up() -> TestResult {
        // 5 * 0.9 = 4.5
        assert_eq!(discounted_price(5, 10)?, 5);
        // 15 * 0.7 = 10.5
        assert_eq!(discounted_price(15, 30)?, 11);

        Ok(())
    }

    #[test]
    fn below_half_rounds_down() -> TestResult {
        // 999 * 0.67 = 669.33
        assert_eq!(discounted_price(999, 33)?, 669);

        Ok(())
    }

    #[test]
    fn zero_price_stays_zero() -> TestResult {
        assert_eq!(discounted_price(0, 50)?, 0);

        Ok(())
    }

    #[test]
    fn large_prices_do_not_lose_precision() -> TestResult {
        assert_eq!(discounted_price(u64::MAX, 1)?, 18_262_276_632_972_456_099);

        Ok(())
    }
}
