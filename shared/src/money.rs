//! Money helpers
//!
//! All monetary arithmetic that has to survive accumulation goes through
//! `rust_decimal`; `f64` is only the storage/wire representation.

use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};

/// Convert an f64 amount to Decimal (lossless for 2-dp money values)
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64_retain(value).unwrap_or(Decimal::ZERO)
}

/// Convert back to f64, rounded to 2 decimal places (half-up)
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Round an f64 amount to 2 decimal places (half-up)
pub fn round2(value: f64) -> f64 {
    to_f64(to_decimal(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_survives_accumulation() {
        let mut total = Decimal::ZERO;
        for _ in 0..1000 {
            total += to_decimal(0.01);
        }
        assert_eq!(to_f64(total), 10.0);
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(round2(166.666_666), 166.67);
        assert_eq!(round2(0.005), 0.01);
        assert_eq!(round2(2.674_999), 2.67);
    }
}
