//! Exact two-decimal price arithmetic.
//!
//! Prices never pass through `f64`. Input is truncated to cents on the way in,
//! and computed amounts are rounded half away from zero on the way out.

use rust_decimal::{Decimal, RoundingStrategy};

pub const PRICE_SCALE: u32 = 2;

/// Largest price a `NUMERIC(12, 2)` column holds.
pub const MAX_PRICE: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, PRICE_SCALE);

/// Truncates extra fractional digits and pins the scale at two ("19.999" -> "19.99", "5" -> "5.00").
pub fn normalize_price(price: Decimal) -> Decimal {
    let mut normalized = price.trunc_with_scale(PRICE_SCALE);
    normalized.rescale(PRICE_SCALE);
    normalized
}

/// Rounds a computed amount to cents, keeping trailing zeros.
pub fn round_amount(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(PRICE_SCALE);
    rounded
}

/// Sum of `price * quantity` over all lines, rounded to cents.
pub fn line_total<I>(lines: I) -> Decimal
where
    I: IntoIterator<Item = (Decimal, i32)>,
{
    let sum = lines
        .into_iter()
        .fold(Decimal::ZERO, |acc, (price, quantity)| acc + price * Decimal::from(quantity));
    round_amount(sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn normalize_truncates_instead_of_rounding() {
        assert_eq!(normalize_price(d("19.999")).to_string(), "19.99");
        assert_eq!(normalize_price(d("0.005")).to_string(), "0.00");
        assert_eq!(normalize_price(d("5")).to_string(), "5.00");
        assert_eq!(normalize_price(d("7.1")).to_string(), "7.10");
    }

    #[test]
    fn amounts_round_half_away_from_zero() {
        assert_eq!(round_amount(d("2.345")).to_string(), "2.35");
        assert_eq!(round_amount(d("2.344")).to_string(), "2.34");
        assert_eq!(round_amount(d("30")).to_string(), "30.00");
    }

    #[test]
    fn max_price_matches_column_precision() {
        assert_eq!(MAX_PRICE.to_string(), "9999999999.99");
    }

    #[test]
    fn repeated_additions_do_not_drift() {
        let lines = std::iter::repeat((d("0.10"), 1)).take(1000);
        assert_eq!(line_total(lines).to_string(), "100.00");
    }

    #[test]
    fn line_total_multiplies_by_quantity() {
        let total = line_total(vec![(d("10.00"), 3), (d("2.50"), 2)]);
        assert_eq!(total.to_string(), "35.00");
    }
}
