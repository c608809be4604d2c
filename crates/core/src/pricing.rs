//! Flat nightly-rate pricing.
//!
//! Prices are integer minor units (cents). A booking's total is fixed at
//! creation time and never recomputed.

use crate::dates::StayRange;
use crate::error::CoreError;

/// Total price of a stay: `nights * price_per_night_cents`.
///
/// Overflow and negative rates are validation errors rather than panics.
pub fn total_price_cents(stay: &StayRange, price_per_night_cents: i64) -> Result<i64, CoreError> {
    if price_per_night_cents < 0 {
        return Err(CoreError::Validation(
            "room has a negative nightly price".into(),
        ));
    }
    stay.nights()
        .checked_mul(price_per_night_cents)
        .ok_or_else(|| CoreError::Validation("total price is out of range".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplies_nights_by_rate() {
        let stay = StayRange::parse("2025-12-20", "2025-12-23").unwrap();
        assert_eq!(total_price_cents(&stay, 12_500).unwrap(), 37_500);
    }

    #[test]
    fn single_night_costs_one_rate() {
        let stay = StayRange::parse("2025-12-20", "2025-12-21").unwrap();
        assert_eq!(total_price_cents(&stay, 9_900).unwrap(), 9_900);
    }

    #[test]
    fn free_rooms_cost_nothing() {
        let stay = StayRange::parse("2025-12-20", "2025-12-25").unwrap();
        assert_eq!(total_price_cents(&stay, 0).unwrap(), 0);
    }

    #[test]
    fn overflow_is_rejected() {
        let stay = StayRange::parse("2025-12-20", "2025-12-25").unwrap();
        assert!(matches!(
            total_price_cents(&stay, i64::MAX),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn negative_rate_is_rejected() {
        let stay = StayRange::parse("2025-12-20", "2025-12-21").unwrap();
        assert!(total_price_cents(&stay, -1).is_err());
    }
}
