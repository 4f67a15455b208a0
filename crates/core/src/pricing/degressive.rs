use rust_decimal::Decimal;

use crate::domain::degressive::DegressiveRateTable;
use crate::domain::period::BookingPeriod;
use crate::errors::PricingError;
use crate::pricing::rounding::round_money;

/// Number of billed days for a booking lasting `duration_days`.
///
/// Days not covered by any tier are billed in full. Inside a rate tier every
/// day adds `value`% of a day on top of what earlier tiers accumulated; a
/// fixed tier bills `value` days for the whole booking.
pub fn compute_degressive_rate(
    duration_days: u32,
    table: &DegressiveRateTable,
) -> Result<Decimal, PricingError> {
    if duration_days == 0 {
        return Err(PricingError::InvalidDuration);
    }
    Ok(round_money(accumulated_days(duration_days, table)))
}

pub fn compute_period_degressive_rate(
    period: &BookingPeriod,
    table: &DegressiveRateTable,
) -> Result<Decimal, PricingError> {
    compute_degressive_rate(period.duration_days()?, table)
}

fn accumulated_days(day: u32, table: &DegressiveRateTable) -> Decimal {
    if day == 0 {
        return Decimal::ZERO;
    }

    let Some(index) = table.tier_index_for(day) else {
        return Decimal::from(day);
    };
    let tier = &table.tiers()[index];
    if !tier.is_rate {
        return tier.value;
    }

    let floor = accumulated_days(tier.from_day - 1, table);
    let days_in_tier = Decimal::from(day - tier.from_day + 1);
    floor + days_in_tier * tier.value / Decimal::ONE_HUNDRED
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::{compute_degressive_rate, compute_period_degressive_rate};
    use crate::domain::degressive::{DegressiveRateTable, DegressiveTier};
    use crate::domain::period::BookingPeriod;
    use crate::errors::PricingError;

    fn table(tiers: Vec<DegressiveTier>) -> DegressiveRateTable {
        DegressiveRateTable::new(tiers).expect("valid tier table")
    }

    #[test]
    fn empty_table_bills_every_day() {
        let table = DegressiveRateTable::default();

        assert_eq!(compute_degressive_rate(1, &table), Ok(dec!(1)));
        assert_eq!(compute_degressive_rate(12, &table), Ok(dec!(12)));
    }

    #[test]
    fn rate_tiers_accumulate_across_boundaries() {
        let table = table(vec![
            DegressiveTier::rate(1, dec!(100)),
            DegressiveTier::rate(3, dec!(50)),
        ]);

        assert_eq!(compute_degressive_rate(2, &table), Ok(dec!(2)));
        assert_eq!(compute_degressive_rate(3, &table), Ok(dec!(2.5)));
        assert_eq!(compute_degressive_rate(5, &table), Ok(dec!(3.5)));
    }

    #[test]
    fn days_before_first_tier_are_billed_in_full() {
        let table = table(vec![DegressiveTier::rate(3, dec!(50))]);

        assert_eq!(compute_degressive_rate(2, &table), Ok(dec!(2)));
        assert_eq!(compute_degressive_rate(4, &table), Ok(dec!(3)));
    }

    #[test]
    fn fixed_tier_bills_a_flat_number_of_days() {
        let table = table(vec![
            DegressiveTier::fixed(1, dec!(1)),
            DegressiveTier::rate(2, dec!(75)),
            DegressiveTier::fixed(8, dec!(5)),
        ]);

        assert_eq!(compute_degressive_rate(1, &table), Ok(dec!(1)));
        assert_eq!(compute_degressive_rate(2, &table), Ok(dec!(1.75)));
        assert_eq!(compute_degressive_rate(7, &table), Ok(dec!(5.5)));
        assert_eq!(compute_degressive_rate(8, &table), Ok(dec!(5)));
        assert_eq!(compute_degressive_rate(30, &table), Ok(dec!(5)));
    }

    #[test]
    fn multiplier_is_rounded_to_cents() {
        let table = table(vec![DegressiveTier::rate(1, dec!(33.333))]);

        assert_eq!(compute_degressive_rate(3, &table), Ok(dec!(1.00)));
    }

    #[test]
    fn zero_days_is_rejected() {
        let table = DegressiveRateTable::default();

        assert_eq!(compute_degressive_rate(0, &table), Err(PricingError::InvalidDuration));
    }

    #[test]
    fn period_duration_drives_the_lookup() {
        let table = table(vec![DegressiveTier::rate(2, dec!(50))]);
        let period = BookingPeriod::new(
            NaiveDate::from_ymd_opt(2024, 7, 12).expect("valid date"),
            NaiveDate::from_ymd_opt(2024, 7, 14).expect("valid date"),
        )
        .expect("valid period");

        assert_eq!(compute_period_degressive_rate(&period, &table), Ok(dec!(2)));
    }
}
