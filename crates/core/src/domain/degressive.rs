use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::PricingError;

/// Upper bound for percentage tiers (a day billed at more than 100% is rejected).
pub const MAX_TIER_PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// Starting at `from_day`, either every day is billed at `value` percent of a
/// day (`is_rate`), or the whole booking is billed `value` days.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegressiveTier {
    pub from_day: u32,
    pub is_rate: bool,
    pub value: Decimal,
}

impl DegressiveTier {
    pub fn rate(from_day: u32, percent: Decimal) -> Self {
        Self { from_day, is_rate: true, value: percent }
    }

    pub fn fixed(from_day: u32, days: Decimal) -> Self {
        Self { from_day, is_rate: false, value: days }
    }
}

/// Tiers sorted strictly ascending by `from_day`; the last tier is open-ended.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DegressiveTier>", into = "Vec<DegressiveTier>")]
pub struct DegressiveRateTable {
    tiers: Vec<DegressiveTier>,
}

impl DegressiveRateTable {
    pub fn new(tiers: Vec<DegressiveTier>) -> Result<Self, PricingError> {
        validate_tiers(&tiers)?;
        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[DegressiveTier] {
        &self.tiers
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Index of the last tier starting on or before `day`.
    pub fn tier_index_for(&self, day: u32) -> Option<usize> {
        self.tiers.iter().rposition(|tier| tier.from_day <= day)
    }
}

impl TryFrom<Vec<DegressiveTier>> for DegressiveRateTable {
    type Error = PricingError;

    fn try_from(tiers: Vec<DegressiveTier>) -> Result<Self, Self::Error> {
        Self::new(tiers)
    }
}

impl From<DegressiveRateTable> for Vec<DegressiveTier> {
    fn from(table: DegressiveRateTable) -> Self {
        table.tiers
    }
}

pub fn validate_tiers(tiers: &[DegressiveTier]) -> Result<(), PricingError> {
    let mut previous = 0;
    for (position, tier) in tiers.iter().enumerate() {
        if tier.from_day == 0 || tier.from_day <= previous {
            return Err(PricingError::MalformedTierTable {
                position,
                from_day: tier.from_day,
                previous,
            });
        }
        previous = tier.from_day;

        let out_of_range =
            tier.value < Decimal::ZERO || (tier.is_rate && tier.value > MAX_TIER_PERCENT);
        if out_of_range {
            return Err(PricingError::InvalidRate {
                field: format!("degressive tier from day {}", tier.from_day),
                value: tier.value,
            });
        }
    }
    Ok(())
}
