use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::PricingError;

/// Inclusive span of calendar days a booking covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl BookingPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PricingError> {
        let period = Self { start, end };
        period.validate()?;
        Ok(period)
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        if self.end < self.start {
            return Err(PricingError::InvalidPeriod { start: self.start, end: self.end });
        }
        Ok(())
    }

    pub fn duration_days(&self) -> Result<u32, PricingError> {
        self.validate()?;
        let days = (self.end - self.start).num_days() + 1;
        u32::try_from(days).map_err(|_| PricingError::InvalidDuration)
    }
}
