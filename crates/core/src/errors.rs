use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Validation failures raised before any pricing arithmetic runs.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("line item `{reference}` has negative quantity {quantity}")]
    InvalidQuantity { reference: String, quantity: i64 },
    #[error("{field} is out of range: {value}")]
    InvalidRate { field: String, value: Decimal },
    #[error(
        "degressive tier #{position} starts at day {from_day}, which does not follow day {previous}"
    )]
    MalformedTierTable { position: usize, from_day: u32, previous: u32 },
    #[error("booking duration must be at least one day")]
    InvalidDuration,
    #[error("booking period ends on {end} before it starts on {start}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },
    #[error("{subject} exceeds the representable amount range")]
    AmountOverflow { subject: String },
}

impl PricingError {
    pub(crate) fn line_overflow(reference: &str) -> Self {
        Self::AmountOverflow { subject: format!("line item `{reference}`") }
    }

    pub(crate) fn booking_overflow() -> Self {
        Self::AmountOverflow { subject: "booking total".to_string() }
    }
}
