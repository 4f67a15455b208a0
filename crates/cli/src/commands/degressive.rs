use rust_decimal::Decimal;
use serde::Serialize;
use tariff_core::config::AppConfig;
use tariff_core::pricing::degressive::compute_degressive_rate;
use tariff_core::{DegressiveTier, PricingError};

use crate::commands::CommandResult;

#[derive(Debug, Serialize)]
struct DegressiveReport<'a> {
    days: u32,
    degressive_rate: Decimal,
    tiers: &'a [DegressiveTier],
}

pub fn run(config: &AppConfig, days: u32) -> CommandResult {
    let resolved = config
        .pricing
        .degressive_table()
        .and_then(|table| compute_degressive_rate(days, &table));

    match resolved {
        Ok(degressive_rate) => CommandResult::success_with_data(
            "degressive",
            format!("{days} day(s) are billed as {degressive_rate} day(s)"),
            &DegressiveReport { days, degressive_rate, tiers: &config.pricing.degressive_tiers },
        ),
        Err(error @ PricingError::InvalidDuration) => {
            CommandResult::failure("degressive", "pricing_validation", error.to_string(), 5)
        }
        Err(error) => {
            CommandResult::failure("degressive", "config_validation", error.to_string(), 2)
        }
    }
}
