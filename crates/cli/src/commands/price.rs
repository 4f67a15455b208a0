use std::path::Path;

use tariff_core::config::AppConfig;
use tariff_core::{compute_pricing, PricingInput, PricingResult};

use crate::booking_file::{BookingFile, BookingFileError};
use crate::commands::CommandResult;

pub fn run(config: &AppConfig, file: &Path, days: Option<u32>) -> CommandResult {
    match price_file(config, file, days) {
        Ok((input, result)) => CommandResult::success_with_data(
            "price",
            format!(
                "priced {} line item(s) at degressive rate {}",
                input.line_items.len(),
                result.degressive_rate
            ),
            &result,
        ),
        Err(error) => CommandResult::failure(
            "price",
            error.error_class(),
            error.to_string(),
            error.exit_code(),
        ),
    }
}

fn price_file(
    config: &AppConfig,
    file: &Path,
    days: Option<u32>,
) -> Result<(PricingInput, PricingResult), BookingFileError> {
    let input = BookingFile::load(file)?.into_input(config, days)?.input;
    let result = compute_pricing(&input)?;
    Ok((input, result))
}
