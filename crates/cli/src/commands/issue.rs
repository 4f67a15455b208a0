use std::path::Path;

use tariff_core::config::AppConfig;
use tariff_core::{
    BillingDocument, DeterministicPricingCalculator, DocumentKind, DocumentRequest,
};

use crate::booking_file::{BookingFile, BookingFileError};
use crate::commands::CommandResult;

pub fn run(
    config: &AppConfig,
    kind: DocumentKind,
    file: &Path,
    number: &str,
    days: Option<u32>,
) -> CommandResult {
    match issue_document(config, kind, file, number, days) {
        Ok(document) => CommandResult::success_with_data(
            "issue",
            format!(
                "{} {} issued for {} {}",
                document.kind.as_str(),
                document.number,
                document.pricing.total_with_taxes,
                document.currency
            ),
            &document,
        ),
        Err(error) => CommandResult::failure(
            "issue",
            error.error_class(),
            error.to_string(),
            error.exit_code(),
        ),
    }
}

fn issue_document(
    config: &AppConfig,
    kind: DocumentKind,
    file: &Path,
    number: &str,
    days: Option<u32>,
) -> Result<BillingDocument, BookingFileError> {
    let number = number.trim();
    if number.is_empty() {
        return Err(BookingFileError::Incomplete("document number must not be empty".to_string()));
    }

    let resolved = BookingFile::load(file)?.into_input(config, days)?;

    let document = BillingDocument::issue(
        &DeterministicPricingCalculator,
        DocumentRequest {
            kind,
            number: number.to_string(),
            currency: config.pricing.currency.clone(),
            period: resolved.period,
            input: resolved.input,
        },
    )?;
    Ok(document)
}
