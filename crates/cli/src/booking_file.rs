use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use tariff_core::config::AppConfig;
use tariff_core::domain::tax::taxes_from_rate;
use tariff_core::{
    BookingPeriod, DegressiveRateTable, DegressiveTier, LineItem, PricingError, PricingInput,
    TaxComponent,
};
use thiserror::Error;
use tracing::debug;

/// Booking snapshot handed over by the reservation layer, as JSON or TOML.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct BookingFile {
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub discount_rate: Option<Decimal>,
    #[serde(default)]
    pub tax_rate: Option<Decimal>,
    #[serde(default)]
    pub taxes: Option<Vec<TaxComponent>>,
    #[serde(default)]
    pub degressive_rate: Option<Decimal>,
    #[serde(default)]
    pub period: Option<BookingPeriod>,
    #[serde(default)]
    pub degressive_tiers: Option<Vec<DegressiveTier>>,
}

#[derive(Debug, Error)]
pub enum BookingFileError {
    #[error("could not read booking file `{path}`: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("could not parse booking file `{path}`: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("incomplete booking: {0}")]
    Incomplete(String),
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

impl BookingFileError {
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Read { .. } => "input_read",
            Self::Parse { .. } | Self::Incomplete(_) => "input_parse",
            Self::Pricing(_) => "pricing_validation",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Read { .. } => 3,
            Self::Parse { .. } | Self::Incomplete(_) => 4,
            Self::Pricing(_) => 5,
        }
    }
}

/// Calculator input plus the booking period, kept only when it set the multiplier.
#[derive(Clone, Debug)]
pub struct ResolvedBooking {
    pub input: PricingInput,
    pub period: Option<BookingPeriod>,
}

impl BookingFile {
    pub fn load(path: &Path) -> Result<Self, BookingFileError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| BookingFileError::Read { path: path.to_path_buf(), source })?;

        let is_toml = path.extension().is_some_and(|extension| extension == "toml");
        let parsed = if is_toml {
            toml::from_str::<Self>(&raw).map_err(|error| error.to_string())
        } else {
            serde_json::from_str::<Self>(&raw).map_err(|error| error.to_string())
        };

        parsed.map_err(|message| BookingFileError::Parse { path: path.to_path_buf(), message })
    }

    /// Builds the calculator input. An explicit multiplier wins over `days`,
    /// which wins over the booking period; tiers from the file win over the
    /// configured ones.
    pub fn into_input(
        self,
        config: &AppConfig,
        days: Option<u32>,
    ) -> Result<ResolvedBooking, BookingFileError> {
        let taxes = match (self.taxes, self.tax_rate) {
            (Some(_), Some(_)) => {
                return Err(BookingFileError::Incomplete(
                    "set either `taxes` or the legacy `tax_rate`, not both".to_string(),
                ))
            }
            (Some(taxes), None) => taxes,
            (None, Some(rate)) => taxes_from_rate(Some(rate)),
            (None, None) => config.pricing.taxes.clone(),
        };

        let table = match self.degressive_tiers {
            Some(tiers) => DegressiveRateTable::new(tiers)?,
            None => config.pricing.degressive_table()?,
        };

        let (input, period) = match (self.degressive_rate, days, self.period) {
            (Some(rate), _, _) => (PricingInput::new(self.line_items, rate), None),
            (None, Some(days), _) => {
                (PricingInput::for_duration(self.line_items, days, &table)?, None)
            }
            (None, None, Some(period)) => {
                (PricingInput::for_period(self.line_items, &period, &table)?, Some(period))
            }
            (None, None, None) => {
                return Err(BookingFileError::Incomplete(
                    "provide `degressive_rate`, a `period`, or --days".to_string(),
                ))
            }
        };
        debug!(
            event_name = "cli.booking.resolved",
            line_count = input.line_items.len(),
            degressive_rate = %input.degressive_rate,
            tax_count = taxes.len(),
            period_used = period.is_some(),
            "booking file resolved"
        );

        Ok(ResolvedBooking {
            input: input.with_discount_rate(self.discount_rate).with_taxes(taxes),
            period,
        })
    }
}
