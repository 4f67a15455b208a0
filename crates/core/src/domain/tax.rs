use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::PricingError;

pub const LEGACY_VAT_NAME: &str = "VAT";

/// One named tax applied to a document.
///
/// A rate component holds a fraction of the taxed base (`0.20` for 20%), a
/// fixed component holds a currency amount charged once per document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxComponent {
    pub name: String,
    pub is_rate: bool,
    pub value: Decimal,
}

impl TaxComponent {
    pub fn rate(name: impl Into<String>, value: Decimal) -> Self {
        Self { name: name.into(), is_rate: true, value }
    }

    pub fn fixed(name: impl Into<String>, value: Decimal) -> Self {
        Self { name: name.into(), is_rate: false, value }
    }

    /// The single flat VAT rate older documents were priced with.
    pub fn vat(rate: Decimal) -> Self {
        Self::rate(LEGACY_VAT_NAME, rate)
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        let out_of_range =
            self.value < Decimal::ZERO || (self.is_rate && self.value > Decimal::ONE);
        if out_of_range {
            return Err(PricingError::InvalidRate {
                field: format!("tax `{}`", self.name),
                value: self.value,
            });
        }
        Ok(())
    }
}

/// Converts the legacy optional single rate into the component list form.
pub fn taxes_from_rate(rate: Option<Decimal>) -> Vec<TaxComponent> {
    rate.map(TaxComponent::vat).into_iter().collect()
}

pub fn validate_taxes(taxes: &[TaxComponent]) -> Result<(), PricingError> {
    taxes.iter().try_for_each(TaxComponent::validate)
}
