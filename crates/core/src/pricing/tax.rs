use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::tax::{taxes_from_rate, TaxComponent};
use crate::pricing::rounding::round_money;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxLine {
    pub name: String,
    pub is_rate: bool,
    pub value: Decimal,
    pub amount: Decimal,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub lines: Vec<TaxLine>,
    pub total: Decimal,
}

impl TaxBreakdown {
    pub fn fixed_total(&self) -> Decimal {
        self.lines.iter().filter(|line| !line.is_rate).map(|line| line.amount).sum()
    }
}

/// Applies every component to `base`. Rate components are rounded one by one;
/// fixed components are charged as-is. Nothing is charged on a zero base.
pub fn compute_tax(base: Decimal, components: &[TaxComponent]) -> TaxBreakdown {
    let lines: Vec<TaxLine> = components
        .iter()
        .map(|component| {
            let amount = if base.is_zero() {
                Decimal::ZERO
            } else if component.is_rate {
                round_money(base * component.value)
            } else {
                component.value
            };
            TaxLine {
                name: component.name.clone(),
                is_rate: component.is_rate,
                value: component.value,
                amount,
            }
        })
        .collect();
    let total = lines.iter().map(|line| line.amount).sum();

    TaxBreakdown { lines, total }
}

/// Single flat rate form, kept for pricing legacy documents.
pub fn compute_tax_rate(base: Decimal, tax_rate: Option<Decimal>) -> Decimal {
    compute_tax(base, &taxes_from_rate(tax_rate)).total
}
