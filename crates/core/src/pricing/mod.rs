pub mod degressive;
pub mod discount;
pub mod replacement;
pub mod rounding;
pub mod tax;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::degressive::DegressiveRateTable;
use crate::domain::line_item::LineItem;
use crate::domain::period::BookingPeriod;
use crate::domain::tax::{taxes_from_rate, validate_taxes, TaxComponent};
use crate::errors::PricingError;

use self::{
    degressive::compute_degressive_rate,
    discount::{compute_discount, compute_discount_where},
    replacement::compute_total_replacement,
    rounding::round_money,
    tax::{compute_tax, TaxBreakdown},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingInput {
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub discount_rate: Option<Decimal>,
    #[serde(default)]
    pub taxes: Vec<TaxComponent>,
    pub degressive_rate: Decimal,
}

impl PricingInput {
    pub fn new(line_items: Vec<LineItem>, degressive_rate: Decimal) -> Self {
        Self { line_items, discount_rate: None, taxes: Vec::new(), degressive_rate }
    }

    /// Resolves the multiplier for `duration_days` from `table` and freezes it.
    pub fn for_duration(
        line_items: Vec<LineItem>,
        duration_days: u32,
        table: &DegressiveRateTable,
    ) -> Result<Self, PricingError> {
        let degressive_rate = compute_degressive_rate(duration_days, table)?;
        Ok(Self::new(line_items, degressive_rate))
    }

    pub fn for_period(
        line_items: Vec<LineItem>,
        period: &BookingPeriod,
        table: &DegressiveRateTable,
    ) -> Result<Self, PricingError> {
        Self::for_duration(line_items, period.duration_days()?, table)
    }

    pub fn with_discount_rate(mut self, discount_rate: Option<Decimal>) -> Self {
        self.discount_rate = discount_rate;
        self
    }

    /// Legacy single VAT rate.
    pub fn with_tax_rate(mut self, tax_rate: Option<Decimal>) -> Self {
        self.taxes = taxes_from_rate(tax_rate);
        self
    }

    pub fn with_taxes(mut self, taxes: Vec<TaxComponent>) -> Self {
        self.taxes = taxes;
        self
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        if let Some(item) = self.line_items.iter().find(|item| item.quantity < 0) {
            return Err(PricingError::InvalidQuantity {
                reference: item.reference.clone(),
                quantity: item.quantity,
            });
        }

        if let Some(rate) = self.discount_rate {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(PricingError::InvalidRate {
                    field: "discount_rate".to_string(),
                    value: rate,
                });
            }
        }

        validate_taxes(&self.taxes)?;

        if self.degressive_rate < Decimal::ZERO {
            return Err(PricingError::InvalidRate {
                field: "degressive_rate".to_string(),
                value: self.degressive_rate,
            });
        }

        self.ensure_amounts_fit()
    }

    /// Rejects bookings whose amounts could leave the `Decimal` range at any
    /// step of the computation.
    fn ensure_amounts_fit(&self) -> Result<(), PricingError> {
        let mut line_bound = Decimal::ZERO;
        let mut replacement_bound = Decimal::ZERO;
        for item in &self.line_items {
            let (total, replacement) =
                item.checked_totals().ok_or_else(|| PricingError::line_overflow(&item.reference))?;
            line_bound =
                line_bound.checked_add(total.abs()).ok_or_else(PricingError::booking_overflow)?;
            replacement_bound = replacement_bound
                .checked_add(replacement.abs())
                .ok_or_else(PricingError::booking_overflow)?;
        }

        let mut rate_components = Decimal::ZERO;
        let mut fixed_taxes = Decimal::ZERO;
        for tax in &self.taxes {
            if tax.is_rate {
                rate_components += Decimal::ONE;
            } else {
                fixed_taxes =
                    fixed_taxes.checked_add(tax.value).ok_or_else(PricingError::booking_overflow)?;
            }
        }

        // Discounted subtotals and each rate tax stay within twice the line
        // bound; the multiplier scales every period amount.
        let ceiling = Decimal::TWO
            .checked_mul(line_bound)
            .and_then(|amount| amount.checked_mul(rate_components + Decimal::ONE))
            .and_then(|amount| amount.checked_add(fixed_taxes))
            .and_then(|amount| amount.checked_add(Decimal::ONE))
            .and_then(|amount| amount.checked_mul(self.degressive_rate.max(Decimal::ONE)));
        ceiling.map(|_| ()).ok_or_else(PricingError::booking_overflow)
    }
}

/// Amounts charged for one tax component, per day and over the whole period.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxAmount {
    pub name: String,
    pub is_rate: bool,
    pub value: Decimal,
    pub daily_amount: Decimal,
    pub total_amount: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingResult {
    pub degressive_rate: Decimal,
    pub daily_total_without_discount: Decimal,
    pub daily_total_discountable: Decimal,
    pub daily_total_discount: Decimal,
    pub daily_total_without_taxes: Decimal,
    pub daily_total_taxes: Decimal,
    pub daily_total_with_taxes: Decimal,
    pub total_without_taxes: Decimal,
    pub total_taxes: Decimal,
    pub total_with_taxes: Decimal,
    pub total_replacement: Decimal,
    pub taxes: Vec<TaxAmount>,
}

pub trait PricingCalculator: Send + Sync {
    fn compute(&self, input: &PricingInput) -> Result<PricingResult, PricingError>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DeterministicPricingCalculator;

impl PricingCalculator for DeterministicPricingCalculator {
    fn compute(&self, input: &PricingInput) -> Result<PricingResult, PricingError> {
        compute_pricing(input)
    }
}

pub fn compute_pricing(input: &PricingInput) -> Result<PricingResult, PricingError> {
    if let Err(error) = input.validate() {
        warn!(
            event_name = "pricing.compute.rejected",
            line_count = input.line_items.len(),
            error = %error,
            "pricing input rejected"
        );
        return Err(error);
    }

    let result = price_validated(input);
    debug!(
        event_name = "pricing.compute.completed",
        line_count = input.line_items.len(),
        degressive_rate = %result.degressive_rate,
        total_with_taxes = %result.total_with_taxes,
        "booking priced"
    );
    Ok(result)
}

fn price_validated(input: &PricingInput) -> PricingResult {
    let items = &input.line_items;
    let degressive_rate = input.degressive_rate;

    let daily_total_without_discount: Decimal = items.iter().map(LineItem::line_total).sum();
    let discount = compute_discount(items, input.discount_rate);
    let daily_total_without_taxes = daily_total_without_discount - discount.discount_amount;

    // Non-taxable lines leave the tax base together with their share of the discount.
    let taxable_without_discount: Decimal =
        items.iter().filter(|item| item.is_taxable).map(LineItem::line_total).sum();
    let taxable_discount =
        compute_discount_where(items, input.discount_rate, |item| item.is_taxable);
    let daily_taxable_base = taxable_without_discount - taxable_discount.discount_amount;

    let daily_taxes = compute_tax(daily_taxable_base, &input.taxes);
    let daily_total_with_taxes = daily_total_without_taxes + daily_taxes.total;

    let total_without_taxes = round_money(daily_total_without_taxes * degressive_rate);
    let period_taxes = compute_tax(round_money(daily_taxable_base * degressive_rate), &input.taxes);

    // Fixed components are charged once per document, only rate taxes scale.
    let daily_rate_taxes = daily_taxes.total - daily_taxes.fixed_total();
    let total_with_taxes =
        round_money((daily_total_without_taxes + daily_rate_taxes) * degressive_rate)
            + period_taxes.fixed_total();

    PricingResult {
        degressive_rate,
        daily_total_without_discount,
        daily_total_discountable: discount.discountable_subtotal,
        daily_total_discount: discount.discount_amount,
        daily_total_without_taxes,
        daily_total_taxes: daily_taxes.total,
        daily_total_with_taxes,
        total_without_taxes,
        total_taxes: period_taxes.total,
        total_with_taxes,
        total_replacement: compute_total_replacement(items),
        taxes: merge_tax_amounts(&daily_taxes, &period_taxes),
    }
}

fn merge_tax_amounts(daily: &TaxBreakdown, period: &TaxBreakdown) -> Vec<TaxAmount> {
    daily
        .lines
        .iter()
        .zip(&period.lines)
        .map(|(daily, period)| TaxAmount {
            name: daily.name.clone(),
            is_rate: daily.is_rate,
            value: daily.value,
            daily_amount: daily.amount,
            total_amount: period.amount,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::{
        compute_pricing, DeterministicPricingCalculator, PricingCalculator, PricingInput,
        PricingResult,
    };
    use crate::domain::degressive::{DegressiveRateTable, DegressiveTier};
    use crate::domain::line_item::LineItem;
    use crate::domain::tax::TaxComponent;
    use crate::errors::PricingError;

    fn scenario_input() -> PricingInput {
        PricingInput::new(
            vec![LineItem::new("Projecteur", "PROJ-01", 2)
                .with_unit_price(dec!(10.00))
                .with_replacement_unit_price(dec!(50.00))
                .discountable(true)],
            dec!(3.00),
        )
        .with_discount_rate(Some(dec!(0.10)))
        .with_tax_rate(Some(dec!(0.20)))
    }

    #[test]
    fn reference_scenario_produces_expected_totals() {
        let result = compute_pricing(&scenario_input()).expect("valid input");

        assert_eq!(result.daily_total_without_discount, dec!(20.00));
        assert_eq!(result.daily_total_discountable, dec!(20.00));
        assert_eq!(result.daily_total_discount, dec!(2.00));
        assert_eq!(result.daily_total_without_taxes, dec!(18.00));
        assert_eq!(result.daily_total_taxes, dec!(3.60));
        assert_eq!(result.daily_total_with_taxes, dec!(21.60));
        assert_eq!(result.total_without_taxes, dec!(54.00));
        assert_eq!(result.total_taxes, dec!(10.80));
        assert_eq!(result.total_with_taxes, dec!(64.80));
        assert_eq!(result.total_replacement, dec!(100.00));
        assert_eq!(result.degressive_rate, dec!(3.00));
    }

    #[test]
    fn legacy_rate_is_reported_as_single_vat_line() {
        let result = compute_pricing(&scenario_input()).expect("valid input");

        assert_eq!(result.taxes.len(), 1);
        assert_eq!(result.taxes[0].name, "VAT");
        assert_eq!(result.taxes[0].daily_amount, dec!(3.60));
        assert_eq!(result.taxes[0].total_amount, dec!(10.80));
    }

    #[test]
    fn empty_booking_prices_to_zero() {
        let input = PricingInput::new(Vec::new(), dec!(2.5))
            .with_discount_rate(Some(dec!(0.10)))
            .with_taxes(vec![
                TaxComponent::vat(dec!(0.20)),
                TaxComponent::fixed("Levy", dec!(3.00)),
            ]);

        let result = compute_pricing(&input).expect("empty booking is valid");

        let amounts = [
            result.daily_total_without_discount,
            result.daily_total_discountable,
            result.daily_total_discount,
            result.daily_total_without_taxes,
            result.daily_total_taxes,
            result.daily_total_with_taxes,
            result.total_without_taxes,
            result.total_taxes,
            result.total_with_taxes,
            result.total_replacement,
        ];
        assert!(amounts.iter().all(Decimal::is_zero));
    }

    #[test]
    fn negative_quantity_is_rejected_before_pricing() {
        let mut input = scenario_input();
        input.line_items.push(LineItem::new("Câble", "XLR-05", -1).with_unit_price(dec!(2.00)));

        let error = compute_pricing(&input).expect_err("negative quantity must fail");

        assert_eq!(
            error,
            PricingError::InvalidQuantity { reference: "XLR-05".to_string(), quantity: -1 }
        );
    }

    #[test]
    fn out_of_range_rates_are_rejected() {
        let negative_discount = scenario_input().with_discount_rate(Some(dec!(-0.01)));
        let excessive_discount = scenario_input().with_discount_rate(Some(dec!(1.01)));
        let negative_tax = scenario_input().with_tax_rate(Some(dec!(-0.2)));
        let mut negative_degressive = scenario_input();
        negative_degressive.degressive_rate = dec!(-1);

        for input in [negative_discount, excessive_discount, negative_tax, negative_degressive] {
            let error = compute_pricing(&input).expect_err("rate must be rejected");
            assert!(matches!(error, PricingError::InvalidRate { .. }), "unexpected {error:?}");
        }
    }

    #[test]
    fn non_taxable_lines_are_left_out_of_the_tax_base() {
        let input = PricingInput::new(
            vec![
                LineItem::new("Régie", "REG-01", 1).with_unit_price(dec!(100.00)),
                LineItem::new("Transport", "TRANS", 1)
                    .with_unit_price(dec!(50.00))
                    .taxable(false),
            ],
            dec!(2),
        )
        .with_discount_rate(Some(dec!(0.10)))
        .with_tax_rate(Some(dec!(0.20)));

        let result = compute_pricing(&input).expect("valid input");

        assert_eq!(result.daily_total_without_taxes, dec!(135.00));
        assert_eq!(result.daily_total_taxes, dec!(18.00));
        assert_eq!(result.daily_total_with_taxes, dec!(153.00));
        assert_eq!(result.total_without_taxes, dec!(270.00));
        assert_eq!(result.total_taxes, dec!(36.00));
        assert_eq!(result.total_with_taxes, dec!(306.00));
    }

    #[test]
    fn fixed_tax_is_charged_once_per_document() {
        let input = PricingInput::new(
            vec![LineItem::new("Scène", "STAGE-4x3", 1).with_unit_price(dec!(300.00))],
            dec!(4),
        )
        .with_taxes(vec![TaxComponent::fixed("Eco-participation", dec!(5.00))]);

        let result = compute_pricing(&input).expect("valid input");

        assert_eq!(result.daily_total_taxes, dec!(5.00));
        assert_eq!(result.daily_total_with_taxes, dec!(305.00));
        assert_eq!(result.total_taxes, dec!(5.00));
        assert_eq!(result.total_without_taxes, dec!(1200.00));
        assert_eq!(result.total_with_taxes, dec!(1205.00));
    }

    #[test]
    fn grand_total_adds_up_with_rate_and_fixed_taxes() {
        let input = PricingInput::new(
            vec![
                LineItem::new("Régie", "REG-01", 1).with_unit_price(dec!(100.00)),
                LineItem::new("Transport", "TRANS", 1)
                    .with_unit_price(dec!(50.00))
                    .taxable(false),
            ],
            dec!(3),
        )
        .with_taxes(vec![
            TaxComponent::vat(dec!(0.20)),
            TaxComponent::fixed("Eco-participation", dec!(2.50)),
        ]);

        let result = compute_pricing(&input).expect("valid input");

        assert_eq!(result.daily_total_taxes, dec!(22.50));
        assert_eq!(result.daily_total_with_taxes, dec!(172.50));
        assert_eq!(result.total_without_taxes, dec!(450.00));
        assert_eq!(result.total_taxes, dec!(62.50));
        assert_eq!(result.total_with_taxes, dec!(512.50));
        assert_eq!(result.total_with_taxes, result.total_without_taxes + result.total_taxes);
    }

    #[test]
    fn oversized_line_is_rejected_instead_of_overflowing() {
        let input = PricingInput::new(
            vec![LineItem::new("Groupe électrogène", "GEN-100", i64::MAX)
                .with_unit_price(dec!(100000000000))],
            dec!(1),
        );

        let error = compute_pricing(&input).expect_err("line total cannot be represented");

        assert_eq!(error, PricingError::line_overflow("GEN-100"));
    }

    #[test]
    fn oversized_booking_is_rejected_instead_of_overflowing() {
        let at_limit = PricingInput::new(
            vec![LineItem::new("Plateau", "PLAT-01", 1).with_unit_price(Decimal::MAX)],
            dec!(1),
        );
        let huge_multiplier = PricingInput::new(
            vec![LineItem::new("Plateau", "PLAT-01", 1)
                .with_unit_price(dec!(100000000000000000000))],
            dec!(10000000000),
        );

        for input in [at_limit, huge_multiplier] {
            let error = compute_pricing(&input).expect_err("period total cannot be represented");
            assert_eq!(error, PricingError::booking_overflow());
        }
    }

    #[test]
    fn period_input_freezes_the_resolved_multiplier() {
        let table = DegressiveRateTable::new(vec![
            DegressiveTier::rate(1, dec!(100)),
            DegressiveTier::rate(3, dec!(50)),
        ])
        .expect("valid table");

        let input = PricingInput::for_duration(
            vec![LineItem::new("Praticable", "PRAT-2x1", 4).with_unit_price(dec!(12.50))],
            5,
            &table,
        )
        .expect("valid duration");

        let result = compute_pricing(&input).expect("valid input");

        assert_eq!(result.degressive_rate, dec!(3.5));
        assert_eq!(result.total_without_taxes, dec!(175.00));
    }

    #[test]
    fn calculator_trait_matches_free_function() {
        let calculator: &dyn PricingCalculator = &DeterministicPricingCalculator;
        let input = scenario_input();

        let via_trait: PricingResult = calculator.compute(&input).expect("valid input");
        assert_eq!(Ok(via_trait), compute_pricing(&input));
    }
}
