use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Snapshot of one booked material, taken when a booking is priced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub reference: String,
    pub quantity: i64,
    #[serde(default)]
    pub unit_price: Option<Decimal>,
    #[serde(default)]
    pub replacement_unit_price: Option<Decimal>,
    #[serde(default = "default_true")]
    pub is_discountable: bool,
    #[serde(default = "default_true")]
    pub is_taxable: bool,
}

fn default_true() -> bool {
    true
}

impl LineItem {
    pub fn new(name: impl Into<String>, reference: impl Into<String>, quantity: i64) -> Self {
        Self {
            name: name.into(),
            reference: reference.into(),
            quantity,
            unit_price: None,
            replacement_unit_price: None,
            is_discountable: true,
            is_taxable: true,
        }
    }

    pub fn with_unit_price(mut self, unit_price: Decimal) -> Self {
        self.unit_price = Some(unit_price);
        self
    }

    pub fn with_replacement_unit_price(mut self, replacement_unit_price: Decimal) -> Self {
        self.replacement_unit_price = Some(replacement_unit_price);
        self
    }

    pub fn discountable(mut self, is_discountable: bool) -> Self {
        self.is_discountable = is_discountable;
        self
    }

    pub fn taxable(mut self, is_taxable: bool) -> Self {
        self.is_taxable = is_taxable;
        self
    }

    /// Unrounded daily amount for this line; a missing price counts as zero.
    pub fn line_total(&self) -> Decimal {
        self.unit_price.unwrap_or(Decimal::ZERO) * Decimal::from(self.quantity)
    }

    pub fn replacement_total(&self) -> Decimal {
        self.replacement_unit_price.unwrap_or(Decimal::ZERO) * Decimal::from(self.quantity)
    }

    /// `line_total` and `replacement_total`, or `None` when either leaves the
    /// `Decimal` range.
    pub fn checked_totals(&self) -> Option<(Decimal, Decimal)> {
        let quantity = Decimal::from(self.quantity);
        let total = self.unit_price.unwrap_or(Decimal::ZERO).checked_mul(quantity)?;
        let replacement =
            self.replacement_unit_price.unwrap_or(Decimal::ZERO).checked_mul(quantity)?;
        Some((total, replacement))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::LineItem;

    #[test]
    fn missing_prices_contribute_nothing() {
        let item = LineItem::new("Console 32 voies", "CONS-32", 3);

        assert_eq!(item.line_total(), Decimal::ZERO);
        assert_eq!(item.replacement_total(), Decimal::ZERO);
    }

    #[test]
    fn totals_multiply_by_quantity_without_rounding() {
        let item = LineItem::new("Projecteur LED", "PAR-LED", 3)
            .with_unit_price(Decimal::new(3333, 3))
            .with_replacement_unit_price(Decimal::new(12050, 2));

        assert_eq!(item.line_total(), Decimal::new(9999, 3));
        assert_eq!(item.replacement_total(), Decimal::new(36150, 2));
    }

    #[test]
    fn checked_totals_report_overflow() {
        let item = LineItem::new("Truss", "TRUSS-3M", 4)
            .with_unit_price(Decimal::new(2500, 2))
            .with_replacement_unit_price(Decimal::new(900, 0));
        assert_eq!(item.checked_totals(), Some((Decimal::new(10000, 2), Decimal::new(3600, 0))));

        let huge = LineItem::new("Truss", "TRUSS-3M", i64::MAX)
            .with_unit_price(Decimal::new(100_000_000_000, 0));
        assert_eq!(huge.checked_totals(), None);
    }

    #[test]
    fn flags_default_to_true_when_omitted() {
        let item: LineItem = serde_json::from_str(
            r#"{"name":"Câble XLR","reference":"XLR-10","quantity":12,"unit_price":"1.50"}"#,
        )
        .expect("line item should deserialize");

        assert!(item.is_discountable);
        assert!(item.is_taxable);
        assert_eq!(item.replacement_unit_price, None);
        assert_eq!(item.unit_price, Some(Decimal::new(150, 2)));
    }
}
