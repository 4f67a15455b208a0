use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::line_item::LineItem;
use crate::pricing::rounding::round_money;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountBreakdown {
    pub discountable_subtotal: Decimal,
    pub discount_amount: Decimal,
}

/// Discount over the lines flagged discountable. The subtotal is reported even
/// when no rate applies so that documents can show what was eligible.
pub fn compute_discount(items: &[LineItem], discount_rate: Option<Decimal>) -> DiscountBreakdown {
    compute_discount_where(items, discount_rate, |_| true)
}

pub(crate) fn compute_discount_where(
    items: &[LineItem],
    discount_rate: Option<Decimal>,
    include: impl Fn(&LineItem) -> bool,
) -> DiscountBreakdown {
    let discountable_subtotal: Decimal = items
        .iter()
        .filter(|item| item.is_discountable && include(*item))
        .map(LineItem::line_total)
        .sum();
    let discount_amount = match discount_rate {
        Some(rate) => round_money(discountable_subtotal * rate),
        None => Decimal::ZERO,
    };

    DiscountBreakdown { discountable_subtotal, discount_amount }
}
