use rust_decimal::Decimal;

use crate::domain::line_item::LineItem;

pub fn compute_total_replacement(items: &[LineItem]) -> Decimal {
    items.iter().map(LineItem::replacement_total).sum()
}
