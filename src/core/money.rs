//! Money arithmetic shared by orders, the dashboard and labels.
//!
//! All amounts are `Decimal`. Totals are rounded once, at the end, to 2 decimal places with
//! half-up rounding; every displayed or persisted total goes through [`round_money`].

use crate::entities::order_line;
use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places kept on monetary totals.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Rounds a monetary amount to cents, half-up.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// `unit_price × quantity`, or zero when either side is missing.
///
/// The result is not rounded so that sums of line totals round only once.
#[must_use]
pub fn line_total(quantity: Option<i32>, unit_price: Option<Decimal>) -> Decimal {
    match (quantity, unit_price) {
        (Some(quantity), Some(unit_price)) => unit_price * Decimal::from(quantity),
        _ => Decimal::ZERO,
    }
}

/// Sum of the line totals, rounded to cents.
#[must_use]
pub fn order_total<'a, I>(lines: I) -> Decimal
where
    I: IntoIterator<Item = &'a order_line::Model>,
{
    round_money(lines.into_iter().map(order_line::Model::total).sum())
}

/// Formats an amount the way it is printed on labels and listings: `12.50 €`.
#[must_use]
pub fn format_euros(amount: Decimal) -> String {
    format!("{:.2} €", round_money(amount))
}
