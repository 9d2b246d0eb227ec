//! Dashboard figures - Revenue, expenses, profit and best sellers over a date range.
//!
//! Only PAID orders count as revenue. Periods are inclusive on both ends and every
//! amount is rounded to cents with the same helper orders use.

use crate::{
    core::{
        money::{order_total, round_money},
        order_status::OrderStatus,
        purchase::list_purchases,
    },
    entities::{Order, OrderLine, Product, order, order_line, product},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{JoinType, PaginatorTrait, QuerySelect, prelude::*};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};

/// Sales of one product over a period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSales {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub revenue: Decimal,
}

/// Everything shown on the dashboard for one period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub revenue: Decimal,
    pub expenses: Decimal,
    pub profit: Decimal,
    /// Orders dated in the period that are not paid yet
    pub open_orders: u64,
    pub top_products: Vec<ProductSales>,
}

/// First and last day of `year`.
///
/// # Errors
/// Returns `Error::InvalidArgument` for a year chrono cannot represent.
pub fn year_bounds(year: i32) -> Result<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1);
    let end = NaiveDate::from_ymd_opt(year, 12, 31);
    start
        .zip(end)
        .ok_or_else(|| Error::invalid_argument(format!("Year {year} is out of range")))
}

fn check_period(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start > end {
        return Err(Error::invalid_argument(format!(
            "Period start {start} is after its end {end}"
        )));
    }
    Ok(())
}

/// Lines of PAID orders dated within `[start, end]`.
async fn paid_lines<C>(db: &C, start: NaiveDate, end: NaiveDate) -> Result<Vec<order_line::Model>>
where
    C: ConnectionTrait,
{
    OrderLine::find()
        .join(JoinType::InnerJoin, order_line::Relation::Order.def())
        .filter(order::Column::Status.eq(OrderStatus::Paid.as_str()))
        .filter(order::Column::OrderDate.between(start, end))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Total of all PAID orders dated within `[start, end]`.
///
/// Each order is rounded to cents first, exactly as its total is shown, so the revenue
/// always equals the sum of the displayed order totals.
pub async fn revenue<C>(db: &C, start: NaiveDate, end: NaiveDate) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    check_period(start, end)?;
    let lines = paid_lines(db, start, end).await?;
    debug!("Revenue from {} paid lines", lines.len());

    let mut by_order: BTreeMap<i64, Vec<order_line::Model>> = BTreeMap::new();
    for line in lines {
        by_order.entry(line.order_id).or_default().push(line);
    }
    Ok(round_money(
        by_order.values().map(|lines| order_total(lines)).sum(),
    ))
}

/// Total of all purchases dated within `[start, end]`.
pub async fn expenses<C>(db: &C, start: NaiveDate, end: NaiveDate) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    check_period(start, end)?;
    let purchases = list_purchases(db, start, end).await?;
    Ok(round_money(purchases.iter().map(|p| p.amount.0).sum()))
}

/// `revenue - expenses` for `[start, end]`.
pub async fn profit<C>(db: &C, start: NaiveDate, end: NaiveDate) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    let revenue = revenue(db, start, end).await?;
    let expenses = expenses(db, start, end).await?;
    Ok(round_money(revenue - expenses))
}

/// Best-selling products of PAID orders in `[start, end]`, by quantity sold.
///
/// Products selling the same quantity are ordered by id, lowest first.
pub async fn top_products<C>(
    db: &C,
    start: NaiveDate,
    end: NaiveDate,
    limit: usize,
) -> Result<Vec<ProductSales>>
where
    C: ConnectionTrait,
{
    check_period(start, end)?;
    let lines = paid_lines(db, start, end).await?;

    // Keyed by product id so equal quantities keep id order through the stable sort
    let mut totals: BTreeMap<i64, (i64, Decimal)> = BTreeMap::new();
    for line in &lines {
        let entry = totals.entry(line.product_id).or_insert((0, Decimal::ZERO));
        entry.0 += i64::from(line.quantity);
        entry.1 += line.total();
    }

    let names: HashMap<i64, String> = Product::find()
        .filter(product::Column::Id.is_in(totals.keys().copied()))
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();

    let mut sales: Vec<ProductSales> = totals
        .into_iter()
        .map(|(product_id, (quantity, revenue))| ProductSales {
            product_id,
            product_name: names.get(&product_id).cloned().unwrap_or_default(),
            quantity,
            revenue: round_money(revenue),
        })
        .collect();
    sales.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    sales.truncate(limit);
    Ok(sales)
}

/// All dashboard figures for `[start, end]`.
#[instrument(skip(db))]
pub async fn dashboard_summary<C>(
    db: &C,
    start: NaiveDate,
    end: NaiveDate,
    top_n: usize,
) -> Result<DashboardSummary>
where
    C: ConnectionTrait,
{
    let revenue = revenue(db, start, end).await?;
    let expenses = expenses(db, start, end).await?;
    let open_orders = Order::find()
        .filter(order::Column::Status.ne(OrderStatus::Paid.as_str()))
        .filter(order::Column::OrderDate.between(start, end))
        .count(db)
        .await?;
    let top_products = top_products(db, start, end, top_n).await?;

    Ok(DashboardSummary {
        start,
        end,
        revenue,
        expenses,
        profit: round_money(revenue - expenses),
        open_orders,
        top_products,
    })
}
