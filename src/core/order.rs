//! Order business logic - Creation, editing, status changes and queries.
//!
//! An order always has at least one line. Each line stores its own unit price, captured
//! when the line is written: lines without an explicit price are priced from the product's
//! price for the current year, and a missing price aborts the whole operation. Every
//! mutating function runs in a single database transaction, so a failure never leaves a
//! half-written order behind.

use crate::{
    core::{
        client::require_active_client,
        money::{line_total, order_total},
        order_status::{OrderStatus, check_transition},
        pricing::resolve_price,
    },
    entities::{Order, OrderLine, Product, order, order_line},
    errors::{Error, Result},
};
use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{DatabaseTransaction, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, info, instrument};

/// A line as submitted by the caller. `unit_price: None` means "use this year's price".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderLine {
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: Option<Decimal>,
}

impl NewOrderLine {
    /// Line priced from the product's current-year price.
    #[must_use]
    pub const fn auto_priced(product_id: i64, quantity: i32) -> Self {
        Self {
            product_id,
            quantity,
            unit_price: None,
        }
    }

    /// Line with an explicit unit price.
    #[must_use]
    pub const fn priced(product_id: i64, quantity: i32, unit_price: Decimal) -> Self {
        Self {
            product_id,
            quantity,
            unit_price: Some(unit_price),
        }
    }

    /// Provisional total; zero while the price is still unknown.
    #[must_use]
    pub fn total(&self) -> Decimal {
        line_total(Some(self.quantity), self.unit_price)
    }
}

/// An order as submitted by the caller. Unset date and status get defaults on creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub client_id: i64,
    pub order_date: Option<NaiveDate>,
    pub status: Option<OrderStatus>,
    pub notes: Option<String>,
    pub lines: Vec<NewOrderLine>,
}

/// Edits applied by [`update_order`]. `None` fields are left untouched; `lines: Some(..)`
/// replaces the whole line collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderChanges {
    pub order_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub lines: Option<Vec<NewOrderLine>>,
}

/// Filters for [`list_orders`]. Date bounds are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub client_id: Option<i64>,
    pub status: Option<OrderStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// An order header together with its lines (ordered by id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderWithLines {
    pub order: order::Model,
    pub lines: Vec<order_line::Model>,
}

impl OrderWithLines {
    /// Parsed status of the order.
    ///
    /// # Errors
    /// Returns `Error::InvalidArgument` if the stored status is not a known value.
    pub fn status(&self) -> Result<OrderStatus> {
        self.order.status.parse()
    }

    /// Order total, rounded to cents.
    #[must_use]
    pub fn total(&self) -> Decimal {
        order_total(&self.lines)
    }
}

/// Rejects empty orders and non-positive quantities or prices, before touching storage.
fn validate_lines(lines: &[NewOrderLine]) -> Result<()> {
    if lines.is_empty() {
        return Err(Error::validation("An order needs at least one line"));
    }
    for line in lines {
        if line.quantity <= 0 {
            return Err(Error::validation(format!(
                "Quantity must be positive for product {}, got {}",
                line.product_id, line.quantity
            )));
        }
        if matches!(line.unit_price, Some(price) if price <= Decimal::ZERO) {
            return Err(Error::validation(format!(
                "Unit price must be positive for product {}",
                line.product_id
            )));
        }
    }
    Ok(())
}

struct PricedLine {
    product_id: i64,
    quantity: i32,
    unit_price: Decimal,
}

/// Fills in missing unit prices from `year`'s prices and checks every product exists.
async fn price_lines(
    txn: &DatabaseTransaction,
    lines: &[NewOrderLine],
    year: i32,
) -> Result<Vec<PricedLine>> {
    let mut priced = Vec::with_capacity(lines.len());
    for line in lines {
        Product::find_by_id(line.product_id)
            .one(txn)
            .await?
            .ok_or(Error::NotFound {
                entity: "product",
                id: line.product_id,
            })?;

        let unit_price = match line.unit_price {
            Some(price) => price,
            None => resolve_price(txn, line.product_id, year).await?,
        };
        priced.push(PricedLine {
            product_id: line.product_id,
            quantity: line.quantity,
            unit_price,
        });
    }
    Ok(priced)
}

async fn insert_lines(
    txn: &DatabaseTransaction,
    order_id: i64,
    lines: Vec<PricedLine>,
) -> Result<Vec<order_line::Model>> {
    let mut inserted = Vec::with_capacity(lines.len());
    for line in lines {
        let row = order_line::ActiveModel {
            order_id: Set(order_id),
            product_id: Set(line.product_id),
            quantity: Set(line.quantity),
            unit_price: Set(line.unit_price.into()),
            ..Default::default()
        };
        inserted.push(row.insert(txn).await?);
    }
    Ok(inserted)
}

async fn load_lines<C>(db: &C, order_id: i64) -> Result<Vec<order_line::Model>>
where
    C: ConnectionTrait,
{
    OrderLine::find()
        .filter(order_line::Column::OrderId.eq(order_id))
        .order_by_asc(order_line::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

async fn require_order<C>(db: &C, order_id: i64) -> Result<order::Model>
where
    C: ConnectionTrait,
{
    Order::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "order",
            id: order_id,
        })
}

/// Creates an order with its lines.
///
/// Defaults: the order date is today and the status is `PLACED`. Lines without an explicit
/// unit price get the product's price for the current year.
///
/// # Errors
/// Returns an error if:
/// - The order has no lines, or a line has a non-positive quantity or price (`Validation`)
/// - The client is missing or deleted, or a product is missing (`NotFound`)
/// - An unpriced line's product has no price this year (`PriceNotFound`)
///
/// Nothing is written in any of these cases.
#[instrument(skip(db, new_order), fields(client_id = new_order.client_id, lines = new_order.lines.len()))]
pub async fn create_order(db: &DatabaseConnection, new_order: NewOrder) -> Result<OrderWithLines> {
    validate_lines(&new_order.lines)?;

    let today = Utc::now().date_naive();
    let order_date = new_order.order_date.unwrap_or(today);
    let status = new_order.status.unwrap_or(OrderStatus::Placed);

    // Use a transaction to ensure atomicity
    let txn = db.begin().await?;

    require_active_client(&txn, new_order.client_id).await?;
    let priced = price_lines(&txn, &new_order.lines, today.year()).await?;

    let now = Utc::now();
    let header = order::ActiveModel {
        client_id: Set(new_order.client_id),
        order_date: Set(order_date),
        status: Set(status.as_str().to_string()),
        notes: Set(new_order.notes),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let order = header.insert(&txn).await?;
    let lines = insert_lines(&txn, order.id, priced).await?;

    txn.commit().await?;

    let created = OrderWithLines { order, lines };
    info!(
        "Created order {} for client {} with {} lines, total {}",
        created.order.id,
        created.order.client_id,
        created.lines.len(),
        created.total()
    );
    Ok(created)
}

/// Moves an order to `requested` if the transition table allows it.
///
/// # Errors
/// Returns `Error::NotFound` for an unknown order and `Error::InvalidStatusTransition`
/// (carrying both states) for a disallowed change. The order is untouched in both cases.
#[instrument(skip(db))]
pub async fn update_status(
    db: &DatabaseConnection,
    order_id: i64,
    requested: OrderStatus,
) -> Result<order::Model> {
    let txn = db.begin().await?;

    let order = require_order(&txn, order_id).await?;
    let current: OrderStatus = order.status.parse()?;
    check_transition(current, requested)?;

    let mut active: order::ActiveModel = order.into();
    active.status = Set(requested.as_str().to_string());
    active.updated_at = Set(Utc::now());
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    info!("Order {} moved from {} to {}", order_id, current, requested);
    Ok(updated)
}

/// Loads an order with its lines.
///
/// # Errors
/// Returns `Error::NotFound` if the order does not exist.
pub async fn get_order<C>(db: &C, order_id: i64) -> Result<OrderWithLines>
where
    C: ConnectionTrait,
{
    let order = require_order(db, order_id).await?;
    let lines = load_lines(db, order.id).await?;
    debug!("Loaded order {} with {} lines", order_id, lines.len());
    Ok(OrderWithLines { order, lines })
}

/// Orders matching `filter`, newest first (by order date, then id).
pub async fn list_orders(
    db: &DatabaseConnection,
    filter: OrderFilter,
) -> Result<Vec<OrderWithLines>> {
    let mut query = Order::find();
    if let Some(client_id) = filter.client_id {
        query = query.filter(order::Column::ClientId.eq(client_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(order::Column::Status.eq(status.as_str()));
    }
    if let Some(from) = filter.from {
        query = query.filter(order::Column::OrderDate.gte(from));
    }
    if let Some(to) = filter.to {
        query = query.filter(order::Column::OrderDate.lte(to));
    }

    let mut orders: Vec<OrderWithLines> = query
        .find_with_related(OrderLine)
        .all(db)
        .await?
        .into_iter()
        .map(|(order, mut lines)| {
            lines.sort_by_key(|l| l.id);
            OrderWithLines { order, lines }
        })
        .collect();

    orders.sort_by(|a, b| {
        b.order
            .order_date
            .cmp(&a.order.order_date)
            .then(b.order.id.cmp(&a.order.id))
    });
    Ok(orders)
}

/// Edits an order's date, notes and/or lines.
///
/// Replacing the lines deletes the old ones; new lines are validated and priced exactly as
/// on creation. Paid orders are closed and cannot be edited.
///
/// # Errors
/// Returns `Error::NotFound`, `Error::Validation` (empty line set, bad line, paid order)
/// or `Error::PriceNotFound`; nothing is written on error.
#[instrument(skip(db, changes))]
pub async fn update_order(
    db: &DatabaseConnection,
    order_id: i64,
    changes: OrderChanges,
) -> Result<OrderWithLines> {
    if let Some(lines) = &changes.lines {
        validate_lines(lines)?;
    }

    let txn = db.begin().await?;

    let order = require_order(&txn, order_id).await?;
    let status: OrderStatus = order.status.parse()?;
    if status.is_terminal() {
        return Err(Error::validation(format!(
            "Order {order_id} is {status} and can no longer be edited"
        )));
    }

    if let Some(lines) = &changes.lines {
        let priced = price_lines(&txn, lines, Utc::now().year()).await?;
        let removed = OrderLine::delete_many()
            .filter(order_line::Column::OrderId.eq(order_id))
            .exec(&txn)
            .await?;
        debug!("Removed {} old lines from order {}", removed.rows_affected, order_id);
        insert_lines(&txn, order_id, priced).await?;
    }

    let mut active: order::ActiveModel = order.into();
    if let Some(order_date) = changes.order_date {
        active.order_date = Set(order_date);
    }
    if let Some(notes) = changes.notes {
        let notes = notes.trim().to_string();
        active.notes = Set((!notes.is_empty()).then_some(notes));
    }
    active.updated_at = Set(Utc::now());
    let order = active.update(&txn).await?;
    let lines = load_lines(&txn, order_id).await?;

    txn.commit().await?;
    info!("Updated order {}", order_id);
    Ok(OrderWithLines { order, lines })
}

/// Deletes an order and all of its lines.
///
/// # Errors
/// Returns `Error::NotFound` if the order does not exist.
#[instrument(skip(db))]
pub async fn delete_order(db: &DatabaseConnection, order_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let order = require_order(&txn, order_id).await?;
    OrderLine::delete_many()
        .filter(order_line::Column::OrderId.eq(order_id))
        .exec(&txn)
        .await?;
    order.delete(&txn).await?;

    txn.commit().await?;
    info!("Deleted order {}", order_id);
    Ok(())
}
