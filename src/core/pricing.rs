//! Year-scoped product prices.
//!
//! A price applies to exactly one `(product, year)` pair. Lookups never fall back to
//! another year: a missing row is reported as `Error::PriceNotFound` so the caller can
//! register the price or supply one explicitly.

use crate::{
    entities::{Price, Product, price},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, info, instrument};

/// Returns the unit price of `product_id` for `year`.
///
/// # Errors
/// Returns `Error::PriceNotFound` when no price is registered for that exact pair.
#[instrument(skip(db))]
pub async fn resolve_price<C>(db: &C, product_id: i64, year: i32) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    let found = Price::find()
        .filter(price::Column::ProductId.eq(product_id))
        .filter(price::Column::Year.eq(year))
        .one(db)
        .await?;

    debug!("Price lookup for product {} in {}: {:?}", product_id, year, found);
    found
        .map(|p| p.amount.0)
        .ok_or(Error::PriceNotFound { product_id, year })
}

/// Like [`resolve_price`], but a missing price is `Ok(None)` instead of an error.
pub async fn find_price<C>(db: &C, product_id: i64, year: i32) -> Result<Option<Decimal>>
where
    C: ConnectionTrait,
{
    match resolve_price(db, product_id, year).await {
        Ok(amount) => Ok(Some(amount)),
        Err(Error::PriceNotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Registers (or replaces) the price of a product for a year.
///
/// # Errors
/// Returns an error if:
/// - The amount is not strictly positive
/// - The product does not exist
/// - The database upsert fails
#[instrument(skip(db))]
pub async fn set_price(
    db: &DatabaseConnection,
    product_id: i64,
    year: i32,
    amount: Decimal,
) -> Result<price::Model> {
    if amount <= Decimal::ZERO {
        return Err(Error::validation(format!(
            "Price must be positive, got {amount}"
        )));
    }

    Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "product",
            id: product_id,
        })?;

    let row = price::ActiveModel {
        product_id: Set(product_id),
        year: Set(year),
        amount: Set(amount.into()),
        ..Default::default()
    };
    Price::insert(row)
        .on_conflict(
            OnConflict::columns([price::Column::ProductId, price::Column::Year])
                .update_column(price::Column::Amount)
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    let stored = Price::find()
        .filter(price::Column::ProductId.eq(product_id))
        .filter(price::Column::Year.eq(year))
        .one(db)
        .await?
        .ok_or(Error::PriceNotFound { product_id, year })?;

    info!("Price of product {} for {} set to {}", product_id, year, amount);
    Ok(stored)
}

/// All prices of a product, most recent year first.
pub async fn list_prices_for_product(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Vec<price::Model>> {
    Price::find()
        .filter(price::Column::ProductId.eq(product_id))
        .order_by_desc(price::Column::Year)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Removes the price of a product for a year.
///
/// # Errors
/// Returns `Error::PriceNotFound` if there was nothing to delete.
#[instrument(skip(db))]
pub async fn delete_price(db: &DatabaseConnection, product_id: i64, year: i32) -> Result<()> {
    let result = Price::delete_many()
        .filter(price::Column::ProductId.eq(product_id))
        .filter(price::Column::Year.eq(year))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::PriceNotFound { product_id, year });
    }
    info!("Deleted price of product {} for {}", product_id, year);
    Ok(())
}
