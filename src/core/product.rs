//! Product business logic - Handles all product-related operations.
//!
//! Products are the things a client can order. They carry a name, an optional honey type
//! and a unit label; prices are kept per year in [`crate::core::pricing`].

use crate::{
    core::honey::HoneyType,
    entities::{Product, product},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

/// Fields used to create or update a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetails {
    pub name: String,
    pub honey_type: Option<HoneyType>,
    pub unit: String,
}

impl ProductDetails {
    fn validated(&self) -> Result<(String, String)> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::validation("Product name cannot be empty"));
        }
        let unit = self.unit.trim();
        if unit.is_empty() {
            return Err(Error::validation("Product unit cannot be empty"));
        }
        Ok((name.to_string(), unit.to_string()))
    }
}

/// Retrieves all products, ordered alphabetically by name.
pub async fn list_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific product by its unique ID.
pub async fn get_product_by_id<C>(db: &C, product_id: i64) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new product after validating its name and unit.
///
/// # Errors
/// Returns an error if the name or unit is empty or the insert fails.
#[instrument(skip(db))]
pub async fn create_product(
    db: &DatabaseConnection,
    details: ProductDetails,
) -> Result<product::Model> {
    let (name, unit) = details.validated()?;
    let now = chrono::Utc::now();

    let product = product::ActiveModel {
        name: Set(name),
        honey_type: Set(details.honey_type.map(|t| t.key().to_string())),
        unit: Set(unit),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = product.insert(db).await?;
    info!("Created product {} ({})", created.id, created.name);
    Ok(created)
}

/// Updates an existing product's name, honey type and unit.
///
/// # Errors
/// Returns `Error::NotFound` if the product does not exist, `Error::Validation` for empty
/// fields.
#[instrument(skip(db))]
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i64,
    details: ProductDetails,
) -> Result<product::Model> {
    let (name, unit) = details.validated()?;
    let existing = get_product_by_id(db, product_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "product",
            id: product_id,
        })?;

    let mut active: product::ActiveModel = existing.into();
    active.name = Set(name);
    active.honey_type = Set(details.honey_type.map(|t| t.key().to_string()));
    active.unit = Set(unit);
    active.updated_at = Set(chrono::Utc::now());
    active.update(db).await.map_err(Into::into)
}

/// Parsed honey type of a product, if it has a valid one.
#[must_use]
pub fn honey_type_of(product: &product::Model) -> Option<HoneyType> {
    product.honey_type.as_deref().and_then(|t| t.parse().ok())
}
