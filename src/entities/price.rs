//! Price entity - Unit price of a product for one calendar year.
//!
//! There is at most one row per `(product_id, year)`; the unique index is created
//! alongside the table in `config::database::create_tables`.

use super::amount::Amount;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Price database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "prices")]
pub struct Model {
    /// Unique identifier for the price row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Product this price applies to
    pub product_id: i64,
    /// Calendar year the price is valid for
    pub year: i32,
    /// Unit price
    #[sea_orm(column_type = "Text")]
    pub amount: Amount,
}

/// Defines relationships between Price and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each price belongs to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_delete = "Cascade"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
