//! Label history entity - One row per printed label batch. Rows are written once and
//! never updated.

use super::amount::Amount;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Label history database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "label_history")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Honey type key
    pub honey_type: String,
    /// Jar format key (e.g., `"500g"`)
    pub jar_format: String,
    /// Harvest date printed on the label
    pub harvest_date: Date,
    /// Best-before date printed on the label
    pub dluo: Date,
    /// Lot number printed on the label
    pub lot_number: String,
    /// Number of labels printed
    pub quantity: i32,
    /// Price printed, None when no price could be resolved
    #[sea_orm(column_type = "Text", nullable)]
    pub price: Option<Amount>,
    /// When the labels were generated
    pub generated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
