//! Purchase entity - An expense of the apiary (jars, sugar syrup, treatments...).
//! Purchases are independent of orders and only feed the dashboard.

use super::amount::Amount;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purchase database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    /// Unique identifier for the purchase
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Date of the purchase
    pub purchase_date: Date,
    /// What was bought
    pub designation: String,
    /// Amount paid (always positive)
    #[sea_orm(column_type = "Text")]
    pub amount: Amount,
    /// Category key (see `core::purchase::PurchaseCategory`)
    pub category: String,
    /// Free-text notes
    pub notes: Option<String>,
    /// When the purchase was recorded
    pub created_at: DateTimeUtc,
}

/// Purchases have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
