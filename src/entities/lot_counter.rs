//! Lot counter entity - Last lot sequence issued for a `(year, abbreviation)` key.
//!
//! The composite primary key is the uniqueness guarantee the sequencer's upsert relies on.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lot counter database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lot_counters")]
pub struct Model {
    /// Harvest year
    #[sea_orm(primary_key, auto_increment = false)]
    pub year: i32,
    /// Honey type abbreviation (e.g., `"TF"`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub abbreviation: String,
    /// Last sequence number handed out for this key
    pub last_value: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
