//! Client entity - Represents a customer of the apiary.
//!
//! Clients are soft-deleted: `deleted_at` hides them from active listings while their
//! orders keep pointing at the row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Client database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    /// Unique identifier for the client
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (person or shop)
    pub name: String,
    /// Optional contact email
    pub email: Option<String>,
    /// Optional contact phone number
    pub phone: Option<String>,
    /// Optional postal address
    pub address: Option<String>,
    /// Free-text notes
    pub notes: Option<String>,
    /// When the client was created
    pub created_at: DateTimeUtc,
    /// Soft delete marker - set when the client is removed from active listings
    pub deleted_at: Option<DateTimeUtc>,
}

/// Defines relationships between Client and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One client has many orders
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether the client has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
