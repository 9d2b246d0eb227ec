//! Order entity - A client's order header.
//!
//! `status` holds one of `PLACED`, `COLLECTED`, `PAID` (see `core::order_status`).
//! The lines live in `order_lines` and are owned by the order.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Client who placed the order
    pub client_id: i64,
    /// Date the order was placed
    pub order_date: Date,
    /// Fulfillment status: `"PLACED"`, `"COLLECTED"` or `"PAID"`
    pub status: String,
    /// Free-text notes
    pub notes: Option<String>,
    /// When the order row was created
    pub created_at: DateTimeUtc,
    /// When the order row was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each order belongs to one client
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
    /// One order owns many lines
    #[sea_orm(has_many = "super::order_line::Entity")]
    OrderLines,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::order_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
