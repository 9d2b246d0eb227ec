//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod amount;
pub mod client;
pub mod label_history;
pub mod lot_counter;
pub mod order;
pub mod order_line;
pub mod price;
pub mod product;
pub mod purchase;

// Re-export specific types to avoid conflicts
pub use amount::Amount;
pub use client::{Column as ClientColumn, Entity as Client, Model as ClientModel};
pub use label_history::{
    Column as LabelHistoryColumn, Entity as LabelHistory, Model as LabelHistoryModel,
};
pub use lot_counter::{Column as LotCounterColumn, Entity as LotCounter, Model as LotCounterModel};
pub use order::{Column as OrderColumn, Entity as Order, Model as OrderModel};
pub use order_line::{Column as OrderLineColumn, Entity as OrderLine, Model as OrderLineModel};
pub use price::{Column as PriceColumn, Entity as Price, Model as PriceModel};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use purchase::{Column as PurchaseColumn, Entity as Purchase, Model as PurchaseModel};
