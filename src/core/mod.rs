/// Client records and soft deletion
pub mod client;
/// Revenue, expenses, profit and best sellers
pub mod dashboard;
/// Honey types and jar formats
pub mod honey;
/// Label data, DLUO and label history
pub mod label;
/// Lot number sequencing
pub mod lot;
/// Decimal money helpers
pub mod money;
/// Order creation, editing and lifecycle
pub mod order;
/// Order status state machine
pub mod order_status;
/// Year-scoped product prices
pub mod pricing;
/// Product catalogue
pub mod product;
/// Expense tracking
pub mod purchase;
