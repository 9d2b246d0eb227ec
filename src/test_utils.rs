//! Shared test utilities for the apiary ledger.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        client::{self, ClientDetails},
        order::{self, NewOrder, NewOrderLine, OrderWithLines},
        pricing,
        product::{self, ProductDetails},
        purchase::{self, NewPurchase, PurchaseCategory},
    },
    entities,
    errors::Result,
};
use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use tempfile::TempDir;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a file-backed `SQLite` database in a fresh temporary directory.
///
/// Unlike `sqlite::memory:`, the pool holds several connections, so concurrent callers
/// really contend at the store. Keep the returned `TempDir` alive for the whole test.
pub async fn setup_file_test_db() -> Result<(TempDir, DatabaseConnection)> {
    let dir = tempfile::tempdir()?;
    let url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("apiary.sqlite").display()
    );
    let db = sea_orm::Database::connect(url).await?;
    crate::config::database::create_tables(&db).await?;
    Ok((dir, db))
}

/// Routes `tracing` output to the test harness. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

/// Shorthand for a calendar date. Panics on an invalid date, which is a bug in the test.
#[allow(clippy::unwrap_used)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Creates a test client with only a name.
pub async fn create_test_client(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::client::Model> {
    client::create_client(db, ClientDetails::named(name)).await
}

/// Creates a test product with sensible defaults.
///
/// # Defaults
/// * `honey_type`: None
/// * `unit`: `"pot 500g"`
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::product::Model> {
    product::create_product(
        db,
        ProductDetails {
            name: name.to_string(),
            honey_type: None,
            unit: "pot 500g".to_string(),
        },
    )
    .await
}

/// Registers a price for `product_id` in `year`.
pub async fn create_test_price(
    db: &DatabaseConnection,
    product_id: i64,
    year: i32,
    amount: Decimal,
) -> Result<entities::price::Model> {
    pricing::set_price(db, product_id, year, amount).await
}

/// Records a test purchase.
///
/// # Defaults
/// * `designation`: `"Test purchase"`
/// * `category`: other
pub async fn create_test_purchase(
    db: &DatabaseConnection,
    purchase_date: NaiveDate,
    amount: Decimal,
) -> Result<entities::purchase::Model> {
    purchase::create_purchase(
        db,
        NewPurchase {
            purchase_date,
            designation: "Test purchase".to_string(),
            amount,
            category: PurchaseCategory::Other,
            notes: None,
        },
    )
    .await
}

/// Creates an order on `order_date` with a single explicitly priced line (10.00 per unit).
pub async fn create_dated_order(
    db: &DatabaseConnection,
    client_id: i64,
    product_id: i64,
    order_date: NaiveDate,
    quantity: i32,
) -> Result<OrderWithLines> {
    order::create_order(
        db,
        NewOrder {
            client_id,
            order_date: Some(order_date),
            status: None,
            notes: None,
            lines: vec![NewOrderLine::priced(product_id, quantity, Decimal::new(1000, 2))],
        },
    )
    .await
}

/// Sets up a client, a product priced at 12.00 for the current year, and a PLACED order
/// for two units whose price comes from the price table.
pub async fn create_test_order(db: &DatabaseConnection) -> Result<OrderWithLines> {
    let client = create_test_client(db, "Test Client").await?;
    let product = create_test_product(db, "Test Product").await?;
    create_test_price(db, product.id, Utc::now().year(), Decimal::new(1200, 2)).await?;

    order::create_order(
        db,
        NewOrder {
            client_id: client.id,
            order_date: None,
            status: None,
            notes: None,
            lines: vec![NewOrderLine::auto_priced(product.id, 2)],
        },
    )
    .await
}
