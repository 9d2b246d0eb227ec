//! Database configuration module for the apiary ledger.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs. The few constraints an entity cannot
//! express on its own (the `(product_id, year)` uniqueness of prices) are added as indexes.

use crate::entities::{
    Client, LabelHistory, LotCounter, Order, OrderLine, Price, Product, Purchase, price,
};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info, instrument};

/// Default database location, created on first run.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/apiary.sqlite?mode=rwc";

/// Resolves the database URL: `DATABASE_URL` wins, then the configured value, then the default.
#[must_use]
pub fn get_database_url(configured: Option<&str>) -> String {
    std::env::var("DATABASE_URL")
        .ok()
        .or_else(|| configured.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the `SQLite` database at `database_url`.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database");
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all tables (if missing) in foreign-key order, plus the unique index on prices.
#[instrument(skip(db))]
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    create_table(db, &schema, Client).await?;
    create_table(db, &schema, Product).await?;
    create_table(db, &schema, Price).await?;
    create_table(db, &schema, Order).await?;
    create_table(db, &schema, OrderLine).await?;
    create_table(db, &schema, Purchase).await?;
    create_table(db, &schema, LotCounter).await?;
    create_table(db, &schema, LabelHistory).await?;

    let unique_price = Index::create()
        .name("idx_prices_product_year")
        .table(Price)
        .col(price::Column::ProductId)
        .col(price::Column::Year)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&unique_price)).await?;

    info!("Database tables ensured.");
    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}
