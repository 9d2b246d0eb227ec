use apiary_ledger::{
    config::{
        self,
        database::{create_connection, create_tables, get_database_url},
    },
    core::{
        dashboard::{dashboard_summary, year_bounds},
        money::format_euros,
    },
    errors::Result,
};
use chrono::{Datelike, Utc};
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Number of best sellers shown in the startup summary.
const TOP_PRODUCTS: usize = 5;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the main application configuration
    let app_config = config::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 4. Connect and make sure every table exists
    let database_url = get_database_url(app_config.database_url.as_deref());
    if let Some(dir) = sqlite_parent_dir(&database_url) {
        std::fs::create_dir_all(dir)?;
    }
    let db = create_connection(&database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Summarise the current year
    let year = Utc::now().year();
    let (start, end) = year_bounds(year)?;
    let summary = dashboard_summary(&db, start, end, TOP_PRODUCTS).await?;
    info!(
        "{}: revenue {}, expenses {}, profit {}, {} open orders",
        year,
        format_euros(summary.revenue),
        format_euros(summary.expenses),
        format_euros(summary.profit),
        summary.open_orders
    );
    for (rank, sales) in summary.top_products.iter().enumerate() {
        info!(
            "#{} {} - {} sold, {}",
            rank + 1,
            sales.product_name,
            sales.quantity,
            format_euros(sales.revenue)
        );
    }

    Ok(())
}

/// Directory holding a file-backed `SQLite` database, if the URL points at one.
fn sqlite_parent_dir(database_url: &str) -> Option<&std::path::Path> {
    let path = database_url.strip_prefix("sqlite://")?;
    let path = path.split('?').next()?;
    std::path::Path::new(path)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
}
