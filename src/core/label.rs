//! Label data builder - Everything printed on a jar label, fully resolved.
//!
//! Building a label issues a lot number, computes the DLUO (best-before date) from the
//! harvest date and the configured shelf life, and looks up a price when one is available.
//! [`generate_labels`] wraps build, render and history recording in one transaction so a
//! failed print never consumes a lot number.

use crate::{
    config::{LabelLayout, LabelSettings},
    core::{
        honey::{HoneyType, JarFormat},
        lot::next_lot_number,
        money::format_euros,
        pricing::find_price,
    },
    entities::{Amount, LabelHistory, label_history},
    errors::{Error, Result},
};
use chrono::{Datelike, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use tracing::{debug, info, instrument};

/// Number of records returned by [`recent_history`].
pub const HISTORY_LIMIT: u64 = 20;

/// Best-before date: `harvest_date` plus `shelf_life_days` calendar days.
///
/// # Errors
/// Returns `Error::InvalidArgument` if the result falls outside the supported date range.
pub fn calculate_dluo(harvest_date: NaiveDate, shelf_life_days: u64) -> Result<NaiveDate> {
    harvest_date
        .checked_add_days(Days::new(shelf_life_days))
        .ok_or_else(|| {
            Error::invalid_argument(format!(
                "DLUO out of range: {harvest_date} + {shelf_life_days} days"
            ))
        })
}

/// `MM/YYYY`, as printed on labels.
#[must_use]
pub fn format_month_year(date: NaiveDate) -> String {
    date.format("%m/%Y").to_string()
}

/// A label print request. Required fields are optional here so incomplete requests can be
/// reported as errors instead of failing to construct.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelRequest {
    pub honey_type: Option<HoneyType>,
    pub jar_format: Option<JarFormat>,
    pub harvest_date: Option<NaiveDate>,
    /// Product whose current-year price should be printed
    pub product_id: Option<i64>,
    /// Explicit price, takes precedence over `product_id`
    pub price: Option<Decimal>,
    /// Number of labels to print
    pub quantity: i32,
}

struct ValidatedRequest {
    honey_type: HoneyType,
    jar_format: JarFormat,
    harvest_date: NaiveDate,
    quantity: i32,
}

impl LabelRequest {
    fn validated(&self) -> Result<ValidatedRequest> {
        let honey_type = self
            .honey_type
            .ok_or_else(|| Error::invalid_argument("A honey type is required"))?;
        let jar_format = self
            .jar_format
            .ok_or_else(|| Error::invalid_argument("A jar format is required"))?;
        let harvest_date = self
            .harvest_date
            .ok_or_else(|| Error::invalid_argument("A harvest date is required"))?;
        if self.quantity <= 0 {
            return Err(Error::validation(format!(
                "Label quantity must be positive, got {}",
                self.quantity
            )));
        }
        if matches!(self.price, Some(price) if price <= Decimal::ZERO) {
            return Err(Error::validation("Label price must be positive"));
        }
        Ok(ValidatedRequest {
            honey_type,
            jar_format,
            harvest_date,
            quantity: self.quantity,
        })
    }
}

/// A fully resolved label, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelData {
    pub honey_type: HoneyType,
    pub honey_name: String,
    pub jar_format: JarFormat,
    pub net_weight: String,
    pub harvest_date: NaiveDate,
    pub harvest_label: String,
    pub dluo: NaiveDate,
    pub dluo_label: String,
    pub lot_number: String,
    pub price: Option<Decimal>,
    pub price_label: Option<String>,
    pub producer_name: String,
    pub producer_address: String,
    pub quantity: i32,
}

/// Output of [`generate_labels`].
#[derive(Debug)]
pub struct GeneratedLabels<T> {
    pub data: LabelData,
    pub history: label_history::Model,
    pub rendered: T,
}

async fn label_price<C>(db: &C, request: &LabelRequest) -> Result<Option<Decimal>>
where
    C: ConnectionTrait,
{
    if request.price.is_some() {
        return Ok(request.price);
    }
    let Some(product_id) = request.product_id else {
        return Ok(None);
    };
    let year = Utc::now().year();
    let price = find_price(db, product_id, year).await?;
    if price.is_none() {
        debug!("No {} price for product {}, label printed without price", year, product_id);
    }
    Ok(price)
}

/// Resolves everything printed on a label and issues its lot number.
///
/// A missing price is not an error: the label simply carries no price.
///
/// # Errors
/// Returns `Error::InvalidArgument` when the honey type, jar format or harvest date is
/// missing, `Error::Validation` for a non-positive quantity or price, and `Error::Database`
/// if the lot counter cannot be updated.
#[instrument(skip(db, settings))]
pub async fn build_label_data<C>(
    db: &C,
    settings: &LabelSettings,
    request: &LabelRequest,
) -> Result<LabelData>
where
    C: ConnectionTrait + TransactionTrait,
{
    let valid = request.validated()?;
    let dluo = calculate_dluo(valid.harvest_date, settings.shelf_life_days)?;
    let lot_number = next_lot_number(db, settings, valid.honey_type, valid.harvest_date).await?;
    let price = label_price(db, request).await?;

    Ok(LabelData {
        honey_type: valid.honey_type,
        honey_name: valid.honey_type.display_name().to_string(),
        jar_format: valid.jar_format,
        net_weight: valid.jar_format.net_weight_label(),
        harvest_date: valid.harvest_date,
        harvest_label: format_month_year(valid.harvest_date),
        dluo,
        dluo_label: format_month_year(dluo),
        lot_number,
        price,
        price_label: price.map(format_euros),
        producer_name: settings.producer_name.clone(),
        producer_address: settings.producer_address.clone(),
        quantity: valid.quantity,
    })
}

/// Persists one history row for a generated label batch.
#[instrument(skip(db, data), fields(lot_number = %data.lot_number))]
pub async fn record_history<C>(db: &C, data: &LabelData) -> Result<label_history::Model>
where
    C: ConnectionTrait,
{
    let record = label_history::ActiveModel {
        honey_type: Set(data.honey_type.key().to_string()),
        jar_format: Set(data.jar_format.key().to_string()),
        harvest_date: Set(data.harvest_date),
        dluo: Set(data.dluo),
        lot_number: Set(data.lot_number.clone()),
        quantity: Set(data.quantity),
        price: Set(data.price.map(Amount::from)),
        generated_at: Set(Utc::now()),
        ..Default::default()
    };
    record.insert(db).await.map_err(Into::into)
}

/// The most recent label batches, newest first.
pub async fn recent_history<C>(db: &C) -> Result<Vec<label_history::Model>>
where
    C: ConnectionTrait,
{
    LabelHistory::find()
        .order_by_desc(label_history::Column::GeneratedAt)
        .order_by_desc(label_history::Column::Id)
        .limit(HISTORY_LIMIT)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Builds a label, hands it to `render`, then records it in the history.
///
/// All three steps share one transaction: if `render` fails, the lot number is released and
/// no history row is written.
///
/// # Errors
/// Propagates errors from [`build_label_data`], from `render`, and from storage.
#[instrument(skip(db, settings, render))]
pub async fn generate_labels<T, F>(
    db: &DatabaseConnection,
    settings: &LabelSettings,
    request: &LabelRequest,
    render: F,
) -> Result<GeneratedLabels<T>>
where
    F: FnOnce(&LabelData, &LabelLayout) -> Result<T>,
{
    let txn = db.begin().await?;

    let data = build_label_data(&txn, settings, request).await?;
    let rendered = match render(&data, &settings.layout) {
        Ok(rendered) => rendered,
        Err(e) => {
            txn.rollback().await?;
            return Err(e);
        }
    };
    let history = record_history(&txn, &data).await?;

    txn.commit().await?;
    info!(
        "Generated {} labels for lot {} ({})",
        data.quantity, data.lot_number, data.honey_name
    );
    Ok(GeneratedLabels {
        data,
        history,
        rendered,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::LotCounter;
    use crate::test_utils::*;
    use sea_orm::PaginatorTrait;

    fn request() -> LabelRequest {
        LabelRequest {
            honey_type: Some(HoneyType::AllFlower),
            jar_format: Some(JarFormat::Grams500),
            harvest_date: Some(date(2024, 6, 15)),
            product_id: None,
            price: None,
            quantity: 24,
        }
    }

    #[test]
    fn test_dluo_adds_shelf_life() {
        assert_eq!(calculate_dluo(date(2024, 6, 15), 730).unwrap(), date(2026, 6, 15));
        assert_eq!(calculate_dluo(date(2024, 2, 29), 730).unwrap(), date(2026, 2, 28));
        assert_eq!(calculate_dluo(date(2024, 6, 15), 0).unwrap(), date(2024, 6, 15));
    }

    #[test]
    fn test_dluo_overflow_is_invalid_argument() {
        assert!(matches!(
            calculate_dluo(NaiveDate::MAX, 1),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_month_year_format() {
        assert_eq!(format_month_year(date(2026, 1, 15)), "01/2026");
        assert_eq!(format_month_year(date(2024, 11, 3)), "11/2024");
    }

    #[tokio::test]
    async fn test_build_label_data() -> Result<()> {
        let db = setup_test_db().await?;
        let settings = LabelSettings {
            producer_name: "Rucher des Tilleuls".to_string(),
            ..LabelSettings::default()
        };

        let data = build_label_data(&db, &settings, &request()).await?;

        assert_eq!(data.honey_name, "Miel toutes fleurs");
        assert_eq!(data.net_weight, "500 g");
        assert_eq!(data.harvest_label, "06/2024");
        assert_eq!(data.dluo, date(2026, 6, 15));
        assert_eq!(data.dluo_label, "06/2026");
        assert_eq!(data.lot_number, "2024-TF-001");
        assert_eq!(data.price, None);
        assert_eq!(data.producer_name, "Rucher des Tilleuls");

        let again = build_label_data(&db, &settings, &request()).await?;
        assert_eq!(again.lot_number, "2024-TF-002");
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_fields_are_invalid_arguments() -> Result<()> {
        let db = setup_test_db().await?;
        let settings = LabelSettings::default();

        let no_type = LabelRequest {
            honey_type: None,
            ..request()
        };
        let no_format = LabelRequest {
            jar_format: None,
            ..request()
        };
        let no_date = LabelRequest {
            harvest_date: None,
            ..request()
        };
        for bad in [no_type, no_format, no_date] {
            assert!(matches!(
                build_label_data(&db, &settings, &bad).await,
                Err(Error::InvalidArgument { .. })
            ));
        }

        let no_labels = LabelRequest {
            quantity: 0,
            ..request()
        };
        assert!(matches!(
            build_label_data(&db, &settings, &no_labels).await,
            Err(Error::Validation { .. })
        ));

        // Nothing was issued for rejected requests
        assert_eq!(LotCounter::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_price_resolution() -> Result<()> {
        let db = setup_test_db().await?;
        let settings = LabelSettings::default();
        let priced = create_test_product(&db, "Miel toutes fleurs 500g").await?;
        let unpriced = create_test_product(&db, "Miel toutes fleurs 250g").await?;
        create_test_price(&db, priced.id, Utc::now().year(), Decimal::new(950, 2)).await?;

        let from_product = build_label_data(
            &db,
            &settings,
            &LabelRequest {
                product_id: Some(priced.id),
                ..request()
            },
        )
        .await?;
        assert_eq!(from_product.price, Some(Decimal::new(950, 2)));
        assert_eq!(from_product.price_label.as_deref(), Some("9.50 €"));

        let explicit = build_label_data(
            &db,
            &settings,
            &LabelRequest {
                product_id: Some(priced.id),
                price: Some(Decimal::new(1100, 2)),
                ..request()
            },
        )
        .await?;
        assert_eq!(explicit.price, Some(Decimal::new(1100, 2)));

        // Missing price is tolerated
        let tolerated = build_label_data(
            &db,
            &settings,
            &LabelRequest {
                product_id: Some(unpriced.id),
                ..request()
            },
        )
        .await?;
        assert_eq!(tolerated.price, None);
        assert_eq!(tolerated.price_label, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_labels_records_history() -> Result<()> {
        let db = setup_test_db().await?;
        let settings = LabelSettings::default();

        let generated = generate_labels(&db, &settings, &request(), |data, layout| {
            Ok(format!("{} x{} on {} per sheet", data.lot_number, data.quantity, layout.labels_per_sheet()))
        })
        .await?;

        assert_eq!(generated.rendered, "2024-TF-001 x24 on 24 per sheet");
        assert_eq!(generated.history.lot_number, "2024-TF-001");
        assert_eq!(generated.history.honey_type, "all_flower");
        assert_eq!(generated.history.jar_format, "500g");
        assert_eq!(generated.history.dluo, date(2026, 6, 15));
        assert_eq!(generated.history.quantity, 24);
        assert_eq!(recent_history(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_render_consumes_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let settings = LabelSettings::default();

        let result: Result<GeneratedLabels<()>> =
            generate_labels(&db, &settings, &request(), |_, _| {
                Err(Error::validation("printer out of labels"))
            })
            .await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        assert_eq!(LabelHistory::find().count(&db).await?, 0);

        let retry = generate_labels(&db, &settings, &request(), |_, _| Ok(())).await?;
        assert_eq!(retry.data.lot_number, "2024-TF-001");
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_generation_issues_unique_lots() -> Result<()> {
        let (_dir, db) = setup_file_test_db().await?;
        let settings = LabelSettings::default();

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..10 {
            let db = db.clone();
            let settings = settings.clone();
            tasks.spawn(async move {
                generate_labels(&db, &settings, &request(), |data, _| Ok(data.lot_number.clone()))
                    .await
            });
        }

        let mut lots = std::collections::BTreeSet::new();
        while let Some(joined) = tasks.join_next().await {
            let generated = joined.unwrap()?;
            assert_eq!(generated.rendered, generated.history.lot_number);
            assert!(lots.insert(generated.rendered));
        }
        assert_eq!(lots.len(), 10);
        assert_eq!(LabelHistory::find().count(&db).await?, 10);
        Ok(())
    }

    #[tokio::test]
    async fn test_recent_history_is_capped_and_newest_first() -> Result<()> {
        let db = setup_test_db().await?;
        let settings = LabelSettings::default();

        for _ in 0..22 {
            let data = build_label_data(&db, &settings, &request()).await?;
            record_history(&db, &data).await?;
        }

        let history = recent_history(&db).await?;
        assert_eq!(history.len(), 20);
        assert_eq!(history[0].lot_number, "2024-TF-022");
        assert_eq!(history[19].lot_number, "2024-TF-003");
        Ok(())
    }
}
