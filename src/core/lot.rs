//! Lot number sequencer.
//!
//! Lot numbers look like `2024-TF-001`: harvest year, honey-type abbreviation, and a
//! counter that is independent per `(year, abbreviation)` pair. The counter lives in the
//! `lot_counters` table and is bumped with a single `INSERT .. ON CONFLICT DO UPDATE`, so two
//! requests for the same key can never be handed the same number.

use crate::{
    config::LabelSettings,
    core::honey::HoneyType,
    entities::{LotCounter, lot_counter},
    errors::Result,
};
use chrono::{Datelike, NaiveDate};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Renders a lot number. The counter is padded to three digits and grows past that as needed.
#[must_use]
pub fn format_lot_number(year: i32, abbreviation: &str, value: i32) -> String {
    format!("{year:04}-{abbreviation}-{value:03}")
}

/// Issues the next lot number for `honey_type` harvested on `harvest_date`.
///
/// The first call for a `(year, abbreviation)` key returns `..-001`; every later call
/// returns the previous value plus one. When `db` is already a transaction, the increment
/// joins it (as a savepoint) and is rolled back with it.
///
/// # Errors
/// Returns `Error::Database` if the upsert or the read-back fails.
#[instrument(skip(db, settings))]
pub async fn next_lot_number<C>(
    db: &C,
    settings: &LabelSettings,
    honey_type: HoneyType,
    harvest_date: NaiveDate,
) -> Result<String>
where
    C: ConnectionTrait + TransactionTrait,
{
    let year = harvest_date.year();
    let abbreviation = settings.abbreviation_for(honey_type).to_string();

    let txn = db.begin().await?;

    let seed = lot_counter::ActiveModel {
        year: Set(year),
        abbreviation: Set(abbreviation.clone()),
        last_value: Set(1),
    };
    LotCounter::insert(seed)
        .on_conflict(
            OnConflict::columns([lot_counter::Column::Year, lot_counter::Column::Abbreviation])
                .value(
                    lot_counter::Column::LastValue,
                    Expr::col((LotCounter, lot_counter::Column::LastValue)).add(1),
                )
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;

    let counter = LotCounter::find_by_id((year, abbreviation.clone()))
        .one(&txn)
        .await?
        .ok_or_else(|| {
            DbErr::RecordNotFound(format!("lot counter {year}-{abbreviation} after upsert"))
        })?;

    txn.commit().await?;

    let lot_number = format_lot_number(year, &abbreviation, counter.last_value);
    info!("Issued lot number {}", lot_number);
    Ok(lot_number)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use std::collections::{BTreeMap, BTreeSet};
    use tokio::task::JoinSet;

    #[test]
    fn test_format_pads_to_three_digits() {
        assert_eq!(format_lot_number(2024, "TF", 1), "2024-TF-001");
        assert_eq!(format_lot_number(2024, "TF", 42), "2024-TF-042");
        assert_eq!(format_lot_number(2024, "TF", 1000), "2024-TF-1000");
    }

    #[tokio::test]
    async fn test_sequence_starts_at_one_and_increments() -> Result<()> {
        let db = setup_test_db().await?;
        let settings = LabelSettings::default();
        let harvest = date(2024, 7, 10);

        assert_eq!(
            next_lot_number(&db, &settings, HoneyType::AllFlower, harvest).await?,
            "2024-TF-001"
        );
        assert_eq!(
            next_lot_number(&db, &settings, HoneyType::AllFlower, harvest).await?,
            "2024-TF-002"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_keys_are_independent() -> Result<()> {
        let db = setup_test_db().await?;
        let settings = LabelSettings::default();

        next_lot_number(&db, &settings, HoneyType::AllFlower, date(2024, 5, 1)).await?;
        next_lot_number(&db, &settings, HoneyType::AllFlower, date(2024, 6, 1)).await?;

        assert_eq!(
            next_lot_number(&db, &settings, HoneyType::Acacia, date(2024, 5, 1)).await?,
            "2024-ACA-001"
        );
        // Same type, other harvest year
        assert_eq!(
            next_lot_number(&db, &settings, HoneyType::AllFlower, date(2025, 5, 1)).await?,
            "2025-TF-001"
        );
        assert_eq!(LotCounter::find().all(&db).await?.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_counter_grows_past_three_digits() -> Result<()> {
        let db = setup_test_db().await?;
        let settings = LabelSettings::default();
        let harvest = date(2024, 8, 20);

        for _ in 0..999 {
            next_lot_number(&db, &settings, HoneyType::Chestnut, harvest).await?;
        }
        assert_eq!(
            next_lot_number(&db, &settings, HoneyType::Chestnut, harvest).await?,
            "2024-CHA-1000"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_configured_abbreviation_is_used() -> Result<()> {
        let db = setup_test_db().await?;
        let settings = LabelSettings {
            abbreviations: BTreeMap::from([("forest".to_string(), "FO".to_string())]),
            ..LabelSettings::default()
        };

        assert_eq!(
            next_lot_number(&db, &settings, HoneyType::Forest, date(2023, 9, 1)).await?,
            "2023-FO-001"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_requests_get_distinct_numbers() -> Result<()> {
        init_test_tracing();
        let (_dir, db) = setup_file_test_db().await?;
        let settings = LabelSettings::default();
        let harvest = date(2024, 4, 2);

        let mut tasks = JoinSet::new();
        for _ in 0..20 {
            let db = db.clone();
            let settings = settings.clone();
            tasks.spawn(async move {
                next_lot_number(&db, &settings, HoneyType::Lavender, harvest).await
            });
        }

        let mut issued = BTreeSet::new();
        while let Some(joined) = tasks.join_next().await {
            assert!(issued.insert(joined.unwrap()?));
        }
        let expected: BTreeSet<String> = (1..=20)
            .map(|n| format_lot_number(2024, "LAV", n))
            .collect();
        assert_eq!(issued, expected);
        Ok(())
    }

    #[tokio::test]
    async fn test_rolled_back_transaction_releases_number() -> Result<()> {
        let db = setup_test_db().await?;
        let settings = LabelSettings::default();
        let harvest = date(2024, 4, 2);

        {
            let txn = db.begin().await?;
            next_lot_number(&txn, &settings, HoneyType::Linden, harvest).await?;
            txn.rollback().await?;
        }

        assert_eq!(
            next_lot_number(&db, &settings, HoneyType::Linden, harvest).await?,
            "2024-TIL-001"
        );
        Ok(())
    }
}
