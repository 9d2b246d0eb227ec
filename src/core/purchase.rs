//! Purchase (expense) business logic.
//!
//! Purchases are independent of orders. They are only summed by the dashboard.

use crate::{
    entities::{Purchase, purchase},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{info, instrument};

/// Expense categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseCategory {
    Equipment,
    Jars,
    Feeding,
    Treatments,
    Queens,
    Packaging,
    Other,
}

impl PurchaseCategory {
    pub const ALL: [Self; 7] = [
        Self::Equipment,
        Self::Jars,
        Self::Feeding,
        Self::Treatments,
        Self::Queens,
        Self::Packaging,
        Self::Other,
    ];

    /// Value stored in the `purchases.category` column.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Equipment => "equipment",
            Self::Jars => "jars",
            Self::Feeding => "feeding",
            Self::Treatments => "treatments",
            Self::Queens => "queens",
            Self::Packaging => "packaging",
            Self::Other => "other",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Equipment => "Matériel",
            Self::Jars => "Pots",
            Self::Feeding => "Nourrissement",
            Self::Treatments => "Traitements",
            Self::Queens => "Reines",
            Self::Packaging => "Emballage",
            Self::Other => "Autre",
        }
    }
}

impl fmt::Display for PurchaseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PurchaseCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.key() == s.trim())
            .ok_or_else(|| Error::invalid_argument(format!("Unknown purchase category '{s}'")))
    }
}

/// A purchase to record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPurchase {
    pub purchase_date: NaiveDate,
    pub designation: String,
    pub amount: Decimal,
    pub category: PurchaseCategory,
    pub notes: Option<String>,
}

/// Records a purchase.
///
/// # Errors
/// Returns `Error::Validation` if the designation is empty or the amount is not positive.
#[instrument(skip(db))]
pub async fn create_purchase(
    db: &DatabaseConnection,
    new_purchase: NewPurchase,
) -> Result<purchase::Model> {
    let designation = new_purchase.designation.trim();
    if designation.is_empty() {
        return Err(Error::validation("Purchase designation cannot be empty"));
    }
    if new_purchase.amount <= Decimal::ZERO {
        return Err(Error::validation(format!(
            "Purchase amount must be positive, got {}",
            new_purchase.amount
        )));
    }

    let purchase = purchase::ActiveModel {
        purchase_date: Set(new_purchase.purchase_date),
        designation: Set(designation.to_string()),
        amount: Set(new_purchase.amount.into()),
        category: Set(new_purchase.category.key().to_string()),
        notes: Set(new_purchase.notes),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let created = purchase.insert(db).await?;
    info!(
        "Recorded purchase {} ({}) of {}",
        created.id, created.designation, created.amount
    );
    Ok(created)
}

/// Purchases dated within `[start, end]`, newest first.
pub async fn list_purchases<C>(
    db: &C,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<purchase::Model>>
where
    C: ConnectionTrait,
{
    Purchase::find()
        .filter(purchase::Column::PurchaseDate.between(start, end))
        .order_by_desc(purchase::Column::PurchaseDate)
        .order_by_desc(purchase::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes a purchase.
///
/// # Errors
/// Returns `Error::NotFound` if no purchase has this id.
#[instrument(skip(db))]
pub async fn delete_purchase(db: &DatabaseConnection, purchase_id: i64) -> Result<()> {
    let result = Purchase::delete_by_id(purchase_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "purchase",
            id: purchase_id,
        });
    }
    info!("Deleted purchase {}", purchase_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_purchase_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let base = NewPurchase {
            purchase_date: date(2024, 3, 1),
            designation: "Sirop de nourrissement".to_string(),
            amount: Decimal::new(4500, 2),
            category: PurchaseCategory::Feeding,
            notes: None,
        };

        let zero = NewPurchase {
            amount: Decimal::ZERO,
            ..base.clone()
        };
        assert!(matches!(
            create_purchase(&db, zero).await,
            Err(Error::Validation { .. })
        ));

        let blank = NewPurchase {
            designation: "  ".to_string(),
            ..base.clone()
        };
        assert!(matches!(
            create_purchase(&db, blank).await,
            Err(Error::Validation { .. })
        ));

        let created = create_purchase(&db, base).await?;
        assert_eq!(created.category, "feeding");
        assert_eq!(created.category.parse::<PurchaseCategory>()?, PurchaseCategory::Feeding);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_purchases_filters_by_date() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_purchase(&db, date(2023, 12, 31), Decimal::new(1000, 2)).await?;
        let inside = create_test_purchase(&db, date(2024, 1, 1), Decimal::new(2000, 2)).await?;
        let later = create_test_purchase(&db, date(2024, 12, 31), Decimal::new(3000, 2)).await?;
        create_test_purchase(&db, date(2025, 1, 1), Decimal::new(4000, 2)).await?;

        let listed = list_purchases(&db, date(2024, 1, 1), date(2024, 12, 31)).await?;
        let ids: Vec<i64> = listed.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![later.id, inside.id]);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_purchase() -> Result<()> {
        let db = setup_test_db().await?;
        let purchase = create_test_purchase(&db, date(2024, 5, 1), Decimal::ONE).await?;

        delete_purchase(&db, purchase.id).await?;
        assert!(matches!(
            delete_purchase(&db, purchase.id).await,
            Err(Error::NotFound { entity: "purchase", .. })
        ));
        Ok(())
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("jars".parse::<PurchaseCategory>().unwrap(), PurchaseCategory::Jars);
        assert_eq!(PurchaseCategory::Queens.display_name(), "Reines");
        assert!("honey".parse::<PurchaseCategory>().is_err());
    }
}
