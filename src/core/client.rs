//! Client business logic - Handles creation, lookup, editing and soft deletion of clients.
//!
//! Deleted clients keep their row (orders still reference it) but disappear from
//! [`list_active_clients`] and can no longer receive new orders.

use crate::{
    entities::{Client, client},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

/// Contact details used to create or update a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientDetails {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl ClientDetails {
    /// Details with only a name set.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    fn validated_name(&self) -> Result<String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::validation("Client name cannot be empty"));
        }
        Ok(name.to_string())
    }
}

/// Blank optional fields are stored as NULL.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Creates a new client.
///
/// # Errors
/// Returns an error if the name is empty or the insert fails.
#[instrument(skip(db))]
pub async fn create_client(db: &DatabaseConnection, details: ClientDetails) -> Result<client::Model> {
    let name = details.validated_name()?;
    let client = client::ActiveModel {
        name: Set(name),
        email: Set(non_blank(details.email)),
        phone: Set(non_blank(details.phone)),
        address: Set(non_blank(details.address)),
        notes: Set(non_blank(details.notes)),
        created_at: Set(chrono::Utc::now()),
        deleted_at: Set(None),
        ..Default::default()
    };

    let created = client.insert(db).await?;
    info!("Created client {} ({})", created.id, created.name);
    Ok(created)
}

/// Finds a client by id, deleted or not.
pub async fn get_client_by_id<C>(db: &C, client_id: i64) -> Result<Option<client::Model>>
where
    C: ConnectionTrait,
{
    Client::find_by_id(client_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Loads a client that is still active.
///
/// # Errors
/// Returns `Error::NotFound` if the client does not exist or was deleted.
pub async fn require_active_client<C>(db: &C, client_id: i64) -> Result<client::Model>
where
    C: ConnectionTrait,
{
    get_client_by_id(db, client_id)
        .await?
        .filter(|c| !c.is_deleted())
        .ok_or(Error::NotFound {
            entity: "client",
            id: client_id,
        })
}

/// All clients that have not been deleted, ordered alphabetically by name.
pub async fn list_active_clients(db: &DatabaseConnection) -> Result<Vec<client::Model>> {
    Client::find()
        .filter(client::Column::DeletedAt.is_null())
        .order_by_asc(client::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Replaces the contact details of an active client.
///
/// # Errors
/// Returns `Error::NotFound` for a missing or deleted client, `Error::Validation` for an
/// empty name.
#[instrument(skip(db))]
pub async fn update_client(
    db: &DatabaseConnection,
    client_id: i64,
    details: ClientDetails,
) -> Result<client::Model> {
    let name = details.validated_name()?;
    let existing = require_active_client(db, client_id).await?;

    let mut active: client::ActiveModel = existing.into();
    active.name = Set(name);
    active.email = Set(non_blank(details.email));
    active.phone = Set(non_blank(details.phone));
    active.address = Set(non_blank(details.address));
    active.notes = Set(non_blank(details.notes));

    active.update(db).await.map_err(Into::into)
}

/// Marks a client as deleted.
///
/// # Errors
/// Returns `Error::NotFound` if the client does not exist or is already deleted.
#[instrument(skip(db))]
pub async fn soft_delete_client(db: &DatabaseConnection, client_id: i64) -> Result<client::Model> {
    let existing = require_active_client(db, client_id).await?;

    let mut active: client::ActiveModel = existing.into();
    active.deleted_at = Set(Some(chrono::Utc::now()));
    let deleted = active.update(db).await?;

    info!("Soft-deleted client {}", client_id);
    Ok(deleted)
}
