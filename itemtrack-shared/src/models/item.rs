/// Item model and database operations
///
/// This module provides the Item model representing tracked entities with an
/// owner and a lifecycle status. Items are the core entity of the ItemTrack
/// system.
///
/// # Lifecycle
///
/// ```text
/// new ↔ approved ↔ eol
/// ```
///
/// Any status in the enum may be requested; values outside it are rejected
/// before the database is touched. Every status change and owner
/// reassignment appends one row to the item history log in the same
/// transaction as the write.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE item_status AS ENUM ('new', 'approved', 'eol');
///
/// CREATE TABLE items (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status item_status NOT NULL DEFAULT 'new',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use itemtrack_shared::models::item::{CreateItem, Item, ItemStatus};
/// use itemtrack_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example(owner_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let item = Item::create(&pool, CreateItem {
///     owner_id,
///     title: "Widget".to_string(),
///     description: None,
/// }).await?;
///
/// // Approve it; one history row is appended in the same transaction
/// Item::change_status(&pool, item.id, ItemStatus::Approved).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::item_history::{AppendHistory, ChangeKind, ItemHistory};

/// Item lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "item_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Freshly created, not yet reviewed
    New,

    /// Reviewed and approved
    Approved,

    /// End of life
    Eol,
}

/// Error returned when parsing a status value outside the enum
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid item status: {0:?} (expected one of: new, approved, eol)")]
pub struct InvalidStatus(pub String);

impl ItemStatus {
    /// Converts status to string for database storage and API responses
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::New => "new",
            ItemStatus::Approved => "approved",
            ItemStatus::Eol => "eol",
        }
    }
}

impl std::str::FromStr for ItemStatus {
    type Err = InvalidStatus;

    /// Parses a status from its wire representation (case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "new" => Ok(ItemStatus::New),
            "approved" => Ok(ItemStatus::Approved),
            "eol" => Ok(ItemStatus::Eol),
            _ => Err(InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Item model representing a tracked entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    /// Unique item ID
    pub id: Uuid,

    /// User who currently owns the item
    pub owner_id: Uuid,

    /// Human-readable title
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Current lifecycle status
    pub status: ItemStatus,

    /// When the item was created
    pub created_at: DateTime<Utc>,

    /// When the item was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new item
///
/// Status is not part of the input; new items always start as `new`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateItem {
    /// Owning user ID
    pub owner_id: Uuid,

    /// Item title
    pub title: String,

    /// Optional description
    pub description: Option<String>,
}

/// Input for updating an item's descriptive fields
///
/// Owner and status changes go through `reassign` and `change_status`
/// so that they are recorded in the history log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateItem {
    /// New title
    pub title: Option<String>,

    /// New description (use Some(None) to clear)
    pub description: Option<Option<String>>,
}

impl Item {
    /// Creates a new item with default status `new`
    ///
    /// # Errors
    ///
    /// Returns an error if the owner does not exist (foreign key violation)
    /// or the database operation fails.
    pub async fn create(pool: &PgPool, data: CreateItem) -> Result<Self, sqlx::Error> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (owner_id, title, description)
            VALUES ($1, $2, $3)
            RETURNING id, owner_id, title, description, status, created_at, updated_at
            "#,
        )
        .bind(data.owner_id)
        .bind(data.title)
        .bind(data.description)
        .fetch_one(pool)
        .await?;

        Ok(item)
    }

    /// Finds an item by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, owner_id, title, description, status, created_at, updated_at
            FROM items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(item)
    }

    /// Lists items with pagination, newest first
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, owner_id, title, description, status, created_at, updated_at
            FROM items
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(items)
    }

    /// Lists items whose current status matches, newest first
    pub async fn list_by_status(
        pool: &PgPool,
        status: ItemStatus,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, owner_id, title, description, status, created_at, updated_at
            FROM items
            WHERE status = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(items)
    }

    /// Lists items owned by a user, newest first
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, owner_id, title, description, status, created_at, updated_at
            FROM items
            WHERE owner_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(items)
    }

    /// Updates an item's descriptive fields
    ///
    /// Returns the updated item, or None if the item does not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateItem,
    ) -> Result<Option<Self>, sqlx::Error> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            UPDATE items
            SET title = COALESCE($2, title),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, owner_id, title, description, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.description.is_some())
        .bind(data.description.flatten())
        .fetch_optional(pool)
        .await?;

        Ok(item)
    }

    /// Changes an item's status and records the transition
    ///
    /// The status update and the history append happen in one transaction;
    /// either both are persisted or neither is.
    ///
    /// Returns the updated item, or None if the item does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub async fn change_status(
        pool: &PgPool,
        id: Uuid,
        new_status: ItemStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let old_status: Option<ItemStatus> =
            sqlx::query_scalar("SELECT status FROM items WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(old_status) = old_status else {
            return Ok(None);
        };

        let item = sqlx::query_as::<_, Item>(
            r#"
            UPDATE items
            SET status = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, owner_id, title, description, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(new_status)
        .fetch_one(&mut *tx)
        .await?;

        ItemHistory::append(
            &mut *tx,
            AppendHistory {
                item_id: id,
                change_kind: ChangeKind::Status,
                old_value: Some(old_status.as_str().to_string()),
                new_value: Some(new_status.as_str().to_string()),
            },
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            item_id = %id,
            old_status = %old_status,
            new_status = %new_status,
            "Item status changed"
        );

        Ok(Some(item))
    }

    /// Reassigns an item to a new owner and records the change
    ///
    /// Like `change_status`, the owner update and the history append are
    /// committed atomically.
    ///
    /// Returns the updated item, or None if the item does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the new owner does not exist (foreign key
    /// violation) or the transaction fails.
    pub async fn reassign(
        pool: &PgPool,
        id: Uuid,
        new_owner_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let old_owner_id: Option<Uuid> =
            sqlx::query_scalar("SELECT owner_id FROM items WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(old_owner_id) = old_owner_id else {
            return Ok(None);
        };

        let item = sqlx::query_as::<_, Item>(
            r#"
            UPDATE items
            SET owner_id = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, owner_id, title, description, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(new_owner_id)
        .fetch_one(&mut *tx)
        .await?;

        ItemHistory::append(
            &mut *tx,
            AppendHistory {
                item_id: id,
                change_kind: ChangeKind::Owner,
                old_value: Some(old_owner_id.to_string()),
                new_value: Some(new_owner_id.to_string()),
            },
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            item_id = %id,
            old_owner = %old_owner_id,
            new_owner = %new_owner_id,
            "Item reassigned"
        );

        Ok(Some(item))
    }

    /// Deletes an item
    ///
    /// History rows are removed via CASCADE.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_item_status_as_str() {
        assert_eq!(ItemStatus::New.as_str(), "new");
        assert_eq!(ItemStatus::Approved.as_str(), "approved");
        assert_eq!(ItemStatus::Eol.as_str(), "eol");
    }

    #[test]
    fn test_item_status_parse() {
        assert_eq!(ItemStatus::from_str("new").unwrap(), ItemStatus::New);
        assert_eq!(ItemStatus::from_str("approved").unwrap(), ItemStatus::Approved);
        assert_eq!(ItemStatus::from_str("eol").unwrap(), ItemStatus::Eol);

        // Case-insensitive
        assert_eq!(ItemStatus::from_str("APPROVED").unwrap(), ItemStatus::Approved);
    }

    #[test]
    fn test_item_status_parse_rejects_unknown() {
        let err = ItemStatus::from_str("ARCHIVED").unwrap_err();
        assert!(err.to_string().contains("ARCHIVED"));
        assert!(ItemStatus::from_str("").is_err());
        assert!(ItemStatus::from_str("pending").is_err());
    }

    #[test]
    fn test_item_status_serde_wire_format() {
        assert_eq!(serde_json::to_string(&ItemStatus::New).unwrap(), "\"new\"");
        assert_eq!(
            serde_json::from_str::<ItemStatus>("\"eol\"").unwrap(),
            ItemStatus::Eol
        );
        assert!(serde_json::from_str::<ItemStatus>("\"archived\"").is_err());
    }

    #[test]
    fn test_update_item_default_is_empty() {
        let update = UpdateItem::default();
        assert!(update.title.is_none());
        assert!(update.description.is_none());
    }
}
