/// Item history model and database operations
///
/// This module provides the ItemHistory model, an append-only audit log of
/// item changes. Every status change and owner reassignment appends exactly
/// one row; rows are never updated or deleted (the only delete path is the
/// CASCADE when the item itself is removed).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE item_history (
///     id BIGSERIAL PRIMARY KEY,
///     item_id UUID NOT NULL REFERENCES items(id) ON DELETE CASCADE,
///     change_kind VARCHAR(20) NOT NULL,
///     old_value TEXT,
///     new_value TEXT,
///     changed_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use itemtrack_shared::models::item_history::ItemHistory;
/// use itemtrack_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example(item_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let trail = ItemHistory::list_by_item(&pool, item_id).await?;
/// for entry in trail {
///     println!("{}: {:?} -> {:?}", entry.change_kind, entry.old_value, entry.new_value);
/// }
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Kind of change recorded in a history row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Lifecycle status transition
    Status,

    /// Owner reassignment
    Owner,
}

impl ChangeKind {
    /// Converts kind to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Status => "status",
            ChangeKind::Owner => "owner",
        }
    }

    /// Parses kind from its stored representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "status" => Some(ChangeKind::Status),
            "owner" => Some(ChangeKind::Owner),
            _ => None,
        }
    }
}

/// One audit record of a change to an item
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ItemHistory {
    /// Row ID (monotonic, append order)
    pub id: i64,

    /// Item this record belongs to
    pub item_id: Uuid,

    /// What changed ("status" or "owner")
    pub change_kind: String,

    /// Value before the change
    pub old_value: Option<String>,

    /// Value after the change
    pub new_value: Option<String>,

    /// When the change happened
    pub changed_at: DateTime<Utc>,
}

/// Input for appending a history record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppendHistory {
    /// Item ID
    pub item_id: Uuid,

    /// Kind of change
    pub change_kind: ChangeKind,

    /// Value before the change
    pub old_value: Option<String>,

    /// Value after the change
    pub new_value: Option<String>,
}

impl ItemHistory {
    /// Appends a history record
    ///
    /// Takes a connection rather than a pool so callers can append inside
    /// the same transaction as the change being recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn append(
        conn: &mut sqlx::PgConnection,
        data: AppendHistory,
    ) -> Result<Self, sqlx::Error> {
        let entry = sqlx::query_as::<_, ItemHistory>(
            r#"
            INSERT INTO item_history (item_id, change_kind, old_value, new_value)
            VALUES ($1, $2, $3, $4)
            RETURNING id, item_id, change_kind, old_value, new_value, changed_at
            "#,
        )
        .bind(data.item_id)
        .bind(data.change_kind.as_str())
        .bind(data.old_value)
        .bind(data.new_value)
        .fetch_one(conn)
        .await?;

        Ok(entry)
    }

    /// Lists history records for an item, oldest first
    pub async fn list_by_item(pool: &PgPool, item_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let entries = sqlx::query_as::<_, ItemHistory>(
            r#"
            SELECT id, item_id, change_kind, old_value, new_value, changed_at
            FROM item_history
            WHERE item_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(item_id)
        .fetch_all(pool)
        .await?;

        Ok(entries)
    }

    /// Counts history records for an item
    pub async fn count_by_item(pool: &PgPool, item_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM item_history WHERE item_id = $1")
                .bind(item_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}
