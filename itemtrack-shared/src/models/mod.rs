/// Database models for ItemTrack
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts that own items
/// - `item`: Tracked items with an owner and a lifecycle status
/// - `item_history`: Append-only audit log of item changes
///
/// # Example
///
/// ```no_run
/// use itemtrack_shared::models::user::{CreateUser, User};
/// use itemtrack_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     email: "user@example.com".to_string(),
///     name: Some("Jane Doe".to_string()),
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod item;
pub mod item_history;
pub mod user;
