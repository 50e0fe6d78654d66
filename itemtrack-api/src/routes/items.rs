/// Item endpoints: CRUD, status transition, reassignment, history
///
/// # Endpoints
///
/// - `POST /v1/users/:id/items` - Create item owned by a user
/// - `GET /v1/users/:id/items` - List a user's items
/// - `GET /v1/items` - List items (optional `?status=` filter, paginated)
/// - `GET /v1/items/:id` - Get item
/// - `PUT /v1/items/:id` - Update title/description
/// - `DELETE /v1/items/:id` - Delete item (cascades to history)
/// - `POST /v1/items/:id/status` - Change lifecycle status (audited)
/// - `POST /v1/items/:id/reassign` - Reassign owner (audited)
/// - `GET /v1/items/:id/history` - List the item's audit trail
///
/// # Example status change
///
/// ```json
/// POST /v1/items/550e8400-e29b-41d4-a716-446655440000/status
/// {"status": "approved"}
/// ```
///
/// The new status must be one of `new`, `approved`, `eol`; anything else is
/// rejected with a validation error before any database write.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use itemtrack_shared::models::{
    item::{CreateItem, Item, ItemStatus, UpdateItem},
    item_history::ItemHistory,
    user::User,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Create item request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateItemRequest {
    /// Item title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Optional description
    #[validate(length(max = 4096, message = "Description must be at most 4096 characters"))]
    pub description: Option<String>,
}

/// Update item request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateItemRequest {
    /// New title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    /// New description
    #[validate(length(max = 4096, message = "Description must be at most 4096 characters"))]
    pub description: Option<String>,
}

/// Status change request
///
/// The status arrives as a string and is parsed against the enum so that
/// unknown values produce a field-level validation error.
#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    /// Target status: "new", "approved", or "eol"
    pub status: String,
}

/// Reassignment request
#[derive(Debug, Deserialize)]
pub struct ReassignRequest {
    /// ID of the new owner
    pub owner_id: Uuid,
}

/// List items query parameters
#[derive(Debug, Deserialize)]
pub struct ListItemsQuery {
    /// Optional status filter ("new", "approved", "eol")
    pub status: Option<String>,

    /// Maximum number of results (default 50, capped at 200)
    pub limit: Option<i64>,

    /// Offset into the result set
    pub offset: Option<i64>,
}

/// List items response
#[derive(Debug, Serialize)]
pub struct ListItemsResponse {
    /// Items on this page
    pub items: Vec<Item>,
}

/// Item history response
#[derive(Debug, Serialize)]
pub struct ItemHistoryResponse {
    /// Item the trail belongs to
    pub item_id: Uuid,

    /// History records, oldest first
    pub history: Vec<ItemHistory>,
}

/// Create item endpoint handler
///
/// The item is owned by the user in the path and starts with status `new`.
///
/// # Errors
///
/// - 404 Not Found: Owner does not exist
/// - 422 Unprocessable Entity: Validation errors
pub async fn create_item_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<CreateItemRequest>,
) -> Result<Json<Item>, ApiError> {
    request.validate()?;

    // Explicit owner check so an unknown user is a 404, not a bare FK error
    if User::find_by_id(&state.db, user_id).await?.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::info!(owner_id = %user_id, title = %request.title, "Creating new item");

    let item = Item::create(
        &state.db,
        CreateItem {
            owner_id: user_id,
            title: request.title,
            description: request.description,
        },
    )
    .await?;

    tracing::info!(item_id = %item.id, status = %item.status, "Item created successfully");

    Ok(Json(item))
}

/// List items endpoint handler
///
/// With `?status=`, returns exactly the items whose current status matches.
///
/// # Errors
///
/// - 422 Unprocessable Entity: Unknown status filter value
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ListItemsQuery>,
) -> ApiResult<Json<ListItemsResponse>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let offset = query.offset.unwrap_or(0).max(0);

    let items = match query.status.as_deref() {
        Some(raw) => {
            let status = ItemStatus::from_str(raw)
                .map_err(|e| ApiError::invalid_field("status", e.to_string()))?;
            Item::list_by_status(&state.db, status, limit, offset).await?
        }
        None => Item::list(&state.db, limit, offset).await?,
    };

    Ok(Json(ListItemsResponse { items }))
}

/// List a user's items endpoint handler
///
/// # Errors
///
/// - 404 Not Found: Unknown user id
pub async fn list_items_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<ListItemsQuery>,
) -> ApiResult<Json<ListItemsResponse>> {
    if User::find_by_id(&state.db, user_id).await?.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let offset = query.offset.unwrap_or(0).max(0);

    let items = Item::list_by_owner(&state.db, user_id, limit, offset).await?;

    Ok(Json(ListItemsResponse { items }))
}

/// Get item endpoint handler
///
/// # Errors
///
/// - 404 Not Found: Unknown item id
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Item>, ApiError> {
    let item = Item::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    Ok(Json(item))
}

/// Update item endpoint handler
///
/// Only title and description can be changed here; status and owner go
/// through their dedicated endpoints so the change lands in the history log.
///
/// # Errors
///
/// - 404 Not Found: Unknown item id
/// - 422 Unprocessable Entity: Validation errors
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateItemRequest>,
) -> Result<Json<Item>, ApiError> {
    request.validate()?;

    let update = UpdateItem {
        title: request.title,
        description: request.description.map(Some),
    };

    let item = Item::update(&state.db, id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    tracing::info!(item_id = %item.id, "Item updated");

    Ok(Json(item))
}

/// Delete item endpoint handler
///
/// # Errors
///
/// - 404 Not Found: Unknown item id
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let deleted = Item::delete(&state.db, id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Item not found".to_string()));
    }

    tracing::info!(item_id = %id, "Item deleted");

    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Change item status endpoint handler
///
/// Validates the target against the status enum, then updates the item and
/// appends one history row in a single transaction. An invalid status value
/// is rejected before any database write.
///
/// # Errors
///
/// - 404 Not Found: Unknown item id
/// - 422 Unprocessable Entity: Status outside {new, approved, eol}
pub async fn change_item_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ChangeStatusRequest>,
) -> Result<Json<Item>, ApiError> {
    let new_status = ItemStatus::from_str(&request.status)
        .map_err(|e| ApiError::invalid_field("status", e.to_string()))?;

    let item = Item::change_status(&state.db, id, new_status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    Ok(Json(item))
}

/// Reassign item endpoint handler
///
/// Moves the item to a new owner and appends one history row in a single
/// transaction.
///
/// # Errors
///
/// - 400 Bad Request: New owner does not exist
/// - 404 Not Found: Unknown item id
pub async fn reassign_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ReassignRequest>,
) -> Result<Json<Item>, ApiError> {
    let item = Item::reassign(&state.db, id, request.owner_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    Ok(Json(item))
}

/// List item history endpoint handler
///
/// Returns the item's audit trail, oldest first.
///
/// # Errors
///
/// - 404 Not Found: Unknown item id
pub async fn list_item_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ItemHistoryResponse>> {
    if Item::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("Item not found".to_string()));
    }

    let history = ItemHistory::list_by_item(&state.db, id).await?;

    Ok(Json(ItemHistoryResponse {
        item_id: id,
        history,
    }))
}
