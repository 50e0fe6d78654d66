/// User CRUD endpoints
///
/// # Endpoints
///
/// - `POST /v1/users` - Create user
/// - `GET /v1/users` - List users (paginated)
/// - `GET /v1/users/:id` - Get user
/// - `PUT /v1/users/:id` - Update user
/// - `DELETE /v1/users/:id` - Delete user (cascades to owned items)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use itemtrack_shared::models::user::{CreateUser, UpdateUser, User};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Optional display name
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,
}

/// Update user request
///
/// All fields optional; omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// New email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// New display name
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,

    /// New active flag
    pub is_active: Option<bool>,
}

/// Pagination query parameters
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    /// Maximum number of results (default 50, capped at 200)
    pub limit: Option<i64>,

    /// Offset into the result set
    pub offset: Option<i64>,
}

/// List users response
#[derive(Debug, Serialize)]
pub struct ListUsersResponse {
    /// Users on this page
    pub users: Vec<User>,

    /// Total user count
    pub total: i64,
}

/// Create user endpoint handler
///
/// # Errors
///
/// - 409 Conflict: Email already registered
/// - 422 Unprocessable Entity: Validation errors
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<User>, ApiError> {
    request.validate()?;

    tracing::info!(email = %request.email, "Creating new user");

    let user = User::create(
        &state.db,
        CreateUser {
            email: request.email,
            name: request.name,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "User created successfully");

    Ok(Json(user))
}

/// List users endpoint handler
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<Json<ListUsersResponse>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let offset = query.offset.unwrap_or(0).max(0);

    let users = User::list(&state.db, limit, offset).await?;
    let total = User::count(&state.db).await?;

    Ok(Json(ListUsersResponse { users, total }))
}

/// Get user endpoint handler
///
/// # Errors
///
/// - 404 Not Found: Unknown user id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Update user endpoint handler
///
/// # Errors
///
/// - 404 Not Found: Unknown user id
/// - 409 Conflict: New email already registered
/// - 422 Unprocessable Entity: Validation errors
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    request.validate()?;

    let update = UpdateUser {
        email: request.email,
        name: request.name.map(Some),
        is_active: request.is_active,
    };

    let user = User::update(&state.db, id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = %user.id, "User updated");

    Ok(Json(user))
}

/// Delete user endpoint handler
///
/// Owned items and their history go away with the user (CASCADE).
///
/// # Errors
///
/// - 404 Not Found: Unknown user id
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let deleted = User::delete(&state.db, id).await?;

    if !deleted {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id = %id, "User deleted");

    Ok(Json(serde_json::json!({ "deleted": true })))
}
