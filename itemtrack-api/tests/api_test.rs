/// Integration tests for the ItemTrack API
///
/// These tests verify the full system works end-to-end against a real
/// database:
/// - User and Item CRUD
/// - Status transition with history append
/// - Invalid status rejection with no mutation
/// - Owner reassignment with history append
/// - Status filtering and not-found mapping

mod common;

use axum::http::StatusCode;
use common::{body_json, empty_request, json_request, TestContext};
use itemtrack_shared::models::item::{Item, ItemStatus};
use itemtrack_shared::models::item_history::ItemHistory;
use serde_json::json;
use tower::Service as _;
use uuid::Uuid;

#[tokio::test]
async fn test_health_check() {
    let mut ctx = TestContext::new().await.unwrap();

    let response = ctx.app.call(empty_request("GET", "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_create_user_and_item() {
    let mut ctx = TestContext::new().await.unwrap();

    // Create a second user via the API
    let email = format!("created-{}@example.com", Uuid::new_v4());
    let response = ctx
        .app
        .call(json_request(
            "POST",
            "/v1/users",
            json!({ "email": email, "name": "Creator" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let user = body_json(response).await;
    assert_eq!(user["email"], email);
    assert_eq!(user["is_active"], true);
    let user_id = Uuid::parse_str(user["id"].as_str().unwrap()).unwrap();

    // Create an item for them; status defaults to "new"
    let response = ctx
        .app
        .call(json_request(
            "POST",
            &format!("/v1/users/{}/items", user_id),
            json!({ "title": "Widget", "description": "First widget" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let item = body_json(response).await;
    assert_eq!(item["status"], "new");
    assert_eq!(item["owner_id"], user_id.to_string());

    // No history yet; creation is not a change
    let item_id = Uuid::parse_str(item["id"].as_str().unwrap()).unwrap();
    assert_eq!(ItemHistory::count_by_item(&ctx.db, item_id).await.unwrap(), 0);

    // Cleanup cascades through the second user too
    itemtrack_shared::models::user::User::delete(&ctx.db, user_id)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_create_item_for_unknown_user() {
    let mut ctx = TestContext::new().await.unwrap();

    let response = ctx
        .app
        .call(json_request(
            "POST",
            &format!("/v1/users/{}/items", Uuid::new_v4()),
            json!({ "title": "Orphan" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

/// Scenario from the task description: create an item with default status,
/// approve it, find it via the status filter, and verify exactly one
/// history row records the transition.
#[tokio::test]
async fn test_status_change_lifecycle() {
    let mut ctx = TestContext::new().await.unwrap();

    let item_id = common::create_test_item(&mut ctx, "lifecycle-item").await;

    // Change status to approved
    let response = ctx
        .app
        .call(json_request(
            "POST",
            &format!("/v1/items/{}/status", item_id),
            json!({ "status": "approved" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let item = body_json(response).await;
    assert_eq!(item["status"], "approved");

    // The status filter returns it
    let response = ctx
        .app
        .call(empty_request("GET", "/v1/items?status=approved&limit=200"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let ids: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&item_id.to_string().as_str()));

    // Exactly one history row: new -> approved
    let history = ItemHistory::list_by_item(&ctx.db, item_id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].change_kind, "status");
    assert_eq!(history[0].old_value.as_deref(), Some("new"));
    assert_eq!(history[0].new_value.as_deref(), Some("approved"));

    // The history endpoint shows the same trail
    let response = ctx
        .app
        .call(empty_request(
            "GET",
            &format!("/v1/items/{}/history", item_id),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["history"].as_array().unwrap().len(), 1);

    ctx.cleanup().await.unwrap();
}

/// An out-of-enum status is rejected and nothing is mutated.
#[tokio::test]
async fn test_invalid_status_rejected_without_mutation() {
    let mut ctx = TestContext::new().await.unwrap();

    let item_id = common::create_test_item(&mut ctx, "invalid-status-item").await;

    let response = ctx
        .app
        .call(json_request(
            "POST",
            &format!("/v1/items/{}/status", item_id),
            json!({ "status": "ARCHIVED" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "status");

    // Item untouched, no history row
    let item = Item::find_by_id(&ctx.db, item_id).await.unwrap().unwrap();
    assert_eq!(item.status, ItemStatus::New);
    assert_eq!(ItemHistory::count_by_item(&ctx.db, item_id).await.unwrap(), 0);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_status_filter_excludes_other_statuses() {
    let mut ctx = TestContext::new().await.unwrap();

    let approved_id = common::create_test_item(&mut ctx, "filter-approved").await;
    let new_id = common::create_test_item(&mut ctx, "filter-new").await;

    let response = ctx
        .app
        .call(json_request(
            "POST",
            &format!("/v1/items/{}/status", approved_id),
            json!({ "status": "approved" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .app
        .call(empty_request("GET", "/v1/items?status=approved&limit=200"))
        .await
        .unwrap();
    let body = body_json(response).await;
    let ids: Vec<String> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_str().unwrap().to_string())
        .collect();

    assert!(ids.contains(&approved_id.to_string()));
    assert!(!ids.contains(&new_id.to_string()));

    // Unknown filter value is a validation error
    let response = ctx
        .app
        .call(empty_request("GET", "/v1/items?status=archived"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    ctx.cleanup().await.unwrap();
}

/// Reassignment moves the item and appends one owner history row.
#[tokio::test]
async fn test_reassign_records_history() {
    let mut ctx = TestContext::new().await.unwrap();

    let item_id = common::create_test_item(&mut ctx, "reassign-item").await;

    // Second user to receive the item
    let new_owner = itemtrack_shared::models::user::User::create(
        &ctx.db,
        itemtrack_shared::models::user::CreateUser {
            email: format!("recipient-{}@example.com", Uuid::new_v4()),
            name: None,
        },
    )
    .await
    .unwrap();

    let response = ctx
        .app
        .call(json_request(
            "POST",
            &format!("/v1/items/{}/reassign", item_id),
            json!({ "owner_id": new_owner.id }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let item = body_json(response).await;
    assert_eq!(item["owner_id"], new_owner.id.to_string());

    let history = ItemHistory::list_by_item(&ctx.db, item_id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].change_kind, "owner");
    assert_eq!(history[0].old_value.as_deref(), Some(ctx.user.id.to_string().as_str()));
    assert_eq!(history[0].new_value.as_deref(), Some(new_owner.id.to_string().as_str()));

    // Reassigning to a nonexistent owner is a client error
    let response = ctx
        .app
        .call(json_request(
            "POST",
            &format!("/v1/items/{}/reassign", item_id),
            json!({ "owner_id": Uuid::new_v4() }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    itemtrack_shared::models::user::User::delete(&ctx.db, new_owner.id)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_not_found_mapping() {
    let mut ctx = TestContext::new().await.unwrap();
    let missing = Uuid::new_v4();

    let response = ctx
        .app
        .call(empty_request("GET", &format!("/v1/items/{}", missing)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx
        .app
        .call(json_request(
            "PUT",
            &format!("/v1/items/{}", missing),
            json!({ "title": "ghost" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx
        .app
        .call(empty_request("DELETE", &format!("/v1/items/{}", missing)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx
        .app
        .call(json_request(
            "POST",
            &format!("/v1/items/{}/status", missing),
            json!({ "status": "approved" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx
        .app
        .call(empty_request("GET", &format!("/v1/users/{}", missing)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_duplicate_email_conflict() {
    let mut ctx = TestContext::new().await.unwrap();

    let response = ctx
        .app
        .call(json_request(
            "POST",
            "/v1/users",
            json!({ "email": ctx.user.email }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_user_update_and_delete() {
    let mut ctx = TestContext::new().await.unwrap();

    let response = ctx
        .app
        .call(json_request(
            "PUT",
            &format!("/v1/users/{}", ctx.user.id),
            json!({ "name": "Renamed", "is_active": false }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let user = body_json(response).await;
    assert_eq!(user["name"], "Renamed");
    assert_eq!(user["is_active"], false);

    // Delete via the API; items would cascade with it
    let response = ctx
        .app
        .call(empty_request("DELETE", &format!("/v1/users/{}", ctx.user.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .app
        .call(empty_request("GET", &format!("/v1/users/{}", ctx.user.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
