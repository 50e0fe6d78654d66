/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup (migrations run on first connect)
/// - Router construction with real application state
/// - Fixture helpers for users and items
/// - Response body parsing

use axum::body::Body;
use axum::http::Request;
use itemtrack_api::app::{build_router, AppState};
use itemtrack_api::config::Config;
use itemtrack_shared::models::user::{CreateUser, User};
use sqlx::PgPool;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub user: User,
}

impl TestContext {
    /// Creates a new test context with a fresh test user
    ///
    /// Requires `DATABASE_URL` to point at a running PostgreSQL instance.
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Run migrations (path relative to Cargo.toml, not this file)
        sqlx::migrate!("../migrations").run(&db).await?;

        // Unique email per test so tests can run in parallel
        let user = User::create(
            &db,
            CreateUser {
                email: format!("test-{}@example.com", Uuid::new_v4()),
                name: Some("Test User".to_string()),
            },
        )
        .await?;

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Ok(TestContext { db, app, user })
    }

    /// Cleans up test data
    ///
    /// Deleting the user cascades to its items and their history.
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        User::delete(&self.db, self.user.id).await?;
        Ok(())
    }
}

/// Builds a JSON request
pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Builds a bodyless request
pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Reads a response body as JSON
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Creates an item via the API owned by the context's test user
pub async fn create_test_item(ctx: &mut TestContext, title: &str) -> Uuid {
    use tower::Service as _;

    let request = json_request(
        "POST",
        &format!("/v1/users/{}/items", ctx.user.id),
        serde_json::json!({ "title": title }),
    );

    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let json = body_json(response).await;
    Uuid::parse_str(json["id"].as_str().unwrap()).unwrap()
}
