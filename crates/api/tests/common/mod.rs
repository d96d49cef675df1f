//! Shared harness for the HTTP integration tests.
//!
//! Builds the production router (same middleware stack as `main.rs`) over a
//! test pool, with the Postgres collaborators and an in-memory query engine.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tokio::sync::broadcast;
use tower::ServiceExt;
use vantage_api::auth::jwt::{generate_access_token, JwtConfig};
use vantage_api::backends::{build_widget_engine, CachedMarkingCatalog, PgSharingPolicy};
use vantage_api::config::ServerConfig;
use vantage_api::router::build_app_router;
use vantage_api::state::AppState;
use vantage_core::public_dashboard::MarkingCeilingMode;
use vantage_core::types::DbId;
use vantage_db::models::marking::CreateMarkingDefinition;
use vantage_db::models::user::{CreateUser, User};
use vantage_db::models::workspace::{CreateWorkspace, Workspace};
use vantage_db::repositories::{MarkingDefinitionRepo, UserRepo, WorkspaceRepo};
use vantage_events::{EventBus, PlatformEvent};
use vantage_widgets::memory::fixtures::{self, Tlp};
use vantage_widgets::memory::MemoryQueryEngine;
use vantage_widgets::SharingPolicy;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        query_engine_url: "http://127.0.0.1:9".to_string(),
        query_engine_timeout_secs: 5,
        query_max_concurrency: 4,
        marking_ceiling_mode: MarkingCeilingMode::Enforce,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Full application router backed by an empty in-memory query engine.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, Arc::new(MemoryQueryEngine::default()))
}

/// Full application router running widget queries against `engine`.
pub fn build_test_app_with(pool: PgPool, engine: Arc<MemoryQueryEngine>) -> Router {
    assemble(pool, engine, Arc::new(EventBus::default()))
}

/// Router plus a subscription to its event bus, opened before any request.
pub fn build_test_app_with_events(pool: PgPool) -> (Router, broadcast::Receiver<PlatformEvent>) {
    let bus = Arc::new(EventBus::default());
    let events = bus.subscribe();
    let app = assemble(pool, Arc::new(MemoryQueryEngine::default()), bus);
    (app, events)
}

fn assemble(pool: PgPool, engine: Arc<MemoryQueryEngine>, event_bus: Arc<EventBus>) -> Router {
    let config = test_config();
    let markings = Arc::new(CachedMarkingCatalog::new(pool.clone()));
    let policy: Arc<dyn SharingPolicy> = Arc::new(PgSharingPolicy::new(pool.clone()));
    let widgets = build_widget_engine(
        &pool,
        markings.clone(),
        Arc::clone(&policy),
        engine,
        config.query_max_concurrency,
    );

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus,
        markings,
        policy,
        widgets,
    };
    build_app_router(state, &config)
}

/// Every event published so far, in order.
pub fn drain(events: &mut broadcast::Receiver<PlatformEvent>) -> Vec<PlatformEvent> {
    std::iter::from_fn(|| events.try_recv().ok()).collect()
}

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &user.role, &test_config().jwt).unwrap()
}

pub async fn seed_user(pool: &PgPool, username: &str, role: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            role: role.to_string(),
        },
    )
    .await
    .unwrap()
}

pub async fn seed_workspace(pool: &PgPool, owner: DbId, manifest: Option<String>) -> Workspace {
    WorkspaceRepo::create(
        pool,
        &CreateWorkspace {
            name: "Threat overview".to_string(),
            description: None,
            manifest,
            owner_id: Some(owner),
        },
    )
    .await
    .unwrap()
}

/// Register the fixture TLP markings under their fixture ids.
pub async fn seed_tlp(pool: &PgPool) -> Tlp {
    let tlp = fixtures::tlp();
    for m in [&tlp.clear, &tlp.green, &tlp.red] {
        MarkingDefinitionRepo::create(
            pool,
            &CreateMarkingDefinition {
                standard_id: m.id,
                definition_type: m.definition_type.clone(),
                definition: m.definition.clone(),
                marking_order: m.order,
            },
        )
        .await
        .unwrap();
    }
    tlp
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn patch_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
