//! HTTP-level tests for the v1 API, driving the router directly.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use serde_json::{json, Value};
use tower::ServiceExt;

use smartship_api::config::AppConfig;
use smartship_api::migrator::Migrator;
use smartship_api::{api_v1_routes, AppState};

async fn test_app() -> Router {
    let mut opt = ConnectOptions::new("sqlite::memory:".to_string());
    opt.max_connections(1).sqlx_logging(false);
    let db = Database::connect(opt)
        .await
        .expect("in-memory database should connect");
    Migrator::up(&db, None)
        .await
        .expect("migrations should apply");

    let cfg = AppConfig {
        database_url: "sqlite::memory:".into(),
        host: "127.0.0.1".into(),
        port: 0,
        environment: "test".into(),
        log_level: "info".into(),
        log_json: false,
        auto_migrate: false,
        cors_allowed_origins: None,
        db_max_connections: 1,
        db_min_connections: 1,
        db_connect_timeout_secs: 30,
        db_idle_timeout_secs: 600,
        db_acquire_timeout_secs: 8,
    };

    let state = AppState::new(Arc::new(db), cfg);
    Router::new()
        .nest("/api/v1", api_v1_routes())
        .with_state(state)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

#[tokio::test]
async fn status_endpoint_reports_service_name() {
    let app = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["service"], "smartship-api");
}

#[tokio::test]
async fn unknown_tracking_number_returns_404() {
    let app = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/track/SS000000000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn create_then_track_over_http() {
    let app = test_app().await;

    let payload = json!({
        "sender_name": "Acme Exports Ltd",
        "sender_address": "12 Harbour Road, Rotterdam, NL",
        "recipient_name": "John Doe",
        "recipient_address": "123 Main Street, Chicago, IL",
        "service_type": "air",
        "package_type": "package",
        "weight": "12.50"
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/shipments")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let tracking_number = body["data"]["tracking_number"]
        .as_str()
        .expect("tracking number should be present")
        .to_string();
    assert!(tracking_number.starts_with("SS"));
    assert_eq!(body["data"]["status"], "pending");

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/track/{}", tracking_number))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["shipment"]["tracking_number"], tracking_number);
    assert_eq!(body["data"]["timeline"]["steps"][0]["state"], "active");
    assert_eq!(body["data"]["tracking_updates"], json!([]));
}

#[tokio::test]
async fn invalid_service_type_returns_400() {
    let app = test_app().await;

    let payload = json!({
        "sender_name": "Acme Exports Ltd",
        "sender_address": "12 Harbour Road, Rotterdam, NL",
        "recipient_name": "John Doe",
        "recipient_address": "123 Main Street, Chicago, IL",
        "service_type": "teleport"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/shipments")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_status_in_tracking_update_returns_400() {
    let app = test_app().await;

    let payload = json!({
        "shipment_id": "990e8400-e29b-41d4-a716-446655440000",
        "status": "unknown_status",
        "location": "Hub B"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/tracking-updates")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Bad Request");
}

#[tokio::test]
async fn admin_login_with_unknown_user_returns_401() {
    let app = test_app().await;

    let payload = json!({ "username": "ghost", "password": "admin123" });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/admin/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
