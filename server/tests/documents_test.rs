//! HTTP tests for the document routes.
//!
//! The router runs in-process against an in-memory database.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use listy_engine::{City, QuerySnapshot};
use listy_server::config::Config;
use listy_server::{app, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn test_app(config: Config) -> Router {
    let state = AppState::connect(config).await.unwrap();
    app(state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn set_get_delete_round_trip() {
    let app = test_app(Config::in_memory()).await;
    let city = City::new("Calgary", "AB");

    let (status, body) = send(
        &app,
        "PUT",
        "/collections/Cities/documents/Calgary",
        Some(Value::Object(city.to_fields())),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "Calgary");

    let (status, body) = send(&app, "GET", "/collections/Cities/documents/Calgary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fields"], json!({"name": "Calgary", "province": "AB"}));

    let (status, _) = send(&app, "DELETE", "/collections/Cities/documents/Calgary", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", "/collections/Cities/documents/Calgary", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_missing_document_succeeds() {
    let app = test_app(Config::in_memory()).await;

    let (status, _) = send(&app, "DELETE", "/collections/Cities/documents/Nowhere", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn list_returns_ordered_snapshot() {
    let app = test_app(Config::in_memory()).await;

    for (name, province) in [("Regina", "SK"), ("Calgary", "AB"), ("St. John's", "NL")] {
        let uri = format!(
            "/collections/Cities/documents/{}",
            name.replace(' ', "%20").replace('\'', "%27")
        );
        let (status, _) = send(
            &app,
            "PUT",
            &uri,
            Some(Value::Object(City::new(name, province).to_fields())),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "failed to set {}", name);
    }

    let (status, body) = send(&app, "GET", "/collections/Cities/documents", None).await;
    assert_eq!(status, StatusCode::OK);

    let snapshot: QuerySnapshot = serde_json::from_value(body).unwrap();
    let names: Vec<_> = snapshot
        .iter()
        .map(|doc| City::from_document(doc).unwrap().name)
        .collect();
    assert_eq!(names, vec!["Calgary", "Regina", "St. John's"]);
}

#[tokio::test]
async fn invalid_document_id_is_rejected() {
    let app = test_app(Config::in_memory()).await;

    let (status, body) = send(
        &app,
        "PUT",
        "/collections/Cities/documents/..",
        Some(json!({"name": "..", "province": "AB"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("invalid document id"));
}

#[tokio::test]
async fn non_object_body_is_rejected() {
    let app = test_app(Config::in_memory()).await;

    let (status, _) = send(
        &app,
        "PUT",
        "/collections/Cities/documents/Calgary",
        Some(json!(["Calgary", "AB"])),
    )
    .await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn auth_secret_is_enforced() {
    let mut config = Config::in_memory();
    config.auth_secret = Some("s3cret".to_string());
    let app = test_app(config).await;

    let (status, _) = send(&app, "GET", "/collections/Cities/documents", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/collections/Cities/documents")
        .header(header::AUTHORIZATION, "Bearer s3cret")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_reports_database() {
    let app = test_app(Config::in_memory()).await;

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
    assert_eq!(body["listeners"], 0);
}
