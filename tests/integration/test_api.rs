//! REST API tests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use ingres::config::ServerConfig;
use ingres::{create_rest_router, ApiState};

use crate::fixtures::Fixture;

fn router(fixture: &Fixture) -> Router {
    let state = ApiState::new(Arc::new(fixture.processor()));
    create_rest_router(state, &ServerConfig::default())
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn post_query(body: serde_json::Value) -> Request<Body> {
    post_to("/api/query", body)
}

fn post_to(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_query_endpoint() {
    let fixture = Fixture::sample();
    let (status, json) = send(
        router(&fixture),
        post_query(serde_json::json!({ "message": "Show critical areas" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["intent"], "critical_areas");
    assert_eq!(json["query"], "Show critical areas");
    assert_eq!(json["data"]["critical_areas"].as_array().unwrap().len(), 3);
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_query_echoes_raw_message() {
    let fixture = Fixture::sample();
    let (status, json) = send(
        router(&fixture),
        post_query(serde_json::json!({ "message": "  Show critical areas\n" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["intent"], "critical_areas");
    assert_eq!(json["query"], "  Show critical areas\n");
}

#[tokio::test]
async fn test_chat_alias() {
    let fixture = Fixture::sample();
    let (status, json) = send(
        router(&fixture),
        post_to("/api/chat", serde_json::json!({ "message": "annual recharge" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["intent"], "recharge");
    assert_eq!(json["data"]["national_recharge"]["total_recharge"], 565.0);
}

#[tokio::test]
async fn test_query_empty_message() {
    let fixture = Fixture::sample();

    for body in [
        serde_json::json!({ "message": "" }),
        serde_json::json!({ "message": "   " }),
        serde_json::json!({}),
    ] {
        let (status, json) = send(router(&fixture), post_query(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "empty_message");
    }
}

#[tokio::test]
async fn test_query_store_failure() {
    let fixture = Fixture::missing();
    let (status, json) = send(
        router(&fixture),
        post_query(serde_json::json!({ "message": "status of Delhi" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "query_failed");
    assert!(json["error"].as_str().unwrap().contains("missing.db"));
}

#[tokio::test]
async fn test_help_without_store() {
    let fixture = Fixture::missing();
    let (status, json) = send(
        router(&fixture),
        post_query(serde_json::json!({ "message": "help" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["intent"], "help");
    assert!(json["data"]["help"].is_array());
}

#[tokio::test]
async fn test_stats_endpoint() {
    let fixture = Fixture::sample();
    let (status, json) = send(router(&fixture), get("/api/stats")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["general_stats"]["blocks_covered"], 6);
    assert_eq!(json["category_distribution"]["Safe"], 2);
}

#[tokio::test]
async fn test_health_and_info() {
    let fixture = Fixture::missing();

    let (status, json) = send(router(&fixture), get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        serde_json::json!({ "status": "healthy", "service": "INGRES Query API" })
    );

    let (status, json) = send(router(&fixture), get("/api")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "INGRES Query API");
    assert!(json["endpoints"]["query"].is_object());
}
