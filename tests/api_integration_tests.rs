//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use cache_node::{api::create_router, AppState, Crawler, LruCache};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app(capacity: usize) -> (Router, Arc<LruCache<String>>) {
    let cache = Arc::new(LruCache::new(capacity).unwrap());
    let app = create_router(AppState::new(cache.clone()));
    (app, cache)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn set_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri("/set")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// == SET Endpoint Tests ==

#[tokio::test]
async fn test_set_endpoint_success() {
    let (app, _) = create_test_app(100);

    let response = app
        .oneshot(set_request(r#"{"key":"test_key","value":"test_value"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert!(json["message"].as_str().unwrap().contains("test_key"));
    assert_eq!(json["updated"], false);
}

#[tokio::test]
async fn test_set_endpoint_reports_update_and_eviction() {
    let (app, _) = create_test_app(2);

    for body in [
        r#"{"key":"a","value":"1"}"#,
        r#"{"key":"b","value":"2"}"#,
    ] {
        let response = app.clone().oneshot(set_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(set_request(r#"{"key":"b","value":"2b","ttl":60}"#))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["updated"], true);

    // a is now the least recently used and gets pushed out
    let response = app
        .oneshot(set_request(r#"{"key":"c","value":"3"}"#))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["evicted"], "a");
}

#[tokio::test]
async fn test_set_endpoint_rejects_bad_ttl() {
    let (app, _) = create_test_app(100);

    let response = app
        .oneshot(set_request(r#"{"key":"k","value":"v","ttl":-5}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("TTL"));
}

#[tokio::test]
async fn test_empty_key_request() {
    let (app, _) = create_test_app(100);

    let response = app
        .oneshot(set_request(r#"{"key":"","value":"v"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_json_request() {
    let (app, _) = create_test_app(100);

    let response = app.oneshot(set_request("not json")).await.unwrap();

    assert!(response.status().is_client_error());
}

// == GET Endpoint Tests ==

#[tokio::test]
async fn test_get_endpoint_success() {
    let (app, _) = create_test_app(100);

    app.clone()
        .oneshot(set_request(r#"{"key":"get_key","value":"get_value"}"#))
        .await
        .unwrap();

    let response = app.oneshot(get_request("/get/get_key")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["key"], "get_key");
    assert_eq!(json["value"], "get_value");
}

#[tokio::test]
async fn test_get_endpoint_not_found() {
    let (app, _) = create_test_app(100);

    let response = app
        .oneshot(get_request("/get/nonexistent_key"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_get_after_capacity_eviction() {
    let (app, _) = create_test_app(1);

    app.clone()
        .oneshot(set_request(r#"{"key":"m","value":"1"}"#))
        .await
        .unwrap();
    app.clone()
        .oneshot(set_request(r#"{"key":"n","value":"2"}"#))
        .await
        .unwrap();

    let response = app.clone().oneshot(get_request("/get/m")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(get_request("/get/n")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// == DELETE Endpoint Tests ==

#[tokio::test]
async fn test_delete_endpoint_twice() {
    let (app, cache) = create_test_app(100);
    cache.put("del_key", "value".to_string(), -1);

    for expected in [true, false] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/del/del_key")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_to_json(response.into_body()).await;
        assert_eq!(json["deleted"], expected);
    }

    assert!(cache.is_empty());
}

// == Stats / Snapshot / Health ==

#[tokio::test]
async fn test_stats_endpoint() {
    let (app, cache) = create_test_app(100);
    cache.put("k", "v".to_string(), -1);
    cache.get("k");
    cache.get("missing");

    let response = app.oneshot(get_request("/stats")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["total_entries"], 1);
    assert_eq!(json["capacity"], 100);
    assert_eq!(json["hit_rate"], 0.5);
}

#[tokio::test]
async fn test_stats_count_crawler_expirations() {
    let (app, cache) = create_test_app(100);
    cache.put_at("stale", "v".to_string(), 1, 0);

    Crawler::new(cache.clone()).crawl();

    let response = app.oneshot(get_request("/stats")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["expirations"], 1);
    assert_eq!(json["total_entries"], 0);
}

#[tokio::test]
async fn test_snapshot_endpoint_order() {
    let (app, cache) = create_test_app(100);
    cache.put_at("first", "1".to_string(), -1, 10);
    cache.put_at("second", "2".to_string(), 30, 20);

    let response = app.oneshot(get_request("/snapshot")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["count"], 2);
    assert_eq!(json["entries"][0]["key"], "first");
    assert_eq!(json["entries"][1]["key"], "second");
    assert_eq!(json["entries"][1]["ttl_seconds"], 30);
    assert_eq!(json["entries"][1]["created_at"], 20);
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = create_test_app(100);

    let response = app.oneshot(get_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}

// == Live Server ==

#[tokio::test]
async fn test_live_server_round_trip() {
    let (app, _) = create_test_app(100);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::new();
    let base = format!("http://{}", addr);

    let response = client
        .put(format!("{}/set", base))
        .json(&serde_json::json!({"key": "live", "value": "yes"}))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let json: Value = client
        .get(format!("{}/get/live", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(json["value"], "yes");

    let response = client
        .delete(format!("{}/del/live", base))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let response = client
        .get(format!("{}/get/live", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

    server.abort();
}
