//! Integration tests for the anagram API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. This validates handler logic, routing, and the
//! timing middleware without needing a live network connection.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use anagram_api::router::build_router;
use anagram_api::state::AppState;
use anagram_api::timing::PROCESS_TIME_HEADER;
use anagram_core::{TimingCollector, WordService, WordStore};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use chrono::{TimeZone, Utc};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

const TRACKED: [&str; 2] = ["/api/v1/similar", "/api/v1/add-word"];

async fn make_test_state(dir: &TempDir, words: &str) -> Arc<AppState> {
    let path = dir.path().join("words.txt");
    std::fs::write(&path, words).unwrap();
    let service = WordService::bootstrap(
        Arc::new(WordStore::new(path)),
        Arc::new(TimingCollector::new()),
    )
    .await;
    Arc::new(AppState::new(service, TRACKED))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(router: &Router, uri: &str) -> Response<Body> {
    router
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_word(router: &Router, body: &str) -> Response<Body> {
    router
        .clone()
        .oneshot(
            Request::post("/api/v1/add-word")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_owned()))
                .unwrap(),
        )
        .await
        .unwrap()
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_similar_returns_anagrams() {
    let dir = TempDir::new().unwrap();
    let state = make_test_state(&dir, "listen\nsilent\nenlist\napple\n").await;
    let router = build_router(state);

    let response = get(&router, "/api/v1/similar?word=Listen").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    let similar: Vec<&str> = json["similar"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(similar.len(), 2);
    assert!(similar.contains(&"silent"));
    assert!(similar.contains(&"enlist"));
    assert!(!similar.contains(&"listen"));
}

#[tokio::test]
async fn test_similar_with_no_anagrams_is_empty() {
    let dir = TempDir::new().unwrap();
    let state = make_test_state(&dir, "apple\n").await;
    let router = build_router(state);

    let response = get(&router, "/api/v1/similar?word=apple").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json, serde_json::json!({ "similar": [] }));
}

#[tokio::test]
async fn test_similar_unknown_word_is_400() {
    let dir = TempDir::new().unwrap();
    let state = make_test_state(&dir, "listen\n").await;
    let router = build_router(state);

    let response = get(&router, "/api/v1/similar?word=silent").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["detail"], "'silent' not found in the database.");
}

#[tokio::test]
async fn test_similar_invalid_word_is_400() {
    let dir = TempDir::new().unwrap();
    let state = make_test_state(&dir, "listen\n").await;
    let router = build_router(state);

    for uri in [
        "/api/v1/similar?word=l1sten",
        "/api/v1/similar?word=two%20words",
        "/api/v1/similar?word=what%3F",
        "/api/v1/similar?word=",
        "/api/v1/similar",
    ] {
        let response = get(&router, uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let json = body_to_json(response.into_body()).await;
        assert!(json["detail"].as_str().unwrap().contains("only letters"));
    }
}

#[tokio::test]
async fn test_rejected_query_string_has_detail_body() {
    let dir = TempDir::new().unwrap();
    let state = make_test_state(&dir, "listen\nsilent\n").await;
    let router = build_router(state);

    for uri in [
        "/api/v1/similar?word=listen&word=silent",
        "/api/v1/stats?endpoint=/api/v1/similar&endpoint=/api/v1/add-word",
    ] {
        let response = get(&router, uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let json = body_to_json(response.into_body()).await;
        assert!(json["detail"].as_str().unwrap().contains("duplicate field"), "{uri}");
    }
}

#[tokio::test]
async fn test_add_word_then_find_it() {
    let dir = TempDir::new().unwrap();
    let state = make_test_state(&dir, "listen\n").await;
    let router = build_router(state);

    let before = get(&router, "/api/v1/similar?word=silent").await;
    assert_eq!(before.status(), StatusCode::BAD_REQUEST);

    let response = post_word(&router, r#"{"word": "Silent"}"#).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["detail"], "'silent' added successfully!");

    let json = body_to_json(get(&router, "/api/v1/similar?word=silent").await.into_body()).await;
    assert_eq!(json["similar"], serde_json::json!(["listen"]));
    let json = body_to_json(get(&router, "/api/v1/similar?word=listen").await.into_body()).await;
    assert_eq!(json["similar"], serde_json::json!(["silent"]));

    let contents = std::fs::read_to_string(dir.path().join("words.txt")).unwrap();
    assert_eq!(contents, "listen\nsilent\n");
}

#[tokio::test]
async fn test_add_duplicate_word_is_400() {
    let dir = TempDir::new().unwrap();
    let state = make_test_state(&dir, "apple\n").await;
    let router = build_router(state);

    let response = post_word(&router, r#"{"word": "APPLE"}"#).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["detail"], "'apple' already exists in the database.");
}

#[tokio::test]
async fn test_add_invalid_word_is_400() {
    let dir = TempDir::new().unwrap();
    let state = make_test_state(&dir, "").await;
    let router = build_router(state);

    for body in [
        r#"{"word": ""}"#,
        r#"{"word": "abc123"}"#,
        r#"{"word": "hello world"}"#,
    ] {
        let response = post_word(&router, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
    }
}

#[tokio::test]
async fn test_add_malformed_body_is_400() {
    let dir = TempDir::new().unwrap();
    let state = make_test_state(&dir, "").await;
    let router = build_router(state);

    let response = post_word(&router, r#"{"text": "hello"}"#).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["detail"].is_string());
}

#[tokio::test]
async fn test_add_word_storage_failure_is_500() {
    let dir = TempDir::new().unwrap();
    // The store points at a directory, so every append fails.
    let service = WordService::new(
        Arc::default(),
        Arc::new(WordStore::new(dir.path())),
        Arc::new(TimingCollector::new()),
    );
    let state = Arc::new(AppState::new(service, TRACKED));
    let router = build_router(Arc::clone(&state));

    let response = post_word(&router, r#"{"word": "orphan"}"#).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(state.service.index().is_empty().await);
}

#[tokio::test]
async fn test_stats_counts_words_and_tracked_requests() {
    let dir = TempDir::new().unwrap();
    let state = make_test_state(&dir, "one\ntwo\n").await;
    let router = build_router(state);

    let json = body_to_json(get(&router, "/api/v1/stats").await.into_body()).await;
    assert_eq!(json["totalWords"], 2);
    assert_eq!(json["totalRequests"], 0);
    assert_eq!(json["avgProcessingTimeMicroseconds"], 0);

    let _ = get(&router, "/api/v1/similar?word=one").await;
    let _ = get(&router, "/api/v1/similar?word=missing").await;
    let _ = post_word(&router, r#"{"word": "three"}"#).await;

    // Stats requests themselves are not tracked.
    let json = body_to_json(get(&router, "/api/v1/stats").await.into_body()).await;
    assert_eq!(json["totalWords"], 3);
    assert_eq!(json["totalRequests"], 3);
    assert!(json["avgProcessingTimeMicroseconds"].is_u64());
}

#[tokio::test]
async fn test_stats_filters() {
    let dir = TempDir::new().unwrap();
    let state = make_test_state(&dir, "").await;
    let timings = Arc::clone(state.timings());
    let day = |d| Utc.with_ymd_and_hms(2025, 7, d, 12, 0, 0).unwrap();
    timings
        .record_at("/api/v1/similar", Duration::from_micros(10), day(1))
        .await;
    timings
        .record_at("/api/v1/add-word", Duration::from_micros(20), day(2))
        .await;
    timings
        .record_at("/api/v1/similar", Duration::from_micros(30), day(3))
        .await;
    let router = build_router(state);

    let json = body_to_json(get(&router, "/api/v1/stats").await.into_body()).await;
    assert_eq!(json["avgProcessingTimeMicroseconds"], 20);

    let json = body_to_json(
        get(&router, "/api/v1/stats?endpoint=/api/v1/add-word")
            .await
            .into_body(),
    )
    .await;
    assert_eq!(json["avgProcessingTimeMicroseconds"], 20);

    let json = body_to_json(
        get(&router, "/api/v1/stats?from=2025-07-02T00:00:00&endpoint=/api/v1/similar")
            .await
            .into_body(),
    )
    .await;
    assert_eq!(json["avgProcessingTimeMicroseconds"], 30);
    assert_eq!(json["totalRequests"], 3);

    let json = body_to_json(
        get(&router, "/api/v1/stats?from=2025-08-01&to=2025-09-01")
            .await
            .into_body(),
    )
    .await;
    assert_eq!(json["avgProcessingTimeMicroseconds"], 0);
}

#[tokio::test]
async fn test_stats_bad_timestamp_is_400() {
    let dir = TempDir::new().unwrap();
    let state = make_test_state(&dir, "").await;
    let router = build_router(state);

    let response = get(&router, "/api/v1/stats?from=last-tuesday").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["detail"].as_str().unwrap().contains("from"));
}

#[tokio::test]
async fn test_every_response_has_process_time_header() {
    let dir = TempDir::new().unwrap();
    let state = make_test_state(&dir, "cat\n").await;
    let router = build_router(state);

    let responses = [
        get(&router, "/api/v1/similar?word=cat").await,
        get(&router, "/api/v1/similar?word=c4t").await,
        get(&router, "/api/v1/stats").await,
        post_word(&router, r#"{"word": "act"}"#).await,
        get(&router, "/api/nonexistent").await,
    ];

    for response in &responses {
        let value = response.headers().get(PROCESS_TIME_HEADER).unwrap();
        let text = String::from_utf8(value.as_bytes().to_vec()).unwrap();
        let number = text.strip_suffix("\u{b5}s").unwrap();
        let (_, decimals) = number.split_once('.').unwrap();
        assert_eq!(decimals.len(), 2, "{text}");
        assert!(number.parse::<f64>().is_ok(), "{text}");
    }
}

#[tokio::test]
async fn test_nonexistent_route_returns_404() {
    let dir = TempDir::new().unwrap();
    let state = make_test_state(&dir, "").await;
    let router = build_router(state);

    let response = get(&router, "/api/nonexistent").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
