// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Router-level tests for the dashboard API.
//!
//! These tests verify that:
//! 1. Status reports token/cache liveness without requiring auth
//! 2. Activity listing is token-gated and maps auth failures to 401
//! 3. Stats endpoints aggregate the cache and never hit the network
//! 4. The OAuth entry point redirects to Strava

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use strava_dashboard::config::Config;
use strava_dashboard::models::TokenRecord;
use strava_dashboard::routes::create_router;
use strava_dashboard::services::{ActivityCache, StravaClient, TokenManager, TokenStore};
use strava_dashboard::AppState;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Build a test app backed by a temp data dir and a mocked upstream.
fn create_test_app(dir: &tempfile::TempDir, server: Option<&MockServer>) -> axum::Router {
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        ..Config::default()
    };

    let mut strava = StravaClient::new(
        config.strava_client_id.clone(),
        config.strava_client_secret.clone(),
    );
    if let Some(server) = server {
        strava = strava.with_base_urls(
            format!("{}/api/v3", server.uri()),
            format!("{}/oauth/token", server.uri()),
        );
    }

    let tokens = TokenManager::new(strava.clone(), TokenStore::new(config.tokens_path()));
    let cache = ActivityCache::new(config.activities_path());

    create_router(Arc::new(AppState {
        config,
        strava,
        tokens,
        cache,
    }))
}

fn seed_valid_token(dir: &tempfile::TempDir) {
    let store = TokenStore::new(dir.path().join("strava_tokens.json"));
    store
        .save(&TokenRecord {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at: chrono::Utc::now().timestamp() + 3600,
        })
        .unwrap();
}

fn seed_cache(dir: &tempfile::TempDir, body: &str) {
    std::fs::write(dir.path().join("strava_activities.json"), body).unwrap();
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, body)
}

const ONE_RUN_CACHE: &str = r#"[{
    "id": 1,
    "name": "Morning Run",
    "type": "Run",
    "distance": 10000.0,
    "moving_time": 3000,
    "elapsed_time": 3100,
    "start_date": "2024-03-15T10:00:00Z",
    "start_date_local": "2024-03-15T17:00:00Z"
}]"#;

#[tokio::test]
async fn test_status_before_any_auth() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(&dir, None);

    let (status, body) = get(app, "/api/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["authenticated"], false);
    assert_eq!(body["cache_present"], false);
    assert_eq!(body["token_expires_at"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_status_reflects_token_and_cache() {
    let dir = tempfile::tempdir().unwrap();
    seed_valid_token(&dir);
    seed_cache(&dir, "[]");
    let app = create_test_app(&dir, None);

    let (status, body) = get(app, "/api/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["cache_present"], true);
    assert!(body["token_expires_at"].is_string());
}

#[tokio::test]
async fn test_activities_require_authentication() {
    let dir = tempfile::tempdir().unwrap();
    seed_cache(&dir, ONE_RUN_CACHE);
    let app = create_test_app(&dir, None);

    // Token-gated even though a cache exists
    let (status, body) = get(app, "/api/activities").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "not_authenticated");
}

#[tokio::test]
async fn test_activities_served_from_cache_with_valid_token() {
    let dir = tempfile::tempdir().unwrap();
    seed_valid_token(&dir);
    seed_cache(&dir, ONE_RUN_CACHE);
    let app = create_test_app(&dir, None);

    let (status, body) = get(app, "/api/activities").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], 1);
}

#[tokio::test]
async fn test_expired_token_with_bad_refresh_is_auth_error() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    seed_cache(&dir, ONE_RUN_CACHE);

    // Expired token whose refresh upstream rejects
    let store = TokenStore::new(dir.path().join("strava_tokens.json"));
    store
        .save(&TokenRecord {
            access_token: "stale".to_string(),
            refresh_token: "revoked".to_string(),
            expires_at: chrono::Utc::now().timestamp() - 100,
        })
        .unwrap();

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string("{}"))
        .mount(&server)
        .await;

    let app = create_test_app(&dir, Some(&server));
    let (status, body) = get(app, "/api/activities").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "refresh_failed");
}

#[tokio::test]
async fn test_forced_refresh_upstream_error_maps_to_bad_gateway() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    seed_valid_token(&dir);
    seed_cache(&dir, ONE_RUN_CACHE);

    Mock::given(method("GET"))
        .and(path("/api/v3/athlete/activities"))
        .respond_with(ResponseTemplate::new(401).set_body_string("{}"))
        .mount(&server)
        .await;

    let app = create_test_app(&dir, Some(&server));
    let (status, body) = get(app, "/api/activities?refresh=true").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "strava_error");

    // Cache untouched by the failed refresh
    let cached = std::fs::read_to_string(dir.path().join("strava_activities.json")).unwrap();
    assert_eq!(cached, ONE_RUN_CACHE);
}

#[tokio::test]
async fn test_stats_over_seeded_cache() {
    let dir = tempfile::tempdir().unwrap();
    seed_cache(&dir, ONE_RUN_CACHE);
    let app = create_test_app(&dir, None);

    let (status, body) = get(app, "/api/stats").await;

    assert_eq!(status, StatusCode::OK);
    let stats = body.as_array().unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0]["month_year"], "2024-03");
    assert_eq!(stats[0]["run_walk_hike"], 10000.0);
    assert_eq!(stats[0]["bike"], 0.0);
}

#[tokio::test]
async fn test_pace_stats_over_seeded_cache() {
    let dir = tempfile::tempdir().unwrap();
    seed_cache(&dir, ONE_RUN_CACHE);
    let app = create_test_app(&dir, None);

    let (status, body) = get(app, "/api/pace-stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["month_year"], "2024-03");
    assert_eq!(body[0]["run_walk_hike_pace"], 0.3);
}

#[tokio::test]
async fn test_stats_with_empty_cache_is_empty_list() {
    let dir = tempfile::tempdir().unwrap();
    seed_cache(&dir, "[]");
    let app = create_test_app(&dir, None);

    let (status, body) = get(app.clone(), "/api/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));

    let (status, body) = get(app, "/api/pace-stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn test_stats_without_cache_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(&dir, None);

    let (status, body) = get(app, "/api/stats").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "cache_missing");
}

#[tokio::test]
async fn test_weekly_pace_stats_zero_fills_range() {
    let dir = tempfile::tempdir().unwrap();
    seed_cache(&dir, ONE_RUN_CACHE);
    let app = create_test_app(&dir, None);

    let (status, body) = get(
        app,
        "/api/weekly-pace-stats?startDate=2024-03-11&endDate=2024-03-17",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let days = body["days"].as_array().unwrap();
    assert_eq!(days.len(), 7);
    assert_eq!(days[0]["date"], "2024-03-11");
    // 10km at 3.33 m/s lands in Yellow on March 15 (local day)
    assert_eq!(days[4]["yellow_km"], 10.0);
    assert_eq!(body["summary"]["total_distance_km"], 10.0);
}

#[tokio::test]
async fn test_weekly_pace_stats_rejects_inverted_range() {
    let dir = tempfile::tempdir().unwrap();
    seed_cache(&dir, "[]");
    let app = create_test_app(&dir, None);

    let (status, body) = get(
        app,
        "/api/weekly-pace-stats?startDate=2024-03-17&endDate=2024-03-11",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_weekly_pace_stats_rejects_bad_date() {
    let dir = tempfile::tempdir().unwrap();
    seed_cache(&dir, "[]");
    let app = create_test_app(&dir, None);

    let (status, _) = get(app, "/api/weekly-pace-stats?startDate=yesterday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_auth_start_redirects_to_strava() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(&dir, None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/strava")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = response.headers()["location"].to_str().unwrap();
    assert!(location.starts_with("https://www.strava.com/oauth/authorize"));
    assert!(location.contains("client_id=test_client_id"));
    assert!(location.contains("scope=read,activity:read_all"));
}

#[tokio::test]
async fn test_callback_denied_redirects_to_frontend() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(&dir, None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/strava-callback?error=access_denied")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = response.headers()["location"].to_str().unwrap();
    assert!(location.contains("auth_status=denied"));
}

#[tokio::test]
async fn test_callback_without_code_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(&dir, None);

    let (status, body) = get(app, "/strava-callback").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_callback_exchanges_code_and_redirects() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "fresh_access",
            "refresh_token": "fresh_refresh",
            "expires_at": chrono::Utc::now().timestamp() + 21600,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = create_test_app(&dir, Some(&server));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/strava-callback?code=abc123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = response.headers()["location"].to_str().unwrap();
    assert!(location.contains("auth_status=success"));

    // Token persisted for later requests
    let store = TokenStore::new(dir.path().join("strava_tokens.json"));
    assert_eq!(store.load().access_token, "fresh_access");
}
