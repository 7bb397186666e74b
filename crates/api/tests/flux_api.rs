//! Validation tests for the upstream proxy endpoints.
//!
//! These exercise every 400 path. The test config points the upstream at a
//! dead port and configures no default key, so any request that slipped
//! past validation would fail loudly rather than silently call out.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use tempfile::TempDir;

fn app() -> (axum::Router, TempDir) {
    let dir = TempDir::new().unwrap();
    let app = common::build_test_app(common::test_config(
        &dir.path().join("images"),
        &dir.path().join("metadata"),
    ));
    (app, dir)
}

// ---------------------------------------------------------------------------
// POST /api/flux/generate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn generate_without_api_key_returns_400() {
    let (app, _dir) = app();

    let (status, body) = common::send_json(
        &app,
        Method::POST,
        "/api/flux/generate",
        json!({"model": "flux-kontext-pro", "prompt": "a red ball"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "API key is required");
    assert_eq!(body["code"], "AUTH_ERROR");
}

#[tokio::test]
async fn generate_with_invalid_model_returns_400() {
    let (app, _dir) = app();

    let (status, body) = common::send_json(
        &app,
        Method::POST,
        "/api/flux/generate",
        json!({"model": "flux-dev", "apiKey": "k", "prompt": "a red ball"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Valid model is required (flux-kontext-pro or flux-kontext-max)"
    );
}

#[tokio::test]
async fn generate_without_model_returns_400() {
    let (app, _dir) = app();

    let (status, body) = common::send_json(
        &app,
        Method::POST,
        "/api/flux/generate",
        json!({"apiKey": "k", "prompt": "a red ball"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Valid model is required (flux-kontext-pro or flux-kontext-max)"
    );
}

#[tokio::test]
async fn generate_with_blank_prompt_returns_400() {
    let (app, _dir) = app();

    let (status, body) = common::send_json(
        &app,
        Method::POST,
        "/api/flux/generate",
        json!({"model": "flux-kontext-pro", "apiKey": "k", "prompt": "   "}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Prompt must not be empty");
}

// ---------------------------------------------------------------------------
// POST /api/flux/poll
// ---------------------------------------------------------------------------

#[tokio::test]
async fn poll_without_api_key_returns_400() {
    let (app, _dir) = app();

    let (status, body) = common::send_json(
        &app,
        Method::POST,
        "/api/flux/poll",
        json!({"pollingUrl": "https://api.bfl.ai/v1/get_result?id=x"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "API key is required");
}

#[tokio::test]
async fn poll_without_polling_url_returns_400() {
    let (app, _dir) = app();

    let (status, body) = common::send_json(
        &app,
        Method::POST,
        "/api/flux/poll",
        json!({"apiKey": "k"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Polling URL is required");
}

// ---------------------------------------------------------------------------
// POST /api/flux/download
// ---------------------------------------------------------------------------

#[tokio::test]
async fn download_without_url_returns_400() {
    let (app, _dir) = app();

    let (status, body) =
        common::send_json(&app, Method::POST, "/api/flux/download", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Image URL is required");
}

// ---------------------------------------------------------------------------
// POST /api/generate (one-shot)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn one_shot_generate_without_key_returns_400() {
    let (app, _dir) = app();

    let (status, body) = common::send_json(
        &app,
        Method::POST,
        "/api/generate",
        json!({"model": "flux-kontext-pro", "prompt": "a red ball", "aspectRatio": "1:1"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "API key is required");
}
