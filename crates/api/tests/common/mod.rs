use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use fluxdeck_api::config::ServerConfig;
use fluxdeck_api::routes;
use fluxdeck_api::state::AppState;
use fluxdeck_bfl::client::default_http_client;
use fluxdeck_pipeline::runner::{GenerationRunner, PollConfig};
use fluxdeck_storage::durable::FileStore;
use fluxdeck_storage::router::ImageStore;

/// Build a test `ServerConfig` rooted in the given storage directories.
///
/// The upstream base points at a port that is never listening, so any test
/// that accidentally passes validation fails loudly instead of calling the
/// real provider. No default API key is configured.
pub fn test_config(images_dir: &Path, metadata_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        bfl_api_base: "http://127.0.0.1:1".to_string(),
        bfl_api_key: None,
        images_dir: images_dir.to_path_buf(),
        metadata_dir: metadata_dir.to_path_buf(),
    }
}

/// Build the full application router with all middleware layers.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same stack (CORS, request ID, timeout, tracing, panic
/// recovery, static image serving) that production uses.
pub fn build_test_app(config: ServerConfig) -> Router {
    let store = Arc::new(ImageStore::new(FileStore::new(
        config.images_dir.clone(),
        config.metadata_dir.clone(),
    )));
    let http = default_http_client();
    let runner = Arc::new(GenerationRunner::new(
        http.clone(),
        config.bfl_api_base.clone(),
        Arc::clone(&store),
        PollConfig::default(),
    ));

    let request_timeout = config.request_timeout_secs;
    let state = AppState {
        config: Arc::new(config),
        http,
        store: Arc::clone(&store),
        runner,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api", routes::api_routes())
        .nest_service(
            "/generated-images",
            ServeDir::new(store.durable().images_dir()),
        )
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(request_timeout),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// Fire one JSON request at the app and return `(status, parsed body)`.
pub async fn send_json(
    app: &Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request");

    let response = app.clone().oneshot(request).await.expect("send request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("parse body")
    };
    (status, json)
}

/// Fire a body-less GET and return `(status, raw bytes)`.
pub async fn send_get_raw(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("build request");

    let response = app.clone().oneshot(request).await.expect("send request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    (status, bytes.to_vec())
}
