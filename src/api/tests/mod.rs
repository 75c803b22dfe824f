use super::*;
use crate::fetcher::test_support::ScriptedRunner;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::time::Duration;
use tower::ServiceExt;


/// Helper to create a test JobManager instance wrapped in Arc
async fn create_test_manager(runner: ScriptedRunner) -> (Arc<JobManager>, tempfile::TempDir) {
    let (manager, temp_dir) = crate::jobs::test_helpers::create_test_manager(runner).await;
    (Arc::new(manager), temp_dir)
}

/// Router around a scripted runner, with the default config
async fn create_test_app(runner: ScriptedRunner) -> (Router, Arc<JobManager>, tempfile::TempDir) {
    let (manager, temp_dir) = create_test_manager(runner).await;
    let config = manager.config().clone();
    (create_router(manager.clone(), config), manager, temp_dir)
}

/// POST `body` as JSON to `uri`
fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_api_server_serves_and_shuts_down() {
    let (manager, _temp_dir) = create_test_manager(ScriptedRunner::succeeding("")).await;
    let config = manager.config().clone();

    // Port 0 = OS assigns a free port
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    let api_handle = tokio::spawn(serve(listener, manager, config, async move {
        let _ = stop_rx.await;
    }));

    tokio::time::sleep(Duration::from_millis(50)).await;
    stop_tx.send(()).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), api_handle)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_start_api_server_reports_bind_failure() {
    let (manager, _temp_dir) = create_test_manager(ScriptedRunner::succeeding("")).await;

    // Occupy a port, then try to bind the server to it
    let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let mut config = (**manager.config()).clone();
    config.server.api.bind_address = taken.local_addr().unwrap();

    let result = start_api_server(manager, Arc::new(config), async {}).await;

    assert!(matches!(result, Err(crate::Error::Io(_))));
}

#[tokio::test]
async fn test_cors_enabled() {
    let (app, _manager, _temp_dir) = create_test_app(ScriptedRunner::succeeding("")).await;

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers().contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn test_cors_restricted_origins() {
    let (manager, _temp_dir) = create_test_manager(ScriptedRunner::succeeding("")).await;
    let mut config = (**manager.config()).clone();
    config.server.api.cors_origins = vec!["http://localhost:3000".to_string()];
    let app = create_router(manager, Arc::new(config));

    let allowed = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("Origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        allowed.headers().get("access-control-allow-origin").unwrap(),
        "http://localhost:3000"
    );

    let denied = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("Origin", "http://evil.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(!denied.headers().contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn test_cors_disabled() {
    let (manager, _temp_dir) = create_test_manager(ScriptedRunner::succeeding("")).await;
    let mut config = (**manager.config()).clone();
    config.server.api.cors_enabled = false;
    let app = create_router(manager, Arc::new(config));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("Origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(!response.headers().contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _manager, _temp_dir) = create_test_app(ScriptedRunner::succeeding("")).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/start-processing")
                .header("Origin", "http://localhost:3000")
                .header("Access-Control-Request-Method", "POST")
                .header("Access-Control-Request-Headers", "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("access-control-allow-methods"));
}

#[test]
fn test_build_cors_layer_with_empty_origins_allows_any() {
    // Smoke test: an empty list must not panic and behaves like "*"
    let _layer = build_cors_layer(&[]);
    let _layer = build_cors_layer(&["not a header\n".to_string()]);
}
