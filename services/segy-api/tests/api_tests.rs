//! Router tests driven with `tower::ServiceExt::oneshot`.

use std::path::Path;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use segy_api::config::ApiConfig;
use segy_api::state::AppState;
use test_utils::{coordinate_line, standard_las, standard_line, temp_test_dir};

fn app(dir: &Path) -> Router {
    let config = ApiConfig {
        batch_output: dir.join("out").join("batch.json"),
        ..Default::default()
    };
    segy_api::router(Arc::new(AppState::new(config, None)))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health() {
    let dir = temp_test_dir();
    let (status, body) = send(app(dir.path()), get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_metrics_without_recorder() {
    let dir = temp_test_dir();
    let response = app(dir.path()).oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

// ============================================================================
// Manual read
// ============================================================================

#[tokio::test]
async fn test_manual_read_get() {
    let dir = temp_test_dir();
    let line = standard_line(dir.path());
    let uri = format!("/api/segy_manual_read?file_path={}", line.display());
    let (status, body) = send(app(dir.path()), get(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["header_values"]["First_FFID"], 101);
    assert_eq!(body["error"], json!({"type": null, "message": null}));
}

#[tokio::test]
async fn test_manual_read_status_mapping() {
    let dir = temp_test_dir();

    let (status, body) = send(app(dir.path()), post("/api/segy_manual_read", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "input_error");

    let missing = dir.path().join("missing.sgy").display().to_string();
    let (status, body) = send(app(dir.path()), post("/api/segy_manual_read", json!({"file_path": missing}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["type"], "path_error");

    let line = standard_line(dir.path()).display().to_string();
    let (status, body) = send(
        app(dir.path()),
        post(
            "/api/segy_manual_read",
            json!({"file_path": line, "field_mappings": {"CDP": 0}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "input_error");
}

#[tokio::test]
async fn test_zero_coordinates_is_ok() {
    let dir = temp_test_dir();
    let path = coordinate_line(dir.path(), "zero.sgy", (0, 0), (0, 0)).display().to_string();
    let (status, body) = send(app(dir.path()), post("/api/segy_manual_read", json!({"file_path": path}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"]["type"], "zero_coordinates");
}

// ============================================================================
// Batch and folder
// ============================================================================

#[tokio::test]
async fn test_batch_writes_audit_file() {
    let dir = temp_test_dir();
    let line = standard_line(dir.path()).display().to_string();
    let request = json!({"files": [{"index": 7, "filePath": line}, {"index": 8}]});
    let (status, body) = send(app(dir.path()), post("/api/segy_extract_batch", request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["7"]["header_values"]["Last_CDP"], 2003);
    assert_eq!(body["8"]["error"]["message"], "Missing filePath");

    let written: Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("out").join("batch.json")).unwrap()).unwrap();
    assert_eq!(written, body);
}

#[tokio::test]
async fn test_batch_requires_files() {
    let dir = temp_test_dir();
    let (status, body) = send(app(dir.path()), post("/api/segy_extract_batch", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Input must contain 'files' array");
}

#[tokio::test]
async fn test_extract_folder() {
    let dir = temp_test_dir();
    coordinate_line(dir.path(), "one.sgy", (10, 10), (20, 20));
    let folder = dir.path().display().to_string();
    let (status, body) = send(app(dir.path()), post("/api/segy_extract_folder", json!({"folder_path": folder}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send(app(dir.path()), post("/api/segy_extract_folder", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Headers, conversion, LAS and files
// ============================================================================

#[tokio::test]
async fn test_binary_header() {
    let dir = temp_test_dir();
    let line = standard_line(dir.path());
    let uri = format!("/api/binary_header?file_path={}", line.display());
    let (status, body) = send(app(dir.path()), get(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["binary_header"].is_object());
}

#[tokio::test]
async fn test_convert_single_file_errors() {
    let dir = temp_test_dir();
    let path = coordinate_line(dir.path(), "line.sgy", (1, 1), (2, 2)).display().to_string();

    let (status, body) = send(
        app(dir.path()),
        post("/api/convert_single_file", json!({"file_path": path, "byte_header_x": 73})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["message"],
        "Both byte_header_x and byte_header_y must be provided together"
    );

    let (status, _) = send(app(dir.path()), post("/api/convert_coordinates", json!({"segy_files": []}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_las_endpoints() {
    let dir = temp_test_dir();
    let path = standard_las(dir.path()).display().to_string();

    let (status, body) = send(app(dir.path()), post("/api/las/metadata", json!({"file_path": path}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["well_name"], "ACME-1");

    let (status, body) = send(app(dir.path()), post("/api/las/report", json!({"file_path": "nope.las"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);

    let (status, _) = send(app(dir.path()), post("/api/las/summary", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_file_info() {
    let dir = temp_test_dir();
    let line = standard_line(dir.path());
    let uri = format!("/api/file_info?file_path={}", line.display());
    let (status, body) = send(app(dir.path()), get(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_file"], true);

    let (status, _) = send(app(dir.path()), get("/api/file_info?file_path=/no/such/file")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
