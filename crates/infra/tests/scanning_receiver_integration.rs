//! Integration tests for the scanning API receiver routes
//!
//! Requests are driven through the router with `tower::ServiceExt::oneshot`;
//! payload files land in a temporary log directory.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use dashops_common::testing::TempDir;
use dashops_infra::{scanning_router, FileScanLogs, ScanningState};
use serde_json::json;
use tower::ServiceExt;

const VALIDATOR: &str = "da6a17c407bb11dfeec7392a5042be0a4cc034b6";
const SECRET: &str = "s3cret";

fn app(dir: &TempDir) -> Router {
    scanning_router(ScanningState::new(VALIDATOR, SECRET, FileScanLogs::new(dir.join("logs"))))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn post(body: impl Into<Body>) -> Request<Body> {
    Request::post("/").header("content-type", "application/json").body(body.into()).unwrap()
}

fn payload(secret: &str, kind: &str) -> String {
    json!({
        "secret": secret,
        "type": kind,
        "version": "2.0",
        "data": {"apMac": "00:18:0a:00:00:01", "observations": [{"clientMac": "AA:BB:CC:00:11:22"}]}
    })
    .to_string()
}

#[tokio::test]
async fn get_returns_validator() {
    let dir = TempDir::new("scan-get").unwrap();
    let (status, body) = send(app(&dir), Request::get("/").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, VALIDATOR);
}

#[tokio::test]
async fn wrong_secret_is_forbidden_and_nothing_is_written() {
    let dir = TempDir::new("scan-secret").unwrap();
    let (status, body) = send(app(&dir), post(payload("wrong", "DevicesSeen"))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, "invalid secret");
    assert!(dir.file_names_in("logs").unwrap().is_empty());
}

#[tokio::test]
async fn malformed_bodies_are_rejected() {
    let dir = TempDir::new("scan-invalid").unwrap();

    let (status, body) = send(app(&dir), post("not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "invalid data");

    let (status, _) = send(app(&dir), post(json!({"secret": SECRET}).to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(dir.file_names_in("logs").unwrap().is_empty());
}

#[tokio::test]
async fn valid_posts_are_stored_by_radio() {
    let dir = TempDir::new("scan-store").unwrap();

    let (status, body) = send(app(&dir), post(payload(SECRET, "BluetoothDevicesSeen"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Scanning API POST received");

    let files = dir.file_names_in("logs").unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("_Bluetooth.json"));

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.join("logs").join(&files[0])).unwrap())
            .unwrap();
    assert_eq!(stored["data"]["apMac"], "00:18:0a:00:00:01");
}
