//! Integration tests for the Leapcode HTTP API.
//!
//! These tests serve the real router on an ephemeral port and drive it with
//! reqwest, validating endpoint shapes: health, session lifecycle, request
//! validation, and not-found handling.

use std::net::SocketAddr;
use std::sync::Arc;

use leapcode_server::{create_router, AppState, GameService, SessionStore};
use serde_json::{json, Value};

/// Spawns the backend with an empty store and no tutor configured.
async fn spawn_server() -> SocketAddr {
    let store = Arc::new(SessionStore::new());
    let game = Arc::new(GameService::new(Arc::clone(&store), None));
    let router = create_router(AppState::new(store, game));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to get local addr");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Server failed");
    });

    addr
}

/// Starts a session and returns its id.
async fn start_session(client: &reqwest::Client, addr: SocketAddr) -> String {
    let response: Value = client
        .post(format!("http://{addr}/api/v1/session/start"))
        .send()
        .await
        .expect("start request failed")
        .json()
        .await
        .expect("start response was not JSON");
    response["session_id"]
        .as_str()
        .expect("missing session_id")
        .to_string()
}

#[tokio::test]
async fn test_health_endpoint() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .expect("health request failed");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("health body was not JSON");
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].as_str().is_some_and(|v| !v.is_empty()));
    assert!(body["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn test_session_start_and_summary() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();

    let session_id = start_session(&client, addr).await;
    assert!(session_id.starts_with("sess_"));

    let summary: Value = client
        .get(format!("http://{addr}/api/v1/session/{session_id}"))
        .send()
        .await
        .expect("summary request failed")
        .json()
        .await
        .expect("summary body was not JSON");

    assert_eq!(summary["session_id"], session_id.as_str());
    assert_eq!(summary["current_level"], 1);
    assert_eq!(summary["current_objective"], 1);
    assert_eq!(summary["lives_remaining"], 3);
    assert_eq!(summary["status"], "active");
    assert_eq!(summary["attempts_count"], 0);
}

#[tokio::test]
async fn test_session_summary_unknown_returns_404() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://{addr}/api/v1/session/sess_missing"))
        .send()
        .await
        .expect("summary request failed");
    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.expect("error body was not JSON");
    assert_eq!(body["error"], "Session not found");
}

#[tokio::test]
async fn test_session_reset_unknown_returns_404() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!(
            "http://{addr}/api/v1/session/reset?session_id=sess_missing"
        ))
        .send()
        .await
        .expect("reset request failed");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_execute_request_validation() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();
    let url = format!("http://{addr}/api/v1/execute");

    let valid = json!({
        "session_id": "sess_x",
        "level": 1,
        "objective": 1,
        "code": ["move_forward()"],
        "lives": 3
    });

    let cases = [
        ("session_id", json!(""), "Session ID is required"),
        ("level", json!(3), "Level must be 1 or 2"),
        ("level", json!(-1), "Level must be 1 or 2"),
        ("objective", json!(0), "Objective must be 1 or 2"),
        ("code", json!([]), "Code is required"),
        ("lives", json!(-1), "Lives cannot be negative"),
    ];

    for (field, value, expected_error) in cases {
        let mut body = valid.clone();
        body[field] = value;

        let response = client
            .post(&url)
            .json(&body)
            .send()
            .await
            .expect("execute request failed");
        assert_eq!(response.status(), 400, "field: {field}");

        let error: Value = response.json().await.expect("error body was not JSON");
        assert_eq!(error["error"], expected_error, "field: {field}");
    }
}

#[tokio::test]
async fn test_hint_request_validation() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();
    let url = format!("http://{addr}/api/v1/hint");

    let response = client
        .post(&url)
        .json(&json!({"session_id": "", "level": 1, "objective": 1}))
        .send()
        .await
        .expect("hint request failed");
    assert_eq!(response.status(), 400);

    let response = client
        .post(&url)
        .json(&json!({"session_id": "sess_x", "level": 9, "objective": 1}))
        .send()
        .await
        .expect("hint request failed");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_hint_fallback_and_context() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();

    let session_id = start_session(&client, addr).await;

    let hint: Value = client
        .post(format!("http://{addr}/api/v1/hint"))
        .json(&json!({
            "session_id": session_id,
            "level": 2,
            "objective": 1,
            "code": ["move_forward()"]
        }))
        .send()
        .await
        .expect("hint request failed")
        .json()
        .await
        .expect("hint body was not JSON");

    assert_eq!(hint["success"], true);
    assert!(hint["hint"].as_str().is_some_and(|h| !h.is_empty()));
    assert_eq!(hint["level_context"]["level"], 2);
    assert_eq!(hint["level_context"]["objective"], 1);
    assert_eq!(hint["level_context"]["description"], "Activate bridge lever");
}

#[tokio::test]
async fn test_hint_unknown_session_is_in_band_failure() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();

    let hint: Value = client
        .post(format!("http://{addr}/api/v1/hint"))
        .json(&json!({"session_id": "sess_missing", "level": 1, "objective": 1}))
        .send()
        .await
        .expect("hint request failed")
        .json()
        .await
        .expect("hint body was not JSON");

    assert_eq!(hint["success"], false);
    assert_eq!(hint["hint"], "Invalid session ID. Please start a new session.");
    assert_eq!(hint["level_context"]["description"], "Unknown");
}
