//! End-to-end gameplay tests.
//!
//! Full campaign flows over the HTTP API: lives counting down to game over,
//! the complete four-objective run with lives reset at the level boundary,
//! and session reset recovery.

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use leapcode_server::{create_router, AppState, GameService, SessionStore};
use leapcode_tutor::{LevelInfo, Tutor, TutorError};
use serde_json::{json, Value};

/// Tutor double that answers every request with a fixed string.
struct ScriptedTutor(&'static str);

#[async_trait]
impl Tutor for ScriptedTutor {
    async fn feedback(
        &self,
        _info: &LevelInfo<'_>,
        _submitted: &[String],
        _expected: &[&str],
    ) -> Result<String, TutorError> {
        Ok(self.0.to_string())
    }

    async fn hint(
        &self,
        _info: &LevelInfo<'_>,
        _partial_code: Option<&[String]>,
    ) -> Result<String, TutorError> {
        Ok(self.0.to_string())
    }
}

/// Spawns the backend with an empty store and the given tutor.
async fn spawn_server_with_tutor(tutor: Option<Arc<dyn Tutor>>) -> SocketAddr {
    let store = Arc::new(SessionStore::new());
    let game = Arc::new(GameService::new(Arc::clone(&store), tutor));
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

/// Spawns the backend with no tutor configured.
async fn spawn_server() -> SocketAddr {
    spawn_server_with_tutor(None).await
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

/// Submits code for a level/objective and returns the execute response.
async fn execute(
    client: &reqwest::Client,
    addr: SocketAddr,
    session_id: &str,
    level: u32,
    objective: u32,
    code: &[&str],
    lives: i64,
) -> Value {
    client
        .post(format!("http://{addr}/api/v1/execute"))
        .json(&json!({
            "session_id": session_id,
            "level": level,
            "objective": objective,
            "code": code,
            "lives": lives
        }))
        .send()
        .await
        .expect("execute request failed")
        .json()
        .await
        .expect("execute response was not JSON")
}

/// Fetches the session summary.
async fn summary(client: &reqwest::Client, addr: SocketAddr, session_id: &str) -> Value {
    client
        .get(format!("http://{addr}/api/v1/session/{session_id}"))
        .send()
        .await
        .expect("summary request failed")
        .json()
        .await
        .expect("summary response was not JSON")
}

#[tokio::test]
async fn test_three_wrong_submissions_reach_game_over() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();
    let session_id = start_session(&client, addr).await;

    let first = execute(&client, addr, &session_id, 1, 1, &["jump()"], 3).await;
    assert_eq!(first["status"], "incorrect");
    assert_eq!(first["lives_remaining"], 2);
    assert_eq!(first["game_over"], false);
    assert!(first["feedback"].as_str().is_some_and(|f| !f.is_empty()));

    let second = execute(&client, addr, &session_id, 1, 1, &["jump()"], 2).await;
    assert_eq!(second["status"], "incorrect");
    assert_eq!(second["lives_remaining"], 1);

    let third = execute(&client, addr, &session_id, 1, 1, &["jump()"], 1).await;
    assert_eq!(third["status"], "failure");
    assert_eq!(third["success"], false);
    assert_eq!(third["lives_remaining"], 0);
    assert_eq!(third["game_over"], true);

    let ended = summary(&client, addr, &session_id).await;
    assert_eq!(ended["status"], "game_over");
    assert_eq!(ended["lives_remaining"], 0);
    assert_eq!(ended["attempts_count"], 3);
}

#[tokio::test]
async fn test_full_campaign_completes() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();
    let session_id = start_session(&client, addr).await;

    // Normalization: mixed case and stray whitespace still count.
    let first = execute(
        &client,
        addr,
        &session_id,
        1,
        1,
        &["Move_Forward()", " JUMP()", "Come_Down()"],
        3,
    )
    .await;
    assert_eq!(first["status"], "success");
    assert_eq!(
        first["message"],
        "Great job! You've completed Level 1, Objective 1!"
    );

    // Burn a life at (1,2) before clearing it, to observe the level-boundary
    // lives reset.
    let wrong = execute(&client, addr, &session_id, 1, 2, &["jump()"], 3).await;
    assert_eq!(wrong["lives_remaining"], 2);

    let second = execute(
        &client,
        addr,
        &session_id,
        1,
        2,
        &["move_forward()", "jump()", "jump()", "come_down()"],
        2,
    )
    .await;
    assert_eq!(second["status"], "success");

    let mid = summary(&client, addr, &session_id).await;
    assert_eq!(mid["current_level"], 2);
    assert_eq!(mid["current_objective"], 1);
    assert_eq!(mid["lives_remaining"], 3);

    let third = execute(
        &client,
        addr,
        &session_id,
        2,
        1,
        &[
            "move_forward()",
            "toggle_switch()",
            "move_forward()",
            "move_forward()",
        ],
        3,
    )
    .await;
    assert_eq!(third["status"], "success");

    let fourth = execute(
        &client,
        addr,
        &session_id,
        2,
        2,
        &["move_forward()", "throw()", "move_forward()"],
        3,
    )
    .await;
    assert_eq!(fourth["status"], "success");

    let done = summary(&client, addr, &session_id).await;
    assert_eq!(done["status"], "completed");
    assert_eq!(done["current_level"], 2);
    assert_eq!(done["current_objective"], 2);
    assert_eq!(done["attempts_count"], 5);
}

#[tokio::test]
async fn test_reordered_actions_are_rejected() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();
    let session_id = start_session(&client, addr).await;

    let response = execute(
        &client,
        addr,
        &session_id,
        1,
        1,
        &["jump()", "move_forward()", "come_down()"],
        3,
    )
    .await;

    assert_eq!(response["status"], "incorrect");
    assert_eq!(response["success"], false);
}

#[tokio::test]
async fn test_hint_never_consumes_a_life() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();
    let session_id = start_session(&client, addr).await;

    let before = summary(&client, addr, &session_id).await;

    for _ in 0..3 {
        let hint: Value = client
            .post(format!("http://{addr}/api/v1/hint"))
            .json(&json!({"session_id": session_id, "level": 1, "objective": 1}))
            .send()
            .await
            .expect("hint request failed")
            .json()
            .await
            .expect("hint response was not JSON");
        assert_eq!(hint["success"], true);
    }

    let after = summary(&client, addr, &session_id).await;
    assert_eq!(after["lives_remaining"], 3);
    assert_eq!(after["attempts_count"], 0);
    assert_eq!(before["updated_at"], after["updated_at"]);
}

#[tokio::test]
async fn test_reset_recovers_a_lost_game() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();
    let session_id = start_session(&client, addr).await;

    for lives in (1..=3).rev() {
        execute(&client, addr, &session_id, 1, 1, &["jump()"], lives).await;
    }
    let lost = summary(&client, addr, &session_id).await;
    assert_eq!(lost["status"], "game_over");

    let reset: Value = client
        .post(format!(
            "http://{addr}/api/v1/session/reset?session_id={session_id}"
        ))
        .send()
        .await
        .expect("reset request failed")
        .json()
        .await
        .expect("reset response was not JSON");

    assert_eq!(reset["success"], true);
    assert_eq!(reset["lives"], 3);
    assert_eq!(reset["level"], 1);

    let recovered = summary(&client, addr, &session_id).await;
    assert_eq!(recovered["status"], "active");
    assert_eq!(recovered["attempts_count"], 0);
    assert_eq!(recovered["created_at"], lost["created_at"]);

    // The session is playable again after the reset.
    let replay = execute(
        &client,
        addr,
        &session_id,
        1,
        1,
        &["move_forward()", "jump()", "come_down()"],
        3,
    )
    .await;
    assert_eq!(replay["status"], "success");
}

#[tokio::test]
async fn test_tutor_text_reaches_the_player() {
    let addr = spawn_server_with_tutor(Some(Arc::new(ScriptedTutor("You're so close!")))).await;
    let client = reqwest::Client::new();
    let session_id = start_session(&client, addr).await;

    let wrong = execute(&client, addr, &session_id, 1, 1, &["jump()"], 3).await;
    assert_eq!(wrong["status"], "incorrect");
    assert_eq!(wrong["feedback"], "You're so close!");

    let hint: Value = client
        .post(format!("http://{addr}/api/v1/hint"))
        .json(&json!({"session_id": session_id, "level": 1, "objective": 1}))
        .send()
        .await
        .expect("hint request failed")
        .json()
        .await
        .expect("hint response was not JSON");
    assert_eq!(hint["hint"], "You're so close!");
}
