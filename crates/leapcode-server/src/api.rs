//! HTTP API for the Leapcode backend.
//!
//! # Endpoints
//!
//! - `GET /health` - Service status
//! - `POST /api/v1/session/start` - Create a game session
//! - `POST /api/v1/session/reset?session_id=...` - Reset a session
//! - `GET /api/v1/session/{session_id}` - Session summary
//! - `POST /api/v1/execute` - Validate a code submission
//! - `POST /api/v1/hint` - Request a tutor hint
//!
//! Request-shape validation happens here, before anything reaches the game
//! core; the core itself only ever produces per-request outcomes.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::game::GameService;
use crate::session::{SessionStatus, SessionStore};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Outcome category of an execute response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecuteStatus {
    /// The submission was correct.
    Success,
    /// The request could not be played (bad session, bad objective, or out
    /// of lives).
    Failure,
    /// The submission was wrong but the session continues.
    Incorrect,
}

/// Request body for the execute endpoint.
///
/// Numeric fields are signed so that out-of-range values reach the
/// validation layer and come back as 400s instead of schema rejections.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteRequest {
    /// Session to play against.
    pub session_id: String,
    /// Level the submission targets.
    pub level: i64,
    /// Objective the submission targets.
    pub objective: i64,
    /// The submitted action sequence.
    pub code: Vec<String>,
    /// The client's view of its remaining lives.
    pub lives: i64,
}

/// Response body for the execute endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteResponse {
    /// Whether the submission was correct.
    pub success: bool,
    /// Outcome category.
    pub status: ExecuteStatus,
    /// Player-facing summary of the outcome.
    pub message: String,
    /// Tutor feedback, present on incorrect-but-alive outcomes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    /// Lives remaining after the submission.
    pub lives_remaining: u32,
    /// Whether the session is out of lives (or unknown).
    pub game_over: bool,
}

/// Request body for the hint endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct HintRequest {
    /// Session asking for the hint.
    pub session_id: String,
    /// Level the hint is about.
    pub level: i64,
    /// Objective the hint is about.
    pub objective: i64,
    /// The player's partial code, if any.
    #[serde(default)]
    pub code: Option<Vec<String>>,
}

/// Level/objective context echoed with hints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelContext {
    /// Level number.
    pub level: u32,
    /// Objective number.
    pub objective: u32,
    /// Objective description, or "Unknown" on failure outcomes.
    pub description: String,
}

/// Response body for the hint endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HintResponse {
    /// Whether a hint for a valid session/objective was produced.
    pub success: bool,
    /// The hint text (tutor-generated or static fallback).
    pub hint: String,
    /// Context for the objective the hint refers to.
    pub level_context: LevelContext,
}

/// Response body for the health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "healthy" while the process serves requests.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Time the response was produced.
    pub timestamp: DateTime<Utc>,
}

/// Response body for session creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStartResponse {
    /// Generated session id.
    pub session_id: String,
    /// Starting level.
    pub level: u32,
    /// Starting objective.
    pub objective: u32,
    /// Starting lives.
    pub lives: u32,
}

/// Response body for session reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResetResponse {
    /// Always `true`; failures use the error response instead.
    pub success: bool,
    /// Confirmation message.
    pub message: String,
    /// The reset session's id.
    pub session_id: String,
    /// Level after the reset.
    pub level: u32,
    /// Objective after the reset.
    pub objective: u32,
    /// Lives after the reset.
    pub lives: u32,
}

/// Response body for the session summary endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummaryResponse {
    /// Session id.
    pub session_id: String,
    /// Current level.
    pub current_level: u32,
    /// Current objective.
    pub current_objective: u32,
    /// Remaining lives.
    pub lives_remaining: u32,
    /// Lifecycle status.
    pub status: SessionStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last mutation time.
    pub updated_at: DateTime<Utc>,
    /// Number of recorded attempts.
    pub attempts_count: usize,
}

/// Query parameters for the reset endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ResetQuery {
    /// Session to reset.
    pub session_id: String,
}

/// Error response body returned on 4xx failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Description of the error.
    pub error: String,
}

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the HTTP server.
///
/// Holds the single process-wide session store and the game service built
/// over it. Constructed once at startup and cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// The process-wide session store.
    pub store: Arc<SessionStore>,
    /// Orchestrator over store, catalog, validator, and tutor.
    pub game: Arc<GameService>,
}

impl AppState {
    /// Creates the application state from its constructed dependencies.
    #[must_use]
    pub fn new(store: Arc<SessionStore>, game: Arc<GameService>) -> Self {
        Self { store, game }
    }
}

// ============================================================================
// API Error Type
// ============================================================================

/// Internal error type for API handlers.
#[derive(Debug)]
enum ApiError {
    /// The request failed validation before reaching the game core.
    BadRequest(String),
    /// The referenced session does not exist.
    SessionNotFound,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::SessionNotFound => (StatusCode::NOT_FOUND, "Session not found".to_string()),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

// ============================================================================
// Router Setup
// ============================================================================

/// Creates the HTTP router with all endpoints.
///
/// Game routes are nested under `/api/v1`; health sits at the root. CORS is
/// open for development and request logging goes through `TraceLayer`.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/session/start", post(start_session))
        .route("/session/reset", post(reset_session))
        .route("/session/:session_id", get(get_session))
        .route("/execute", post(execute_code))
        .route("/hint", post(get_hint));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

// ============================================================================
// Handlers
// ============================================================================

/// Handler for `GET /health`.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

/// Handler for `POST /api/v1/session/start`.
async fn start_session(State(state): State<Arc<AppState>>) -> Json<SessionStartResponse> {
    let session = state.store.create().await;
    let total_sessions = state.store.len().await;
    info!(
        session_id = %session.id,
        total_sessions,
        "Session created"
    );

    Json(SessionStartResponse {
        session_id: session.id,
        level: session.current_level,
        objective: session.current_objective,
        lives: session.lives_remaining,
    })
}

/// Handler for `POST /api/v1/session/reset`.
async fn reset_session(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ResetQuery>,
) -> Result<Json<SessionResetResponse>, ApiError> {
    let session = state
        .store
        .reset(&query.session_id)
        .await
        .ok_or(ApiError::SessionNotFound)?;
    info!(session_id = %session.id, "Session reset");

    Ok(Json(SessionResetResponse {
        success: true,
        message: "Session reset successfully".to_string(),
        session_id: session.id,
        level: session.current_level,
        objective: session.current_objective,
        lives: session.lives_remaining,
    }))
}

/// Handler for `GET /api/v1/session/{session_id}`.
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionSummaryResponse>, ApiError> {
    let session = state
        .store
        .get(&session_id)
        .await
        .ok_or(ApiError::SessionNotFound)?;

    Ok(Json(SessionSummaryResponse {
        session_id: session.id,
        current_level: session.current_level,
        current_objective: session.current_objective,
        lives_remaining: session.lives_remaining,
        status: session.status,
        created_at: session.created_at,
        updated_at: session.updated_at,
        attempts_count: session.attempts.len(),
    }))
}

/// Handler for `POST /api/v1/execute`.
async fn execute_code(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExecuteRequest>,
) -> Result<Json<ExecuteResponse>, ApiError> {
    validate_execute_request(&request)?;

    // Validation pinned level/objective to {1, 2} and lives to >= 0.
    let level = u32::try_from(request.level).unwrap_or_default();
    let objective = u32::try_from(request.objective).unwrap_or_default();
    let lives_hint = u32::try_from(request.lives).unwrap_or_default();

    let response = state
        .game
        .execute_code(&request.session_id, level, objective, request.code, lives_hint)
        .await;

    Ok(Json(response))
}

/// Handler for `POST /api/v1/hint`.
async fn get_hint(
    State(state): State<Arc<AppState>>,
    Json(request): Json<HintRequest>,
) -> Result<Json<HintResponse>, ApiError> {
    validate_hint_request(&request)?;

    let level = u32::try_from(request.level).unwrap_or_default();
    let objective = u32::try_from(request.objective).unwrap_or_default();

    let response = state
        .game
        .get_hint(&request.session_id, level, objective, request.code)
        .await;

    Ok(Json(response))
}

/// Rejects malformed execute requests before they reach the game core.
fn validate_execute_request(request: &ExecuteRequest) -> Result<(), ApiError> {
    if request.session_id.is_empty() {
        return Err(ApiError::BadRequest("Session ID is required".to_string()));
    }
    if !matches!(request.level, 1 | 2) {
        return Err(ApiError::BadRequest("Level must be 1 or 2".to_string()));
    }
    if !matches!(request.objective, 1 | 2) {
        return Err(ApiError::BadRequest("Objective must be 1 or 2".to_string()));
    }
    if request.code.is_empty() {
        return Err(ApiError::BadRequest("Code is required".to_string()));
    }
    if request.lives < 0 {
        return Err(ApiError::BadRequest(
            "Lives cannot be negative".to_string(),
        ));
    }
    Ok(())
}

/// Rejects malformed hint requests before they reach the game core.
fn validate_hint_request(request: &HintRequest) -> Result<(), ApiError> {
    if request.session_id.is_empty() {
        return Err(ApiError::BadRequest("Session ID is required".to_string()));
    }
    if !matches!(request.level, 1 | 2) {
        return Err(ApiError::BadRequest("Level must be 1 or 2".to_string()));
    }
    if !matches!(request.objective, 1 | 2) {
        return Err(ApiError::BadRequest("Objective must be 1 or 2".to_string()));
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
