//! Leapcode Backend Core
//!
//! Session state, code validation, progression, and the HTTP API for the
//! Leapcode educational coding game.

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod game;
pub mod progression;
pub mod session;
pub mod validator;

pub use api::{
    create_router, AppState, ErrorResponse, ExecuteRequest, ExecuteResponse, ExecuteStatus,
    HealthResponse, HintRequest, HintResponse, LevelContext, SessionResetResponse,
    SessionStartResponse, SessionSummaryResponse,
};
pub use catalog::{available_actions, SolutionCatalog, SolutionEntry};
pub use config::Config;
pub use error::{Result, ServerError};
pub use game::GameService;
pub use progression::{next_state, Progress};
pub use session::{Attempt, GameSession, SessionStatus, SessionStore, STARTING_LIVES};
pub use validator::is_correct;
