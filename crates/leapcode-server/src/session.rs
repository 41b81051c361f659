//! Session state for the Leapcode game.
//!
//! This module defines the session aggregate (status, lives, progression
//! position, attempt history) and the in-memory store that owns it. The
//! store is the single source of truth for game state: everything else in
//! the crate reads and mutates sessions exclusively through its operations.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::progression::{next_state, Progress};

/// Lives granted at session creation and on entering a new level.
pub const STARTING_LIVES: u32 = 3;

/// Hex characters of a generated session id (after the `sess_` prefix).
const SESSION_ID_LEN: usize = 8;

/// Hex characters of a generated attempt id (after the `att_` prefix).
const ATTEMPT_ID_LEN: usize = 6;

// ============================================================================
// SessionStatus
// ============================================================================

/// Lifecycle status of a game session.
///
/// Transitions are `active` -> `active` (progress within the campaign),
/// `active` -> `completed` (final objective cleared), and `active` ->
/// `game_over` (lives exhausted). Both end states are terminal; only a
/// reset returns a session to `active`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// The player is progressing through the campaign.
    #[default]
    Active,
    /// Every objective has been cleared.
    Completed,
    /// Lives reached zero.
    GameOver,
}

impl SessionStatus {
    /// Returns `true` for states that admit no further progression.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::GameOver)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
            Self::GameOver => write!(f, "game_over"),
        }
    }
}

// ============================================================================
// Attempt
// ============================================================================

/// Immutable record of one code submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attempt {
    /// Unique attempt id (`att_` + 6 hex chars).
    pub id: String,

    /// Level the submission targeted.
    pub level: u32,

    /// Objective the submission targeted.
    pub objective: u32,

    /// The action sequence as submitted.
    pub submitted: Vec<String>,

    /// Whether the submission matched the expected solution.
    pub correct: bool,

    /// Tutor feedback attached to incorrect attempts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,

    /// When the attempt was made.
    pub attempted_at: DateTime<Utc>,
}

impl Attempt {
    /// Creates a new attempt record stamped with the current time.
    #[must_use]
    pub fn new(
        level: u32,
        objective: u32,
        submitted: Vec<String>,
        correct: bool,
        feedback: Option<String>,
    ) -> Self {
        Self {
            id: generate_id("att_", ATTEMPT_ID_LEN),
            level,
            objective,
            submitted,
            correct,
            feedback,
            attempted_at: Utc::now(),
        }
    }
}

// ============================================================================
// GameSession
// ============================================================================

/// Mutable aggregate holding one player's game state.
///
/// Owned exclusively by the [`SessionStore`]; callers receive snapshots and
/// mutate only through store operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    /// Unique session id (`sess_` + 8 hex chars).
    pub id: String,

    /// Current level while active.
    pub current_level: u32,

    /// Current objective while active.
    pub current_objective: u32,

    /// Remaining lives; 0 forces `game_over`.
    pub lives_remaining: u32,

    /// Lifecycle status.
    pub status: SessionStatus,

    /// When the session was created. Survives resets.
    pub created_at: DateTime<Utc>,

    /// When the session was last mutated.
    pub updated_at: DateTime<Utc>,

    /// All submissions, in insertion order. Append-only.
    pub attempts: Vec<Attempt>,
}

impl GameSession {
    /// Creates a fresh session at the start of the campaign.
    #[must_use]
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: generate_id("sess_", SESSION_ID_LEN),
            current_level: 1,
            current_objective: 1,
            lives_remaining: STARTING_LIVES,
            status: SessionStatus::Active,
            created_at: now,
            updated_at: now,
            attempts: Vec::new(),
        }
    }

    /// Refreshes `updated_at` to the current time.
    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Generates a prefixed short id from a v4 UUID.
fn generate_id(prefix: &str, len: usize) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{prefix}{}", &hex[..len])
}

// ============================================================================
// SessionStore
// ============================================================================

/// In-memory owner of all game sessions, keyed by session id.
///
/// Exactly one store exists per process; handlers share it through the
/// router state. Each operation acquires the internal lock only for its own
/// read-or-mutate step, so a request is free to await external services
/// (the tutor) between operations without holding the lock.
///
/// Every mutating operation returns `None` when the id is unknown —
/// callers must surface that as "session not found", which is distinct
/// from any validation failure.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, GameSession>>,
}

impl SessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new session and returns a snapshot of it.
    pub async fn create(&self) -> GameSession {
        let session = GameSession::new();
        let mut sessions = self.sessions.lock().await;
        sessions.insert(session.id.clone(), session.clone());
        session
    }

    /// Returns a snapshot of the session, if it exists.
    pub async fn get(&self, id: &str) -> Option<GameSession> {
        self.sessions.lock().await.get(id).cloned()
    }

    /// Appends an attempt to the session's history.
    pub async fn record_attempt(
        &self,
        id: &str,
        level: u32,
        objective: u32,
        submitted: Vec<String>,
        correct: bool,
        feedback: Option<String>,
    ) -> Option<GameSession> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.get_mut(id)?;
        session
            .attempts
            .push(Attempt::new(level, objective, submitted, correct, feedback));
        session.touch();
        Some(session.clone())
    }

    /// Removes one life, flooring at zero.
    ///
    /// Reaching zero forces `game_over`. Repeated calls at the floor stay
    /// at zero and `game_over`.
    pub async fn decrement_lives(&self, id: &str) -> Option<GameSession> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.get_mut(id)?;
        session.lives_remaining = session.lives_remaining.saturating_sub(1);
        if session.lives_remaining == 0 {
            session.status = SessionStatus::GameOver;
        }
        session.touch();
        Some(session.clone())
    }

    /// Moves the session past its current objective.
    ///
    /// Applies the progression table: next objective, next level (with
    /// lives restored to [`STARTING_LIVES`]), or `completed` after the
    /// final objective. Terminal sessions keep their level/objective/status
    /// untouched.
    pub async fn advance(&self, id: &str) -> Option<GameSession> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.get_mut(id)?;

        if !session.status.is_terminal() {
            match next_state(session.current_level, session.current_objective) {
                Some(Progress::Next {
                    level,
                    objective,
                    reset_lives,
                }) => {
                    session.current_level = level;
                    session.current_objective = objective;
                    if reset_lives {
                        session.lives_remaining = STARTING_LIVES;
                    }
                }
                Some(Progress::Completed) => {
                    session.status = SessionStatus::Completed;
                }
                None => {}
            }
        }

        session.touch();
        Some(session.clone())
    }

    /// Restores the session to its initial state, clearing attempts.
    ///
    /// The id and creation timestamp are preserved.
    pub async fn reset(&self, id: &str) -> Option<GameSession> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.get_mut(id)?;
        session.current_level = 1;
        session.current_objective = 1;
        session.lives_remaining = STARTING_LIVES;
        session.status = SessionStatus::Active;
        session.attempts.clear();
        session.touch();
        Some(session.clone())
    }

    /// Number of sessions currently held.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Returns `true` when no sessions exist.
    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
