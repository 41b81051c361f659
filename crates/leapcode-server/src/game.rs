//! Game orchestration.
//!
//! [`GameService`] sequences each request over the session store, solution
//! catalog, validator, and the optional tutor. It is the only component
//! that talks to both the store and the tutor; tutor calls happen between
//! store operations so no session lock is held while the model responds.

use std::sync::Arc;

use leapcode_tutor::{fallback_feedback, fallback_hint, LevelInfo, Tutor};
use tracing::{info, warn};

use crate::api::{ExecuteResponse, ExecuteStatus, HintResponse, LevelContext};
use crate::catalog::{available_actions, SolutionCatalog, SolutionEntry};
use crate::session::SessionStore;
use crate::validator;

/// Feedback recorded on the attempt that exhausts the last life.
const GAME_OVER_FEEDBACK: &str = "Game Over";

/// Orchestrates execute-code and hint requests over the game core.
pub struct GameService {
    store: Arc<SessionStore>,
    catalog: SolutionCatalog,
    tutor: Option<Arc<dyn Tutor>>,
}

impl GameService {
    /// Creates a service over the shared store and an optional tutor.
    ///
    /// With no tutor configured every feedback/hint request resolves to the
    /// static fallback text.
    #[must_use]
    pub fn new(store: Arc<SessionStore>, tutor: Option<Arc<dyn Tutor>>) -> Self {
        Self {
            store,
            catalog: SolutionCatalog::new(),
            tutor,
        }
    }

    /// Validates a submission and applies its outcome to the session.
    ///
    /// `lives_hint` is the client's view of its remaining lives; it is only
    /// echoed back in outcomes that never reached a session. The session's
    /// own count decides between the incorrect and game-over paths.
    pub async fn execute_code(
        &self,
        session_id: &str,
        level: u32,
        objective: u32,
        code: Vec<String>,
        lives_hint: u32,
    ) -> ExecuteResponse {
        let Some(session) = self.store.get(session_id).await else {
            return ExecuteResponse {
                success: false,
                status: ExecuteStatus::Failure,
                message: "Invalid session ID".to_string(),
                feedback: None,
                lives_remaining: lives_hint,
                game_over: true,
            };
        };

        let Some(entry) = self.catalog.lookup(level, objective) else {
            return ExecuteResponse {
                success: false,
                status: ExecuteStatus::Failure,
                message: "Invalid level or objective".to_string(),
                feedback: None,
                lives_remaining: lives_hint,
                game_over: false,
            };
        };

        if validator::is_correct(&code, entry.expected_actions) {
            self.store
                .record_attempt(session_id, level, objective, code, true, None)
                .await;
            self.store.advance(session_id).await;
            info!(session_id, level, objective, "Objective cleared");

            return ExecuteResponse {
                success: true,
                status: ExecuteStatus::Success,
                message: format!(
                    "Great job! You've completed Level {level}, Objective {objective}!"
                ),
                feedback: None,
                lives_remaining: session.lives_remaining,
                game_over: false,
            };
        }

        if session.lives_remaining > 1 {
            // Generate feedback before touching the session; the store lock
            // must not be held while the model responds.
            let feedback = self.generate_feedback(entry, &code).await;
            let updated = self.store.decrement_lives(session_id).await;
            self.store
                .record_attempt(
                    session_id,
                    level,
                    objective,
                    code,
                    false,
                    Some(feedback.clone()),
                )
                .await;
            let lives_remaining = updated.map_or(0, |s| s.lives_remaining);
            info!(session_id, lives_remaining, "Incorrect submission");

            ExecuteResponse {
                success: false,
                status: ExecuteStatus::Incorrect,
                message: "Not quite right, but keep trying!".to_string(),
                feedback: Some(feedback),
                lives_remaining,
                game_over: false,
            }
        } else {
            self.store.decrement_lives(session_id).await;
            self.store
                .record_attempt(
                    session_id,
                    level,
                    objective,
                    code,
                    false,
                    Some(GAME_OVER_FEEDBACK.to_string()),
                )
                .await;
            info!(session_id, "Out of lives");

            ExecuteResponse {
                success: false,
                status: ExecuteStatus::Failure,
                message: "Game Over! You've run out of lives. Try starting a new session."
                    .to_string(),
                feedback: None,
                lives_remaining: 0,
                game_over: true,
            }
        }
    }

    /// Produces a hint for the given objective.
    ///
    /// Never mutates the session or consumes a life.
    pub async fn get_hint(
        &self,
        session_id: &str,
        level: u32,
        objective: u32,
        code: Option<Vec<String>>,
    ) -> HintResponse {
        if self.store.get(session_id).await.is_none() {
            return HintResponse {
                success: false,
                hint: "Invalid session ID. Please start a new session.".to_string(),
                level_context: LevelContext {
                    level,
                    objective,
                    description: "Unknown".to_string(),
                },
            };
        }

        let Some(entry) = self.catalog.lookup(level, objective) else {
            return HintResponse {
                success: false,
                hint: "Invalid level or objective.".to_string(),
                level_context: LevelContext {
                    level,
                    objective,
                    description: "Unknown".to_string(),
                },
            };
        };

        let hint = self.generate_hint(entry, code.as_deref()).await;

        HintResponse {
            success: true,
            hint,
            level_context: LevelContext {
                level,
                objective,
                description: entry.description.to_string(),
            },
        }
    }

    /// Asks the tutor for feedback, substituting the static fallback on any
    /// failure.
    async fn generate_feedback(&self, entry: &SolutionEntry, submitted: &[String]) -> String {
        let info = level_info(entry);
        match &self.tutor {
            Some(tutor) => match tutor.feedback(&info, submitted, entry.expected_actions).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(
                        error = %e,
                        level = entry.level,
                        objective = entry.objective,
                        "Feedback generation failed, using fallback"
                    );
                    fallback_feedback().to_string()
                }
            },
            None => fallback_feedback().to_string(),
        }
    }

    /// Asks the tutor for a hint, substituting the per-objective static
    /// fallback on any failure.
    async fn generate_hint(&self, entry: &SolutionEntry, code: Option<&[String]>) -> String {
        let info = level_info(entry);
        match &self.tutor {
            Some(tutor) => match tutor.hint(&info, code).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(
                        error = %e,
                        level = entry.level,
                        objective = entry.objective,
                        "Hint generation failed, using fallback"
                    );
                    fallback_hint(entry.level, entry.objective).to_string()
                }
            },
            None => fallback_hint(entry.level, entry.objective).to_string(),
        }
    }
}

/// Builds the tutor's level context from a catalog entry.
fn level_info(entry: &SolutionEntry) -> LevelInfo<'static> {
    LevelInfo {
        level: entry.level,
        objective: entry.objective,
        description: entry.description,
        available_actions: available_actions(),
    }
}

// ============================================================================
// Tests
// ============================================================================
