//! Leapcode Tutor
//!
//! The external feedback/hint generator for the Leapcode game: an async
//! capability interface, an Anthropic-backed implementation, and the
//! deterministic fallback text used whenever the model is unreachable.
//!
//! Callers are expected to treat every [`TutorError`] as recoverable and
//! substitute [`fallback_feedback`]/[`fallback_hint`] text; a generation
//! failure must never surface to a player.

mod claude;
mod fallback;
mod prompt;

pub use claude::ClaudeTutor;
pub use fallback::{fallback_feedback, fallback_hint};

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while generating tutor text.
#[derive(Debug, Error)]
pub enum TutorError {
    /// No API key was available at construction time.
    #[error("tutor is not configured: {0}")]
    Unconfigured(String),

    /// The HTTP request to the model could not be completed.
    #[error("tutor request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The model API answered with a non-success status.
    #[error("tutor API error (status {status}): {message}")]
    Api {
        /// HTTP status code returned by the API.
        status: u16,
        /// Error message extracted from the response body.
        message: String,
    },

    /// The response carried no usable text.
    #[error("tutor returned an empty response")]
    EmptyResponse,
}

/// Context describing the level objective a request is about.
#[derive(Debug, Clone, Copy)]
pub struct LevelInfo<'a> {
    /// Level number.
    pub level: u32,
    /// Objective number within the level.
    pub objective: u32,
    /// Human-readable objective description.
    pub description: &'a str,
    /// Action signatures the player may use.
    pub available_actions: &'a [&'a str],
}

/// Capability interface for the feedback/hint generator.
#[async_trait]
pub trait Tutor: Send + Sync {
    /// Generates encouraging feedback for an incorrect submission.
    async fn feedback(
        &self,
        info: &LevelInfo<'_>,
        submitted: &[String],
        expected: &[&str],
    ) -> Result<String, TutorError>;

    /// Generates a hint for the current objective, optionally taking the
    /// player's partial code into account.
    async fn hint(
        &self,
        info: &LevelInfo<'_>,
        partial_code: Option<&[String]>,
    ) -> Result<String, TutorError>;
}
