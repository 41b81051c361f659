//! Anthropic Messages API client.
//!
//! Calls the Claude REST API directly; configuration comes from the
//! `ANTHROPIC_API_KEY` environment variable. The client is text-only: the
//! game never sends attachments and only ever reads the first text block
//! of a response.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{prompt, LevelInfo, Tutor, TutorError};

/// Default model for feedback and hint generation.
const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";

/// Messages API endpoint.
const BASE_URL: &str = "https://api.anthropic.com/v1/messages";

/// API version header value.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Default token budget for feedback responses.
const DEFAULT_FEEDBACK_MAX_TOKENS: u32 = 200;

/// Default token budget for hint responses.
const DEFAULT_HINT_MAX_TOKENS: u32 = 150;

/// [`Tutor`] implementation backed by the Claude HTTP API.
#[derive(Debug, Clone)]
pub struct ClaudeTutor {
    client: Client,
    api_key: String,
    model: String,
    feedback_max_tokens: u32,
    hint_max_tokens: u32,
}

impl ClaudeTutor {
    /// Creates a new tutor with the provided API key and the default model.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            feedback_max_tokens: DEFAULT_FEEDBACK_MAX_TOKENS,
            hint_max_tokens: DEFAULT_HINT_MAX_TOKENS,
        }
    }

    /// Builds a tutor from the `ANTHROPIC_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`TutorError::Unconfigured`] when the variable is unset or
    /// empty; callers should fall back to static text in that case.
    pub fn try_from_env() -> Result<Self, TutorError> {
        match std::env::var("ANTHROPIC_API_KEY") {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key)),
            _ => Err(TutorError::Unconfigured(
                "ANTHROPIC_API_KEY is not set".to_string(),
            )),
        }
    }

    /// Overrides the model after construction.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the token budgets for feedback and hint responses.
    #[must_use]
    pub const fn with_max_tokens(mut self, feedback: u32, hint: u32) -> Self {
        self.feedback_max_tokens = feedback;
        self.hint_max_tokens = hint;
        self
    }

    /// Sends a single-turn completion request and extracts the text reply.
    async fn complete(&self, prompt: String, max_tokens: u32) -> Result<String, TutorError> {
        tracing::debug!(model = %self.model, max_tokens, "Requesting tutor completion");

        let request = CreateMessageRequest {
            model: self.model.clone(),
            max_tokens,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(BASE_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(TutorError::Api {
                status: status.as_u16(),
                message: extract_api_error(&body),
            });
        }

        let parsed: CreateMessageResponse = response.json().await?;
        parsed
            .content
            .into_iter()
            .find_map(|block| match block {
                ContentBlock::Text { text } => Some(text.trim().to_string()),
            })
            .filter(|text| !text.is_empty())
            .ok_or(TutorError::EmptyResponse)
    }
}

#[async_trait]
impl Tutor for ClaudeTutor {
    async fn feedback(
        &self,
        info: &LevelInfo<'_>,
        submitted: &[String],
        expected: &[&str],
    ) -> Result<String, TutorError> {
        let prompt = prompt::feedback_prompt(info, submitted, expected);
        self.complete(prompt, self.feedback_max_tokens).await
    }

    async fn hint(
        &self,
        info: &LevelInfo<'_>,
        partial_code: Option<&[String]>,
    ) -> Result<String, TutorError> {
        let prompt = prompt::hint_prompt(info, partial_code);
        self.complete(prompt, self.hint_max_tokens).await
    }
}

#[derive(Debug, Serialize)]
struct CreateMessageRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct CreateMessageResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text {
        /// The generated text.
        text: String,
    },
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Pulls the API error message out of an error body, falling back to the
/// raw body when it is not the documented JSON shape.
fn extract_api_error(body: &str) -> String {
    serde_json::from_str::<ApiErrorResponse>(body)
        .map_or_else(|_| body.to_string(), |wrapper| wrapper.error.message)
}
