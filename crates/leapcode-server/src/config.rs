//! Configuration for the Leapcode backend.
//!
//! Loaded from `leapcode.json` in the working directory (or an explicit
//! path). A missing file yields the defaults; a present-but-invalid file is
//! an error.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ServerError};

/// The default config file name.
const CONFIG_FILE_NAME: &str = "leapcode.json";

/// Default HTTP port.
const fn default_port() -> u16 {
    8000
}

/// Default tutor model.
fn default_model() -> String {
    "claude-3-haiku-20240307".to_string()
}

/// Default token budget for feedback responses.
const fn default_feedback_tokens() -> u32 {
    200
}

/// Default token budget for hint responses.
const fn default_hint_tokens() -> u32 {
    150
}

/// Main configuration for the backend process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Port the HTTP server binds to.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Model used for tutor feedback and hints.
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum tokens the tutor may spend on one feedback response.
    #[serde(default = "default_feedback_tokens")]
    pub max_feedback_tokens: u32,

    /// Maximum tokens the tutor may spend on one hint response.
    #[serde(default = "default_hint_tokens")]
    pub max_hint_tokens: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            model: default_model(),
            max_feedback_tokens: default_feedback_tokens(),
            max_hint_tokens: default_hint_tokens(),
        }
    }
}

impl Config {
    /// Loads configuration from `leapcode.json` in the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but contains invalid JSON or
    /// invalid values.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            ServerError::config_parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_dir(&current_dir)
    }

    /// Loads configuration from `leapcode.json` in the given directory.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load_from_file(&dir.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from a specific file path.
    ///
    /// A missing file yields validated defaults.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::ConfigParse` for unreadable or malformed
    /// files and `ServerError::ConfigValidation` for invalid values.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(ServerError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ServerError::config_parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::ConfigValidation` if any check fails.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(ServerError::config_validation(
                "port must not be 0",
                "Set port to the port the server should listen on in your leapcode.json",
            ));
        }

        if self.model.trim().is_empty() {
            return Err(ServerError::config_validation(
                "model must not be empty",
                "Provide a model name in your leapcode.json (for example claude-3-haiku-20240307)",
            ));
        }

        if self.max_feedback_tokens == 0 {
            return Err(ServerError::config_validation(
                "maxFeedbackTokens must be greater than 0",
                "Set maxFeedbackTokens to at least 1 in your leapcode.json",
            ));
        }

        if self.max_hint_tokens == 0 {
            return Err(ServerError::config_validation(
                "maxHintTokens must be greater than 0",
                "Set maxHintTokens to at least 1 in your leapcode.json",
            ));
        }

        Ok(())
    }
}
