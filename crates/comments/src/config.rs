//! Comment panel configuration.
//!
//! Settings can be built programmatically, read from environment variables, or loaded
//! from a JSON file in the user's config directory.

use crate::ledger::DEFAULT_CURRENT_USER;
use crate::reveal::{RevealOptions, ScrollBehavior, ScrollBlock};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const USER_ENV: &str = "BUTTERPAPER_COMMENT_USER";
const REVEAL_ENV: &str = "BUTTERPAPER_COMMENT_REVEAL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for configuration key: {0}")]
    InvalidValue(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed configuration file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for the comment panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentConfig {
    /// Author label stamped on replies written or edited in this session
    #[serde(default = "default_user")]
    pub current_user: String,
    /// How annotation cards are scrolled into view
    #[serde(default)]
    pub reveal: RevealOptions,
}

fn default_user() -> String {
    DEFAULT_CURRENT_USER.to_owned()
}

impl Default for CommentConfig {
    fn default() -> Self {
        Self { current_user: default_user(), reveal: RevealOptions::default() }
    }
}

impl CommentConfig {
    pub fn with_current_user(mut self, current_user: impl Into<String>) -> Self {
        self.current_user = current_user.into();
        self
    }

    pub fn with_scroll_behavior(mut self, behavior: ScrollBehavior) -> Self {
        self.reveal.behavior = behavior;
        self
    }

    pub fn with_scroll_block(mut self, block: ScrollBlock) -> Self {
        self.reveal.block = block;
        self
    }

    /// Default location of the configuration file.
    ///
    /// - macOS: ~/Library/Application Support/butterpaper/comments.json
    /// - Linux: ~/.config/butterpaper/comments.json
    /// - Windows: %APPDATA%\butterpaper\comments.json
    pub fn default_config_path() -> PathBuf {
        match dirs::config_dir() {
            Some(dir) => dir.join("butterpaper").join("comments.json"),
            None => PathBuf::from("comments.json"),
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// - `BUTTERPAPER_COMMENT_USER`: author label for replies
    /// - `BUTTERPAPER_COMMENT_REVEAL`: `smooth` or `instant`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().merge_env()
    }

    /// Applies environment overrides on top of `self`.
    pub fn merge_env(mut self) -> Result<Self, ConfigError> {
        if let Ok(user) = std::env::var(USER_ENV) {
            if user.trim().is_empty() {
                return Err(ConfigError::InvalidValue(USER_ENV.to_owned()));
            }
            self.current_user = user;
        }

        if let Ok(value) = std::env::var(REVEAL_ENV) {
            self.reveal.behavior = match value.trim().to_ascii_lowercase().as_str() {
                "smooth" => ScrollBehavior::Smooth,
                "instant" => ScrollBehavior::Instant,
                _ => return Err(ConfigError::InvalidValue(REVEAL_ENV.to_owned())),
            };
        }

        Ok(self)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let bytes = fs::read(path.as_ref())?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Loads the file if it exists, defaults otherwise.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if !path.as_ref().exists() {
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(self)?;
        fs::write(path.as_ref(), bytes)?;
        Ok(())
    }
}
