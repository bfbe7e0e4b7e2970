//! YAML configuration for newsrec.
//!
//! One file configures both the embedding client and the recommender. Every
//! section is optional and falls back to its defaults.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "wellness-feed"
//!
//! semantic:
//!   mode: "api"
//!   api_provider: "openai"
//!   model_name: "text-embedding-3-small"
//!   api_timeout_secs: 30
//!
//! recommend:
//!   text_fields: ["title1", "title2", "title3"]
//!   field_separator: "\n"
//!   default_results: 3
//!   reject_duplicate_ids: true
//! ```
//!
//! Keys are never read from the file unless written there explicitly; use
//! [`NewsrecConfig::apply_env`] to pick one up from `OPENAI_API_KEY` or
//! `NEWSREC_API_KEY` (a `.env` file is loaded by the CLI before this runs).

use std::fs;
use std::path::Path;

use recommend::RecommendConfig;
use semantic::SemanticConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variables consulted for the embedding API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["OPENAI_API_KEY", "NEWSREC_API_KEY"];

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsrecConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    /// Embedding client configuration
    #[serde(default)]
    pub semantic: SemanticConfig,

    /// Ranking configuration
    #[serde(default)]
    pub recommend: RecommendConfig,
}

impl NewsrecConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: NewsrecConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.semantic
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("semantic: {e}")))?;
        self.recommend
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("recommend: {e}")))?;

        Ok(())
    }

    /// Fill the API key from the process environment when the file left
    /// credentials out.
    pub fn apply_env(&mut self) {
        self.apply_api_key_from(|name| std::env::var(name).ok());
    }

    /// Same as [`apply_env`](Self::apply_env) with an explicit lookup.
    ///
    /// Does nothing when `api_key` or `api_auth_header` is already set, so
    /// values written in the file always win.
    pub fn apply_api_key_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let has_key = self
            .semantic
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty());
        if has_key || self.semantic.api_auth_header.is_some() {
            return;
        }

        self.semantic.api_key = API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .find(|value| !value.trim().is_empty());
    }
}

impl Default for NewsrecConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            semantic: SemanticConfig::default(),
            recommend: RecommendConfig::default(),
        }
    }
}
