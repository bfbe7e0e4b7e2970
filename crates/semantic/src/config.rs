use serde::{Deserialize, Serialize};

use crate::SemanticError;

/// Default endpoint used when `api_provider` is `"openai"` and no URL is set.
pub const OPENAI_EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";

/// Runtime configuration describing which embedding backend to call and how to
/// post-process vectors.
///
/// # Example
/// ```
/// use semantic::SemanticConfig;
///
/// let cfg = SemanticConfig {
///     mode: "api".into(),
///     api_provider: Some("openai".into()),
///     api_key: Some("sk-test".into()),
///     ..Default::default()
/// };
///
/// assert!(cfg.validate().is_ok());
/// assert_eq!(cfg.authorization_header().as_deref(), Some("Bearer sk-test"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SemanticConfig {
    /// Backend selector: `"api"` (remote HTTP) or `"stub"` (deterministic, offline).
    pub mode: String,
    /// Model identifier sent with every API request.
    pub model_name: String,
    /// Embedding endpoint. Falls back to [`OPENAI_EMBEDDINGS_URL`] for the
    /// `openai` provider.
    pub api_url: Option<String>,
    /// Bare API key; turned into `Bearer <key>` unless
    /// [`api_auth_header`](Self::api_auth_header) is set.
    pub api_key: Option<String>,
    /// Full `Authorization` header value, takes precedence over `api_key`.
    pub api_auth_header: Option<String>,
    /// Remote provider hint: `"openai"` (default), `"hf"`, or `"custom"`.
    pub api_provider: Option<String>,
    /// Overall HTTP timeout in seconds.
    pub api_timeout_secs: Option<u64>,
    /// L2-normalize vectors after they come back.
    pub normalize: bool,
    /// Dimensionality of stub vectors.
    pub stub_dim: usize,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            mode: "api".into(),
            model_name: "text-embedding-3-small".into(),
            api_url: None,
            api_key: None,
            api_auth_header: None,
            api_provider: Some("openai".into()),
            api_timeout_secs: Some(30),
            normalize: false,
            stub_dim: 384,
        }
    }
}

impl SemanticConfig {
    /// Offline configuration backed by the deterministic stub embedder.
    pub fn stub() -> Self {
        Self {
            mode: "stub".into(),
            ..Self::default()
        }
    }

    /// Provider name, lowercased, defaulting to `"custom"` when unset.
    pub fn provider_name(&self) -> String {
        self.api_provider
            .as_deref()
            .unwrap_or("custom")
            .to_ascii_lowercase()
    }

    /// Endpoint to POST to, if one can be determined.
    pub fn endpoint(&self) -> Option<&str> {
        match self.api_url.as_deref() {
            Some(url) => Some(url),
            None if self.provider_name() == "openai" => Some(OPENAI_EMBEDDINGS_URL),
            None => None,
        }
    }

    /// Value for the `Authorization` header, if any credentials are configured.
    pub fn authorization_header(&self) -> Option<String> {
        if let Some(header) = self.api_auth_header.as_deref() {
            return Some(header.to_string());
        }
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .map(|key| format!("Bearer {}", key.trim()))
    }

    /// Validate the configuration before any request is made.
    pub fn validate(&self) -> Result<(), SemanticError> {
        match self.mode.as_str() {
            "stub" => {
                if self.stub_dim == 0 {
                    return Err(SemanticError::InvalidConfig(
                        "stub_dim must be greater than zero".into(),
                    ));
                }
                Ok(())
            }
            "api" => {
                if self.endpoint().is_none() {
                    return Err(SemanticError::InvalidConfig(
                        "api_url is required for api mode".into(),
                    ));
                }
                if self.model_name.trim().is_empty() {
                    return Err(SemanticError::InvalidConfig(
                        "model_name must not be empty".into(),
                    ));
                }
                if self.api_timeout_secs == Some(0) {
                    return Err(SemanticError::InvalidConfig(
                        "api_timeout_secs must be greater than zero".into(),
                    ));
                }
                Ok(())
            }
            other => Err(SemanticError::InvalidConfig(format!(
                "unknown mode '{other}', expected 'api' or 'stub'"
            ))),
        }
    }
}
