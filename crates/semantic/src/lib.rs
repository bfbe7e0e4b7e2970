//! Embedding layer for newsrec.
//!
//! This crate turns text into dense vectors by calling out to an embedding
//! service. Everything downstream (ranking, history filtering) only sees the
//! [`Embedder`] trait, so tests and offline runs can swap the HTTP client for
//! something deterministic.
//!
//! We support two modes:
//!
//! - **API mode** - POST the whole batch to an OpenAI-compatible, Hugging Face
//!   or custom endpoint.
//! - **Stub mode** - Hash-derived vectors. Same text, same vector, no network.
//!
//! ## The batch contract
//!
//! One input, one vector, same order, same dimensionality. The API client
//! checks the count and the dimensions of every response (and re-orders
//! OpenAI `data` entries by their `index`) before handing vectors back. A
//! response that breaks the contract is an error, never a partial batch.
//!
//! There are no retries here. A failed request is reported once and the
//! caller decides what to do about it.
//!
//! ## Quick example
//!
//! ```no_run
//! use semantic::{Embedder, SemanticClient, SemanticConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), semantic::SemanticError> {
//!     let cfg = SemanticConfig {
//!         api_key: std::env::var("OPENAI_API_KEY").ok(),
//!         ..Default::default()
//!     };
//!     let client = SemanticClient::from_config(&cfg)?;
//!     let batch = client
//!         .embed(&["Walking for Mental Health".to_string()])
//!         .await?;
//!     println!("dim = {}", batch.embedding_dim);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod types;

mod api;
mod stub;
mod vector;

use std::sync::Arc;

use async_trait::async_trait;

pub use crate::api::ApiEmbedder;
pub use crate::config::{SemanticConfig, OPENAI_EMBEDDINGS_URL};
pub use crate::error::SemanticError;
pub use crate::stub::StubEmbedder;
pub use crate::types::EmbeddingBatch;

/// Anything that can embed a batch of texts.
///
/// Implementations must return exactly one vector per input, in input order,
/// all of the same dimensionality.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<EmbeddingBatch, SemanticError>;
}

#[async_trait]
impl<E: Embedder + ?Sized> Embedder for Arc<E> {
    async fn embed(&self, texts: &[String]) -> Result<EmbeddingBatch, SemanticError> {
        (**self).embed(texts).await
    }
}

/// Embedder selected from a [`SemanticConfig`] at runtime.
#[derive(Debug, Clone)]
pub enum SemanticClient {
    Api(ApiEmbedder),
    Stub(StubEmbedder),
}

impl SemanticClient {
    /// Validate `cfg` and build the backend named by `cfg.mode`.
    pub fn from_config(cfg: &SemanticConfig) -> Result<Self, SemanticError> {
        cfg.validate()?;
        match cfg.mode.as_str() {
            "stub" => Ok(SemanticClient::Stub(StubEmbedder::from_config(cfg))),
            "api" => Ok(SemanticClient::Api(ApiEmbedder::new(cfg.clone())?)),
            other => Err(SemanticError::InvalidConfig(format!(
                "unknown mode '{other}'"
            ))),
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            SemanticClient::Api(_) => "api",
            SemanticClient::Stub(_) => "stub",
        }
    }
}

#[async_trait]
impl Embedder for SemanticClient {
    async fn embed(&self, texts: &[String]) -> Result<EmbeddingBatch, SemanticError> {
        match self {
            SemanticClient::Api(inner) => inner.embed(texts).await,
            SemanticClient::Stub(inner) => inner.embed(texts).await,
        }
    }
}
