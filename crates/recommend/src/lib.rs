//! # Recommender (`recommend`)
//!
//! ## Purpose
//!
//! Given a free-text query and a catalog of short documents, `recommend`
//! embeds the query and every document the user has not seen yet, ranks
//! the candidates by cosine distance to the query and returns the closest
//! `n`. It is a full linear scan with no index structure. That is the right
//! tool for catalogs of a few hundred headlines.
//!
//! ## Core Types
//!
//! - [`Document`]: an id ([`DocumentId`], integer or string) plus free-form
//!   fields. The configured text fields are joined into one string per document
//!   before embedding.
//! - [`History`]: ids the user has already been shown. Insertion-ordered,
//!   append-only, owned by the caller.
//! - [`RankedDocument`]: a document and its cosine distance in `[0, 2]`.
//! - [`RecommendConfig`]: text policy and defaults.
//! - [`Recommender`]: the stateless ranking engine. Never mutates history.
//! - [`Session`]: a recommender plus one user's history; records every id it
//!   returns so repeats never come back.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use recommend::{Document, RecommendConfig, Recommender, Session};
//! use semantic::{SemanticClient, SemanticConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SemanticClient::from_config(&SemanticConfig::stub())?;
//! let recommender = Arc::new(Recommender::new(client, RecommendConfig::default())?);
//!
//! let catalog = vec![
//!     Document::new(1u64).with_field("title1", "Walking for Mental Health"),
//!     Document::new(2u64).with_field("title1", "Markets Rally on Rate Cut"),
//! ];
//!
//! let mut session = Session::new(recommender);
//! for hit in session.recommend("exercise and wellbeing", &catalog, 1).await? {
//!     println!("{} ({:.4})", hit.document.id, hit.distance);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Observability
//!
//! Calls log through `tracing`. Install a [`RecommendMetrics`] implementation
//! with [`set_recommend_metrics`] to receive per-call latency and result sizes.

pub mod distance;
pub mod engine;
pub mod metrics;
pub mod types;

pub use crate::distance::{cosine_distance, rank_documents, MAX_DISTANCE};
pub use crate::engine::{Recommender, Session};
pub use crate::metrics::{set_recommend_metrics, RecommendMetrics};
pub use crate::types::{
    Document, DocumentId, History, RankedDocument, RecommendConfig, RecommendError,
};
