//! Workspace umbrella crate for newsrec.
//!
//! Re-exports the embedding client (`semantic`), the ranking engine
//! (`recommend`) and the text helpers (`canonical`) so callers need a single
//! dependency, and adds the pieces that only make sense at the application
//! edge: the YAML config loader and catalog/history files.
//!
//! ```no_run
//! use newsrec::{build_recommender, NewsrecConfig, Session};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let mut cfg = NewsrecConfig::from_file("newsrec.yaml")?;
//! cfg.apply_env();
//!
//! let recommender = build_recommender(&cfg)?;
//! let catalog = newsrec::read_documents("catalog.json".as_ref())?;
//! let mut session = Session::new(std::sync::Arc::new(recommender));
//! let hits = session.recommend("mental health", &catalog, 3).await?;
//! # let _ = hits;
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;

pub use canonical::{
    collapse_whitespace, filter_by_published_date, normalize_date, normalize_person_name,
    parse_article, parse_articles, parse_date, remove_image_descriptions, Article,
    CanonicalError, DateRange,
};
pub use recommend::{
    cosine_distance, set_recommend_metrics, Document, DocumentId, History, RankedDocument,
    RecommendConfig, RecommendError, RecommendMetrics, Recommender, Session,
};
pub use semantic::{Embedder, EmbeddingBatch, SemanticClient, SemanticConfig, SemanticError};

pub use crate::catalog::{
    articles_to_documents, read_documents, read_history, write_documents, write_history,
    CatalogError,
};
pub use crate::config::{ConfigLoadError, NewsrecConfig};

/// Build a recommender backed by the embedding client `cfg.semantic` describes.
pub fn build_recommender(cfg: &NewsrecConfig) -> Result<Recommender<SemanticClient>, RecommendError> {
    let client = SemanticClient::from_config(&cfg.semantic)?;
    Recommender::new(client, cfg.recommend.clone())
}

/// Display line for one hit, e.g. `Recommended: Cats (distance: 0.1234)`.
pub fn format_hit(hit: &RankedDocument, cfg: &RecommendConfig) -> String {
    format!(
        "Recommended: {} (distance: {:.4})",
        hit.document.display_title(cfg),
        hit.distance
    )
}
