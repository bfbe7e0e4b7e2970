use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use semantic::{Embedder, SemanticError};
use tracing::{debug, info};

use crate::distance::rank_documents;
use crate::metrics::metrics_recorder;
use crate::types::{Document, History, RankedDocument, RecommendConfig, RecommendError};

#[cfg(test)]
mod tests;

/// Ranks catalog documents by semantic closeness to a query.
///
/// Holds no per-user state: the history to exclude is passed into every call
/// and is never modified here. One `Recommender` can be shared (e.g. behind an
/// `Arc`) by any number of sessions.
pub struct Recommender<E> {
    embedder: E,
    cfg: RecommendConfig,
}

impl<E: Embedder> Recommender<E> {
    pub fn new(embedder: E, cfg: RecommendConfig) -> Result<Self, RecommendError> {
        cfg.validate()?;
        Ok(Self { embedder, cfg })
    }

    pub fn config(&self) -> &RecommendConfig {
        &self.cfg
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    /// Return up to `n` documents not in `history`, closest to `query` first.
    ///
    /// - `n == 0` returns an empty list without calling the embedder.
    /// - When every document is in `history` the result is empty; that is a
    ///   normal outcome, not an error.
    /// - Fewer than `n` eligible documents returns all of them.
    /// - Any embedding failure fails the whole call. No partial ranking.
    pub async fn recommend(
        &self,
        query: &str,
        documents: &[Document],
        history: &History,
        n: usize,
    ) -> Result<Vec<RankedDocument>, RecommendError> {
        if self.cfg.reject_duplicate_ids {
            ensure_unique_ids(documents)?;
        }
        if n == 0 {
            return Ok(Vec::new());
        }

        let start = Instant::now();
        let eligible: Vec<Document> = documents
            .iter()
            .filter(|doc| !history.contains(&doc.id))
            .cloned()
            .collect();

        debug!(
            total = documents.len(),
            excluded = documents.len() - eligible.len(),
            eligible = eligible.len(),
            "filtered catalog against history"
        );

        if eligible.is_empty() {
            info!("nothing new to recommend");
            record_metrics(0, 0, start);
            return Ok(Vec::new());
        }

        let texts: Vec<String> = eligible
            .iter()
            .map(|doc| doc.text_representation(&self.cfg))
            .collect();
        let query_text = vec![query.to_string()];

        let (doc_batch, query_batch) = tokio::try_join!(
            self.embedder.embed(&texts),
            self.embedder.embed(&query_text),
        )?;

        if doc_batch.len() != eligible.len() {
            return Err(SemanticError::CountMismatch {
                expected: eligible.len(),
                got: doc_batch.len(),
            }
            .into());
        }
        let query_vector = match query_batch.vectors.as_slice() {
            [single] => single,
            other => {
                return Err(SemanticError::CountMismatch {
                    expected: 1,
                    got: other.len(),
                }
                .into())
            }
        };
        ensure_same_dimension(query_vector.len(), &doc_batch.vectors)?;

        let candidates = eligible.len();
        let ranked = rank_documents(query_vector, eligible, &doc_batch.vectors, n);

        info!(
            candidates,
            returned = ranked.len(),
            model = %doc_batch.model_name,
            "ranked recommendations"
        );
        record_metrics(candidates, ranked.len(), start);

        Ok(ranked)
    }
}

fn ensure_unique_ids(documents: &[Document]) -> Result<(), RecommendError> {
    let mut seen = HashSet::with_capacity(documents.len());
    for doc in documents {
        if !seen.insert(&doc.id) {
            return Err(RecommendError::DuplicateId(doc.id.clone()));
        }
    }
    Ok(())
}

/// Query and documents must live in the same embedding space.
fn ensure_same_dimension(expected: usize, vectors: &[Vec<f32>]) -> Result<(), SemanticError> {
    match vectors
        .iter()
        .enumerate()
        .find(|(_, vector)| vector.len() != expected)
    {
        Some((index, vector)) => Err(SemanticError::DimensionMismatch {
            index,
            expected,
            got: vector.len(),
        }),
        None => Ok(()),
    }
}

fn record_metrics(candidates: usize, returned: usize, start: Instant) {
    if let Some(recorder) = metrics_recorder() {
        recorder.record_recommendation(candidates, returned, start.elapsed());
    }
}

/// One user's view of the recommender: a shared [`Recommender`] plus a
/// private [`History`].
///
/// Every id returned by [`Session::recommend`] is appended to the history, so
/// a session never sees the same document twice. Sessions never share a
/// history with each other.
pub struct Session<E> {
    recommender: Arc<Recommender<E>>,
    history: History,
}

impl<E: Embedder> Session<E> {
    pub fn new(recommender: Arc<Recommender<E>>) -> Self {
        Self::with_history(recommender, History::new())
    }

    /// Resume a session from a previously saved history.
    pub fn with_history(recommender: Arc<Recommender<E>>, history: History) -> Self {
        Self {
            recommender,
            history,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn into_history(self) -> History {
        self.history
    }

    /// Recommend, then record the returned ids. History is left untouched when
    /// the call fails.
    pub async fn recommend(
        &mut self,
        query: &str,
        documents: &[Document],
        n: usize,
    ) -> Result<Vec<RankedDocument>, RecommendError> {
        let ranked = self
            .recommender
            .recommend(query, documents, &self.history, n)
            .await?;
        self.history
            .extend(ranked.iter().map(|hit| hit.document.id.clone()));
        Ok(ranked)
    }
}
