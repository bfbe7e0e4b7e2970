use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use semantic::{EmbeddingBatch, StubEmbedder};

use crate::distance::MAX_DISTANCE;
use crate::metrics::{set_recommend_metrics, RecommendMetrics};
use crate::types::DocumentId;

/// Embedder returning fixed vectors keyed by a substring of the input text.
/// Text matching no key gets the zero vector.
struct MockEmbedder {
    table: Vec<(&'static str, Vec<f32>)>,
    dim: usize,
    calls: AtomicUsize,
    batches: Mutex<Vec<Vec<String>>>,
}

impl MockEmbedder {
    fn new(table: Vec<(&'static str, Vec<f32>)>) -> Self {
        let dim = table.first().map(|(_, v)| v.len()).unwrap_or(2);
        Self {
            table,
            dim,
            calls: AtomicUsize::new(0),
            batches: Mutex::new(Vec::new()),
        }
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        self.table
            .iter()
            .find(|(key, _)| text.contains(key))
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| vec![0.0; self.dim])
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<EmbeddingBatch, SemanticError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.batches
            .lock()
            .expect("batches lock")
            .push(texts.to_vec());
        Ok(EmbeddingBatch {
            model_name: "mock".into(),
            embedding_dim: self.dim,
            normalized: false,
            vectors: texts.iter().map(|t| self.vector_for(t)).collect(),
        })
    }
}

struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _texts: &[String]) -> Result<EmbeddingBatch, SemanticError> {
        Err(SemanticError::Http("connection refused".into()))
    }
}

/// Drops the last vector of every batch.
struct LossyEmbedder;

#[async_trait]
impl Embedder for LossyEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<EmbeddingBatch, SemanticError> {
        let mut vectors: Vec<Vec<f32>> = texts.iter().map(|_| vec![1.0, 0.0]).collect();
        vectors.pop();
        Ok(EmbeddingBatch {
            model_name: "lossy".into(),
            embedding_dim: 2,
            normalized: false,
            vectors,
        })
    }
}

/// Well-formed document batches; the single-text (query) batch is malformed.
enum QueryShapeEmbedder {
    /// No vector for the query.
    Empty,
    /// Query vector is 3-dimensional, documents are 2-dimensional.
    Wider,
}

#[async_trait]
impl Embedder for QueryShapeEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<EmbeddingBatch, SemanticError> {
        let is_query = texts.len() == 1 && !texts[0].starts_with("Title1:");
        let vectors: Vec<Vec<f32>> = match (self, is_query) {
            (QueryShapeEmbedder::Empty, true) => Vec::new(),
            (QueryShapeEmbedder::Wider, true) => vec![vec![1.0, 0.0, 0.0]],
            (_, false) => texts.iter().map(|_| vec![1.0, 0.0]).collect(),
        };
        Ok(EmbeddingBatch {
            model_name: "query-shape".into(),
            embedding_dim: vectors.first().map_or(0, Vec::len),
            normalized: false,
            vectors,
        })
    }
}

fn animal_embedder() -> MockEmbedder {
    MockEmbedder::new(vec![
        ("kittens", vec![1.0, 1.0]),
        ("cats", vec![1.0, 0.0]),
        ("dogs", vec![0.0, 1.0]),
        ("fish", vec![-1.0, 0.0]),
    ])
}

fn doc(id: u64, title: &str) -> Document {
    Document::new(id).with_field("title1", title)
}

fn ids(ranked: &[RankedDocument]) -> Vec<DocumentId> {
    ranked.iter().map(|r| r.document.id.clone()).collect()
}

fn recommender<E: Embedder>(embedder: E) -> Recommender<E> {
    Recommender::new(embedder, RecommendConfig::default()).expect("default config")
}

#[tokio::test]
async fn history_is_excluded_and_order_is_by_distance() -> Result<(), RecommendError> {
    let rec = recommender(animal_embedder());
    let docs = vec![doc(1, "dogs"), doc(2, "cats"), doc(3, "kittens")];
    let history: History = vec![DocumentId::Number(2)].into();

    let ranked = rec.recommend("cats", &docs, &history, 2).await?;

    assert_eq!(ids(&ranked), vec![DocumentId::Number(3), DocumentId::Number(1)]);
    let expected_kittens = 1.0 - 1.0 / 2.0f32.sqrt();
    assert!((ranked[0].distance - expected_kittens).abs() < 1e-6);
    assert!((ranked[1].distance - 1.0).abs() < 1e-6);
    Ok(())
}

#[tokio::test]
async fn full_history_yields_empty_result_without_embedding() -> Result<(), RecommendError> {
    let rec = recommender(animal_embedder());
    let docs = vec![doc(1, "dogs"), doc(2, "cats")];
    let history: History = docs.iter().map(|d| d.id.clone()).collect();

    let ranked = rec.recommend("cats", &docs, &history, 3).await?;

    assert!(ranked.is_empty());
    assert_eq!(rec.embedder().calls(), 0);
    Ok(())
}

#[tokio::test]
async fn empty_catalog_is_not_an_error() -> Result<(), RecommendError> {
    let rec = recommender(animal_embedder());
    let ranked = rec.recommend("cats", &[], &History::new(), 3).await?;
    assert!(ranked.is_empty());
    Ok(())
}

#[tokio::test]
async fn zero_n_returns_nothing_without_embedding() -> Result<(), RecommendError> {
    let rec = recommender(animal_embedder());
    let docs = vec![doc(1, "dogs")];

    let ranked = rec.recommend("cats", &docs, &History::new(), 0).await?;

    assert!(ranked.is_empty());
    assert_eq!(rec.embedder().calls(), 0);
    Ok(())
}

#[tokio::test]
async fn n_larger_than_catalog_returns_all_eligible() -> Result<(), RecommendError> {
    let rec = recommender(animal_embedder());
    let docs = vec![doc(1, "fish"), doc(2, "dogs"), doc(3, "cats")];

    let ranked = rec.recommend("cats", &docs, &History::new(), 10).await?;

    assert_eq!(
        ids(&ranked),
        vec![
            DocumentId::Number(3),
            DocumentId::Number(2),
            DocumentId::Number(1)
        ]
    );
    Ok(())
}

#[tokio::test]
async fn distances_stay_in_range() -> Result<(), RecommendError> {
    let rec = recommender(animal_embedder());
    let docs = vec![
        doc(1, "fish"),
        doc(2, "dogs"),
        doc(3, "cats"),
        doc(4, "kittens"),
        doc(5, "rocks"),
    ];

    let ranked = rec.recommend("cats", &docs, &History::new(), 5).await?;

    assert_eq!(ranked.len(), 5);
    for hit in &ranked {
        assert!((0.0..=2.0).contains(&hit.distance), "{}", hit.distance);
    }
    Ok(())
}

#[tokio::test]
async fn zero_vector_document_ranks_last_with_max_distance() -> Result<(), RecommendError> {
    let rec = recommender(animal_embedder());
    let docs = vec![doc(1, "rocks"), doc(2, "fish")];

    let ranked = rec.recommend("cats", &docs, &History::new(), 2).await?;

    assert_eq!(ids(&ranked), vec![DocumentId::Number(1), DocumentId::Number(2)]);
    assert_eq!(ranked[0].distance, MAX_DISTANCE);
    assert_eq!(ranked[1].distance, MAX_DISTANCE);
    Ok(())
}

#[tokio::test]
async fn ties_keep_input_order() -> Result<(), RecommendError> {
    let rec = recommender(animal_embedder());
    let docs = vec![
        doc(30, "dogs"),
        doc(10, "cats"),
        doc(20, "dogs again"),
        doc(40, "dogs too"),
    ];

    let ranked = rec.recommend("cats", &docs, &History::new(), 4).await?;

    assert_eq!(
        ids(&ranked),
        vec![
            DocumentId::Number(10),
            DocumentId::Number(30),
            DocumentId::Number(20),
            DocumentId::Number(40)
        ]
    );
    Ok(())
}

#[tokio::test]
async fn repeated_calls_are_identical() -> Result<(), RecommendError> {
    let rec = recommender(StubEmbedder::new(32));
    let docs = vec![
        doc(1, "Walking for Mental Health"),
        doc(2, "Interest Rates Hold Steady"),
        doc(3, "A Guide to Daily Walks"),
    ];
    let history = History::new();

    let first = rec.recommend("walking", &docs, &history, 3).await?;
    let second = rec.recommend("walking", &docs, &history, 3).await?;

    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn one_batch_for_documents_and_one_for_query() -> Result<(), RecommendError> {
    let rec = recommender(animal_embedder());
    let docs = vec![
        doc(1, "dogs").with_field("title2", "loyal"),
        doc(2, "cats"),
    ];

    rec.recommend("cats", &docs, &History::new(), 1).await?;

    assert_eq!(rec.embedder().calls(), 2);
    let mut batches = rec.embedder().batches.lock().expect("batches lock").clone();
    batches.sort_by_key(|b| std::cmp::Reverse(b.len()));
    assert_eq!(
        batches[0],
        vec![
            "Title1: dogs\nTitle2: loyal\nTitle3: ".to_string(),
            "Title1: cats\nTitle2: \nTitle3: ".to_string(),
        ]
    );
    assert_eq!(batches[1], vec!["cats".to_string()]);
    Ok(())
}

#[tokio::test]
async fn embedding_failure_is_surfaced() {
    let rec = recommender(FailingEmbedder);
    let docs = vec![doc(1, "dogs")];

    let err = rec
        .recommend("cats", &docs, &History::new(), 1)
        .await
        .expect_err("embedding should fail");

    assert!(matches!(
        err,
        RecommendError::Embedding(SemanticError::Http(_))
    ));
}

#[tokio::test]
async fn short_batch_is_rejected() {
    let rec = recommender(LossyEmbedder);
    let docs = vec![doc(1, "dogs"), doc(2, "cats")];

    let err = rec
        .recommend("cats", &docs, &History::new(), 2)
        .await
        .expect_err("count mismatch");

    match err {
        RecommendError::Embedding(SemanticError::CountMismatch { expected, got }) => {
            assert_eq!(expected, 2);
            assert_eq!(got, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn empty_query_batch_is_rejected() {
    let rec = recommender(QueryShapeEmbedder::Empty);
    let docs = vec![doc(1, "dogs"), doc(2, "cats")];

    let err = rec
        .recommend("cats", &docs, &History::new(), 2)
        .await
        .expect_err("no query vector");

    assert!(matches!(
        err,
        RecommendError::Embedding(SemanticError::CountMismatch {
            expected: 1,
            got: 0
        })
    ));
}

#[tokio::test]
async fn query_and_document_dimensions_must_agree() {
    let rec = recommender(QueryShapeEmbedder::Wider);
    let docs = vec![doc(1, "dogs"), doc(2, "cats")];

    let err = rec
        .recommend("cats", &docs, &History::new(), 2)
        .await
        .expect_err("dimension mismatch");

    assert!(matches!(
        err,
        RecommendError::Embedding(SemanticError::DimensionMismatch {
            index: 0,
            expected: 3,
            got: 2
        })
    ));
}

#[tokio::test]
async fn dimension_mismatch_leaves_session_history_untouched() {
    let rec = Arc::new(recommender(QueryShapeEmbedder::Wider));
    let mut session = Session::new(rec);

    let result = session.recommend("cats", &[doc(1, "dogs")], 1).await;

    assert!(result.is_err());
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn duplicate_ids_rejected_by_default() {
    let rec = recommender(animal_embedder());
    let docs = vec![doc(1, "dogs"), doc(1, "cats")];

    let err = rec
        .recommend("cats", &docs, &History::new(), 2)
        .await
        .expect_err("duplicate id");

    assert!(matches!(err, RecommendError::DuplicateId(DocumentId::Number(1))));
    assert_eq!(rec.embedder().calls(), 0);
}

#[tokio::test]
async fn duplicate_ids_ranked_when_allowed() -> Result<(), RecommendError> {
    let cfg = RecommendConfig {
        reject_duplicate_ids: false,
        ..RecommendConfig::default()
    };
    let rec = Recommender::new(animal_embedder(), cfg)?;
    let docs = vec![doc(1, "dogs"), doc(1, "cats"), doc(2, "fish")];

    let ranked = rec.recommend("cats", &docs, &History::new(), 3).await?;
    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked[0].document.field_text("title1"), "cats");

    // A history hit removes every entry sharing the id.
    let history: History = vec![DocumentId::Number(1)].into();
    let ranked = rec.recommend("cats", &docs, &history, 3).await?;
    assert_eq!(ids(&ranked), vec![DocumentId::Number(2)]);
    Ok(())
}

#[test]
fn invalid_config_rejected_at_construction() {
    let cfg = RecommendConfig {
        text_fields: Vec::new(),
        ..RecommendConfig::default()
    };
    assert!(matches!(
        Recommender::new(animal_embedder(), cfg),
        Err(RecommendError::InvalidConfig(_))
    ));
}

#[tokio::test]
async fn session_records_returned_ids() -> Result<(), RecommendError> {
    let rec = Arc::new(recommender(animal_embedder()));
    let docs = vec![doc(1, "dogs"), doc(2, "cats"), doc(3, "kittens")];
    let mut session = Session::new(Arc::clone(&rec));

    let first = session.recommend("cats", &docs, 2).await?;
    assert_eq!(ids(&first), vec![DocumentId::Number(2), DocumentId::Number(3)]);

    let second = session.recommend("cats", &docs, 2).await?;
    assert_eq!(ids(&second), vec![DocumentId::Number(1)]);

    let third = session.recommend("cats", &docs, 2).await?;
    assert!(third.is_empty());

    let seen: Vec<_> = session.history().iter().cloned().collect();
    assert_eq!(
        seen,
        vec![
            DocumentId::Number(2),
            DocumentId::Number(3),
            DocumentId::Number(1)
        ]
    );
    Ok(())
}

#[tokio::test]
async fn sessions_do_not_share_history() -> Result<(), RecommendError> {
    let rec = Arc::new(recommender(animal_embedder()));
    let docs = vec![doc(1, "dogs"), doc(2, "cats")];
    let mut alice = Session::new(Arc::clone(&rec));
    let mut bob = Session::new(Arc::clone(&rec));

    alice.recommend("cats", &docs, 1).await?;
    let for_bob = bob.recommend("cats", &docs, 1).await?;

    assert_eq!(ids(&for_bob), vec![DocumentId::Number(2)]);
    assert_eq!(alice.history().len(), 1);
    assert_eq!(bob.history().len(), 1);
    Ok(())
}

#[tokio::test]
async fn failed_call_leaves_session_history_untouched() {
    let rec = Arc::new(recommender(FailingEmbedder));
    let prior: History = vec![DocumentId::Number(9)].into();
    let mut session = Session::with_history(rec, prior.clone());

    let result = session.recommend("cats", &[doc(1, "dogs")], 1).await;

    assert!(result.is_err());
    assert_eq!(session.into_history(), prior);
}

struct RecordingMetrics {
    events: Mutex<Vec<(usize, usize)>>,
}

impl RecordingMetrics {
    fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    fn snapshot(&self) -> Vec<(usize, usize)> {
        self.events.lock().expect("metrics lock").clone()
    }
}

impl RecommendMetrics for RecordingMetrics {
    fn record_recommendation(&self, candidates: usize, returned: usize, _latency: Duration) {
        self.events
            .lock()
            .expect("metrics lock")
            .push((candidates, returned));
    }
}

#[tokio::test]
async fn metrics_recorder_observes_recommendations() -> Result<(), RecommendError> {
    let metrics = Arc::new(RecordingMetrics::new());
    set_recommend_metrics(Some(metrics.clone()));

    let rec = recommender(animal_embedder());
    let docs = vec![
        doc(101, "dogs"),
        doc(102, "cats"),
        doc(103, "fish"),
        doc(104, "kittens"),
        doc(105, "rocks"),
        doc(106, "dogs again"),
        doc(107, "cats again"),
    ];
    let history: History = vec![DocumentId::Number(101)].into();
    rec.recommend("cats", &docs, &history, 4).await?;

    set_recommend_metrics(None);

    // Other tests may run concurrently against the same global hook.
    assert!(metrics.snapshot().contains(&(6, 4)));
    Ok(())
}
