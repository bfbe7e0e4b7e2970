use async_trait::async_trait;
use fxhash::hash64;

use crate::vector::l2_normalize_in_place;
use crate::{Embedder, EmbeddingBatch, SemanticConfig, SemanticError};

/// Deterministic, offline embedder.
///
/// Generates sinusoid values derived from a hash of the input text, so the
/// same text always maps to the same vector. Good enough to exercise the
/// ranking pipeline without network access; carries no semantic meaning.
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    model_name: String,
    dim: usize,
    normalize: bool,
}

impl StubEmbedder {
    pub fn new(dim: usize) -> Self {
        Self {
            model_name: "stub".into(),
            dim,
            normalize: false,
        }
    }

    pub fn from_config(cfg: &SemanticConfig) -> Self {
        Self {
            model_name: cfg.model_name.clone(),
            dim: cfg.stub_dim,
            normalize: cfg.normalize,
        }
    }

    /// Embed a single text without going through the async trait.
    pub fn embed_one(&self, text: &str) -> Vec<f32> {
        make_stub_vector(text, self.dim, self.normalize)
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<EmbeddingBatch, SemanticError> {
        let vectors: Vec<Vec<f32>> = texts.iter().map(|text| self.embed_one(text)).collect();
        Ok(EmbeddingBatch {
            model_name: self.model_name.clone(),
            embedding_dim: if vectors.is_empty() { 0 } else { self.dim },
            normalized: self.normalize,
            vectors,
        })
    }
}

pub(crate) fn make_stub_vector(text: &str, dim: usize, normalize: bool) -> Vec<f32> {
    let mut v = vec![0f32; dim];
    let h = hash64(text.as_bytes());
    for (idx, value) in v.iter_mut().enumerate() {
        *value = ((h >> (idx % 32)) as f32 * 0.0001).sin();
    }
    if normalize {
        l2_normalize_in_place(&mut v);
    }
    v
}
