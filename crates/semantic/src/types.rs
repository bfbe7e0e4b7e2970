use serde::{Deserialize, Serialize};

/// A batch of vectors returned by an [`Embedder`](crate::Embedder), one per
/// input, in input order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EmbeddingBatch {
    /// Model that produced the vectors.
    pub model_name: String,
    /// Shared dimensionality of every vector (0 for an empty batch).
    pub embedding_dim: usize,
    /// Whether the vectors were L2-normalized after retrieval.
    pub normalized: bool,
    pub vectors: Vec<Vec<f32>>,
}

impl EmbeddingBatch {
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Consume the batch, keeping only the vectors.
    pub fn into_vectors(self) -> Vec<Vec<f32>> {
        self.vectors
    }
}
