//! Cosine distance and linear-scan ranking.

use crate::types::{Document, RankedDocument};

/// Distance reported for degenerate pairs (zero norm, mismatched length).
pub const MAX_DISTANCE: f32 = 2.0;

/// `1 - cos(a, b)`, clamped to `[0, 2]`.
///
/// Returns [`MAX_DISTANCE`] instead of NaN when either vector has zero norm,
/// when the lengths differ, or when the inputs contain non-finite values.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return MAX_DISTANCE;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return MAX_DISTANCE;
    }

    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    if !similarity.is_finite() {
        return MAX_DISTANCE;
    }

    (1.0 - similarity).clamp(0.0, f64::from(MAX_DISTANCE)) as f32
}

/// Pair each document with its distance to `query`, sort ascending and keep
/// the first `n`.
///
/// `vectors[i]` belongs to `documents[i]`. The sort is stable, so equal
/// distances keep their input order.
pub fn rank_documents(
    query: &[f32],
    documents: Vec<Document>,
    vectors: &[Vec<f32>],
    n: usize,
) -> Vec<RankedDocument> {
    debug_assert_eq!(documents.len(), vectors.len());

    let mut ranked: Vec<RankedDocument> = documents
        .into_iter()
        .zip(vectors)
        .map(|(document, vector)| RankedDocument {
            distance: cosine_distance(query, vector),
            document,
        })
        .collect();

    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    ranked.truncate(n);
    ranked
}
