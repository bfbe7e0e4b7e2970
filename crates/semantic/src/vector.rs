//! Post-processing applied to every batch that leaves this crate.
//!
//! The ranking layer relies on "one vector per input, in input order, all of
//! the same length". [`check_batch`] is where that contract is enforced.

use crate::SemanticError;

/// In-place L2 normalization. Zero vectors are left untouched.
pub(crate) fn l2_normalize_in_place(v: &mut [f32]) {
    let norm_sq: f32 = v.iter().map(|x| x * x).sum();
    if norm_sq > 0.0 {
        let inv_norm = norm_sq.sqrt().recip();
        for x in v.iter_mut() {
            *x *= inv_norm;
        }
    }
}

/// Verify a provider response against the request that produced it and
/// return the shared dimensionality.
pub(crate) fn check_batch(expected: usize, vectors: &[Vec<f32>]) -> Result<usize, SemanticError> {
    if vectors.len() != expected {
        return Err(SemanticError::CountMismatch {
            expected,
            got: vectors.len(),
        });
    }

    let Some(first) = vectors.first() else {
        return Ok(0);
    };
    let dim = first.len();
    if dim == 0 {
        return Err(SemanticError::InvalidResponse(
            "embedding vectors must not be empty".into(),
        ));
    }

    for (index, vector) in vectors.iter().enumerate().skip(1) {
        if vector.len() != dim {
            return Err(SemanticError::DimensionMismatch {
                index,
                expected: dim,
                got: vector.len(),
            });
        }
    }

    Ok(dim)
}
