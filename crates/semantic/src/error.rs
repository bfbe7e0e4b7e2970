use thiserror::Error;

/// Errors surfaced while turning text into embeddings.
///
/// Every variant means "could not embed"; callers never receive a partial
/// batch alongside one of these.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SemanticError {
    /// Configuration is inconsistent (e.g. `api` mode without an `api_url`).
    #[error("invalid semantic config: {0}")]
    InvalidConfig(String),
    /// Transport failure or non-success HTTP status from the embedding service.
    #[error("embedding request failed: {0}")]
    Http(String),
    /// The service answered, but not with something we can read as embeddings.
    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),
    /// The service returned a different number of vectors than inputs sent.
    #[error("embedding service returned {got} vectors for {expected} inputs")]
    CountMismatch { expected: usize, got: usize },
    /// Vectors within one response do not share a dimensionality.
    #[error("embedding {index} has dimension {got}, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        got: usize,
    },
}
