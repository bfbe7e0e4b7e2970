use thiserror::Error;

/// Errors that can occur while reshaping news metadata.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CanonicalError {
    #[error("invalid article: {0}")]
    InvalidArticle(String),
    /// Input matched none of the accepted date layouts.
    #[error("invalid date: {0:?}")]
    InvalidDate(String),
    #[error("date range starts after it ends: {since} > {until}")]
    InvalidDateRange { since: String, until: String },
}
