//! Reading catalogs and persisting reading history.
//!
//! Catalogs are JSON arrays of flat document objects. History files are JSON
//! arrays of ids; a missing history file means an empty history.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use canonical::{Article, CanonicalError};
use recommend::{Document, DocumentId, History};
use thiserror::Error;
use tracing::debug;

/// Errors from catalog and history files.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Article(#[from] CanonicalError),
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> CatalogError + '_ {
    move |source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn json_error(path: &Path) -> impl FnOnce(serde_json::Error) -> CatalogError + '_ {
    move |source| CatalogError::Json {
        path: path.to_path_buf(),
        source,
    }
}

/// Read a JSON array of documents.
pub fn read_documents(path: &Path) -> Result<Vec<Document>, CatalogError> {
    let content = fs::read_to_string(path).map_err(io_error(path))?;
    let documents: Vec<Document> = serde_json::from_str(&content).map_err(json_error(path))?;
    debug!(path = %path.display(), count = documents.len(), "loaded catalog");
    Ok(documents)
}

/// Write documents as a pretty-printed JSON array.
pub fn write_documents(path: &Path, documents: &[Document]) -> Result<(), CatalogError> {
    let json = serde_json::to_string_pretty(documents).map_err(json_error(path))?;
    fs::write(path, json).map_err(io_error(path))
}

/// Read a history file. A file that does not exist yet is an empty history.
pub fn read_history(path: &Path) -> Result<History, CatalogError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(History::new()),
        Err(err) => return Err(io_error(path)(err)),
    };
    serde_json::from_str(&content).map_err(json_error(path))
}

pub fn write_history(path: &Path, history: &History) -> Result<(), CatalogError> {
    let json = serde_json::to_string_pretty(history).map_err(json_error(path))?;
    fs::write(path, json).map_err(io_error(path))
}

/// Turn parsed articles into recommendable documents.
///
/// The id is the article's provider id, else its URL, else its position in
/// `articles`.
pub fn articles_to_documents(articles: &[Article]) -> Vec<Document> {
    articles
        .iter()
        .enumerate()
        .map(|(position, article)| {
            let id = article
                .document_id()
                .map(DocumentId::from)
                .unwrap_or(DocumentId::Number(position as u64));
            Document {
                id,
                fields: article.document_fields().into_iter().collect(),
            }
        })
        .collect()
}
