use std::collections::{BTreeMap, HashSet};
use std::fmt;

use semantic::SemanticError;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Identifier of a recommendable document.
///
/// Catalogs in the wild use both integer and string ids, so both are accepted
/// on the wire. `Number(7)` and `Text("7")` are different ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentId {
    Number(u64),
    Text(String),
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentId::Number(n) => write!(f, "{n}"),
            DocumentId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for DocumentId {
    fn from(value: u64) -> Self {
        DocumentId::Number(value)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        DocumentId::Text(value.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        DocumentId::Text(value)
    }
}

/// A catalog entry: an id plus free-form fields.
///
/// On the wire this is a flat JSON object, e.g.
/// `{"id": 1, "title1": "...", "title2": "...", "title3": "..."}`. Every key
/// other than `id` lands in `fields`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    #[serde(flatten)]
    pub fields: BTreeMap<String, JsonValue>,
}

impl Document {
    pub fn new(id: impl Into<DocumentId>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&JsonValue> {
        self.fields.get(name)
    }

    /// Field rendered as display text; empty when absent.
    pub fn field_text(&self, name: &str) -> String {
        self.fields.get(name).map(render_value).unwrap_or_default()
    }

    /// Text sent to the embedding service for this document.
    ///
    /// Each configured field becomes `"<Label>: <text>"` where the label is the
    /// field name with its first letter upper-cased, and the lines are joined
    /// with `cfg.field_separator`. Fields are emitted in `cfg.text_fields`
    /// order, so the output depends only on the document and the config.
    pub fn text_representation(&self, cfg: &RecommendConfig) -> String {
        cfg.text_fields
            .iter()
            .map(|name| format!("{}: {}", field_label(name), self.field_text(name)))
            .collect::<Vec<_>>()
            .join(&cfg.field_separator)
    }

    /// Short human-facing label: the first configured text field when it is
    /// non-empty, otherwise the id.
    pub fn display_title(&self, cfg: &RecommendConfig) -> String {
        cfg.text_fields
            .first()
            .map(|name| self.field_text(name))
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| self.id.to_string())
    }
}

fn field_label(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn render_value(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(items) => items
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

/// Ids a user has already been shown.
///
/// Append-only. Iterates in insertion order and serializes as a plain JSON
/// array of ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<DocumentId>", into = "Vec<DocumentId>")]
pub struct History {
    order: Vec<DocumentId>,
    seen: HashSet<DocumentId>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.seen.contains(id)
    }

    /// Record `id`. Returns `false` when it was already present.
    pub fn record(&mut self, id: DocumentId) -> bool {
        if self.seen.insert(id.clone()) {
            self.order.push(id);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocumentId> {
        self.order.iter()
    }
}

impl Extend<DocumentId> for History {
    fn extend<I: IntoIterator<Item = DocumentId>>(&mut self, iter: I) {
        for id in iter {
            self.record(id);
        }
    }
}

impl FromIterator<DocumentId> for History {
    fn from_iter<I: IntoIterator<Item = DocumentId>>(iter: I) -> Self {
        let mut history = History::new();
        history.extend(iter);
        history
    }
}

impl From<Vec<DocumentId>> for History {
    fn from(ids: Vec<DocumentId>) -> Self {
        ids.into_iter().collect()
    }
}

impl From<History> for Vec<DocumentId> {
    fn from(history: History) -> Self {
        history.order
    }
}

/// A recommended document and its cosine distance to the query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedDocument {
    pub document: Document,
    /// In `[0, 2]`; lower is more similar.
    pub distance: f32,
}

/// How documents are turned into text and how many results to return by default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecommendConfig {
    /// Fields concatenated into the embedded text, in this order.
    pub text_fields: Vec<String>,
    /// Separator placed between rendered fields.
    pub field_separator: String,
    /// Result count used when the caller does not pass one.
    pub default_results: usize,
    /// Reject catalogs that repeat an id instead of ranking them.
    pub reject_duplicate_ids: bool,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            text_fields: vec!["title1".into(), "title2".into(), "title3".into()],
            field_separator: "\n".into(),
            default_results: 3,
            reject_duplicate_ids: true,
        }
    }
}

impl RecommendConfig {
    pub fn validate(&self) -> Result<(), RecommendError> {
        if self.text_fields.is_empty() {
            return Err(RecommendError::InvalidConfig(
                "text_fields must name at least one field".into(),
            ));
        }
        if self.text_fields.iter().any(|f| f.trim().is_empty()) {
            return Err(RecommendError::InvalidConfig(
                "text_fields must not contain blank names".into(),
            ));
        }
        if self.default_results == 0 {
            return Err(RecommendError::InvalidConfig(
                "default_results must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Errors produced by the recommender.
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("invalid recommend config: {0}")]
    InvalidConfig(String),
    /// Two catalog entries share an id.
    #[error("duplicate document id: {0}")]
    DuplicateId(DocumentId),
    /// The embedding service could not produce usable vectors.
    #[error("embedding failed: {0}")]
    Embedding(#[from] SemanticError),
}
