//! Reshaping raw news-article JSON into flat, recommender-ready records.
//!
//! Input is the `results` entries of a "most popular" style news API response.
//! Facet lists (`des_facet`, `org_facet`, `per_facet`, `geo_facet`) come
//! through as arrays of strings, or as an empty string when absent; both are
//! accepted. Person facets are rewritten into display order on the way in.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::caption::remove_image_descriptions;
use crate::person::normalize_person_name;
use crate::CanonicalError;

const MISSING: &str = "N/A";

/// A single news article with normalized facets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Article {
    /// Provider identifier, stringified. Absent for some feeds.
    pub id: Option<String>,
    pub title: String,
    pub published_date: String,
    pub section: String,
    pub url: String,
    #[serde(rename = "abstract")]
    pub summary: String,
    /// Descriptor (topic) facets.
    pub des: Vec<String>,
    /// Organization facets.
    pub org: Vec<String>,
    /// Person facets in `"First Last"` order.
    pub per: Vec<String>,
    /// Geographic facets.
    pub geo: Vec<String>,
}

impl Article {
    /// Identifier to use when recommending: the provider id, else the URL.
    pub fn document_id(&self) -> Option<String> {
        self.id.clone().or_else(|| {
            if self.url == MISSING {
                None
            } else {
                Some(self.url.clone())
            }
        })
    }

    /// Strip photo captions and credits from the abstract. An abstract that
    /// was nothing but caption text becomes `"N/A"`.
    pub fn without_captions(mut self) -> Self {
        let cleaned = remove_image_descriptions(&self.summary);
        self.summary = if cleaned.is_empty() {
            MISSING.to_string()
        } else {
            cleaned
        };
        self
    }

    pub fn descriptors(&self) -> String {
        self.des.join(", ")
    }

    pub fn organizations(&self) -> String {
        self.org.join(", ")
    }

    pub fn people(&self) -> String {
        self.per.join(", ")
    }

    pub fn locations(&self) -> String {
        self.geo.join(", ")
    }

    /// Flat text fields for a recommendable document.
    ///
    /// `title1` is the headline, `title2` the abstract and `title3` the joined
    /// descriptor facets, so the default three-field text policy of the
    /// recommender picks up the article without extra configuration.
    pub fn document_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("title1".into(), Value::String(self.title.clone()));
        fields.insert("title2".into(), Value::String(self.summary.clone()));
        fields.insert("title3".into(), Value::String(self.descriptors()));
        fields.insert("section".into(), Value::String(self.section.clone()));
        fields.insert(
            "published_date".into(),
            Value::String(self.published_date.clone()),
        );
        fields.insert("url".into(), Value::String(self.url.clone()));
        fields.insert("per_facet".into(), Value::String(self.people()));
        fields.insert("org_facet".into(), Value::String(self.organizations()));
        fields.insert("geo_facet".into(), Value::String(self.locations()));
        fields
    }
}

/// Parse one raw article object.
pub fn parse_article(raw: &Value) -> Result<Article, CanonicalError> {
    let obj = raw.as_object().ok_or_else(|| {
        CanonicalError::InvalidArticle(format!("expected a JSON object, got {}", kind(raw)))
    })?;

    let id = match obj.get("id") {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    Ok(Article {
        id,
        title: text_field(obj, "title"),
        published_date: text_field(obj, "published_date"),
        section: text_field(obj, "section"),
        url: text_field(obj, "url"),
        summary: text_field(obj, "abstract"),
        des: facet_list(obj, "des_facet"),
        org: facet_list(obj, "org_facet"),
        per: facet_list(obj, "per_facet")
            .iter()
            .map(|name| normalize_person_name(name))
            .filter(|name| !name.is_empty())
            .collect(),
        geo: facet_list(obj, "geo_facet"),
    })
}

/// Parse either a full API response (`{"results": [...]}`) or a bare array.
/// `limit` keeps only the first `limit` articles.
pub fn parse_articles(raw: &Value, limit: Option<usize>) -> Result<Vec<Article>, CanonicalError> {
    let items = match raw {
        Value::Array(items) => items,
        Value::Object(obj) => match obj.get("results") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(CanonicalError::InvalidArticle(
                    "response has no `results` array".into(),
                ))
            }
        },
        other => {
            return Err(CanonicalError::InvalidArticle(format!(
                "expected an array or an object with `results`, got {}",
                kind(other)
            )))
        }
    };

    items
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(parse_article)
        .collect()
}

/// Text value of `key`, or `"N/A"` when the key is absent. An explicit
/// `null` counts as absent too.
fn text_field(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => MISSING.to_string(),
        Some(other) => other.to_string(),
    }
}

fn facet_list(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    match obj.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
