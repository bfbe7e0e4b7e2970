use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::vector::{check_batch, l2_normalize_in_place};
use crate::{Embedder, EmbeddingBatch, SemanticConfig, SemanticError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ApiProviderKind {
    HuggingFace,
    OpenAI,
    Custom,
}

/// Embedder backed by a remote HTTP embedding service.
///
/// One [`embed`](Embedder::embed) call is exactly one POST carrying the whole
/// batch. Failures are not retried; they surface as a [`SemanticError`].
#[derive(Debug, Clone)]
pub struct ApiEmbedder {
    cfg: SemanticConfig,
    url: String,
    provider: ApiProviderKind,
    client: reqwest::Client,
}

impl ApiEmbedder {
    /// Build a client from an `api` mode config.
    pub fn new(cfg: SemanticConfig) -> Result<Self, SemanticError> {
        cfg.validate()?;
        let url = cfg
            .endpoint()
            .ok_or_else(|| SemanticError::InvalidConfig("api_url is required for api mode".into()))?
            .to_string();

        let mut builder = reqwest::Client::builder().connect_timeout(Duration::from_secs(10));
        if let Some(secs) = cfg.api_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| SemanticError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            provider: api_provider_kind(&cfg),
            url,
            cfg,
            client,
        })
    }

    pub fn config(&self) -> &SemanticConfig {
        &self.cfg
    }

    async fn send(&self, payload: Value) -> Result<Value, SemanticError> {
        let mut request = self.client.post(&self.url).json(&payload);
        if let Some(header) = self.cfg.authorization_header() {
            request = request.header(reqwest::header::AUTHORIZATION, header);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SemanticError::Http(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, url = %self.url, "embedding service returned an error status");
            return Err(SemanticError::Http(format!("HTTP error {status}: {body}")));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SemanticError::InvalidResponse(format!("invalid JSON response: {e}")))
    }
}

#[async_trait]
impl Embedder for ApiEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<EmbeddingBatch, SemanticError> {
        if texts.is_empty() {
            return Ok(EmbeddingBatch {
                model_name: self.cfg.model_name.clone(),
                normalized: self.cfg.normalize,
                ..Default::default()
            });
        }

        debug!(
            provider = %self.cfg.provider_name(),
            model = %self.cfg.model_name,
            batch = texts.len(),
            "requesting embeddings"
        );

        let payload = build_api_payload(self.provider, texts, &self.cfg);
        let response = self.send(payload).await?;
        let mut vectors = parse_embeddings_from_value(response)?;
        let embedding_dim = check_batch(texts.len(), &vectors)?;

        if self.cfg.normalize {
            for vector in vectors.iter_mut() {
                l2_normalize_in_place(vector);
            }
        }

        Ok(EmbeddingBatch {
            model_name: self.cfg.model_name.clone(),
            embedding_dim,
            normalized: self.cfg.normalize,
            vectors,
        })
    }
}

fn api_provider_kind(cfg: &SemanticConfig) -> ApiProviderKind {
    match cfg.provider_name().as_str() {
        "hf" | "huggingface" => ApiProviderKind::HuggingFace,
        "openai" | "gpt" => ApiProviderKind::OpenAI,
        _ => ApiProviderKind::Custom,
    }
}

fn build_api_payload(provider: ApiProviderKind, texts: &[String], cfg: &SemanticConfig) -> Value {
    match provider {
        ApiProviderKind::HuggingFace => json!({ "inputs": texts }),
        ApiProviderKind::OpenAI => json!({ "input": texts, "model": cfg.model_name }),
        ApiProviderKind::Custom => json!({ "texts": texts, "model": cfg.model_name }),
    }
}

fn parse_embeddings_from_value(value: Value) -> Result<Vec<Vec<f32>>, SemanticError> {
    match value {
        Value::Object(mut map) => {
            if let Some(embeddings) = map.remove("embeddings") {
                return parse_embedding_collection(embeddings);
            }

            if let Some(Value::Array(items)) = map.remove("data") {
                return parse_openai_data(items);
            }

            Err(SemanticError::InvalidResponse(
                "unsupported API response shape".into(),
            ))
        }
        other => parse_embedding_collection(other),
    }
}

/// OpenAI-style `data` array. Entries carry an `index`; when every entry has
/// one the vectors are put back into request order by it. Entries without any
/// index are taken in response order. A mix of both is rejected.
fn parse_openai_data(items: Vec<Value>) -> Result<Vec<Vec<f32>>, SemanticError> {
    let mut indexed = Vec::with_capacity(items.len());
    for (position, item) in items.into_iter().enumerate() {
        let Value::Object(mut obj) = item else {
            return Err(SemanticError::InvalidResponse(
                "unexpected entry inside `data` array".into(),
            ));
        };
        let embedding = obj.remove("embedding").ok_or_else(|| {
            SemanticError::InvalidResponse("missing `embedding` field in data item".into())
        })?;
        let index = obj.get("index").and_then(Value::as_u64).map(|i| i as usize);
        indexed.push((index, position, parse_embedding_vector(embedding)?));
    }

    let with_index = indexed.iter().filter(|(index, _, _)| index.is_some()).count();
    if with_index != 0 && with_index != indexed.len() {
        return Err(SemanticError::InvalidResponse(format!(
            "only {with_index} of {} `data` entries carry an index",
            indexed.len()
        )));
    }

    if with_index == indexed.len() {
        indexed.sort_by_key(|(index, position, _)| (*index, *position));
        let in_order = indexed
            .iter()
            .enumerate()
            .all(|(expected, (index, _, _))| *index == Some(expected));
        if !in_order {
            return Err(SemanticError::InvalidResponse(
                "`data` indices are not a contiguous 0..n range".into(),
            ));
        }
    }

    Ok(indexed.into_iter().map(|(_, _, vector)| vector).collect())
}

fn parse_embedding_collection(value: Value) -> Result<Vec<Vec<f32>>, SemanticError> {
    match value {
        Value::Array(items) => {
            if items.is_empty() {
                Ok(Vec::new())
            } else if items.iter().all(|item| matches!(item, Value::Array(_))) {
                items.into_iter().map(parse_embedding_vector).collect()
            } else {
                parse_embedding_vector(Value::Array(items)).map(|vec| vec![vec])
            }
        }
        other => parse_embedding_vector(other).map(|vec| vec![vec]),
    }
}

fn parse_embedding_vector(value: Value) -> Result<Vec<f32>, SemanticError> {
    match value {
        Value::Array(values) => values
            .into_iter()
            .map(|entry| match entry {
                Value::Number(num) => num.as_f64().map(|f| f as f32).ok_or_else(|| {
                    SemanticError::InvalidResponse("non-finite embedding value".into())
                }),
                other => Err(SemanticError::InvalidResponse(format!(
                    "embedding entries must be numbers, got {other:?}"
                ))),
            })
            .collect(),
        other => Err(SemanticError::InvalidResponse(format!(
            "embedding vector must be an array, got {other:?}"
        ))),
    }
}
