//! Live embedder calling an OpenAI-compatible `/embeddings` endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use rulescout_core::config::EmbeddingConfig;
use rulescout_core::traits::Embedder;
use rulescout_core::{Error, Result};

/// Batched client for a remote embedding service.
///
/// One request is issued per `embed` call regardless of batch size. The
/// service declares each vector's position via an `index` field; entries are
/// re-ordered by it, and a response with the wrong count or non-contiguous
/// indices is surfaced as `Error::Embedding`.
pub struct LiveEmbedder {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    dimension: usize,
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingEntry>,
}

#[derive(Deserialize)]
struct EmbeddingEntry {
    index: usize,
    embedding: Vec<f32>,
}

impl LiveEmbedder {
    pub fn new(api_key: String, config: &EmbeddingConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            dimension: dimension_for_model(&config.model),
        }
    }
}

fn dimension_for_model(model: &str) -> usize {
    match model {
        "text-embedding-3-large" => 3072,
        _ => 1536,
    }
}

/// Re-order service entries by their declared index.
fn into_ordered(mut data: Vec<EmbeddingEntry>, expected: usize) -> Result<Vec<Vec<f32>>> {
    if data.len() != expected {
        return Err(Error::Embedding(format!(
            "service returned {} embeddings for {} inputs",
            data.len(),
            expected
        )));
    }
    data.sort_by_key(|e| e.index);
    for (i, entry) in data.iter().enumerate() {
        if entry.index != i {
            return Err(Error::Embedding(format!(
                "embedding indices are not contiguous at position {i}"
            )));
        }
    }
    Ok(data.into_iter().map(|e| e.embedding).collect())
}

#[async_trait]
impl Embedder for LiveEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!(batch = texts.len(), model = %self.model, "requesting embeddings");
        let response = self
            .client
            .post(format!("{}/embeddings", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&EmbeddingsRequest { model: &self.model, input: texts })
            .send()
            .await
            .map_err(|e| Error::Embedding(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Embedding(format!(
                "embedding service responded with {}",
                response.status()
            )));
        }

        let body: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| Error::Embedding(e.to_string()))?;
        into_ordered(body.data, texts.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(index: usize, value: f32) -> EmbeddingEntry {
        EmbeddingEntry { index, embedding: vec![value] }
    }

    #[test]
    fn entries_are_reordered_by_index() {
        let ordered = into_ordered(vec![entry(2, 2.0), entry(0, 0.0), entry(1, 1.0)], 3).unwrap();
        assert_eq!(ordered, vec![vec![0.0], vec![1.0], vec![2.0]]);
    }

    #[test]
    fn short_response_is_an_error() {
        let err = into_ordered(vec![entry(0, 0.0)], 2).unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
    }

    #[test]
    fn duplicate_indices_are_an_error() {
        let err = into_ordered(vec![entry(0, 0.0), entry(0, 1.0)], 2).unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
    }

    #[test]
    fn response_wire_format_parses() {
        let body: EmbeddingsResponse = serde_json::from_str(
            r#"{"object":"list","data":[{"object":"embedding","index":0,"embedding":[0.1,-0.2]}],"model":"text-embedding-3-small"}"#,
        )
        .unwrap();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0].embedding, vec![0.1, -0.2]);
    }
}
