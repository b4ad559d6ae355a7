//! Deterministic offline embedder.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use rulescout_core::traits::Embedder;
use rulescout_core::Result;

/// Maps each input's sha-256 digest into a fixed-length vector by cycling
/// through the digest bytes, each mapped into [-1, 1] as `(byte - 128) / 128`.
///
/// Pure and deterministic: identical text always yields a bit-identical
/// vector, so the pipeline runs end-to-end without any external service.
/// Not comparable with live embeddings; the two must never share an index.
pub struct DeterministicEmbedder {
    dimension: usize,
}

impl DeterministicEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let digest = Sha256::digest(text.as_bytes());
        (0..self.dimension)
            .map(|i| (f32::from(digest[i % digest.len()]) - 128.0) / 128.0)
            .collect()
    }
}

#[async_trait]
impl Embedder for DeterministicEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}
