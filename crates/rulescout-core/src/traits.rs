use async_trait::async_trait;

use crate::error::Result;
use crate::types::Page;

/// Maps text spans to fixed-length vectors.
///
/// Implementations must return exactly one vector per input, in input order,
/// all of length `dimension()`. A shorter, longer or reordered response from
/// a backing service is an error, never silently tolerated.
#[async_trait]
pub trait Embedder: Send + Sync {
    fn dimension(&self) -> usize;
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Extracts ordered per-page text from raw document bytes.
///
/// Page numbers start at 1. Unreadable bytes are an `Error::Extraction`,
/// distinct from a readable document whose pages carry no text.
pub trait PageExtractor: Send + Sync {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<Page>>;
}
