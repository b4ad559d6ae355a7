//! Embedder implementations: a live HTTP embedding service client and a
//! deterministic offline fallback, both behind `rulescout_core::traits::Embedder`.

use std::sync::Arc;

use rulescout_core::config::EmbeddingConfig;
use rulescout_core::traits::Embedder;

mod live;
mod offline;

pub use live::LiveEmbedder;
pub use offline::DeterministicEmbedder;

/// Pick the embedder once at construction time: live when an API key is
/// configured, deterministic fallback otherwise.
///
/// The two modes produce incompatible vector spaces, so the choice is fixed
/// for the lifetime of any index built with the returned embedder.
pub fn embedder_from_config(config: &EmbeddingConfig) -> Arc<dyn Embedder> {
    match config.api_key.as_deref() {
        Some(key) if !key.trim().is_empty() => {
            tracing::info!(model = %config.model, "using live embedding service");
            Arc::new(LiveEmbedder::new(key.to_string(), config))
        }
        _ => {
            tracing::info!(
                dimension = config.fallback_dimension,
                "no embedding API key configured, using deterministic offline embeddings"
            );
            Arc::new(DeterministicEmbedder::new(config.fallback_dimension))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_key_selects_offline_fallback() {
        let config = EmbeddingConfig::default();
        let embedder = embedder_from_config(&config);
        assert_eq!(embedder.dimension(), 256);
    }

    #[test]
    fn blank_key_selects_offline_fallback() {
        let config = EmbeddingConfig { api_key: Some("  ".to_string()), ..EmbeddingConfig::default() };
        let embedder = embedder_from_config(&config);
        assert_eq!(embedder.dimension(), 256);
    }

    #[test]
    fn key_selects_live_mode() {
        let config = EmbeddingConfig { api_key: Some("sk-test".to_string()), ..EmbeddingConfig::default() };
        let embedder = embedder_from_config(&config);
        assert_eq!(embedder.dimension(), 1536);
    }
}
