//! Configuration loader.
//!
//! Uses Figment to merge built-in defaults + `rulescout.toml` + `RULESCOUT_*`
//! env vars into a typed `AppConfig`. Nested keys use `__` in env vars, e.g.
//! `RULESCOUT_EMBEDDING__API_KEY`.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum chunk length in characters.
    pub max_chars: usize,
    /// Character overlap with the preceding chunk from the same page.
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { max_chars: 1000, overlap: 150 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// API key for the live embedding service. Absent means the deterministic
    /// offline embedder is used instead.
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    /// Vector length of the offline fallback embedder.
    pub fallback_dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: "https://api.openai.com/v1".to_string(),
            model: "text-embedding-3-small".to_string(),
            fallback_dimension: 256,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Chunks considered per query.
    pub top_k: usize,
    /// Deduplicated citations emitted per answer.
    pub max_citations: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 12, max_citations: 6 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: "127.0.0.1:3000".to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Publisher hosts PDF URLs may be fetched from. `*` accepts any host.
    /// A host matches an entry exactly or as a `.entry` suffix.
    pub allowlist: Vec<String>,
    /// Fetched bodies smaller than this are rejected as not-a-PDF.
    pub min_pdf_bytes: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            allowlist: [
                "daysofwonder.com",
                "asmodee.com",
                "asmodee.net",
                "images-cdn.asmodee.com",
                "fantasyflightgames.com",
                "images-cdn.fantasyflightgames.com",
                "stonemaiergames.com",
                "1j1ju.com",
                "en.1j1ju.com",
                "restorationgames.com",
                "z-mangames.com",
                "cmon.com",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            min_pdf_bytes: 1024,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub chunking: ChunkingConfig,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
    pub server: ServerConfig,
    pub ingest: IngestConfig,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file("rulescout.toml"))
            .merge(Env::prefixed("RULESCOUT_").split("__"))
            .extract()?;
        if config.chunking.max_chars == 0 {
            anyhow::bail!("chunking.max_chars must be > 0");
        }
        Ok(config)
    }
}
