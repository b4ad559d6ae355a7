use std::collections::{BTreeMap, HashSet};
use std::fmt::Write as _;
use std::sync::{Arc, RwLock};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use rulescout_core::config::{ChunkingConfig, RetrievalConfig};
use rulescout_core::traits::{Embedder, PageExtractor};
use rulescout_core::types::{ChunkRecord, GameEntry, GameId, RulesAnswer};
use rulescout_core::{Error, Result};
use rulescout_text::chunk::chunk;
use rulescout_vector::{retrieve, RuleIndex};

use crate::answer::compose;

/// Per-query policy knobs. Defaults match the strictest useful posture:
/// citation-required answers, interpretation permitted when strict is off.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub game_filter: Vec<GameId>,
    pub strict: bool,
    pub allow_interpretation: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self { game_filter: Vec::new(), strict: true, allow_interpretation: true }
    }
}

/// A document handed to an ingestion run by a byte-source collaborator.
#[derive(Debug, Clone)]
pub struct DocumentSource {
    pub game_id: GameId,
    pub title: String,
    pub bytes: Vec<u8>,
}

/// Summary of one ingestion run. Per-document failures are collected here
/// rather than aborting the run.
#[derive(Debug, Default, Serialize)]
pub struct IngestReport {
    /// Documents that contributed at least one chunk.
    pub indexed: usize,
    /// Documents with no extractable text.
    pub skipped: usize,
    pub failures: Vec<IngestFailure>,
}

#[derive(Debug, Serialize)]
pub struct IngestFailure {
    pub title: String,
    pub error: String,
}

/// The rules Q&A engine.
///
/// Owns the retrieval index and the games registry. Retrieval takes a read
/// lock only for the scan, so concurrent queries never block each other;
/// ingestion runs are serialized through `ingest_gate` and append fully
/// built batches under a short write section, so readers observe either the
/// pre- or post-ingestion index, never a partially built one.
pub struct RulesEngine {
    embedder: Arc<dyn Embedder>,
    extractor: Arc<dyn PageExtractor>,
    chunking: ChunkingConfig,
    retrieval: RetrievalConfig,
    index: RwLock<RuleIndex>,
    games: RwLock<BTreeMap<GameId, GameEntry>>,
    ingest_gate: Mutex<()>,
}

impl RulesEngine {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        extractor: Arc<dyn PageExtractor>,
        chunking: ChunkingConfig,
        retrieval: RetrievalConfig,
    ) -> Self {
        Self {
            embedder,
            extractor,
            chunking,
            retrieval,
            index: RwLock::new(RuleIndex::new()),
            games: RwLock::new(BTreeMap::new()),
            ingest_gate: Mutex::new(()),
        }
    }

    /// Discard the whole index and the games registry.
    pub fn reset_index(&self) {
        self.index.write().expect("index lock poisoned").reset();
        self.games.write().expect("games lock poisoned").clear();
        tracing::info!("index reset");
    }

    /// Number of chunks currently indexed.
    pub fn indexed_chunks(&self) -> usize {
        self.index.read().expect("index lock poisoned").len()
    }

    /// Known games, sorted by title.
    pub fn list_games(&self) -> Vec<GameEntry> {
        let mut games: Vec<GameEntry> = self
            .games
            .read()
            .expect("games lock poisoned")
            .values()
            .cloned()
            .collect();
        games.sort_by(|a, b| a.title.cmp(&b.title));
        games
    }

    /// Index one document's raw bytes for a game.
    ///
    /// Returns `Ok(true)` iff at least one chunk was indexed; a readable
    /// document with no extractable text is `Ok(false)` and indexes nothing.
    /// The embed call is batched once per document, and on any failure the
    /// index is left untouched: records and vectors only ever land together.
    pub async fn index_document(&self, game_id: &str, title: &str, bytes: &[u8]) -> Result<bool> {
        if game_id.trim().is_empty() || title.trim().is_empty() {
            return Err(Error::InvalidInput("game id and title are required".to_string()));
        }
        self.touch_game(game_id, title);

        let doc_hash = hex_sha256(bytes);
        let pages = self.extractor.extract_pages(bytes)?;

        let mut rows = Vec::new();
        let mut texts = Vec::new();
        for page in &pages {
            if page.text.trim().is_empty() {
                continue;
            }
            for span in chunk(&page.text, self.chunking.max_chars, self.chunking.overlap) {
                rows.push(ChunkRecord {
                    game_id: game_id.to_string(),
                    game_title: title.to_string(),
                    source_ref: format!("doc://{doc_hash}"),
                    page: page.number,
                    text: span.clone(),
                    doc_hash: doc_hash.clone(),
                });
                texts.push(span);
            }
        }

        if texts.is_empty() {
            tracing::debug!(game_id, "document produced no extractable text");
            return Ok(false);
        }

        let vectors = self.embedder.embed(&texts).await?;
        if vectors.len() != rows.len() {
            return Err(Error::Embedding(format!(
                "got {} vectors for {} chunks",
                vectors.len(),
                rows.len()
            )));
        }

        let chunk_count = rows.len();
        self.index.write().expect("index lock poisoned").append(rows, vectors);
        self.record_indexed(game_id);
        tracing::info!(game_id, pages = pages.len(), chunks = chunk_count, "indexed document");
        Ok(true)
    }

    /// Drive a full ingestion run over many documents.
    ///
    /// At most one run mutates the index at a time. With `reset` (the
    /// default contract) the previous index and registry are discarded
    /// before the first document; one bad document never aborts the batch.
    pub async fn run_ingest(&self, sources: Vec<DocumentSource>, reset: bool) -> IngestReport {
        let _gate = self.ingest_gate.lock().await;
        if reset {
            self.reset_index();
        }

        let mut report = IngestReport::default();
        for source in sources {
            match self.index_document(&source.game_id, &source.title, &source.bytes).await {
                Ok(true) => report.indexed += 1,
                Ok(false) => {
                    tracing::warn!(title = %source.title, "no text extracted, skipping");
                    report.skipped += 1;
                }
                Err(e) => {
                    tracing::warn!(title = %source.title, error = %e, "document failed, continuing run");
                    report.failures.push(IngestFailure {
                        title: source.title,
                        error: e.to_string(),
                    });
                }
            }
        }
        tracing::info!(
            indexed = report.indexed,
            skipped = report.skipped,
            failed = report.failures.len(),
            "ingestion run complete"
        );
        report
    }

    /// Answer a rules question from the current index.
    pub async fn retrieve_and_answer(
        &self,
        query: &str,
        options: &QueryOptions,
    ) -> Result<RulesAnswer> {
        if query.trim().is_empty() {
            return Err(Error::InvalidInput("query is required".to_string()));
        }

        // Checked before embedding so an empty index never costs a live call.
        if self.index.read().expect("index lock poisoned").is_empty() {
            return Ok(compose(&[], true, options.strict, options.allow_interpretation, 0));
        }

        let mut query_vecs = self.embedder.embed(&[query.to_string()]).await?;
        let query_vec = query_vecs
            .pop()
            .ok_or_else(|| Error::Embedding("service returned no vector for the query".to_string()))?;

        let filter: HashSet<GameId> = options.game_filter.iter().cloned().collect();
        let scored = {
            let index = self.index.read().expect("index lock poisoned");
            retrieve(&index, &query_vec, &filter, self.retrieval.top_k)
        };

        Ok(compose(
            &scored,
            false,
            options.strict,
            options.allow_interpretation,
            self.retrieval.max_citations,
        ))
    }

    fn touch_game(&self, game_id: &str, title: &str) {
        self.games
            .write()
            .expect("games lock poisoned")
            .entry(game_id.to_string())
            .or_insert_with(|| GameEntry {
                id: game_id.to_string(),
                title: title.to_string(),
                file_count: 0,
            });
    }

    fn record_indexed(&self, game_id: &str) {
        if let Some(entry) = self.games.write().expect("games lock poisoned").get_mut(game_id) {
            entry.file_count += 1;
        }
    }
}

fn hex_sha256(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(out, "{byte:02x}");
    }
    out
}
