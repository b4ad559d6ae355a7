//! Domain types shared by the ingestion and retrieval pipeline.

use serde::{Deserialize, Serialize};

pub type GameId = String;

/// A bounded span of normalized rulebook text, the unit of storage and
/// retrieval.
///
/// - `game_id`: stable identifier of the owning game
/// - `game_title`: display name, denormalized for answer formatting
/// - `source_ref`: provenance token (a URL or `doc://<hash>`), informational
///   only and never dereferenced at query time
/// - `page`: 1-based page index within the source document
/// - `doc_hash`: hex digest of the whole source document's raw bytes, used
///   for citation grouping rather than retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub game_id: GameId,
    pub game_title: String,
    pub source_ref: String,
    pub page: u32,
    pub text: String,
    pub doc_hash: String,
}

/// A game known to the index. Created on first reference during an ingestion
/// run; `file_count` counts successfully indexed documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameEntry {
    pub id: GameId,
    pub title: String,
    pub file_count: usize,
}

/// One page of text extracted from a source document. `number` is 1-based.
#[derive(Debug, Clone)]
pub struct Page {
    pub number: u32,
    pub text: String,
}

/// A stored chunk scored against a query. Higher is more similar.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub record: ChunkRecord,
    pub score: f32,
}

/// A citation backing part of an answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    pub game_id: GameId,
    pub page: u32,
    pub snippet: String,
}

/// Which answer state the composer produced. Callers branch on this rather
/// than sniffing the answer text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AnswerOutcome {
    /// Nothing has been indexed yet.
    EmptyIndex,
    /// The index has content but retrieval produced no results.
    NoMatches,
    /// Citation-backed answer.
    Matches,
}

/// The composed reply to a rules question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesAnswer {
    pub outcome: AnswerOutcome,
    pub answer: String,
    pub citations: Vec<Citation>,
}
