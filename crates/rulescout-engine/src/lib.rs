//! The rules Q&A engine: ingestion orchestration over the chunker, embedder
//! and index, plus citation-bearing answer composition.

pub mod answer;
mod engine;

pub use engine::{
    DocumentSource, IngestFailure, IngestReport, QueryOptions, RulesEngine,
};
