//! Text processing: whitespace normalization, fixed-window chunking, PDF
//! page-text extraction and rulebook title guessing.

pub mod chunk;
pub mod naming;
pub mod pdf;
