//! In-memory retrieval index: lock-step chunk/vector storage plus
//! linear-scan cosine ranking. Sized for small rulebook collections; there
//! is deliberately no approximate index behind this.

mod retrieve;
mod store;

pub use retrieve::{cosine_similarity, retrieve};
pub use store::RuleIndex;
