use rulescout_core::types::ChunkRecord;

/// The retrieval index: chunk records and their vectors in two parallel
/// append-only sequences, addressed implicitly by position.
///
/// Invariant: `rows.len() == vectors.len()` at all times. The sequences grow
/// only through `append`; a caller handing over mismatched batches has
/// already corrupted its pipeline, so that is a panic, never a silent repair.
#[derive(Debug, Default)]
pub struct RuleIndex {
    rows: Vec<ChunkRecord>,
    vectors: Vec<Vec<f32>>,
}

impl RuleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append records and vectors in lock-step.
    pub fn append(&mut self, rows: Vec<ChunkRecord>, vectors: Vec<Vec<f32>>) {
        assert_eq!(
            rows.len(),
            vectors.len(),
            "chunk/vector lock-step violated"
        );
        self.rows.extend(rows);
        self.vectors.extend(vectors);
        tracing::debug!(total = self.rows.len(), "index grew");
    }

    /// Discard all stored records and vectors.
    pub fn reset(&mut self) {
        self.rows.clear();
        self.vectors.clear();
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[ChunkRecord] {
        &self.rows
    }

    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }
}
