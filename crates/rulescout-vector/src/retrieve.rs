use std::collections::HashSet;

use rulescout_core::types::{GameId, ScoredChunk};

use crate::store::RuleIndex;

/// Keeps degenerate all-zero vectors from dividing by zero; they score 0.
const EPSILON: f32 = 1e-8;

/// Cosine similarity: `dot(a, b) / (‖a‖ * ‖b‖ + ε)`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have the same length");

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt() + EPSILON)
}

/// Rank stored chunks against a query vector.
///
/// Chunks outside a non-empty `game_filter` are excluded before ranking. The
/// descending sort is stable, so equal scores keep insertion order and
/// repeated calls over the same index return identical orderings. An empty
/// index yields an empty result, which callers treat as "nothing indexed"
/// rather than "no relevant matches".
pub fn retrieve(
    index: &RuleIndex,
    query_vec: &[f32],
    game_filter: &HashSet<GameId>,
    top_k: usize,
) -> Vec<ScoredChunk> {
    let mut scored: Vec<ScoredChunk> = index
        .rows()
        .iter()
        .zip(index.vectors())
        .filter(|(row, _)| game_filter.is_empty() || game_filter.contains(&row.game_id))
        .map(|(row, vector)| ScoredChunk {
            record: row.clone(),
            score: cosine_similarity(query_vec, vector),
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_k);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulescout_core::types::ChunkRecord;

    fn record(game_id: &str, page: u32) -> ChunkRecord {
        ChunkRecord {
            game_id: game_id.to_string(),
            game_title: game_id.to_uppercase(),
            source_ref: "doc://test".to_string(),
            page,
            text: format!("rule for {game_id} page {page}"),
            doc_hash: "test".to_string(),
        }
    }

    fn index_with(vectors: Vec<(&str, Vec<f32>)>) -> RuleIndex {
        let mut index = RuleIndex::new();
        let (rows, vecs): (Vec<_>, Vec<_>) = vectors
            .into_iter()
            .enumerate()
            .map(|(i, (game, v))| (record(game, i as u32 + 1), v))
            .unzip();
        index.append(rows, vecs);
        index
    }

    #[test]
    fn self_similarity_is_one() {
        let v = vec![0.3, -0.7, 0.2];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn similarity_is_symmetric() {
        let a = vec![0.1, 0.9, -0.4];
        let b = vec![-0.3, 0.5, 0.8];
        assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
    }

    #[test]
    fn zero_vector_scores_zero_without_panicking() {
        let zero = vec![0.0, 0.0];
        let v = vec![1.0, 0.0];
        assert_eq!(cosine_similarity(&zero, &v), 0.0);
    }

    #[test]
    fn results_are_ranked_descending() {
        let index = index_with(vec![
            ("far", vec![0.0, 1.0]),
            ("close", vec![1.0, 0.0]),
            ("mid", vec![0.5, 0.5]),
        ]);
        let hits = retrieve(&index, &[1.0, 0.0], &HashSet::new(), 10);
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].record.game_id, "close");
        assert_eq!(hits[1].record.game_id, "mid");
        assert_eq!(hits[2].record.game_id, "far");
    }

    #[test]
    fn ties_keep_insertion_order() {
        let index = index_with(vec![
            ("first", vec![1.0, 0.0]),
            ("second", vec![1.0, 0.0]),
            ("third", vec![1.0, 0.0]),
        ]);
        let hits = retrieve(&index, &[1.0, 0.0], &HashSet::new(), 10);
        let order: Vec<&str> = hits.iter().map(|h| h.record.game_id.as_str()).collect();
        assert_eq!(order, vec!["first", "second", "third"]);
    }

    #[test]
    fn repeated_retrieval_is_deterministic() {
        let index = index_with(vec![
            ("a", vec![0.2, 0.8]),
            ("b", vec![0.8, 0.2]),
            ("c", vec![0.5, 0.5]),
        ]);
        let first = retrieve(&index, &[0.6, 0.4], &HashSet::new(), 10);
        let second = retrieve(&index, &[0.6, 0.4], &HashSet::new(), 10);
        let ids = |hits: &[ScoredChunk]| {
            hits.iter().map(|h| h.record.game_id.clone()).collect::<Vec<_>>()
        };
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn filter_excludes_other_games_before_ranking() {
        let index = index_with(vec![
            ("wingspan", vec![1.0, 0.0]),
            ("scythe", vec![1.0, 0.0]),
        ]);
        let filter: HashSet<GameId> = ["scythe".to_string()].into_iter().collect();
        let hits = retrieve(&index, &[1.0, 0.0], &filter, 10);
        assert_eq!(hits.len(), 1);
        assert!(hits.iter().all(|h| h.record.game_id == "scythe"));
    }

    #[test]
    fn top_k_caps_the_result() {
        let index = index_with(vec![
            ("a", vec![1.0, 0.0]),
            ("b", vec![0.9, 0.1]),
            ("c", vec![0.8, 0.2]),
        ]);
        assert_eq!(retrieve(&index, &[1.0, 0.0], &HashSet::new(), 2).len(), 2);
    }

    #[test]
    fn empty_index_yields_empty_result() {
        let index = RuleIndex::new();
        assert!(retrieve(&index, &[1.0], &HashSet::new(), 5).is_empty());
    }
}
