//! Answer composition: turns ranked chunks into user-facing text plus a
//! structured citation list, branching on the strict/advisory policy.

use std::collections::HashSet;

use rulescout_core::types::{AnswerOutcome, Citation, RulesAnswer, ScoredChunk};

/// Character cap for the passage shown in an answer bullet.
const BULLET_SNIPPET_CHARS: usize = 350;
/// Character cap for a citation record's snippet.
const CITATION_SNIPPET_CHARS: usize = 180;

pub const EMPTY_INDEX_MESSAGE: &str = "No rulebooks indexed yet. Run an ingestion first.";
pub const NOTHING_RELEVANT_MESSAGE: &str =
    "I couldn't find anything relevant in your indexed rulebooks for that query.";
pub const ADVISORY_NO_CITES_MESSAGE: &str = "No direct citations found; here's a reasonable \
    ruling based on common patterns in similar games (advisory, not citation-backed).";
pub const NO_MATCHING_SOURCES_MESSAGE: &str = "No matching sources.";

const ADVISORY_PARAGRAPH: &str = "Interpretation: given these citations, a fair edge-case \
    ruling would follow the closest passage above (advisory, not citation-backed).";

/// Compose the final answer from ranked retrieval results.
///
/// Results are deduplicated by `(game_id, page, doc_hash)` with the first
/// (highest-ranked) occurrence winning, then capped at `max_citations`. Page
/// numbers and titles come verbatim from the underlying records; nothing is
/// fabricated. The advisory paragraph is appended only when strict mode is
/// off and interpretation is allowed.
pub fn compose(
    scored: &[ScoredChunk],
    index_empty: bool,
    strict: bool,
    allow_interpretation: bool,
    max_citations: usize,
) -> RulesAnswer {
    if index_empty {
        return RulesAnswer {
            outcome: AnswerOutcome::EmptyIndex,
            answer: EMPTY_INDEX_MESSAGE.to_string(),
            citations: Vec::new(),
        };
    }

    if scored.is_empty() {
        let answer = if strict {
            NOTHING_RELEVANT_MESSAGE
        } else if allow_interpretation {
            ADVISORY_NO_CITES_MESSAGE
        } else {
            NO_MATCHING_SOURCES_MESSAGE
        };
        return RulesAnswer {
            outcome: AnswerOutcome::NoMatches,
            answer: answer.to_string(),
            citations: Vec::new(),
        };
    }

    let mut seen = HashSet::new();
    let mut bullets = Vec::new();
    let mut citations = Vec::new();
    for hit in scored {
        if citations.len() >= max_citations {
            break;
        }
        let record = &hit.record;
        let key = (record.game_id.clone(), record.page, record.doc_hash.clone());
        if !seen.insert(key) {
            continue;
        }
        bullets.push(format!(
            "• {} — p.{}: {}",
            record.game_title,
            record.page,
            snippet(&record.text, BULLET_SNIPPET_CHARS)
        ));
        citations.push(Citation {
            game_id: record.game_id.clone(),
            page: record.page,
            snippet: snippet(&record.text, CITATION_SNIPPET_CHARS),
        });
    }

    let mut answer = format!(
        "Based on your indexed rulebooks, here are the most relevant passages (with pages):\n\n{}",
        bullets.join("\n")
    );
    if !strict && allow_interpretation {
        answer.push_str("\n\n");
        answer.push_str(ADVISORY_PARAGRAPH);
    }

    RulesAnswer { outcome: AnswerOutcome::Matches, answer, citations }
}

/// First `max_chars` characters, trimmed, never splitting a code point.
fn snippet(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulescout_core::types::ChunkRecord;

    fn hit(game_id: &str, page: u32, doc_hash: &str, text: &str, score: f32) -> ScoredChunk {
        ScoredChunk {
            record: ChunkRecord {
                game_id: game_id.to_string(),
                game_title: game_id.to_uppercase(),
                source_ref: format!("doc://{doc_hash}"),
                page,
                text: text.to_string(),
                doc_hash: doc_hash.to_string(),
            },
            score,
        }
    }

    #[test]
    fn empty_index_gets_fixed_message_and_no_citations() {
        let answer = compose(&[], true, true, true, 6);
        assert_eq!(answer.outcome, AnswerOutcome::EmptyIndex);
        assert_eq!(answer.answer, EMPTY_INDEX_MESSAGE);
        assert!(answer.citations.is_empty());
    }

    #[test]
    fn strict_no_results_refuses() {
        let answer = compose(&[], false, true, true, 6);
        assert_eq!(answer.outcome, AnswerOutcome::NoMatches);
        assert_eq!(answer.answer, NOTHING_RELEVANT_MESSAGE);
        assert!(answer.citations.is_empty());
    }

    #[test]
    fn advisory_no_results_is_labeled() {
        let answer = compose(&[], false, false, true, 6);
        assert_eq!(answer.outcome, AnswerOutcome::NoMatches);
        assert_eq!(answer.answer, ADVISORY_NO_CITES_MESSAGE);
    }

    #[test]
    fn no_results_without_interpretation_is_generic() {
        let answer = compose(&[], false, false, false, 6);
        assert_eq!(answer.answer, NO_MATCHING_SOURCES_MESSAGE);
    }

    #[test]
    fn duplicate_triple_contributes_one_citation() {
        let hits = vec![
            hit("wingspan", 4, "h1", "first occurrence wins", 0.9),
            hit("wingspan", 4, "h1", "same page, same document", 0.8),
            hit("wingspan", 5, "h1", "different page survives", 0.7),
        ];
        let answer = compose(&hits, false, true, true, 6);
        assert_eq!(answer.citations.len(), 2);
        assert_eq!(answer.citations[0].snippet, "first occurrence wins");
        assert_eq!(answer.citations[1].page, 5);
    }

    #[test]
    fn same_page_different_document_is_kept() {
        let hits = vec![
            hit("wingspan", 4, "h1", "from the base rulebook", 0.9),
            hit("wingspan", 4, "h2", "from the expansion rulebook", 0.8),
        ];
        let answer = compose(&hits, false, true, true, 6);
        assert_eq!(answer.citations.len(), 2);
    }

    #[test]
    fn citations_are_capped() {
        let hits: Vec<ScoredChunk> = (1..=10)
            .map(|page| hit("scythe", page, "h1", "rule text", 1.0 / page as f32))
            .collect();
        let answer = compose(&hits, false, true, true, 6);
        assert_eq!(answer.citations.len(), 6);
    }

    #[test]
    fn snippets_are_truncated() {
        let long = "x".repeat(500);
        let answer = compose(&[hit("root", 1, "h1", &long, 0.5)], false, true, true, 6);
        assert_eq!(answer.citations[0].snippet.chars().count(), 180);
        assert!(answer.answer.contains(&"x".repeat(350)));
        assert!(!answer.answer.contains(&"x".repeat(351)));
    }

    #[test]
    fn advisory_paragraph_only_in_loose_mode() {
        let hits = vec![hit("root", 1, "h1", "rule text", 0.5)];
        let strict = compose(&hits, false, true, true, 6);
        assert!(!strict.answer.contains("Interpretation:"));

        let loose = compose(&hits, false, false, true, 6);
        assert_eq!(loose.outcome, AnswerOutcome::Matches);
        assert!(loose.answer.contains("Interpretation:"));
        // advisory text comes after the citation-backed bullets
        let bullet_pos = loose.answer.find("• ROOT").unwrap();
        let advisory_pos = loose.answer.find("Interpretation:").unwrap();
        assert!(advisory_pos > bullet_pos);
    }

    #[test]
    fn bullet_carries_title_and_page() {
        let answer = compose(&[hit("root", 7, "h1", "vagabond moves", 0.5)], false, true, true, 6);
        assert!(answer.answer.contains("ROOT — p.7: vagabond moves"));
    }
}
