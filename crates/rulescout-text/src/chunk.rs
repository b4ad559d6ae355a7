//! Fixed-window overlapping chunker.
//!
//! Page text is normalized first, then sliced into spans of at most
//! `max_chars` characters, each new span starting `max_chars - overlap`
//! characters after the previous one. All arithmetic is in characters, not
//! bytes, so multi-byte text never splits inside a code point.

/// Collapse whitespace runs to single spaces and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split `text` into overlapping spans. Empty (or whitespace-only) input
/// produces no spans. The step is clamped to at least one character so the
/// walk terminates even when `overlap >= max_chars`.
pub fn chunk(text: &str, max_chars: usize, overlap: usize) -> Vec<String> {
    let clean = normalize_whitespace(text);
    if clean.is_empty() || max_chars == 0 {
        return Vec::new();
    }

    // Byte offset of every character boundary, with the end appended so a
    // span is always bounds[start]..bounds[end].
    let mut bounds: Vec<usize> = clean.char_indices().map(|(i, _)| i).collect();
    bounds.push(clean.len());
    let char_count = bounds.len() - 1;

    let step = max_chars.saturating_sub(overlap).max(1);
    let mut spans = Vec::new();
    let mut start = 0;
    while start < char_count {
        let end = (start + max_chars).min(char_count);
        spans.push(clean[bounds[start]..bounds[end]].to_string());
        start += step;
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_whitespace_runs() {
        assert_eq!(normalize_whitespace("  a\t b\n\nc  "), "a b c");
    }

    #[test]
    fn empty_input_produces_no_spans() {
        assert!(chunk("", 1000, 150).is_empty());
        assert!(chunk("   \n\t ", 1000, 150).is_empty());
    }

    #[test]
    fn short_input_is_a_single_span() {
        let spans = chunk("Players draw two cards.", 1000, 150);
        assert_eq!(spans, vec!["Players draw two cards.".to_string()]);
    }

    #[test]
    fn spans_respect_max_and_stride() {
        let text = "0123456789abcdefghij";
        let spans = chunk(text, 10, 5);
        // stride 5: starts at 0, 5, 10, 15
        assert_eq!(spans.len(), 4);
        assert_eq!(spans[0], "0123456789");
        assert_eq!(spans[1], "56789abcde");
        assert_eq!(spans[2], "abcdefghij");
        assert_eq!(spans[3], "fghij");
        assert!(spans.iter().all(|s| s.chars().count() <= 10));
    }

    #[test]
    fn spans_cover_the_whole_text() {
        let text: String = ('a'..='z').cycle().take(2500).collect();
        let max = 1000;
        let overlap = 150;
        let spans = chunk(&text, max, overlap);

        // Reconstruct from the first span plus each later span minus its
        // overlap with the previous one.
        let mut rebuilt: String = spans[0].clone();
        for pair in spans.windows(2) {
            let prev_len = pair[0].chars().count();
            let skip = overlap.min(prev_len);
            rebuilt.extend(pair[1].chars().skip(skip));
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn overlap_ge_max_still_terminates() {
        let spans = chunk("abcdef", 3, 5);
        // step clamps to 1, so every start offset produces a span
        assert_eq!(spans.len(), 6);
        assert_eq!(spans[0], "abc");
        assert_eq!(spans[5], "f");
    }

    #[test]
    fn multibyte_text_never_splits_a_code_point() {
        let text = "héllo wörld ünïcode ågain".repeat(20);
        let spans = chunk(&text, 7, 2);
        assert!(!spans.is_empty());
        for span in &spans {
            assert!(span.chars().count() <= 7);
        }
    }
}
