//! Guess a game title and stable id from a rulebook file name.

/// Words that carry no game identity in rulebook file names.
const NOISE_WORDS: &[&str] = &[
    "rulebook",
    "rules",
    "manual",
    "english",
    "en",
    "uk",
    "edition",
    "expansion",
    "player",
    "aid",
    "reference",
    "how",
    "to",
    "play",
];

/// Derive `(id, title)` from a file name such as
/// `Ticket_to_Ride-rulebook-EN-v2.pdf`. Noise words and version markers are
/// stripped; if nothing survives, the raw base name is kept as the title.
/// The id is stable across ingestion runs for the same file name.
pub fn guess_title(file_name: &str) -> (String, String) {
    let base = strip_pdf_suffix(file_name);

    let kept: Vec<&str> = base
        .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|w| !w.is_empty() && !is_noise(w))
        .collect();

    let title = if kept.is_empty() {
        base.trim().to_string()
    } else {
        kept.join(" ")
    };
    (slugify(&title), title)
}

/// Lowercase, non-alphanumerics collapsed to single dashes, no dangling
/// dashes. Used as the game id.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c.to_ascii_lowercase());
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn strip_pdf_suffix(name: &str) -> &str {
    if name.len() >= 4 && name[name.len() - 4..].eq_ignore_ascii_case(".pdf") {
        &name[..name.len() - 4]
    } else {
        name
    }
}

fn is_noise(word: &str) -> bool {
    let w = word.to_ascii_lowercase();
    if NOISE_WORDS.contains(&w.as_str()) {
        return true;
    }
    // version markers like "v2" or "3e"
    if let Some(digits) = w.strip_prefix('v') {
        if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
            return true;
        }
    }
    if let Some(digits) = w.strip_suffix('e') {
        if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
            return true;
        }
    }
    false
}
