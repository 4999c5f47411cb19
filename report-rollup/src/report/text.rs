//! Text normalization shared by header matching, cell cleanup and keying

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Strip accents, turn line breaks into spaces, collapse runs of whitespace
/// and trim. Case is preserved.
pub fn normalize_text(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Normalized and lower-cased, for case/accent-insensitive comparisons
pub fn fold(raw: &str) -> String {
    normalize_text(raw).to_lowercase()
}

/// Case/accent-insensitive equality
pub fn folded_eq(a: &str, b: &str) -> bool {
    fold(a) == fold(b)
}
