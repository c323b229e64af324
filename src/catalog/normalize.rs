//! Accent- and case-insensitive matching of search terms against card names.

use unicode_normalization::UnicodeNormalization;

const COMBINING_MARKS: std::ops::RangeInclusive<char> = '\u{0300}'..='\u{036f}';

/// Decompose, strip combining marks, lowercase, then rewrite a leading
/// `poke` to `poké` (the catalog spells the brand with the accent).
pub fn normalize_term(raw: &str) -> String {
    let folded: String = raw
        .nfd()
        .filter(|c| !COMBINING_MARKS.contains(c))
        .collect::<String>()
        .to_lowercase();

    match folded.strip_prefix("poke") {
        Some(rest) => format!("poké{}", rest),
        None => folded,
    }
}

/// Whether a card name matches an already normalized `term`: the
/// normalized name contains it, or one of its words starts with it.
pub fn matches_term(name: &str, term: &str) -> bool {
    let name = normalize_term(name);
    name.contains(term) || name.split(' ').any(|word| word.starts_with(term))
}
