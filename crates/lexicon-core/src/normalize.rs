use unicode_normalization::UnicodeNormalization;

/// Fold text for case-insensitive matching: NFKC, lowercase, trimmed
pub fn fold(text: &str) -> String {
    text.trim().nfkc().collect::<String>().to_lowercase()
}

/// Whether `haystack` contains `needle` once both are folded
pub fn contains_folded(haystack: &str, needle: &str) -> bool {
    let needle = fold(needle);
    !needle.is_empty() && fold(haystack).contains(&needle)
}
