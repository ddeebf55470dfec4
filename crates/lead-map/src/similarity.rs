//! Header name similarity.
//!
//! Names are compared after [`normalize_name`]. The ratio is an ordered
//! subsequence overlap: characters of the first name are matched greedily,
//! in order, against the second name, and the count is divided by the longer
//! length. The measure is not symmetric.

/// Lowercases and drops every character outside `[a-z0-9]`.
///
/// Non-ASCII letters are dropped rather than transliterated.
pub fn normalize_name(raw: &str) -> String {
    raw.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Similarity of two raw names in `[0, 1]`.
///
/// Returns 0.0 when either name is empty after normalization and 1.0 when
/// both normalize to the same string.
pub fn name_similarity(first: &str, second: &str) -> f64 {
    normalized_similarity(&normalize_name(first), &normalize_name(second))
}

/// Same as [`name_similarity`] for names that are already normalized.
pub fn normalized_similarity(first: &str, second: &str) -> f64 {
    if first.is_empty() || second.is_empty() {
        return 0.0;
    }
    if first == second {
        return 1.0;
    }

    let haystack = second.as_bytes();
    let mut cursor = 0;
    let mut matched = 0usize;
    for &ch in first.as_bytes() {
        if let Some(offset) = haystack[cursor..].iter().position(|&c| c == ch) {
            matched += 1;
            cursor += offset + 1;
        }
    }

    matched as f64 / first.len().max(second.len()) as f64
}
