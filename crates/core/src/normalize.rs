//! Text canonicalisation for header and identity-key comparison.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Lowercase, strip diacritics, collapse whitespace runs and trim.
///
/// Idempotent: `normalize(&normalize(s)) == normalize(s)`.
///
/// ```
/// use padron_core::normalize::normalize;
///
/// assert_eq!(normalize("  Código   Postal "), "codigo postal");
/// ```
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();

    // Lowercasing can produce new decomposable characters (e.g. 'İ'), so
    // strip marks a second time.
    let stripped: String = stripped.nfd().filter(|c| !is_combining_mark(*c)).collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical upper-case key used for header lookup and duplicate detection.
pub fn canonical_key(text: &str) -> String {
    normalize(text).to_uppercase()
}

/// Returns `true` when the cell carries no content besides whitespace.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
