// 🧹 Text Normalizer - Canonical form for fuzzy comparison
//
// Case, accents, punctuation and whitespace runs must not affect similarity:
//   " Salud   Pública! "  →  "salud publica"

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize free text for comparison.
///
/// - Converts to lowercase
/// - Folds accented letters to their base letter (NFKD, combining marks dropped)
/// - Removes punctuation and symbols (keeps word characters and whitespace)
/// - Collapses whitespace runs to a single space and trims both ends
///
/// Text made only of punctuation or whitespace becomes the empty string.
pub fn normalize(text: &str) -> String {
    // Decompose before and after lowercasing: "ᴬ" only lowercases once
    // decomposed, and "İ" lowercases to "i" plus a combining dot
    let lowered = fold_marks(text.nfkd()).to_lowercase();

    let stripped: String = fold_marks(lowered.nfkd())
        .chars()
        .filter(|c| is_word_char(*c) || c.is_whitespace())
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize an optional field; absent values normalize to ""
pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}

fn fold_marks(chars: impl Iterator<Item = char>) -> String {
    chars.filter(|c| !is_combining_mark(*c)).collect()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

// ============================================================================
// TESTS
// ============================================================================
