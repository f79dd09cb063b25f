// 📏 Similarity - Bigram Dice comparator and per-field scores

use crate::normalizer::normalize;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sørensen-Dice coefficient over character bigrams, whitespace ignored.
///
/// Symmetric, in [0, 1]. Equal strings score 1.0, and that includes two
/// empty strings: two records that both lack a description get a full
/// description score. Unequal strings shorter than two characters score 0.0.
///
/// Lengths and bigrams are counted in `char`s, so letters outside ASCII
/// weigh the same as ASCII ones.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().filter(|c| !c.is_whitespace()).collect();
    let b: Vec<char> = b.chars().filter(|c| !c.is_whitespace()).collect();

    if a == b {
        return 1.0;
    }
    if a.len() < 2 || b.len() < 2 {
        return 0.0;
    }

    let mut a_bigrams: HashMap<(char, char), usize> = HashMap::new();
    for pair in a.windows(2) {
        *a_bigrams.entry((pair[0], pair[1])).or_insert(0) += 1;
    }

    // Each bigram of `a` can be shared at most as many times as it occurs
    let mut intersection = 0;
    for pair in b.windows(2) {
        if let Some(count) = a_bigrams.get_mut(&(pair[0], pair[1])) {
            if *count > 0 {
                *count -= 1;
                intersection += 1;
            }
        }
    }

    (2 * intersection) as f64 / (a.len() + b.len() - 2) as f64
}

/// Similarity of two raw strings after normalizing both
pub fn normalized_similarity(a: &str, b: &str) -> f64 {
    similarity(&normalize(a), &normalize(b))
}

// ============================================================================
// FIELD WEIGHTS
// ============================================================================

/// Relative weight of each record field in the composite score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub name: f64,
    pub description: f64,
    pub area: f64,
}

impl Weights {
    pub fn new(name: f64, description: f64, area: f64) -> Self {
        Weights {
            name,
            description,
            area,
        }
    }

    pub fn sum(&self) -> f64 {
        self.name + self.description + self.area
    }
}

// ============================================================================
// FIELD SCORES
// ============================================================================

/// Per-field similarity of two records
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldScores {
    pub name: f64,
    pub description: f64,
    pub area: f64,
}

impl FieldScores {
    /// Compare already-normalized fields
    pub fn compare(a: &NormalizedFields, b: &NormalizedFields) -> Self {
        FieldScores {
            name: similarity(&a.name, &b.name),
            description: similarity(&a.description, &b.description),
            area: similarity(&a.area, &b.area),
        }
    }

    /// Composite score: weighted sum of the three field scores
    pub fn weighted(&self, weights: &Weights) -> f64 {
        self.name * weights.name
            + self.description * weights.description
            + self.area * weights.area
    }
}

/// Normalized name/description/area of one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedFields {
    pub name: String,
    pub description: String,
    pub area: String,
}

impl NormalizedFields {
    pub fn new(name: &str, description: &str, area: &str) -> Self {
        NormalizedFields {
            name: normalize(name),
            description: normalize(description),
            area: normalize(area),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings() {
        assert_eq!(similarity("salud", "salud"), 1.0);
    }

    #[test]
    fn test_both_empty_is_full_score() {
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn test_one_empty_is_zero() {
        assert_eq!(similarity("salud", ""), 0.0);
        assert_eq!(similarity("", "salud"), 0.0);
    }

    #[test]
    fn test_disjoint_strings() {
        assert_eq!(similarity("limpia", "salud"), 0.0);
    }

    #[test]
    fn test_single_char_strings() {
        assert_eq!(similarity("a", "b"), 0.0);
        assert_eq!(similarity("a", "a"), 1.0);
    }

    #[test]
    fn test_symmetric() {
        let ab = similarity("brinda apoyo social", "brinda apoyo social a vulnerables");
        let ba = similarity("brinda apoyo social a vulnerables", "brinda apoyo social");
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_whitespace_ignored() {
        // "brindaapoyosocial" bigrams are all contained in the longer string
        let score = similarity("brinda apoyo social", "brinda apoyo social a vulnerables");
        assert!((score - 32.0 / 44.0).abs() < 1e-9);
        assert_eq!(similarity("salud publica", "saludpublica"), 1.0);
    }

    #[test]
    fn test_repeated_bigrams_counted_once_each() {
        // "aaaa" has 3 "aa" bigrams, "aa" has one: 2*1 / (4 + 2 - 2)
        assert!((similarity("aaaa", "aa") - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_non_ascii_letters_count_as_one_char() {
        // 5 shared bigrams over 6 + 7 chars: 2*5 / (6 + 7 - 2)
        let cyrillic = similarity("привет", "приветы");
        assert!((cyrillic - 10.0 / 11.0).abs() < 1e-9);
        assert!((cyrillic - similarity("privet", "privety")).abs() < 1e-9);

        // st, tr, ra shared: 2*3 / (6 + 7 - 2)
        assert!((similarity("straße", "strasse") - 6.0 / 11.0).abs() < 1e-9);
        assert_eq!(similarity("ø", "o"), 0.0);
    }

    #[test]
    fn test_normalized_similarity() {
        assert_eq!(normalized_similarity(" Salud   Pública! ", "salud publica"), 1.0);
    }

    #[test]
    fn test_weighted_composite() {
        let scores = FieldScores {
            name: 1.0,
            description: 0.5,
            area: 0.0,
        };
        let weights = Weights::new(0.5, 0.4, 0.1);
        assert!((scores.weighted(&weights) - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_compare_normalized_fields() {
        let a = NormalizedFields::new("Vacunación infantil", "", "Salud");
        let b = NormalizedFields::new("vacunacion  infantil!", "", "SALUD");
        let scores = FieldScores::compare(&a, &b);
        assert_eq!(scores.name, 1.0);
        assert_eq!(scores.description, 1.0);
        assert_eq!(scores.area, 1.0);
    }
}
