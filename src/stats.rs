// 📊 Match Statistics - Duplicate vs unique counts and percentages

use crate::matching::MatchResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    pub total_a: usize,
    pub total_b: usize,
    pub duplicated_a: usize,
    pub duplicated_b: usize,
    pub unique_a: usize,
    pub unique_b: usize,
    pub duplicated_total: usize,
    pub unique_total: usize,
    pub total: usize,

    /// duplicated_total / total * 100, two decimals
    pub duplicate_percentage: f64,

    /// unique_total / total * 100, two decimals
    pub unique_percentage: f64,

    /// Mean composite similarity over all matches (0.0 when none)
    pub average_similarity: f64,
}

impl MatchStats {
    pub fn from_result(result: &MatchResult) -> Self {
        // Every match holds exactly one record from each side
        let duplicated_a = result.matches.len();
        let duplicated_b = result.matches.len();
        let unique_a = result.unmatched_a.len();
        let unique_b = result.unmatched_b.len();

        let total_a = duplicated_a + unique_a;
        let total_b = duplicated_b + unique_b;
        let total = total_a + total_b;

        let duplicated_total = duplicated_a + duplicated_b;
        let unique_total = unique_a + unique_b;

        let average_similarity = if result.matches.is_empty() {
            0.0
        } else {
            result.matches.iter().map(|m| m.similarity).sum::<f64>() / result.matches.len() as f64
        };

        MatchStats {
            total_a,
            total_b,
            duplicated_a,
            duplicated_b,
            unique_a,
            unique_b,
            duplicated_total,
            unique_total,
            total,
            duplicate_percentage: percentage(duplicated_total, total),
            unique_percentage: percentage(unique_total, total),
            average_similarity,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Duplicates: {:.2}% | Unique: {:.2}% ({} from A + {} from B duplicated, {} records total)",
            self.duplicate_percentage,
            self.unique_percentage,
            self.duplicated_a,
            self.duplicated_b,
            self.total
        )
    }
}

/// `count / total * 100` rounded to two decimals; 0.0 for an empty total
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to(count as f64 / total as f64 * 100.0, 2)
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::Match;
    use crate::record::Record;
    use crate::similarity::FieldScores;

    fn create_test_match(a: i64, b: i64, similarity: f64) -> Match {
        Match {
            a: Record::new(a, "a"),
            b: Record::new(b, "b"),
            similarity,
            scores: FieldScores {
                name: similarity,
                description: similarity,
                area: similarity,
            },
        }
    }

    #[test]
    fn test_stats_from_result() {
        let result = MatchResult {
            matches: vec![create_test_match(1, 10, 0.8), create_test_match(2, 11, 0.7)],
            unmatched_a: vec![Record::new(3, "c")],
            unmatched_b: vec![Record::new(12, "d"), Record::new(13, "e"), Record::new(14, "f")],
        };

        let stats = MatchStats::from_result(&result);

        assert_eq!(stats.total_a, 3);
        assert_eq!(stats.total_b, 5);
        assert_eq!(stats.total, 8);
        assert_eq!(stats.duplicated_total, 4);
        assert_eq!(stats.unique_total, 4);
        assert_eq!(stats.duplicate_percentage, 50.0);
        assert_eq!(stats.unique_percentage, 50.0);
        assert!((stats.average_similarity - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_stats_empty_result() {
        let stats = MatchStats::from_result(&MatchResult::default());

        assert_eq!(stats.total, 0);
        assert_eq!(stats.duplicate_percentage, 0.0);
        assert_eq!(stats.unique_percentage, 0.0);
        assert_eq!(stats.average_similarity, 0.0);
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(2, 3), 66.67);
        assert_eq!(percentage(0, 7), 0.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(12.3456, 2), 12.35);
        assert_eq!(round_to(12.3456, 1), 12.3);
    }

    #[test]
    fn test_summary() {
        let result = MatchResult {
            matches: vec![create_test_match(1, 10, 0.9)],
            unmatched_a: vec![],
            unmatched_b: vec![Record::new(11, "x"), Record::new(12, "y")],
        };

        let summary = MatchStats::from_result(&result).summary();
        assert!(summary.starts_with("Duplicates: 50.00% | Unique: 50.00%"));
    }
}
