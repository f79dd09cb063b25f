// 🔍 Matching Engine - Pair records across two catalogs
//
// For each record of catalog A (in order), score every record of catalog B:
//   total = 0.5 * name + 0.4 * description + 0.1 * area
// The best B record at or above the threshold is claimed if it is still free.
// Claims are first-come: a later A record never takes over a claimed B record,
// and there is no fallback to its second-best candidate.

use crate::config::{ConfigError, MatchConfig};
use crate::record::Record;
use crate::similarity::{FieldScores, NormalizedFields, Weights};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

pub const NAME_WEIGHT: f64 = 0.5;
pub const DESCRIPTION_WEIGHT: f64 = 0.4;
pub const AREA_WEIGHT: f64 = 0.1;
pub const MATCH_THRESHOLD: f64 = 0.6;

// ============================================================================
// MATCH
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Record from catalog A
    pub a: Record,

    /// Record from catalog B
    pub b: Record,

    /// Composite similarity (0.0 - 1.0)
    pub similarity: f64,

    /// Field scores the composite was built from
    pub scores: FieldScores,
}

impl Match {
    /// Key identifying this pairing, e.g. for attaching comments to it
    pub fn pair_key(&self) -> String {
        format!("{}-{}", self.a.id, self.b.id)
    }

    /// Similarity as a percentage with two decimals (display only)
    pub fn similarity_percent(&self) -> String {
        format!("{:.2}%", self.similarity * 100.0)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} ≈ {} ({}) | name {:.2}, description {:.2}, area {:.2}",
            self.a.name,
            self.b.name,
            self.similarity_percent(),
            self.scores.name,
            self.scores.description,
            self.scores.area
        )
    }
}

// ============================================================================
// MATCH RESULT
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Recorded pairs, in catalog A order
    pub matches: Vec<Match>,

    /// Catalog A records without a match, in catalog A order
    pub unmatched_a: Vec<Record>,

    /// Catalog B records never claimed, in catalog B order
    pub unmatched_b: Vec<Record>,
}

impl MatchResult {
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty() && self.unmatched_a.is_empty() && self.unmatched_b.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} matches, {} unmatched in A, {} unmatched in B",
            self.matches.len(),
            self.unmatched_a.len(),
            self.unmatched_b.len()
        )
    }
}

// ============================================================================
// MATCHING ENGINE
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct MatchingEngine {
    /// Field weights (default: name 0.5, description 0.4, area 0.1)
    pub weights: Weights,

    /// Minimum composite similarity for a candidate (default: 0.6)
    pub threshold: f64,
}

/// Best-scoring B record for one A record
struct Candidate {
    index: usize,
    total: f64,
    scores: FieldScores,
}

impl MatchingEngine {
    /// Create engine with the canonical weights and threshold
    pub fn new() -> Self {
        MatchingEngine {
            weights: Weights::new(NAME_WEIGHT, DESCRIPTION_WEIGHT, AREA_WEIGHT),
            threshold: MATCH_THRESHOLD,
        }
    }

    pub fn with_threshold(threshold: f64) -> Self {
        MatchingEngine {
            threshold,
            ..Self::new()
        }
    }

    pub fn from_config(config: &MatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(MatchingEngine {
            weights: config.weights(),
            threshold: config.threshold,
        })
    }

    /// Pair records of `a` with records of `b`.
    ///
    /// Pure: identical inputs always give an identical result.
    pub fn compute_matches(&self, a: &[Record], b: &[Record]) -> MatchResult {
        // B fields are normalized once and reused for every A record
        let normalized_b: Vec<NormalizedFields> = b.iter().map(normalize_record).collect();

        let mut claimed = vec![false; b.len()];
        let mut matched_a: HashSet<usize> = HashSet::new();
        let mut matches = Vec::new();

        for (i, record_a) in a.iter().enumerate() {
            let fields_a = normalize_record(record_a);

            let best = match self.best_candidate(&fields_a, &normalized_b) {
                Some(c) => c,
                None => continue,
            };

            if claimed[best.index] {
                debug!(
                    a_id = %record_a.id,
                    b_id = %b[best.index].id,
                    similarity = best.total,
                    "best candidate already claimed, leaving record unmatched"
                );
                continue;
            }

            claimed[best.index] = true;
            matched_a.insert(i);

            debug!(
                a_id = %record_a.id,
                b_id = %b[best.index].id,
                similarity = best.total,
                "matched"
            );

            matches.push(Match {
                a: record_a.clone(),
                b: b[best.index].clone(),
                similarity: best.total,
                scores: best.scores,
            });
        }

        let unmatched_a = a
            .iter()
            .enumerate()
            .filter(|(i, _)| !matched_a.contains(i))
            .map(|(_, r)| r.clone())
            .collect();

        let unmatched_b = b
            .iter()
            .zip(&claimed)
            .filter(|(_, taken)| !**taken)
            .map(|(r, _)| r.clone())
            .collect();

        MatchResult {
            matches,
            unmatched_a,
            unmatched_b,
        }
    }

    /// Score one A record against a single B record
    pub fn score(&self, a: &Record, b: &Record) -> (f64, FieldScores) {
        let scores = FieldScores::compare(&normalize_record(a), &normalize_record(b));
        (scores.weighted(&self.weights), scores)
    }

    /// Highest-scoring B record at or above the threshold.
    /// Claimed records take part too; ties go to the earliest B record.
    fn best_candidate(&self, a: &NormalizedFields, bs: &[NormalizedFields]) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;

        for (index, b) in bs.iter().enumerate() {
            let scores = FieldScores::compare(a, b);
            let total = scores.weighted(&self.weights);

            if total < self.threshold {
                continue;
            }

            let better = match &best {
                Some(current) => total > current.total,
                None => true,
            };

            if better {
                best = Some(Candidate {
                    index,
                    total,
                    scores,
                });
            }
        }

        best
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Match two catalogs with the canonical engine
pub fn compute_matches(a: &[Record], b: &[Record]) -> MatchResult {
    MatchingEngine::new().compute_matches(a, b)
}

fn normalize_record(record: &Record) -> NormalizedFields {
    NormalizedFields::new(&record.name, &record.description, &record.area)
}

// ============================================================================
// TESTS
// ============================================================================
