// 🧠 Match Cache - Recompute only when the inputs change
//
// A result is a pure function of (engine, A, B), so it can be reused for as
// long as the content hash of those three stays the same.

use crate::matching::{MatchResult, MatchingEngine};
use crate::record::{Record, RecordId};
use sha2::{Digest, Sha256};

/// Hex SHA-256 over the engine parameters and both collections
pub fn content_hash(engine: &MatchingEngine, a: &[Record], b: &[Record]) -> String {
    let mut hasher = Sha256::new();

    for param in [
        engine.weights.name,
        engine.weights.description,
        engine.weights.area,
        engine.threshold,
    ] {
        hasher.update(param.to_bits().to_le_bytes());
    }

    hash_collection(&mut hasher, a);
    hash_collection(&mut hasher, b);

    format!("{:x}", hasher.finalize())
}

fn hash_collection(hasher: &mut Sha256, records: &[Record]) {
    hasher.update((records.len() as u64).to_le_bytes());

    for record in records {
        match &record.id {
            RecordId::Int(n) => {
                hasher.update([0u8]);
                hasher.update(n.to_le_bytes());
            }
            RecordId::Text(s) => {
                hasher.update([1u8]);
                hash_str(hasher, s);
            }
        }
        hash_str(hasher, &record.name);
        hash_str(hasher, &record.description);
        hash_str(hasher, &record.area);
    }
}

// Length prefix keeps ("ab", "c") and ("a", "bc") apart
fn hash_str(hasher: &mut Sha256, s: &str) {
    hasher.update((s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

// ============================================================================
// MATCH CACHE
// ============================================================================

/// Last-result cache owned by the caller. Holds one entry: the result for
/// the most recent inputs.
#[derive(Debug, Clone)]
pub struct MatchCache {
    engine: MatchingEngine,
    entry: Option<(String, MatchResult)>,
    hits: u64,
    misses: u64,
}

impl MatchCache {
    pub fn new(engine: MatchingEngine) -> Self {
        MatchCache {
            engine,
            entry: None,
            hits: 0,
            misses: 0,
        }
    }

    /// Cached result for these inputs, computing it if they changed
    pub fn get_or_compute(&mut self, a: &[Record], b: &[Record]) -> &MatchResult {
        let key = content_hash(&self.engine, a, b);

        let fresh = matches!(&self.entry, Some((cached_key, _)) if *cached_key == key);
        if fresh {
            self.hits += 1;
        } else {
            self.misses += 1;
            self.entry = None;
        }

        let engine = &self.engine;
        let (_, result) = self
            .entry
            .get_or_insert_with(|| (key, engine.compute_matches(a, b)));
        result
    }

    pub fn engine(&self) -> &MatchingEngine {
        &self.engine
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

impl Default for MatchCache {
    fn default() -> Self {
        Self::new(MatchingEngine::new())
    }
}

// ============================================================================
// TESTS
// ============================================================================
