// Catalog Match - Core Library
// Fuzzy deduplication of two institutional catalogs of functions/services

pub mod normalizer;
pub mod similarity;
pub mod record;
pub mod matching;
pub mod config;
pub mod catalog;
pub mod memo;
pub mod stats;
pub mod filter;
pub mod report;

// Re-export commonly used types
pub use normalizer::{normalize, normalize_opt};
pub use similarity::{similarity, normalized_similarity, FieldScores, NormalizedFields, Weights};
pub use record::{RawRecord, Record, RecordError, RecordId};
pub use matching::{
    compute_matches, Match, MatchResult, MatchingEngine,
    AREA_WEIGHT, DESCRIPTION_WEIGHT, MATCH_THRESHOLD, NAME_WEIGHT,
};
pub use config::{ConfigError, MatchConfig};
pub use catalog::{load_csv, load_json, load_source, Catalog, SkippedRecord};
#[cfg(feature = "sqlite")]
pub use catalog::load_sqlite;
pub use memo::{content_hash, MatchCache};
pub use stats::{percentage, round_to, MatchStats};
pub use filter::{distinct_areas, match_areas, MatchFilter};
pub use report::{MatchReport, ReportRow, RowKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
