// 📋 Match Report - Results, statistics and skips for one matching run
//
// Exports keep every record field and the raw similarity float, so a report
// can be re-read or re-rendered without loss.

use crate::catalog::{Catalog, SkippedRecord};
use crate::config::MatchConfig;
use crate::matching::{Match, MatchResult, MatchingEngine};
use crate::record::Record;
use crate::stats::MatchStats;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use uuid::Uuid;

// ============================================================================
// MATCH REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub report_id: String,
    pub generated_at: DateTime<Utc>,
    pub label_a: String,
    pub label_b: String,
    pub config: MatchConfig,
    pub stats: MatchStats,
    pub skipped_a: Vec<SkippedRecord>,
    pub skipped_b: Vec<SkippedRecord>,
    pub result: MatchResult,
}

impl MatchReport {
    pub fn new(label_a: &str, label_b: &str, config: MatchConfig, result: MatchResult) -> Self {
        MatchReport {
            report_id: Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            label_a: label_a.to_string(),
            label_b: label_b.to_string(),
            config,
            stats: MatchStats::from_result(&result),
            skipped_a: Vec::new(),
            skipped_b: Vec::new(),
            result,
        }
    }

    /// Match two validated catalogs and wrap the outcome in a report
    pub fn run(engine: &MatchingEngine, a: &Catalog, b: &Catalog) -> Self {
        let config = MatchConfig {
            name_weight: engine.weights.name,
            description_weight: engine.weights.description,
            area_weight: engine.weights.area,
            threshold: engine.threshold,
        };

        let result = engine.compute_matches(&a.records, &b.records);

        let mut report = MatchReport::new(&a.label, &b.label, config, result);
        report.skipped_a = a.skipped.clone();
        report.skipped_b = b.skipped.clone();
        report
    }

    pub fn summary(&self) -> String {
        format!(
            "{} vs {}: {} | {} | skipped {} + {}",
            self.label_a,
            self.label_b,
            self.result.summary(),
            self.stats.summary(),
            self.skipped_a.len(),
            self.skipped_b.len()
        )
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize match report")
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))
    }

    /// Write one CSV row per match and per unmatched record
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);

        for row in self.rows() {
            wtr.serialize(row).context("Failed to write CSV row")?;
        }

        wtr.flush().context("Failed to flush CSV output")?;
        Ok(())
    }

    pub fn export_csv(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create CSV file {}", path.display()))?;
        self.write_csv(file)
    }

    fn rows(&self) -> Vec<ReportRow> {
        let matched = self.result.matches.iter().map(ReportRow::from_match);
        let only_a = self
            .result
            .unmatched_a
            .iter()
            .map(|r| ReportRow::unmatched(RowKind::UnmatchedA, Some(r), None));
        let only_b = self
            .result
            .unmatched_b
            .iter()
            .map(|r| ReportRow::unmatched(RowKind::UnmatchedB, None, Some(r)));

        matched.chain(only_a).chain(only_b).collect()
    }
}

// ============================================================================
// CSV ROW
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Match,
    UnmatchedA,
    UnmatchedB,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub kind: RowKind,
    pub a_id: String,
    pub a_name: String,
    pub a_description: String,
    pub a_area: String,
    pub b_id: String,
    pub b_name: String,
    pub b_description: String,
    pub b_area: String,
    pub similarity: Option<f64>,
}

impl ReportRow {
    fn from_match(m: &Match) -> Self {
        let mut row = ReportRow::unmatched(RowKind::Match, Some(&m.a), Some(&m.b));
        row.similarity = Some(m.similarity);
        row
    }

    fn unmatched(kind: RowKind, a: Option<&Record>, b: Option<&Record>) -> Self {
        let (a_id, a_name, a_description, a_area) = record_cells(a);
        let (b_id, b_name, b_description, b_area) = record_cells(b);

        ReportRow {
            kind,
            a_id,
            a_name,
            a_description,
            a_area,
            b_id,
            b_name,
            b_description,
            b_area,
            similarity: None,
        }
    }
}

fn record_cells(record: Option<&Record>) -> (String, String, String, String) {
    match record {
        Some(r) => (
            r.id.to_string(),
            r.name.clone(),
            r.description.clone(),
            r.area.clone(),
        ),
        None => Default::default(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
