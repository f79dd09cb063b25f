// 📚 Catalog - Validated collection of records from one institution
//
// This is the collection boundary: raw records from any source are checked
// here and malformed ones are skipped (logged and counted), so the matching
// engine only ever sees well-formed records.

use crate::record::{RawRecord, Record, RecordError, RecordId};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

#[cfg(feature = "sqlite")]
use rusqlite::{types::ValueRef, Connection};

// ============================================================================
// SKIPPED RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// Position of the record in the source (0-based)
    pub position: usize,

    pub error: RecordError,
}

// ============================================================================
// CATALOG
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Display label, e.g. the owning institution
    pub label: String,

    /// Valid records, in source order
    pub records: Vec<Record>,

    /// Records rejected at the boundary
    pub skipped: Vec<SkippedRecord>,
}

impl Catalog {
    pub fn new(label: &str, records: Vec<Record>) -> Self {
        Catalog {
            label: label.to_string(),
            records,
            skipped: Vec::new(),
        }
    }

    /// Validate raw records. Invalid records and repeated ids are skipped;
    /// the first record with a given id wins.
    pub fn from_raw(label: &str, raws: Vec<RawRecord>) -> Self {
        let mut records = Vec::with_capacity(raws.len());
        let mut skipped = Vec::new();
        let mut seen: HashSet<RecordId> = HashSet::new();

        for (position, raw) in raws.into_iter().enumerate() {
            let result = Record::from_raw(raw).and_then(|record| {
                if seen.insert(record.id.clone()) {
                    Ok(record)
                } else {
                    Err(RecordError::DuplicateId { id: record.id })
                }
            });

            match result {
                Ok(record) => records.push(record),
                Err(error) => {
                    warn!(catalog = label, position, %error, "skipping record");
                    skipped.push(SkippedRecord { position, error });
                }
            }
        }

        Catalog {
            label: label.to_string(),
            records,
            skipped,
        }
    }

    /// Load and validate a catalog from a source path (see `load_source`)
    pub fn load(label: &str, source: &str) -> Result<Self> {
        let raws = load_source(source)?;
        let catalog = Catalog::from_raw(label, raws);
        info!(
            catalog = label,
            source,
            records = catalog.records.len(),
            skipped = catalog.skipped.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

// ============================================================================
// LOADERS
// ============================================================================

/// Load raw records from a JSON file holding an array of objects
pub fn load_json(path: &Path) -> Result<Vec<RawRecord>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON file {}", path.display()))?;
    let raws: Vec<RawRecord> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse JSON records in {}", path.display()))?;
    Ok(raws)
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default, alias = "_id")]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    area: Option<String>,
}

/// Load raw records from a CSV file with `id`, `name`, `description`, `area`
/// headers. Empty cells are treated as absent.
pub fn load_csv(path: &Path) -> Result<Vec<RawRecord>> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open CSV file {}", path.display()))?;

    let mut raws = Vec::new();

    for result in rdr.deserialize() {
        let row: CsvRow = result.context("Failed to deserialize CSV record")?;
        raws.push(RawRecord::from_text(
            non_empty(row.id),
            non_empty(row.name),
            row.description,
            row.area,
        ));
    }

    Ok(raws)
}

/// Load raw records from a SQLite table with `id`, `name`, `description`,
/// `area` columns. Read-only.
#[cfg(feature = "sqlite")]
pub fn load_sqlite(conn: &Connection, table: &str) -> Result<Vec<RawRecord>> {
    if !is_identifier(table) {
        bail!("Invalid table name: {:?}", table);
    }

    let sql = format!("SELECT id, name, description, area FROM {}", table);
    let mut stmt = conn
        .prepare(&sql)
        .with_context(|| format!("Failed to query table {}", table))?;

    let rows = stmt.query_map([], |row| {
        Ok(RawRecord {
            id: Some(sql_to_json(row.get_ref(0)?)),
            name: Some(sql_to_json(row.get_ref(1)?)),
            description: Some(sql_to_json(row.get_ref(2)?)),
            area: Some(sql_to_json(row.get_ref(3)?)),
        })
    })?;

    let mut raws = Vec::new();
    for row in rows {
        raws.push(row.context("Failed to read SQLite row")?);
    }

    Ok(raws)
}

#[cfg(feature = "sqlite")]
fn sql_to_json(value: ValueRef<'_>) -> serde_json::Value {
    use serde_json::Value;

    match value {
        ValueRef::Null | ValueRef::Blob(_) => Value::Null,
        ValueRef::Integer(n) => Value::from(n),
        ValueRef::Real(f) => Value::from(f),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
    }
}

/// Load raw records from a source path:
/// - `path.json` / `path.csv`
/// - `path.db#table` (also `.sqlite`, `.sqlite3`)
///
/// A `#` elsewhere in the path is part of the file name.
pub fn load_source(source: &str) -> Result<Vec<RawRecord>> {
    let (path, table) = match source.rsplit_once('#') {
        Some((path, table)) if is_sqlite_extension(&extension_of(Path::new(path))) => {
            (Path::new(path), Some(table))
        }
        _ => (Path::new(source), None),
    };
    let extension = extension_of(path);

    match extension.as_str() {
        "json" => load_json(path),
        "csv" => load_csv(path),
        ext if is_sqlite_extension(ext) => load_sqlite_source(path, table),
        other => bail!(
            "Unsupported catalog source {:?} (extension {:?}); expected .json, .csv or .db#table",
            source,
            other
        ),
    }
}

#[cfg(feature = "sqlite")]
fn load_sqlite_source(path: &Path, table: Option<&str>) -> Result<Vec<RawRecord>> {
    use rusqlite::OpenFlags;

    let table = table.context("SQLite sources need a table: path.db#table")?;
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .with_context(|| format!("Failed to open SQLite database {}", path.display()))?;
    load_sqlite(&conn, table)
}

#[cfg(not(feature = "sqlite"))]
fn load_sqlite_source(path: &Path, _table: Option<&str>) -> Result<Vec<RawRecord>> {
    bail!(
        "Cannot read {}: rebuild with the `sqlite` feature",
        path.display()
    )
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

fn is_sqlite_extension(extension: &str) -> bool {
    matches!(extension, "db" | "sqlite" | "sqlite3")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(feature = "sqlite")]
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// ============================================================================
// TESTS
// ============================================================================
