// 📇 Record - One catalog entry (function or service)
//
// Raw input shapes vary by source (JSON, CSV, SQLite, MongoDB exports), so
// loaders produce `RawRecord` and the catalog boundary converts it into a
// typed `Record` with `Record::from_raw`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

// ============================================================================
// RECORD ID
// ============================================================================

/// Opaque identifier assigned by the external data store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{}", n),
            RecordId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Int(n)
    }
}

impl From<i32> for RecordId {
    fn from(n: i32) -> Self {
        RecordId::Int(n as i64)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::Text(s)
    }
}

// ============================================================================
// RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,

    /// Primary match signal
    pub name: String,

    /// Secondary match signal (may be empty)
    #[serde(default)]
    pub description: String,

    /// Tertiary match signal (may be empty)
    #[serde(default)]
    pub area: String,
}

impl Record {
    pub fn new(id: impl Into<RecordId>, name: &str) -> Self {
        Record {
            id: id.into(),
            name: name.to_string(),
            description: String::new(),
            area: String::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_area(mut self, area: &str) -> Self {
        self.area = area.to_string();
        self
    }

    /// Convert a loosely-typed record into a typed one.
    ///
    /// `id` and `name` are required. Non-string `description`/`area`
    /// values are coerced to the empty string.
    pub fn from_raw(raw: RawRecord) -> Result<Record, RecordError> {
        let id = parse_id(raw.id.as_ref())?;

        let name = match raw.name {
            None | Some(Value::Null) => return Err(RecordError::MissingName { id }),
            Some(Value::String(s)) => s,
            Some(other) => {
                return Err(RecordError::InvalidName {
                    id,
                    kind: value_kind(&other),
                })
            }
        };

        Ok(Record {
            id,
            name,
            description: coerce_text(raw.description),
            area: coerce_text(raw.area),
        })
    }
}

// ============================================================================
// RAW RECORD (as delivered by a data source)
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default, alias = "_id")]
    pub id: Option<Value>,

    #[serde(default)]
    pub name: Option<Value>,

    #[serde(default)]
    pub description: Option<Value>,

    #[serde(default)]
    pub area: Option<Value>,
}

impl RawRecord {
    /// Raw record from optional text cells (CSV, SQLite text columns)
    pub fn from_text(
        id: Option<String>,
        name: Option<String>,
        description: Option<String>,
        area: Option<String>,
    ) -> Self {
        RawRecord {
            id: id.map(Value::String),
            name: name.map(Value::String),
            description: description.map(Value::String),
            area: area.map(Value::String),
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

/// Per-record shape error. Never fatal for a whole computation.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum RecordError {
    #[error("record has no id")]
    MissingId,

    #[error("record id must be a string or integer, got {kind}")]
    InvalidId { kind: String },

    #[error("record {id} has no name")]
    MissingName { id: RecordId },

    #[error("record {id} name must be a string, got {kind}")]
    InvalidName { id: RecordId, kind: String },

    #[error("record id {id} already used by an earlier record")]
    DuplicateId { id: RecordId },
}

fn parse_id(value: Option<&Value>) -> Result<RecordId, RecordError> {
    match value {
        None | Some(Value::Null) => Err(RecordError::MissingId),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Err(RecordError::MissingId)
            } else {
                Ok(RecordId::Text(trimmed.to_string()))
            }
        }
        Some(Value::Number(n)) => n.as_i64().map(RecordId::Int).ok_or_else(|| {
            RecordError::InvalidId {
                kind: "non-integer number".to_string(),
            }
        }),
        // MongoDB extended JSON: {"$oid": "65f0..."}
        Some(Value::Object(map)) => match map.get("$oid") {
            Some(oid) => parse_id(Some(oid)),
            None => Err(RecordError::InvalidId {
                kind: "object".to_string(),
            }),
        },
        Some(other) => Err(RecordError::InvalidId {
            kind: value_kind(other),
        }),
    }
}

fn coerce_text(value: Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => s,
        _ => String::new(),
    }
}

fn value_kind(value: &Value) -> String {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
    .to_string()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_from_raw_complete_record() {
        let record = Record::from_raw(raw(json!({
            "id": 1,
            "name": "Atención a población vulnerable",
            "description": "Brinda apoyo social",
            "area": "Salud"
        })))
        .unwrap();

        assert_eq!(record.id, RecordId::Int(1));
        assert_eq!(record.name, "Atención a población vulnerable");
        assert_eq!(record.description, "Brinda apoyo social");
        assert_eq!(record.area, "Salud");
    }

    #[test]
    fn test_from_raw_mongo_id() {
        let record = Record::from_raw(raw(json!({
            "_id": {"$oid": "65f0c0ffee"},
            "name": "Vacunación infantil"
        })))
        .unwrap();

        assert_eq!(record.id, RecordId::Text("65f0c0ffee".to_string()));
        assert_eq!(record.description, "");
        assert_eq!(record.area, "");
    }

    #[test]
    fn test_from_raw_coerces_non_string_optional_fields() {
        let record = Record::from_raw(raw(json!({
            "id": "a-1",
            "name": "Recolección de basura",
            "description": 42,
            "area": ["Limpia"]
        })))
        .unwrap();

        assert_eq!(record.description, "");
        assert_eq!(record.area, "");
    }

    #[test]
    fn test_from_raw_missing_id() {
        let err = Record::from_raw(raw(json!({"name": "Sin id"}))).unwrap_err();
        assert_eq!(err, RecordError::MissingId);

        let err = Record::from_raw(raw(json!({"id": "   ", "name": "Blank"}))).unwrap_err();
        assert_eq!(err, RecordError::MissingId);
    }

    #[test]
    fn test_from_raw_invalid_id() {
        let err = Record::from_raw(raw(json!({"id": 1.5, "name": "x"}))).unwrap_err();
        assert!(matches!(err, RecordError::InvalidId { .. }));

        let err = Record::from_raw(raw(json!({"id": true, "name": "x"}))).unwrap_err();
        assert_eq!(
            err,
            RecordError::InvalidId {
                kind: "boolean".to_string()
            }
        );
    }

    #[test]
    fn test_from_raw_missing_name() {
        let err = Record::from_raw(raw(json!({"id": 3, "name": null}))).unwrap_err();
        assert_eq!(err, RecordError::MissingName { id: RecordId::Int(3) });
    }

    #[test]
    fn test_from_raw_invalid_name() {
        let err = Record::from_raw(raw(json!({"id": 3, "name": 7}))).unwrap_err();
        assert_eq!(
            err,
            RecordError::InvalidName {
                id: RecordId::Int(3),
                kind: "number".to_string()
            }
        );
    }

    #[test]
    fn test_record_id_display_and_serde() {
        assert_eq!(RecordId::Int(9).to_string(), "9");
        assert_eq!(RecordId::from("abc").to_string(), "abc");
        assert_eq!(serde_json::to_value(RecordId::Int(9)).unwrap(), json!(9));
        assert_eq!(serde_json::to_value(RecordId::from("x")).unwrap(), json!("x"));
    }

    #[test]
    fn test_error_messages() {
        let err = RecordError::MissingName { id: RecordId::Int(4) };
        assert_eq!(err.to_string(), "record 4 has no name");
    }
}
