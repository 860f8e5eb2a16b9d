//! Upload parsing - tabular files into row sets
//!
//! Supported inputs:
//! - CSV with a header row (`.csv`)
//! - JSON array of flat objects (`.json`)
//!
//! Empty CSV cells and JSON nulls both become SQL NULL.

use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use csv::ReaderBuilder;
use rusqlite::types::Value;
use serde::Serialize;
use crate::{Error, Result};

/// File format of an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadFormat {
    Csv,
    Json,
}

impl UploadFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadFormat::Csv => "csv",
            UploadFormat::Json => "json",
        }
    }

    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        ext.parse().map_err(|_| {
            Error::Upload(format!(
                "unsupported file type '{}' for {} (expected .csv or .json)",
                ext,
                path.display()
            ))
        })
    }
}

impl FromStr for UploadFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" | "text/csv" => Ok(UploadFormat::Csv),
            "json" | "application/json" => Ok(UploadFormat::Json),
            other => Err(Error::Upload(format!("unsupported upload format: {}", other))),
        }
    }
}

/// A header plus rows of SQL values, ready for `bulk_insert`
#[derive(Debug, Clone, PartialEq)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl RowSet {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    /// Append a row; it must be as wide as the header
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::Upload(format!(
                "row {} has {} values, header has {}",
                self.rows.len() + 1,
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First `n` rows as JSON, for previews
    pub fn preview(&self, n: usize) -> Vec<Vec<serde_json::Value>> {
        self.rows
            .iter()
            .take(n)
            .map(|row| row.iter().map(crate::storage::sqlite::owned_value_to_json).collect())
            .collect()
    }
}

/// Read and parse an upload file, choosing the format by extension
pub fn read_file(path: &Path) -> Result<RowSet> {
    let format = UploadFormat::from_path(path)?;
    let bytes = std::fs::read(path)?;
    tracing::debug!("parsing {} ({} bytes) as {}", path.display(), bytes.len(), format.as_str());
    parse(format, &bytes)
}

/// Parse upload bytes in the given format
pub fn parse(format: UploadFormat, bytes: &[u8]) -> Result<RowSet> {
    match format {
        UploadFormat::Csv => parse_csv(bytes),
        UploadFormat::Json => parse_json(bytes),
    }
}

/// Parse CSV with a header row. Every record must match the header width.
pub fn parse_csv<R: Read>(reader: R) -> Result<RowSet> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let columns = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect::<Vec<_>>();
    if columns.iter().all(|c| c.is_empty()) {
        return Err(Error::Upload("CSV header is empty".into()));
    }

    let mut set = RowSet::new(columns);
    for record in reader.records() {
        let record = record?;
        let row = record
            .iter()
            .map(|field| {
                if field.trim().is_empty() {
                    Value::Null
                } else {
                    Value::Text(field.to_string())
                }
            })
            .collect();
        set.push_row(row)?;
    }
    Ok(set)
}

/// Parse a JSON array of objects. All objects must share the first one's keys.
pub fn parse_json(bytes: &[u8]) -> Result<RowSet> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    let items = value
        .as_array()
        .ok_or_else(|| Error::Upload("JSON upload must be an array of objects".into()))?;

    let Some(first) = items.first() else {
        return Err(Error::Upload("JSON upload contains no rows".into()));
    };
    let columns: Vec<String> = first
        .as_object()
        .ok_or_else(|| Error::Upload("row 1 is not an object".into()))?
        .keys()
        .cloned()
        .collect();

    let mut set = RowSet::new(columns);
    for (i, item) in items.iter().enumerate() {
        let object = item
            .as_object()
            .ok_or_else(|| Error::Upload(format!("row {} is not an object", i + 1)))?;
        if object.len() != set.columns.len() || !set.columns.iter().all(|c| object.contains_key(c)) {
            let mut keys: Vec<&String> = object.keys().collect();
            keys.sort();
            return Err(Error::Upload(format!(
                "row {} has columns {:?}, expected {:?}",
                i + 1,
                keys,
                set.columns
            )));
        }
        let row = set.columns.iter().map(|c| json_to_value(&object[c])).collect();
        set.push_row(row)?;
    }
    Ok(set)
}

fn json_to_value(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Integer(i64::from(*b)),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => n.as_f64().map(Value::Real).unwrap_or(Value::Null),
        },
        serde_json::Value::String(s) if s.is_empty() => Value::Null,
        serde_json::Value::String(s) => Value::Text(s.clone()),
        nested => Value::Text(nested.to_string()),
    }
}
