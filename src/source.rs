//! # Record Sources
//!
//! Loads record collections from local fixtures: a JSON array of objects,
//! or a CSV/TSV file with a header row. Delimited cells are parsed into
//! JSON scalars (numbers and booleans are sniffed) so criteria behave the
//! same over either source.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::Error;
use crate::record::Record;
use crate::Result;

/// Load records from a file, dispatching on its extension (`json`, `csv`,
/// or `tsv`).
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, or the extension
/// is unsupported.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();

    match extension {
        "json" => from_json(&std::fs::read_to_string(path)?),
        "csv" => from_delimited(&std::fs::read_to_string(path)?, b','),
        "tsv" => from_delimited(&std::fs::read_to_string(path)?, b'\t'),
        other => Err(Error::Format(format!("unsupported source extension: {other:?}"))),
    }
}

/// Parse a JSON array of objects into records. Non-object elements are
/// skipped with a warning rather than failing the whole collection.
///
/// # Errors
/// Returns an error if the document is not valid JSON or not an array.
pub fn from_json(json: &str) -> Result<Vec<Record>> {
    let document: Value = serde_json::from_str(json)?;
    let Value::Array(elements) = document else {
        return Err(Error::Format("json source must be an array of objects".to_string()));
    };

    let mut records = Vec::with_capacity(elements.len());
    for element in elements {
        match Record::from_value(element) {
            Some(record) => records.push(record),
            None => warn!("skipping non-object element in json source"),
        }
    }
    Ok(records)
}

/// Parse delimited text with a header row into records.
///
/// # Errors
/// Returns an error if the text cannot be parsed.
pub fn from_delimited(text: &str, delimiter: u8) -> Result<Vec<Record>> {
    let mut reader =
        csv::ReaderBuilder::new().delimiter(delimiter).from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let mut map = Map::new();
        for (header, cell) in headers.iter().zip(row.iter()) {
            map.insert(header.to_string(), sniff_scalar(cell));
        }
        records.push(Record(map));
    }
    Ok(records)
}

// Parse a delimited cell into the narrowest JSON scalar: integer, float,
// boolean, or string.
fn sniff_scalar(cell: &str) -> Value {
    if let Ok(int) = cell.parse::<i64>() {
        return Value::from(int);
    }
    if let Ok(float) = cell.parse::<f64>() {
        if let Some(number) = serde_json::Number::from_f64(float) {
            return Value::Number(number);
        }
    }
    match cell {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(cell.to_string()),
    }
}
