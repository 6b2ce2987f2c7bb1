use anyhow::{Context, Result};
use serde::Serialize;

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::json_export::types::{Record, RowInput};

pub fn serialize_to_json<T: Serialize>(data: &T) -> Result<String> {
    serde_json::to_string_pretty(data).context("Failed to serialize data to JSON")
}

pub fn write_json_to_file<T: Serialize>(data: &T, path: &Path) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))?;

    let json_string = serialize_to_json(data)?;

    file.write_all(json_string.as_bytes())
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    Ok(())
}

/// Reads a JSON array of objects, keeping each object's key order.
pub fn read_records_file(path: &Path) -> Result<Vec<Record>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    serde_json::from_str(&text)
        .with_context(|| format!("Expected a JSON array of objects in {}", path.display()))
}

/// Parses one JSON row, keeping object key order.
pub fn parse_row(json: &str) -> Result<RowInput> {
    serde_json::from_str(json).context("Expected a JSON array or object")
}
