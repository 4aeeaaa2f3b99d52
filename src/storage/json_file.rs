//! Plain JSON dump files
//!
//! Dump files are human-inspected between migration steps, so they are
//! written indented (four spaces) with a trailing newline.

use crate::etl::{Extractor, Loader};
use eyre::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Serialize a value to an indented JSON file, creating parent directories
pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value
        .serialize(&mut serializer)
        .with_context(|| format!("Failed to serialize JSON for {}", path.display()))?;
    buffer.push(b'\n');

    std::fs::write(path, buffer)
        .with_context(|| format!("Failed to write JSON file: {}", path.display()))?;
    Ok(())
}

/// Read and deserialize a JSON file
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON file: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON: {}", path.display()))
}

/// Read a JSON array of records from a file
pub struct JsonArrayReader {
    path: PathBuf,
}

impl JsonArrayReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read all records
    pub fn read(&self) -> Result<Vec<Value>> {
        read_json(&self.path)
            .with_context(|| format!("Expected a JSON array in {}", self.path.display()))
    }
}

impl Extractor for JsonArrayReader {
    type Item = Value;

    async fn extract(&self) -> Result<Vec<Self::Item>> {
        self.read()
    }
}

/// Write records to a file as one JSON array
pub struct JsonArrayWriter {
    path: PathBuf,
}

impl JsonArrayWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Write all records, replacing any previous file
    pub fn write(&self, items: &[Value]) -> Result<()> {
        write_json(&self.path, items)
    }
}

impl Loader for JsonArrayWriter {
    type Item = Value;

    async fn load(&self, items: Vec<Self::Item>) -> Result<usize> {
        self.write(&items)?;
        Ok(items.len())
    }
}
