//! Identity map output
//!
//! The export is written as one JSON object keyed by identity id so the
//! transform can look identities up directly.

use crate::etl::Loader;
use crate::storage::write_json;
use eyre::Result;
use owo_colors::OwoColorize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Index identity records by their `id` field
///
/// A later record with the same id replaces the earlier one.
///
/// # Errors
/// Returns an error if a record has no string `id`.
pub fn index_by_id(identities: Vec<Value>) -> Result<Map<String, Value>> {
    let mut index = Map::new();

    for (position, identity) in identities.into_iter().enumerate() {
        let id = identity
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| eyre::eyre!("Identity #{} missing 'id' field", position))?
            .to_string();

        if index.insert(id.clone(), identity).is_some() {
            log::debug!("Duplicate identity '{}', keeping the later record", id);
        }
    }

    Ok(index)
}

/// Loader that writes identities as an id → record JSON object
pub struct IdentityMapWriter {
    path: PathBuf,
}

impl IdentityMapWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl Loader for IdentityMapWriter {
    type Item = Value;

    async fn load(&self, items: Vec<Self::Item>) -> Result<usize> {
        let index = index_by_id(items)?;
        let count = index.len();

        write_json(&self.path, &index)?;
        log::info!(
            "Wrote {} identities to {}",
            count,
            self.path.display().bright_black()
        );

        Ok(count)
    }
}
