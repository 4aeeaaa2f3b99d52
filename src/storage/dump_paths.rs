//! Fixed file names inside the dump directory shared by every job

use std::path::{Path, PathBuf};

pub const IDENTITIES_FILE: &str = "ory_identities.json";
pub const RAW_ACCOUNTS_FILE: &str = "dynamodb_accounts.json";
pub const RAW_REPOSITORIES_FILE: &str = "dynamodb_repositories.json";
pub const RAW_API_KEYS_FILE: &str = "dynamodb_api_keys.json";
pub const ACCOUNTS_FILE: &str = "accounts.json";
pub const REPOSITORIES_FILE: &str = "repositories.json";
pub const API_KEYS_FILE: &str = "api_keys.json";

/// Paths of every hand-off file under one dump directory
///
/// ```
/// use source_migrate::storage::DumpPaths;
///
/// let paths = DumpPaths::new("dump");
/// assert_eq!(paths.identities(), std::path::Path::new("dump/ory_identities.json"));
/// ```
#[derive(Debug, Clone)]
pub struct DumpPaths {
    root: PathBuf,
}

impl DumpPaths {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Export output, transform input: id → identity
    pub fn identities(&self) -> PathBuf {
        self.root.join(IDENTITIES_FILE)
    }

    /// Raw legacy table exports (transform inputs)
    pub fn raw_accounts(&self) -> PathBuf {
        self.root.join(RAW_ACCOUNTS_FILE)
    }

    pub fn raw_repositories(&self) -> PathBuf {
        self.root.join(RAW_REPOSITORIES_FILE)
    }

    pub fn raw_api_keys(&self) -> PathBuf {
        self.root.join(RAW_API_KEYS_FILE)
    }

    /// Transform outputs, load inputs
    pub fn accounts(&self) -> PathBuf {
        self.root.join(ACCOUNTS_FILE)
    }

    pub fn repositories(&self) -> PathBuf {
        self.root.join(REPOSITORIES_FILE)
    }

    pub fn api_keys(&self) -> PathBuf {
        self.root.join(API_KEYS_FILE)
    }
}

impl Default for DumpPaths {
    fn default() -> Self {
        Self::new("dump")
    }
}
