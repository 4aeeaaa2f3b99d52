//! Target table definitions

use serde_json::Value;
use thiserror::Error;

/// Name and primary key of one target table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    pub name: &'static str,
    pub partition_key: &'static str,
    pub sort_key: Option<&'static str>,
}

pub const ACCOUNTS_TABLE: TableSpec = TableSpec {
    name: "source-cooperative-accounts",
    partition_key: "account_id",
    sort_key: None,
};

pub const REPOSITORIES_TABLE: TableSpec = TableSpec {
    name: "source-cooperative-repositories",
    partition_key: "account_id",
    sort_key: Some("repository_id"),
};

pub const API_KEYS_TABLE: TableSpec = TableSpec {
    name: "source-cooperative-api-keys",
    partition_key: "access_key_id",
    sort_key: None,
};

/// Every table the migration writes, in load order
pub const TABLES: [TableSpec; 3] = [ACCOUNTS_TABLE, REPOSITORIES_TABLE, API_KEYS_TABLE];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("record for table '{table}' is not a JSON object")]
    NotAnObject { table: &'static str },

    #[error("record for table '{table}' is missing key attribute '{key}'")]
    MissingKey {
        table: &'static str,
        key: &'static str,
    },

    #[error("key attribute '{key}' for table '{table}' must be a non-empty string")]
    InvalidKey {
        table: &'static str,
        key: &'static str,
    },
}

impl TableSpec {
    /// Key attribute names, partition key first
    pub fn key_attributes(&self) -> Vec<&'static str> {
        std::iter::once(self.partition_key)
            .chain(self.sort_key)
            .collect()
    }

    /// Check that a record carries every key attribute as a non-empty string
    pub fn check_keys(&self, record: &Value) -> Result<(), LoadError> {
        let obj = record
            .as_object()
            .ok_or(LoadError::NotAnObject { table: self.name })?;

        for key in self.key_attributes() {
            match obj.get(key) {
                None | Some(Value::Null) => {
                    return Err(LoadError::MissingKey {
                        table: self.name,
                        key,
                    });
                }
                Some(Value::String(s)) if !s.is_empty() => {}
                Some(_) => {
                    return Err(LoadError::InvalidKey {
                        table: self.name,
                        key,
                    });
                }
            }
        }

        Ok(())
    }

    /// Human-readable key description for a record, used in logs
    pub fn describe_key(&self, record: &Value) -> String {
        self.key_attributes()
            .iter()
            .map(|key| format!("{}={}", key, record.get(*key).unwrap_or(&Value::Null)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_attributes() {
        assert_eq!(ACCOUNTS_TABLE.key_attributes(), vec!["account_id"]);
        assert_eq!(
            REPOSITORIES_TABLE.key_attributes(),
            vec!["account_id", "repository_id"]
        );
    }

    #[test]
    fn test_check_keys() {
        assert!(
            REPOSITORIES_TABLE
                .check_keys(&json!({"account_id": "radiant", "repository_id": "landcover"}))
                .is_ok()
        );
        assert_eq!(
            REPOSITORIES_TABLE.check_keys(&json!({"account_id": "radiant"})),
            Err(LoadError::MissingKey {
                table: "source-cooperative-repositories",
                key: "repository_id"
            })
        );
        assert_eq!(
            API_KEYS_TABLE.check_keys(&json!({"access_key_id": 7})),
            Err(LoadError::InvalidKey {
                table: "source-cooperative-api-keys",
                key: "access_key_id"
            })
        );
        assert_eq!(
            ACCOUNTS_TABLE.check_keys(&json!([])),
            Err(LoadError::NotAnObject {
                table: "source-cooperative-accounts"
            })
        );
    }

    #[test]
    fn test_describe_key() {
        let record = json!({"account_id": "radiant", "repository_id": "landcover"});
        assert_eq!(
            REPOSITORIES_TABLE.describe_key(&record),
            r#"account_id="radiant", repository_id="landcover""#
        );
    }
}
