//! DynamoDB table loader
//!
//! Puts every record into its table with one unconditional PutItem each.

use super::TableSpec;
use crate::etl::Loader;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use eyre::{Context, Result, eyre};
use owo_colors::OwoColorize;
use serde_json::Value;
use std::collections::HashMap;

/// Convert a plain JSON record into a DynamoDB item
pub fn to_item(record: &Value) -> Result<HashMap<String, AttributeValue>> {
    serde_dynamo::aws_sdk_dynamodb_1::to_item(record)
        .with_context(|| "Failed to convert record to a DynamoDB item")
}

/// Loader writing plain JSON records into one table
///
/// Existing items with the same key are overwritten. There is no batching
/// and no retry: the first failing put aborts the load, leaving earlier
/// puts in place.
///
/// # Example
/// ```no_run
/// use source_migrate::dynamodb::{ACCOUNTS_TABLE, DynamoConfig, TableLoader};
/// use source_migrate::etl::Loader;
/// use serde_json::json;
///
/// # async fn example() -> eyre::Result<()> {
/// let client = DynamoConfig::local(None).connect().await;
/// let loader = TableLoader::new(client, ACCOUNTS_TABLE);
///
/// let count = loader.load(vec![json!({"account_id": "radiant"})]).await?;
/// # Ok(())
/// # }
/// ```
pub struct TableLoader {
    client: Client,
    table: TableSpec,
}

impl TableLoader {
    pub fn new(client: Client, table: TableSpec) -> Self {
        Self { client, table }
    }

    pub fn table(&self) -> &TableSpec {
        &self.table
    }

    /// Put a single record
    pub async fn put(&self, record: &Value) -> Result<()> {
        self.table.check_keys(record)?;
        let item = to_item(record)?;

        self.client
            .put_item()
            .table_name(self.table.name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| {
                eyre!(
                    "Failed to put {} into {}: {}",
                    self.table.describe_key(record),
                    self.table.name,
                    DisplayErrorContext(e)
                )
            })?;

        log::debug!(
            "Put {} into {}",
            self.table.describe_key(record),
            self.table.name
        );
        Ok(())
    }
}

impl Loader for TableLoader {
    type Item = Value;

    async fn load(&self, items: Vec<Self::Item>) -> Result<usize> {
        let mut count = 0;

        for record in &items {
            self.put(record).await?;
            count += 1;
        }

        log::info!("Loaded {} item(s) into {}", count, self.table.name.cyan());
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamodb::client::offline_client;
    use crate::dynamodb::{ACCOUNTS_TABLE, LoadError, REPOSITORIES_TABLE};
    use serde_json::json;

    #[test]
    fn test_to_item() {
        let item = to_item(&json!({
            "account_id": "u1",
            "disabled": false,
            "flags": ["admin"],
            "profile": {"name": "Ann Lee", "bio": null}
        }))
        .unwrap();

        assert_eq!(item["account_id"], AttributeValue::S("u1".to_string()));
        assert_eq!(item["disabled"], AttributeValue::Bool(false));
        assert_eq!(
            item["flags"],
            AttributeValue::L(vec![AttributeValue::S("admin".to_string())])
        );
        let AttributeValue::M(profile) = &item["profile"] else {
            panic!("profile should be a map");
        };
        assert_eq!(profile["bio"], AttributeValue::Null(true));
    }

    #[test]
    fn test_to_item_requires_object() {
        assert!(to_item(&json!(["not", "an", "item"])).is_err());
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_put() {
        let loader = TableLoader::new(offline_client(), REPOSITORIES_TABLE);

        let err = loader
            .put(&json!({"account_id": "radiant"}))
            .await
            .unwrap_err();

        assert_eq!(
            err.downcast_ref::<LoadError>(),
            Some(&LoadError::MissingKey {
                table: "source-cooperative-repositories",
                key: "repository_id"
            })
        );
    }

    #[tokio::test]
    async fn test_empty_load() {
        let loader = TableLoader::new(offline_client(), ACCOUNTS_TABLE);
        assert_eq!(loader.load(vec![]).await.unwrap(), 0);
        assert_eq!(loader.table().name, "source-cooperative-accounts");
    }
}
