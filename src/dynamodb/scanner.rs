//! DynamoDB table scanner
//!
//! Reads a whole table with paginated Scan calls, re-encoding items into
//! the value-tagged JSON that table exports use.

use crate::etl::Extractor;
use crate::storage::encode_item;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use eyre::{Result, eyre};
use owo_colors::OwoColorize;
use serde_json::Value;

/// Extractor for every item of one table, in tagged form
pub struct TableScanner {
    client: Client,
    table_name: String,
}

impl TableScanner {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

impl Extractor for TableScanner {
    type Item = Value;

    async fn extract(&self) -> Result<Vec<Self::Item>> {
        let mut items = Vec::new();
        let mut start_key = None;
        let mut pages = 0usize;

        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| {
                    eyre!("Failed to scan {}: {}", self.table_name, DisplayErrorContext(e))
                })?;
            pages += 1;

            for item in output.items.unwrap_or_default() {
                items.push(encode_item(&item)?);
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        log::info!(
            "Scanned {} item(s) from {} in {} page(s)",
            items.len(),
            self.table_name.cyan(),
            pages
        );
        Ok(items)
    }
}
