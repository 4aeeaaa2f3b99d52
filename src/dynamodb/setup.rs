//! Target table creation for fresh (usually local) endpoints

use super::TableSpec;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::operation::create_table::CreateTableError;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType,
};
use eyre::{Context, Result, eyre};

/// Key schema and attribute definitions for a table, all keys as strings
pub fn key_schema(table: &TableSpec) -> Result<(Vec<KeySchemaElement>, Vec<AttributeDefinition>)> {
    let mut schema = Vec::new();
    let mut definitions = Vec::new();

    let keys = std::iter::once((table.partition_key, KeyType::Hash))
        .chain(table.sort_key.map(|key| (key, KeyType::Range)));

    for (name, key_type) in keys {
        schema.push(
            KeySchemaElement::builder()
                .attribute_name(name)
                .key_type(key_type)
                .build()
                .with_context(|| format!("Invalid key schema for {}", table.name))?,
        );
        definitions.push(
            AttributeDefinition::builder()
                .attribute_name(name)
                .attribute_type(ScalarAttributeType::S)
                .build()
                .with_context(|| format!("Invalid attribute definition for {}", table.name))?,
        );
    }

    Ok((schema, definitions))
}

/// Create a pay-per-request table
///
/// Returns `false` when the table already exists.
pub async fn create_table(client: &Client, table: &TableSpec) -> Result<bool> {
    let (schema, definitions) = key_schema(table)?;

    let result = client
        .create_table()
        .table_name(table.name)
        .set_key_schema(Some(schema))
        .set_attribute_definitions(Some(definitions))
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await;

    match result {
        Ok(_) => {
            log::info!("Created table {}", table.name);
            Ok(true)
        }
        Err(e) => match e.into_service_error() {
            CreateTableError::ResourceInUseException(_) => {
                log::info!("Table {} already exists", table.name);
                Ok(false)
            }
            other => Err(eyre!(
                "Failed to create table {}: {}",
                table.name,
                DisplayErrorContext(other)
            )),
        },
    }
}
