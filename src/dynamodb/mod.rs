//! DynamoDB access for the migration
//!
//! Table definitions, client setup, the per-item loader, a full-table
//! scanner for producing transform inputs, and table creation.

mod client;
mod loader;
mod scanner;
mod setup;
mod tables;

pub use client::{DynamoConfig, LOCAL_ENDPOINT};
pub use loader::{TableLoader, to_item};
pub use scanner::TableScanner;
pub use setup::{create_table, key_schema};
pub use tables::{
    ACCOUNTS_TABLE, API_KEYS_TABLE, LoadError, REPOSITORIES_TABLE, TABLES, TableSpec,
};
