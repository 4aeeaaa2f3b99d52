//! Source Migrate
//!
//! ETL jobs that export Ory identities, reshape legacy account records
//! against them, and load the results into DynamoDB

pub mod accounts;
pub mod cli;
pub mod client;
pub mod dynamodb;
pub mod etl;
pub mod ory;
pub mod storage;

// Re-exports for convenience
pub use accounts::{Account, AccountNormalizer, LegacyAccount, TransformError};
pub use client::{Auth, OryClient};
pub use dynamodb::{DynamoConfig, TableLoader, TableScanner};
pub use etl::{Extractor, Loader, Passthrough, Pipeline, Transformer};
pub use ory::{IdentitiesExtractor, Identity, IdentityIndex};
pub use storage::{DumpPaths, DynamoExportReader, JsonArrayReader, JsonArrayWriter};
