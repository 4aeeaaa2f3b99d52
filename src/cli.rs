//! CLI helper functions
//!
//! One function per migration job. Each reads its inputs, runs to
//! completion, and aborts on the first error.

use crate::{
    accounts::{AccountNormalizer, parse_legacy_accounts},
    client::{Auth, OryClient},
    dynamodb::{
        ACCOUNTS_TABLE, API_KEYS_TABLE, DynamoConfig, REPOSITORIES_TABLE, TABLES, TableLoader,
        TableScanner, TableSpec, create_table,
    },
    etl::{Extractor, Loader, Passthrough, Pipeline, Transformer},
    ory::{IdentitiesExtractor, IdentityIndex, IdentityMapWriter},
    storage::{
        DumpPaths, DynamoExportReader, DynamoExportWriter, DynamoJsonDecoder, JsonArrayReader,
        JsonArrayWriter, read_json,
    },
};
use aws_sdk_dynamodb::Client;
use eyre::{Context, Result};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use url::Url;

/// Load the Ory client from environment variables
///
/// Expected environment variables:
/// - ORY_SDK_URL: Ory project or Kratos admin base URL (required)
/// - ORY_ACCESS_TOKEN: Personal access token sent as a bearer token (required)
pub fn load_ory_client() -> Result<OryClient> {
    let url_str =
        std::env::var("ORY_SDK_URL").context("ORY_SDK_URL environment variable not set")?;
    let url = Url::parse(&url_str).with_context(|| format!("Invalid ORY_SDK_URL: {}", url_str))?;

    let token = std::env::var("ORY_ACCESS_TOKEN")
        .context("ORY_ACCESS_TOKEN environment variable not set")?;
    let auth = Auth::from_token(Some(token));
    if let Auth::None = auth {
        log::warn!("ORY_ACCESS_TOKEN is empty, sending requests without credentials");
    }

    OryClient::try_new(url, auth).context("Failed to create Ory client")
}

/// Load DynamoDB settings from environment variables
///
/// Expected environment variables:
/// - DYNAMODB_ENDPOINT_URL: Endpoint override, e.g. DynamoDB Local (optional)
/// - DYNAMODB_REGION: Region override (optional, otherwise the AWS chain decides)
///
/// With `local` set, fixed local credentials and region are used and the
/// endpoint defaults to `http://localhost:8000`.
pub fn load_dynamo_config(local: bool) -> DynamoConfig {
    let endpoint = std::env::var("DYNAMODB_ENDPOINT_URL")
        .ok()
        .filter(|s| !s.is_empty());

    if local {
        return DynamoConfig::local(endpoint);
    }

    DynamoConfig {
        region: std::env::var("DYNAMODB_REGION")
            .ok()
            .filter(|s| !s.is_empty()),
        ..DynamoConfig::default()
    }
    .with_endpoint(endpoint)
}

/// Export every Ory identity to the dump directory
///
/// Pipeline: IdentitiesExtractor → Passthrough → IdentityMapWriter
pub async fn export_identities(
    dump: &DumpPaths,
    client: OryClient,
    page_size: Option<u32>,
) -> Result<usize> {
    log::info!("Exporting identities from {}", client.url().bright_black());

    let mut extractor = IdentitiesExtractor::new(client);
    if let Some(size) = page_size {
        extractor = extractor.with_page_size(size);
    }

    let pipeline = Pipeline::new(
        extractor,
        Passthrough::new(),
        IdentityMapWriter::new(dump.identities()),
    );
    let count = pipeline.run().await?;

    log::info!(
        "✓ Exported {} identities to {}",
        count,
        dump.identities().display()
    );
    Ok(count)
}

/// Counts produced by [`transform_dump`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformSummary {
    pub accounts: usize,
    pub dropped_accounts: usize,
    pub repositories: usize,
    pub api_keys: usize,
}

/// Transform the legacy table exports into the new schema
///
/// Reads `ory_identities.json` and the three `dynamodb_*.json` exports, then
/// writes `accounts.json`, `repositories.json` and `api_keys.json`. All
/// inputs are read and transformed before any output is written.
pub async fn transform_dump(dump: &DumpPaths) -> Result<TransformSummary> {
    log::info!("Transforming dump in {}", dump.root().display().bright_black());

    let identities: IdentityIndex = read_json(dump.identities())
        .with_context(|| "Failed to load exported identities")?;
    log::info!("Loaded {} identities", identities.len());

    let decoder = DynamoJsonDecoder::new();
    let raw_accounts = DynamoExportReader::new(dump.raw_accounts()).extract().await?;
    let raw_repositories = DynamoExportReader::new(dump.raw_repositories())
        .extract()
        .await?;
    let raw_api_keys = DynamoExportReader::new(dump.raw_api_keys()).extract().await?;

    let legacy_accounts = parse_legacy_accounts(
        decoder
            .transform_many(raw_accounts)
            .with_context(|| format!("In {}", dump.raw_accounts().display()))?,
    )?;
    let repositories = decoder
        .transform_many(raw_repositories)
        .with_context(|| format!("In {}", dump.raw_repositories().display()))?;
    let api_keys = decoder
        .transform_many(raw_api_keys)
        .with_context(|| format!("In {}", dump.raw_api_keys().display()))?;

    let input_accounts = legacy_accounts.len();
    let normalized = AccountNormalizer::new(identities).normalize_all(legacy_accounts)?;
    let accounts = normalized
        .accounts
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;

    if !normalized.dropped.is_empty() {
        log::warn!(
            "Dropped {} of {} account(s) with no matching identity",
            normalized.dropped.len(),
            input_accounts
        );
    }

    let summary = TransformSummary {
        accounts: JsonArrayWriter::new(dump.accounts()).load(accounts).await?,
        dropped_accounts: normalized.dropped.len(),
        repositories: JsonArrayWriter::new(dump.repositories())
            .load(repositories)
            .await?,
        api_keys: JsonArrayWriter::new(dump.api_keys()).load(api_keys).await?,
    };

    log::info!(
        "✓ Transformed {} account(s), {} repositor(y/ies), {} API key(s)",
        summary.accounts,
        summary.repositories,
        summary.api_keys
    );
    Ok(summary)
}

/// Transformed dump file feeding each target table, in load order
pub fn load_sources(dump: &DumpPaths) -> Vec<(PathBuf, TableSpec)> {
    vec![
        (dump.accounts(), ACCOUNTS_TABLE),
        (dump.repositories(), REPOSITORIES_TABLE),
        (dump.api_keys(), API_KEYS_TABLE),
    ]
}

/// Load the transformed dump into DynamoDB
///
/// Pipeline per table: JsonArrayReader → Passthrough → TableLoader
pub async fn load_dump(dump: &DumpPaths, client: Client) -> Result<usize> {
    let mut total = 0;

    for (path, table) in load_sources(dump) {
        log::info!(
            "Loading {} into {}",
            path.display().bright_black(),
            table.name.cyan()
        );

        let pipeline = Pipeline::new(
            JsonArrayReader::new(&path),
            Passthrough::new(),
            TableLoader::new(client.clone(), table),
        );
        total += pipeline
            .run()
            .await
            .with_context(|| format!("Failed to load {}", path.display()))?;
    }

    log::info!("✓ Loaded {} item(s) in total", total);
    Ok(total)
}

/// Scan a table into a value-tagged export file
///
/// Pipeline: TableScanner → Passthrough → DynamoExportWriter
pub async fn dump_table(client: Client, table: &str, output: impl AsRef<Path>) -> Result<usize> {
    let output = output.as_ref();
    log::info!("Dumping table {} to {}", table.cyan(), output.display().bright_black());

    let pipeline = Pipeline::new(
        TableScanner::new(client, table),
        Passthrough::new(),
        DynamoExportWriter::new(output),
    );
    let count = pipeline.run().await?;

    log::info!("✓ Dumped {} item(s) to {}", count, output.display());
    Ok(count)
}

/// Create every target table that doesn't exist yet
///
/// Returns the number of tables created.
pub async fn create_tables(client: &Client) -> Result<usize> {
    let mut created = 0;
    for table in TABLES.iter() {
        if create_table(client, table).await? {
            created += 1;
        }
    }

    log::info!("✓ Created {} of {} table(s)", created, TABLES.len());
    Ok(created)
}

/// Export, transform and load in one run
pub async fn run_all(
    dump: &DumpPaths,
    ory: OryClient,
    dynamodb: Client,
    page_size: Option<u32>,
) -> Result<usize> {
    export_identities(dump, ory, page_size).await?;
    transform_dump(dump).await?;
    load_dump(dump, dynamodb).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "ORY_SDK_URL",
            "ORY_ACCESS_TOKEN",
            "DYNAMODB_ENDPOINT_URL",
            "DYNAMODB_REGION",
        ] {
            unsafe { std::env::remove_var(key) };
        }
    }

    #[test]
    #[serial]
    fn test_load_ory_client() {
        clear_env();
        unsafe {
            std::env::set_var("ORY_SDK_URL", "http://localhost:4434");
            std::env::set_var("ORY_ACCESS_TOKEN", "ory_pat_test");
        }

        let client = load_ory_client().unwrap();
        assert_eq!(client.url().as_str(), "http://localhost:4434/");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_load_ory_client_requires_token() {
        clear_env();
        unsafe { std::env::set_var("ORY_SDK_URL", "http://localhost:4434") };

        let err = load_ory_client().unwrap_err();
        assert!(err.to_string().contains("ORY_ACCESS_TOKEN"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_load_ory_client_bad_url() {
        clear_env();
        unsafe {
            std::env::set_var("ORY_SDK_URL", "not a url");
            std::env::set_var("ORY_ACCESS_TOKEN", "t");
        }

        let err = load_ory_client().unwrap_err();
        assert!(err.to_string().contains("Invalid ORY_SDK_URL"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_load_dynamo_config() {
        clear_env();
        assert_eq!(load_dynamo_config(false), DynamoConfig::default());

        unsafe {
            std::env::set_var("DYNAMODB_ENDPOINT_URL", "http://dynamo:8000");
            std::env::set_var("DYNAMODB_REGION", "us-west-2");
        }
        let config = load_dynamo_config(false);
        assert_eq!(config.endpoint_url.as_deref(), Some("http://dynamo:8000"));
        assert_eq!(config.region.as_deref(), Some("us-west-2"));
        assert!(!config.local_credentials);

        let local = load_dynamo_config(true);
        assert_eq!(local.endpoint_url.as_deref(), Some("http://dynamo:8000"));
        assert!(local.local_credentials);
        clear_env();
    }

    #[test]
    fn test_load_sources_order() {
        let dump = DumpPaths::new("d");
        let sources = load_sources(&dump);
        let pairs: Vec<(String, &str)> = sources
            .iter()
            .map(|(p, t)| (p.display().to_string(), t.name))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("d/accounts.json".to_string(), "source-cooperative-accounts"),
                (
                    "d/repositories.json".to_string(),
                    "source-cooperative-repositories"
                ),
                ("d/api_keys.json".to_string(), "source-cooperative-api-keys"),
            ]
        );
    }
}
