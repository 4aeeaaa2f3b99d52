use clap::{Parser, Subcommand, builder::styling};
use eyre::{Context, Result};
use owo_colors::OwoColorize;
use source_migrate::{cli, storage::DumpPaths};
use std::path::{Path, PathBuf};

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Source Migrate: one-shot jobs moving Ory identities and legacy accounts into DynamoDB
#[derive(Parser)]
#[command(name = "srcmig", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source credentials from, if it exists
    #[arg(short, long, global = true, default_value = ".env")]
    env: String,

    /// More verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// Directory the jobs read from and write to
    #[arg(short, long, global = true, default_value = "dump")]
    dump_dir: PathBuf,

    /// Talk to DynamoDB Local with throwaway credentials
    #[arg(long, global = true)]
    local: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export every Ory identity to ory_identities.json
    Export {
        /// Identities requested per page
        #[arg(short, long)]
        page_size: Option<u32>,
    },

    /// Reshape the legacy table exports and identities into the new schema
    Transform,

    /// Put the transformed records into their DynamoDB tables
    Load,

    /// Export, transform and load in one go
    Run {
        /// Identities requested per page
        #[arg(short, long)]
        page_size: Option<u32>,
    },

    /// Scan a DynamoDB table into a value-tagged export file
    DumpTable {
        /// Name of the table to scan
        table: String,

        /// File to write, defaults to <dump-dir>/<table>.json
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create the target tables if they don't exist
    CreateTables,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if Path::new(&cli.env).exists() {
        dotenvy::from_filename(&cli.env)
            .with_context(|| format!("Failed to source {}", cli.env))?;
    }

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    let dump = DumpPaths::new(&cli.dump_dir);
    log::debug!("Using dump directory {}", dump.root().display().bright_black());

    match cli.command {
        Commands::Export { page_size } => {
            let client = cli::load_ory_client()?;
            cli::export_identities(&dump, client, page_size).await?;
        }
        Commands::Transform => {
            let summary = cli::transform_dump(&dump).await?;
            if summary.dropped_accounts > 0 {
                log::info!(
                    "{} account(s) had no matching identity",
                    summary.dropped_accounts.yellow()
                );
            }
        }
        Commands::Load => {
            let client = cli::load_dynamo_config(cli.local).connect().await;
            cli::load_dump(&dump, client).await?;
        }
        Commands::Run { page_size } => {
            let ory = cli::load_ory_client()?;
            let dynamodb = cli::load_dynamo_config(cli.local).connect().await;
            cli::run_all(&dump, ory, dynamodb, page_size).await?;
        }
        Commands::DumpTable { table, output } => {
            let output = output.unwrap_or_else(|| dump.root().join(format!("{}.json", table)));
            let client = cli::load_dynamo_config(cli.local).connect().await;
            cli::dump_table(client, &table, output).await?;
        }
        Commands::CreateTables => {
            let client = cli::load_dynamo_config(cli.local).connect().await;
            cli::create_tables(&client).await?;
        }
    }

    Ok(())
}
