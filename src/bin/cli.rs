//! internwatch CLI
//!
//! One-shot entry point meant to be invoked by an external scheduler.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use internwatch::{
    error::Result,
    models::Config,
    pipeline::{self, RunOptions},
    services::{DocumentSource, FileSource, HttpSource, Notifier, RowParser, extract_table},
    storage::LocalStorage,
};

/// internwatch - new internship posting monitor
#[derive(Parser, Debug)]
#[command(name = "internwatch", version, about = "Internship posting monitor")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch, diff against the snapshot, notify and save
    Run {
        /// Parse and diff only; do not notify or save
        #[arg(long)]
        dry_run: bool,
    },

    /// Parse the table and print postings as JSON
    Parse {
        /// Read the document from a local file instead of the source URL
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Validate the configuration
    Validate,

    /// Show current snapshot info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

#[cfg(feature = "email")]
fn build_notifier(config: &Config) -> Result<Option<Box<dyn Notifier>>> {
    let notifier = internwatch::services::EmailNotifier::from_config(&config.notify)?;
    Ok(notifier.map(|n| Box::new(n) as Box<dyn Notifier>))
}

#[cfg(not(feature = "email"))]
fn build_notifier(_config: &Config) -> Result<Option<Box<dyn Notifier>>> {
    Ok(None)
}

/// Main entry point for the CLI application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match execute(cli).await {
        Ok(code) => code,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> Result<ExitCode> {
    let mut config = Config::load_or_default(&cli.config);
    config.apply_env();

    match cli.command {
        Command::Run { dry_run } => {
            config.validate()?;
            log::info!("internwatch starting...");

            let source = HttpSource::new(&config.source)?;
            let storage = LocalStorage::new(&config.storage.snapshot_path);
            let notifier = build_notifier(&config)?;

            let summary = pipeline::run_monitor(
                &config,
                &source,
                &storage,
                notifier.as_deref(),
                RunOptions { dry_run },
            )
            .await?;

            if summary.has_warnings() {
                log::warn!("Run finished with warnings: {summary}");
            } else {
                log::info!("Run complete: {summary}");
            }
            if summary.save_failed() {
                return Ok(ExitCode::FAILURE);
            }
        }

        Command::Parse { file } => {
            config.validate()?;
            let source: Box<dyn DocumentSource> = match file {
                Some(path) => Box::new(FileSource::new(path)),
                None => Box::new(HttpSource::new(&config.source)?),
            };
            let document = source.fetch().await?;
            let rows = extract_table(&document, (&config.table).into())?;
            let postings =
                RowParser::new(&config.table, chrono::Utc::now()).parse_rows(rows.iter().copied());

            log::info!(
                "Parsed {} posting(s) from {}",
                postings.len(),
                source.location()
            );
            println!("{}", serde_json::to_string_pretty(&postings)?);
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK (source: {})", config.source.url);

            let missing = config.notify.missing_fields();
            if missing.is_empty() {
                log::info!("✓ Notification configured for {:?}", config.notify.recipient);
            } else {
                log::warn!("Notification disabled (missing: {})", missing.join(", "));
            }
        }

        Command::Info => {
            let storage = LocalStorage::new(&config.storage.snapshot_path);
            log::info!("Snapshot: {}", storage.path().display());

            match storage.read_file().await {
                Ok(Some(file)) => {
                    match file.last_updated() {
                        Some(at) => log::info!("Last updated: {}", at.to_rfc3339()),
                        None => log::info!("Last updated: unknown (bare layout)"),
                    }
                    log::info!("Postings: {}", file.into_postings().len());
                }
                Ok(None) => log::info!("No snapshot found yet."),
                Err(e) => log::warn!("Snapshot unreadable: {}", e),
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
