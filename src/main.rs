//! Salvage-Ingest main entry point
//!
//! This is the command-line interface for the salvage parts catalog ingester.

use clap::Parser;
use salvage_ingest::config::{load_config_with_hash, Config};
use salvage_ingest::output::{load_statistics, print_statistics, snapshot_path};
use salvage_ingest::pipeline::{run_pipeline, CategoryOutcome};
use salvage_ingest::storage::SqliteStorage;
use salvage_ingest::BrandLexicon;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Salvage-Ingest: a disassembled-vehicle catalog ingester
///
/// Salvage-Ingest crawls a salvage yard's parts catalog category by category,
/// extracts brand, model and year from the free-text listings, and stores
/// vehicles and parts idempotently in SQLite.
#[derive(Parser, Debug)]
#[command(name = "salvage-ingest")]
#[command(version)]
#[command(about = "Salvage parts catalog ingester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Persist the saved snapshots instead of crawling
    #[arg(long)]
    from_snapshot: bool,

    /// Validate config and show what would be ingested without doing it
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.from_snapshot {
        config.output.load_from_snapshot = true;
    }

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_ingest(&config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("salvage_ingest=info,warn"),
            1 => EnvFilter::new("salvage_ingest=debug,info"),
            2 => EnvFilter::new("salvage_ingest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the validated configuration
fn handle_dry_run(config: &Config) {
    println!("=== Salvage-Ingest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Max concurrent requests: {}",
        config.crawler.max_concurrent_requests
    );
    println!(
        "  Delay between requests: {}ms + up to {}ms",
        config.crawler.min_delay_ms, config.crawler.random_delay_ms
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    if config.crawler.allowed_domains.is_empty() {
        println!("  Allowed domains: any");
    } else {
        println!(
            "  Allowed domains: {}",
            config.crawler.allowed_domains.join(", ")
        );
    }

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.agent);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Snapshots: {}", config.output.snapshot_dir);

    let lexicon = BrandLexicon::with_extras(&config.lexicon.extra_brands);
    println!(
        "\nBrand lexicon: {} brands ({} extra)",
        lexicon.len(),
        config.lexicon.extra_brands.len()
    );

    let snapshot_dir = Path::new(&config.output.snapshot_dir);
    println!("\nCategories ({}):", config.categories.len());
    for (name, url) in &config.categories {
        if config.output.load_from_snapshot {
            println!("  - {} <- {}", name, snapshot_path(snapshot_dir, name).display());
        } else {
            println!("  - {} <- {}", name, url);
        }
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("Database: {}\n", config.output.database_path);

    let storage = SqliteStorage::open(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main ingestion run
///
/// Category failures are reported but do not change the exit status; only a
/// store that cannot be used does.
async fn handle_ingest(config: &Config, config_hash: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut storage = SqliteStorage::open(Path::new(&config.output.database_path))?;

    tracing::info!("Ingesting {} categories", config.categories.len());

    let report = match run_pipeline(config, &mut storage, config_hash).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Ingestion stopped: {}", e);
            return Err(e.into());
        }
    };

    for category in &report.categories {
        match &category.outcome {
            CategoryOutcome::Committed(outcome) => println!(
                "✓ {}: {} vehicles, {} parts",
                category.category, outcome.vehicles_attempted, outcome.parts_attempted
            ),
            CategoryOutcome::Failed(message) => {
                println!("✗ {}: {}", category.category, message)
            }
        }
    }
    println!("Total records written: {}", report.total_written());

    Ok(())
}
