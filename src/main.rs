//! Edition-Harvester main entry point
//!
//! This is the command-line interface for the Edition-Harvester collection fetcher.

use clap::Parser;
use edition_harvester::config::load_config_with_hash;
use edition_harvester::crawler::harvest;
use edition_harvester::locator::AssetLocator;
use edition_harvester::output::{collect_status, print_report, print_status};
use edition_harvester::store::FsStore;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Edition-Harvester: a resumable collection fetcher
///
/// Edition-Harvester downloads every edition of a numbered collection
/// (metadata document and image) from a content-addressed gateway. It can
/// be interrupted and started again at any time; files already on disk are
/// never fetched or written twice.
#[derive(Parser, Debug)]
#[command(name = "edition-harvester")]
#[command(version = "1.0.0")]
#[command(about = "A resumable collection fetcher", long_about = None)]
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

    /// Validate config and show the URLs that would be fetched without fetching
    #[arg(long, conflicts_with = "status")]
    dry_run: bool,

    /// Show what is already on disk and exit
    #[arg(long, conflicts_with = "dry_run")]
    status: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.status {
        handle_status(&config).await?;
    } else {
        handle_harvest(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("edition_harvester=info,warn"),
            1 => EnvFilter::new("edition_harvester=debug,info"),
            2 => EnvFilter::new("edition_harvester=trace,debug"),
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

/// Handles the --dry-run mode: shows the derived URLs and output layout
fn handle_dry_run(config: &edition_harvester::Config) {
    let collection = &config.collection;
    let locator = AssetLocator::new(&collection.sample_metadata_url, &config.fetcher.gateway_base);
    let store = FsStore::from_config(config);

    println!("=== Edition-Harvester Dry Run ===\n");

    println!("Collection:");
    println!("  Name: {}", collection.name);
    println!(
        "  Editions: {} ..= {}",
        collection.first_edition_id, collection.last_edition_id
    );
    println!("  Size: {}", collection.size);

    println!("\nRemote:");
    println!(
        "  First metadata: {}",
        locator.metadata_url(collection.first_edition_id)
    );
    println!(
        "  Last metadata: {}",
        locator.metadata_url(collection.last_edition_id)
    );
    println!("  Gateway: {}", locator.gateway_base());
    println!("  Page timeout: {}ms", config.fetcher.page_timeout);

    println!("\nRetry:");
    println!("  Max stuck count: {}", config.retry.max_stuck_count);
    println!(
        "  Delay: {}ms ({:?}, max {}ms)",
        config.retry.delay, config.retry.strategy, config.retry.max_delay
    );

    println!("\nOutput:");
    println!("  Metadata: {}", store.metadata_dir().display());
    println!("  Images: {}", store.images_dir().display());

    println!("\n✓ Configuration is valid");
}

/// Handles the --status mode: inspects the collection folder
async fn handle_status(config: &edition_harvester::Config) -> Result<(), Box<dyn std::error::Error>> {
    let store = FsStore::from_config(config);
    let status = collect_status(config, &store).await?;
    print_status(&status);
    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: &edition_harvester::Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Harvesting {} (editions {} to {}, {} images expected)",
        config.collection.name,
        config.collection.first_edition_id,
        config.collection.last_edition_id,
        config.collection.size
    );

    match harvest(config).await {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest could not start: {}", e);
            Err(e.into())
        }
    }
}
