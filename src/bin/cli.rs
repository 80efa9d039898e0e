//! IIIF Portal CLI
//!
//! Local entry point for harvesting and querying the record set.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use iiif_portal::{
    error::Result,
    index::SnapshotStore,
    models::{Config, SeedList},
    pipeline, query,
    storage::{LocalStorage, PortalStorage},
};

/// iiif-portal - IIIF harvesting and faceted search
#[derive(Parser, Debug)]
#[command(
    name = "iiif-portal",
    version,
    about = "Harvests IIIF manifests and answers faceted queries over them"
)]
struct Cli {
    /// Path to storage directory containing config and harvest artifacts
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Harvest all manifests reachable from a seed list
    Harvest {
        /// Path to seed list file (default: {storage_dir}/seeds.txt)
        #[arg(long)]
        seeds: Option<PathBuf>,
    },

    /// Query the harvested records with facets and a keyword
    Query {
        /// Repository facet value ('*' for all)
        #[arg(long, default_value = query::WILDCARD)]
        repository: String,

        /// Author facet value ('*' for all)
        #[arg(long, default_value = query::WILDCARD)]
        author: String,

        /// Language facet value ('*' for all)
        #[arg(long, default_value = query::WILDCARD)]
        language: String,

        /// Material facet value ('*' for all)
        #[arg(long, default_value = query::WILDCARD)]
        material: String,

        /// Keyword matched as substring of label, author, or description
        #[arg(long)]
        keyword: Option<String>,

        /// Result page (1-indexed, 20 records per page)
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Validate configuration and seed list
    Validate {
        /// Path to seed list file (default: {storage_dir}/seeds.txt)
        #[arg(long)]
        seeds: Option<PathBuf>,
    },

    /// Show current harvest state
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.storage_dir.join("config.toml");
    let config = Arc::new(Config::load_or_default(&config_path));
    let storage = LocalStorage::new(&cli.storage_dir);
    let default_seeds = cli.storage_dir.join("seeds.txt");

    match cli.command {
        Command::Harvest { seeds } => {
            let seeds_path = seeds.unwrap_or(default_seeds);
            let seed_list = SeedList::load(&seeds_path)?;
            log::info!(
                "Loaded {} seed URIs from {}",
                seed_list.len(),
                seeds_path.display()
            );

            let summary = pipeline::run_harvest(config, &storage, &seed_list).await?;
            log::info!(
                "Harvest complete: {} records, {} failures",
                summary.record_count,
                summary.failure_count
            );
        }

        Command::Query {
            repository,
            author,
            language,
            material,
            keyword,
            page,
        } => {
            let store = SnapshotStore::new();
            let snapshot = pipeline::run_reindex(&storage, &store).await?;

            let mut state = query::QueryState::new()
                .with_facet("repository", &repository)?
                .with_facet("author", &author)?
                .with_facet("language", &language)?
                .with_facet("material", &material)?
                .with_page(page)?;
            if let Some(keyword) = keyword {
                state = state.with_keyword(&keyword);
            }

            let output = query::run(&snapshot, &state);
            println!(
                "{} results, page {}/{}",
                output.total_count,
                output.page,
                output.page_count.max(1)
            );
            for record in &output.records {
                println!("  {} | {} | {}", record.label, record.author, record.manifest_uri);
            }
            for (dimension, links) in &output.facets {
                println!("{dimension}:");
                for link in links {
                    let marker = if link.selected { "*" } else { " " };
                    println!("  {marker} {} ({})", link.value, link.count);
                }
            }
        }

        Command::Validate { seeds } => {
            log::info!("Validating configuration...");
            config.validate()?;
            log::info!("Config OK");

            let seeds_path = seeds.unwrap_or(default_seeds);
            if seeds_path.exists() {
                let seed_list = SeedList::load(&seeds_path)?;
                seed_list.validate()?;
                log::info!("Seed list OK ({} URIs)", seed_list.len());
            } else {
                log::warn!("Seed list not found at {}", seeds_path.display());
            }

            log::info!("All validations passed!");
        }

        Command::Info => {
            log::info!("Storage directory: {}", cli.storage_dir.display());
            match storage.load_summary().await? {
                Some(summary) => {
                    log::info!("Last harvest: {}", summary.harvested_at);
                    log::info!("Records: {}", summary.record_count);
                    log::info!("Failures: {}", summary.failure_count);
                }
                None => log::info!("No harvest found yet."),
            }
        }
    }

    Ok(())
}
