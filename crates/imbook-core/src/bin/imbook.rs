//! imbook CLI - look up book metadata from the command line.
//!
//! Results are printed as pretty JSON. Logging goes to stderr and is
//! controlled by `RUST_LOG`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use imbook_core::{BookResolver, ResolverConfig, SearchAggregator};

#[derive(Parser)]
#[command(name = "imbook", version, about = "Resolve book metadata across catalogs")]
struct Cli {
    /// Configuration file (.toml or .json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up the most complete record for an ISBN
    Isbn { isbn: String },
    /// Keyword search in provider priority order
    Search { query: String },
    /// Concurrent search across the resolver and the generic index
    Aggregate { query: String },
    /// Show or clear recent keyword queries
    History {
        #[arg(long)]
        clear: bool,
    },
    /// List the built-in catalog providers
    Providers,
}

fn load_config(path: Option<&PathBuf>) -> Result<ResolverConfig> {
    let config = match path {
        Some(path) => ResolverConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ResolverConfig::default(),
    };
    Ok(config.apply_env()?)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    let resolver = Arc::new(BookResolver::from_config(&config)?);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run(cli.command, resolver))
}

async fn run(command: Commands, resolver: Arc<BookResolver>) -> Result<()> {
    match command {
        Commands::Isbn { isbn } => print_json(&resolver.search_by_isbn(&isbn).await?),
        Commands::Search { query } => print_json(&resolver.search_by_query(&query).await),
        Commands::Aggregate { query } => {
            let aggregator = SearchAggregator::new(resolver.clone());
            print_json(&aggregator.search(&query).await)
        }
        Commands::History { clear } => {
            if clear {
                resolver.history().clear().await;
            }
            print_json(&resolver.history().entries())
        }
        Commands::Providers => print_json(&imbook_core::sources::all_metadata()),
    }
}
