//! Catalog CLI - Search and page through the product catalog.
//!
//! Commands:
//! - `catalog search` - Fetch one page of results
//! - `catalog browse` - Page through results interactively
//! - `catalog config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BrowseArgs, ConfigArgs, SearchArgs};

/// Catalog CLI - Search scraped product listings
#[derive(Parser)]
#[command(name = "catalog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Override the API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one page of search results
    Search(SearchArgs),

    /// Browse results interactively
    Browse(BrowseArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.json);

    let output = output::Output::new(cli.verbose, cli.json);
    let mut ctx = context::Context::load(cli.config.as_deref(), output)?;
    if let Some(base_url) = cli.base_url {
        ctx.config.api.base_url = base_url;
    }

    let result = match cli.command {
        Commands::Search(args) => commands::search::run(args, &ctx).await,
        Commands::Browse(args) => commands::browse::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// Log to stderr. `RUST_LOG` wins unless `--verbose` asks for debug output.
fn init_tracing(verbose: bool, json: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
