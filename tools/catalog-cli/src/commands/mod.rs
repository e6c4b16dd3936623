//! CLI command implementations.

pub mod browse;
pub mod config;
pub mod search;

use clap::{Args, Subcommand};

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Search term (omit to list everything).
    #[arg(default_value = "")]
    pub term: String,

    /// Page to fetch.
    #[arg(short, long, default_value = "1")]
    pub page: u32,

    /// Rows per page (default: from config).
    #[arg(short = 's', long)]
    pub page_size: Option<u32>,
}

/// Arguments for the browse command.
#[derive(Args)]
pub struct BrowseArgs {
    /// Initial search term.
    #[arg(short, long)]
    pub term: Option<String>,

    /// Rows per page (default: from config).
    #[arg(short = 's', long)]
    pub page_size: Option<u32>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,

        /// Where to write it (default: ./catalog.toml). A .json path writes JSON.
        #[arg(short, long)]
        path: Option<String>,
    },
    /// Validate the config file.
    Validate,
}
