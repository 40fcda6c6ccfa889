//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - all: every tool across all pages
//! - page: a single page of tools

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// rekono-tools - browse the Rekono tool catalog
#[derive(Parser, Debug)]
#[command(name = "rekono-tools")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Rekono server URL (overrides config)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// API token (overrides config and REKONO_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Print raw JSON records
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Filter pairs shared by both subcommands
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Query filter as key=value (repeatable)
    #[arg(short, long = "filter", value_name = "KEY=VALUE")]
    pub filters: Vec<String>,
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every tool, following pagination
    All {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// List a single page of tools
    Page {
        /// Page number (1-based)
        #[arg(short, long)]
        page: Option<u32>,

        /// Page size
        #[arg(short, long)]
        limit: Option<u32>,

        #[command(flatten)]
        filter: FilterArgs,
    },
}
