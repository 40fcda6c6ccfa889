use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use rekono_tools::tools::decode_tools;
use rekono_tools::{Filter, ToolsClient};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

mod cli;
mod config;

use cli::Cli;
use cli::commands::{Commands, FilterArgs};
use config::Config;

/// Variable that overrides the configured log level
const LOG_FILTER_ENV: &str = "RUST_LOG";

/// Filter from `filter_env` when set, otherwise `default_level`
fn log_builder(filter_env: &str, default_level: &str) -> env_logger::Builder {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(filter_env, default_level))
}

fn setup_logging(default_level: &str) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rekono-tools")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("rekono-tools.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    log_builder(LOG_FILTER_ENV, default_level)
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn build_filter(args: &FilterArgs) -> Result<Option<Filter>> {
    if args.filters.is_empty() {
        return Ok(None);
    }
    let mut filter = Filter::new();
    for pair in &args.filters {
        let (key, value) = Filter::parse_pair(pair)?;
        filter.insert(key, value);
    }
    Ok(Some(filter))
}

async fn run_application(cli: &Cli, client: &ToolsClient) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{} {}", "Endpoint:".yellow(), client.endpoint());
    }

    let records = match &cli.command {
        Commands::All { filter } => {
            let filter = build_filter(filter)?;
            info!("Fetching all tools (filter: {:?})", filter);
            client
                .fetch_all_tools(filter.as_ref())
                .await
                .context("Failed to fetch tools")?
        }
        Commands::Page { page, limit, filter } => {
            let filter = build_filter(filter)?;
            info!("Fetching tools page {:?} (limit: {:?}, filter: {:?})", page, limit, filter);
            client
                .fetch_tools_page(*page, *limit, filter.as_ref())
                .await
                .context("Failed to fetch tools page")?
        }
    };

    info!("Received {} tools", records.len());

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print_tools(&records)?;
    }
    Ok(())
}

fn print_tools(records: &[Value]) -> Result<()> {
    if records.is_empty() {
        println!("{}", "No tools found".yellow());
        return Ok(());
    }

    for tool in decode_tools(records).context("Unexpected tool record")? {
        let stage = tool.stage.as_deref().unwrap_or("-");
        println!(
            "{:>4}  {:<24} {:<16} {} {}",
            tool.id.to_string().dimmed(),
            tool.name.green(),
            stage.cyan(),
            "likes:".dimmed(),
            tool.likes_count
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration; it carries the default log level
    let config = Config::load(cli.config.as_ref())
        .context("Failed to load configuration")?
        .with_overrides(cli.url.as_deref(), cli.token.as_deref());

    setup_logging(config.log_level.as_deref().unwrap_or("info")).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // One client for the whole process
    let client = ToolsClient::from_config(config.api.clone()).context("Failed to create API client")?;

    // Run the main application logic
    run_application(&cli, &client).await.context("Application failed")?;

    Ok(())
}
