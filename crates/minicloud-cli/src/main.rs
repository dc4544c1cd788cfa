//! MiniCloud CLI - Command-line client for the MiniCloud image backend
//!
//! Provides commands for:
//! - Managing the client configuration
//! - Uploading images
//! - Inspecting metadata and requesting signed URLs
//! - Building transform URLs
//! - Showing the reconciled gallery, once or continuously

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod context;
mod output;

use commands::{
    completions::CompletionsCommand, config::ConfigCommand, gallery::GalleryCommand,
    list::ListCommand, metadata::MetadataCommand, sign::SignCommand, upload::UploadCommand,
    url::UrlCommand,
};
use context::CliContext;
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "minicloud", version, about = "Client for the MiniCloud image backend")]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL for this invocation
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// API key for this invocation
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// View and manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Upload image files
    Upload(UploadCommand),
    /// Show metadata of an image
    Metadata(MetadataCommand),
    /// Request a time-limited signed URL
    Sign(SignCommand),
    /// List images stored on the backend
    List(ListCommand),
    /// Build a transform URL
    Url(UrlCommand),
    /// Show the gallery of remote images and this session's uploads
    Gallery(GalleryCommand),
    /// Generate shell completions
    Completions(CompletionsCommand),
}

/// Maps `-v` occurrences to a filter, falling back to the configured level
fn log_filter(verbose: u8, configured: &str) -> String {
    match verbose {
        0 => configured.to_string(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let ctx = CliContext::load(
        cli.config.clone(),
        cli.base_url.clone(),
        cli.api_key.clone(),
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        },
    );

    // Setup tracing
    let filter = log_filter(cli.verbose, &ctx.config.logging.level);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Config(cmd) => cmd.execute(&ctx).await,
        Commands::Upload(cmd) => cmd.execute(&ctx).await,
        Commands::Metadata(cmd) => cmd.execute(&ctx).await,
        Commands::Sign(cmd) => cmd.execute(&ctx).await,
        Commands::List(cmd) => cmd.execute(&ctx).await,
        Commands::Url(cmd) => cmd.execute(&ctx).await,
        Commands::Gallery(cmd) => cmd.execute(&ctx).await,
        Commands::Completions(cmd) => cmd.execute(&ctx).await,
    }
}
