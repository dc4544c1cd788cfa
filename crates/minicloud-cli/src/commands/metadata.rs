//! Metadata command - Print the backend's metadata for one image

use anyhow::{Context, Result};
use clap::Args;

use crate::context::CliContext;

/// Arguments for the metadata subcommand
#[derive(Debug, Args)]
pub struct MetadataCommand {
    /// Image key
    pub key: String,
}

impl MetadataCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let metadata = ctx
            .client()
            .get_metadata(&self.key)
            .await
            .with_context(|| format!("Failed to fetch metadata for '{}'", self.key))?;

        // Metadata is free-form JSON in both output modes
        println!(
            "{}",
            serde_json::to_string_pretty(&metadata).context("Failed to format metadata")?
        );
        Ok(())
    }
}
