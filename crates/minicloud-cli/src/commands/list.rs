//! List command - Print the backend's image listing
//!
//! The raw `/list` answer is normalized first, so the output has the same
//! shape whichever response format the backend uses.

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use crate::context::CliContext;
use crate::output::{format_millis, format_size};

/// Arguments for the list subcommand
#[derive(Debug, Args)]
pub struct ListCommand {}

impl ListCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let formatter = ctx.formatter();

        let listing = ctx
            .client()
            .list()
            .await
            .context("Failed to fetch image listing")?;
        debug!(shape = listing.shape(), "Listing received");
        let entries = listing.into_entries();

        if ctx.is_json() {
            let json = serde_json::to_value(&entries).context("Failed to serialize listing")?;
            formatter.print_json(&json);
            return Ok(());
        }

        formatter.success(&format!(
            "{} image{} on the backend",
            entries.len(),
            if entries.len() == 1 { "" } else { "s" }
        ));
        for entry in &entries {
            formatter.info(&format!(
                "{:<40} {:>10}  {}",
                entry.key,
                format_size(entry.size),
                format_millis(entry.last_modified_millis())
            ));
        }
        Ok(())
    }
}
