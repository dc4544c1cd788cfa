//! Upload command - Send image files to the backend
//!
//! Each file goes through the upload flow, which records it in this
//! session's upload log. Afterwards the merged gallery is printed so the
//! new uploads show up even if the remote listing lags behind.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use minicloud_client::upload::upload_file;
use tracing::{info, warn};

use crate::commands::gallery::show_gallery_once;
use crate::context::CliContext;

/// Arguments for the upload subcommand
#[derive(Debug, Args)]
pub struct UploadCommand {
    /// Image files to upload
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

impl UploadCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let formatter = ctx.formatter();
        let client = ctx.client();
        let thumbnail_width = ctx.config.sync.thumbnail_width;

        let mut failed = 0usize;
        for path in &self.files {
            match upload_file(&client, &ctx.session, path, thumbnail_width).await {
                Ok(entry) => {
                    formatter.success(&format!(
                        "Uploaded {} as {}",
                        entry.original_name, entry.key
                    ));
                }
                Err(e) if e.is_config() => {
                    // Nothing else can succeed without a backend
                    return Err(e.into());
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Upload failed");
                    formatter.error(&format!("{}: {}", path.display(), e));
                    failed += 1;
                }
            }
        }

        info!(
            uploaded = self.files.len() - failed,
            failed, "Upload command finished"
        );

        if !ctx.session.is_empty() {
            show_gallery_once(ctx).await?;
        }

        if failed > 0 {
            anyhow::bail!("{} of {} uploads failed", failed, self.files.len());
        }
        Ok(())
    }
}
