//! Url command - Build a transform URL for an image
//!
//! Width and quality fall back to the configured preview defaults; height
//! and format are only added when given. Parameters are not range-checked.

use anyhow::{Context, Result};
use clap::Args;
use minicloud_core::config::TransformConfig;
use minicloud_core::domain::{ImageFormat, TransformParams};

use crate::context::CliContext;

/// Arguments for the url subcommand
#[derive(Debug, Args)]
pub struct UrlCommand {
    /// Image key
    pub key: String,

    /// Width in pixels
    #[arg(long)]
    pub w: Option<u32>,

    /// Height in pixels
    #[arg(long)]
    pub h: Option<u32>,

    /// Quality
    #[arg(long)]
    pub q: Option<u32>,

    /// Output format (jpg, png, webp, avif)
    #[arg(long)]
    pub fmt: Option<ImageFormat>,
}

impl UrlCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let params = self.params(&ctx.config.transform);
        let url = ctx
            .client()
            .build_image_url(&self.key, &params)
            .context("Failed to build image URL")?;

        if ctx.is_json() {
            ctx.formatter()
                .print_json(&serde_json::json!({ "key": self.key, "url": url }));
        } else {
            println!("{url}");
        }
        Ok(())
    }

    fn params(&self, defaults: &TransformConfig) -> TransformParams {
        TransformParams {
            width: Some(self.w.unwrap_or(defaults.preview_width)),
            height: self.h,
            quality: Some(self.q.unwrap_or(defaults.preview_quality)),
            format: self.fmt.unwrap_or_default(),
        }
    }
}
