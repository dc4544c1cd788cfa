//! Sign command - Request a time-limited signed URL for an image

use anyhow::{Context, Result};
use clap::Args;
use minicloud_client::client::DEFAULT_SIGNED_URL_EXPIRY_SECS;
use minicloud_client::signing::resolve_signed_url;

use crate::context::CliContext;

/// Arguments for the sign subcommand
#[derive(Debug, Args)]
pub struct SignCommand {
    /// Image key
    pub key: String,

    /// Validity in seconds
    #[arg(long, default_value_t = DEFAULT_SIGNED_URL_EXPIRY_SECS)]
    pub expires: u64,
}

impl SignCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let url = resolve_signed_url(&ctx.client(), &self.key, self.expires)
            .await
            .with_context(|| format!("Failed to sign '{}'", self.key))?;

        if ctx.is_json() {
            ctx.formatter().print_json(&serde_json::json!({
                "key": self.key,
                "expires": self.expires,
                "url": url,
            }));
        } else {
            println!("{url}");
        }
        Ok(())
    }
}
