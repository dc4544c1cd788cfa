//! Gallery command - Show the reconciled image gallery
//!
//! Without `--watch` the command polls the backend once and prints the
//! merged view. With `--watch` it runs the reconciliation engine and
//! reprints whenever a poll settles, until Ctrl+C or SIGTERM.

use anyhow::Result;
use clap::Args;
use minicloud_core::domain::MergedImageRecord;
use minicloud_sync::{SyncPhase, SyncStatus};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::context::CliContext;
use crate::output::{format_millis, OutputFormatter};

/// Arguments for the gallery subcommand
#[derive(Debug, Args)]
pub struct GalleryCommand {
    /// Keep polling and reprint on every change
    #[arg(long)]
    pub watch: bool,
}

impl GalleryCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        if self.watch {
            watch_gallery(ctx).await
        } else {
            show_gallery_once(ctx).await
        }
    }
}

/// Polls once and prints the merged view
///
/// A failed poll is reported but the session-only view is still printed.
pub async fn show_gallery_once(ctx: &CliContext) -> Result<()> {
    let formatter = ctx.formatter();
    let reconciler = ctx.reconciler()?;

    if let Err(e) = reconciler.poll_once().await {
        formatter.warn(&format!("Could not refresh remote listing: {e:#}"));
    }

    render_gallery(
        ctx,
        &*formatter,
        &reconciler.merged_view(),
        &reconciler.status(),
    );
    Ok(())
}

async fn watch_gallery(ctx: &CliContext) -> Result<()> {
    let formatter = ctx.formatter();
    let reconciler = ctx.reconciler()?;
    let mut changes = reconciler.subscribe();

    if reconciler.start() == SyncPhase::Disabled {
        formatter.warn("backend.base_url is not set; nothing to watch");
        render_gallery(ctx, &*formatter, &reconciler.merged_view(), &reconciler.status());
        return Ok(());
    }

    let shutdown = CancellationToken::new();
    tokio::spawn(shutdown_signal(shutdown.clone()));

    let mut last_printed: Option<(Vec<MergedImageRecord>, Option<String>)> = None;
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                changes.borrow_and_update();

                let status = reconciler.status();
                if status.syncing {
                    continue;
                }
                let view = reconciler.merged_view();
                let snapshot = (view, status.error.clone());
                if last_printed.as_ref() == Some(&snapshot) {
                    continue;
                }
                render_gallery(ctx, &*formatter, &snapshot.0, &status);
                last_printed = Some(snapshot);
            }
        }
    }

    reconciler.stop();
    info!("Gallery watch finished");
    Ok(())
}

/// Prints the gallery and its sync status
pub fn render_gallery(
    ctx: &CliContext,
    formatter: &dyn OutputFormatter,
    records: &[MergedImageRecord],
    status: &SyncStatus,
) {
    if ctx.is_json() {
        formatter.print_json(&serde_json::json!({
            "status": status,
            "images": records,
        }));
        return;
    }

    formatter.success(&format!(
        "Gallery: {} image{}",
        records.len(),
        if records.len() == 1 { "" } else { "s" }
    ));
    if let Some(error) = &status.error {
        formatter.warn(&format!("Remote listing may be stale: {error}"));
    }
    if let Some(synced) = status.last_synced_at {
        formatter.field(
            "Last synced",
            &synced.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        );
    }
    formatter.info("");
    for line in gallery_lines(records) {
        formatter.info(&line);
    }
}

/// One line per record: source, timestamp, name, and thumbnail URL
fn gallery_lines(records: &[MergedImageRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| {
            format!(
                "[{:<7}] {:<23} {}  {}",
                r.source.to_string(),
                format_millis(r.uploaded_at),
                r.original_name,
                r.backend_url
            )
        })
        .collect()
}

/// Waits for SIGTERM or SIGINT and triggers the cancellation token
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C)");
        }
        _ = terminate => {
            info!("Received SIGTERM");
        }
    }

    token.cancel();
}
