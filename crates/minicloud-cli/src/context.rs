//! Per-invocation state shared by all commands

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use minicloud_client::client::ImageClient;
use minicloud_client::provider::HttpImageBackend;
use minicloud_core::config::{Config, ConfigProvider};
use minicloud_core::domain::SessionLog;
use minicloud_sync::Reconciler;
use tracing::debug;

use crate::output::{get_formatter, OutputFormat, OutputFormatter};

/// Loaded configuration plus the handles built from it
pub struct CliContext {
    pub format: OutputFormat,
    /// Configuration file in use
    pub config_path: PathBuf,
    /// Effective configuration, command-line overrides applied
    pub config: Config,
    pub provider: ConfigProvider,
    pub session: SessionLog,
}

impl CliContext {
    /// Loads the configuration file (defaults if missing) and applies the
    /// `--base-url` / `--api-key` overrides.
    pub fn load(
        config_path: Option<PathBuf>,
        base_url: Option<String>,
        api_key: Option<String>,
        format: OutputFormat,
    ) -> Self {
        let config_path = config_path.unwrap_or_else(Config::default_path);
        let mut config = Config::load_or_default(&config_path);

        if let Some(url) = base_url {
            config.backend.base_url = url;
        }
        if let Some(key) = api_key {
            config.backend.api_key = key;
        }

        let provider = ConfigProvider::from_config(&config);
        Self {
            format,
            config_path,
            config,
            provider,
            session: SessionLog::new(),
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    pub fn formatter(&self) -> Box<dyn OutputFormatter> {
        get_formatter(self.is_json())
    }

    pub fn client(&self) -> ImageClient {
        ImageClient::new(self.provider.clone())
    }

    /// Builds an idle reconciler over the HTTP backend
    ///
    /// Fails when the effective configuration does not validate.
    pub fn reconciler(&self) -> Result<Reconciler> {
        let errors = self.config.validate();
        if !errors.is_empty() {
            let details: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            bail!(
                "Invalid configuration in {}: {}",
                self.config_path.display(),
                details.join("; ")
            );
        }

        debug!(
            interval_secs = self.config.sync.poll_interval_secs,
            "Creating gallery reconciler"
        );
        Ok(Reconciler::new(
            Arc::new(HttpImageBackend::new(self.client())),
            self.provider.clone(),
            self.session.clone(),
            self.config.poll_interval(),
        )
        .with_thumbnail_width(self.config.sync.thumbnail_width))
    }
}
