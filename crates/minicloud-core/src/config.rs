//! Configuration module for the MiniCloud client.
//!
//! Provides typed configuration structs that map to the YAML configuration
//! file, with loading, saving, validation, defaults, and a builder for
//! programmatic use. [`ConfigProvider`] is the runtime handle through which
//! the gateway and the reconciliation engine read the backend address and
//! API key at call time.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for the MiniCloud client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub sync: SyncConfig,
    pub transform: TransformConfig,
    pub logging: LoggingConfig,
}

/// Backend connection settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Root address of the backend, e.g. `http://localhost:3000`. Empty
    /// until the user configures it.
    pub base_url: String,
    /// Shared secret sent as `x-api-key` on authenticated calls.
    pub api_key: String,
}

/// Gallery reconciliation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Seconds between remote listing polls.
    pub poll_interval_secs: u64,
    /// Width requested for gallery thumbnails.
    pub thumbnail_width: u32,
}

/// Defaults for the interactive preview URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    pub preview_width: u32,
    pub preview_quality: u32,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

// ---------------------------------------------------------------------------
// Loading and saving
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Write the configuration as YAML, creating parent directories.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/minicloud/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("minicloud")
            .join("config.yaml")
    }

    /// Polling period of the reconciliation engine.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.sync.poll_interval_secs)
    }

    /// The `{base_url, api_key}` pair read by the request gateway.
    pub fn request_config(&self) -> RequestConfig {
        RequestConfig {
            base_url: self.backend.base_url.clone(),
            api_key: self.backend.api_key.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 12,
            thumbnail_width: 400,
        }
    }
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            preview_width: 600,
            preview_quality: 80,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"sync.poll_interval_secs"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid. An empty base URL
    /// is valid: the client simply stays disabled until one is set.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- backend ---
        let base_url = self.backend.base_url.trim();
        if !base_url.is_empty() {
            match url::Url::parse(base_url) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {}
                Ok(url) => errors.push(ValidationError {
                    field: "backend.base_url".into(),
                    message: format!("unsupported scheme '{}'; use http or https", url.scheme()),
                }),
                Err(e) => errors.push(ValidationError {
                    field: "backend.base_url".into(),
                    message: format!("not a valid URL: {e}"),
                }),
            }
        }

        // --- sync ---
        if self.sync.poll_interval_secs == 0 {
            errors.push(ValidationError {
                field: "sync.poll_interval_secs".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.sync.thumbnail_width == 0 {
            errors.push(ValidationError {
                field: "sync.thumbnail_width".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- transform ---
        if self.transform.preview_width == 0 {
            errors.push(ValidationError {
                field: "transform.preview_width".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.transform.preview_quality == 0 || self.transform.preview_quality > 100 {
            errors.push(ValidationError {
                field: "transform.preview_quality".into(),
                message: "must be in range 1..=100".into(),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust
/// use minicloud_core::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .base_url("http://localhost:3000")
///     .api_key("secret")
///     .sync_poll_interval_secs(30)
///     .build();
/// assert_eq!(config.sync.poll_interval_secs, 30);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- backend ---

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.backend.base_url = url.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.backend.api_key = key.into();
        self
    }

    // --- sync ---

    pub fn sync_poll_interval_secs(mut self, seconds: u64) -> Self {
        self.config.sync.poll_interval_secs = seconds;
        self
    }

    pub fn sync_thumbnail_width(mut self, width: u32) -> Self {
        self.config.sync.thumbnail_width = width;
        self
    }

    // --- transform ---

    pub fn transform_preview_width(mut self, width: u32) -> Self {
        self.config.transform.preview_width = width;
        self
    }

    pub fn transform_preview_quality(mut self, quality: u32) -> Self {
        self.config.transform.preview_quality = quality;
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// ConfigProvider
// ---------------------------------------------------------------------------

/// Backend address and API key as read at request time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestConfig {
    pub base_url: String,
    pub api_key: String,
}

impl RequestConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Returns true if a non-blank base URL is configured.
    pub fn has_base_url(&self) -> bool {
        !self.base_url.trim().is_empty()
    }
}

/// Shared handle to the current [`RequestConfig`].
///
/// Created once at startup and passed explicitly to the gateway and the
/// reconciliation engine. Clones share the same values, so a setter call
/// is observed by every holder on its next read.
#[derive(Debug, Clone, Default)]
pub struct ConfigProvider {
    inner: Arc<RwLock<RequestConfig>>,
}

impl ConfigProvider {
    pub fn new(config: RequestConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.request_config())
    }

    /// Copy of the current values.
    pub fn snapshot(&self) -> RequestConfig {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn base_url(&self) -> String {
        self.snapshot().base_url
    }

    pub fn api_key(&self) -> String {
        self.snapshot().api_key
    }

    pub fn set_base_url(&self, url: impl Into<String>) {
        self.inner.write().unwrap_or_else(|e| e.into_inner()).base_url = url.into();
    }

    pub fn set_api_key(&self, key: impl Into<String>) {
        self.inner.write().unwrap_or_else(|e| e.into_inner()).api_key = key.into();
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
