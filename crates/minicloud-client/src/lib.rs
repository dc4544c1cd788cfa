//! MiniCloud Client - HTTP gateway for the MiniCloud image backend
//!
//! Provides an async client for:
//! - Uploading images (multipart `POST /upload`)
//! - Fetching metadata and time-limited signed URLs
//! - Listing stored images (normalized to one canonical shape)
//! - Building public transform URLs
//!
//! ## Modules
//!
//! - [`client`] - The request gateway ([`client::ImageClient`])
//! - [`provider`] - [`IImageBackend`](minicloud_core::ports::IImageBackend) adapter
//! - [`signing`] - Signed URL response handling
//! - [`upload`] - File upload flow feeding the session log

pub mod client;
pub mod provider;
pub mod signing;
pub mod upload;

use minicloud_core::domain::DomainError;
use thiserror::Error;

/// Errors that can occur when talking to the image backend
#[derive(Debug, Error)]
pub enum ClientError {
    /// The client is not configured well enough to issue the call
    #[error("Configuration error: {0}")]
    Config(String),

    /// The backend answered with a non-success status
    #[error("{method} {path} failed with status {status}{}", body_suffix(.body))]
    Http {
        method: String,
        path: String,
        status: u16,
        /// Best-effort excerpt of the response body
        body: Option<String>,
    },

    /// A transport-level error occurred (DNS, connection, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body could not be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// An upload succeeded but the backend did not return a key
    #[error("Upload succeeded but no key was returned from the server")]
    MissingKey,

    /// A signed URL response carried no usable URL
    #[error("Signed URL response did not include a URL")]
    MissingSignedUrl,

    /// A local file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// HTTP status for [`ClientError::Http`], `None` otherwise
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, ClientError::Config(_))
    }
}

impl From<DomainError> for ClientError {
    fn from(err: DomainError) -> Self {
        ClientError::Config(err.to_string())
    }
}

fn body_suffix(body: &Option<String>) -> String {
    match body {
        Some(text) => format!(": {text}"),
        None => String::new(),
    }
}
