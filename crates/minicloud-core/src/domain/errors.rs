//! Domain error types
//!
//! Errors raised by pure domain operations: parsing transform tokens and
//! building URLs against a configured base.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// No base URL is configured
    #[error("Base URL is not set")]
    BaseUrlNotSet,

    /// The configured base URL cannot be parsed or cannot carry a path
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Unknown output format token
    #[error("Invalid image format: {0}")]
    InvalidFormat(String),

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}
