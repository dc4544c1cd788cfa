//! Domain entities and pure logic
//!
//! This module contains the core domain types for the MiniCloud client:
//! - Image records from the remote listing, the session log, and the merged view
//! - Transform parameters and the transform URL builder
//! - The list response normalizer
//! - The session upload log
//! - Domain-specific error types

pub mod errors;
pub mod image;
pub mod listing;
pub mod session_log;
pub mod transform;

// Re-export commonly used types
pub use errors::DomainError;
pub use image::{MergedImageRecord, RecordSource, RemoteListingEntry, SessionUploadEntry};
pub use listing::{normalize_listing, ListResponse};
pub use session_log::SessionLog;
pub use transform::{build_image_url, resolve_endpoint, ImageFormat, TransformParams};
