//! Port definitions (hexagonal architecture interfaces)
//!
//! Ports are interfaces that the core depends on, but whose implementations
//! live in adapter crates.
//!
//! - [`IImageBackend`] - Listing access used by the reconciliation engine

pub mod image_backend;

pub use image_backend::IImageBackend;
