//! Subcommand implementations

pub mod completions;
pub mod config;
pub mod gallery;
pub mod list;
pub mod metadata;
pub mod sign;
pub mod upload;
pub mod url;
