//! MiniCloud Sync - Gallery reconciliation
//!
//! Provides:
//! - Periodic polling of the backend's image listing
//! - Merging of the remote listing with this session's uploads
//! - Sync status and change notifications for presentation
//!
//! ## Modules
//!
//! - [`engine`] - Timer-driven [`Reconciler`](engine::Reconciler) with start/stop liveness
//! - [`merge`] - Pure merge of remote and session records into the gallery view

pub mod engine;
pub mod merge;

pub use engine::{Reconciler, SyncPhase, SyncStatus};
pub use merge::merge_records;
