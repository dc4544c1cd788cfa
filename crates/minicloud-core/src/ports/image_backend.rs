//! Image backend port (driven/secondary port)
//!
//! The reconciliation engine polls the backend through this trait. The HTTP
//! implementation lives in `minicloud-client`; tests substitute in-memory
//! fakes.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because errors at port boundaries are
//!   adapter-specific; the engine only needs their display text.
//! - Returns the unnormalized [`ListResponse`]; callers decide when to
//!   reduce it to entries.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::listing::ListResponse;

/// Read access to the backend's image listing
#[async_trait]
pub trait IImageBackend: Send + Sync {
    /// Fetches the current listing (`GET /list`)
    async fn list(&self) -> Result<ListResponse>;
}
