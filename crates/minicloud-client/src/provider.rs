//! HttpImageBackend - IImageBackend implementation over the HTTP gateway
//!
//! Wraps the [`ImageClient`] to fulfil the [`IImageBackend`] port used by
//! the reconciliation engine.

use anyhow::{Context, Result};
use async_trait::async_trait;
use minicloud_core::domain::ListResponse;
use minicloud_core::ports::IImageBackend;

use crate::client::ImageClient;

/// Backend port adapter delegating to [`ImageClient`]
#[derive(Debug, Clone)]
pub struct HttpImageBackend {
    client: ImageClient,
}

impl HttpImageBackend {
    pub fn new(client: ImageClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ImageClient {
        &self.client
    }
}

#[async_trait]
impl IImageBackend for HttpImageBackend {
    async fn list(&self) -> Result<ListResponse> {
        self.client
            .list()
            .await
            .context("Failed to fetch image listing")
    }
}
