//! Image preloading over HTTP.
//!
//! Remote images are downloaded in full before the room is handed to the
//! carousel, so a new room never appears half-loaded. Bundled asset paths are
//! local to the renderer and count as already loaded.

use std::time::Duration;

use super::{ImagePreloader, ProviderError};
use crate::config::ProviderTimeouts;

pub struct HttpPreloader {
    http: reqwest::Client,
}

impl HttpPreloader {
    /// # Errors
    ///
    /// Returns [`ProviderError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(timeouts: ProviderTimeouts) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ProviderError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http })
    }
}

/// Whether `source` must be fetched over the network.
#[must_use]
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

#[async_trait::async_trait]
impl ImagePreloader for HttpPreloader {
    async fn preload(&self, source: &str) -> Result<usize, ProviderError> {
        if !is_remote(source) {
            return Ok(0);
        }

        let response = self
            .http
            .get(source)
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status: status.as_u16(), body });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;
        Ok(bytes.len())
    }
}

#[cfg(test)]
#[path = "preload_test.rs"]
mod tests;
