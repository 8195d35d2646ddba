//! Unsplash random-photo client.
//!
//! Thin HTTP wrapper for `GET /photos/random`. Pure parsing in
//! `parse_response` for testability.

use std::time::Duration;

use super::{ImageSource, PhotoMeta, ProviderError};
use crate::config::ProviderTimeouts;

const RANDOM_PHOTO_PATH: &str = "/photos/random";

// =============================================================================
// CLIENT
// =============================================================================

pub struct UnsplashClient {
    http: reqwest::Client,
    base_url: String,
    access_key: Option<String>,
}

impl UnsplashClient {
    /// Build a client. A `None` key is allowed; every fetch then fails with
    /// [`ProviderError::MissingCredentials`] without touching the network.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(base_url: String, access_key: Option<String>, timeouts: ProviderTimeouts) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ProviderError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url, access_key })
    }

    fn endpoint(&self) -> String {
        format!("{}{RANDOM_PHOTO_PATH}", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl ImageSource for UnsplashClient {
    async fn random_photo(&self) -> Result<PhotoMeta, ProviderError> {
        let Some(key) = self.access_key.as_deref() else {
            return Err(ProviderError::MissingCredentials);
        };

        let response = self
            .http
            .get(self.endpoint())
            .query(&[("client_id", key)])
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        if status != 200 {
            return Err(ProviderError::Status { status, body: text });
        }

        parse_response(&text)
    }
}

// =============================================================================
// PARSING
// =============================================================================

/// Only a JSON object is a photo; arrays and scalars are parse errors.
fn parse_response(json: &str) -> Result<PhotoMeta, ProviderError> {
    let value: serde_json::Value = serde_json::from_str(json).map_err(|e| ProviderError::Parse(e.to_string()))?;
    if !value.is_object() {
        return Err(ProviderError::Parse("expected a photo object".into()));
    }
    serde_json::from_value(value).map_err(|e| ProviderError::Parse(e.to_string()))
}

#[cfg(test)]
#[path = "unsplash_test.rs"]
mod tests;
