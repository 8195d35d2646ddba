//! Image provider boundary: remote photo metadata and preloading for new rooms.
//!
//! DESIGN
//! ======
//! Two traits sit at the network boundary so provisioning can be tested with
//! in-memory mocks: [`ImageSource`] fetches metadata for one random photo and
//! [`ImagePreloader`] pulls the image bytes before a room is shown. The
//! production implementations are [`unsplash::UnsplashClient`] and
//! [`preload::HttpPreloader`].

pub mod preload;
pub mod unsplash;

use carousel::rooms::RoomDraft;
use serde::Deserialize;

pub const NO_USERNAME: &str = "No Username";
pub const NO_LOCATION: &str = "No Location";
pub const NO_NAME: &str = "No Name";

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced at the image provider boundary. All of them are recovered
/// by the placeholder sequence.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// No access key is configured.
    #[error("missing provider access key")]
    MissingCredentials,

    /// The HTTP request failed before a response arrived.
    #[error("provider request failed: {0}")]
    Request(String),

    /// The provider answered with a non-success status.
    #[error("provider response error: status {status}")]
    Status { status: u16, body: String },

    /// The response body could not be understood.
    #[error("provider response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

// =============================================================================
// PHOTO METADATA
// =============================================================================

/// The subset of a random-photo response the gallery uses. Every field is
/// optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PhotoMeta {
    #[serde(default)]
    pub urls: PhotoUrls,
    #[serde(default)]
    pub user: Option<PhotoUser>,
    #[serde(default)]
    pub location: Option<PhotoLocation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PhotoUrls {
    #[serde(default)]
    pub full: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PhotoUser {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PhotoLocation {
    #[serde(default)]
    pub country: Option<String>,
}

impl PhotoMeta {
    /// Build the display fields for a new room: title from the username,
    /// primary label from the country, secondary label from the
    /// photographer's name. Missing or blank fields get placeholders.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Parse`] when the photo has no image URL.
    pub fn into_draft(self) -> Result<RoomDraft, ProviderError> {
        let image = non_blank(self.urls.full).ok_or_else(|| ProviderError::Parse("photo has no image url".into()))?;
        let (username, name) = match self.user {
            Some(user) => (non_blank(user.username), non_blank(user.name)),
            None => (None, None),
        };
        let country = self.location.and_then(|l| non_blank(l.country));

        Ok(RoomDraft::new(
            image,
            username.unwrap_or_else(|| NO_USERNAME.to_string()),
            country.unwrap_or_else(|| NO_LOCATION.to_string()),
            name.unwrap_or_else(|| NO_NAME.to_string()),
        ))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// =============================================================================
// TRAITS
// =============================================================================

/// Source of random photo metadata.
#[async_trait::async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetch metadata for one random photo.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] if credentials are missing, the request
    /// fails, or the response is malformed.
    async fn random_photo(&self) -> Result<PhotoMeta, ProviderError>;
}

/// Loads an image ahead of display.
#[async_trait::async_trait]
pub trait ImagePreloader: Send + Sync {
    /// Load the image behind `source`, returning the number of bytes read.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] if the image cannot be fetched.
    async fn preload(&self, source: &str) -> Result<usize, ProviderError>;
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
