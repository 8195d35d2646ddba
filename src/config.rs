//! Gallery host configuration parsed from environment variables.

pub const DEFAULT_PROVIDER_BASE_URL: &str = "https://api.unsplash.com";
pub const DEFAULT_PROVIDER_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PROVIDER_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_PROVISION_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_EXIT_ANIMATION_MS: u64 = 350;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `PROVIDER_BASE_URL` is not an http(s) URL.
    #[error("invalid PROVIDER_BASE_URL: {0}")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryConfig {
    /// Image provider access key. `None` sends every request down the
    /// placeholder path.
    pub access_key: Option<String>,
    pub provider_base_url: String,
    pub timeouts: ProviderTimeouts,
    /// Window in which repeated add requests collapse into one.
    pub debounce_ms: u64,
    /// How long the host waits before reporting a removal's exit animation done.
    pub exit_animation_ms: u64,
}

impl GalleryConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `UNSPLASH_ACCESS_KEY`: provider key; blank or absent means no key
    /// - `PROVIDER_BASE_URL`: default `https://api.unsplash.com`
    /// - `PROVIDER_REQUEST_TIMEOUT_SECS`: default 10
    /// - `PROVIDER_CONNECT_TIMEOUT_SECS`: default 5
    /// - `PROVISION_DEBOUNCE_MS`: default 300
    /// - `EXIT_ANIMATION_MS`: default 350
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] when the base URL is not http(s).
    pub fn from_env() -> Result<Self, ConfigError> {
        let access_key = std::env::var("UNSPLASH_ACCESS_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let provider_base_url = std::env::var("PROVIDER_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_PROVIDER_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if !(provider_base_url.starts_with("http://") || provider_base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(provider_base_url));
        }

        let timeouts = ProviderTimeouts {
            request_secs: env_parse("PROVIDER_REQUEST_TIMEOUT_SECS", DEFAULT_PROVIDER_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse("PROVIDER_CONNECT_TIMEOUT_SECS", DEFAULT_PROVIDER_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self {
            access_key,
            provider_base_url,
            timeouts,
            debounce_ms: env_parse("PROVISION_DEBOUNCE_MS", DEFAULT_PROVISION_DEBOUNCE_MS),
            exit_animation_ms: env_parse("EXIT_ANIMATION_MS", DEFAULT_EXIT_ANIMATION_MS),
        })
    }
}

pub fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
