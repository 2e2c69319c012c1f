//! Client configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ClientError, Result};

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.clipmagic.pro";

/// Default per-item timeout in milliseconds. Zero means unbounded.
pub const DEFAULT_TIMEOUT_MS: u64 = 600_000;

/// Configuration for the client: credentials plus batch policy.
///
/// Credentials live here and in the transport only; the compiler and
/// executor never see them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API key sent on every request
    pub api_key: String,
    /// Base URL of the processing API
    pub base_url: String,
    /// Default per-item timeout in milliseconds (0 = unbounded)
    pub timeout_ms: u64,
    /// Keep processing remaining items after one fails
    pub continue_on_failure: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            continue_on_failure: false,
        }
    }
}

impl ClientConfig {
    /// Create a configuration with defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Default per-item timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(ClientError::Config("API key is required".to_string()));
        }
        Url::parse(&self.base_url).map_err(|e| {
            ClientError::Config(format!("Invalid base URL '{}': {}", self.base_url, e))
        })?;
        Ok(())
    }

    /// Build a configuration from `CLIPMAGIC_API_KEY` and (optionally)
    /// `CLIPMAGIC_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("CLIPMAGIC_API_KEY").map_err(|_| {
            ClientError::Config("CLIPMAGIC_API_KEY environment variable is not set".to_string())
        })?;
        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var("CLIPMAGIC_BASE_URL") {
            config.base_url = base_url;
        }
        Ok(config)
    }
}

/// Builder for [`ClientConfig`].
pub struct ConfigBuilder {
    config: ClientConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder.
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    /// Set the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = api_key.into();
        self
    }

    /// Override the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Set the default per-item timeout in milliseconds (0 = unbounded).
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.timeout_ms = timeout_ms;
        self
    }

    /// Set the continue-on-failure batch policy.
    pub fn continue_on_failure(mut self, continue_on_failure: bool) -> Self {
        self.config.continue_on_failure = continue_on_failure;
        self
    }

    /// Finish building.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
