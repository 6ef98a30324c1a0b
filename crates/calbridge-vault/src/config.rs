//! Vault client configuration.

use std::time::Duration;

use url::Url;

/// Configuration for talking to the token vault.
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// Base URL of the vault API.
    pub base_url: Url,
    /// API key sent on every vault request.
    pub api_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl VaultConfig {
    /// Creates a new vault configuration.
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Self {
        Self {
            base_url,
            api_key: api_key.into(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Builder: set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_timeout() {
        let config = VaultConfig::new("https://vault.internal".parse().unwrap(), "key-1")
            .with_timeout(Duration::from_secs(3));
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.api_key, "key-1");
    }

    #[test]
    fn default_timeout() {
        let config = VaultConfig::new("https://vault.internal".parse().unwrap(), "key-1");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }
}
