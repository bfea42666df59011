//! Client configuration options.

use std::time::Duration;

/// Configuration for the IG client.
///
/// # Example
///
/// ```
/// use ig_markets_rs::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_timeout(Duration::from_secs(60))
///     .with_user_agent("my-app/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Override for the dealing-gateway base URL. When unset, the URL is
    /// derived from the environment. Intended for tests against a local
    /// mock gateway.
    pub gateway_url: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("ig-markets-rs/{} (Rust)", env!("CARGO_PKG_VERSION")),
            gateway_url: None,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Override the dealing-gateway base URL.
    pub fn with_gateway_url(mut self, url: impl Into<String>) -> Self {
        self.gateway_url = Some(url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("ig-markets-rs/"));
    }

    #[test]
    fn test_builder_overrides() {
        let config = ClientConfig::new()
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("bot/2.0")
            .with_gateway_url("http://127.0.0.1:9999/gateway/deal");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "bot/2.0");
        assert_eq!(
            config.gateway_url.as_deref(),
            Some("http://127.0.0.1:9999/gateway/deal")
        );
    }
}
