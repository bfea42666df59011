//! Primitive types and newtypes for type-safe API interactions.
//!
//! This module provides strongly-typed wrappers around string identifiers
//! to prevent mixing up different types of IDs at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A strongly-typed IG account identifier.
///
/// # Example
///
/// ```
/// use ig_markets_rs::AccountId;
///
/// let account = AccountId::new("Z3E6JQ");
/// println!("Account: {}", account);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Create a new account identifier from a string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the account identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A strongly-typed IG client identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    /// Create a new client identifier.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the client identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ClientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for ClientId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ClientId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Numeric API version carried in the `Version` request header.
///
/// IG versions individual endpoints rather than the whole API; each
/// request names the version it targets.
///
/// # Example
///
/// ```
/// use ig_markets_rs::ApiVersion;
///
/// assert_eq!(ApiVersion::V3.to_string(), "3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ApiVersion(u8);

impl ApiVersion {
    /// Version 1.
    pub const V1: ApiVersion = ApiVersion(1);
    /// Version 2.
    pub const V2: ApiVersion = ApiVersion(2);
    /// Version 3.
    pub const V3: ApiVersion = ApiVersion(3);

    /// Create an arbitrary version number.
    pub fn new(version: u8) -> Self {
        Self(version)
    }

    /// Get the version as a number.
    pub fn as_u8(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Environment configuration for the IG API.
///
/// Determines which gateway the client talks to. Demo accounts trade
/// against a separate host with play money.
///
/// # Example
///
/// ```
/// use ig_markets_rs::Environment;
///
/// let env = Environment::Demo;
/// println!("Gateway: {}", env.gateway_url());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Live environment. Real trading with real money.
    Live,
    /// Demo environment for testing.
    #[default]
    Demo,
}

impl Environment {
    /// Get the host for REST API requests.
    pub fn host(&self) -> &'static str {
        match self {
            Environment::Live => "https://api.ig.com",
            Environment::Demo => "https://demo-api.ig.com",
        }
    }

    /// Get the base URL for dealing-gateway requests.
    pub fn gateway_url(&self) -> String {
        format!("{}/gateway/deal", self.host())
    }

    /// Returns `true` if this is the live environment.
    pub fn is_live(&self) -> bool {
        matches!(self, Environment::Live)
    }

    /// Returns `true` if this is the demo environment.
    pub fn is_demo(&self) -> bool {
        matches!(self, Environment::Demo)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Live => write!(f, "live"),
            Environment::Demo => write!(f, "demo"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id() {
        let account = AccountId::new("Z3E6JQ");
        assert_eq!(account.as_str(), "Z3E6JQ");
        assert_eq!(account.to_string(), "Z3E6JQ");
    }

    #[test]
    fn test_client_id() {
        let client: ClientId = "100123456".into();
        assert_eq!(client.as_str(), "100123456");
    }

    #[test]
    fn test_api_version_display() {
        assert_eq!(ApiVersion::V1.to_string(), "1");
        assert_eq!(ApiVersion::new(3), ApiVersion::V3);
    }

    #[test]
    fn test_environment_urls() {
        assert_eq!(Environment::Live.host(), "https://api.ig.com");
        assert_eq!(Environment::Demo.host(), "https://demo-api.ig.com");
        assert_eq!(
            Environment::Demo.gateway_url(),
            "https://demo-api.ig.com/gateway/deal"
        );
    }

    #[test]
    fn test_environment_default_is_demo() {
        assert!(Environment::default().is_demo());
    }
}
