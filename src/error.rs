//! Error types for the IG API client.

use thiserror::Error;

/// A specialized `Result` type for IG operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all IG API operations.
///
/// Transport and serialization failures are surfaced unmodified; the
/// client performs no internal retries. A rejected token refresh is the
/// one locally-recovered condition: it falls back to a full login and
/// only the login outcome reaches the caller.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Login was rejected by the gateway
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The operation requires a session but none has been established
    #[error("No authenticated session")]
    Unauthenticated,

    /// Streaming setup failed (missing security tokens, transport error)
    #[error("Streaming error: {0}")]
    Streaming(String),

    /// Invalid input provided to a function
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Returns `true` if this is an authentication-related error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Authentication(_) | Error::Unauthenticated)
    }

    /// Returns `true` if this error indicates a client-side issue.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_auth() {
        assert!(Error::Authentication("failed".into()).is_auth_error());
        assert!(Error::Unauthenticated.is_auth_error());
        assert!(!Error::Streaming("closed".into()).is_auth_error());
    }

    #[test]
    fn test_error_client() {
        assert!(Error::InvalidInput("bad".into()).is_client_error());
        assert!(!Error::Unauthenticated.is_client_error());
    }
}
