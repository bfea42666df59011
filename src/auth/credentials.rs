//! Account credentials.

use secrecy::{ExposeSecret, SecretString};

/// Credentials for an IG account.
///
/// Immutable after construction. The API key and password are held as
/// [`SecretString`] and never appear in `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    api_key: SecretString,
    identifier: String,
    password: SecretString,
}

impl Credentials {
    /// Create a new credential set.
    ///
    /// # Example
    ///
    /// ```
    /// use ig_markets_rs::Credentials;
    ///
    /// let credentials = Credentials::new("api-key", "username", "password");
    /// assert_eq!(credentials.identifier(), "username");
    /// ```
    pub fn new(
        api_key: impl Into<String>,
        identifier: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            identifier: identifier.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// The account identifier (username).
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub(crate) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    pub(crate) fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .field("identifier", &self.identifier)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
