//! Session payloads returned by the dealing gateway.

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use std::fmt;

use super::{AccountId, ClientId};

/// Response body of a successful `POST /session` (version 3) login.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Client identifier for the logged-in customer.
    pub client_id: ClientId,
    /// Currently selected account.
    pub account_id: AccountId,
    /// Account timezone offset from UTC, in hours.
    pub timezone_offset: f64,
    /// Endpoint URL for the push-streaming transport.
    pub lightstreamer_endpoint: String,
    /// OAuth token payload for subsequent REST calls.
    pub oauth_token: OauthTokenPayload,
}

/// OAuth-shaped token payload as delivered by the gateway.
///
/// Returned by both the login and refresh endpoints. `expires_in` is a
/// lifetime in seconds; the gateway encodes it as a JSON string, so the
/// deserializer accepts both string and number forms.
#[derive(Debug, Clone, Deserialize)]
pub struct OauthTokenPayload {
    /// Bearer token for the `Authorization` header.
    pub access_token: String,
    /// Token presented to the refresh endpoint.
    pub refresh_token: String,
    /// Token type label, e.g. `Bearer`.
    pub token_type: String,
    /// Declared token lifetime in seconds.
    #[serde(deserialize_with = "seconds_from_string_or_number")]
    pub expires_in: i64,
}

/// Per-session context established by login.
///
/// Populated only by a successful login and read by the streaming
/// bridge; absent until the first login completes.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    /// Client identifier for the logged-in customer.
    pub client_id: ClientId,
    /// Currently selected account.
    pub account_id: AccountId,
    /// Account timezone offset from UTC, in hours.
    pub timezone_offset: f64,
    /// Endpoint URL for the push-streaming transport.
    pub lightstreamer_endpoint: String,
}

impl From<&LoginResponse> for SessionInfo {
    fn from(response: &LoginResponse) -> Self {
        Self {
            client_id: response.client_id.clone(),
            account_id: response.account_id.clone(),
            timezone_offset: response.timezone_offset,
            lightstreamer_endpoint: response.lightstreamer_endpoint.clone(),
        }
    }
}

fn seconds_from_string_or_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct SecondsVisitor;

    impl Visitor<'_> for SecondsVisitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number of seconds as an integer or string")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<i64, E> {
            Ok(value)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<i64, E> {
            i64::try_from(value).map_err(E::custom)
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<i64, E> {
            value.parse().map_err(E::custom)
        }
    }

    deserializer.deserialize_any(SecondsVisitor)
}
