//! Session lifecycle: login, token refresh, and expiry arbitration.

use std::sync::Arc;

use chrono::{Duration, Utc};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::client::{base_headers, VERSION_HEADER};
use crate::models::{LoginResponse, OauthTokenPayload, SessionInfo};
use crate::{Credentials, Error, Result};

use super::tokens::{AuthAction, OauthTokens};

pub(crate) const ACCOUNT_ID_HEADER: HeaderName = HeaderName::from_static("ig-account-id");

/// Authenticated session against the dealing gateway.
///
/// Owns the OAuth token set and the per-session context established by
/// login. `ensure_authenticated` arbitrates between no-op, refresh and
/// full login from the token's remaining validity.
///
/// The session is not designed for concurrent `ensure_authenticated`
/// calls from independent tasks: a login in flight clears the token set,
/// and a racing caller would observe the gap and trigger a redundant
/// login. Serialize access externally if the client is shared.
#[derive(Clone)]
pub struct Session {
    inner: Arc<RwLock<SessionState>>,
    http: reqwest::Client,
    credentials: Credentials,
    gateway_url: String,
}

#[derive(Default)]
struct SessionState {
    tokens: Option<OauthTokens>,
    info: Option<SessionInfo>,
}

impl Session {
    pub(crate) fn new(
        credentials: Credentials,
        gateway_url: String,
        http: reqwest::Client,
    ) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionState::default())),
            http,
            credentials,
            gateway_url,
        }
    }

    /// Make sure a usable token set exists before a dependent call.
    ///
    /// No-op while the token is valid; refresh inside the grace window
    /// after expiry; full login otherwise. Fully settles (including the
    /// refresh-to-login fallback) before returning.
    pub async fn ensure_authenticated(&self) -> Result<()> {
        let action = AuthAction::decide(self.remaining_validity().await);
        match action {
            AuthAction::Noop => Ok(()),
            AuthAction::Refresh => {
                debug!("access token expired inside grace window, refreshing");
                self.refresh().await
            }
            AuthAction::Login => {
                debug!("no usable token set, performing full login");
                self.login().await.map(drop)
            }
        }
    }

    /// Create a session from scratch.
    ///
    /// Clears any existing token set before the request goes out, so a
    /// half-replaced session can never serve requests. Transport errors
    /// and non-2xx responses propagate; there is no retry.
    pub async fn login(&self) -> Result<SessionInfo> {
        self.inner.write().await.tokens = None;

        let mut headers = base_headers(&self.credentials)?;
        headers.insert(VERSION_HEADER, HeaderValue::from(3u64));

        let url = format!("{}/session", self.gateway_url);
        let response = self
            .http
            .post(&url)
            .headers(headers)
            .json(&json!({
                "identifier": self.credentials.identifier(),
                "password": self.credentials.password(),
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Authentication(format!(
                "login failed ({}): {}",
                status.as_u16(),
                body
            )));
        }

        let login: LoginResponse = response.json().await?;
        let info = SessionInfo::from(&login);
        let tokens = OauthTokens::from_payload(&login.oauth_token, Utc::now());
        debug!(account = %info.account_id, "session created");

        let mut state = self.inner.write().await;
        state.tokens = Some(tokens);
        state.info = Some(info.clone());
        Ok(info)
    }

    /// Exchange the refresh token for a new token set.
    ///
    /// The request is authenticated with the *current* token set, built
    /// directly rather than through `ensure_authenticated` (which would
    /// recurse). A rejected refresh falls back to exactly one full
    /// login; refresh tokens can be invalidated server-side ahead of the
    /// client's own expiry bookkeeping.
    pub async fn refresh(&self) -> Result<()> {
        let (auth, refresh_token) = {
            let state = self.inner.read().await;
            let tokens = state.tokens.as_ref().ok_or(Error::Unauthenticated)?;
            let info = state.info.as_ref().ok_or(Error::Unauthenticated)?;
            (
                auth_header_map(tokens, info)?,
                tokens.refresh_token().to_string(),
            )
        };

        let mut headers = base_headers(&self.credentials)?;
        headers.insert(VERSION_HEADER, HeaderValue::from(1u64));
        for (name, value) in auth.iter() {
            headers.insert(name, value.clone());
        }

        let url = format!("{}/session/refresh-token", self.gateway_url);
        let response = self
            .http
            .post(&url)
            .headers(headers)
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(
                status = %response.status(),
                "token refresh rejected, falling back to full login"
            );
            return self.login().await.map(drop);
        }

        let payload: OauthTokenPayload = response.json().await?;
        self.inner.write().await.tokens =
            Some(OauthTokens::from_payload(&payload, Utc::now()));
        Ok(())
    }

    /// Validity remaining on the current token set, or `None` when
    /// unauthenticated.
    pub async fn remaining_validity(&self) -> Option<Duration> {
        let state = self.inner.read().await;
        state
            .tokens
            .as_ref()
            .map(|tokens| tokens.remaining_validity_at(Utc::now()))
    }

    /// Context established by the last successful login.
    pub async fn session_info(&self) -> Option<SessionInfo> {
        self.inner.read().await.info.clone()
    }

    /// Authorization and account headers from the current token set,
    /// without triggering authentication.
    pub(crate) async fn auth_headers(&self) -> Result<HeaderMap> {
        let state = self.inner.read().await;
        let tokens = state.tokens.as_ref().ok_or(Error::Unauthenticated)?;
        let info = state.info.as_ref().ok_or(Error::Unauthenticated)?;
        auth_header_map(tokens, info)
    }
}

fn auth_header_map(tokens: &OauthTokens, info: &SessionInfo) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let bearer = format!("{} {}", tokens.token_type(), tokens.access_token());
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&bearer)
            .map_err(|_| Error::InvalidInput("access token is not header-safe".into()))?,
    );
    headers.insert(
        ACCOUNT_ID_HEADER,
        HeaderValue::from_str(info.account_id.as_str())
            .map_err(|_| Error::InvalidInput("account id is not header-safe".into()))?,
    );
    Ok(headers)
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("gateway_url", &self.gateway_url)
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_session() -> Session {
        Session::new(
            Credentials::new("key", "alice", "secret"),
            "https://demo-api.ig.com/gateway/deal".to_string(),
            reqwest::Client::new(),
        )
    }

    #[tokio::test]
    async fn test_new_session_is_unauthenticated() {
        let session = test_session();
        assert!(session.remaining_validity().await.is_none());
        assert!(session.session_info().await.is_none());
        assert!(matches!(
            session.auth_headers().await,
            Err(Error::Unauthenticated)
        ));
    }

    #[test]
    fn test_session_debug_redacts() {
        let debug_str = format!("{:?}", test_session());
        assert!(!debug_str.contains("secret"));
        assert!(debug_str.contains("REDACTED"));
    }
}
