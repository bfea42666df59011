//! OAuth token set and the login/refresh arbitration policy.

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};

use crate::models::OauthTokenPayload;

/// Tolerance period after nominal expiry during which the gateway still
/// honors a refresh. Past it, refresh tokens are purged server-side and
/// only a full login can recover.
pub(crate) const REFRESH_GRACE_SECS: i64 = 5 * 60;

/// The current OAuth token set.
///
/// Either entirely absent (unauthenticated) or fully populated; the
/// session replaces its `Option<OauthTokens>` in a single swap, never
/// field by field.
#[derive(Clone)]
pub struct OauthTokens {
    access_token: SecretString,
    refresh_token: SecretString,
    token_type: String,
    expires_at: DateTime<Utc>,
}

impl OauthTokens {
    /// Build a token set from a gateway payload, stamping the absolute
    /// expiry from the declared lifetime.
    pub(crate) fn from_payload(payload: &OauthTokenPayload, now: DateTime<Utc>) -> Self {
        Self {
            access_token: SecretString::from(payload.access_token.clone()),
            refresh_token: SecretString::from(payload.refresh_token.clone()),
            token_type: payload.token_type.clone(),
            expires_at: now + Duration::seconds(payload.expires_in),
        }
    }

    /// Token type label used to build the `Authorization` header.
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Absolute expiry timestamp.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Validity remaining at `now`. Negative once expired.
    pub fn remaining_validity_at(&self, now: DateTime<Utc>) -> Duration {
        self.expires_at - now
    }

    pub(crate) fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    pub(crate) fn refresh_token(&self) -> &str {
        self.refresh_token.expose_secret()
    }
}

impl std::fmt::Debug for OauthTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OauthTokens")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Outcome of the session-lifecycle arbitration.
///
/// `ensure_authenticated` evaluates this once per call; the mapping from
/// remaining validity to action is kept as a pure function so the
/// grace-window arithmetic is testable without I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    /// Token is still valid; nothing to do.
    Noop,
    /// Token expired within the grace window; attempt a refresh.
    Refresh,
    /// No token, or expired past the grace window; log in from scratch.
    Login,
}

impl AuthAction {
    /// Decide what `ensure_authenticated` must do for a given remaining
    /// validity (`None` = unauthenticated).
    pub fn decide(remaining: Option<Duration>) -> Self {
        let grace = Duration::seconds(REFRESH_GRACE_SECS);
        match remaining {
            None => AuthAction::Login,
            Some(v) if v <= -grace => AuthAction::Login,
            Some(v) if v <= Duration::zero() => AuthAction::Refresh,
            Some(_) => AuthAction::Noop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(expires_in: i64) -> OauthTokenPayload {
        serde_json::from_value(json!({
            "access_token": "access-abc",
            "refresh_token": "refresh-def",
            "token_type": "Bearer",
            "expires_in": expires_in.to_string(),
        }))
        .unwrap()
    }

    #[test]
    fn test_expiry_computed_from_lifetime() {
        let now = Utc::now();
        let tokens = OauthTokens::from_payload(&payload(60), now);
        assert_eq!(tokens.expires_at(), now + Duration::seconds(60));
        assert_eq!(
            tokens.remaining_validity_at(now + Duration::seconds(45)),
            Duration::seconds(15)
        );
    }

    #[test]
    fn test_decide_unauthenticated_logs_in() {
        assert_eq!(AuthAction::decide(None), AuthAction::Login);
    }

    #[test]
    fn test_decide_valid_token_is_noop() {
        assert_eq!(
            AuthAction::decide(Some(Duration::seconds(1))),
            AuthAction::Noop
        );
        assert_eq!(
            AuthAction::decide(Some(Duration::hours(1))),
            AuthAction::Noop
        );
    }

    #[test]
    fn test_decide_within_grace_refreshes() {
        assert_eq!(
            AuthAction::decide(Some(Duration::zero())),
            AuthAction::Refresh
        );
        assert_eq!(
            AuthAction::decide(Some(Duration::seconds(-1))),
            AuthAction::Refresh
        );
        assert_eq!(
            AuthAction::decide(Some(Duration::seconds(-299))),
            AuthAction::Refresh
        );
    }

    #[test]
    fn test_decide_past_grace_logs_in() {
        assert_eq!(
            AuthAction::decide(Some(Duration::seconds(-300))),
            AuthAction::Login
        );
        assert_eq!(
            AuthAction::decide(Some(Duration::seconds(-301))),
            AuthAction::Login
        );
    }

    /// Token issued with a 60 second lifetime: fresh right after login,
    /// refreshable shortly after expiry, full login once the grace
    /// window is behind it.
    #[test]
    fn test_short_lived_token_scenario() {
        let issued = Utc::now();
        let tokens = OauthTokens::from_payload(&payload(60), issued);
        let expiry = tokens.expires_at();

        let at = |now| AuthAction::decide(Some(tokens.remaining_validity_at(now)));

        assert_eq!(at(issued), AuthAction::Noop);
        assert_eq!(at(expiry + Duration::seconds(56)), AuthAction::Refresh);
        assert_eq!(at(expiry + Duration::seconds(301)), AuthAction::Login);
    }

    #[test]
    fn test_tokens_debug_redacts() {
        let tokens = OauthTokens::from_payload(&payload(60), Utc::now());
        let debug_str = format!("{:?}", tokens);
        assert!(!debug_str.contains("access-abc"));
        assert!(!debug_str.contains("refresh-def"));
        assert!(debug_str.contains("REDACTED"));
    }
}
