//! Push-streaming bridges: session setup and per-topic subscriptions.
//!
//! The push transport itself (wire protocol, reconnection, event
//! delivery) is an external collaborator behind the traits in
//! [`transport`]. The bridges here authenticate the connection with
//! REST-derived security tokens and decode raw field updates into
//! structured callbacks.
//!
//! # Example
//!
//! ```no_run
//! use ig_markets_rs::streaming::{
//!     ConnectionCallbacks, PushTransport, SubscriptionCallbacks, SubscriptionMode,
//! };
//!
//! # async fn example<T: PushTransport>(
//! #     client: ig_markets_rs::IgClient,
//! #     transport: T,
//! # ) -> ig_markets_rs::Result<()> {
//! let bridge = client.streaming();
//!
//! let mut connection = bridge
//!     .open_stream(
//!         &transport,
//!         ConnectionCallbacks::new()
//!             .on_status_change(|status| println!("status: {status}")),
//!     )
//!     .await?;
//!
//! bridge.subscribe(
//!     &mut connection,
//!     SubscriptionMode::Merge,
//!     &["MARKET:CS.D.EURUSD.CFD.IP"],
//!     &["BID", "OFFER"],
//!     SubscriptionCallbacks::new().on_item_update(|update| {
//!         println!("{}: {:?}", update.name(), update.fields());
//!     }),
//! )?;
//! # Ok(())
//! # }
//! ```

mod subscription;
mod transport;

pub use subscription::{
    ItemUpdate, SubscriptionCallbacks, SubscriptionMode, SubscriptionSpec,
};
pub use transport::{
    ConnectionListener, PushConnection, PushTransport, RawItemUpdate,
    SubscriptionListener,
};

use std::fmt;
use std::sync::Arc;

use reqwest::header::HeaderMap;
use reqwest::Method;
use serde_json::json;
use tracing::debug;

use crate::client::{ClientInner, Payload};
use crate::models::ApiVersion;
use crate::{Error, Result};

use subscription::DecodingListener;

/// Optional connection-level callback hooks.
///
/// Each hook is independently optional. When no hook is set at all, no
/// listener is attached to the connection.
#[derive(Default)]
pub struct ConnectionCallbacks {
    server_error: Option<Box<dyn Fn(i32, &str) + Send + Sync>>,
    listen_start: Option<Box<dyn Fn() + Send + Sync>>,
    status_change: Option<Box<dyn Fn(&str) + Send + Sync>>,
}

impl ConnectionCallbacks {
    /// Create an empty hook set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Called on a fatal server-side connection error.
    pub fn on_server_error(mut self, f: impl Fn(i32, &str) + Send + Sync + 'static) -> Self {
        self.server_error = Some(Box::new(f));
        self
    }

    /// Called when the transport starts listening for events.
    pub fn on_listen_start(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.listen_start = Some(Box::new(f));
        self
    }

    /// Called on every connection status change. This is the caller's
    /// signal that the connection actually came up.
    pub fn on_status_change(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.status_change = Some(Box::new(f));
        self
    }

    fn has_hooks(&self) -> bool {
        self.server_error.is_some()
            || self.listen_start.is_some()
            || self.status_change.is_some()
    }
}

impl fmt::Debug for ConnectionCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionCallbacks")
            .field("server_error", &self.server_error.is_some())
            .field("listen_start", &self.listen_start.is_some())
            .field("status_change", &self.status_change.is_some())
            .finish()
    }
}

/// Relays connection events to whichever hooks are present.
struct CallbackRelay {
    callbacks: ConnectionCallbacks,
}

impl ConnectionListener for CallbackRelay {
    fn on_server_error(&self, code: i32, message: &str) {
        if let Some(hook) = &self.callbacks.server_error {
            hook(code, message);
        }
    }

    fn on_listen_start(&self) {
        if let Some(hook) = &self.callbacks.listen_start {
            hook();
        }
    }

    fn on_status_change(&self, status: &str) {
        if let Some(hook) = &self.callbacks.status_change {
            hook(status);
        }
    }
}

/// Bridge between the REST session and the push transport.
pub struct StreamingBridge {
    inner: Arc<ClientInner>,
}

impl StreamingBridge {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Open an authenticated push connection.
    ///
    /// Fetches the transport security tokens over REST (the OAuth bearer
    /// token is not accepted on the push channel) and composes them into
    /// the connection password. Resolves once `connect` has been
    /// invoked; liveness is reported through the status-change hook on
    /// the transport's own delivery thread.
    pub async fn open_stream<T: PushTransport>(
        &self,
        transport: &T,
        callbacks: ConnectionCallbacks,
    ) -> Result<T::Connection> {
        self.inner.session.ensure_authenticated().await?;
        let info = self
            .inner
            .session
            .session_info()
            .await
            .ok_or(Error::Unauthenticated)?;

        let mut connection = transport.open(&info.lightstreamer_endpoint)?;

        let response = self
            .inner
            .request(
                ApiVersion::V1,
                Method::GET,
                "/session",
                Payload::Json(json!({ "fetchSessionTokens": "true" })),
                HeaderMap::new(),
                true,
            )
            .await?;
        let cst = required_header(&response, "cst")?;
        let security_token = required_header(&response, "x-security-token")?;

        connection.set_user(info.account_id.to_string());
        connection.set_password(format!("CST-{cst}|XST-{security_token}"));

        if callbacks.has_hooks() {
            connection.add_connection_listener(Box::new(CallbackRelay { callbacks }));
        }

        debug!(endpoint = %info.lightstreamer_endpoint, "initiating push connection");
        connection.connect()?;
        Ok(connection)
    }

    /// Create and register one subscription on a live connection.
    ///
    /// Raw updates are decoded against `fields` before reaching the
    /// item-update hook. The subscription is active only once this call
    /// returns.
    pub fn subscribe<C: PushConnection>(
        &self,
        connection: &mut C,
        mode: SubscriptionMode,
        items: &[&str],
        fields: &[&str],
        callbacks: SubscriptionCallbacks,
    ) -> Result<()> {
        let spec = SubscriptionSpec::new(mode, items, fields);
        let listener = DecodingListener::new(spec.fields().to_vec(), callbacks);
        connection.subscribe(spec, Box::new(listener))
    }
}

fn required_header(response: &reqwest::Response, name: &str) -> Result<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| Error::Streaming(format!("missing security token header `{name}`")))
}
