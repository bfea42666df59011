//! Seam to the external push-streaming transport.
//!
//! The wire protocol, reconnection, and event delivery all belong to the
//! transport library; this module defines the connect/subscribe/listener
//! primitives the bridges drive it through. Implementations adapt a
//! concrete engine (Lightstreamer or compatible) behind these traits.

use crate::streaming::SubscriptionSpec;
use crate::Result;

/// Factory for push connections.
pub trait PushTransport {
    /// Connection type produced by this transport.
    type Connection: PushConnection;

    /// Create an unconnected client for the given endpoint.
    fn open(&self, endpoint: &str) -> Result<Self::Connection>;
}

/// A single push connection.
///
/// `connect` returns once connection establishment has been initiated;
/// actual liveness is reported through the status-change listener on the
/// transport's own delivery thread.
pub trait PushConnection {
    /// Set the connection user identity.
    fn set_user(&mut self, user: String);

    /// Set the connection password.
    fn set_password(&mut self, password: String);

    /// Attach a connection-level event listener.
    fn add_connection_listener(&mut self, listener: Box<dyn ConnectionListener>);

    /// Initiate connection establishment.
    fn connect(&mut self) -> Result<()>;

    /// Register a subscription with this connection. The subscription is
    /// not active before this call returns.
    fn subscribe(
        &mut self,
        spec: SubscriptionSpec,
        listener: Box<dyn SubscriptionListener>,
    ) -> Result<()>;
}

/// Connection-level events delivered by the transport.
///
/// All methods default to no-ops so an adapter only forwards the events
/// it has hooks for.
pub trait ConnectionListener: Send + Sync {
    /// Fatal server-side error on the connection.
    fn on_server_error(&self, _code: i32, _message: &str) {}

    /// The transport has started listening for events.
    fn on_listen_start(&self) {}

    /// Connection status changed (e.g. `CONNECTED:WS-STREAMING`).
    fn on_status_change(&self, _status: &str) {}
}

/// Subscription-level events delivered by the transport.
pub trait SubscriptionListener: Send + Sync {
    /// The subscription became active on the server.
    fn on_subscription(&self) {}

    /// The subscription was torn down.
    fn on_unsubscription(&self) {}

    /// The server rejected the subscription.
    fn on_subscription_error(&self, _code: i32, _message: &str) {}

    /// One item update arrived.
    fn on_item_update(&self, _update: &RawItemUpdate) {}
}

/// An update as delivered by the transport: a topic-prefixed item name
/// plus one encoded string value per field.
#[derive(Debug, Clone)]
pub struct RawItemUpdate {
    item_name: String,
    values: Vec<(String, Option<String>)>,
}

impl RawItemUpdate {
    /// Create an update for the given prefixed item name.
    pub fn new(item_name: impl Into<String>) -> Self {
        Self {
            item_name: item_name.into(),
            values: Vec::new(),
        }
    }

    /// Append a field value. `None` means the field carried no value in
    /// this update.
    pub fn with_value(
        mut self,
        field: impl Into<String>,
        value: Option<impl Into<String>>,
    ) -> Self {
        self.values.push((field.into(), value.map(Into::into)));
        self
    }

    /// The item name as delivered, topic prefix included.
    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    /// Raw value for a field, if one arrived.
    pub fn value(&self, field: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(name, _)| name == field)
            .and_then(|(_, value)| value.as_deref())
    }
}
