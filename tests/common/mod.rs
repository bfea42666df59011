//! Shared fixtures: a mock dealing gateway and an in-memory push
//! transport standing in for the streaming engine.

#![allow(dead_code)]

use std::sync::Once;

use serde_json::json;
use wiremock::MockServer;

use ig_markets_rs::streaming::{
    ConnectionListener, PushConnection, PushTransport, RawItemUpdate,
    SubscriptionListener, SubscriptionSpec,
};
use ig_markets_rs::{ClientConfig, Credentials, Environment, IgClient, Result};

static INIT: Once = Once::new();

/// Initialize logging for tests.
pub fn init_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Client wired to a mock gateway.
pub fn gateway_client(server: &MockServer) -> IgClient {
    init_logging();
    IgClient::with_config(
        Credentials::new("test-api-key", "alice", "hunter2"),
        Environment::Demo,
        ClientConfig::default()
            .with_gateway_url(format!("{}/gateway/deal", server.uri())),
    )
    .expect("client should build")
}

/// OAuth token payload as the gateway encodes it (`expires_in` is a
/// JSON string).
pub fn token_body(access: &str, refresh: &str, expires_in: &str) -> serde_json::Value {
    json!({
        "access_token": access,
        "refresh_token": refresh,
        "token_type": "Bearer",
        "expires_in": expires_in,
    })
}

/// Login response body for `POST /session` version 3.
pub fn login_body(expires_in: &str) -> serde_json::Value {
    json!({
        "clientId": "100123456",
        "accountId": "Z3E6JQ",
        "timezoneOffset": 1,
        "lightstreamerEndpoint": "https://apd.marketdatasystems.com",
        "oauthToken": token_body("access-1", "refresh-1", expires_in),
    })
}

/// In-memory push transport. Captures everything the bridges configure
/// and lets tests fire transport events by hand.
#[derive(Default)]
pub struct FakeTransport;

impl PushTransport for FakeTransport {
    type Connection = FakeConnection;

    fn open(&self, endpoint: &str) -> Result<FakeConnection> {
        Ok(FakeConnection {
            endpoint: endpoint.to_string(),
            user: None,
            password: None,
            connected: false,
            connection_listeners: Vec::new(),
            subscriptions: Vec::new(),
        })
    }
}

pub struct FakeConnection {
    pub endpoint: String,
    pub user: Option<String>,
    pub password: Option<String>,
    pub connected: bool,
    connection_listeners: Vec<Box<dyn ConnectionListener>>,
    subscriptions: Vec<(SubscriptionSpec, Box<dyn SubscriptionListener>)>,
}

impl PushConnection for FakeConnection {
    fn set_user(&mut self, user: String) {
        self.user = Some(user);
    }

    fn set_password(&mut self, password: String) {
        self.password = Some(password);
    }

    fn add_connection_listener(&mut self, listener: Box<dyn ConnectionListener>) {
        self.connection_listeners.push(listener);
    }

    fn connect(&mut self) -> Result<()> {
        self.connected = true;
        Ok(())
    }

    fn subscribe(
        &mut self,
        spec: SubscriptionSpec,
        listener: Box<dyn SubscriptionListener>,
    ) -> Result<()> {
        self.subscriptions.push((spec, listener));
        Ok(())
    }
}

impl FakeConnection {
    pub fn listener_count(&self) -> usize {
        self.connection_listeners.len()
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn spec_at(&self, index: usize) -> &SubscriptionSpec {
        &self.subscriptions[index].0
    }

    pub fn fire_status_change(&self, status: &str) {
        for listener in &self.connection_listeners {
            listener.on_status_change(status);
        }
    }

    pub fn fire_listen_start(&self) {
        for listener in &self.connection_listeners {
            listener.on_listen_start();
        }
    }

    pub fn fire_server_error(&self, code: i32, message: &str) {
        for listener in &self.connection_listeners {
            listener.on_server_error(code, message);
        }
    }

    pub fn fire_subscription(&self, index: usize) {
        self.subscriptions[index].1.on_subscription();
    }

    pub fn fire_unsubscription(&self, index: usize) {
        self.subscriptions[index].1.on_unsubscription();
    }

    pub fn fire_subscription_error(&self, index: usize, code: i32, message: &str) {
        self.subscriptions[index].1.on_subscription_error(code, message);
    }

    pub fn fire_item_update(&self, index: usize, update: &RawItemUpdate) {
        self.subscriptions[index].1.on_item_update(update);
    }
}
