//! # ig-markets-rs
//!
//! A Rust client for the IG trading platform's dealing gateway.
//!
//! This crate manages the REST session lifecycle (login, OAuth token
//! refresh, expiry arbitration) and bridges IG's push-streaming
//! transport to per-topic subscriptions with decoded field updates.
//!
//! ## Features
//!
//! - **Session lifecycle**: login, automatic token refresh inside the
//!   gateway's grace window, full re-login past it
//! - **Request signing**: API key, per-call `Version` header, and OAuth
//!   authorization injected on one signing path
//! - **Streaming**: security-token handshake for the push transport and
//!   decoded per-topic subscriptions
//! - **Safety**: secrets behind [`secrecy`], no unsafe code
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ig_markets_rs::{Credentials, Environment, IgClient};
//!
//! #[tokio::main]
//! async fn main() -> ig_markets_rs::Result<()> {
//!     let client = IgClient::new(
//!         Credentials::new("api-key", "identifier", "password"),
//!         Environment::Demo,
//!     )?;
//!
//!     let info = client.login().await?;
//!     println!("logged in to account {}", info.account_id);
//!
//!     // Later calls keep the session alive transparently.
//!     client.ensure_authenticated().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Arbitrary Endpoints
//!
//! The gateway surface is large; any endpoint is reachable through the
//! signing path directly:
//!
//! ```rust,no_run
//! use ig_markets_rs::{ApiVersion, Payload};
//! use reqwest::header::HeaderMap;
//! use reqwest::Method;
//! use serde_json::json;
//!
//! # async fn example(client: ig_markets_rs::IgClient) -> ig_markets_rs::Result<()> {
//! let response = client
//!     .request(
//!         ApiVersion::V1,
//!         Method::GET,
//!         "/markets",
//!         Payload::Json(json!({ "searchTerm": "EURUSD" })),
//!         HeaderMap::new(),
//!         true,
//!     )
//!     .await?;
//! let body: serde_json::Value = response.json().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Streaming Example
//!
//! ```rust,ignore
//! use ig_markets_rs::streaming::{ConnectionCallbacks, SubscriptionCallbacks, SubscriptionMode};
//!
//! let bridge = client.streaming();
//! let mut connection = bridge
//!     .open_stream(
//!         &transport, // any PushTransport implementation
//!         ConnectionCallbacks::new().on_status_change(|s| println!("{s}")),
//!     )
//!     .await?;
//!
//! bridge.subscribe(
//!     &mut connection,
//!     SubscriptionMode::Merge,
//!     &["MARKET:CS.D.EURUSD.CFD.IP"],
//!     &["BID", "OFFER"],
//!     SubscriptionCallbacks::new()
//!         .on_item_update(|update| println!("{}: {:?}", update.name(), update.fields())),
//! )?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod streaming;

// Re-export primary types at crate root for convenience
pub use auth::{Credentials, Session};
pub use client::{ClientConfig, IgClient, Payload};
pub use error::{Error, Result};
pub use models::{AccountId, ApiVersion, ClientId, Environment, SessionInfo};

/// Prelude module for convenient imports.
///
/// ```rust
/// use ig_markets_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::auth::{Credentials, Session};
    pub use crate::client::{ClientConfig, IgClient, Payload};
    pub use crate::error::{Error, Result};
    pub use crate::models::{
        AccountId, ApiVersion, ClientId, Environment, SessionInfo,
    };
    pub use crate::streaming::{
        ConnectionCallbacks, ItemUpdate, PushConnection, PushTransport,
        StreamingBridge, SubscriptionCallbacks, SubscriptionMode,
    };
}
