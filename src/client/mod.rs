//! HTTP client and request-signing layer for the IG API.
//!
//! [`IgClient`] is the main entry point: it owns the session, signs
//! outgoing requests, and hands out the streaming bridge.
//!
//! # Example
//!
//! ```no_run
//! use ig_markets_rs::{Credentials, Environment, IgClient};
//!
//! # async fn example() -> ig_markets_rs::Result<()> {
//! let client = IgClient::new(
//!     Credentials::new("api-key", "identifier", "password"),
//!     Environment::Demo,
//! )?;
//! let info = client.login().await?;
//! println!("account: {}", info.account_id);
//! # Ok(())
//! # }
//! ```

mod config;
mod http;

pub use config::ClientConfig;
pub use http::{IgClient, Payload};

pub(crate) use http::{base_headers, ClientInner, VERSION_HEADER};
