//! Authentication and session management for the IG API.
//!
//! Login creates an OAuth token set plus per-session context (account,
//! client id, streaming endpoint). Tokens are short-lived; the session
//! keeps itself alive by refreshing expired tokens inside a fixed grace
//! window and falling back to a full login past it.
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
//! println!("streaming endpoint: {}", info.lightstreamer_endpoint);
//! # Ok(())
//! # }
//! ```

mod credentials;
mod session;
mod tokens;

pub use credentials::Credentials;
pub use session::Session;
pub use tokens::{AuthAction, OauthTokens};
