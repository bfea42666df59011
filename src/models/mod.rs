//! Data models for the IG API.
//!
//! Strongly-typed identifiers live in [`primitives`]; session payloads
//! returned by the gateway live in [`session`].

mod primitives;
mod session;

pub use primitives::{AccountId, ApiVersion, ClientId, Environment};
pub use session::{LoginResponse, OauthTokenPayload, SessionInfo};
