//! # MapGate Session
//!
//! Server-side session storage for the upstream API key: an in-memory
//! `tower-sessions` store, the signed cookie layer, and typed accessors.

pub mod api_key;
pub mod layer;
pub mod store;

pub use api_key::{ApiKey, ApiKeySession, SessionError};
pub use layer::{session_layer, GatewaySessionLayer};
pub use store::MemorySessionStore;
