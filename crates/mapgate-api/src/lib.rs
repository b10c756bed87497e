//! # MapGate API
//!
//! Proxy gateway: session-scoped handlers that inject the stored API key into
//! calls to the fixed upstream map hosts and relay the answers.

pub mod error;
pub mod handlers;
pub mod proxy_path;
pub mod router;
pub mod state;
pub mod upstream;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
pub use upstream::{MapsUpstream, UpstreamError};
