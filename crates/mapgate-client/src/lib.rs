//! # MapGate Client
//!
//! Client-side flows over the gateway: bootstrap (key check, key entry,
//! script load, runtime init) and debounced search with geocoding.

pub mod bootstrap;
pub mod debounce;
pub mod error;
pub mod gateway;
pub mod geocode;
pub mod model;
pub mod runtime;
pub mod search;

pub use bootstrap::{Bootstrap, BootstrapState};
pub use error::ClientError;
pub use gateway::{Gateway, HttpGateway};
pub use model::{Location, Suggestion, SuggestionTitle};
pub use runtime::{HeadlessRuntime, MapRuntime, RuntimeBindings};
pub use search::{InputOutcome, SearchFlow, SearchState};
