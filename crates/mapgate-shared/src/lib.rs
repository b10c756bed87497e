//! # MapGate Shared
//!
//! Configuration, telemetry, and error types shared by the gateway crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod telemetry;

pub use error::AppError;
