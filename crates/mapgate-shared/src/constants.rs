//! Application-wide constants

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_LANG: &str = "en_US";
pub const SESSION_COOKIE_NAME: &str = "mapgate.sid";
pub const SESSION_TTL_HOURS: i64 = 24;
pub const SESSION_SWEEP_INTERVAL_SECS: u64 = 300;
pub const UPSTREAM_TIMEOUT_SECS: u64 = 15;
pub const UPSTREAM_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const ENV_PRODUCTION: &str = "production";
pub const ENV_DEVELOPMENT: &str = "development";
