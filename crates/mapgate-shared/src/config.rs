//! Configuration management

use std::fmt;

use config::{builder::DefaultState, Config, ConfigBuilder, Environment, File};
use rand::Rng;
use serde::Deserialize;
use tracing::warn;

use crate::constants::*;
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub session: SessionSettings,
    pub upstream: UpstreamSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    /// Directory holding the built single-page app (must contain `index.html`).
    pub static_dir: String,
}

#[derive(Deserialize, Clone)]
pub struct SessionSettings {
    #[serde(default)]
    pub secret: Option<String>,
    pub cookie_name: String,
    pub ttl_hours: i64,
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamSettings {
    pub script_url: String,
    pub tiles_url: String,
    pub suggest_url: String,
    pub geocode_url: String,
    pub lang: String,
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
}

impl fmt::Debug for SessionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSettings")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("cookie_name", &self.cookie_name)
            .field("ttl_hours", &self.ttl_hours)
            .field("sweep_interval_secs", &self.sweep_interval_secs)
            .finish()
    }
}

impl SessionSettings {
    /// Signing secret. Empty only before `AppConfig::resolve_secret` ran.
    pub fn secret(&self) -> &str {
        self.secret.as_deref().unwrap_or_default()
    }
}

impl AppConfig {
    /// Layered load: defaults, `config/default`, `config/{APP_ENV}`, then the
    /// environment (`APP__PORT`, `UPSTREAM__TIMEOUT_SECONDS`, ...). The plain
    /// `PORT` and `SESSION_SECRET` variables win over everything else. Loading
    /// `.env` is left to the binary.
    pub fn load() -> Result<Self, AppError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| ENV_DEVELOPMENT.into());
        let config = Self::defaults(&env)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true))
            .set_override_option("app.port", std::env::var("PORT").ok())?
            .set_override_option("session.secret", std::env::var("SESSION_SECRET").ok())?
            .build()?;

        let mut cfg: AppConfig = config.try_deserialize()?;
        cfg.resolve_secret()?;
        Ok(cfg)
    }

    /// Builder pre-seeded with every default, so an empty environment still
    /// yields a complete configuration.
    pub fn defaults(env: &str) -> Result<ConfigBuilder<DefaultState>, AppError> {
        let builder = Config::builder()
            .set_default("app.env", env)?
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", i64::from(DEFAULT_PORT))?
            .set_default("app.name", "mapgate")?
            .set_default("app.static_dir", "static")?
            .set_default("session.cookie_name", SESSION_COOKIE_NAME)?
            .set_default("session.ttl_hours", SESSION_TTL_HOURS)?
            .set_default("session.sweep_interval_secs", SESSION_SWEEP_INTERVAL_SECS as i64)?
            .set_default("upstream.script_url", "https://js.api.mappable.world/v3/")?
            .set_default("upstream.tiles_url", "https://tiles.mappable.world")?
            .set_default("upstream.suggest_url", "https://suggest.api.mappable.world/v1/suggest")?
            .set_default("upstream.geocode_url", "https://geocoder.api.mappable.world/v1")?
            .set_default("upstream.lang", DEFAULT_LANG)?
            .set_default("upstream.timeout_seconds", UPSTREAM_TIMEOUT_SECS as i64)?
            .set_default("upstream.connect_timeout_seconds", UPSTREAM_CONNECT_TIMEOUT_SECS as i64)?;
        Ok(builder)
    }

    pub fn is_production(&self) -> bool {
        self.app.env.eq_ignore_ascii_case(ENV_PRODUCTION)
    }

    /// Production refuses to start without a secret; development falls back
    /// to a random one, which invalidates sessions on every restart.
    pub fn resolve_secret(&mut self) -> Result<(), AppError> {
        let missing = self
            .session
            .secret
            .as_deref()
            .map_or(true, |s| s.trim().is_empty());
        if !missing {
            return Ok(());
        }
        if self.is_production() {
            return Err(AppError::MissingSessionSecret);
        }

        warn!("SESSION_SECRET not set, generating an ephemeral secret");
        let bytes: [u8; 32] = rand::rng().random();
        self.session.secret = Some(hex::encode(bytes));
        Ok(())
    }
}
