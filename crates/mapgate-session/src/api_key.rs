//! Typed access to the API key held in a session

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_sessions::Session;

/// Session field holding the key.
const API_KEY_FIELD: &str = "apiKey";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session storage error: {0}")]
    Storage(#[from] tower_sessions::session::Error),
}

/// Upstream API key. Formatting never prints the value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    /// Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Raw value, for building upstream requests only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

#[async_trait]
pub trait ApiKeySession {
    /// Store the key. The session id is rotated so a planted cookie cannot
    /// capture someone else's key.
    async fn set_api_key(&self, key: ApiKey) -> Result<(), SessionError>;

    async fn api_key(&self) -> Result<Option<ApiKey>, SessionError>;

    async fn has_api_key(&self) -> Result<bool, SessionError> {
        Ok(self.api_key().await?.is_some())
    }

    /// Forget the key and invalidate the session.
    async fn clear_api_key(&self) -> Result<(), SessionError>;
}

#[async_trait]
impl ApiKeySession for Session {
    async fn set_api_key(&self, key: ApiKey) -> Result<(), SessionError> {
        self.cycle_id().await?;
        self.insert(API_KEY_FIELD, key).await?;
        Ok(())
    }

    async fn api_key(&self) -> Result<Option<ApiKey>, SessionError> {
        Ok(self.get::<ApiKey>(API_KEY_FIELD).await?)
    }

    async fn clear_api_key(&self) -> Result<(), SessionError> {
        self.flush().await?;
        Ok(())
    }
}
