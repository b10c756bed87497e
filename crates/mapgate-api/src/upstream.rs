use std::time::Duration;

use bytes::Bytes;
use mapgate_session::ApiKey;
use mapgate_shared::config::UpstreamSettings;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::IgnoredAny;
use thiserror::Error;
use tracing::debug;

use crate::proxy_path::TilePath;

/// Failure talking to an upstream host. Transport errors are stored with
/// their URL stripped, because the URL carries the API key.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("transport error: {0}")]
    Transport(reqwest::Error),

    #[error("upstream responded with {0}")]
    Status(StatusCode),

    #[error("upstream body is not valid JSON")]
    InvalidBody,

    #[error("invalid upstream base URL: {0}")]
    InvalidBaseUrl(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        UpstreamError::Transport(e.without_url())
    }
}

/// Client for the four fixed map hosts (script, tiles, suggest, geocode).
#[derive(Clone)]
pub struct MapsUpstream {
    client: Client,
    script_url: Url,
    tiles_url: Url,
    suggest_url: Url,
    geocode_url: Url,
    lang: String,
}

impl MapsUpstream {
    pub fn new(settings: &UpstreamSettings) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .connect_timeout(Duration::from_secs(settings.connect_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            script_url: parse_base(&settings.script_url)?,
            tiles_url: parse_base(&settings.tiles_url)?,
            suggest_url: parse_base(&settings.suggest_url)?,
            geocode_url: parse_base(&settings.geocode_url)?,
            lang: settings.lang.clone(),
        })
    }

    /// Map SDK loader script.
    pub async fn map_script(&self, key: &ApiKey) -> Result<Bytes, UpstreamError> {
        let response = self
            .send(
                self.script_url.clone(),
                &[("lang", self.lang.as_str()), ("apikey", key.expose())],
            )
            .await?;
        Ok(response.bytes().await?)
    }

    /// Tile or asset below the tile host. The returned response is
    /// successful; its body is left unread so the caller can stream it.
    pub async fn map_resource(
        &self,
        key: &ApiKey,
        path: &TilePath,
        query: &[(String, String)],
    ) -> Result<Response, UpstreamError> {
        let mut url = self.tiles_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::InvalidBaseUrl(self.tiles_url.to_string()))?
            .pop_if_empty()
            .extend(path.segments());

        let mut params: Vec<(&str, &str)> = vec![("apikey", key.expose())];
        params.extend(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        self.send(url, &params).await
    }

    /// Place suggestions for free text. Returns the raw JSON body.
    pub async fn suggest(&self, key: &ApiKey, text: &str) -> Result<Bytes, UpstreamError> {
        self.fetch_json(
            self.suggest_url.clone(),
            &[
                ("lang", self.lang.as_str()),
                ("apikey", key.expose()),
                ("text", text),
                ("print_address", "1"),
                ("attrs", "uri"),
            ],
        )
        .await
    }

    /// Resolve a suggestion `uri` to coordinates. Returns the raw JSON body.
    pub async fn geocode(&self, key: &ApiKey, uri: &str) -> Result<Bytes, UpstreamError> {
        self.fetch_json(
            self.geocode_url.clone(),
            &[
                ("lang", self.lang.as_str()),
                ("format", "json"),
                ("apikey", key.expose()),
                ("uri", uri),
            ],
        )
        .await
    }

    async fn fetch_json(&self, url: Url, params: &[(&str, &str)]) -> Result<Bytes, UpstreamError> {
        let body = self.send(url, params).await?.bytes().await?;
        serde_json::from_slice::<IgnoredAny>(&body).map_err(|_| UpstreamError::InvalidBody)?;
        Ok(body)
    }

    async fn send(&self, url: Url, params: &[(&str, &str)]) -> Result<Response, UpstreamError> {
        debug!(host = url.host_str().unwrap_or_default(), path = url.path(), "Upstream GET");

        let response = self.client.get(url).query(params).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }
        Ok(response)
    }
}

fn parse_base(raw: &str) -> Result<Url, UpstreamError> {
    Url::parse(raw).map_err(|_| UpstreamError::InvalidBaseUrl(raw.to_string()))
}
