use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::ClientError;

/// Path the map script is served from, relative to the gateway origin.
pub const SCRIPT_ENDPOINT: &str = "/api/map-script";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// The gateway's HTTP surface as seen by the client flows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn set_api_key(&self, key: &str) -> Result<(), ClientError>;

    async fn check_api_key(&self) -> Result<bool, ClientError>;

    /// Script body as served by `SCRIPT_ENDPOINT`.
    async fn map_script(&self) -> Result<String, ClientError>;

    async fn suggest(&self, query: &str) -> Result<Value, ClientError>;

    async fn geocode(&self, uri: &str) -> Result<Value, ClientError>;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckApiKeyResponse {
    api_key_exists: bool,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// reqwest-backed gateway. Keeps its own cookie jar, so every call made
/// through one instance shares a session.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base: Url,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base = Url::parse(base_url).map_err(|_| ClientError::InvalidUrl(base_url.to_string()))?;
        let client = Client::builder()
            .cookie_store(true)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, base })
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base
            .join(path)
            .map_err(|_| ClientError::InvalidUrl(path.to_string()))
    }

    async fn post_json(&self, path: &str, body: Value) -> Result<Response, ClientError> {
        debug!(path, "POST");
        let response = self.client.post(self.url(path)?).json(&body).send().await?;
        ensure_success(response).await
    }

    async fn get(&self, path: &str) -> Result<Response, ClientError> {
        debug!(path, "GET");
        let response = self.client.get(self.url(path)?).send().await?;
        ensure_success(response).await
    }
}

/// Turns non-2xx responses into `ClientError::Gateway`, preferring the
/// gateway's JSON `message` over the raw body.
async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.message)
        .unwrap_or(text);
    Err(ClientError::Gateway {
        status: status.as_u16(),
        message,
    })
}

fn parse_json(body: &str) -> Result<Value, ClientError> {
    serde_json::from_str(body).map_err(|e| ClientError::Parse(e.to_string()))
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn set_api_key(&self, key: &str) -> Result<(), ClientError> {
        self.post_json("/api/setApiKey", json!({ "apiKey": key })).await?;
        Ok(())
    }

    async fn check_api_key(&self) -> Result<bool, ClientError> {
        let body = self.get("/api/checkApiKey").await?.text().await?;
        let parsed: CheckApiKeyResponse =
            serde_json::from_str(&body).map_err(|e| ClientError::Parse(e.to_string()))?;
        Ok(parsed.api_key_exists)
    }

    async fn map_script(&self) -> Result<String, ClientError> {
        Ok(self.get(SCRIPT_ENDPOINT).await?.text().await?)
    }

    async fn suggest(&self, query: &str) -> Result<Value, ClientError> {
        let body = self
            .post_json("/api/suggest", json!({ "query": query }))
            .await?
            .text()
            .await?;
        parse_json(&body)
    }

    async fn geocode(&self, uri: &str) -> Result<Value, ClientError> {
        let body = self
            .post_json("/api/geocode", json!({ "uri": uri }))
            .await?
            .text()
            .await?;
        parse_json(&body)
    }
}
