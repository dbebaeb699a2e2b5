//! HTTP client wrapper for dashboard API requests.

use crate::error::{ExplorerError, Result};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;

/// Status the dashboard answers with when the target cluster has not been
/// connected yet. The response body's `msg` field carries the cluster name.
const STATUS_CLUSTER_NOT_CONNECTED: u16 = 512;

/// HTTP client for making requests to the dashboard.
///
/// Attaches the bearer token to every request and maps the two statuses the
/// dashboard reserves for session problems (401 and 512) to typed errors.
#[derive(Debug)]
pub struct HttpClient {
    client: Client,
    token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client without a token.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            token: None,
        }
    }

    /// Create a new HTTP client with a proxy.
    ///
    /// This method is only available on native targets (not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_proxy(proxy: &str) -> Result<Self> {
        let proxy = reqwest::Proxy::all(proxy)
            .map_err(|e| ExplorerError::Custom(format!("Invalid proxy: {}", e)))?;

        let client = Client::builder()
            .proxy(proxy)
            .build()
            .map_err(|e| ExplorerError::Custom(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            client,
            token: None,
        })
    }

    /// Set the bearer token sent with every subsequent request.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        let mut req = self.client.post(url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    /// Make a POST request with a JSON body and parse the response as JSON.
    pub async fn post_json<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<Value> {
        let response = self.request(url).json(body).send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Make a POST request with a JSON body and return the raw response
    /// bytes, for file content endpoints.
    pub async fn post_bytes<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<Vec<u8>> {
        let response = self.request(url).json(body).send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ExplorerError::AuthRequired);
        }
        if status.as_u16() == STATUS_CLUSTER_NOT_CONNECTED {
            let cluster = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|v| v.get("msg").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_default();
            return Err(ExplorerError::ClusterNotConnected { cluster });
        }
        if !status.is_success() {
            return Err(ExplorerError::HttpError(status.as_u16()));
        }
        Ok(response)
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}
