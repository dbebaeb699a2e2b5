//! Dashboard API client for the container file endpoints.

use async_trait::async_trait;
use serde_json::Value;

use crate::api::types::{ActionRequest, Envelope, ListRequest, RowsPayload};
use crate::error::Result;
use crate::explorer::ContainerContext;
use crate::fs::FileEntry;
use crate::http::HttpClient;
use crate::source::FileSource;

/// Client for the dashboard file API.
///
/// The HTTP implementation of [`FileSource`]: listing, delete and download
/// against a container named by a [`ContainerContext`]. One client serves
/// any number of contexts; the context rides in every request body.
#[derive(Debug)]
pub struct ApiClient {
    http: HttpClient,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client for a dashboard base URL, e.g.
    /// `https://dashboard.example:3618`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: normalize_base(base_url.into()),
        }
    }

    /// Create a new API client with a proxy.
    ///
    /// # Arguments
    /// * `proxy` - Proxy URL (e.g., "http://proxy:8080" or "socks5://proxy:1080")
    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_proxy(base_url: impl Into<String>, proxy: &str) -> Result<Self> {
        Ok(Self {
            http: HttpClient::with_proxy(proxy)?,
            base_url: normalize_base(base_url.into()),
        })
    }

    /// Attach the bearer token sent with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.http.set_token(token);
        self
    }

    /// URL of the terminal endpoint for a container, for embedding layers
    /// that open an exec session next to the file tree.
    pub fn terminal_url(&self, ctx: &ContainerContext) -> String {
        format!(
            "{}/k8s/pod/xterm/ns/{}/pod_name/{}?container_name={}",
            self.base_url,
            ctx.namespace,
            ctx.pod_name,
            urlencoding::encode(&ctx.container_name)
        )
    }

    fn list_url(&self, path: &str) -> String {
        // The listed path goes in the query string as well as the body.
        format!(
            "{}/k8s/file/list?path={}",
            self.base_url,
            urlencoding::encode(path)
        )
    }
}

#[async_trait]
impl FileSource for ApiClient {
    async fn list(&self, ctx: &ContainerContext, path: &str, is_dir: bool) -> Result<Vec<FileEntry>> {
        let body = ListRequest {
            container_name: &ctx.container_name,
            pod_name: &ctx.pod_name,
            namespace: &ctx.namespace,
            is_dir,
            path,
        };
        log::trace!("list {path} in {ctx}");
        let response = self.http.post_json(&self.list_url(path), &body).await?;
        let envelope: Envelope<RowsPayload> = serde_json::from_value(response)?;
        let rows = envelope
            .data
            .and_then(|payload| payload.rows)
            .unwrap_or_default();
        Ok(FileEntry::from_rows(rows))
    }

    async fn delete(&self, ctx: &ContainerContext, path: &str) -> Result<String> {
        let body = ActionRequest {
            container_name: &ctx.container_name,
            pod_name: &ctx.pod_name,
            namespace: &ctx.namespace,
            path,
        };
        let url = format!("{}/k8s/file/delete", self.base_url);
        log::trace!("delete {path} in {ctx}");
        let response = self.http.post_json(&url, &body).await?;
        let envelope: Envelope<Value> = serde_json::from_value(response)?;
        Ok(envelope.msg.unwrap_or_default())
    }

    async fn download(&self, ctx: &ContainerContext, path: &str) -> Result<Vec<u8>> {
        let body = ActionRequest {
            container_name: &ctx.container_name,
            pod_name: &ctx.pod_name,
            namespace: &ctx.namespace,
            path,
        };
        let url = format!("{}/k8s/file/download", self.base_url);
        log::trace!("download {path} in {ctx}");
        self.http.post_bytes(&url, &body).await
    }
}

fn normalize_base(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}
