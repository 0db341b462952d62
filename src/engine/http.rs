use super::{ApiResponse, Transport};
use crate::config::ClientConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;

/// reqwest-backed transport. No client-side timeout is set; a stalled call
/// stays pending until the connection resolves.
#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(cfg: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(format!("cv-analysis/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to create HTTP client")?;
        Ok(Self {
            http,
            base_url: cfg.base_url.clone(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn finish(resp: reqwest::Response) -> Result<ApiResponse> {
        let status = resp.status().as_u16();
        let body = resp.text().await.context("failed to read response body")?;
        Ok(ApiResponse { status, body })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, endpoint: &str, payload: &Value) -> Result<ApiResponse> {
        let url = self.url(endpoint);
        tracing::info!(%url, "POST");
        let resp = self
            .http
            .post(&url)
            .json(payload)
            .send()
            .await
            .with_context(|| format!("POST {url} failed"))?;
        tracing::debug!(%url, status = %resp.status(), "response received");
        Self::finish(resp).await
    }

    async fn get(&self, endpoint: &str) -> Result<ApiResponse> {
        let url = self.url(endpoint);
        tracing::debug!(%url, "GET");
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {url} failed"))?;
        Self::finish(resp).await
    }
}
