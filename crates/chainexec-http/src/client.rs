//! HTTP JSON-RPC client backed by `reqwest`.
//!
//! The client does no retrying of its own: one call is one POST. Connection
//! level failures surface as `RequestFailed`; every other outcome is returned
//! as a raw [`HttpReply`] for the classifier.

use async_trait::async_trait;
use std::time::Duration;

use chainexec_core::error::RpcError;
use chainexec_core::request::{HttpReply, JsonRpcRequest};
use chainexec_core::transport::RpcTransport;

/// Configuration for `HttpRpcClient`.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Upper bound on one POST, connect through body read.
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            user_agent: concat!("chainexec/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// HTTP JSON-RPC client. One instance serves any number of endpoint URLs.
#[derive(Debug, Clone)]
pub struct HttpRpcClient {
    http: reqwest::Client,
}

impl HttpRpcClient {
    pub fn new(config: HttpClientConfig) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| RpcError::request_failed(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }

    /// Create with default configuration.
    pub fn with_defaults() -> Result<Self, RpcError> {
        Self::new(HttpClientConfig::default())
    }
}

#[async_trait]
impl RpcTransport for HttpRpcClient {
    async fn post(&self, url: &str, req: &JsonRpcRequest) -> Result<HttpReply, RpcError> {
        let resp = self
            .http
            .post(url)
            .json(req)
            .send()
            .await
            .map_err(|e| {
                tracing::debug!(url, method = %req.method, error = %e, "request failed");
                RpcError::request_failed(e.to_string())
            })?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| {
            RpcError::request_failed(format!("failed to read response body: {e}"))
                .with_http_status(status)
        })?;

        tracing::trace!(url, method = %req.method, status, bytes = body.len(), "rpc reply");
        Ok(HttpReply { status, body })
    }
}
