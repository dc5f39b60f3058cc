//! Pooled HTTP transport backed by `reqwest`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use solrpc_core::client::{ClientConfig, RpcClient};
use solrpc_core::error::ClientError;
use solrpc_core::transport::RpcTransport;

/// Configuration for `HttpTransport`.
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Overall deadline for one request, including reading the body.
    pub request_timeout: Duration,
    /// Deadline for establishing the TCP/TLS connection.
    pub connect_timeout: Duration,
    /// TCP keep-alive interval for pooled connections.
    pub tcp_keepalive: Duration,
    /// How long an idle pooled connection is kept open.
    pub pool_idle_timeout: Duration,
    /// Upper bound on idle connections kept per host.
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
            tcp_keepalive: Duration::from_secs(30),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 100,
        }
    }
}

impl HttpTransportConfig {
    /// Defaults with the caller's overall request timeout.
    pub fn with_timeout(request_timeout: Duration) -> Self {
        Self {
            request_timeout,
            ..Self::default()
        }
    }
}

/// HTTP JSON-RPC transport. The underlying connection pool is shared by
/// every concurrent caller.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    url: String,
    http: reqwest::Client,
    request_timeout: Duration,
}

impl HttpTransport {
    /// Create a transport for the given JSON-RPC endpoint URL.
    pub fn new(url: impl Into<String>, config: HttpTransportConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .tcp_keepalive(config.tcp_keepalive)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build()
            .map_err(|e| ClientError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: url.into(),
            http,
            request_timeout: config.request_timeout,
        })
    }

    /// Create with default configuration.
    pub fn default_for(url: impl Into<String>) -> Result<Self, ClientError> {
        Self::new(url, HttpTransportConfig::default())
    }

    fn transport_error(&self, e: reqwest::Error) -> ClientError {
        if e.is_timeout() {
            ClientError::Transport(format!(
                "request timed out after {}ms: {e}",
                self.request_timeout.as_millis()
            ))
        } else {
            ClientError::Transport(error_chain(&e))
        }
    }
}

fn error_chain(e: &dyn std::error::Error) -> String {
    let mut msg = e.to_string();
    let mut source = e.source();
    while let Some(inner) = source {
        msg.push_str(": ");
        msg.push_str(&inner.to_string());
        source = inner.source();
    }
    msg
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn post(&self, body: Vec<u8>) -> Result<Vec<u8>, ClientError> {
        let resp = self
            .http
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            // JSON-RPC errors may ride on any status; the codec decides.
            tracing::warn!(status = status.as_u16(), url = %self.url, "non-success HTTP status");
        }

        let bytes = resp.bytes().await.map_err(|e| self.transport_error(e))?;
        Ok(bytes.to_vec())
    }

    fn url(&self) -> &str {
        &self.url
    }
}

/// Build an [`RpcClient`] talking to `url` over HTTP with the given
/// overall request timeout and default cache/probe settings.
pub fn rpc_client(url: impl Into<String>, http_timeout: Duration) -> Result<RpcClient, ClientError> {
    rpc_client_with(url, HttpTransportConfig::with_timeout(http_timeout), ClientConfig::default())
}

/// Build an [`RpcClient`] with explicit transport and client settings.
pub fn rpc_client_with(
    url: impl Into<String>,
    transport: HttpTransportConfig,
    client: ClientConfig,
) -> Result<RpcClient, ClientError> {
    let transport = HttpTransport::new(url, transport)?;
    Ok(RpcClient::new(Arc::new(transport), client))
}
