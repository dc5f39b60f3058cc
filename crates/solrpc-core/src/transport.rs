//! The `RpcTransport` trait — the seam between the codec and the wire.

use async_trait::async_trait;

use crate::error::ClientError;

/// Moves one encoded JSON-RPC request to the node and returns the raw
/// response body.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` for use across Tokio tasks.
///
/// # Object Safety
/// The trait is object-safe and can be stored as `Arc<dyn RpcTransport>`.
#[async_trait]
pub trait RpcTransport: Send + Sync + 'static {
    /// POST `body` (already serialized JSON) and return the full response
    /// body, regardless of HTTP status.
    ///
    /// Network and body-read failures map to [`ClientError::Transport`].
    async fn post(&self, body: Vec<u8>) -> Result<Vec<u8>, ClientError>;

    /// Return the transport's identifier (endpoint URL).
    fn url(&self) -> &str;
}
