//! Client error taxonomy.

use thiserror::Error;

use crate::request::RpcError;

/// Result alias used throughout the client.
pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// Errors that can occur while talking to a node.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be serialized.
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    /// HTTP request failed (connection refused, timeout, DNS, body read).
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body was not valid JSON or had an unexpected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The node answered with a non-zero JSON-RPC error code.
    #[error("{0}")]
    Rpc(RpcError),

    /// The caller's cancellation token fired.
    #[error("request cancelled")]
    Cancelled,

    /// The connection probe ran out of attempts.
    #[error("failed to connect after {attempts} attempts: {source}")]
    ConnectFailed {
        attempts: u32,
        #[source]
        source: Box<ClientError>,
    },
}

impl ClientError {
    /// Returns `true` for network or node-side failures that may clear up
    /// on their own. Classification only; it does not drive any retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Rpc(_))
    }

    /// Returns `true` if the node could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Cancelled | Self::ConnectFailed { .. }
        )
    }

    /// Returns `true` if the node rejected the request.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rpc(_))
    }

    /// Returns `true` if the node answered with something unintelligible.
    pub fn is_unintelligible(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// The node-side error, if this is one.
    pub fn rpc_error(&self) -> Option<&RpcError> {
        match self {
            Self::Rpc(e) => Some(e),
            _ => None,
        }
    }
}
