//! Envelope codec: build a request, ship it, decode the typed result.

use std::time::Instant;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::error::ClientError;
use crate::request::{JsonRpcRequest, JsonRpcResponse, RpcParam};
use crate::transport::RpcTransport;

/// Encode a request body for `method` with `params`.
pub fn encode(method: &str, params: Vec<RpcParam>) -> Result<Vec<u8>, ClientError> {
    serde_json::to_vec(&JsonRpcRequest::new(method, params)).map_err(ClientError::Encode)
}

/// Decode a response body, letting a non-zero error code win over `result`.
pub fn decode<T: DeserializeOwned>(method: &str, body: &[u8]) -> Result<T, ClientError> {
    let resp: JsonRpcResponse = serde_json::from_slice(body).map_err(ClientError::Decode)?;
    resp.into_result(method)
}

/// Call `method` exactly once and decode its result into `T`.
///
/// If `cancel` fires before the exchange completes the in-flight request
/// is dropped and [`ClientError::Cancelled`] is returned.
pub async fn invoke<T: DeserializeOwned>(
    transport: &dyn RpcTransport,
    method: &str,
    params: Vec<RpcParam>,
    cancel: &CancellationToken,
) -> Result<T, ClientError> {
    let body = encode(method, params)?;

    tracing::debug!(
        url = %transport.url(),
        body = %String::from_utf8_lossy(&body),
        "sending RPC request"
    );

    let start = Instant::now();
    let resp = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(ClientError::Cancelled),
        resp = transport.post(body) => resp,
    };
    let resp = match resp {
        Ok(resp) => resp,
        Err(e) => {
            tracing::error!(method, error = %e, "RPC request failed");
            return Err(e);
        }
    };

    tracing::debug!(
        method,
        duration_ms = start.elapsed().as_millis() as u64,
        body = %String::from_utf8_lossy(&resp),
        "RPC request completed"
    );

    decode(method, &resp)
}
