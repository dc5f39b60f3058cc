//! JSON-RPC 2.0 wire types.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;

/// Protocol version literal carried by every request.
pub const JSONRPC_VERSION: &str = "2.0";

/// Id used for every request. One logical request is in flight per
/// exchange, so the id is never used for multiplexing.
pub const REQUEST_ID: u64 = 1;

/// A single JSON-RPC parameter value.
pub type RpcParam = Value;

/// A JSON-RPC 2.0 request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    pub params: Vec<RpcParam>,
}

impl JsonRpcRequest {
    /// Create a new JSON-RPC 2.0 request with the fixed id.
    pub fn new(method: impl Into<String>, params: Vec<RpcParam>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.into(),
            id: REQUEST_ID,
            method: method.into(),
            params,
        }
    }
}

/// A JSON-RPC 2.0 error object.
///
/// `method` is never sent by the node; the codec fills it in after decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip)]
    pub method: String,
}

impl RpcError {
    /// Code `0` means "no error".
    pub fn is_error(&self) -> bool {
        self.code != 0
    }
}

impl std::fmt::Display for RpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.method.is_empty() {
            write!(f, "RPC error {}: {}", self.code, self.message)
        } else {
            write!(f, "{} RPC error {}: {}", self.method, self.code, self.message)
        }
    }
}

impl std::error::Error for RpcError {}

/// A JSON-RPC 2.0 response.
///
/// `result` stays untyped until the error object has been checked, so an
/// error always wins over a populated result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse<T = Value> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonrpc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl<T> JsonRpcResponse<T> {
    /// Returns `true` if this response carries no application error.
    pub fn is_ok(&self) -> bool {
        !self.error.as_ref().is_some_and(RpcError::is_error)
    }
}

impl JsonRpcResponse<Value> {
    /// Check the error object, then decode `result` into `T`.
    ///
    /// A missing `result` is treated as JSON `null`, which only decodes if
    /// `T` accepts it.
    pub fn into_result<T: DeserializeOwned>(self, method: &str) -> Result<T, ClientError> {
        if let Some(mut err) = self.error.filter(RpcError::is_error) {
            err.method = method.to_string();
            return Err(ClientError::Rpc(err));
        }
        serde_json::from_value(self.result.unwrap_or(Value::Null)).map_err(ClientError::Decode)
    }
}
