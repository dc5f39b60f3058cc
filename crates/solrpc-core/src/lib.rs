//! solrpc-core — JSON-RPC pipeline for querying Solana node status.
//!
//! # Overview
//!
//! The core crate is transport-agnostic and defines:
//!
//! - [`RpcTransport`] — the async trait a transport implements (raw bytes in, raw bytes out)
//! - [`codec`] — JSON-RPC 2.0 envelope construction and typed decoding
//! - [`JsonRpcRequest`] / [`JsonRpcResponse`] / [`RpcError`] — wire types
//! - [`ClientError`] — encode / transport / decode / RPC / cancellation errors
//! - [`CachedSlot`] — single-value TTL cache behind a reader/writer lock
//! - [`probe`] — bounded exponential-backoff connection probe
//! - [`RpcClient`] — typed status methods (`getVersion`, `getHealth`, `getEpochInfo`, ...)
//!
//! The `solrpc-http` crate provides the pooled `reqwest` transport.

pub mod cache;
pub mod client;
pub mod codec;
pub mod error;
pub mod probe;
pub mod request;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::CachedSlot;
pub use client::{ClientConfig, RpcClient};
pub use error::{ClientError, Result};
pub use probe::ProbeConfig;
pub use request::{JsonRpcRequest, JsonRpcResponse, RpcError, RpcParam};
pub use transport::RpcTransport;
pub use types::{Cluster, Commitment, EpochInfo, VersionInfo, LAMPORTS_PER_SOL};

pub use tokio_util::sync::CancellationToken;
