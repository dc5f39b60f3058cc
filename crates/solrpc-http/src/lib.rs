//! solrpc-http — pooled HTTP transport for solrpc.
//!
//! # Quick start
//! ```rust,no_run
//! use std::time::Duration;
//! use solrpc_core::CancellationToken;
//!
//! # async fn run() -> Result<(), solrpc_core::ClientError> {
//! let client = solrpc_http::rpc_client("https://api.devnet.solana.com", Duration::from_secs(10))?;
//! let cancel = CancellationToken::new();
//! client.test_connection(&cancel).await?;
//! println!("version: {}", client.get_version(&cancel).await?);
//! # Ok(())
//! # }
//! ```

pub mod transport;

pub use transport::{rpc_client, rpc_client_with, HttpTransport, HttpTransportConfig};
