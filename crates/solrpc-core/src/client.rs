//! Typed Solana status methods over any [`RpcTransport`].
//!
//! `getVersion` and `getHealth` are served from a per-method TTL cache;
//! every other method goes to the node on each call.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::cache::CachedSlot;
use crate::codec;
use crate::error::ClientError;
use crate::probe::{self, ProbeConfig};
use crate::request::RpcParam;
use crate::transport::RpcTransport;
use crate::types::{Commitment, CommitmentConfig, EpochInfo, VersionInfo};

/// Configuration for [`RpcClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// How long `getVersion` / `getHealth` results are reused.
    pub cache_ttl: Duration,
    /// Attempt budget and backoff for [`RpcClient::test_connection`].
    pub probe: ProbeConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(60),
            probe: ProbeConfig::default(),
        }
    }
}

/// Long-lived, shareable node status client.
pub struct RpcClient {
    transport: Arc<dyn RpcTransport>,
    probe: ProbeConfig,
    version: CachedSlot<String>,
    health: CachedSlot<String>,
}

impl RpcClient {
    /// Create a client on top of `transport`.
    pub fn new(transport: Arc<dyn RpcTransport>, config: ClientConfig) -> Self {
        Self {
            transport,
            probe: config.probe,
            version: CachedSlot::labeled("version", config.cache_ttl),
            health: CachedSlot::labeled("health", config.cache_ttl),
        }
    }

    /// Create with default configuration.
    pub fn with_transport(transport: Arc<dyn RpcTransport>) -> Self {
        Self::new(transport, ClientConfig::default())
    }

    /// Endpoint this client talks to.
    pub fn url(&self) -> &str {
        self.transport.url()
    }

    /// Time-to-live of the version and health caches.
    pub fn cache_ttl(&self) -> Duration {
        self.version.ttl()
    }

    /// Raw call: send `method` with `params` once and decode the result.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<RpcParam>,
        cancel: &CancellationToken,
    ) -> Result<T, ClientError> {
        codec::invoke(self.transport.as_ref(), method, params, cancel).await
    }

    /// Probe the node with [`Self::get_version`] using the configured
    /// attempt budget.
    pub async fn test_connection(&self, cancel: &CancellationToken) -> Result<(), ClientError> {
        self.test_connection_with(self.probe, cancel).await
    }

    /// Probe the node with an explicit attempt budget.
    pub async fn test_connection_with(
        &self,
        config: ProbeConfig,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        let version = probe::probe(config, cancel, || self.get_version(cancel)).await?;
        tracing::debug!(url = %self.url(), version = %version, "node reachable");
        Ok(())
    }

    /// Estimated production time of `slot`, as unix seconds.
    pub async fn get_block_time(
        &self,
        slot: i64,
        cancel: &CancellationToken,
    ) -> Result<i64, ClientError> {
        self.call("getBlockTime", vec![json!(slot)], cancel).await
    }

    /// Current epoch position at the given `commitment`.
    pub async fn get_epoch_info(
        &self,
        commitment: Commitment,
        cancel: &CancellationToken,
    ) -> Result<EpochInfo, ClientError> {
        let config = serde_json::to_value(CommitmentConfig { commitment })
            .map_err(ClientError::Encode)?;
        self.call("getEpochInfo", vec![config], cancel).await
    }

    /// The node's `solana-core` version, cached for the configured TTL.
    pub async fn get_version(&self, cancel: &CancellationToken) -> Result<String, ClientError> {
        self.version
            .get_or_refresh(async {
                let info: VersionInfo = self.call("getVersion", vec![], cancel).await?;
                Ok::<_, ClientError>(info.solana_core)
            })
            .await
    }

    /// The node's health string (`"ok"` when healthy), cached for the
    /// configured TTL.
    pub async fn get_health(&self, cancel: &CancellationToken) -> Result<String, ClientError> {
        self.health
            .get_or_refresh(self.call("getHealth", vec![], cancel))
            .await
    }

    /// Lowest slot the node has information about in its ledger.
    pub async fn get_minimum_ledger_slot(
        &self,
        cancel: &CancellationToken,
    ) -> Result<i64, ClientError> {
        self.call("minimumLedgerSlot", vec![], cancel).await
    }

    /// Lowest confirmed block that has not been purged from the ledger.
    pub async fn get_first_available_block(
        &self,
        cancel: &CancellationToken,
    ) -> Result<i64, ClientError> {
        self.call("getFirstAvailableBlock", vec![], cancel).await
    }

    /// Drop both cached values so the next reads go to the node.
    pub fn invalidate_cache(&self) {
        self.version.invalidate();
        self.health.invalidate();
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("url", &self.url())
            .field("cache_ttl", &self.cache_ttl())
            .field("probe", &self.probe)
            .finish()
    }
}
