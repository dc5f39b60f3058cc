//! Solana-specific request and result types.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of lamports in one SOL.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Finality level requested alongside certain queries.
///
/// `Finalized` > `Confirmed` > `Processed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    #[default]
    Finalized,
    Confirmed,
    Processed,
}

impl Commitment {
    /// Wire name of the commitment level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Finalized => "finalized",
            Self::Confirmed => "confirmed",
            Self::Processed => "processed",
        }
    }
}

impl std::fmt::Display for Commitment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Commitment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "finalized" => Ok(Self::Finalized),
            "confirmed" => Ok(Self::Confirmed),
            "processed" => Ok(Self::Processed),
            other => Err(format!(
                "unknown commitment `{other}` (expected finalized, confirmed or processed)"
            )),
        }
    }
}

/// Config object passed as the single `getEpochInfo` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommitmentConfig {
    pub commitment: Commitment,
}

/// Result of `getEpochInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpochInfo {
    pub absolute_slot: u64,
    pub block_height: u64,
    pub epoch: u64,
    pub slot_index: u64,
    pub slots_in_epoch: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_count: Option<u64>,
}

impl EpochInfo {
    /// First slot of the current epoch.
    pub fn first_slot(&self) -> u64 {
        self.absolute_slot.saturating_sub(self.slot_index)
    }

    /// Slots left until the epoch boundary.
    pub fn slots_remaining(&self) -> u64 {
        self.slots_in_epoch.saturating_sub(self.slot_index)
    }

    /// Fraction of the epoch elapsed, in `[0.0, 1.0]`.
    pub fn progress(&self) -> f64 {
        if self.slots_in_epoch == 0 {
            return 0.0;
        }
        (self.slot_index as f64 / self.slots_in_epoch as f64).min(1.0)
    }
}

/// Result of `getVersion`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    #[serde(rename = "solana-core")]
    pub solana_core: String,
    #[serde(rename = "feature-set", default, skip_serializing_if = "Option::is_none")]
    pub feature_set: Option<u32>,
}

/// Public Solana clusters.
///
/// These are free, rate-limited endpoints suitable for development and
/// smoke testing, not for exporter workloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cluster {
    MainnetBeta,
    Testnet,
    Devnet,
}

impl Cluster {
    /// Every public cluster, mainnet first.
    pub const ALL: [Cluster; 3] = [Self::MainnetBeta, Self::Testnet, Self::Devnet];

    /// Cluster name as used by `--cluster`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MainnetBeta => "mainnet-beta",
            Self::Testnet => "testnet",
            Self::Devnet => "devnet",
        }
    }

    /// Public JSON-RPC endpoint of the cluster.
    pub fn url(&self) -> &'static str {
        match self {
            Self::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Self::Testnet => "https://api.testnet.solana.com",
            Self::Devnet => "https://api.devnet.solana.com",
        }
    }
}

impl FromStr for Cluster {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet-beta" | "mainnet" => Ok(Self::MainnetBeta),
            "testnet" => Ok(Self::Testnet),
            "devnet" => Ok(Self::Devnet),
            other => Err(format!("unknown cluster `{other}`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn commitment_wire_format() {
        let config = CommitmentConfig {
            commitment: Commitment::Confirmed,
        };
        assert_eq!(serde_json::to_value(config).unwrap(), json!({"commitment": "confirmed"}));
        for c in [Commitment::Finalized, Commitment::Confirmed, Commitment::Processed] {
            assert_eq!(c.as_str().parse::<Commitment>().unwrap(), c);
        }
        assert!("recent".parse::<Commitment>().is_err());
    }

    #[test]
    fn epoch_info_decodes_camel_case() {
        let info: EpochInfo = serde_json::from_value(json!({
            "absoluteSlot": 166598,
            "blockHeight": 166500,
            "epoch": 27,
            "slotIndex": 2790,
            "slotsInEpoch": 8192,
            "transactionCount": 22661093
        }))
        .unwrap();
        assert_eq!(info.epoch, 27);
        assert_eq!(info.transaction_count, Some(22661093));
        assert_eq!(info.first_slot(), 163808);
        assert_eq!(info.slots_remaining(), 5402);
        assert!((info.progress() - 2790.0 / 8192.0).abs() < f64::EPSILON);
    }

    #[test]
    fn epoch_info_without_transaction_count() {
        let info: EpochInfo = serde_json::from_value(json!({
            "absoluteSlot": 1, "blockHeight": 1, "epoch": 0, "slotIndex": 1, "slotsInEpoch": 0
        }))
        .unwrap();
        assert_eq!(info.transaction_count, None);
        assert_eq!(info.progress(), 0.0);
    }

    #[test]
    fn version_info_field_names() {
        let v: VersionInfo =
            serde_json::from_value(json!({"solana-core": "1.18.22", "feature-set": 3469865029u32}))
                .unwrap();
        assert_eq!(v.solana_core, "1.18.22");
        assert_eq!(v.feature_set, Some(3469865029));
    }

    #[test]
    fn cluster_lookup() {
        assert_eq!("devnet".parse::<Cluster>().unwrap().url(), "https://api.devnet.solana.com");
        assert_eq!("mainnet".parse::<Cluster>().unwrap(), Cluster::MainnetBeta);
        assert!("localnet".parse::<Cluster>().is_err());
        assert!(Cluster::ALL.iter().all(|c| c.name().parse::<Cluster>() == Ok(*c)));
    }
}
