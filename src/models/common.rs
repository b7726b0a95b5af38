use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};

pub const DEFAULT_RPC_URL: &str = "https://mainnet.infura.io/v3/your_api_key";
pub const DEFAULT_BLOCKS: u64 = 200;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub textfile_path: Option<String>,
}

impl MetricsConfig {
    /// Enabled but with nowhere to write the recorded values.
    pub fn lacks_textfile(&self) -> bool {
        self.enabled && self.textfile_path.is_none()
    }
}

/// Process-wide settings, resolved once in `main` and handed down explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub rpc_url: String,
    pub blocks: u64,
    pub pretty: bool,
    pub human: bool,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            blocks: DEFAULT_BLOCKS,
            pretty: false,
            human: true,
            metrics: MetricsConfig::default(),
        }
    }
}

impl Config {
    pub fn uses_placeholder_rpc(&self) -> bool {
        self.rpc_url.contains("your_api_key")
    }
}

/// What to snapshot: one contract, an optional event signature, and a block window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRequest {
    pub address: Address,
    pub topic0: Option<B256>,
    pub from_block: Option<u64>,
    pub to_block: Option<u64>,
    pub blocks: u64,
}

/// Inclusive block range, `from_block <= to_block <= head_block`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    pub from_block: u64,
    pub to_block: u64,
    pub head_block: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    pub address: Address,
    pub topic0: Option<B256>,
    pub from_block: u64,
    pub to_block: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainIdentity {
    pub chain_id: u64,
    pub network: String,
}

impl ChainIdentity {
    pub fn from_chain_id(chain_id: u64) -> Self {
        Self {
            chain_id,
            network: network_name(chain_id),
        }
    }
}

pub fn network_name(chain_id: u64) -> String {
    match chain_id {
        1 => "Ethereum Mainnet".to_string(),
        11155111 => "Sepolia Testnet".to_string(),
        10 => "Optimism".to_string(),
        137 => "Polygon".to_string(),
        42161 => "Arbitrum One".to_string(),
        8453 => "Base".to_string(),
        _ => format!("Unknown (chain ID {chain_id})"),
    }
}
