use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Failed to connect to RPC endpoint {endpoint}: {reason}")]
    Connection { endpoint: String, reason: String },

    #[error("Invalid block range: fromBlock {from_block} is greater than toBlock {to_block}")]
    InvalidRange { from_block: u64, to_block: u64 },

    #[error("eth_getLogs failed for blocks [{from_block}, {to_block}]: {message}")]
    RpcQuery {
        from_block: u64,
        to_block: u64,
        message: String,
    },

    #[error("Invalid address: {input:?}")]
    InvalidAddress { input: String },

    #[error("Invalid topic0 {input:?}: {reason}")]
    InvalidTopic { input: String, reason: String },

    #[error("Trailing window must be > 0, got {blocks}")]
    InvalidWindow { blocks: u64 },

    #[error("Missing required field in log entry #{position}: {field}")]
    IncompleteLog { position: usize, field: &'static str },

    #[error("Invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Failed to serialize snapshot: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SnapshotError {
    /// True for errors raised before any RPC traffic, i.e. bad operator input.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidAddress { .. }
                | Self::InvalidTopic { .. }
                | Self::InvalidWindow { .. }
                | Self::Config(_)
        )
    }
}
