use alloy_primitives::{B256, Bytes};
use serde::Serialize;

/// One contract log in canonical form.
///
/// Hex fields serialize as lower-case `0x`-prefixed strings. Fields are declared
/// in key order so the emitted JSON object is key-sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub block_number: u64,
    pub data: Bytes,
    pub log_index: u64,
    pub topics: Vec<B256>,
    pub tx_hash: B256,
}

impl EventRecord {
    /// `(blockNumber, txHash, logIndex)`, unique per log on a canonical chain.
    pub fn sort_key(&self) -> (u64, B256, u64) {
        (self.block_number, self.tx_hash, self.log_index)
    }

    pub fn topic0(&self) -> Option<&B256> {
        self.topics.first()
    }
}
