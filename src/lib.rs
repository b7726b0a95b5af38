//! L1 event-log snapshots with a deterministic Keccak-256 commitment.
//!
//! One invocation resolves a block range against the chain tip, fetches the logs
//! of a single contract, orders them by `(blockNumber, txHash, logIndex)` and hashes
//! their canonical encoding. See [`indexer::build_snapshot`].

pub mod indexer;
pub mod metrics;
pub mod models;
pub mod utils;
