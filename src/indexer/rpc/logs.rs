use alloy_rpc_types_eth::Log;
use tracing::debug;

use crate::models::datasets::events::EventRecord;
use crate::models::errors::SnapshotError;

const PROGRESS_INTERVAL: usize = 50;

pub trait LogParser {
    fn parse_event_records(self) -> Result<Vec<EventRecord>, SnapshotError>;
}

impl LogParser for Vec<Log> {
    fn parse_event_records(self) -> Result<Vec<EventRecord>, SnapshotError> {
        let total = self.len();
        self.into_iter()
            .enumerate()
            .map(|(position, log)| {
                // Pending logs carry no position on chain and cannot be committed to
                let block_number = log.block_number.ok_or(SnapshotError::IncompleteLog {
                    position,
                    field: "blockNumber",
                })?;
                let tx_hash = log.transaction_hash.ok_or(SnapshotError::IncompleteLog {
                    position,
                    field: "transactionHash",
                })?;
                let log_index = log.log_index.ok_or(SnapshotError::IncompleteLog {
                    position,
                    field: "logIndex",
                })?;

                if (position + 1) % PROGRESS_INTERVAL == 0 {
                    debug!("Normalized {}/{} logs", position + 1, total);
                }

                let (topics, data) = log.inner.data.split();
                Ok(EventRecord {
                    block_number,
                    data,
                    log_index,
                    topics,
                    tx_hash,
                })
            })
            .collect()
    }
}
