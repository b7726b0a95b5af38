use std::collections::BTreeMap;
use std::time::Duration;

use alloy_primitives::{Address, hex};
use chrono::{DateTime, Utc};

use crate::models::common::{BlockRange, ChainIdentity};
use crate::models::datasets::events::EventRecord;
use crate::models::datasets::snapshot::{SNAPSHOT_MODE, Snapshot, SnapshotData};

pub const GENERATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Occurrences of each `topics[0]`. Events without topics are not counted.
pub fn tally_topic0(events: &[EventRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for topic0 in events.iter().filter_map(EventRecord::topic0) {
        *counts.entry(hex::encode_prefixed(topic0)).or_insert(0) += 1;
    }
    counts
}

pub struct SnapshotParts {
    pub identity: ChainIdentity,
    pub address: Address,
    pub range: BlockRange,
    pub events: Vec<EventRecord>,
    pub commitment: String,
    pub elapsed: Duration,
    pub generated_at: DateTime<Utc>,
}

/// Compose the output document. `events` must already be sorted and committed.
pub fn assemble_snapshot(parts: SnapshotParts) -> Snapshot {
    let topics_count = tally_topic0(&parts.events);

    Snapshot {
        chain_id: parts.identity.chain_id,
        data: SnapshotData {
            address: parts.address.to_checksum(None),
            commitment_keccak: parts.commitment,
            elapsed_sec: round_millis(parts.elapsed),
            event_count: parts.events.len(),
            events: parts.events,
            from_block: parts.range.from_block,
            head_block: parts.range.head_block,
            to_block: parts.range.to_block,
            topics_count,
        },
        generated_at_utc: parts.generated_at.format(GENERATED_AT_FORMAT).to_string(),
        mode: SNAPSHOT_MODE,
        network: parts.identity.network,
    }
}

fn round_millis(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 1000.0).round() / 1000.0
}
