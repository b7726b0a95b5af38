use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::datasets::events::EventRecord;

pub const SNAPSHOT_MODE: &str = "zk_l1_event_commitment";

// Field declaration order is the emitted key order; keep both structs key-sorted.

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub chain_id: u64,
    pub data: SnapshotData,
    pub generated_at_utc: String,
    pub mode: &'static str,
    pub network: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotData {
    pub address: String,
    pub commitment_keccak: String,
    pub elapsed_sec: f64,
    pub event_count: usize,
    pub events: Vec<EventRecord>,
    pub from_block: u64,
    pub head_block: u64,
    pub to_block: u64,
    pub topics_count: BTreeMap<String, usize>,
}

impl Snapshot {
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
