//! Canonical encoding of an ordered event list and its Keccak-256 commitment.
//!
//! The encoding is compact JSON with a fixed layout:
//!
//! ```text
//! [{"blockNumber":<dec>,"data":"0x..","logIndex":<dec>,"topics":["0x..",..],"txHash":"0x.."},..]
//! ```
//!
//! Keys are in lexicographic order, there is no whitespace, integers are plain
//! decimal and every hex value is lower-case with a `0x` prefix. The empty list
//! encodes as `[]`.

use alloy_primitives::{B256, hex, keccak256};

use crate::models::datasets::events::EventRecord;

/// Keccak-256 of the canonical encoding of an empty event list (`[]`).
pub const EMPTY_COMMITMENT: B256 =
    alloy_primitives::b256!("0x518674ab2b227e5f11e9084f615d57663cde47bce1ba168b4c19c7ee22a73d70");

pub fn canonical_encoding(events: &[EventRecord]) -> String {
    let mut out = String::with_capacity(2 + events.len() * 256);
    out.push('[');
    for (i, event) in events.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        encode_event(&mut out, event);
    }
    out.push(']');
    out
}

fn encode_event(out: &mut String, event: &EventRecord) {
    out.push_str("{\"blockNumber\":");
    out.push_str(&event.block_number.to_string());
    out.push_str(",\"data\":\"");
    out.push_str(&hex::encode_prefixed(&event.data));
    out.push_str("\",\"logIndex\":");
    out.push_str(&event.log_index.to_string());
    out.push_str(",\"topics\":[");
    for (i, topic) in event.topics.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push('"');
        out.push_str(&hex::encode_prefixed(topic));
        out.push('"');
    }
    out.push_str("],\"txHash\":\"");
    out.push_str(&hex::encode_prefixed(event.tx_hash));
    out.push_str("\"}");
}

/// Digest over `events` exactly as given; callers sort first.
pub fn commitment(events: &[EventRecord]) -> B256 {
    keccak256(canonical_encoding(events).as_bytes())
}

/// [`commitment`] rendered as `0x` + 64 lower-case hex characters.
pub fn commitment_hex(events: &[EventRecord]) -> String {
    hex::encode_prefixed(commitment(events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Bytes, bytes};

    fn sample_events() -> Vec<EventRecord> {
        vec![
            EventRecord {
                block_number: 10,
                data: Bytes::new(),
                log_index: 1,
                topics: vec![B256::repeat_byte(0xaa)],
                tx_hash: B256::repeat_byte(0x01),
            },
            EventRecord {
                block_number: 10,
                data: bytes!("0x00ff"),
                log_index: 3,
                topics: vec![],
                tx_hash: B256::repeat_byte(0x01),
            },
        ]
    }

    #[test]
    fn test_empty_list_encoding_and_digest() {
        assert_eq!(canonical_encoding(&[]), "[]");
        assert_eq!(commitment(&[]), EMPTY_COMMITMENT);
        assert_eq!(
            commitment_hex(&[]),
            "0x518674ab2b227e5f11e9084f615d57663cde47bce1ba168b4c19c7ee22a73d70"
        );
    }

    #[test]
    fn test_encoding_layout() {
        let tx = format!("0x{}", "01".repeat(32));
        let topic = format!("0x{}", "aa".repeat(32));
        let expected = format!(
            "[{{\"blockNumber\":10,\"data\":\"0x\",\"logIndex\":1,\"topics\":[\"{topic}\"],\"txHash\":\"{tx}\"}},\
             {{\"blockNumber\":10,\"data\":\"0x00ff\",\"logIndex\":3,\"topics\":[],\"txHash\":\"{tx}\"}}]"
        );
        assert_eq!(canonical_encoding(&sample_events()), expected);
    }

    #[test]
    fn test_encoding_matches_compact_serde_output() {
        // Struct fields are declared key-sorted, so serde's compact output is identical
        let events = sample_events();
        assert_eq!(
            canonical_encoding(&events),
            serde_json::to_string(&events).unwrap()
        );
    }

    #[test]
    fn test_known_digest() {
        assert_eq!(
            commitment_hex(&sample_events()),
            "0x0409d14cd2e667953fda051deb751cee86b2c8c112c7a477ae9a2bab85f3e80c"
        );
    }

    #[test]
    fn test_digest_is_order_sensitive() {
        let events = sample_events();
        let reversed: Vec<_> = events.iter().rev().cloned().collect();
        assert_ne!(commitment(&events), commitment(&reversed));
    }

    #[test]
    fn test_digest_format() {
        let digest = commitment_hex(&sample_events());
        assert_eq!(digest.len(), 66);
        assert!(digest.starts_with("0x"));
        assert!(digest[2..].chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }
}
