use std::cmp::Ordering;

use tracing::warn;

use crate::models::datasets::events::EventRecord;

/// Total order over event records: `(blockNumber, txHash, logIndex)` ascending.
///
/// Records sharing all three keys are duplicates from the source; they are kept and
/// ordered by topics then data so the result never depends on input order.
pub fn compare_events(a: &EventRecord, b: &EventRecord) -> Ordering {
    a.sort_key()
        .cmp(&b.sort_key())
        .then_with(|| a.topics.cmp(&b.topics))
        .then_with(|| a.data.as_ref().cmp(b.data.as_ref()))
}

/// Sort in place and return the number of records whose key repeats the previous one.
pub fn sort_events(events: &mut [EventRecord]) -> usize {
    events.sort_by(compare_events);

    let mut duplicates = 0;
    for pair in events.windows(2) {
        if pair[0].sort_key() == pair[1].sort_key() {
            duplicates += 1;
            warn!(
                "Duplicate log from source: block {} tx {} logIndex {}",
                pair[1].block_number, pair[1].tx_hash, pair[1].log_index
            );
        }
    }
    duplicates
}
