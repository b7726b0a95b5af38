use crate::models::common::BlockRange;
use crate::models::errors::SnapshotError;

/// Resolve the inclusive block range to scan.
///
/// With no explicit bounds the range is the trailing `blocks`-wide window ending at
/// the chain tip. A missing `to_block` defaults to the tip, a missing `from_block`
/// to the window ending at `to_block`. `to_block` is always clamped to the tip.
pub fn resolve_range(
    from_block: Option<u64>,
    to_block: Option<u64>,
    blocks: u64,
    head_block: u64,
) -> Result<BlockRange, SnapshotError> {
    if blocks == 0 {
        return Err(SnapshotError::InvalidWindow { blocks });
    }

    let to_block = to_block.unwrap_or(head_block).min(head_block);
    let from_block = from_block.unwrap_or_else(|| trailing_window_start(to_block, blocks));

    if from_block > to_block {
        return Err(SnapshotError::InvalidRange {
            from_block,
            to_block,
        });
    }

    Ok(BlockRange {
        from_block,
        to_block,
        head_block,
    })
}

// max(0, to - blocks + 1), blocks >= 1
fn trailing_window_start(to_block: u64, blocks: u64) -> u64 {
    to_block.saturating_sub(blocks - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window_ends_at_tip() {
        let range = resolve_range(None, None, 200, 1000).unwrap();
        assert_eq!((range.from_block, range.to_block, range.head_block), (801, 1000, 1000));
    }

    #[test]
    fn test_default_window_near_genesis_starts_at_zero() {
        let range = resolve_range(None, None, 200, 50).unwrap();
        assert_eq!((range.from_block, range.to_block), (0, 50));

        let range = resolve_range(None, None, 1, 0).unwrap();
        assert_eq!((range.from_block, range.to_block), (0, 0));
    }

    #[test]
    fn test_default_window_at_u64_max_tip() {
        let range = resolve_range(None, None, u64::MAX, u64::MAX).unwrap();
        assert_eq!((range.from_block, range.to_block), (1, u64::MAX));

        let range = resolve_range(None, None, 1, u64::MAX).unwrap();
        assert_eq!(range.from_block, u64::MAX);
    }

    #[test]
    fn test_explicit_to_block_is_clamped_to_tip() {
        let range = resolve_range(Some(10), Some(500), 200, 100).unwrap();
        assert_eq!((range.from_block, range.to_block), (10, 100));
    }

    #[test]
    fn test_explicit_bounds_used_verbatim_below_tip() {
        let range = resolve_range(Some(10), Some(20), 200, 100).unwrap();
        assert_eq!((range.from_block, range.to_block), (10, 20));
    }

    #[test]
    fn test_single_bound_fills_the_other() {
        // Only from_block: runs to the tip
        let range = resolve_range(Some(90), None, 200, 100).unwrap();
        assert_eq!((range.from_block, range.to_block), (90, 100));

        // Only to_block: window ending there
        let range = resolve_range(None, Some(60), 10, 100).unwrap();
        assert_eq!((range.from_block, range.to_block), (51, 60));
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let err = resolve_range(Some(200), Some(100), 200, 1000).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::InvalidRange {
                from_block: 200,
                to_block: 100
            }
        ));
    }

    #[test]
    fn test_from_block_beyond_tip_is_rejected() {
        let err = resolve_range(Some(150), Some(500), 200, 100).unwrap_err();
        assert!(matches!(err, SnapshotError::InvalidRange { .. }));
    }

    #[test]
    fn test_zero_window_is_rejected() {
        let err = resolve_range(None, None, 0, 100).unwrap_err();
        assert!(matches!(err, SnapshotError::InvalidWindow { blocks: 0 }));
    }
}
