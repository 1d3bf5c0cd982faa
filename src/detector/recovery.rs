use tracing::warn;

use crate::types::Swap;

/// Result of a recovery scan over block-ordered swaps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecoveryScan {
    /// Blocks until the price came back within tolerance, in swap order.
    /// Swaps with no match inside the window contribute nothing.
    pub distances: Vec<u64>,
    /// Anchors skipped because their price was zero, negative or not finite.
    pub skipped_anchors: usize,
}

/// For each swap, scan up to `window - 1` following rows and record the block
/// distance to the first one whose price is within `tolerance` (relative) of
/// the anchor price. First match wins.
///
/// `swaps` must already be sorted by block number.
pub fn recovery_times(swaps: &[Swap], window: usize, tolerance: f64) -> RecoveryScan {
    let n = swaps.len();
    let mut scan = RecoveryScan::default();

    for i in 0..n.saturating_sub(1) {
        let anchor = &swaps[i];
        let p = anchor.actual_price;
        if !(p.is_finite() && p > 0.0) {
            scan.skipped_anchors += 1;
            continue;
        }

        let end = i.saturating_add(window).min(n);
        let recovered = swaps[i + 1..end]
            .iter()
            .find(|s| (s.actual_price - p).abs() / p <= tolerance);

        if let Some(later) = recovered {
            scan.distances.push(later.block_number.saturating_sub(anchor.block_number));
        }
    }

    if scan.skipped_anchors > 0 {
        warn!(
            skipped = scan.skipped_anchors,
            "[RECOVERY] skipped {} swaps with non-positive price",
            scan.skipped_anchors,
        );
    }

    scan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swap(block: u64, price: f64) -> Swap {
        Swap {
            id: format!("1_{block}_0"),
            chain_id: "1".to_string(),
            block_number: block,
            log_index: "0".to_string(),
            sender: "0xabc".to_string(),
            amount0: 1.0,
            amount1: 1.0,
            raw_price: price,
            actual_price: price,
            block_range: (block / 1000) * 1000,
        }
    }

    fn series(points: &[(u64, f64)]) -> Vec<Swap> {
        points.iter().map(|&(b, p)| swap(b, p)).collect()
    }

    #[test]
    fn recovers_on_next_row_when_already_within_tolerance() {
        let swaps = series(&[(100, 1.0), (101, 1.0), (103, 1.00001), (110, 1.0)]);
        let scan = recovery_times(&swaps, 100, 0.00025);
        assert_eq!(scan.distances, vec![1, 2, 7]);
        assert_eq!(scan.skipped_anchors, 0);
    }

    #[test]
    fn last_swap_never_yields_a_distance() {
        let swaps = series(&[(5, 2.0)]);
        assert!(recovery_times(&swaps, 100, 0.00025).distances.is_empty());

        let swaps = series(&[(5, 2.0), (9, 3.0)]);
        assert!(recovery_times(&swaps, 100, 0.00025).distances.is_empty());
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert_eq!(recovery_times(&[], 100, 0.00025), RecoveryScan::default());
    }

    #[test]
    fn first_match_wins_over_closer_match() {
        // Row 1 is inside tolerance but not exact; row 2 is exact. Row 1 must win.
        let swaps = series(&[(10, 1.0), (12, 1.0002), (13, 1.0)]);
        let scan = recovery_times(&swaps, 100, 0.00025);
        assert_eq!(scan.distances[0], 2);
    }

    #[test]
    fn no_entry_when_match_lies_outside_window() {
        // Window 3 covers rows i+1..i+3 exclusive, i.e. two rows ahead.
        let swaps = series(&[(1, 1.0), (2, 2.0), (3, 2.0), (4, 1.0)]);
        let scan = recovery_times(&swaps, 3, 0.00025);
        // Anchor 0 needs row 3, out of reach. Anchor 1 recovers at row 2.
        assert_eq!(scan.distances, vec![1]);

        let wider = recovery_times(&swaps, 4, 0.00025);
        assert_eq!(wider.distances, vec![3, 1]);
    }

    #[test]
    fn oversized_window_is_clamped_to_the_input() {
        let swaps = series(&[(1, 1.0), (2, 1.0), (3, 1.0)]);
        let scan = recovery_times(&swaps, usize::MAX, 0.00025);
        assert_eq!(scan.distances, vec![1, 1]);
    }

    #[test]
    fn tolerance_boundary_is_inclusive() {
        let swaps = series(&[(1, 1.0), (4, 1.5)]);
        assert_eq!(recovery_times(&swaps, 100, 0.5).distances, vec![3]);
        assert!(recovery_times(&swaps, 100, 0.49).distances.is_empty());
    }

    #[test]
    fn zero_price_anchors_are_skipped() {
        let swaps = series(&[(1, 0.0), (2, 0.0), (3, 1.0), (4, 1.0)]);
        let scan = recovery_times(&swaps, 100, 0.00025);
        assert_eq!(scan.skipped_anchors, 2);
        assert_eq!(scan.distances, vec![1]);
    }
}
