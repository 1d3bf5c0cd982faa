//! Summary statistics over recovery distances.
//! Backed by an HDR histogram so percentiles stay exact at block resolution.

use hdrhistogram::Histogram;
use tracing::debug;

use crate::error::Result;

/// Bin edges for recovery distances: unit width up to 3 blocks, then 5-block steps to 100.
pub fn recovery_bin_edges() -> Vec<u64> {
    let mut edges = vec![0, 1, 2, 3];
    edges.extend((5..=100).step_by(5));
    edges
}

/// Count distances per `[edge[k], edge[k+1])` bin; the last bin is closed on the right.
/// Values beyond the last edge are not counted.
pub fn bucket_counts(distances: &[u64], edges: &[u64]) -> Vec<((u64, u64), u64)> {
    let mut buckets: Vec<((u64, u64), u64)> = edges.windows(2).map(|w| ((w[0], w[1]), 0)).collect();
    let last = buckets.len().saturating_sub(1);

    for &d in distances {
        let slot = buckets.iter().position(|&((lo, hi), _)| d >= lo && d < hi);
        match slot {
            Some(k) => buckets[k].1 += 1,
            None if !buckets.is_empty() && d == buckets[last].0 .1 => buckets[last].1 += 1,
            None => {}
        }
    }
    buckets
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecoverySummary {
    pub count: u64,
    pub mean: f64,
    pub p50: u64,
    pub p95: u64,
    pub p99: u64,
    pub max: u64,
}

pub struct RecoveryStats {
    inner: Histogram<u64>,
}

impl RecoveryStats {
    /// Auto-resizing histogram, 3 significant figures.
    pub fn new() -> Result<Self> {
        Ok(Self {
            inner: Histogram::new(3)?,
        })
    }

    pub fn from_distances(distances: &[u64]) -> Result<Self> {
        let mut stats = Self::new()?;
        for &d in distances {
            stats.record(d);
        }
        Ok(stats)
    }

    pub fn record(&mut self, blocks: u64) {
        // Auto-resizing, so only an out-of-range u64 can be refused.
        if let Err(e) = self.inner.record(blocks) {
            debug!("[RECOVERY] dropped sample {blocks}: {e:?}");
        }
    }

    /// None if no samples.
    pub fn summary(&self) -> Option<RecoverySummary> {
        if self.inner.len() == 0 {
            return None;
        }
        Some(RecoverySummary {
            count: self.inner.len(),
            mean: self.inner.mean(),
            p50: self.inner.value_at_quantile(0.5),
            p95: self.inner.value_at_quantile(0.95),
            p99: self.inner.value_at_quantile(0.99),
            max: self.inner.max(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_taper_from_unit_to_five_blocks() {
        let edges = recovery_bin_edges();
        assert_eq!(&edges[..6], &[0, 1, 2, 3, 5, 10]);
        assert_eq!(edges.last(), Some(&100));
        assert_eq!(edges.len(), 24);
    }

    #[test]
    fn buckets_are_half_open_except_the_last() {
        let edges = recovery_bin_edges();
        let buckets = bucket_counts(&[0, 0, 1, 3, 4, 5, 99, 100, 250], &edges);
        assert_eq!(buckets[0], ((0, 1), 2));
        assert_eq!(buckets[1], ((1, 2), 1));
        assert_eq!(buckets[2], ((2, 3), 0));
        assert_eq!(buckets[3], ((3, 5), 2));
        assert_eq!(buckets[4], ((5, 10), 1));
        assert_eq!(buckets.last(), Some(&((95, 100), 2)));
        let total: u64 = buckets.iter().map(|(_, c)| c).sum();
        assert_eq!(total, 8);
    }

    #[test]
    fn empty_stats_have_no_summary() {
        let stats = RecoveryStats::new().unwrap();
        assert!(stats.summary().is_none());
    }

    #[test]
    fn zero_block_recovery_is_recorded() {
        let summary = RecoveryStats::from_distances(&[0, 0, 2]).unwrap().summary().unwrap();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.p50, 0);
        assert_eq!(summary.max, 2);
    }

    #[test]
    fn summary_reports_percentiles() {
        let distances: Vec<u64> = (0..100).collect();
        let summary = RecoveryStats::from_distances(&distances).unwrap().summary().unwrap();
        assert_eq!(summary.count, 100);
        assert_eq!(summary.p50, 49);
        assert_eq!(summary.max, 99);
        assert!((summary.mean - 49.5).abs() < 0.01);
    }
}
