use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::Config;
use crate::detector::recovery_times;
use crate::error::Result;
use crate::normalize::{normalize_swaps, sort_by_block};
use crate::report::{build_views, render_dashboard, write_dashboard};
use crate::stats::{bucket_counts, recovery_bin_edges, RecoveryStats};
use crate::types::{RawSwap, Swap};

pub const NO_DATA_MESSAGE: &str = "No data available to create dashboard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardOutcome {
    Written(PathBuf),
    NoData,
}

impl std::fmt::Display for DashboardOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DashboardOutcome::Written(path) => write!(f, "Dashboard saved as {}", path.display()),
            DashboardOutcome::NoData => write!(f, "{NO_DATA_MESSAGE}"),
        }
    }
}

/// normalize → scan → aggregate → render. Empty input writes nothing.
pub fn create_dashboard(raw: &[RawSwap], cfg: &Config) -> Result<DashboardOutcome> {
    if raw.is_empty() {
        let outcome = DashboardOutcome::NoData;
        warn!("{outcome}");
        return Ok(outcome);
    }

    let mut swaps = normalize_swaps(raw, cfg.token_decimals, cfg.block_range_size)?;
    sort_by_block(&mut swaps);
    log_swap_summary(&swaps);

    let scan = recovery_times(&swaps, cfg.recovery_window, cfg.recovery_tolerance);
    log_recovery_summary(&scan.distances)?;

    let views = build_views(&swaps, &scan.distances, cfg);
    info!(
        recovered = scan.distances.len(),
        plotted = views.recovery_times.len(),
        limit = cfg.recovery_blocks_limit,
        "[RECOVERY] {} of {} distances within 0-{} blocks",
        views.recovery_times.len(),
        scan.distances.len(),
        cfg.recovery_blocks_limit,
    );

    let plot = render_dashboard(&views);
    let path = PathBuf::from(&cfg.output_path);
    write_dashboard(&plot, &path)?;
    Ok(DashboardOutcome::Written(path))
}

fn log_swap_summary(swaps: &[Swap]) {
    let (Some(first), Some(last)) = (swaps.first(), swaps.last()) else {
        return;
    };
    let senders = swaps
        .iter()
        .map(|s| s.sender.as_str())
        .collect::<std::collections::HashSet<_>>()
        .len();
    let (min_price, max_price) = swaps.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
        (lo.min(s.actual_price), hi.max(s.actual_price))
    });
    info!(
        swaps = swaps.len(),
        senders,
        "Normalized {} swaps from {} senders | blocks {}-{} | price {:.6}-{:.6}",
        swaps.len(),
        senders,
        first.block_number,
        last.block_number,
        min_price,
        max_price,
    );
}

fn log_recovery_summary(distances: &[u64]) -> Result<()> {
    let stats = RecoveryStats::from_distances(distances)?;
    let Some(s) = stats.summary() else {
        info!("[RECOVERY] no swap recovered within the lookahead window");
        return Ok(());
    };
    info!(
        count = s.count,
        p50 = s.p50,
        p95 = s.p95,
        p99 = s.p99,
        max = s.max,
        "[RECOVERY] blocks to recover | n={} mean={:.2} p50={} p95={} p99={} max={}",
        s.count, s.mean, s.p50, s.p95, s.p99, s.max,
    );

    let buckets = bucket_counts(distances, &recovery_bin_edges());
    let line = buckets
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|((lo, hi), count)| format!("[{lo},{hi})={count}"))
        .collect::<Vec<_>>()
        .join(" ");
    info!("[RECOVERY] buckets {line}");
    Ok(())
}
