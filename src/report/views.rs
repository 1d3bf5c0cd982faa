use std::collections::{BTreeMap, HashMap};

use tracing::info;

use crate::config::Config;
use crate::types::Swap;

/// `0xabcdef...1234`: first 6 and last 4 characters. Strings shorter than 10
/// characters are returned as-is.
pub fn shorten_address(address: &str) -> String {
    let len = address.chars().count();
    if len < 10 {
        return address.to_string();
    }
    let head: String = address.chars().take(6).collect();
    let tail: String = address.chars().skip(len - 4).collect();
    format!("{head}...{tail}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderCount {
    pub address: String,
    pub label: String,
    pub count: u64,
}

/// Everything the dashboard plots, already aggregated.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardViews {
    /// Busiest senders, most swaps first.
    pub top_senders: Vec<SenderCount>,
    pub amount0: Vec<f64>,
    pub amount_bins: usize,
    /// (bucket start, swaps) in ascending bucket order.
    pub block_range_counts: Vec<(u64, u64)>,
    /// (block, price) in ascending block order.
    pub price_series: Vec<(u64, f64)>,
    /// Recovery distances inside [0, recovery_limit].
    pub recovery_times: Vec<u64>,
    pub recovery_limit: u64,
}

/// Aggregate block-ordered swaps and their recovery distances into the five views.
pub fn build_views(swaps: &[Swap], recovery_distances: &[u64], cfg: &Config) -> DashboardViews {
    let top_senders = top_senders(swaps, cfg.top_senders);
    log_sender_table(&top_senders);

    DashboardViews {
        top_senders,
        amount0: swaps.iter().map(|s| s.amount0).collect(),
        amount_bins: cfg.amount_bins,
        block_range_counts: block_range_counts(swaps),
        price_series: swaps.iter().map(|s| (s.block_number, s.actual_price)).collect(),
        recovery_times: filter_recovery(recovery_distances, cfg.recovery_blocks_limit),
        recovery_limit: cfg.recovery_blocks_limit,
    }
}

/// Swap count per sender, highest first. Ties keep first-seen order.
pub fn top_senders(swaps: &[Swap], n: usize) -> Vec<SenderCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, u64)> = Vec::new();

    for swap in swaps {
        match index.get(swap.sender.as_str()) {
            Some(&k) => counts[k].1 += 1,
            None => {
                index.insert(swap.sender.as_str(), counts.len());
                counts.push((swap.sender.as_str(), 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(n)
        .map(|(address, count)| SenderCount {
            address: address.to_string(),
            label: shorten_address(address),
            count,
        })
        .collect()
}

pub fn block_range_counts(swaps: &[Swap]) -> Vec<(u64, u64)> {
    let mut counts: BTreeMap<u64, u64> = BTreeMap::new();
    for swap in swaps {
        *counts.entry(swap.block_range).or_default() += 1;
    }
    counts.into_iter().collect()
}

/// Keep distances inside the closed range [0, limit].
pub fn filter_recovery(distances: &[u64], limit: u64) -> Vec<u64> {
    distances.iter().copied().filter(|&d| d <= limit).collect()
}

fn log_sender_table(rows: &[SenderCount]) {
    info!("[SENDERS] top {} senders by swap count:", rows.len());
    for row in rows {
        info!("[SENDERS]   {:<42} {:>8}", row.address, row.count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swap(sender: &str, block: u64, price: f64) -> Swap {
        Swap {
            id: format!("1_{block}_0"),
            chain_id: "1".to_string(),
            block_number: block,
            log_index: "0".to_string(),
            sender: sender.to_string(),
            amount0: block as f64,
            amount1: 0.0,
            raw_price: price,
            actual_price: price,
            block_range: (block / 1000) * 1000,
        }
    }

    #[test]
    fn shorten_keeps_prefix_and_suffix() {
        assert_eq!(shorten_address("0xABCDEF1234567890"), "0xABCD...7890");
        assert_eq!(
            shorten_address("0x9d01928fBcc737e6Ae22466C09981b2f90524780"),
            "0x9d01...4780"
        );
        assert_eq!(shorten_address("0x12345678"), "0x1234...5678");
    }

    #[test]
    fn shorten_counts_characters_not_bytes() {
        assert_eq!(shorten_address("0xäbcdef1234567890"), "0xäbcd...7890");
        assert_eq!(shorten_address("ääääääääää"), "ääääää...ääää");
        assert_eq!(shorten_address("äääääääää"), "äääääääää");
    }

    #[test]
    fn short_strings_are_left_alone() {
        assert_eq!(shorten_address("0xabc"), "0xabc");
        assert_eq!(shorten_address(""), "");
    }

    #[test]
    fn top_senders_sorted_by_count_then_first_seen() {
        let swaps = vec![
            swap("0xaaaaaaaaaaaa", 1, 1.0),
            swap("0xbbbbbbbbbbbb", 2, 1.0),
            swap("0xbbbbbbbbbbbb", 3, 1.0),
            swap("0xcccccccccccc", 4, 1.0),
            swap("0xaaaaaaaaaaaa", 5, 1.0),
            swap("0xdddddddddddd", 6, 1.0),
        ];
        let top = top_senders(&swaps, 3);
        let order: Vec<(&str, u64)> = top.iter().map(|s| (s.address.as_str(), s.count)).collect();
        assert_eq!(
            order,
            vec![("0xaaaaaaaaaaaa", 2), ("0xbbbbbbbbbbbb", 2), ("0xcccccccccccc", 1)]
        );
        assert_eq!(top[0].label, "0xaaaa...aaaa");
    }

    #[test]
    fn block_ranges_are_counted_in_order() {
        let swaps = vec![
            swap("0x1", 2500, 1.0),
            swap("0x1", 120, 1.0),
            swap("0x1", 999, 1.0),
            swap("0x1", 2001, 1.0),
        ];
        assert_eq!(block_range_counts(&swaps), vec![(0, 2), (2000, 2)]);
    }

    #[test]
    fn recovery_filter_is_inclusive_of_limit() {
        assert_eq!(filter_recovery(&[0, 1, 30, 31, 100, 7], 30), vec![0, 1, 30, 7]);
        assert!(filter_recovery(&[], 30).is_empty());
    }

    #[test]
    fn views_follow_swap_order() {
        let cfg = Config::default();
        let swaps = vec![swap("0x1", 10, 1.5), swap("0x2", 11, 1.6)];
        let views = build_views(&swaps, &[1, 45], &cfg);
        assert_eq!(views.price_series, vec![(10, 1.5), (11, 1.6)]);
        assert_eq!(views.amount0, vec![10.0, 11.0]);
        assert_eq!(views.recovery_times, vec![1]);
        assert_eq!(views.recovery_limit, 30);
        assert_eq!(views.amount_bins, 50);
        assert_eq!(views.top_senders.len(), 2);
    }
}
