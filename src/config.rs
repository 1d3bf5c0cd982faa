use std::str::FromStr;

use crate::error::{AppError, Result};

pub const GRAPHQL_ENDPOINT: &str = "http://localhost:8080/v1/graphql";

/// High-frequency bot address kept out of the query (roughly 2M swaps).
pub const EXCLUDED_SENDER: &str = "0x9d01928fBcc737e6Ae22466C09981b2f90524780";

/// GraphQL entity holding the pool's swap events.
pub const SWAP_ENTITY: &str = "AlgebraPool_Swap";

pub const DASHBOARD_PATH: &str = "swaps_dashboard.html";

pub const DASHBOARD_TITLE: &str = "Algebra Pool Swaps Dashboard";

/// Both pool tokens use 6 decimals.
pub const TOKEN_DECIMALS: u32 = 6;

/// 10^k stops being finite as an f64 past this.
pub const MAX_TOKEN_DECIMALS: u32 = 308;

/// Width of a block-range bucket, in blocks.
pub const BLOCK_RANGE_SIZE: u64 = 1000;

/// Rows (not blocks) scanned ahead of each swap when looking for a price recovery.
pub const RECOVERY_WINDOW: usize = 100;

/// Relative price distance counted as "recovered" (0.025%).
pub const RECOVERY_TOLERANCE: f64 = 0.00025;

/// Recovery distances above this many blocks are left out of the histogram.
pub const RECOVERY_BLOCKS_LIMIT: u64 = 30;

pub const TOP_SENDERS: usize = 20;

pub const AMOUNT_BINS: usize = 50;

pub const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: String,
    pub excluded_sender: String,
    pub output_path: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub token_decimals: u32,
    pub block_range_size: u64,
    /// Lookahead bound in rows (RECOVERY_WINDOW)
    pub recovery_window: usize,
    /// Relative tolerance for a recovery match (RECOVERY_TOLERANCE)
    pub recovery_tolerance: f64,
    /// Upper bound L of the plotted recovery range [0, L] (RECOVERY_BLOCKS_LIMIT)
    pub recovery_blocks_limit: u64,
    pub top_senders: usize,
    pub amount_bins: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: GRAPHQL_ENDPOINT.to_string(),
            excluded_sender: EXCLUDED_SENDER.to_string(),
            output_path: DASHBOARD_PATH.to_string(),
            log_level: "info".to_string(),
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            token_decimals: TOKEN_DECIMALS,
            block_range_size: BLOCK_RANGE_SIZE,
            recovery_window: RECOVERY_WINDOW,
            recovery_tolerance: RECOVERY_TOLERANCE,
            recovery_blocks_limit: RECOVERY_BLOCKS_LIMIT,
            top_senders: TOP_SENDERS,
            amount_bins: AMOUNT_BINS,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; unset keys fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let cfg = Self {
            endpoint: lookup("GRAPHQL_ENDPOINT").unwrap_or(defaults.endpoint),
            excluded_sender: lookup("EXCLUDED_SENDER").unwrap_or(defaults.excluded_sender),
            output_path: lookup("DASHBOARD_PATH").unwrap_or(defaults.output_path),
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
            request_timeout_secs: parse_var(&lookup, "REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?,
            token_decimals: parse_var(&lookup, "TOKEN_DECIMALS", defaults.token_decimals)?,
            block_range_size: parse_var(&lookup, "BLOCK_RANGE_SIZE", defaults.block_range_size)?,
            recovery_window: parse_var(&lookup, "RECOVERY_WINDOW", defaults.recovery_window)?,
            recovery_tolerance: parse_var(&lookup, "RECOVERY_TOLERANCE", defaults.recovery_tolerance)?,
            recovery_blocks_limit: parse_var(
                &lookup,
                "RECOVERY_BLOCKS_LIMIT",
                defaults.recovery_blocks_limit,
            )?,
            top_senders: parse_var(&lookup, "TOP_SENDERS", defaults.top_senders)?,
            amount_bins: parse_var(&lookup, "AMOUNT_BINS", defaults.amount_bins)?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.block_range_size == 0 {
            return Err(AppError::Config("BLOCK_RANGE_SIZE must be greater than 0".to_string()));
        }
        if self.token_decimals > MAX_TOKEN_DECIMALS {
            return Err(AppError::Config(format!(
                "TOKEN_DECIMALS must be at most {MAX_TOKEN_DECIMALS}"
            )));
        }
        if self.recovery_window == 0 {
            return Err(AppError::Config("RECOVERY_WINDOW must be greater than 0".to_string()));
        }
        if self.amount_bins == 0 {
            return Err(AppError::Config("AMOUNT_BINS must be greater than 0".to_string()));
        }
        if !self.recovery_tolerance.is_finite() || self.recovery_tolerance < 0.0 {
            return Err(AppError::Config(
                "RECOVERY_TOLERANCE must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::Config(format!("{key} must be a valid number, got {raw:?}"))),
        None => Ok(default),
    }
}
