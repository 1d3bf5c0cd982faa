use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Wire record
// ---------------------------------------------------------------------------

/// One swap as returned by the indexer. Numeric fields arrive as strings
/// because they exceed JSON's safe integer range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSwap {
    pub sender: String,
    pub amount0: String,
    pub amount1: String,
    /// Q96 fixed-point price.
    pub price: String,
    /// `chainId_blockNumber_logIndex`
    pub id: String,
}

// ---------------------------------------------------------------------------
// Normalized swap
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Swap {
    pub id: String,
    pub chain_id: String,
    pub block_number: u64,
    pub log_index: String,
    pub sender: String,
    /// |amount0| in whole tokens.
    pub amount0: f64,
    /// |amount1| in whole tokens.
    pub amount1: f64,
    pub raw_price: f64,
    /// raw_price / 2^96, token1 per token0.
    pub actual_price: f64,
    /// Lower bound of the block bucket this swap falls into.
    pub block_range: u64,
}

/// Parts of a composite swap identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapId<'a> {
    pub chain_id: &'a str,
    pub block_number: u64,
    pub log_index: &'a str,
}
