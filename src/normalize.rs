//! Raw indexer records into human-scale swaps: Q96 price decoding,
//! decimal scaling and block bucketing.

use crate::error::{AppError, Result};
use crate::types::{RawSwap, Swap, SwapId};

/// 2^96, the Q96 fixed-point scale.
pub const Q96: f64 = 79_228_162_514_264_337_593_543_950_336.0;

/// Normalize every record; the first malformed id or non-numeric field aborts the run.
pub fn normalize_swaps(raw: &[RawSwap], decimals: u32, block_range_size: u64) -> Result<Vec<Swap>> {
    raw.iter()
        .map(|r| normalize_swap(r, decimals, block_range_size))
        .collect()
}

pub fn normalize_swap(raw: &RawSwap, decimals: u32, block_range_size: u64) -> Result<Swap> {
    let id = parse_swap_id(&raw.id)?;
    let raw_price = parse_number("price", &raw.price)?;

    Ok(Swap {
        id: raw.id.clone(),
        chain_id: id.chain_id.to_string(),
        block_number: id.block_number,
        log_index: id.log_index.to_string(),
        sender: raw.sender.clone(),
        amount0: scale_amount(parse_number("amount0", &raw.amount0)?, decimals),
        amount1: scale_amount(parse_number("amount1", &raw.amount1)?, decimals),
        raw_price,
        actual_price: decode_q96_price(raw_price),
        block_range: block_range(id.block_number, block_range_size),
    })
}

/// Split `chainId_blockNumber_logIndex`. Anything other than three parts with
/// an integer block number is rejected.
pub fn parse_swap_id(id: &str) -> Result<SwapId<'_>> {
    let mut parts = id.split('_');
    let (Some(chain_id), Some(block), Some(log_index), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(AppError::MalformedId(id.to_string()));
    };
    let block_number = block
        .parse::<u64>()
        .map_err(|_| AppError::MalformedId(id.to_string()))?;
    Ok(SwapId {
        chain_id,
        block_number,
        log_index,
    })
}

pub fn decode_q96_price(raw_price: f64) -> f64 {
    raw_price / Q96
}

/// Drop the sign and shift by `decimals` places.
pub fn scale_amount(raw: f64, decimals: u32) -> f64 {
    raw.abs() / 10f64.powi(decimals as i32)
}

pub fn block_range(block_number: u64, size: u64) -> u64 {
    (block_number / size) * size
}

/// Stable ascending sort on block number; equal blocks keep fetch order.
pub fn sort_by_block(swaps: &mut [Swap]) {
    swaps.sort_by_key(|s| s.block_number);
}

fn parse_number(field: &'static str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| AppError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}
