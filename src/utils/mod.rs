mod liquidity_amounts;
pub use liquidity_amounts::*;

mod polling;
pub use polling::*;

use std::{
    str::FromStr,
    time::{SystemTime, UNIX_EPOCH}
};

use alloy_primitives::{Address, U256};

use crate::types::{DesiredAmounts, errors::DexClientError};

pub const MIN_TICK: i32 = -887272;
pub const MAX_TICK: i32 = 887272;

/// Rounds `tick` to the nearest multiple of `tick_spacing` (halves round up)
/// and pulls the result back inside `[MIN_TICK, MAX_TICK]`.
pub fn nearest_usable_tick(tick: i32, tick_spacing: i32) -> i32 {
    assert!(tick_spacing > 0, "tick spacing must be positive");

    let rounded = (2 * tick + tick_spacing).div_euclid(2 * tick_spacing) * tick_spacing;
    if rounded < MIN_TICK {
        rounded + tick_spacing
    } else if rounded > MAX_TICK {
        rounded - tick_spacing
    } else {
        rounded
    }
}

/// Parses an address regardless of its casing. Checksums are not enforced
/// since different sources (wallets, config, explorers) disagree on casing.
pub fn parse_address(address: &str) -> Result<Address, DexClientError> {
    Address::from_str(address.trim()).map_err(|_| DexClientError::InvalidAddress(address.to_string()))
}

/// Pools order their tokens by ascending address.
pub fn sort_tokens(token_a: Address, token_b: Address) -> (Address, Address) {
    if token_a < token_b { (token_a, token_b) } else { (token_b, token_a) }
}

/// A token pair and its amounts in pool order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderedPair {
    pub token0:  Address,
    pub token1:  Address,
    pub amounts: DesiredAmounts,
    /// token A became token1
    pub flipped: bool
}

/// Maps "token A / token B" user input onto the pool's token0/token1 order.
pub fn order_tokens(
    token_a: Address,
    amount_a: U256,
    token_b: Address,
    amount_b: U256
) -> Result<OrderedPair, DexClientError> {
    if token_a == token_b {
        return Err(DexClientError::IdenticalTokens(token_a))
    }

    let flipped = token_b < token_a;
    let (token0, token1) = sort_tokens(token_a, token_b);
    let amounts = if flipped {
        DesiredAmounts::new(amount_b, amount_a)
    } else {
        DesiredAmounts::new(amount_a, amount_b)
    };

    Ok(OrderedPair { token0, token1, amounts, flipped })
}

/// Unix timestamp `secs` seconds from now, as a contract deadline.
pub fn deadline_from_now(secs: u64) -> U256 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    U256::from(now + secs)
}

/// `floor(liquidity * percentage / 100)` without overflowing `u128`.
pub fn liquidity_fraction(liquidity: u128, percentage: u8) -> u128 {
    let pct = percentage as u128;
    (liquidity / 100) * pct + (liquidity % 100) * pct / 100
}
