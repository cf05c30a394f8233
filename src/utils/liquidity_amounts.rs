//! Conversions between token amounts and position liquidity.
//!
//! Tick to sqrt-price conversion and the amount deltas come from
//! `uniswap_v3_math`; liquidity-for-amounts mirrors the periphery
//! `LiquidityAmounts` library. Every result rounds down, so a position is never
//! asked for more than the caller offered.

use alloy_primitives::{U256, U512};
use uniswap_v3_math::{
    sqrt_price_math::{_get_amount_0_delta, _get_amount_1_delta},
    tick_math::get_sqrt_ratio_at_tick
};

use crate::types::{DesiredAmounts, MintAmounts, PoolState, TickRange, errors::DexClientError};

/// 2^96
pub const Q96: U256 = U256::from_limbs([0, 1 << 32, 0, 0]);

pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256, DexClientError> {
    if denominator.is_zero() {
        return Err(DexClientError::DivisionByZero)
    }

    let quotient = (U512::from(a) * U512::from(b)) / U512::from(denominator);
    if quotient > U512::from(U256::MAX) {
        return Err(DexClientError::LiquidityOverflow)
    }

    Ok(U256::from(quotient))
}

fn sorted(sqrt_a: U256, sqrt_b: U256) -> (U256, U256) {
    if sqrt_a > sqrt_b { (sqrt_b, sqrt_a) } else { (sqrt_a, sqrt_b) }
}

pub fn liquidity_for_amount0(
    sqrt_a: U256,
    sqrt_b: U256,
    amount0: U256
) -> Result<U256, DexClientError> {
    let (sqrt_a, sqrt_b) = sorted(sqrt_a, sqrt_b);
    let intermediate = mul_div(sqrt_a, sqrt_b, Q96)?;
    mul_div(amount0, intermediate, sqrt_b - sqrt_a)
}

pub fn liquidity_for_amount1(
    sqrt_a: U256,
    sqrt_b: U256,
    amount1: U256
) -> Result<U256, DexClientError> {
    let (sqrt_a, sqrt_b) = sorted(sqrt_a, sqrt_b);
    mul_div(amount1, Q96, sqrt_b - sqrt_a)
}

/// Largest liquidity both amounts can fund at the current price.
///
/// A result above `u128::MAX` is clamped to it. Fails with
/// [`DexClientError::LiquidityOverflow`] when an intermediate product does not
/// fit in 256 bits, and with [`DexClientError::DivisionByZero`] for an empty
/// range.
pub fn liquidity_for_amounts(
    sqrt_price: U256,
    sqrt_a: U256,
    sqrt_b: U256,
    amount0: U256,
    amount1: U256
) -> Result<u128, DexClientError> {
    let (sqrt_a, sqrt_b) = sorted(sqrt_a, sqrt_b);

    let liquidity = if sqrt_price <= sqrt_a {
        liquidity_for_amount0(sqrt_a, sqrt_b, amount0)?
    } else if sqrt_price < sqrt_b {
        liquidity_for_amount0(sqrt_price, sqrt_b, amount0)?
            .min(liquidity_for_amount1(sqrt_a, sqrt_price, amount1)?)
    } else {
        liquidity_for_amount1(sqrt_a, sqrt_b, amount1)?
    };

    Ok(liquidity.min(U256::from(u128::MAX)).to::<u128>())
}

pub fn amounts_for_liquidity(
    sqrt_price: U256,
    sqrt_a: U256,
    sqrt_b: U256,
    liquidity: u128
) -> Result<(U256, U256), DexClientError> {
    let (sqrt_a, sqrt_b) = sorted(sqrt_a, sqrt_b);

    Ok(if sqrt_price <= sqrt_a {
        (_get_amount_0_delta(sqrt_a, sqrt_b, liquidity, false)?, U256::ZERO)
    } else if sqrt_price < sqrt_b {
        (
            _get_amount_0_delta(sqrt_price, sqrt_b, liquidity, false)?,
            _get_amount_1_delta(sqrt_a, sqrt_price, liquidity, false)?
        )
    } else {
        (U256::ZERO, _get_amount_1_delta(sqrt_a, sqrt_b, liquidity, false)?)
    })
}

/// The exact amounts a mint into `range` needs, given what the user offered.
pub fn mint_amounts(
    pool: &PoolState,
    range: &TickRange,
    desired: &DesiredAmounts
) -> Result<MintAmounts, DexClientError> {
    range.validate(pool.tick_spacing)?;

    let sqrt_a = get_sqrt_ratio_at_tick(range.tick_lower)?;
    let sqrt_b = get_sqrt_ratio_at_tick(range.tick_upper)?;

    let liquidity = liquidity_for_amounts(
        pool.sqrt_price_x96,
        sqrt_a,
        sqrt_b,
        desired.amount0_raw,
        desired.amount1_raw
    )?;
    let (amount0, amount1) = amounts_for_liquidity(pool.sqrt_price_x96, sqrt_a, sqrt_b, liquidity)?;

    Ok(MintAmounts {
        liquidity,
        amount0_desired: amount0.min(desired.amount0_raw),
        amount1_desired: amount1.min(desired.amount1_raw)
    })
}
