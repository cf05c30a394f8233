use alloy_primitives::{
    Address, B256, Log, TxHash, U256,
    utils::{ParseUnits, format_units, parse_units}
};
use serde::{Deserialize, Serialize};

use super::errors::DexClientError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenDescriptor {
    pub address:  Address,
    pub symbol:   String,
    pub decimals: u8
}

impl TokenDescriptor {
    pub fn new(address: Address, symbol: impl ToString, decimals: u8) -> Self {
        Self { address, symbol: symbol.to_string(), decimals }
    }

    /// Converts a user-entered decimal amount (e.g. `"1.5"`) into base units.
    /// Negative input is rejected.
    pub fn to_base_units(&self, amount: &str) -> Result<U256, DexClientError> {
        let amount = amount.trim();
        match parse_units(amount, self.decimals)? {
            ParseUnits::U256(value) => Ok(value),
            ParseUnits::I256(_) => Err(DexClientError::NegativeAmount(amount.to_string()))
        }
    }

    pub fn format_base_units(&self, amount: U256) -> Result<String, DexClientError> {
        Ok(format_units(amount, self.decimals)?)
    }
}

/// Snapshot of a pool, re-read before every decision that depends on price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
    pub pool_address:   Address,
    pub token0:         Address,
    pub token1:         Address,
    pub fee:            u32,
    pub tick_spacing:   i32,
    pub sqrt_price_x96: U256,
    pub liquidity:      u128,
    pub tick:           i32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickRange {
    pub tick_lower: i32,
    pub tick_upper: i32
}

impl TickRange {
    pub fn new(tick_lower: i32, tick_upper: i32) -> Self {
        Self { tick_lower, tick_upper }
    }

    /// Checks ordering, spacing alignment and protocol bounds.
    pub fn validate(&self, tick_spacing: i32) -> Result<(), DexClientError> {
        let aligned = tick_spacing > 0
            && self.tick_lower % tick_spacing == 0
            && self.tick_upper % tick_spacing == 0;
        let in_bounds = self.tick_lower >= crate::utils::MIN_TICK
            && self.tick_upper <= crate::utils::MAX_TICK;

        if !aligned || !in_bounds || self.tick_lower >= self.tick_upper {
            return Err(DexClientError::InvalidTickRange {
                lower:   self.tick_lower,
                upper:   self.tick_upper,
                spacing: tick_spacing
            })
        }
        Ok(())
    }

    /// Which tokens a deposit into this range needs at `current_tick`.
    ///
    /// The range is half-open: a position is active for
    /// `tick_lower <= tick < tick_upper`.
    pub fn required_sides(&self, current_tick: i32) -> RequiredSides {
        if current_tick < self.tick_lower {
            RequiredSides::Token0Only
        } else if current_tick >= self.tick_upper {
            RequiredSides::Token1Only
        } else {
            RequiredSides::Both
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequiredSides {
    /// price below the range
    Token0Only,
    /// price above the range
    Token1Only,
    Both
}

impl RequiredSides {
    pub fn needs_token0(&self) -> bool {
        !matches!(self, Self::Token1Only)
    }

    pub fn needs_token1(&self) -> bool {
        !matches!(self, Self::Token0Only)
    }

    /// Zeroes the amount of any side that is not needed.
    pub fn apply(&self, amounts: DesiredAmounts) -> DesiredAmounts {
        DesiredAmounts {
            amount0_raw: if self.needs_token0() { amounts.amount0_raw } else { U256::ZERO },
            amount1_raw: if self.needs_token1() { amounts.amount1_raw } else { U256::ZERO }
        }
    }
}

/// User-entered deposit amounts, already scaled to base units and mapped
/// onto the pool's token0/token1 order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredAmounts {
    pub amount0_raw: U256,
    pub amount1_raw: U256
}

impl DesiredAmounts {
    pub fn new(amount0_raw: U256, amount1_raw: U256) -> Self {
        Self { amount0_raw, amount1_raw }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintAmounts {
    pub liquidity:       u128,
    pub amount0_desired: U256,
    pub amount1_desired: U256
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionHandle {
    pub token_id: U256
}

/// Decoded `positions(tokenId)` result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionInfo {
    pub token_id:     U256,
    pub token0:       Address,
    pub token1:       Address,
    pub fee:          u32,
    pub range:        TickRange,
    pub liquidity:    u128,
    pub tokens_owed0: u128,
    pub tokens_owed1: u128
}

impl PositionInfo {
    /// No liquidity left and nothing owed: the position can never pay out again.
    pub fn is_closed(&self) -> bool {
        self.liquidity == 0 && self.tokens_owed0 == 0 && self.tokens_owed1 == 0
    }
}

/// A write call ready to be signed and submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    pub to:    Address,
    pub input: alloy_primitives::Bytes,
    pub value: U256
}

impl ContractCall {
    pub fn new<C: alloy_sol_types::SolCall>(to: Address, call: &C) -> Self {
        Self { to, input: call.abi_encode().into(), value: U256::ZERO }
    }
}

/// What a confirmed transaction left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutcome {
    pub tx_hash:      TxHash,
    pub block_number: Option<u64>,
    pub logs:         Vec<Log>
}

impl TxOutcome {
    /// Decodes the first `E` event emitted by `emitter`.
    pub fn find_event<E: alloy_sol_types::SolEvent>(&self, emitter: Address) -> Option<E> {
        self.logs
            .iter()
            .filter(|log| log.address == emitter)
            .find_map(|log| E::decode_log_data(&log.data).ok())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintReceipt {
    pub position:  PositionHandle,
    pub liquidity: u128,
    pub amount0:   U256,
    pub amount1:   U256,
    pub range:     TickRange,
    pub tx_hash:   B256
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifyLiquidityReceipt {
    pub token_id:  U256,
    pub liquidity: u128,
    pub amount0:   U256,
    pub amount1:   U256,
    pub tx_hash:   B256
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectReceipt {
    pub token_id: U256,
    pub amount0:  U256,
    pub amount1:  U256,
    pub tx_hash:  B256
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapQuote {
    pub fee:        u32,
    pub amount_in:  U256,
    pub amount_out: U256
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Open,
    Filled,
    Cancelled,
    Expired,
    Unknown(u8)
}

impl From<u8> for OrderStatus {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Open,
            1 => Self::Filled,
            2 => Self::Cancelled,
            3 => Self::Expired,
            other => Self::Unknown(other)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitOrder {
    pub order_id:       U256,
    pub owner:          Address,
    pub token_in:       Address,
    pub token_out:      Address,
    pub amount_in:      U256,
    pub min_amount_out: U256,
    pub expiry:         U256,
    pub status:         OrderStatus
}
