use alloy_primitives::U256;
use auto_impl::auto_impl;
use serde::{Deserialize, Serialize};

use super::{PoolState, TickRange, errors::DexClientError};
use crate::utils::{MAX_TICK, MIN_TICK, nearest_usable_tick};

/// How much allowance to grant when the current one is insufficient.
///
/// `Unbounded` saves an approval on every later deposit of the same token to
/// the same spender, in exchange for trusting that spender with the whole
/// balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalPolicy {
    Exact,
    #[default]
    Unbounded
}

impl ApprovalPolicy {
    pub fn approval_amount(&self, required: U256) -> U256 {
        match self {
            Self::Exact => required,
            Self::Unbounded => U256::MAX
        }
    }
}

/// Chooses the tick range a new position is minted into.
#[auto_impl(&, Box, Arc)]
pub trait RangePolicy {
    fn select_range(&self, pool: &PoolState) -> Result<TickRange, DexClientError>;
}

/// Adapts a closure into a [`RangePolicy`].
#[derive(Debug, Clone, Copy)]
pub struct RangeFn<F>(pub F);

impl<F> RangePolicy for RangeFn<F>
where
    F: Fn(&PoolState) -> Result<TickRange, DexClientError>
{
    fn select_range(&self, pool: &PoolState) -> Result<TickRange, DexClientError> {
        (self.0)(pool)
    }
}

/// `spacing_multiple` tick spacings either side of the nearest usable tick,
/// clamped to the usable tick bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymmetricRange {
    pub spacing_multiple: i32
}

impl Default for SymmetricRange {
    fn default() -> Self {
        Self { spacing_multiple: 2 }
    }
}

impl RangePolicy for SymmetricRange {
    fn select_range(&self, pool: &PoolState) -> Result<TickRange, DexClientError> {
        let spacing = pool.tick_spacing;
        if spacing <= 0 || self.spacing_multiple <= 0 {
            return Err(DexClientError::InvalidTickRange {
                lower: pool.tick,
                upper: pool.tick,
                spacing
            })
        }

        let base = nearest_usable_tick(pool.tick, spacing);
        let width = self.spacing_multiple * spacing;

        let min_usable = nearest_usable_tick(MIN_TICK, spacing);
        let max_usable = nearest_usable_tick(MAX_TICK, spacing);

        let range = TickRange::new((base - width).max(min_usable), (base + width).min(max_usable));
        range.validate(spacing)?;

        Ok(range)
    }
}
