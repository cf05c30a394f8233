use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use super::{DesiredAmounts, MintAmounts, PoolState, TickRange, errors::DexClientError};

/// Lower bounds on the amounts a liquidity change must move.
///
/// Zero disables the check, which is what the dashboard flows submit by
/// default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinAmounts {
    pub amount0_min: U256,
    pub amount1_min: U256
}

impl MinAmounts {
    pub fn new(amount0_min: U256, amount1_min: U256) -> Self {
        Self { amount0_min, amount1_min }
    }
}

/// Everything decided before a mint is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintPlan {
    pub pool:    PoolState,
    pub token0:  Address,
    pub token1:  Address,
    pub fee:     u32,
    pub range:   TickRange,
    pub desired: DesiredAmounts,
    pub amounts: MintAmounts
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionOp {
    Mint,
    Increase,
    Decrease,
    Collect
}

impl PositionOp {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mint => "mint",
            Self::Increase => "increase",
            Self::Decrease => "decrease",
            Self::Collect => "collect"
        }
    }
}

/// Client-side view of where a position is in its life.
///
/// ```text
/// NoPosition -> PendingMint -> Active -> Pending{Increase,Decrease,Collect} -> Active
///                                 \-> Closed (no liquidity, nothing owed)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionPhase {
    #[default]
    NoPosition,
    PendingMint,
    Active,
    PendingIncrease,
    PendingDecrease,
    PendingCollect,
    Closed
}

impl PositionPhase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::NoPosition => "no-position",
            Self::PendingMint => "pending-mint",
            Self::Active => "active",
            Self::PendingIncrease => "pending-increase",
            Self::PendingDecrease => "pending-decrease",
            Self::PendingCollect => "pending-collect",
            Self::Closed => "closed"
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            Self::PendingMint | Self::PendingIncrease | Self::PendingDecrease | Self::PendingCollect
        )
    }

    /// The phase entered when `op` is submitted.
    pub fn begin(self, op: PositionOp) -> Result<Self, DexClientError> {
        match (self, op) {
            (Self::NoPosition, PositionOp::Mint) => Ok(Self::PendingMint),
            (Self::Active, PositionOp::Increase) => Ok(Self::PendingIncrease),
            (Self::Active, PositionOp::Decrease) => Ok(Self::PendingDecrease),
            (Self::Active, PositionOp::Collect) => Ok(Self::PendingCollect),
            (phase, _) if phase.is_pending() => Err(DexClientError::PositionBusy),
            (phase, op) => {
                Err(DexClientError::InvalidTransition { op: op.name(), phase: phase.name() })
            }
        }
    }

    /// The phase after the pending write confirmed. `closed` is whether the
    /// re-read position has neither liquidity nor owed tokens left.
    pub fn complete(self, closed: bool) -> Self {
        match self {
            phase if !phase.is_pending() => phase,
            _ if closed => Self::Closed,
            _ => Self::Active
        }
    }

    /// The phase after the pending write failed. Nothing is rolled back on
    /// chain, the position simply returns to where it was.
    pub fn fail(self) -> Self {
        match self {
            Self::PendingMint => Self::NoPosition,
            phase if phase.is_pending() => Self::Active,
            phase => phase
        }
    }
}
