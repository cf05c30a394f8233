use alloy_primitives::{Address, U256};
use parking_lot::Mutex;
use tracing::{debug, warn};

use super::LiquidityApi;
use crate::types::{
    CollectReceipt, MinAmounts, MintReceipt, ModifyLiquidityReceipt, PositionInfo, PositionOp,
    PositionPhase, errors::DexClientError
};

#[derive(Debug, Clone, Copy, Default)]
struct Lifecycle {
    token_id: Option<U256>,
    phase:    PositionPhase
}

/// One position driven through its lifecycle.
///
/// At most one write is in flight at a time; a second write while one is
/// pending fails with [`DexClientError::PositionBusy`]. A failed write leaves
/// the position where it was before the attempt.
#[derive(Debug)]
pub struct ManagedPosition<'a, A> {
    api:       &'a A,
    lifecycle: Mutex<Lifecycle>
}

impl<'a, A: LiquidityApi> ManagedPosition<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api, lifecycle: Mutex::new(Lifecycle::default()) }
    }

    /// Tracks a position that was minted earlier.
    pub fn existing(api: &'a A, token_id: U256) -> Self {
        Self {
            api,
            lifecycle: Mutex::new(Lifecycle {
                token_id: Some(token_id),
                phase:    PositionPhase::Active
            })
        }
    }

    pub fn phase(&self) -> PositionPhase {
        self.lifecycle.lock().phase
    }

    pub fn token_id(&self) -> Option<U256> {
        self.lifecycle.lock().token_id
    }

    fn begin(&self, op: PositionOp) -> Result<Option<U256>, DexClientError> {
        let mut lifecycle = self.lifecycle.lock();
        lifecycle.phase = lifecycle.phase.begin(op)?;
        debug!(op = op.name(), phase = lifecycle.phase.name(), "position write started");
        Ok(lifecycle.token_id)
    }

    fn settle(&self, outcome: Result<bool, ()>) {
        let mut lifecycle = self.lifecycle.lock();
        lifecycle.phase = match outcome {
            Ok(closed) => lifecycle.phase.complete(closed),
            Err(()) => lifecycle.phase.fail()
        };
    }

    fn active_token_id(&self, op: PositionOp) -> Result<U256, DexClientError> {
        let token_id = self.begin(op)?;
        // any phase past NoPosition has a token id
        token_id.ok_or(DexClientError::InvalidTransition {
            op:    op.name(),
            phase: PositionPhase::NoPosition.name()
        })
    }

    /// Whether the position has nothing left. A failed re-read counts as still
    /// open; the write itself already succeeded.
    async fn reread_closed(&self, token_id: U256) -> bool {
        match self.api.position(token_id).await {
            Ok(position) => position.is_closed(),
            Err(err) => {
                warn!(%token_id, %err, "failed to re-read position");
                false
            }
        }
    }

    pub async fn mint(
        &self,
        token_a: Address,
        token_b: Address,
        fee: u32,
        amount_a: U256,
        amount_b: U256,
        mins: MinAmounts
    ) -> Result<MintReceipt, DexClientError> {
        self.begin(PositionOp::Mint)?;

        match self
            .api
            .mint_position(token_a, token_b, fee, amount_a, amount_b, mins)
            .await
        {
            Ok(receipt) => {
                self.lifecycle.lock().token_id = Some(receipt.position.token_id);
                self.settle(Ok(false));
                Ok(receipt)
            }
            Err(err) => {
                self.settle(Err(()));
                Err(err)
            }
        }
    }

    pub async fn increase(
        &self,
        amount0: U256,
        amount1: U256,
        mins: MinAmounts
    ) -> Result<ModifyLiquidityReceipt, DexClientError> {
        let token_id = self.active_token_id(PositionOp::Increase)?;

        let result = self
            .api
            .increase_liquidity(token_id, amount0, amount1, mins)
            .await;
        self.settle(result.as_ref().map(|_| false).map_err(|_| ()));
        result
    }

    pub async fn decrease(
        &self,
        percentage: u8,
        mins: MinAmounts
    ) -> Result<ModifyLiquidityReceipt, DexClientError> {
        let token_id = self.active_token_id(PositionOp::Decrease)?;

        let result = self.api.decrease_liquidity(token_id, percentage, mins).await;
        self.settle(result.as_ref().map(|_| false).map_err(|_| ()));
        result
    }

    /// Collects everything owed. Closes the position when nothing is left in
    /// it afterwards.
    pub async fn collect(&self) -> Result<CollectReceipt, DexClientError> {
        let token_id = self.active_token_id(PositionOp::Collect)?;

        match self.api.collect_fees(token_id).await {
            Ok(receipt) => {
                let closed = self.reread_closed(token_id).await;
                self.settle(Ok(closed));
                Ok(receipt)
            }
            Err(err) => {
                self.settle(Err(()));
                Err(err)
            }
        }
    }

    /// Current on-chain state of the tracked position.
    pub async fn info(&self) -> Result<PositionInfo, DexClientError> {
        let token_id = self.token_id().ok_or(DexClientError::InvalidTransition {
            op:    "read",
            phase: PositionPhase::NoPosition.name()
        })?;
        self.api.position(token_id).await
    }
}
