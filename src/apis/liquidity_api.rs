use alloy_primitives::{Address, U256};
use tracing::{debug, info};

use super::{AllowanceApi, DexContext, utils::send_call};
use crate::{
    builders::PositionManagerCalls,
    types::{
        CollectReceipt, DesiredAmounts, MinAmounts, MintPlan, MintReceipt, ModifyLiquidityReceipt,
        PositionHandle,
        contracts::INonfungiblePositionManager::{Collect, DecreaseLiquidity, IncreaseLiquidity},
        errors::DexClientError,
        policies::RangePolicy
    },
    utils::{deadline_from_now, liquidity_fraction, mint_amounts, order_tokens}
};

/// Position lifecycle against the position manager.
///
/// Every write re-reads the pool or position it depends on first; nothing is
/// cached between calls.
pub trait LiquidityApi: AllowanceApi {
    /// Resolves the pool, reads its state and works out the range and exact
    /// amounts for a new position. Sends nothing.
    async fn prepare_mint(
        &self,
        token_a: Address,
        token_b: Address,
        fee: u32,
        amount_a: U256,
        amount_b: U256
    ) -> Result<MintPlan, DexClientError> {
        let pair = order_tokens(token_a, amount_a, token_b, amount_b)?;
        let pool = self.pool_state_for_pair(pair.token0, pair.token1, fee).await?;
        if pool.token0 != pair.token0 || pool.token1 != pair.token1 {
            return Err(DexClientError::PoolTokenMismatch { pool: pool.pool_address })
        }

        let range = self.range_policy().select_range(&pool)?;
        let amounts = mint_amounts(&pool, &range, &pair.amounts)?;
        debug!(?range, liquidity = amounts.liquidity, "prepared mint");

        Ok(MintPlan {
            pool,
            token0: pair.token0,
            token1: pair.token1,
            fee,
            range,
            desired: pair.amounts,
            amounts
        })
    }

    /// Mints a new position owned by the connected account.
    async fn mint_position(
        &self,
        token_a: Address,
        token_b: Address,
        fee: u32,
        amount_a: U256,
        amount_b: U256,
        mins: MinAmounts
    ) -> Result<MintReceipt, DexClientError> {
        let recipient = self.account()?;
        let position_manager = self.config().contracts.position_manager;

        let plan = self
            .prepare_mint(token_a, token_b, fee, amount_a, amount_b)
            .await?;
        if plan.amounts.liquidity == 0 {
            return Err(DexClientError::NothingToDeposit)
        }

        self.ensure_allowances(
            position_manager,
            (plan.token0, plan.amounts.amount0_desired),
            (plan.token1, plan.amounts.amount1_desired)
        )
        .await?;

        let deadline = deadline_from_now(self.config().deadline_secs);
        let outcome = send_call(
            self.session(),
            position_manager,
            PositionManagerCalls::mint(&plan, recipient, mins, deadline)
        )
        .await?;

        let event = outcome
            .find_event::<IncreaseLiquidity>(position_manager)
            .ok_or(DexClientError::MissingEvent("IncreaseLiquidity"))?;

        info!(token_id = %event.tokenId, tx_hash = ?outcome.tx_hash, "position minted");
        Ok(MintReceipt {
            position:  PositionHandle { token_id: event.tokenId },
            liquidity: event.liquidity,
            amount0:   event.amount0,
            amount1:   event.amount1,
            range:     plan.range,
            tx_hash:   outcome.tx_hash
        })
    }

    /// Adds to an existing position. Amounts are in the position's
    /// token0/token1 order; any side the current price does not need is
    /// zeroed before submission.
    async fn increase_liquidity(
        &self,
        token_id: U256,
        amount0: U256,
        amount1: U256,
        mins: MinAmounts
    ) -> Result<ModifyLiquidityReceipt, DexClientError> {
        self.account()?;
        let position_manager = self.config().contracts.position_manager;

        let position = self.position(token_id).await?;
        let pool = self
            .pool_state_for_pair(position.token0, position.token1, position.fee)
            .await?;

        let sides = position.range.required_sides(pool.tick);
        let amounts = sides.apply(DesiredAmounts::new(amount0, amount1));
        if amounts.amount0_raw.is_zero() && amounts.amount1_raw.is_zero() {
            return Err(DexClientError::NothingToDeposit)
        }
        debug!(%token_id, ?sides, tick = pool.tick, "increasing liquidity");

        self.ensure_allowances(
            position_manager,
            (position.token0, amounts.amount0_raw),
            (position.token1, amounts.amount1_raw)
        )
        .await?;

        let deadline = deadline_from_now(self.config().deadline_secs);
        let outcome = send_call(
            self.session(),
            position_manager,
            PositionManagerCalls::increase_liquidity(token_id, amounts, mins, deadline)
        )
        .await?;

        let event = outcome
            .find_event::<IncreaseLiquidity>(position_manager)
            .ok_or(DexClientError::MissingEvent("IncreaseLiquidity"))?;

        Ok(ModifyLiquidityReceipt {
            token_id,
            liquidity: event.liquidity,
            amount0: event.amount0,
            amount1: event.amount1,
            tx_hash: outcome.tx_hash
        })
    }

    /// Removes `percentage` (1..=100) of the position's current liquidity.
    /// Withdrawn tokens stay owed to the position until collected.
    async fn decrease_liquidity(
        &self,
        token_id: U256,
        percentage: u8,
        mins: MinAmounts
    ) -> Result<ModifyLiquidityReceipt, DexClientError> {
        if percentage == 0 || percentage > 100 {
            return Err(DexClientError::InvalidPercentage(percentage))
        }
        self.account()?;
        let position_manager = self.config().contracts.position_manager;

        let position = self.position(token_id).await?;
        let liquidity = liquidity_fraction(position.liquidity, percentage);
        if liquidity == 0 {
            return Err(DexClientError::NoLiquidity(token_id))
        }

        let deadline = deadline_from_now(self.config().deadline_secs);
        let outcome = send_call(
            self.session(),
            position_manager,
            PositionManagerCalls::decrease_liquidity(token_id, liquidity, mins, deadline)
        )
        .await?;

        let event = outcome
            .find_event::<DecreaseLiquidity>(position_manager)
            .ok_or(DexClientError::MissingEvent("DecreaseLiquidity"))?;

        info!(%token_id, percentage, liquidity, "liquidity removed");
        Ok(ModifyLiquidityReceipt {
            token_id,
            liquidity: event.liquidity,
            amount0: event.amount0,
            amount1: event.amount1,
            tx_hash: outcome.tx_hash
        })
    }

    /// Collects all fees and withdrawn tokens to the connected account.
    async fn collect_fees(&self, token_id: U256) -> Result<CollectReceipt, DexClientError> {
        let recipient = self.account()?;
        let position_manager = self.config().contracts.position_manager;

        let outcome = send_call(
            self.session(),
            position_manager,
            PositionManagerCalls::collect_all(token_id, recipient)
        )
        .await?;

        let event = outcome
            .find_event::<Collect>(position_manager)
            .ok_or(DexClientError::MissingEvent("Collect"))?;

        info!(%token_id, amount0 = %event.amount0, amount1 = %event.amount1, "fees collected");
        Ok(CollectReceipt {
            token_id,
            amount0: event.amount0,
            amount1: event.amount1,
            tx_hash: outcome.tx_hash
        })
    }
}

impl<T: DexContext> LiquidityApi for T {}
