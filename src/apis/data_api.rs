use std::time::Duration;

use alloy_primitives::{Address, U256, aliases::U24};
use futures::Stream;
use tracing::debug;

use super::{DexContext, utils::view_call};
use crate::{
    types::{
        PoolState, PositionInfo, TickRange, TokenDescriptor,
        contracts::{IERC20, INonfungiblePositionManager, IUniswapV3Factory, IUniswapV3Pool},
        errors::DexClientError
    },
    utils::poll_every
};

/// Read-only chain queries. Nothing here needs a connected account.
pub trait DexDataApi: DexContext {
    async fn token_descriptor(&self, token: Address) -> Result<TokenDescriptor, DexClientError> {
        let (symbol, decimals) = futures::try_join!(
            view_call(self.session(), token, IERC20::symbolCall {}),
            view_call(self.session(), token, IERC20::decimalsCall {})
        )?;

        Ok(TokenDescriptor::new(token, symbol, decimals))
    }

    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256, DexClientError> {
        view_call(self.session(), token, IERC20::balanceOfCall { owner }).await
    }

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address
    ) -> Result<U256, DexClientError> {
        view_call(self.session(), token, IERC20::allowanceCall { owner, spender }).await
    }

    /// Looks up the pool for a pair and fee tier. Token order does not matter.
    async fn resolve_pool(
        &self,
        token_a: Address,
        token_b: Address,
        fee: u32
    ) -> Result<Address, DexClientError> {
        if !self.config().is_supported_fee(fee) {
            return Err(DexClientError::UnsupportedFeeTier(fee))
        }

        let pool = view_call(
            self.session(),
            self.config().contracts.factory,
            IUniswapV3Factory::getPoolCall { tokenA: token_a, tokenB: token_b, fee: U24::from(fee) }
        )
        .await?;

        if pool == Address::ZERO {
            return Err(DexClientError::PoolNotFound { fee })
        }

        debug!(?token_a, ?token_b, fee, ?pool, "resolved pool");
        Ok(pool)
    }

    /// Reads all six pool fields concurrently.
    async fn pool_state(&self, pool: Address) -> Result<PoolState, DexClientError> {
        let session = self.session();
        let (tick_spacing, fee, liquidity, slot0, token0, token1) = futures::try_join!(
            view_call(session, pool, IUniswapV3Pool::tickSpacingCall {}),
            view_call(session, pool, IUniswapV3Pool::feeCall {}),
            view_call(session, pool, IUniswapV3Pool::liquidityCall {}),
            view_call(session, pool, IUniswapV3Pool::slot0Call {}),
            view_call(session, pool, IUniswapV3Pool::token0Call {}),
            view_call(session, pool, IUniswapV3Pool::token1Call {})
        )?;

        Ok(PoolState {
            pool_address: pool,
            token0,
            token1,
            fee: fee.to::<u32>(),
            tick_spacing: tick_spacing.as_i32(),
            sqrt_price_x96: U256::from(slot0.sqrtPriceX96),
            liquidity,
            tick: slot0.tick.as_i32()
        })
    }

    async fn pool_state_for_pair(
        &self,
        token_a: Address,
        token_b: Address,
        fee: u32
    ) -> Result<PoolState, DexClientError> {
        let pool = self.resolve_pool(token_a, token_b, fee).await?;
        self.pool_state(pool).await
    }

    async fn position(&self, token_id: U256) -> Result<PositionInfo, DexClientError> {
        let position = view_call(
            self.session(),
            self.config().contracts.position_manager,
            INonfungiblePositionManager::positionsCall { tokenId: token_id }
        )
        .await?;

        Ok(PositionInfo {
            token_id,
            token0: position.token0,
            token1: position.token1,
            fee: position.fee.to::<u32>(),
            range: TickRange::new(position.tickLower.as_i32(), position.tickUpper.as_i32()),
            liquidity: position.liquidity,
            tokens_owed0: position.tokensOwed0,
            tokens_owed1: position.tokensOwed1
        })
    }

    /// Balances of `tokens` for `owner`, re-read every `interval` (clamped to
    /// the configured bounds). The first item is produced immediately.
    fn watch_balances(
        &self,
        owner: Address,
        tokens: Vec<Address>,
        interval: Duration
    ) -> impl Stream<Item = Result<Vec<U256>, DexClientError>> + '_ {
        let period = self.config().clamp_poll_interval(interval);
        debug!(?owner, ?period, "watching balances");

        poll_every(period, move || {
            let tokens = tokens.clone();
            async move {
                futures::future::try_join_all(
                    tokens
                        .into_iter()
                        .map(|token| self.balance_of(token, owner))
                )
                .await
            }
        })
    }
}

impl<T: DexContext> DexDataApi for T {}
