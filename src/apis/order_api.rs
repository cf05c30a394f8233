use alloy_primitives::{Address, TxHash, U256};
use futures::StreamExt;
use tracing::{debug, info, warn};

use super::{AllowanceApi, DexContext, utils::{send_call, view_call}};
use crate::types::{
    LimitOrder, OrderStatus,
    contracts::ILimitOrderExecutor::{
        OrderCreated, cancelOrderCall, depositAndCreateOrderCall, getOrderCall, nextOrderIdCall
    },
    errors::DexClientError
};

const ORDER_SCAN_CONCURRENCY: usize = 10;

/// Limit orders held by an order-executor contract. Only available when the
/// deployment config names one.
pub trait LimitOrderApi: AllowanceApi {
    fn order_executor(&self) -> Result<Address, DexClientError> {
        self.config()
            .contracts
            .order_executor
            .ok_or(DexClientError::OrderExecutorNotConfigured)
    }

    /// Deposits `amount_in` of `token_in` into the executor and opens an
    /// order. Returns the new order id.
    async fn create_limit_order(
        &self,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
        min_amount_out: U256,
        expiry: U256
    ) -> Result<(U256, TxHash), DexClientError> {
        let executor = self.order_executor()?;
        self.account()?;

        self.ensure_allowance(token_in, executor, amount_in).await?;

        let outcome = send_call(
            self.session(),
            executor,
            depositAndCreateOrderCall {
                tokenIn: token_in,
                tokenOut: token_out,
                amountIn: amount_in,
                minAmountOut: min_amount_out,
                expiry
            }
        )
        .await?;

        let event = outcome
            .find_event::<OrderCreated>(executor)
            .ok_or(DexClientError::MissingEvent("OrderCreated"))?;

        info!(order_id = %event.orderId, "limit order created");
        Ok((event.orderId, outcome.tx_hash))
    }

    async fn cancel_order(&self, order_id: U256) -> Result<TxHash, DexClientError> {
        let executor = self.order_executor()?;
        let outcome = send_call(self.session(), executor, cancelOrderCall { orderId: order_id }).await?;

        info!(%order_id, "limit order cancelled");
        Ok(outcome.tx_hash)
    }

    async fn order(&self, order_id: U256) -> Result<LimitOrder, DexClientError> {
        let executor = self.order_executor()?;
        let order = view_call(self.session(), executor, getOrderCall { orderId: order_id }).await?;

        Ok(LimitOrder {
            order_id,
            owner: order.owner,
            token_in: order.tokenIn,
            token_out: order.tokenOut,
            amount_in: order.amountIn,
            min_amount_out: order.minAmountOut,
            expiry: order.expiry,
            status: OrderStatus::from(order.status)
        })
    }

    async fn next_order_id(&self) -> Result<U256, DexClientError> {
        let executor = self.order_executor()?;
        view_call(self.session(), executor, nextOrderIdCall {}).await
    }

    /// Every order owned by `owner`, found by scanning ids `0..nextOrderId`.
    /// Ids that fail to load are skipped. Sorted by id.
    async fn orders_of(&self, owner: Address) -> Result<Vec<LimitOrder>, DexClientError> {
        let next = self.next_order_id().await?;
        let count = u64::try_from(next).unwrap_or(u64::MAX);
        debug!(?owner, count, "scanning orders");

        let mut order_stream = futures::stream::iter(0..count)
            .map(|id| async move { (id, self.order(U256::from(id)).await) })
            .buffer_unordered(ORDER_SCAN_CONCURRENCY);

        let mut orders = Vec::new();
        while let Some((id, order)) = order_stream.next().await {
            match order {
                Ok(order) if order.owner == owner => orders.push(order),
                Ok(_) => {}
                Err(err) => warn!(id, %err, "failed to load order")
            }
        }
        orders.sort_by_key(|order| order.order_id);

        Ok(orders)
    }
}

impl<T: DexContext> LimitOrderApi for T {}
