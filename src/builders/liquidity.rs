use alloy_primitives::{
    Address, U256,
    aliases::{I24, U24}
};

use crate::types::{
    DesiredAmounts, MinAmounts, MintPlan,
    contracts::INonfungiblePositionManager::{
        CollectParams, DecreaseLiquidityParams, IncreaseLiquidityParams, MintParams, collectCall,
        decreaseLiquidityCall, increaseLiquidityCall, mintCall
    }
};

/// Position manager calls, ready to be wrapped in a
/// [`ContractCall`](crate::types::ContractCall).
pub struct PositionManagerCalls;

impl PositionManagerCalls {
    pub fn mint(
        plan: &MintPlan,
        recipient: Address,
        mins: MinAmounts,
        deadline: U256
    ) -> mintCall {
        mintCall {
            params: MintParams {
                token0: plan.token0,
                token1: plan.token1,
                fee: U24::from(plan.fee),
                tickLower: I24::unchecked_from(plan.range.tick_lower),
                tickUpper: I24::unchecked_from(plan.range.tick_upper),
                amount0Desired: plan.amounts.amount0_desired,
                amount1Desired: plan.amounts.amount1_desired,
                amount0Min: mins.amount0_min,
                amount1Min: mins.amount1_min,
                recipient,
                deadline
            }
        }
    }

    pub fn increase_liquidity(
        token_id: U256,
        amounts: DesiredAmounts,
        mins: MinAmounts,
        deadline: U256
    ) -> increaseLiquidityCall {
        increaseLiquidityCall {
            params: IncreaseLiquidityParams {
                tokenId: token_id,
                amount0Desired: amounts.amount0_raw,
                amount1Desired: amounts.amount1_raw,
                amount0Min: mins.amount0_min,
                amount1Min: mins.amount1_min,
                deadline
            }
        }
    }

    pub fn decrease_liquidity(
        token_id: U256,
        liquidity: u128,
        mins: MinAmounts,
        deadline: U256
    ) -> decreaseLiquidityCall {
        decreaseLiquidityCall {
            params: DecreaseLiquidityParams {
                tokenId: token_id,
                liquidity,
                amount0Min: mins.amount0_min,
                amount1Min: mins.amount1_min,
                deadline
            }
        }
    }

    /// Collects everything owed on both sides.
    pub fn collect_all(token_id: U256, recipient: Address) -> collectCall {
        collectCall {
            params: CollectParams {
                tokenId: token_id,
                recipient,
                amount0Max: u128::MAX,
                amount1Max: u128::MAX
            }
        }
    }
}
