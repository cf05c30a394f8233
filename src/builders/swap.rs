use alloy_primitives::{
    Address, Bytes, U256,
    aliases::{U24, U160}
};

use crate::types::{
    SwapQuote,
    contracts::{
        IQuoterV2::quoteExactInputCall,
        ISwapRouter02::{ExactInputSingleParams, exactInputSingleCall}
    }
};

pub struct SwapCalls;

impl SwapCalls {
    /// Single-hop path: `token_in ‖ fee (3 bytes) ‖ token_out`.
    pub fn single_hop_path(token_in: Address, fee: u32, token_out: Address) -> Bytes {
        let mut path = Vec::with_capacity(43);
        path.extend_from_slice(token_in.as_slice());
        path.extend_from_slice(&fee.to_be_bytes()[1..]);
        path.extend_from_slice(token_out.as_slice());
        path.into()
    }

    pub fn quote_exact_input(
        token_in: Address,
        token_out: Address,
        fee: u32,
        amount_in: U256
    ) -> quoteExactInputCall {
        quoteExactInputCall {
            path:     Self::single_hop_path(token_in, fee, token_out),
            amountIn: amount_in
        }
    }

    /// Output floor after `slippage_bps` basis points of tolerance, rounded
    /// down. Callers validate `slippage_bps <= 10_000`.
    pub fn min_amount_out(quoted: U256, slippage_bps: u32) -> U256 {
        quoted * U256::from(10_000 - slippage_bps) / U256::from(10_000)
    }

    pub fn exact_input_single(
        token_in: Address,
        token_out: Address,
        quote: &SwapQuote,
        amount_out_minimum: U256,
        recipient: Address
    ) -> exactInputSingleCall {
        exactInputSingleCall {
            params: ExactInputSingleParams {
                tokenIn: token_in,
                tokenOut: token_out,
                fee: U24::from(quote.fee),
                recipient,
                amountIn: quote.amount_in,
                amountOutMinimum: amount_out_minimum,
                sqrtPriceLimitX96: U160::ZERO
            }
        }
    }
}
