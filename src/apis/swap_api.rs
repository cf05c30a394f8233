use alloy_primitives::{Address, TxHash, U256};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{AllowanceApi, DexContext, utils::{send_call, view_call}};
use crate::{
    builders::SwapCalls,
    types::{SwapQuote, errors::DexClientError}
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapReceipt {
    pub quote:              SwapQuote,
    pub amount_out_minimum: U256,
    pub tx_hash:            TxHash
}

pub trait SwapApi: AllowanceApi {
    async fn quote_exact_input(
        &self,
        token_in: Address,
        token_out: Address,
        fee: u32,
        amount_in: U256
    ) -> Result<SwapQuote, DexClientError> {
        let quoted = view_call(
            self.session(),
            self.config().contracts.quoter,
            SwapCalls::quote_exact_input(token_in, token_out, fee, amount_in)
        )
        .await?;

        Ok(SwapQuote { fee, amount_in, amount_out: quoted.amountOut })
    }

    /// Quotes every configured fee tier concurrently. Tiers whose quote fails
    /// (usually because the pool does not exist) are left out.
    async fn quote_all_tiers(
        &self,
        token_in: Address,
        token_out: Address,
        amount_in: U256
    ) -> Vec<SwapQuote> {
        let quotes = futures::future::join_all(
            self.config()
                .fee_tiers
                .iter()
                .map(|fee| self.quote_exact_input(token_in, token_out, *fee, amount_in))
        )
        .await;

        quotes
            .into_iter()
            .zip(&self.config().fee_tiers)
            .filter_map(|(quote, fee)| match quote {
                Ok(quote) => Some(quote),
                Err(err) => {
                    warn!(fee, %err, "quote failed");
                    None
                }
            })
            .collect()
    }

    /// The tier with the greatest output. Ties go to the tier listed first.
    async fn best_quote(
        &self,
        token_in: Address,
        token_out: Address,
        amount_in: U256
    ) -> Result<SwapQuote, DexClientError> {
        self.quote_all_tiers(token_in, token_out, amount_in)
            .await
            .into_iter()
            .reduce(|best, quote| if quote.amount_out > best.amount_out { quote } else { best })
            .ok_or(DexClientError::NoRoute { token_in, token_out })
    }

    /// Swaps `amount_in` through the best tier, accepting at most
    /// `slippage_bps` basis points less than quoted.
    async fn swap_exact_input_single(
        &self,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
        slippage_bps: u32
    ) -> Result<SwapReceipt, DexClientError> {
        if slippage_bps > 10_000 {
            return Err(DexClientError::InvalidSlippage(slippage_bps))
        }
        let recipient = self.account()?;
        let router = self.config().contracts.swap_router;

        let quote = self.best_quote(token_in, token_out, amount_in).await?;
        let amount_out_minimum = SwapCalls::min_amount_out(quote.amount_out, slippage_bps);
        debug!(fee = quote.fee, quoted = %quote.amount_out, %amount_out_minimum, "best quote");

        self.ensure_allowance(token_in, router, amount_in).await?;

        let outcome = send_call(
            self.session(),
            router,
            SwapCalls::exact_input_single(token_in, token_out, &quote, amount_out_minimum, recipient)
        )
        .await?;

        info!(tx_hash = ?outcome.tx_hash, fee = quote.fee, "swap confirmed");
        Ok(SwapReceipt { quote, amount_out_minimum, tx_hash: outcome.tx_hash })
    }
}

impl<T: DexContext> SwapApi for T {}
