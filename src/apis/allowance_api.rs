use alloy_primitives::{Address, TxHash, U256};
use tracing::{debug, info};

use super::{DexDataApi, utils::send_call};
use crate::types::{contracts::IERC20, errors::DexClientError};

pub trait AllowanceApi: DexDataApi {
    /// Approves `spender` for at least `required` of `token` unless the
    /// current allowance already covers it. Returns the approval hash when one
    /// was sent.
    ///
    /// A zero requirement never needs an approval.
    async fn ensure_allowance(
        &self,
        token: Address,
        spender: Address,
        required: U256
    ) -> Result<Option<TxHash>, DexClientError> {
        let owner = self.account()?;
        if required.is_zero() {
            return Ok(None)
        }

        let current = self.allowance(token, owner, spender).await?;
        if current >= required {
            debug!(?token, ?spender, %current, %required, "allowance sufficient");
            return Ok(None)
        }

        let amount = self.config().approval_policy.approval_amount(required);
        info!(?token, ?spender, %amount, "approving");
        let outcome = send_call(self.session(), token, IERC20::approveCall { spender, amount }).await?;

        Ok(Some(outcome.tx_hash))
    }

    /// [`Self::ensure_allowance`] for two tokens at once. Both checks run
    /// concurrently and the first failure is returned.
    async fn ensure_allowances(
        &self,
        spender: Address,
        (token0, required0): (Address, U256),
        (token1, required1): (Address, U256)
    ) -> Result<Vec<TxHash>, DexClientError> {
        let (approval0, approval1) = futures::try_join!(
            self.ensure_allowance(token0, spender, required0),
            self.ensure_allowance(token1, spender, required1)
        )?;

        Ok(approval0.into_iter().chain(approval1).collect())
    }
}

impl<T: DexDataApi> AllowanceApi for T {}
