mod allowance_api;
pub use allowance_api::*;

mod data_api;
pub use data_api::*;

mod liquidity_api;
pub use liquidity_api::*;

mod managed_position;
pub use managed_position::*;

mod order_api;
pub use order_api::*;

mod swap_api;
pub use swap_api::*;

pub(crate) mod utils;

use alloy_primitives::Address;

use crate::{
    providers::ChainSession,
    types::{config::DexClientConfig, errors::DexClientError, policies::RangePolicy}
};

/// What every workflow needs: a session, the deployment config and the
/// range policy used for new positions.
pub trait DexContext {
    type Session: ChainSession;
    type Range: RangePolicy;

    fn session(&self) -> &Self::Session;

    fn config(&self) -> &DexClientConfig;

    fn range_policy(&self) -> &Self::Range;

    /// The connected account, or [`DexClientError::NotConnected`].
    fn account(&self) -> Result<Address, DexClientError> {
        self.session().account().ok_or(DexClientError::NotConnected)
    }
}
