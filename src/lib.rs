#![allow(async_fn_in_trait)]

//! Client-side workflows for a concentrated-liquidity DEX dashboard:
//! pool discovery, position management, swaps and limit orders.
//!
//! ```ignore
//! use dex_dashboard_sdk::{apis::*, providers::DexApi, types::config::DexClientConfig};
//!
//! let api = DexApi::connect(DexClientConfig::from_env()?).await?.with_wallet(signer);
//! let receipt = api
//!     .mint_position(weth, usdc, 3000, amount_weth, amount_usdc, Default::default())
//!     .await?;
//! ```

pub mod apis;
pub mod builders;
pub mod providers;
#[cfg(test)]
pub mod test_utils;
pub mod types;
pub mod utils;

pub use apis::{
    AllowanceApi, DexContext, DexDataApi, LimitOrderApi, LiquidityApi, ManagedPosition, SwapApi
};
pub use providers::{AlloySession, ChainSession, DexApi};
pub use types::errors::DexClientError;
