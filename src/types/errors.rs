use alloy_json_rpc::RpcError;
use alloy_primitives::{Address, U256};
use alloy_sol_types::{Revert, SolError};
use alloy_transport::TransportErrorKind;

/// JSON-RPC error code wallets return when the user declines a request.
pub const USER_REJECTED_CODE: i64 = 4001;

#[derive(Debug, thiserror::Error)]
pub enum DexClientError {
    #[error("wallet not connected")]
    NotConnected,
    #[error("connected to chain {actual}, expected chain {expected}")]
    WrongNetwork { expected: u64, actual: u64 },
    #[error("transaction rejected by user")]
    UserRejected,
    #[error("transaction reverted: {reason}")]
    Revert { reason: String },
    #[error("Pool does not exist for fee tier {fee}")]
    PoolNotFound { fee: u32 },
    #[error("unsupported fee tier {0}")]
    UnsupportedFeeTier(u32),
    #[error("invalid percentage {0}, expected 1..=100")]
    InvalidPercentage(u8),
    #[error("invalid slippage {0} bps, expected at most 10000")]
    InvalidSlippage(u32),
    #[error("invalid address {0:?}")]
    InvalidAddress(String),
    #[error("identical tokens {0:?}")]
    IdenticalTokens(Address),
    #[error("tick range [{lower}, {upper}) is invalid for tick spacing {spacing}")]
    InvalidTickRange { lower: i32, upper: i32, spacing: i32 },
    #[error("position has a pending transaction")]
    PositionBusy,
    #[error("pool {pool:?} reports tokens in a different order than requested")]
    PoolTokenMismatch { pool: Address },
    #[error("nothing to deposit at the current price")]
    NothingToDeposit,
    #[error("position {0} has no liquidity to remove")]
    NoLiquidity(U256),
    #[error("cannot {op} a position in phase {phase}")]
    InvalidTransition { op: &'static str, phase: &'static str },
    #[error("no quote available for {token_in:?} -> {token_out:?}")]
    NoRoute { token_in: Address, token_out: Address },
    #[error("no order executor configured for this deployment")]
    OrderExecutorNotConfigured,
    #[error("expected event {0} in transaction receipt")]
    MissingEvent(&'static str),
    #[error("liquidity does not fit in 128 bits")]
    LiquidityOverflow,
    #[error("division by zero in liquidity math")]
    DivisionByZero,
    #[error("amount {0:?} is negative")]
    NegativeAmount(String),
    #[error("decode error: {0}")]
    Decode(#[from] alloy_sol_types::Error),
    #[error("rpc error: {0}")]
    Rpc(RpcError<TransportErrorKind>),
    #[error("pending transaction error: {0}")]
    PendingTransaction(#[from] alloy_provider::PendingTransactionError),
    #[error("math error: {0:?}")]
    Math(#[from] uniswap_v3_math::error::UniswapV3MathError),
    #[error("units error: {0}")]
    Units(#[from] alloy_primitives::utils::UnitsError)
}

impl DexClientError {
    /// Whether the error came from the user (or wallet) declining to sign.
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, Self::UserRejected)
    }

    pub(crate) fn revert(reason: impl ToString) -> Self {
        Self::Revert { reason: reason.to_string() }
    }
}

impl From<RpcError<TransportErrorKind>> for DexClientError {
    fn from(err: RpcError<TransportErrorKind>) -> Self {
        if let RpcError::ErrorResp(payload) = &err {
            if payload.code == USER_REJECTED_CODE {
                return Self::UserRejected
            }

            if let Some(reason) = payload
                .as_revert_data()
                .and_then(|data| Revert::abi_decode(&data).ok())
            {
                return Self::Revert { reason: reason.reason }
            }

            if payload.message.contains("execution reverted") {
                return Self::Revert { reason: payload.message.to_string() }
            }
        }

        Self::Rpc(err)
    }
}
