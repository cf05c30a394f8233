mod api;
pub use api::*;

mod backend;
pub use backend::*;

use alloy_primitives::{Address, Bytes};

use crate::types::{ContractCall, TxOutcome, errors::DexClientError};

/// The only surface the workflows touch: an RPC endpoint for reads and a
/// signer-backed account for writes.
#[async_trait::async_trait]
pub trait ChainSession: Send + Sync {
    /// The connected signing account, if any.
    fn account(&self) -> Option<Address>;

    fn chain_id(&self) -> u64;

    /// Forgets the connected account. Reads keep working, writes fail with
    /// [`DexClientError::NotConnected`].
    fn disconnect(&mut self);

    /// `eth_call` against latest state, returning the raw return data.
    async fn read_call(&self, to: Address, input: Bytes) -> Result<Bytes, DexClientError>;

    /// Signs, submits and waits for one confirmation.
    ///
    /// Fails with [`DexClientError::NotConnected`] before touching the chain
    /// when no account is connected.
    async fn send_transaction(&self, call: ContractCall) -> Result<TxOutcome, DexClientError>;
}
