use alloy_network::{Ethereum, EthereumWallet, ReceiptResponse, TxSigner};
use alloy_primitives::{Address, Bytes, Signature, TxKind};
use alloy_provider::{Provider, RootProvider};
use alloy_rpc_types::{TransactionInput, TransactionRequest};
use alloy_signer::{Signer, SignerSync};
use tracing::{debug, info, warn};

use super::ChainSession;
use crate::types::{ContractCall, TxOutcome, errors::DexClientError};

/// [`ChainSession`] over any alloy provider.
///
/// Read-only until [`AlloySession::with_wallet`] attaches a signer.
#[derive(Debug, Clone)]
pub struct AlloySession<P>
where
    P: Provider
{
    eth_provider: P,
    account:      Option<Address>,
    chain_id:     u64
}

impl AlloySession<RootProvider> {
    pub async fn connect(eth_url: &str) -> eyre::Result<Self> {
        let eth_provider = RootProvider::builder().connect(eth_url).await?;
        Self::new_with_provider(eth_provider).await
    }
}

impl<P: Provider> AlloySession<P> {
    pub async fn new_with_provider(eth_provider: P) -> eyre::Result<Self> {
        let chain_id = eth_provider.get_chain_id().await?;
        debug!(chain_id, "connected rpc session");
        Ok(Self { eth_provider, account: None, chain_id })
    }

    pub fn eth_provider(&self) -> &P {
        &self.eth_provider
    }

    /// Attaches `signer` as the transaction sender. Gas, nonce and chain id
    /// are filled in by the provider.
    pub fn with_wallet<S>(self, signer: S) -> AlloySession<impl Provider + Clone>
    where
        S: Signer + SignerSync + TxSigner<Signature> + Send + Sync + 'static,
        P: Clone
    {
        let account = Signer::address(&signer);
        let eth_provider = alloy_provider::builder::<Ethereum>()
            .with_recommended_fillers()
            .wallet(EthereumWallet::new(signer))
            .on_provider(self.eth_provider);

        info!(?account, "wallet connected");
        AlloySession { eth_provider, account: Some(account), chain_id: self.chain_id }
    }

    fn tx_request(&self, from: Option<Address>, call: ContractCall) -> TransactionRequest {
        TransactionRequest {
            from,
            to: Some(TxKind::Call(call.to)),
            input: TransactionInput::both(call.input),
            value: Some(call.value),
            ..Default::default()
        }
    }
}

#[async_trait::async_trait]
impl<P: Provider> ChainSession for AlloySession<P> {
    fn account(&self) -> Option<Address> {
        self.account
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn disconnect(&mut self) {
        if let Some(account) = self.account.take() {
            info!(?account, "wallet disconnected");
        }
    }

    async fn read_call(&self, to: Address, input: Bytes) -> Result<Bytes, DexClientError> {
        let tx = TransactionRequest {
            to: Some(TxKind::Call(to)),
            input: TransactionInput::both(input),
            ..Default::default()
        };

        Ok(self.eth_provider.call(tx).await?)
    }

    async fn send_transaction(&self, call: ContractCall) -> Result<TxOutcome, DexClientError> {
        let from = self.account.ok_or(DexClientError::NotConnected)?;
        let tx = self.tx_request(Some(from), call);

        let receipt = self
            .eth_provider
            .send_transaction(tx.clone())
            .await?
            .get_receipt()
            .await?;

        let tx_hash = receipt.transaction_hash();
        if !receipt.status() {
            // the receipt carries no reason, replaying the call usually does
            let reason = match self.eth_provider.call(tx).await {
                Err(err) => match DexClientError::from(err) {
                    DexClientError::Revert { reason } => reason,
                    other => other.to_string()
                },
                Ok(_) => format!("transaction {tx_hash:?} reverted")
            };
            warn!(?tx_hash, %reason, "transaction reverted");
            return Err(DexClientError::Revert { reason })
        }

        debug!(?tx_hash, block = ?receipt.block_number(), "transaction confirmed");
        Ok(TxOutcome {
            tx_hash,
            block_number: receipt.block_number(),
            logs: receipt
                .inner
                .logs()
                .iter()
                .map(|log| log.inner.clone())
                .collect()
        })
    }
}
