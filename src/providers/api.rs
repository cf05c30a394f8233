use alloy_network::TxSigner;
use alloy_primitives::Signature;
use alloy_provider::{Provider, RootProvider};
use alloy_signer::{Signer, SignerSync};
use tracing::info;

use super::{AlloySession, ChainSession};
use crate::{
    apis::DexContext,
    types::{
        config::DexClientConfig,
        errors::DexClientError,
        policies::{ApprovalPolicy, RangePolicy, SymmetricRange}
    }
};

/// Entry point for the dashboard workflows.
///
/// All workflow methods come from the api traits ([`DexDataApi`],
/// [`LiquidityApi`], [`SwapApi`], [`LimitOrderApi`]), which are implemented
/// for anything that is a [`DexContext`].
///
/// [`DexDataApi`]: crate::apis::DexDataApi
/// [`LiquidityApi`]: crate::apis::LiquidityApi
/// [`SwapApi`]: crate::apis::SwapApi
/// [`LimitOrderApi`]: crate::apis::LimitOrderApi
#[derive(Debug, Clone)]
pub struct DexApi<S, R = SymmetricRange> {
    session:      S,
    config:       DexClientConfig,
    range_policy: R
}

impl DexApi<AlloySession<RootProvider>> {
    /// Connects to `config.rpc_url` and checks that it serves `config.chain_id`.
    pub async fn connect(config: DexClientConfig) -> eyre::Result<Self> {
        let session = AlloySession::connect(&config.rpc_url).await?;
        Ok(Self::new(session, config)?)
    }
}

impl<S: ChainSession> DexApi<S> {
    pub fn new(session: S, config: DexClientConfig) -> Result<Self, DexClientError> {
        if session.chain_id() != config.chain_id {
            return Err(DexClientError::WrongNetwork {
                expected: config.chain_id,
                actual:   session.chain_id()
            })
        }

        info!(chain_id = config.chain_id, account = ?session.account(), "dex api ready");
        Ok(Self { session, config, range_policy: SymmetricRange::default() })
    }
}

impl<S: ChainSession, R> DexApi<S, R> {
    /// Drops the connected account; every later write fails with
    /// [`DexClientError::NotConnected`] until a new api is built with a wallet.
    pub fn disconnect(&mut self) {
        self.session.disconnect();
    }
}

impl<P: Provider + Clone, R> DexApi<AlloySession<P>, R> {
    pub fn with_wallet<W>(self, signer: W) -> DexApi<AlloySession<impl Provider + Clone>, R>
    where
        W: Signer + SignerSync + TxSigner<Signature> + Send + Sync + 'static
    {
        DexApi {
            session:      self.session.with_wallet(signer),
            config:       self.config,
            range_policy: self.range_policy
        }
    }
}

impl<S, R> DexApi<S, R> {
    pub fn with_range_policy<R1: RangePolicy>(self, range_policy: R1) -> DexApi<S, R1> {
        DexApi { session: self.session, config: self.config, range_policy }
    }

    pub fn with_approval_policy(mut self, approval_policy: ApprovalPolicy) -> Self {
        self.config.approval_policy = approval_policy;
        self
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    pub fn config(&self) -> &DexClientConfig {
        &self.config
    }
}

impl<S, R> DexContext for DexApi<S, R>
where
    S: ChainSession,
    R: RangePolicy
{
    type Range = R;
    type Session = S;

    fn session(&self) -> &S {
        &self.session
    }

    fn config(&self) -> &DexClientConfig {
        &self.config
    }

    fn range_policy(&self) -> &R {
        &self.range_policy
    }
}
