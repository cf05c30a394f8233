use std::{path::Path, time::Duration};

use alloy_primitives::{Address, address};
use serde::{Deserialize, Serialize};

use super::policies::ApprovalPolicy;

pub const DEFAULT_FEE_TIERS: [u32; 4] = [100, 500, 3000, 10000];
pub const DEFAULT_DEADLINE_SECS: u64 = 600;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
pub const MIN_POLL_INTERVAL_SECS: u64 = 5;
pub const MAX_POLL_INTERVAL_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentAddresses {
    pub factory:          Address,
    pub position_manager: Address,
    pub swap_router:      Address,
    pub quoter:           Address,
    #[serde(default)]
    pub order_executor:   Option<Address>
}

pub const UNISWAP_V3_MAINNET: DeploymentAddresses = DeploymentAddresses {
    factory:          address!("1F98431c8aD98523631AE4a59f267346ea31F984"),
    position_manager: address!("C36442b4a4522E871399CD717aBDD847Ab11FE88"),
    swap_router:      address!("68b3465833fb72A70ecDF485E0e4C7bD8665Fc45"),
    quoter:           address!("61fFE014bA17989E743c5F6cB21bF9697530B21e"),
    order_executor:   None
};

pub const UNISWAP_V3_SEPOLIA: DeploymentAddresses = DeploymentAddresses {
    factory:          address!("0227628f3F023bb0B980b67D528571c95c6DaC1c"),
    position_manager: address!("1238536071E1c677A632429e3655c799b22cDA52"),
    swap_router:      address!("3bFA4769FB09eefC5a80d6E87c3B9C650f7Ae48E"),
    quoter:           address!("Ed1f6473345F45b75F8179591dd5bA1888cf2FB3"),
    order_executor:   None
};

impl DeploymentAddresses {
    pub fn by_chain(chain_id: u64) -> Option<Self> {
        match chain_id {
            1 => Some(UNISWAP_V3_MAINNET),
            11155111 => Some(UNISWAP_V3_SEPOLIA),
            _ => None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DexClientConfig {
    pub rpc_url:            String,
    pub chain_id:           u64,
    pub contracts:          DeploymentAddresses,
    #[serde(default = "default_fee_tiers")]
    pub fee_tiers:          Vec<u32>,
    #[serde(default = "default_deadline_secs")]
    pub deadline_secs:      u64,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default)]
    pub approval_policy:    ApprovalPolicy,
    /// disables the 5-30s clamp on polling intervals
    #[serde(default)]
    pub unclamped_polling:  bool
}

fn default_fee_tiers() -> Vec<u32> {
    DEFAULT_FEE_TIERS.to_vec()
}

fn default_deadline_secs() -> u64 {
    DEFAULT_DEADLINE_SECS
}

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

impl DexClientConfig {
    pub fn new(rpc_url: impl ToString, chain_id: u64, contracts: DeploymentAddresses) -> Self {
        Self {
            rpc_url: rpc_url.to_string(),
            chain_id,
            contracts,
            fee_tiers: default_fee_tiers(),
            deadline_secs: DEFAULT_DEADLINE_SECS,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            approval_policy: ApprovalPolicy::default(),
            unclamped_polling: false
        }
    }

    /// Config for a chain with a known deployment.
    pub fn for_chain(rpc_url: impl ToString, chain_id: u64) -> eyre::Result<Self> {
        let contracts = DeploymentAddresses::by_chain(chain_id)
            .ok_or(eyre::eyre!("no known deployment for chain {chain_id}"))?;
        Ok(Self::new(rpc_url, chain_id, contracts))
    }

    pub fn from_json_str(json: &str) -> eyre::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// Reads `DEX_RPC_URL` and `DEX_CHAIN_ID` (after loading `.env`) and uses
    /// the known deployment for that chain.
    pub fn from_env() -> eyre::Result<Self> {
        dotenv::dotenv().ok();
        let rpc_url = std::env::var("DEX_RPC_URL")
            .map_err(|_| eyre::eyre!("DEX_RPC_URL not found in env"))?;
        let chain_id = std::env::var("DEX_CHAIN_ID")
            .map_err(|_| eyre::eyre!("DEX_CHAIN_ID not found in env"))?
            .parse()?;

        Self::for_chain(rpc_url, chain_id)
    }

    pub fn with_fee_tiers(mut self, fee_tiers: impl IntoIterator<Item = u32>) -> Self {
        self.fee_tiers = fee_tiers.into_iter().collect();
        self
    }

    pub fn with_deadline_secs(mut self, deadline_secs: u64) -> Self {
        self.deadline_secs = deadline_secs;
        self
    }

    pub fn with_poll_interval_secs(mut self, poll_interval_secs: u64) -> Self {
        self.poll_interval_secs = poll_interval_secs;
        self
    }

    pub fn with_approval_policy(mut self, approval_policy: ApprovalPolicy) -> Self {
        self.approval_policy = approval_policy;
        self
    }

    pub fn with_order_executor(mut self, order_executor: Address) -> Self {
        self.contracts.order_executor = Some(order_executor);
        self
    }

    pub fn with_unclamped_polling(mut self) -> Self {
        self.unclamped_polling = true;
        self
    }

    pub fn is_supported_fee(&self, fee: u32) -> bool {
        self.fee_tiers.contains(&fee)
    }

    pub fn poll_interval(&self) -> Duration {
        self.clamp_poll_interval(Duration::from_secs(self.poll_interval_secs))
    }

    pub fn clamp_poll_interval(&self, interval: Duration) -> Duration {
        if self.unclamped_polling {
            interval
        } else {
            interval.clamp(
                Duration::from_secs(MIN_POLL_INTERVAL_SECS),
                Duration::from_secs(MAX_POLL_INTERVAL_SECS)
            )
        }
    }
}
