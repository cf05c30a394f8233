//! An in-memory chain for exercising the workflows without a node.
//!
//! Implements just enough of each contract to behave like the real thing:
//! allowances are enforced, positions accrue owed tokens on decrease and
//! events are emitted the way the position manager emits them.

use std::{
    collections::{HashMap, HashSet},
    sync::atomic::{AtomicUsize, Ordering}
};

use alloy_primitives::{
    Address, B256, Bytes, Log, U256, address,
    aliases::{I24, U24, U96, U160},
    keccak256
};
use alloy_sol_types::{SolCall, SolEvent, SolInterface};
use async_trait::async_trait;
use parking_lot::Mutex;
use uniswap_v3_math::{
    sqrt_price_math::{_get_amount_0_delta, _get_amount_1_delta},
    tick_math::get_sqrt_ratio_at_tick
};

use crate::{
    providers::ChainSession,
    types::{
        ContractCall, TickRange, TxOutcome,
        config::{DexClientConfig, UNISWAP_V3_MAINNET},
        contracts::{
            IERC20::{self, IERC20Calls},
            ILimitOrderExecutor::{self, ILimitOrderExecutorCalls},
            INonfungiblePositionManager::{self, INonfungiblePositionManagerCalls},
            IQuoterV2::{self, IQuoterV2Calls},
            ISwapRouter02::ISwapRouter02Calls,
            IUniswapV3Factory::{self, IUniswapV3FactoryCalls},
            IUniswapV3Pool::{self, IUniswapV3PoolCalls}
        },
        errors::DexClientError
    },
    utils::{liquidity_for_amounts, sort_tokens}
};

pub const USDC: Address = address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
pub const WETH: Address = address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
pub const ALICE: Address = address!("00000000000000000000000000000000000a11ce");
pub const BOB: Address = address!("0000000000000000000000000000000000000b0b");
pub const SPENDER: Address = address!("0000000000000000000000000000000000005e4d");
pub const ORDER_EXECUTOR: Address = address!("00000000000000000000000000000000000e8ec0");

pub fn test_config() -> DexClientConfig {
    DexClientConfig::new("http://localhost:8545", 1, UNISWAP_V3_MAINNET)
}

#[derive(Debug, Clone, Copy)]
struct MockPool {
    token0:       Address,
    token1:       Address,
    fee:          u32,
    tick_spacing: i32,
    tick:         i32,
    liquidity:    u128
}

impl MockPool {
    fn sqrt_price(&self) -> Result<U256, DexClientError> {
        Ok(get_sqrt_ratio_at_tick(self.tick)?)
    }
}

#[derive(Debug, Clone, Copy)]
struct MockPosition {
    owner:        Address,
    token0:       Address,
    token1:       Address,
    fee:          u32,
    range:        TickRange,
    liquidity:    u128,
    tokens_owed0: u128,
    tokens_owed1: u128
}

#[derive(Debug, Default)]
struct MockState {
    tokens:         HashMap<Address, (String, u8)>,
    balances:       HashMap<(Address, Address), U256>,
    allowances:     HashMap<(Address, Address, Address), U256>,
    pools:          HashMap<Address, MockPool>,
    factory:        HashMap<(Address, Address, u32), Address>,
    positions:      HashMap<U256, MockPosition>,
    next_token_id:  u64,
    quotes:         HashMap<(Address, Address, u32), U256>,
    orders:         Vec<ILimitOrderExecutor::Order>,
    sent:           Vec<ContractCall>,
    tx_count:       u64
}

/// Counts calls that are currently awaiting the chain and the most that
/// were ever outstanding together.
#[derive(Debug, Default)]
struct InFlight {
    current: AtomicUsize,
    peak:    AtomicUsize
}

impl InFlight {
    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct MockChain {
    chain_id:       u64,
    account:        Option<Address>,
    rejected:       HashSet<Address>,
    failing_reads:  HashSet<[u8; 4]>,
    reads:          AtomicUsize,
    reads_inflight: InFlight,
    sends_inflight: InFlight,
    state:          Mutex<MockState>
}

impl Default for MockChain {
    fn default() -> Self {
        Self::new()
    }
}

impl MockChain {
    pub fn new() -> Self {
        Self {
            chain_id:       1,
            account:        None,
            rejected:       HashSet::new(),
            failing_reads:  HashSet::new(),
            reads:          AtomicUsize::new(0),
            reads_inflight: InFlight::default(),
            sends_inflight: InFlight::default(),
            state:          Mutex::new(MockState { next_token_id: 1, ..Default::default() })
        }
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn with_account(mut self, account: Address) -> Self {
        self.account = Some(account);
        self
    }

    /// Every transaction to `to` is declined as if by the wallet.
    pub fn reject_calls_to(mut self, to: Address) -> Self {
        self.rejected.insert(to);
        self
    }

    /// Every read whose calldata starts with `selector` reverts, on any
    /// contract.
    pub fn fail_reads_of(mut self, selector: [u8; 4]) -> Self {
        self.failing_reads.insert(selector);
        self
    }

    pub fn with_token(self, token: Address, symbol: &str, decimals: u8) -> Self {
        self.state
            .lock()
            .tokens
            .insert(token, (symbol.to_string(), decimals));
        self
    }

    pub fn with_balance(self, token: Address, owner: Address, amount: U256) -> Self {
        self.state.lock().balances.insert((token, owner), amount);
        self
    }

    pub fn with_allowance(self, token: Address, owner: Address, spender: Address, amount: U256) -> Self {
        self.state
            .lock()
            .allowances
            .insert((token, owner, spender), amount);
        self
    }

    pub fn with_pool(self, token_a: Address, token_b: Address, fee: u32, tick_spacing: i32, tick: i32) -> Self {
        let (token0, token1) = sort_tokens(token_a, token_b);
        let pool_address = Self::pool_address(token0, token1, fee);

        let mut state = self.state.lock();
        state.pools.insert(
            pool_address,
            MockPool { token0, token1, fee, tick_spacing, tick, liquidity: 1_000_000_000 }
        );
        state.factory.insert((token0, token1, fee), pool_address);
        drop(state);

        self
    }

    pub fn with_quote(self, token_in: Address, token_out: Address, fee: u32, amount_out: U256) -> Self {
        self.state
            .lock()
            .quotes
            .insert((token_in, token_out, fee), amount_out);
        self
    }

    pub fn insert_position(
        &self,
        token0: Address,
        token1: Address,
        fee: u32,
        range: TickRange,
        liquidity: u128
    ) -> U256 {
        let mut state = self.state.lock();
        let token_id = U256::from(state.next_token_id);
        state.next_token_id += 1;
        state.positions.insert(
            token_id,
            MockPosition {
                owner: self.account.unwrap_or_default(),
                token0,
                token1,
                fee,
                range,
                liquidity,
                tokens_owed0: 0,
                tokens_owed1: 0
            }
        );
        token_id
    }

    pub fn set_tokens_owed(&self, token_id: U256, owed0: u128, owed1: u128) {
        if let Some(position) = self.state.lock().positions.get_mut(&token_id) {
            position.tokens_owed0 = owed0;
            position.tokens_owed1 = owed1;
        }
    }

    pub fn insert_order(
        &self,
        owner: Address,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
        min_amount_out: U256
    ) -> U256 {
        let mut state = self.state.lock();
        state.orders.push(ILimitOrderExecutor::Order {
            owner,
            tokenIn: token_in,
            tokenOut: token_out,
            amountIn: amount_in,
            minAmountOut: min_amount_out,
            expiry: U256::MAX,
            status: 0
        });
        U256::from(state.orders.len() - 1)
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Most reads that were ever awaiting the chain at the same time.
    pub fn peak_concurrent_reads(&self) -> usize {
        self.reads_inflight.peak()
    }

    /// Most transactions that were ever awaiting confirmation at the same
    /// time.
    pub fn peak_concurrent_sends(&self) -> usize {
        self.sends_inflight.peak()
    }

    /// Every transaction the wallet submitted, in order.
    pub fn sent_transactions(&self) -> Vec<ContractCall> {
        self.state.lock().sent.clone()
    }

    pub fn allowance_of(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.state
            .lock()
            .allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or_default()
    }

    fn pool_address(token0: Address, token1: Address, fee: u32) -> Address {
        let mut preimage = Vec::with_capacity(44);
        preimage.extend_from_slice(token0.as_slice());
        preimage.extend_from_slice(token1.as_slice());
        preimage.extend_from_slice(&fee.to_be_bytes());
        Address::from_word(keccak256(preimage))
    }
}

fn revert(reason: &str) -> DexClientError {
    DexClientError::Revert { reason: reason.to_string() }
}

fn empty_order() -> ILimitOrderExecutor::Order {
    ILimitOrderExecutor::Order {
        owner:        Address::ZERO,
        tokenIn:      Address::ZERO,
        tokenOut:     Address::ZERO,
        amountIn:     U256::ZERO,
        minAmountOut: U256::ZERO,
        expiry:       U256::ZERO,
        status:       0
    }
}

/// Token amounts `liquidity` is worth over `range`, computed the way the pool
/// does: rounded up when pulled in, down when paid out.
fn pool_amounts(
    sqrt_price: U256,
    range: TickRange,
    liquidity: u128,
    round_up: bool
) -> Result<(U256, U256), DexClientError> {
    let sqrt_a = get_sqrt_ratio_at_tick(range.tick_lower)?;
    let sqrt_b = get_sqrt_ratio_at_tick(range.tick_upper)?;

    Ok(if sqrt_price <= sqrt_a {
        (_get_amount_0_delta(sqrt_a, sqrt_b, liquidity, round_up)?, U256::ZERO)
    } else if sqrt_price < sqrt_b {
        (
            _get_amount_0_delta(sqrt_price, sqrt_b, liquidity, round_up)?,
            _get_amount_1_delta(sqrt_a, sqrt_price, liquidity, round_up)?
        )
    } else {
        (U256::ZERO, _get_amount_1_delta(sqrt_a, sqrt_b, liquidity, round_up)?)
    })
}

fn log<E: SolEvent>(address: Address, event: &E) -> Log {
    Log { address, data: event.encode_log_data() }
}

impl MockState {
    fn pool_for(&self, token0: Address, token1: Address, fee: u32) -> Result<MockPool, DexClientError> {
        self.factory
            .get(&(token0, token1, fee))
            .and_then(|address| self.pools.get(address))
            .copied()
            .ok_or_else(|| revert("pool not initialized"))
    }

    fn spend_allowance(
        &mut self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256
    ) -> Result<(), DexClientError> {
        if amount.is_zero() {
            return Ok(())
        }

        let allowance = self
            .allowances
            .entry((token, owner, spender))
            .or_default();
        if *allowance < amount {
            return Err(revert("STF"))
        }
        if *allowance != U256::MAX {
            *allowance -= amount;
        }
        Ok(())
    }

    /// Liquidity and the amounts actually pulled for a deposit.
    fn deposit(
        &mut self,
        owner: Address,
        spender: Address,
        pool: &MockPool,
        range: TickRange,
        amount0: U256,
        amount1: U256
    ) -> Result<(u128, U256, U256), DexClientError> {
        let sqrt_a = get_sqrt_ratio_at_tick(range.tick_lower)?;
        let sqrt_b = get_sqrt_ratio_at_tick(range.tick_upper)?;
        let sqrt_price = pool.sqrt_price()?;

        let liquidity = liquidity_for_amounts(sqrt_price, sqrt_a, sqrt_b, amount0, amount1)?;
        if liquidity == 0 {
            return Err(revert("liquidity is zero"))
        }
        let (used0, used1) = pool_amounts(sqrt_price, range, liquidity, true)?;

        self.spend_allowance(pool.token0, owner, spender, used0)?;
        self.spend_allowance(pool.token1, owner, spender, used1)?;

        Ok((liquidity, used0, used1))
    }

    fn read_erc20(&self, token: Address, call: IERC20Calls) -> Vec<u8> {
        match call {
            IERC20Calls::balanceOf(call) => {
                let balance = self
                    .balances
                    .get(&(token, call.owner))
                    .copied()
                    .unwrap_or_default();
                IERC20::balanceOfCall::abi_encode_returns(&balance)
            }
            IERC20Calls::allowance(call) => {
                let allowance = self
                    .allowances
                    .get(&(token, call.owner, call.spender))
                    .copied()
                    .unwrap_or_default();
                IERC20::allowanceCall::abi_encode_returns(&allowance)
            }
            IERC20Calls::decimals(_) => {
                let decimals = self.tokens.get(&token).map(|t| t.1).unwrap_or(18);
                IERC20::decimalsCall::abi_encode_returns(&decimals)
            }
            IERC20Calls::symbol(_) => {
                let symbol = self
                    .tokens
                    .get(&token)
                    .map(|t| t.0.clone())
                    .unwrap_or_default();
                IERC20::symbolCall::abi_encode_returns(&symbol)
            }
            IERC20Calls::approve(_) => IERC20::approveCall::abi_encode_returns(&true)
        }
    }

    fn read_pool(&self, pool: &MockPool, call: IUniswapV3PoolCalls) -> Result<Vec<u8>, DexClientError> {
        Ok(match call {
            IUniswapV3PoolCalls::slot0(_) => {
                IUniswapV3Pool::slot0Call::abi_encode_returns(&IUniswapV3Pool::slot0Return {
                    sqrtPriceX96:               pool.sqrt_price()?.to::<U160>(),
                    tick:                       I24::unchecked_from(pool.tick),
                    observationIndex:           0,
                    observationCardinality:     1,
                    observationCardinalityNext: 1,
                    feeProtocol:                0,
                    unlocked:                   true
                })
            }
            IUniswapV3PoolCalls::liquidity(_) => {
                IUniswapV3Pool::liquidityCall::abi_encode_returns(&pool.liquidity)
            }
            IUniswapV3PoolCalls::tickSpacing(_) => IUniswapV3Pool::tickSpacingCall::abi_encode_returns(
                &I24::unchecked_from(pool.tick_spacing)
            ),
            IUniswapV3PoolCalls::fee(_) => {
                IUniswapV3Pool::feeCall::abi_encode_returns(&U24::from(pool.fee))
            }
            IUniswapV3PoolCalls::token0(_) => IUniswapV3Pool::token0Call::abi_encode_returns(&pool.token0),
            IUniswapV3PoolCalls::token1(_) => IUniswapV3Pool::token1Call::abi_encode_returns(&pool.token1)
        })
    }

    fn read_position(&self, token_id: U256) -> Result<Vec<u8>, DexClientError> {
        let position = self
            .positions
            .get(&token_id)
            .ok_or_else(|| revert("Invalid token ID"))?;

        Ok(INonfungiblePositionManager::positionsCall::abi_encode_returns(
            &INonfungiblePositionManager::positionsReturn {
                nonce:                    U96::ZERO,
                operator:                 Address::ZERO,
                token0:                   position.token0,
                token1:                   position.token1,
                fee:                      U24::from(position.fee),
                tickLower:                I24::unchecked_from(position.range.tick_lower),
                tickUpper:                I24::unchecked_from(position.range.tick_upper),
                liquidity:                position.liquidity,
                feeGrowthInside0LastX128: U256::ZERO,
                feeGrowthInside1LastX128: U256::ZERO,
                tokensOwed0:              position.tokens_owed0,
                tokensOwed1:              position.tokens_owed1
            }
        ))
    }

    fn quote(&self, path: &Bytes) -> Result<Vec<u8>, DexClientError> {
        if path.len() != 43 {
            return Err(revert("invalid path"))
        }
        let token_in = Address::from_slice(&path[..20]);
        let fee = u32::from_be_bytes([0, path[20], path[21], path[22]]);
        let token_out = Address::from_slice(&path[23..]);

        let amount_out = self
            .quotes
            .get(&(token_in, token_out, fee))
            .copied()
            .ok_or_else(|| revert("pool not initialized"))?;

        Ok(IQuoterV2::quoteExactInputCall::abi_encode_returns(&IQuoterV2::quoteExactInputReturn {
            amountOut:                  amount_out,
            sqrtPriceX96AfterList:      vec![],
            initializedTicksCrossedList: vec![],
            gasEstimate:                U256::from(100_000)
        }))
    }

    fn read(&self, to: Address, input: &[u8]) -> Result<Vec<u8>, DexClientError> {
        let contracts = UNISWAP_V3_MAINNET;

        if to == contracts.factory {
            let IUniswapV3FactoryCalls::getPool(call) = IUniswapV3FactoryCalls::abi_decode(input)?;
            let (token0, token1) = sort_tokens(call.tokenA, call.tokenB);
            let pool = self
                .factory
                .get(&(token0, token1, call.fee.to::<u32>()))
                .copied()
                .unwrap_or_default();
            return Ok(IUniswapV3Factory::getPoolCall::abi_encode_returns(&pool))
        }

        if let Some(pool) = self.pools.get(&to) {
            return self.read_pool(pool, IUniswapV3PoolCalls::abi_decode(input)?)
        }

        if to == contracts.position_manager {
            return match INonfungiblePositionManagerCalls::abi_decode(input)? {
                INonfungiblePositionManagerCalls::positions(call) => self.read_position(call.tokenId),
                _ => Err(revert("not a view"))
            }
        }

        if to == contracts.quoter {
            let IQuoterV2Calls::quoteExactInput(call) = IQuoterV2Calls::abi_decode(input)?;
            return self.quote(&call.path)
        }

        if to == ORDER_EXECUTOR {
            return match ILimitOrderExecutorCalls::abi_decode(input)? {
                ILimitOrderExecutorCalls::nextOrderId(_) => {
                    Ok(ILimitOrderExecutor::nextOrderIdCall::abi_encode_returns(&U256::from(
                        self.orders.len()
                    )))
                }
                ILimitOrderExecutorCalls::getOrder(call) => {
                    let order = usize::try_from(call.orderId)
                        .ok()
                        .and_then(|id| self.orders.get(id))
                        .cloned()
                        .unwrap_or_else(empty_order);
                    Ok(ILimitOrderExecutor::getOrderCall::abi_encode_returns(&order))
                }
                _ => Err(revert("not a view"))
            }
        }

        Ok(self.read_erc20(to, IERC20Calls::abi_decode(input)?))
    }

    fn execute(&mut self, from: Address, call: &ContractCall) -> Result<Vec<Log>, DexClientError> {
        let contracts = UNISWAP_V3_MAINNET;
        let npm = contracts.position_manager;

        if to_is(call, npm) {
            return match INonfungiblePositionManagerCalls::abi_decode(&call.input)? {
                INonfungiblePositionManagerCalls::mint(call) => {
                    let params = call.params;
                    let pool = self.pool_for(params.token0, params.token1, params.fee.to::<u32>())?;
                    let range = TickRange::new(params.tickLower.as_i32(), params.tickUpper.as_i32());
                    range.validate(pool.tick_spacing)?;

                    let (liquidity, amount0, amount1) =
                        self.deposit(from, npm, &pool, range, params.amount0Desired, params.amount1Desired)?;
                    if amount0 < params.amount0Min || amount1 < params.amount1Min {
                        return Err(revert("Price slippage check"))
                    }

                    let token_id = U256::from(self.next_token_id);
                    self.next_token_id += 1;
                    self.positions.insert(
                        token_id,
                        MockPosition {
                            owner: params.recipient,
                            token0: pool.token0,
                            token1: pool.token1,
                            fee: pool.fee,
                            range,
                            liquidity,
                            tokens_owed0: 0,
                            tokens_owed1: 0
                        }
                    );

                    Ok(vec![log(
                        npm,
                        &INonfungiblePositionManager::IncreaseLiquidity {
                            tokenId: token_id,
                            liquidity,
                            amount0,
                            amount1
                        }
                    )])
                }
                INonfungiblePositionManagerCalls::increaseLiquidity(call) => {
                    let params = call.params;
                    let position = self
                        .positions
                        .get(&params.tokenId)
                        .copied()
                        .ok_or_else(|| revert("Invalid token ID"))?;
                    let pool = self.pool_for(position.token0, position.token1, position.fee)?;

                    let (liquidity, amount0, amount1) = self.deposit(
                        from,
                        npm,
                        &pool,
                        position.range,
                        params.amount0Desired,
                        params.amount1Desired
                    )?;
                    if let Some(position) = self.positions.get_mut(&params.tokenId) {
                        position.liquidity += liquidity;
                    }

                    Ok(vec![log(
                        npm,
                        &INonfungiblePositionManager::IncreaseLiquidity {
                            tokenId: params.tokenId,
                            liquidity,
                            amount0,
                            amount1
                        }
                    )])
                }
                INonfungiblePositionManagerCalls::decreaseLiquidity(call) => {
                    let params = call.params;
                    let position = self
                        .positions
                        .get(&params.tokenId)
                        .copied()
                        .ok_or_else(|| revert("Invalid token ID"))?;
                    if position.owner != from {
                        return Err(revert("Not approved"))
                    }
                    if params.liquidity > position.liquidity {
                        return Err(revert("liquidity exceeds position"))
                    }
                    let pool = self.pool_for(position.token0, position.token1, position.fee)?;
                    let (amount0, amount1) =
                        pool_amounts(pool.sqrt_price()?, position.range, params.liquidity, false)?;

                    if let Some(position) = self.positions.get_mut(&params.tokenId) {
                        position.liquidity -= params.liquidity;
                        position.tokens_owed0 += amount0.saturating_to::<u128>();
                        position.tokens_owed1 += amount1.saturating_to::<u128>();
                    }

                    Ok(vec![log(
                        npm,
                        &INonfungiblePositionManager::DecreaseLiquidity {
                            tokenId: params.tokenId,
                            liquidity: params.liquidity,
                            amount0,
                            amount1
                        }
                    )])
                }
                INonfungiblePositionManagerCalls::collect(call) => {
                    let params = call.params;
                    let position = self
                        .positions
                        .get_mut(&params.tokenId)
                        .ok_or_else(|| revert("Invalid token ID"))?;
                    if position.owner != from {
                        return Err(revert("Not approved"))
                    }

                    let amount0 = position.tokens_owed0.min(params.amount0Max);
                    let amount1 = position.tokens_owed1.min(params.amount1Max);
                    position.tokens_owed0 -= amount0;
                    position.tokens_owed1 -= amount1;

                    Ok(vec![log(
                        npm,
                        &INonfungiblePositionManager::Collect {
                            tokenId:   params.tokenId,
                            recipient: params.recipient,
                            amount0:   U256::from(amount0),
                            amount1:   U256::from(amount1)
                        }
                    )])
                }
                INonfungiblePositionManagerCalls::positions(_) => Ok(vec![])
            }
        }

        if to_is(call, contracts.swap_router) {
            let ISwapRouter02Calls::exactInputSingle(swap) = ISwapRouter02Calls::abi_decode(&call.input)?;
            let params = swap.params;
            self.spend_allowance(params.tokenIn, from, contracts.swap_router, params.amountIn)?;
            return Ok(vec![])
        }

        if to_is(call, ORDER_EXECUTOR) {
            return match ILimitOrderExecutorCalls::abi_decode(&call.input)? {
                ILimitOrderExecutorCalls::depositAndCreateOrder(order) => {
                    self.spend_allowance(order.tokenIn, from, ORDER_EXECUTOR, order.amountIn)?;
                    self.orders.push(ILimitOrderExecutor::Order {
                        owner:        from,
                        tokenIn:      order.tokenIn,
                        tokenOut:     order.tokenOut,
                        amountIn:     order.amountIn,
                        minAmountOut: order.minAmountOut,
                        expiry:       order.expiry,
                        status:       0
                    });

                    Ok(vec![log(
                        ORDER_EXECUTOR,
                        &ILimitOrderExecutor::OrderCreated {
                            orderId:      U256::from(self.orders.len() - 1),
                            owner:        from,
                            tokenIn:      order.tokenIn,
                            tokenOut:     order.tokenOut,
                            amountIn:     order.amountIn,
                            minAmountOut: order.minAmountOut
                        }
                    )])
                }
                ILimitOrderExecutorCalls::cancelOrder(cancel) => {
                    let order = usize::try_from(cancel.orderId)
                        .ok()
                        .and_then(|id| self.orders.get_mut(id))
                        .ok_or_else(|| revert("unknown order"))?;
                    if order.owner != from {
                        return Err(revert("not owner"))
                    }
                    order.status = 2;
                    Ok(vec![])
                }
                _ => Err(revert("not a transaction"))
            }
        }

        match IERC20Calls::abi_decode(&call.input)? {
            IERC20Calls::approve(approve) => {
                self.allowances
                    .insert((call.to, from, approve.spender), approve.amount);
                Ok(vec![])
            }
            _ => Err(revert("not a transaction"))
        }
    }
}

fn to_is(call: &ContractCall, address: Address) -> bool {
    call.to == address
}

#[async_trait]
impl ChainSession for MockChain {
    fn account(&self) -> Option<Address> {
        self.account
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn disconnect(&mut self) {
        self.account = None;
    }

    async fn read_call(&self, to: Address, input: Bytes) -> Result<Bytes, DexClientError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.reads_inflight.enter();
        // a round trip takes at least one scheduler turn
        tokio::task::yield_now().await;

        let result = if input.len() >= 4 && self.failing_reads.contains(&input[..4]) {
            Err(revert("read failed"))
        } else {
            self.state.lock().read(to, &input).map(Bytes::from)
        };

        self.reads_inflight.exit();
        result
    }

    async fn send_transaction(&self, call: ContractCall) -> Result<TxOutcome, DexClientError> {
        let from = self.account.ok_or(DexClientError::NotConnected)?;
        if self.rejected.contains(&call.to) {
            return Err(DexClientError::UserRejected)
        }

        self.sends_inflight.enter();
        // confirmation takes at least one scheduler turn
        tokio::task::yield_now().await;

        let mut state = self.state.lock();
        state.sent.push(call.clone());
        state.tx_count += 1;
        let block_number = state.tx_count;
        let tx_hash = B256::from(U256::from(block_number));

        let outcome = state
            .execute(from, &call)
            .map(|logs| TxOutcome { tx_hash, block_number: Some(block_number), logs });
        drop(state);

        self.sends_inflight.exit();
        outcome
    }
}
