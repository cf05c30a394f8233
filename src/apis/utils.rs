use alloy_primitives::Address;
use alloy_sol_types::SolCall;

use crate::{
    providers::ChainSession,
    types::{ContractCall, TxOutcome, errors::DexClientError}
};

pub(crate) async fn view_call<S, IC>(
    session: &S,
    contract: Address,
    call: IC
) -> Result<IC::Return, DexClientError>
where
    S: ChainSession + ?Sized,
    IC: SolCall + Send
{
    let data = session
        .read_call(contract, call.abi_encode().into())
        .await?;
    Ok(IC::abi_decode_returns(&data)?)
}

pub(crate) async fn send_call<S, IC>(
    session: &S,
    contract: Address,
    call: IC
) -> Result<TxOutcome, DexClientError>
where
    S: ChainSession + ?Sized,
    IC: SolCall + Send
{
    session
        .send_transaction(ContractCall::new(contract, &call))
        .await
}
