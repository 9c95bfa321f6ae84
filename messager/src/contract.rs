//! Messager Contract - Entry Points
//!
//! Carries opaque application payloads between domains. Outbound messages are
//! priced by the configured transport and queued in an outbox; the transport's
//! delivery endpoint hands inbound messages to the paired application.

use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult,
    Uint128,
};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::execute::{
    execute_deliver_message, execute_send_message, execute_set_endpoint,
    execute_set_remote_app, execute_set_remote_messager, execute_set_transport,
    execute_set_whitelist, execute_transfer_ownership, execute_withdraw_fees,
};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query::{
    query_config, query_is_delivered, query_is_whitelisted, query_outbound_message,
    query_outbound_messages, query_quote_fee, query_remote_app, query_remote_messager,
};
use crate::state::{Config, COLLECTED_FEES, CONFIG, CONTRACT_NAME, CONTRACT_VERSION, NEXT_NONCE};
use crate::transport::TransportAdapter;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if msg.this_chain_id == 0 {
        return Err(ContractError::InvalidChainId { chain_id: 0 });
    }

    let config = Config {
        owner: deps.api.addr_validate(&msg.owner)?,
        this_chain_id: msg.this_chain_id,
        endpoint: deps.api.addr_validate(&msg.endpoint)?,
        transport: msg.transport,
        fee_denom: msg.fee_denom,
    };
    CONFIG.save(deps.storage, &config)?;
    NEXT_NONCE.save(deps.storage, &0u64)?;
    COLLECTED_FEES.save(deps.storage, &Uint128::zero())?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("owner", config.owner)
        .add_attribute("this_chain_id", config.this_chain_id.to_string())
        .add_attribute("transport", config.transport.name()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::SendMessage {
            remote_chain_id,
            message,
            extra,
        } => execute_send_message(deps, env, info, remote_chain_id, message, extra),
        ExecuteMsg::DeliverMessage {
            src_chain_id,
            nonce,
            from_messager,
            from_app,
            to_app,
            message,
        } => execute_deliver_message(
            deps,
            env,
            info,
            src_chain_id,
            nonce,
            from_messager,
            from_app,
            to_app,
            message,
        ),
        ExecuteMsg::SetWhitelist { app, allowed } => {
            execute_set_whitelist(deps, info, app, allowed)
        }
        ExecuteMsg::SetRemoteMessager {
            remote_chain_id,
            messager,
        } => execute_set_remote_messager(deps, info, remote_chain_id, messager),
        ExecuteMsg::SetRemoteApp {
            app,
            remote_chain_id,
            remote_app,
        } => execute_set_remote_app(deps, info, app, remote_chain_id, remote_app),
        ExecuteMsg::SetTransport { transport } => execute_set_transport(deps, info, transport),
        ExecuteMsg::SetEndpoint { endpoint } => execute_set_endpoint(deps, info, endpoint),
        ExecuteMsg::WithdrawFees { recipient, amount } => {
            execute_withdraw_fees(deps, info, recipient, amount)
        }
        ExecuteMsg::TransferOwnership { new_owner } => {
            execute_transfer_ownership(deps, info, new_owner)
        }
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::OutboundMessage { nonce } => to_json_binary(&query_outbound_message(deps, nonce)?),
        QueryMsg::OutboundMessages { start_after, limit } => {
            to_json_binary(&query_outbound_messages(deps, start_after, limit)?)
        }
        QueryMsg::IsDelivered {
            src_chain_id,
            nonce,
        } => to_json_binary(&query_is_delivered(deps, src_chain_id, nonce)),
        QueryMsg::QuoteFee { message, extra } => {
            to_json_binary(&query_quote_fee(deps, message, extra)?)
        }
        QueryMsg::RemoteMessager { remote_chain_id } => {
            to_json_binary(&query_remote_messager(deps, remote_chain_id)?)
        }
        QueryMsg::RemoteApp {
            app,
            remote_chain_id,
        } => to_json_binary(&query_remote_app(deps, app, remote_chain_id)?),
        QueryMsg::IsWhitelisted { app } => to_json_binary(&query_is_whitelisted(deps, app)?),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(Response::new().add_attribute("method", "migrate"))
}
