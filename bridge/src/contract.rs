//! Liquidity Bridge Contract - Entry Points
//!
//! One instance runs per domain and serves both directions: the source side
//! (lock, inbound settlement) for transfers leaving this domain and the
//! target side (relay, slash, withdraw requests) for transfers arriving here.
//! The implementation is modularized into:
//! - `execute/` - Execute message handlers
//! - `query` - Query message handlers

use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Reply, Response,
    StdResult,
};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::execute::{
    execute_accept_admin, execute_cancel_admin_proposal, execute_deposit_penalty_reserve,
    execute_lock_native, execute_propose_admin, execute_receive, execute_receive_message,
    execute_register_provider, execute_register_token, execute_relay,
    execute_request_slash_and_settle, execute_request_withdraw_liquidity,
    execute_retry_settlement_message, execute_set_fallback_receiver, execute_set_fee_collector,
    execute_set_messager, execute_set_min_slash_delay, execute_set_paused,
    execute_set_provider_paused, execute_update_token, execute_withdraw_penalty_reserve,
    handle_payout_reply, handle_settlement_reply, validate_slash_delay, PAYOUT_REPLY_ID,
    SETTLEMENT_REPLY_ID,
};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query::{
    query_compute_transfer_id, query_config, query_fill_info, query_lock_info,
    query_messager_route, query_pending_admin, query_provider_info, query_provider_key,
    query_quote_fee, query_settlement_message, query_token_info, query_tokens,
};
use crate::state::{Config, CONFIG, CONTRACT_NAME, CONTRACT_VERSION, DEFAULT_MIN_SLASH_DELAY};

// ============================================================================
// Instantiate
// ============================================================================

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

    let min_slash_delay = msg.min_slash_delay.unwrap_or(DEFAULT_MIN_SLASH_DELAY);
    validate_slash_delay(min_slash_delay)?;

    let config = Config {
        admin: deps.api.addr_validate(&msg.admin)?,
        paused: false,
        this_chain_id: msg.this_chain_id,
        native_denom: msg.native_denom,
        fallback_receiver: deps.api.addr_validate(&msg.fallback_receiver)?,
        fee_collector: deps.api.addr_validate(&msg.fee_collector)?,
        min_slash_delay,
    };
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("admin", config.admin)
        .add_attribute("this_chain_id", config.this_chain_id.to_string())
        .add_attribute("min_slash_delay", min_slash_delay.to_string()))
}

// ============================================================================
// Execute
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        // Provider ledger
        ExecuteMsg::RegisterProvider {
            remote_chain_id,
            source_token,
            target_token,
            base_fee,
            liquidity_fee_rate,
            transfer_limit,
        } => execute_register_provider(
            deps,
            info,
            remote_chain_id,
            source_token,
            target_token,
            base_fee,
            liquidity_fee_rate,
            transfer_limit,
        ),
        ExecuteMsg::DepositPenaltyReserve {
            remote_chain_id,
            source_token,
            target_token,
        } => execute_deposit_penalty_reserve(deps, info, remote_chain_id, source_token, target_token),
        ExecuteMsg::WithdrawPenaltyReserve {
            remote_chain_id,
            source_token,
            target_token,
            amount,
        } => execute_withdraw_penalty_reserve(
            deps,
            info,
            remote_chain_id,
            source_token,
            target_token,
            amount,
        ),
        ExecuteMsg::SetProviderPaused {
            remote_chain_id,
            source_token,
            target_token,
            paused,
        } => execute_set_provider_paused(
            deps,
            info,
            remote_chain_id,
            source_token,
            target_token,
            paused,
        ),

        // Source side
        ExecuteMsg::Lock { params } => execute_lock_native(deps, env, info, params),
        ExecuteMsg::Receive(cw20_msg) => execute_receive(deps, env, info, cw20_msg),
        ExecuteMsg::ReceiveMessage {
            src_chain_id,
            remote_app,
            message,
        } => execute_receive_message(deps, env, info, src_chain_id, remote_app, message),

        // Target side
        ExecuteMsg::Relay {
            params,
            expected_transfer_id,
        } => execute_relay(deps, env, info, params, expected_transfer_id),
        ExecuteMsg::RequestSlashAndSettle {
            params,
            expected_transfer_id,
            fee_prepaid,
            extra,
        } => execute_request_slash_and_settle(
            deps,
            env,
            info,
            params,
            expected_transfer_id,
            fee_prepaid,
            extra,
        ),
        ExecuteMsg::RetrySettlementMessage {
            transfer_id,
            fee_prepaid,
            extra,
        } => execute_retry_settlement_message(deps, env, info, transfer_id, fee_prepaid, extra),
        ExecuteMsg::RequestWithdrawLiquidity {
            remote_chain_id,
            transfer_ids,
            provider,
            fee_prepaid,
            extra,
        } => execute_request_withdraw_liquidity(
            deps,
            env,
            info,
            remote_chain_id,
            transfer_ids,
            provider,
            fee_prepaid,
            extra,
        ),

        // Governance
        ExecuteMsg::RegisterToken {
            remote_chain_id,
            local_token,
            remote_token,
            local_decimals,
            remote_decimals,
            protocol_fee,
            penalty,
        } => execute_register_token(
            deps,
            info,
            remote_chain_id,
            local_token,
            remote_token,
            local_decimals,
            remote_decimals,
            protocol_fee,
            penalty,
        ),
        ExecuteMsg::UpdateToken {
            remote_chain_id,
            local_token,
            remote_token,
            protocol_fee,
            penalty,
        } => execute_update_token(
            deps,
            info,
            remote_chain_id,
            local_token,
            remote_token,
            protocol_fee,
            penalty,
        ),
        ExecuteMsg::SetMessager {
            remote_chain_id,
            send_service,
            receive_service,
        } => execute_set_messager(deps, info, remote_chain_id, send_service, receive_service),
        ExecuteMsg::SetMinSlashDelay { delay_seconds } => {
            execute_set_min_slash_delay(deps, info, delay_seconds)
        }
        ExecuteMsg::SetFallbackReceiver { address } => {
            execute_set_fallback_receiver(deps, info, address)
        }
        ExecuteMsg::SetFeeCollector { address } => execute_set_fee_collector(deps, info, address),

        // Admin
        ExecuteMsg::Pause {} => execute_set_paused(deps, info, true),
        ExecuteMsg::Unpause {} => execute_set_paused(deps, info, false),
        ExecuteMsg::ProposeAdmin { new_admin } => execute_propose_admin(deps, env, info, new_admin),
        ExecuteMsg::AcceptAdmin {} => execute_accept_admin(deps, env, info),
        ExecuteMsg::CancelAdminProposal {} => execute_cancel_admin_proposal(deps, info),
    }
}

// ============================================================================
// Reply
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        PAYOUT_REPLY_ID => handle_payout_reply(deps, msg),
        SETTLEMENT_REPLY_ID => handle_settlement_reply(deps, env, msg),
        id => Err(ContractError::UnknownReplyId { id }),
    }
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::PendingAdmin {} => to_json_binary(&query_pending_admin(deps)?),
        QueryMsg::MessagerRoute { remote_chain_id } => {
            to_json_binary(&query_messager_route(deps, remote_chain_id)?)
        }
        QueryMsg::TokenInfo {
            remote_chain_id,
            local_token,
            remote_token,
        } => to_json_binary(&query_token_info(
            deps,
            remote_chain_id,
            local_token,
            remote_token,
        )?),
        QueryMsg::Tokens { start_after, limit } => {
            to_json_binary(&query_tokens(deps, start_after, limit)?)
        }
        QueryMsg::ProviderInfo {
            remote_chain_id,
            provider,
            source_token,
            target_token,
        } => to_json_binary(&query_provider_info(
            deps,
            remote_chain_id,
            provider,
            source_token,
            target_token,
        )?),
        QueryMsg::ProviderKey {
            remote_chain_id,
            provider,
            source_token,
            target_token,
        } => to_json_binary(&query_provider_key(
            remote_chain_id,
            provider,
            source_token,
            target_token,
        )),
        QueryMsg::QuoteFee {
            remote_chain_id,
            provider,
            source_token,
            target_token,
            amount,
        } => to_json_binary(&query_quote_fee(
            deps,
            remote_chain_id,
            provider,
            source_token,
            target_token,
            amount,
        )?),
        QueryMsg::ComputeTransferId { params } => {
            to_json_binary(&query_compute_transfer_id(params)?)
        }
        QueryMsg::LockInfo { transfer_id } => to_json_binary(&query_lock_info(deps, transfer_id)?),
        QueryMsg::FillInfo { transfer_id } => to_json_binary(&query_fill_info(deps, transfer_id)?),
        QueryMsg::SettlementMessage { transfer_id } => {
            to_json_binary(&query_settlement_message(deps, transfer_id)?)
        }
    }
}

// ============================================================================
// Migrate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(Response::new()
        .add_attribute("method", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}
