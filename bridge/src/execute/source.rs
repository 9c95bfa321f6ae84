//! Source side handlers: lock, and the inbound settlement calls that release
//! escrow to the provider (withdraw) or to a slasher (slash).

use std::collections::BTreeMap;

use common::AssetInfo;
use cosmwasm_std::{
    from_json, Addr, Binary, CosmosMsg, DepsMut, Env, Event, MessageInfo, Response, Uint128,
};
use cw20::Cw20ReceiveMsg;

use crate::error::ContractError;
use crate::fee_manager::quote_fee;
use crate::hash::{bytes32_to_hex, compute_provider_key, compute_transfer_id, parse_bytes32};
use crate::msg::{LockParams, ReceiveMsg, RemoteCall};
use crate::state::{
    LockRecord, LockStatus, CONFIG, LOCKS, MAX_TIMESTAMP_DRIFT, MESSAGERS, PROVIDERS, TOKENS,
};

// ============================================================================
// Lock
// ============================================================================

/// Lock native tokens: `amount + total_fee` of the source denom must be attached.
pub fn execute_lock_native(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    params: LockParams,
) -> Result<Response, ContractError> {
    let paid = match info.funds.as_slice() {
        [coin] if coin.denom == params.source_token => coin.amount,
        _ => {
            return Err(ContractError::InvalidFunds {
                expected: params.source_token.clone(),
                got: info
                    .funds
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(","),
            })
        }
    };
    lock(deps, env, info.sender, params, paid, true)
}

/// CW20 receive hook. `info.sender` is the token contract.
pub fn execute_receive(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    wrapper: Cw20ReceiveMsg,
) -> Result<Response, ContractError> {
    let sender = deps.api.addr_validate(&wrapper.sender)?;
    match from_json::<ReceiveMsg>(&wrapper.msg)? {
        ReceiveMsg::Lock { params } => {
            execute_lock_cw20(deps, env, info.sender, sender, wrapper.amount, params)
        }
        ReceiveMsg::DepositPenaltyReserve {
            remote_chain_id,
            target_token,
        } => super::provider::execute_deposit_penalty_reserve_cw20(
            deps,
            info.sender,
            sender,
            wrapper.amount,
            remote_chain_id,
            target_token,
        ),
    }
}

/// Lock CW20 tokens received through the CW20 `Send` hook.
pub fn execute_lock_cw20(
    deps: DepsMut,
    env: Env,
    token: Addr,
    sender: Addr,
    amount: Uint128,
    params: LockParams,
) -> Result<Response, ContractError> {
    if token.as_str() != params.source_token {
        return Err(ContractError::TokenMismatch {
            token: token.to_string(),
        });
    }
    lock(deps, env, sender, params, amount, false)
}

/// Escrow a transfer and advance the provider's chain head.
fn lock(
    deps: DepsMut,
    env: Env,
    sender: Addr,
    params: LockParams,
    paid: Uint128,
    paid_native: bool,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if config.paused {
        return Err(ContractError::BridgePaused);
    }

    if params.amount.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: "Amount must be greater than zero".to_string(),
        });
    }

    let now = env.block.time.seconds();
    if params.timestamp.abs_diff(now) > MAX_TIMESTAMP_DRIFT {
        return Err(ContractError::InvalidTimestamp {
            timestamp: params.timestamp,
            now,
        });
    }

    let token = TOKENS
        .may_load(
            deps.storage,
            (
                params.remote_chain_id,
                &params.source_token,
                &params.target_token,
            ),
        )?
        .ok_or(ContractError::TokenNotRegistered {
            chain_id: params.remote_chain_id,
            local_token: params.source_token.clone(),
            remote_token: params.target_token.clone(),
        })?;
    if token.local_token.is_native() != paid_native {
        return Err(ContractError::TokenMismatch {
            token: params.source_token.clone(),
        });
    }

    let provider_key = compute_provider_key(
        params.remote_chain_id,
        &params.provider,
        &params.source_token,
        &params.target_token,
    );
    let mut provider = PROVIDERS
        .may_load(deps.storage, &provider_key)?
        .ok_or(ContractError::ProviderNotRegistered)?;

    if provider.config.paused {
        return Err(ContractError::ProviderPaused);
    }

    if params.amount > provider.config.transfer_limit {
        return Err(ContractError::TransferLimitExceeded {
            limit: provider.config.transfer_limit,
            requested: params.amount,
        });
    }

    let snapshot = parse_bytes32(&params.snapshot)?;
    if snapshot != provider.head_transfer_id {
        return Err(ContractError::StaleSnapshot {
            head: bytes32_to_hex(&provider.head_transfer_id),
            got: bytes32_to_hex(&snapshot),
        });
    }

    let quote = quote_fee(&provider.config, &token, params.amount)?;
    if params.total_fee != quote.total_fee {
        return Err(ContractError::FeeMismatch {
            expected: quote.total_fee,
            got: params.total_fee,
        });
    }

    let required = params.amount.checked_add(quote.total_fee)?;
    if paid != required {
        return Err(ContractError::InvalidFunds {
            expected: format!("{}{}", required, params.source_token),
            got: format!("{}{}", paid, params.source_token),
        });
    }

    if provider.penalty_reserve < quote.penalty {
        return Err(ContractError::InsufficientPenaltyReserve {
            required: quote.penalty,
            available: provider.penalty_reserve,
        });
    }

    let transfer_id = compute_transfer_id(
        config.this_chain_id,
        params.remote_chain_id,
        &snapshot,
        &params.provider,
        &params.source_token,
        &params.target_token,
        &params.receiver,
        params.amount.u128(),
        params.timestamp,
    );

    provider.penalty_reserve -= quote.penalty;
    provider.head_transfer_id = transfer_id;
    PROVIDERS.save(deps.storage, &provider_key, &provider)?;

    let amount_with_fee_and_penalty = params
        .amount
        .checked_add(quote.provider_fee)?
        .checked_add(quote.penalty)?;
    LOCKS.save(
        deps.storage,
        &transfer_id,
        &LockRecord {
            provider: provider.provider.clone(),
            remote_chain_id: params.remote_chain_id,
            source_token: params.source_token.clone(),
            target_token: params.target_token.clone(),
            amount_with_fee_and_penalty,
            penalty: quote.penalty,
            timestamp: params.timestamp,
            status: LockStatus::Locked,
        },
    )?;

    let mut messages: Vec<CosmosMsg> = vec![];
    if !quote.protocol_fee.is_zero() {
        messages.push(
            token
                .local_token
                .transfer_msg(config.fee_collector.as_str(), quote.protocol_fee)?,
        );
    }

    let event = Event::new("lnbridge_transfer_locked")
        .add_attribute("transfer_id", bytes32_to_hex(&transfer_id))
        .add_attribute("source_chain_id", config.this_chain_id.to_string())
        .add_attribute("target_chain_id", params.remote_chain_id.to_string())
        .add_attribute("previous_transfer_id", bytes32_to_hex(&snapshot))
        .add_attribute("provider", params.provider.clone())
        .add_attribute("source_token", params.source_token.clone())
        .add_attribute("target_token", params.target_token.clone())
        .add_attribute("receiver", params.receiver.clone())
        .add_attribute("amount", params.amount.to_string())
        .add_attribute("timestamp", params.timestamp.to_string())
        .add_attribute("fee", quote.total_fee.to_string())
        .add_attribute("penalty", quote.penalty.to_string());

    Ok(Response::new()
        .add_messages(messages)
        .add_event(event)
        .add_attribute("action", "lock")
        .add_attribute("sender", sender)
        .add_attribute("transfer_id", bytes32_to_hex(&transfer_id)))
}

// ============================================================================
// Inbound Settlement
// ============================================================================

/// Entry point for messages delivered by the remote domain's messager.
pub fn execute_receive_message(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    src_chain_id: u64,
    remote_app: String,
    message: Binary,
) -> Result<Response, ContractError> {
    let route = MESSAGERS
        .may_load(deps.storage, src_chain_id)?
        .ok_or(ContractError::MessagerNotConfigured {
            chain_id: src_chain_id,
        })?;
    if info.sender != route.receive_service {
        return Err(ContractError::UnauthorizedMessager {
            chain_id: src_chain_id,
        });
    }

    let response = match from_json::<RemoteCall>(&message)? {
        RemoteCall::WithdrawLiquidity {
            transfer_ids,
            provider,
        } => settle_withdraw(deps, src_chain_id, transfer_ids, provider)?,
        RemoteCall::Slash {
            transfer_id,
            slasher,
        } => settle_slash(deps, src_chain_id, transfer_id, slasher)?,
    };

    Ok(response
        .add_attribute("src_chain_id", src_chain_id.to_string())
        .add_attribute("remote_app", remote_app)
        .add_attribute("block_time", env.block.time.seconds().to_string()))
}

/// Release escrow of relayed transfers to their provider.
///
/// Entries that are not `Locked`, belong to another provider, target another
/// domain, or cannot be parsed are skipped: the batch pays out what is
/// provably owed and ignores the rest.
fn settle_withdraw(
    deps: DepsMut,
    src_chain_id: u64,
    transfer_ids: Vec<Binary>,
    provider: String,
) -> Result<Response, ContractError> {
    let provider_addr = deps.api.addr_validate(&provider)?;

    // token id -> (asset, amount)
    let mut payouts: BTreeMap<String, (AssetInfo, Uint128)> = BTreeMap::new();
    let mut withdrawn: Vec<String> = vec![];
    let mut skipped: Vec<String> = vec![];

    for raw_id in &transfer_ids {
        let Ok(transfer_id) = parse_bytes32(raw_id) else {
            skipped.push(format!("0x{}", hex::encode(raw_id.as_slice())));
            continue;
        };
        let hex_id = bytes32_to_hex(&transfer_id);

        let lock = match LOCKS.may_load(deps.storage, &transfer_id)? {
            Some(lock)
                if lock.status == LockStatus::Locked
                    && lock.provider == provider_addr
                    && lock.remote_chain_id == src_chain_id =>
            {
                lock
            }
            _ => {
                skipped.push(hex_id);
                continue;
            }
        };

        let token = TOKENS.load(
            deps.storage,
            (lock.remote_chain_id, &lock.source_token, &lock.target_token),
        )?;

        // The penalty goes back to the provider's reserve, the rest is paid out
        let provider_key = compute_provider_key(
            lock.remote_chain_id,
            lock.provider.as_str(),
            &lock.source_token,
            &lock.target_token,
        );
        PROVIDERS.update(deps.storage, &provider_key, |p| -> Result<_, ContractError> {
            let mut p = p.ok_or(ContractError::ProviderNotRegistered)?;
            p.penalty_reserve = p.penalty_reserve.checked_add(lock.penalty)?;
            Ok(p)
        })?;

        let amount = lock.amount_with_fee_and_penalty.checked_sub(lock.penalty)?;
        let entry = payouts
            .entry(lock.source_token.clone())
            .or_insert((token.local_token.clone(), Uint128::zero()));
        entry.1 = entry.1.checked_add(amount)?;

        LOCKS.save(
            deps.storage,
            &transfer_id,
            &LockRecord {
                status: LockStatus::Withdrawn,
                ..lock
            },
        )?;
        withdrawn.push(hex_id);
    }

    let mut messages: Vec<CosmosMsg> = vec![];
    let mut event = Event::new("lnbridge_liquidity_withdrawn")
        .add_attribute("provider", provider_addr.to_string());
    if !withdrawn.is_empty() {
        event = event.add_attribute("withdrawn", withdrawn.join(","));
    }
    if !skipped.is_empty() {
        event = event.add_attribute("skipped", skipped.join(","));
    }
    for (token_id, (asset, amount)) in payouts {
        if amount.is_zero() {
            continue;
        }
        messages.push(asset.transfer_msg(provider_addr.as_str(), amount)?);
        event = event.add_attribute(format!("amount_{}", token_id), amount.to_string());
    }

    Ok(Response::new()
        .add_messages(messages)
        .add_event(event)
        .add_attribute("action", "withdraw_liquidity")
        .add_attribute("withdrawn_count", withdrawn.len().to_string())
        .add_attribute("skipped_count", skipped.len().to_string()))
}

/// Release the whole escrow of a slashed transfer to the slasher.
///
/// Replays of an already applied slash (or slashes of transfers that are no
/// longer `Locked`) are ignored so that retried messages stay harmless.
fn settle_slash(
    deps: DepsMut,
    src_chain_id: u64,
    transfer_id: Binary,
    slasher: String,
) -> Result<Response, ContractError> {
    let transfer_id = parse_bytes32(&transfer_id)?;
    let hex_id = bytes32_to_hex(&transfer_id);

    let lock = match LOCKS.may_load(deps.storage, &transfer_id)? {
        Some(lock) if lock.status == LockStatus::Locked && lock.remote_chain_id == src_chain_id => {
            lock
        }
        _ => {
            return Ok(Response::new()
                .add_attribute("action", "slash_ignored")
                .add_attribute("transfer_id", hex_id))
        }
    };

    let slasher_addr = deps.api.addr_validate(&slasher)?;
    let token = TOKENS.load(
        deps.storage,
        (lock.remote_chain_id, &lock.source_token, &lock.target_token),
    )?;
    let payout = token
        .local_token
        .transfer_msg(slasher_addr.as_str(), lock.amount_with_fee_and_penalty)?;

    let event = Event::new("lnbridge_slash_settled")
        .add_attribute("transfer_id", hex_id.clone())
        .add_attribute("provider", lock.provider.to_string())
        .add_attribute("slasher", slasher_addr.to_string())
        .add_attribute("amount", lock.amount_with_fee_and_penalty.to_string());

    LOCKS.save(
        deps.storage,
        &transfer_id,
        &LockRecord {
            status: LockStatus::Slashed,
            ..lock
        },
    )?;

    Ok(Response::new()
        .add_message(payout)
        .add_event(event)
        .add_attribute("action", "slash")
        .add_attribute("transfer_id", hex_id))
}
