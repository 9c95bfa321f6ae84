//! Provider ledger handlers.
//!
//! This module handles:
//! - Provider registration and fee configuration
//! - Penalty reserve deposits (native and CW20) and withdrawals
//! - Provider level pause

use cosmwasm_std::{Addr, DepsMut, MessageInfo, Response, Uint128};

use crate::error::ContractError;
use crate::fee_manager::validate_fee_rate;
use crate::hash::{bytes32_to_hex, compute_provider_key};
use crate::state::{
    ProviderConfig, ProviderInfo, TokenInfo, CONFIG, GENESIS_TRANSFER_ID, PROVIDERS, TOKENS,
};

use super::settlement::native_coin;

fn load_token(
    deps: &DepsMut,
    remote_chain_id: u64,
    source_token: &str,
    target_token: &str,
) -> Result<TokenInfo, ContractError> {
    TOKENS
        .may_load(deps.storage, (remote_chain_id, source_token, target_token))?
        .ok_or(ContractError::TokenNotRegistered {
            chain_id: remote_chain_id,
            local_token: source_token.to_string(),
            remote_token: target_token.to_string(),
        })
}

// ============================================================================
// Registration
// ============================================================================

/// Register the caller as provider for a token pair, or update its fees.
///
/// Re-registering keeps the penalty reserve, the chain head and the pause flag.
#[allow(clippy::too_many_arguments)]
pub fn execute_register_provider(
    deps: DepsMut,
    info: MessageInfo,
    remote_chain_id: u64,
    source_token: String,
    target_token: String,
    base_fee: Uint128,
    liquidity_fee_rate: u64,
    transfer_limit: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if config.paused {
        return Err(ContractError::BridgePaused);
    }

    validate_fee_rate(liquidity_fee_rate)?;
    load_token(&deps, remote_chain_id, &source_token, &target_token)?;

    let provider_key = compute_provider_key(
        remote_chain_id,
        info.sender.as_str(),
        &source_token,
        &target_token,
    );
    let existing = PROVIDERS.may_load(deps.storage, &provider_key)?;
    let is_new = existing.is_none();

    let provider = match existing {
        Some(mut p) => {
            p.config.base_fee = base_fee;
            p.config.liquidity_fee_rate = liquidity_fee_rate;
            p.config.transfer_limit = transfer_limit;
            p
        }
        None => ProviderInfo {
            provider: info.sender.clone(),
            remote_chain_id,
            source_token: source_token.clone(),
            target_token: target_token.clone(),
            config: ProviderConfig {
                base_fee,
                liquidity_fee_rate,
                transfer_limit,
                paused: false,
            },
            penalty_reserve: Uint128::zero(),
            head_transfer_id: GENESIS_TRANSFER_ID,
        },
    };
    PROVIDERS.save(deps.storage, &provider_key, &provider)?;

    Ok(Response::new()
        .add_attribute("action", "register_provider")
        .add_attribute("provider", info.sender)
        .add_attribute("provider_key", bytes32_to_hex(&provider_key))
        .add_attribute("remote_chain_id", remote_chain_id.to_string())
        .add_attribute("source_token", source_token)
        .add_attribute("target_token", target_token)
        .add_attribute("base_fee", base_fee.to_string())
        .add_attribute("liquidity_fee_rate", liquidity_fee_rate.to_string())
        .add_attribute("transfer_limit", transfer_limit.to_string())
        .add_attribute("new", is_new.to_string()))
}

// ============================================================================
// Penalty Reserve
// ============================================================================

/// Deposit native source tokens into the caller's penalty reserve.
pub fn execute_deposit_penalty_reserve(
    deps: DepsMut,
    info: MessageInfo,
    remote_chain_id: u64,
    source_token: String,
    target_token: String,
) -> Result<Response, ContractError> {
    let token = load_token(&deps, remote_chain_id, &source_token, &target_token)?;
    let denom = native_coin(&token.local_token, Uint128::zero())
        .ok_or(ContractError::TokenMismatch {
            token: source_token.clone(),
        })?
        .denom;

    let amount = match info.funds.as_slice() {
        [coin] if coin.denom == denom && !coin.amount.is_zero() => coin.amount,
        _ => {
            return Err(ContractError::InvalidFunds {
                expected: denom,
                got: info
                    .funds
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(","),
            })
        }
    };

    deposit(deps, info.sender, remote_chain_id, source_token, target_token, amount)
}

/// Deposit CW20 source tokens received through the CW20 `Send` hook.
pub fn execute_deposit_penalty_reserve_cw20(
    deps: DepsMut,
    token: Addr,
    sender: Addr,
    amount: Uint128,
    remote_chain_id: u64,
    target_token: String,
) -> Result<Response, ContractError> {
    let source_token = token.to_string();
    let info = load_token(&deps, remote_chain_id, &source_token, &target_token)?;
    if info.local_token.is_native() {
        return Err(ContractError::TokenMismatch {
            token: source_token,
        });
    }
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: "Deposit must be greater than zero".to_string(),
        });
    }

    deposit(deps, sender, remote_chain_id, source_token, target_token, amount)
}

fn deposit(
    deps: DepsMut,
    provider: Addr,
    remote_chain_id: u64,
    source_token: String,
    target_token: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let provider_key =
        compute_provider_key(remote_chain_id, provider.as_str(), &source_token, &target_token);
    let updated = PROVIDERS.update(
        deps.storage,
        &provider_key,
        |p| -> Result<_, ContractError> {
            let mut p = p.ok_or(ContractError::ProviderNotRegistered)?;
            p.penalty_reserve = p.penalty_reserve.checked_add(amount)?;
            Ok(p)
        },
    )?;

    Ok(Response::new()
        .add_attribute("action", "deposit_penalty_reserve")
        .add_attribute("provider", provider)
        .add_attribute("source_token", source_token)
        .add_attribute("amount", amount.to_string())
        .add_attribute("penalty_reserve", updated.penalty_reserve.to_string()))
}

/// Withdraw unused penalty reserve back to the provider.
pub fn execute_withdraw_penalty_reserve(
    deps: DepsMut,
    info: MessageInfo,
    remote_chain_id: u64,
    source_token: String,
    target_token: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: "Withdrawal must be greater than zero".to_string(),
        });
    }

    let token = load_token(&deps, remote_chain_id, &source_token, &target_token)?;
    let provider_key = compute_provider_key(
        remote_chain_id,
        info.sender.as_str(),
        &source_token,
        &target_token,
    );
    let mut provider = PROVIDERS
        .may_load(deps.storage, &provider_key)?
        .ok_or(ContractError::ProviderNotRegistered)?;

    if provider.penalty_reserve < amount {
        return Err(ContractError::InsufficientPenaltyReserve {
            required: amount,
            available: provider.penalty_reserve,
        });
    }
    provider.penalty_reserve -= amount;
    PROVIDERS.save(deps.storage, &provider_key, &provider)?;

    let msg = token.local_token.transfer_msg(info.sender.as_str(), amount)?;

    Ok(Response::new()
        .add_message(msg)
        .add_attribute("action", "withdraw_penalty_reserve")
        .add_attribute("provider", info.sender)
        .add_attribute("amount", amount.to_string())
        .add_attribute("penalty_reserve", provider.penalty_reserve.to_string()))
}

// ============================================================================
// Provider Pause
// ============================================================================

pub fn execute_set_provider_paused(
    deps: DepsMut,
    info: MessageInfo,
    remote_chain_id: u64,
    source_token: String,
    target_token: String,
    paused: bool,
) -> Result<Response, ContractError> {
    let provider_key = compute_provider_key(
        remote_chain_id,
        info.sender.as_str(),
        &source_token,
        &target_token,
    );
    PROVIDERS.update(
        deps.storage,
        &provider_key,
        |p| -> Result<_, ContractError> {
            let mut p = p.ok_or(ContractError::ProviderNotRegistered)?;
            p.config.paused = paused;
            Ok(p)
        },
    )?;

    Ok(Response::new()
        .add_attribute("action", "set_provider_paused")
        .add_attribute("provider", info.sender)
        .add_attribute("paused", paused.to_string()))
}
