//! Governance handlers for the token registry, messager routes and bridge
//! parameters. All of them are admin only.

use common::AssetInfo;
use cosmwasm_std::{DepsMut, MessageInfo, Response, Uint128};

use crate::error::ContractError;
use crate::state::{
    MessagerRoute, TokenInfo, CONFIG, MESSAGERS, MIN_SLASH_DELAY_LOWER_BOUND,
    MIN_SLASH_DELAY_UPPER_BOUND, TOKENS,
};

use super::admin::load_config_as_admin;

// ============================================================================
// Token Registry
// ============================================================================

/// Register a token pair (local token on this domain, its counterpart on the
/// remote domain). Re-registering overwrites the pair.
#[allow(clippy::too_many_arguments)]
pub fn execute_register_token(
    deps: DepsMut,
    info: MessageInfo,
    remote_chain_id: u64,
    local_token: AssetInfo,
    remote_token: String,
    local_decimals: u8,
    remote_decimals: u8,
    protocol_fee: Uint128,
    penalty: Uint128,
) -> Result<Response, ContractError> {
    let config = load_config_as_admin(&deps, &info)?;

    if remote_chain_id == 0 || remote_chain_id == config.this_chain_id {
        return Err(ContractError::InvalidChainId {
            chain_id: remote_chain_id,
        });
    }
    // Normalize CW20 addresses so storage keys match what users submit
    let local_token = match local_token {
        AssetInfo::Cw20 { contract_addr } => {
            AssetInfo::cw20(deps.api.addr_validate(contract_addr.as_str())?)
        }
        native => native,
    };

    let local_id = local_token.id();
    TOKENS.save(
        deps.storage,
        (remote_chain_id, &local_id, &remote_token),
        &TokenInfo {
            remote_chain_id,
            local_token,
            remote_token: remote_token.clone(),
            local_decimals,
            remote_decimals,
            protocol_fee,
            penalty,
        },
    )?;

    Ok(Response::new()
        .add_attribute("method", "register_token")
        .add_attribute("remote_chain_id", remote_chain_id.to_string())
        .add_attribute("local_token", local_id)
        .add_attribute("remote_token", remote_token)
        .add_attribute("protocol_fee", protocol_fee.to_string())
        .add_attribute("penalty", penalty.to_string()))
}

/// Update the protocol fee and penalty of a registered pair. Applies to
/// locks made after the update; existing locks keep their recorded penalty.
pub fn execute_update_token(
    deps: DepsMut,
    info: MessageInfo,
    remote_chain_id: u64,
    local_token: String,
    remote_token: String,
    protocol_fee: Uint128,
    penalty: Uint128,
) -> Result<Response, ContractError> {
    load_config_as_admin(&deps, &info)?;

    TOKENS.update(
        deps.storage,
        (remote_chain_id, &local_token, &remote_token),
        |token| -> Result<_, ContractError> {
            let mut token = token.ok_or(ContractError::TokenNotRegistered {
                chain_id: remote_chain_id,
                local_token: local_token.clone(),
                remote_token: remote_token.clone(),
            })?;
            token.protocol_fee = protocol_fee;
            token.penalty = penalty;
            Ok(token)
        },
    )?;

    Ok(Response::new()
        .add_attribute("method", "update_token")
        .add_attribute("remote_chain_id", remote_chain_id.to_string())
        .add_attribute("local_token", local_token)
        .add_attribute("protocol_fee", protocol_fee.to_string())
        .add_attribute("penalty", penalty.to_string()))
}

// ============================================================================
// Messager Routes
// ============================================================================

/// Set the messager pair used for a remote domain: `send_service` carries
/// outbound settlement, `receive_service` is the only caller allowed to
/// deliver inbound settlement.
pub fn execute_set_messager(
    deps: DepsMut,
    info: MessageInfo,
    remote_chain_id: u64,
    send_service: String,
    receive_service: String,
) -> Result<Response, ContractError> {
    let config = load_config_as_admin(&deps, &info)?;
    if remote_chain_id == 0 || remote_chain_id == config.this_chain_id {
        return Err(ContractError::InvalidChainId {
            chain_id: remote_chain_id,
        });
    }

    let route = MessagerRoute {
        send_service: deps.api.addr_validate(&send_service)?,
        receive_service: deps.api.addr_validate(&receive_service)?,
    };
    MESSAGERS.save(deps.storage, remote_chain_id, &route)?;

    Ok(Response::new()
        .add_attribute("method", "set_messager")
        .add_attribute("remote_chain_id", remote_chain_id.to_string())
        .add_attribute("send_service", route.send_service)
        .add_attribute("receive_service", route.receive_service))
}

// ============================================================================
// Parameters
// ============================================================================

pub fn validate_slash_delay(delay_seconds: u64) -> Result<(), ContractError> {
    if !(MIN_SLASH_DELAY_LOWER_BOUND..=MIN_SLASH_DELAY_UPPER_BOUND).contains(&delay_seconds) {
        return Err(ContractError::InvalidSlashDelay {
            min: MIN_SLASH_DELAY_LOWER_BOUND,
            max: MIN_SLASH_DELAY_UPPER_BOUND,
        });
    }
    Ok(())
}

pub fn execute_set_min_slash_delay(
    deps: DepsMut,
    info: MessageInfo,
    delay_seconds: u64,
) -> Result<Response, ContractError> {
    let mut config = load_config_as_admin(&deps, &info)?;
    validate_slash_delay(delay_seconds)?;

    let old_delay = config.min_slash_delay;
    config.min_slash_delay = delay_seconds;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "set_min_slash_delay")
        .add_attribute("old_delay", old_delay.to_string())
        .add_attribute("new_delay", delay_seconds.to_string()))
}

pub fn execute_set_fallback_receiver(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    let mut config = load_config_as_admin(&deps, &info)?;
    config.fallback_receiver = deps.api.addr_validate(&address)?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "set_fallback_receiver")
        .add_attribute("fallback_receiver", address))
}

pub fn execute_set_fee_collector(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    let mut config = load_config_as_admin(&deps, &info)?;
    config.fee_collector = deps.api.addr_validate(&address)?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "set_fee_collector")
        .add_attribute("fee_collector", address))
}
