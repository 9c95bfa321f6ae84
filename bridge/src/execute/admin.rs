//! Admin role handlers: bridge pause and the timelocked admin hand-over.

use cosmwasm_std::{DepsMut, Env, Event, MessageInfo, Response};

use crate::error::ContractError;
use crate::state::{Config, PendingAdmin, ADMIN_TIMELOCK_DURATION, CONFIG, PENDING_ADMIN};

/// Load the config, failing unless `info.sender` is the admin.
pub(crate) fn load_config_as_admin(
    deps: &DepsMut,
    info: &MessageInfo,
) -> Result<Config, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized);
    }
    Ok(config)
}

// ============================================================================
// Pause
// ============================================================================

/// Stop new locks and provider registrations. Settlement keeps running so
/// that funds already in flight can always be released.
pub fn execute_set_paused(
    deps: DepsMut,
    info: MessageInfo,
    paused: bool,
) -> Result<Response, ContractError> {
    let mut config = load_config_as_admin(&deps, &info)?;
    config.paused = paused;
    CONFIG.save(deps.storage, &config)?;

    let method = if paused { "pause" } else { "unpause" };
    Ok(Response::new()
        .add_event(Event::new("lnbridge_paused").add_attribute("paused", paused.to_string()))
        .add_attribute("method", method))
}

// ============================================================================
// Admin Transfer
// ============================================================================

/// Propose a new admin; it may accept once the timelock has passed.
pub fn execute_propose_admin(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    new_admin: String,
) -> Result<Response, ContractError> {
    load_config_as_admin(&deps, &info)?;

    let pending = PendingAdmin {
        new_address: deps.api.addr_validate(&new_admin)?,
        execute_after: env.block.time.plus_seconds(ADMIN_TIMELOCK_DURATION),
    };
    PENDING_ADMIN.save(deps.storage, &pending)?;

    Ok(Response::new()
        .add_attribute("method", "propose_admin")
        .add_attribute("new_admin", pending.new_address)
        .add_attribute("execute_after", pending.execute_after.seconds().to_string()))
}

pub fn execute_accept_admin(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let pending = PENDING_ADMIN
        .may_load(deps.storage)?
        .ok_or(ContractError::NoPendingAdmin)?;

    if info.sender != pending.new_address {
        return Err(ContractError::UnauthorizedPendingAdmin);
    }

    let now = env.block.time.seconds();
    let ready_at = pending.execute_after.seconds();
    if now < ready_at {
        return Err(ContractError::TimelockNotExpired {
            remaining_seconds: ready_at - now,
        });
    }

    CONFIG.update(deps.storage, |mut config| -> Result<_, ContractError> {
        config.admin = pending.new_address.clone();
        Ok(config)
    })?;
    PENDING_ADMIN.remove(deps.storage);

    Ok(Response::new()
        .add_attribute("method", "accept_admin")
        .add_attribute("new_admin", pending.new_address))
}

pub fn execute_cancel_admin_proposal(
    deps: DepsMut,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    load_config_as_admin(&deps, &info)?;
    if !PENDING_ADMIN.exists(deps.storage) {
        return Err(ContractError::NoPendingAdmin);
    }
    PENDING_ADMIN.remove(deps.storage);

    Ok(Response::new().add_attribute("method", "cancel_admin_proposal"))
}
