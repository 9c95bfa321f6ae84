//! Target side handlers.
//!
//! A transfer settles exactly once, either by the provider's relay or by a
//! slasher after the slash delay. Settlement follows each provider's hash
//! chain in order: a transfer is only accepted once its predecessor is
//! settled.

use cosmwasm_std::{Binary, Coin, DepsMut, Env, Event, MessageInfo, Response, Uint128};

use crate::error::ContractError;
use crate::fee_manager::convert_decimals;
use crate::hash::{bytes32_to_hex, parse_bytes32, transfer_id_of};
use crate::msg::{RemoteCall, TransferParams};
use crate::state::{
    Config, FillRecord, FillStatus, SettlementKind, TokenInfo, CONFIG, FILLS, GENESIS_TRANSFER_ID,
    MAX_WITHDRAW_BATCH, TOKENS,
};

use super::settlement::{build_payout, dispatch_settlement, expect_funds, native_coin, Dispatch};

/// A transfer that passed every check and may be settled now.
struct Settleable {
    transfer_id: [u8; 32],
    token: TokenInfo,
    payout: Uint128,
}

/// Checks shared by relay and slash.
fn validate_settleable(
    deps: &DepsMut,
    config: &Config,
    params: &TransferParams,
    expected_transfer_id: &Binary,
) -> Result<Settleable, ContractError> {
    if params.target_chain_id != config.this_chain_id {
        return Err(ContractError::InvalidChainId {
            chain_id: params.target_chain_id,
        });
    }

    let expected = parse_bytes32(expected_transfer_id)?;
    let transfer_id = transfer_id_of(params)?;
    if transfer_id != expected {
        return Err(ContractError::TransferIdMismatch {
            computed: bytes32_to_hex(&transfer_id),
            expected: bytes32_to_hex(&expected),
        });
    }

    if FILLS.has(deps.storage, &transfer_id) {
        return Err(ContractError::AlreadySettled {
            transfer_id: bytes32_to_hex(&transfer_id),
        });
    }

    let previous = parse_bytes32(&params.previous_transfer_id)?;
    if previous != GENESIS_TRANSFER_ID && !FILLS.has(deps.storage, &previous) {
        return Err(ContractError::PredecessorUnsettled {
            previous: bytes32_to_hex(&previous),
        });
    }

    if params.amount.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: "Amount must be greater than zero".to_string(),
        });
    }

    // Keyed from this domain's point of view: local token is the target token
    let token = TOKENS
        .may_load(
            deps.storage,
            (
                params.source_chain_id,
                params.target_token.as_str(),
                params.source_token.as_str(),
            ),
        )?
        .ok_or(ContractError::TokenNotRegistered {
            chain_id: params.source_chain_id,
            local_token: params.target_token.clone(),
            remote_token: params.source_token.clone(),
        })?;

    let payout = convert_decimals(params.amount, token.remote_decimals, token.local_decimals)?;
    if payout.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: "Amount rounds to zero on this chain".to_string(),
        });
    }

    Ok(Settleable {
        transfer_id,
        token,
        payout,
    })
}

fn filled_event(
    kind: &str,
    transfer_id: &[u8; 32],
    params: &TransferParams,
    by: &str,
    recipient: &str,
    payout: Uint128,
    used_fallback: bool,
) -> Event {
    Event::new(kind)
        .add_attribute("transfer_id", bytes32_to_hex(transfer_id))
        .add_attribute("source_chain_id", params.source_chain_id.to_string())
        .add_attribute("provider", params.provider.clone())
        .add_attribute("by", by)
        .add_attribute("receiver", params.receiver.clone())
        .add_attribute("recipient", recipient)
        .add_attribute("amount", payout.to_string())
        .add_attribute("fallback", used_fallback.to_string())
}

// ============================================================================
// Relay
// ============================================================================

/// Provider pays the receiver out of its own funds and marks the transfer filled.
pub fn execute_relay(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    params: TransferParams,
    expected_transfer_id: Binary,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let settleable = validate_settleable(&deps, &config, &params, &expected_transfer_id)?;

    let provider = deps.api.addr_validate(&params.provider)?;
    if info.sender != provider {
        return Err(ContractError::NotProvider {
            provider: params.provider.clone(),
        });
    }

    let expected_funds: Vec<Coin> = native_coin(&settleable.token.local_token, settleable.payout)
        .into_iter()
        .collect();
    expect_funds(&info.funds, &expected_funds)?;

    FILLS.save(
        deps.storage,
        &settleable.transfer_id,
        &FillRecord {
            status: FillStatus::Filled,
            by: info.sender.clone(),
            provider: params.provider.clone(),
            source_chain_id: params.source_chain_id,
            settled_at: env.block.time.seconds(),
        },
    )?;

    let (payout_msg, recipient, used_fallback) = build_payout(
        deps.storage,
        deps.api,
        &config,
        &settleable.transfer_id,
        &settleable.token.local_token,
        &info.sender,
        &params.receiver,
        settleable.payout,
    )?;

    let event = filled_event(
        "lnbridge_transfer_filled",
        &settleable.transfer_id,
        &params,
        info.sender.as_str(),
        recipient.as_str(),
        settleable.payout,
        used_fallback,
    );

    Ok(Response::new()
        .add_submessage(payout_msg)
        .add_event(event)
        .add_attribute("action", "relay")
        .add_attribute("transfer_id", bytes32_to_hex(&settleable.transfer_id)))
}

// ============================================================================
// Slash
// ============================================================================

/// After the slash delay, anyone pays the receiver in the provider's place
/// and claims the source side escrow through a settlement message.
pub fn execute_request_slash_and_settle(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    params: TransferParams,
    expected_transfer_id: Binary,
    fee_prepaid: Uint128,
    extra: Option<Binary>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    // Settled transfers fail AlreadySettled whatever the delay
    let settleable = validate_settleable(&deps, &config, &params, &expected_transfer_id)?;

    let now = env.block.time.seconds();
    let slashable_at = params.timestamp.saturating_add(config.min_slash_delay);
    if now < slashable_at {
        return Err(ContractError::TooEarly {
            remaining_seconds: slashable_at - now,
        });
    }

    let mut expected_funds: Vec<Coin> =
        native_coin(&settleable.token.local_token, settleable.payout)
            .into_iter()
            .collect();
    expected_funds.extend(fee_coins(&config, fee_prepaid));
    expect_funds(&info.funds, &expected_funds)?;

    FILLS.save(
        deps.storage,
        &settleable.transfer_id,
        &FillRecord {
            status: FillStatus::Slashed,
            by: info.sender.clone(),
            provider: params.provider.clone(),
            source_chain_id: params.source_chain_id,
            settled_at: now,
        },
    )?;

    let (payout_msg, recipient, used_fallback) = build_payout(
        deps.storage,
        deps.api,
        &config,
        &settleable.transfer_id,
        &settleable.token.local_token,
        &info.sender,
        &params.receiver,
        settleable.payout,
    )?;

    let dispatch_msg = dispatch_settlement(
        deps.storage,
        &env,
        &config,
        Dispatch {
            remote_chain_id: params.source_chain_id,
            call: RemoteCall::Slash {
                transfer_id: Binary::from(settleable.transfer_id.to_vec()),
                slasher: info.sender.to_string(),
            },
            kind: SettlementKind::Slash,
            transfer_ids: vec![settleable.transfer_id],
            fee_prepaid,
            extra,
            caller: &info.sender,
        },
    )?;

    let event = filled_event(
        "lnbridge_transfer_slashed",
        &settleable.transfer_id,
        &params,
        info.sender.as_str(),
        recipient.as_str(),
        settleable.payout,
        used_fallback,
    );

    Ok(Response::new()
        .add_submessage(payout_msg)
        .add_submessage(dispatch_msg)
        .add_event(event)
        .add_attribute("action", "request_slash_and_settle")
        .add_attribute("transfer_id", bytes32_to_hex(&settleable.transfer_id)))
}

// ============================================================================
// Settlement Messages
// ============================================================================

/// Re-send the settlement message of a settled transfer.
///
/// Idempotency is enforced on the receiving side, so this may be called any
/// number of times.
pub fn execute_retry_settlement_message(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    transfer_id: Binary,
    fee_prepaid: Uint128,
    extra: Option<Binary>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let transfer_id = parse_bytes32(&transfer_id)?;

    let fill = FILLS
        .may_load(deps.storage, &transfer_id)?
        .ok_or(ContractError::NotSettled {
            transfer_id: bytes32_to_hex(&transfer_id),
        })?;

    expect_funds(&info.funds, &fee_coins(&config, fee_prepaid))?;

    let (call, kind) = match fill.status {
        FillStatus::Slashed => (
            RemoteCall::Slash {
                transfer_id: Binary::from(transfer_id.to_vec()),
                slasher: fill.by.to_string(),
            },
            SettlementKind::Slash,
        ),
        FillStatus::Filled => (
            RemoteCall::WithdrawLiquidity {
                transfer_ids: vec![Binary::from(transfer_id.to_vec())],
                provider: fill.by.to_string(),
            },
            SettlementKind::WithdrawLiquidity,
        ),
    };

    let msg = dispatch_settlement(
        deps.storage,
        &env,
        &config,
        Dispatch {
            remote_chain_id: fill.source_chain_id,
            call,
            kind,
            transfer_ids: vec![transfer_id],
            fee_prepaid,
            extra,
            caller: &info.sender,
        },
    )?;

    Ok(Response::new()
        .add_submessage(msg)
        .add_attribute("action", "retry_settlement_message")
        .add_attribute("transfer_id", bytes32_to_hex(&transfer_id))
        .add_attribute("remote_chain_id", fill.source_chain_id.to_string()))
}

/// Ask the source domain to release the escrow of transfers the caller relayed.
#[allow(clippy::too_many_arguments)]
pub fn execute_request_withdraw_liquidity(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    remote_chain_id: u64,
    transfer_ids: Vec<Binary>,
    provider: String,
    fee_prepaid: Uint128,
    extra: Option<Binary>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    let provider_addr = deps.api.addr_validate(&provider)?;
    if info.sender != provider_addr {
        return Err(ContractError::NotProvider { provider });
    }

    if transfer_ids.is_empty() || transfer_ids.len() > MAX_WITHDRAW_BATCH {
        return Err(ContractError::InvalidBatchSize {
            max: MAX_WITHDRAW_BATCH,
        });
    }

    let mut ids: Vec<[u8; 32]> = Vec::with_capacity(transfer_ids.len());
    for raw_id in &transfer_ids {
        let transfer_id = parse_bytes32(raw_id)?;
        match FILLS.may_load(deps.storage, &transfer_id)? {
            Some(fill)
                if fill.status == FillStatus::Filled
                    && fill.by == provider_addr
                    && fill.source_chain_id == remote_chain_id => {}
            _ => {
                return Err(ContractError::NotFilledByProvider {
                    transfer_id: bytes32_to_hex(&transfer_id),
                    provider,
                })
            }
        }
        ids.push(transfer_id);
    }

    expect_funds(&info.funds, &fee_coins(&config, fee_prepaid))?;

    let msg = dispatch_settlement(
        deps.storage,
        &env,
        &config,
        Dispatch {
            remote_chain_id,
            call: RemoteCall::WithdrawLiquidity {
                transfer_ids: ids.iter().map(|id| Binary::from(id.to_vec())).collect(),
                provider: provider_addr.to_string(),
            },
            kind: SettlementKind::WithdrawLiquidity,
            transfer_ids: ids.clone(),
            fee_prepaid,
            extra,
            caller: &info.sender,
        },
    )?;

    Ok(Response::new()
        .add_submessage(msg)
        .add_attribute("action", "request_withdraw_liquidity")
        .add_attribute("provider", provider_addr)
        .add_attribute("remote_chain_id", remote_chain_id.to_string())
        .add_attribute("count", ids.len().to_string()))
}

fn fee_coins(config: &Config, fee_prepaid: Uint128) -> Vec<Coin> {
    if fee_prepaid.is_zero() {
        return vec![];
    }
    vec![Coin {
        denom: config.native_denom.clone(),
        amount: fee_prepaid,
    }]
}
