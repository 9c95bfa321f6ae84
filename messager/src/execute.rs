//! Execute handlers for the messager contract.

use common::{MessageExtra, ReceiverExecuteMsg};
use cosmwasm_std::{
    to_json_binary, Addr, BankMsg, Binary, Coin, CosmosMsg, DepsMut, Env, Event, MessageInfo,
    Response, Uint128, WasmMsg,
};

use crate::error::ContractError;
use crate::state::{
    Config, OutboundMessage, COLLECTED_FEES, CONFIG, DELIVERED, NEXT_NONCE, OUTBOX, REMOTE_APPS,
    REMOTE_MESSAGERS, WHITELIST,
};
use crate::transport::{Transport, TransportAdapter};

fn load_config_as_owner(deps: &DepsMut, info: &MessageInfo) -> Result<Config, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.owner {
        return Err(ContractError::Unauthorized);
    }
    Ok(config)
}

/// Amount of `denom` attached; any other denom is rejected.
fn paid_in(info: &MessageInfo, denom: &str) -> Result<Uint128, ContractError> {
    let mut paid = Uint128::zero();
    for coin in &info.funds {
        if coin.denom != denom {
            return Err(ContractError::InvalidFeeDenom {
                denom: denom.to_string(),
            });
        }
        paid = paid.checked_add(coin.amount)?;
    }
    Ok(paid)
}

// ============================================================================
// Send
// ============================================================================

/// Price the message, keep the fee and append the message to the outbox.
///
/// Overpayment is refunded to `extra.refund_address`, or to the sender.
pub fn execute_send_message(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    remote_chain_id: u64,
    message: Binary,
    extra: Option<Binary>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if !WHITELIST
        .may_load(deps.storage, &info.sender)?
        .unwrap_or(false)
    {
        return Err(ContractError::NotWhitelisted {
            app: info.sender.to_string(),
        });
    }

    let to_messager = REMOTE_MESSAGERS
        .may_load(deps.storage, remote_chain_id)?
        .ok_or(ContractError::UnknownRemoteChain {
            chain_id: remote_chain_id,
        })?;
    let to_app = REMOTE_APPS
        .may_load(deps.storage, (&info.sender, remote_chain_id))?
        .ok_or(ContractError::RemoteAppNotSet {
            app: info.sender.to_string(),
            chain_id: remote_chain_id,
        })?;

    let extra = MessageExtra::decode(extra.as_ref())?;
    let fee = config.transport.quote_fee(&message, &extra)?;
    let paid = paid_in(&info, &config.fee_denom)?;
    if paid < fee {
        return Err(ContractError::InsufficientFee {
            required: fee,
            paid,
        });
    }

    let nonce = NEXT_NONCE.load(deps.storage)?;
    NEXT_NONCE.save(deps.storage, &(nonce + 1))?;

    let outbound = OutboundMessage {
        nonce,
        remote_chain_id,
        from_app: info.sender.clone(),
        to_messager,
        to_app,
        message,
        fee: Coin {
            denom: config.fee_denom.clone(),
            amount: fee,
        },
        sent_at: env.block.time.seconds(),
    };
    OUTBOX.save(deps.storage, nonce, &outbound)?;

    COLLECTED_FEES.update(deps.storage, |total| -> Result<_, ContractError> {
        Ok(total.checked_add(fee)?)
    })?;

    let mut messages: Vec<CosmosMsg> = vec![];
    let refund = paid - fee;
    if !refund.is_zero() {
        let refund_to = match extra.refund_address {
            Some(addr) => deps.api.addr_validate(&addr)?,
            None => info.sender.clone(),
        };
        messages.push(CosmosMsg::Bank(BankMsg::Send {
            to_address: refund_to.to_string(),
            amount: vec![Coin {
                denom: config.fee_denom.clone(),
                amount: refund,
            }],
        }));
    }

    let event = Event::new("messager_message_sent")
        .add_attribute("nonce", nonce.to_string())
        .add_attribute("transport", config.transport.name())
        .add_attribute("src_chain_id", config.this_chain_id.to_string())
        .add_attribute("remote_chain_id", remote_chain_id.to_string())
        .add_attribute("from_app", outbound.from_app.to_string())
        .add_attribute("to_messager", outbound.to_messager)
        .add_attribute("to_app", outbound.to_app)
        .add_attribute("message", outbound.message.to_base64())
        .add_attribute("fee", fee.to_string());

    Ok(Response::new()
        .add_messages(messages)
        .add_event(event)
        .add_attribute("action", "send_message")
        .add_attribute("nonce", nonce.to_string())
        .add_attribute("refund", refund.to_string()))
}

// ============================================================================
// Deliver
// ============================================================================

/// Deliver an inbound message to the local application.
///
/// A message already delivered is acknowledged without calling the
/// application again. If the application rejects the message the whole
/// delivery reverts and may be attempted again later.
#[allow(clippy::too_many_arguments)]
pub fn execute_deliver_message(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    src_chain_id: u64,
    nonce: u64,
    from_messager: String,
    from_app: String,
    to_app: String,
    message: Binary,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.endpoint {
        return Err(ContractError::NotEndpoint);
    }

    let trusted_messager = REMOTE_MESSAGERS
        .may_load(deps.storage, src_chain_id)?
        .ok_or(ContractError::UnknownRemoteChain {
            chain_id: src_chain_id,
        })?;
    if trusted_messager != from_messager {
        return Err(ContractError::UntrustedRemoteMessager {
            chain_id: src_chain_id,
            got: from_messager,
        });
    }

    let to_app_addr = deps.api.addr_validate(&to_app)?;
    let trusted_app = REMOTE_APPS
        .may_load(deps.storage, (&to_app_addr, src_chain_id))?
        .ok_or(ContractError::RemoteAppNotSet {
            app: to_app.clone(),
            chain_id: src_chain_id,
        })?;
    if trusted_app != from_app {
        return Err(ContractError::UntrustedRemoteApp {
            app: to_app,
            chain_id: src_chain_id,
            got: from_app,
        });
    }

    if DELIVERED.has(deps.storage, (src_chain_id, nonce)) {
        return Ok(Response::new()
            .add_attribute("action", "deliver_message")
            .add_attribute("src_chain_id", src_chain_id.to_string())
            .add_attribute("nonce", nonce.to_string())
            .add_attribute("duplicate", "true"));
    }
    DELIVERED.save(deps.storage, (src_chain_id, nonce), &env.block.height)?;

    let call = WasmMsg::Execute {
        contract_addr: to_app_addr.to_string(),
        msg: to_json_binary(&ReceiverExecuteMsg::ReceiveMessage {
            src_chain_id,
            remote_app: from_app.clone(),
            message,
        })?,
        funds: vec![],
    };

    let event = Event::new("messager_message_delivered")
        .add_attribute("src_chain_id", src_chain_id.to_string())
        .add_attribute("nonce", nonce.to_string())
        .add_attribute("from_app", from_app)
        .add_attribute("to_app", to_app_addr.to_string());

    Ok(Response::new()
        .add_message(call)
        .add_event(event)
        .add_attribute("action", "deliver_message")
        .add_attribute("src_chain_id", src_chain_id.to_string())
        .add_attribute("nonce", nonce.to_string()))
}

// ============================================================================
// Owner
// ============================================================================

pub fn execute_set_whitelist(
    deps: DepsMut,
    info: MessageInfo,
    app: String,
    allowed: bool,
) -> Result<Response, ContractError> {
    load_config_as_owner(&deps, &info)?;
    let app_addr = deps.api.addr_validate(&app)?;
    if allowed {
        WHITELIST.save(deps.storage, &app_addr, &true)?;
    } else {
        WHITELIST.remove(deps.storage, &app_addr);
    }

    Ok(Response::new()
        .add_attribute("action", "set_whitelist")
        .add_attribute("app", app_addr)
        .add_attribute("allowed", allowed.to_string()))
}

pub fn execute_set_remote_messager(
    deps: DepsMut,
    info: MessageInfo,
    remote_chain_id: u64,
    messager: String,
) -> Result<Response, ContractError> {
    let config = load_config_as_owner(&deps, &info)?;
    if remote_chain_id == 0 || remote_chain_id == config.this_chain_id {
        return Err(ContractError::InvalidChainId {
            chain_id: remote_chain_id,
        });
    }
    REMOTE_MESSAGERS.save(deps.storage, remote_chain_id, &messager)?;

    Ok(Response::new()
        .add_attribute("action", "set_remote_messager")
        .add_attribute("remote_chain_id", remote_chain_id.to_string())
        .add_attribute("messager", messager))
}

pub fn execute_set_remote_app(
    deps: DepsMut,
    info: MessageInfo,
    app: String,
    remote_chain_id: u64,
    remote_app: String,
) -> Result<Response, ContractError> {
    load_config_as_owner(&deps, &info)?;
    let app_addr: Addr = deps.api.addr_validate(&app)?;
    REMOTE_APPS.save(deps.storage, (&app_addr, remote_chain_id), &remote_app)?;

    Ok(Response::new()
        .add_attribute("action", "set_remote_app")
        .add_attribute("app", app_addr)
        .add_attribute("remote_chain_id", remote_chain_id.to_string())
        .add_attribute("remote_app", remote_app))
}

pub fn execute_set_transport(
    deps: DepsMut,
    info: MessageInfo,
    transport: Transport,
) -> Result<Response, ContractError> {
    let mut config = load_config_as_owner(&deps, &info)?;
    let name = transport.name();
    config.transport = transport;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "set_transport")
        .add_attribute("transport", name))
}

pub fn execute_set_endpoint(
    deps: DepsMut,
    info: MessageInfo,
    endpoint: String,
) -> Result<Response, ContractError> {
    let mut config = load_config_as_owner(&deps, &info)?;
    config.endpoint = deps.api.addr_validate(&endpoint)?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "set_endpoint")
        .add_attribute("endpoint", endpoint))
}

pub fn execute_withdraw_fees(
    deps: DepsMut,
    info: MessageInfo,
    recipient: String,
    amount: Option<Uint128>,
) -> Result<Response, ContractError> {
    let config = load_config_as_owner(&deps, &info)?;
    let recipient = deps.api.addr_validate(&recipient)?;

    let available = COLLECTED_FEES.load(deps.storage)?;
    let amount = amount.unwrap_or(available);
    if amount > available {
        return Err(ContractError::InsufficientCollectedFees {
            requested: amount,
            available,
        });
    }
    COLLECTED_FEES.save(deps.storage, &(available - amount))?;

    let mut response = Response::new()
        .add_attribute("action", "withdraw_fees")
        .add_attribute("recipient", recipient.to_string())
        .add_attribute("amount", amount.to_string());
    if !amount.is_zero() {
        response = response.add_message(BankMsg::Send {
            to_address: recipient.to_string(),
            amount: vec![Coin {
                denom: config.fee_denom,
                amount,
            }],
        });
    }
    Ok(response)
}

pub fn execute_transfer_ownership(
    deps: DepsMut,
    info: MessageInfo,
    new_owner: String,
) -> Result<Response, ContractError> {
    let mut config = load_config_as_owner(&deps, &info)?;
    config.owner = deps.api.addr_validate(&new_owner)?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "transfer_ownership")
        .add_attribute("new_owner", new_owner))
}
