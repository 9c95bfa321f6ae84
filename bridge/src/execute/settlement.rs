//! Payouts, outbound settlement dispatch, and the replies that resolve them.
//!
//! Outbound settlement messages are sent to the messager as `reply_always`
//! sub-messages. A rejected send only rolls back the sub-message: the fill or
//! slash that triggered it stays committed, the message is recorded as
//! `Failed` and can be re-sent with `RetrySettlementMessage`.

use std::collections::BTreeMap;

use common::{AssetInfo, MessageExtra, MessagerExecuteMsg};
use cosmwasm_std::{
    to_json_binary, Addr, Api, BankMsg, Binary, Coin, CosmosMsg, DepsMut, Env, Event, Reply,
    Response, Storage, SubMsg, SubMsgResult, Uint128, WasmMsg,
};

use crate::error::ContractError;
use crate::hash::bytes32_to_hex;
use crate::msg::RemoteCall;
use crate::state::{
    Config, DispatchStatus, PendingDispatch, PendingPayout, SettlementKind, SettlementMessage,
    MESSAGERS, PENDING_DISPATCH, PENDING_PAYOUT, SETTLEMENT_MESSAGES,
};

pub const PAYOUT_REPLY_ID: u64 = 1;
pub const SETTLEMENT_REPLY_ID: u64 = 2;

// ============================================================================
// Funds
// ============================================================================

fn sum_by_denom(coins: &[Coin]) -> BTreeMap<String, Uint128> {
    let mut totals: BTreeMap<String, Uint128> = BTreeMap::new();
    for coin in coins.iter().filter(|c| !c.amount.is_zero()) {
        *totals.entry(coin.denom.clone()).or_default() += coin.amount;
    }
    totals
}

fn render(totals: &BTreeMap<String, Uint128>) -> String {
    totals
        .iter()
        .map(|(denom, amount)| format!("{}{}", amount, denom))
        .collect::<Vec<_>>()
        .join(",")
}

/// Require the attached funds to match `expected` exactly, per denom.
pub fn expect_funds(funds: &[Coin], expected: &[Coin]) -> Result<(), ContractError> {
    let want = sum_by_denom(expected);
    let got = sum_by_denom(funds);
    if want != got {
        return Err(ContractError::InvalidFunds {
            expected: render(&want),
            got: render(&got),
        });
    }
    Ok(())
}

/// Native coin of `amount` for `token`, if the token is native.
pub fn native_coin(token: &AssetInfo, amount: Uint128) -> Option<Coin> {
    match token {
        AssetInfo::Native { denom } => Some(Coin {
            denom: denom.clone(),
            amount,
        }),
        AssetInfo::Cw20 { .. } => None,
    }
}

// ============================================================================
// Payout
// ============================================================================

/// Build the payout of `amount` of `token` from `payer` to `receiver`.
///
/// Receivers that are not valid addresses on this domain are paid to the
/// fallback receiver. Native payouts run as a `reply_always` sub-message so a
/// failed bank send can be re-routed to the fallback receiver as well. CW20
/// payouts pull from the payer's allowance and revert the call on failure.
#[allow(clippy::too_many_arguments)]
pub fn build_payout(
    storage: &mut dyn Storage,
    api: &dyn Api,
    config: &Config,
    transfer_id: &[u8; 32],
    token: &AssetInfo,
    payer: &Addr,
    receiver: &str,
    amount: Uint128,
) -> Result<(SubMsg, Addr, bool), ContractError> {
    let (recipient, fallback) = match api.addr_validate(receiver) {
        Ok(addr) => (addr, false),
        Err(_) => (config.fallback_receiver.clone(), true),
    };

    let msg = match token.transfer_from_msg(payer.as_str(), recipient.as_str(), amount)? {
        Some(cw20_msg) => SubMsg::new(cw20_msg),
        None => {
            let coin = native_coin(token, amount).ok_or(ContractError::TokenMismatch {
                token: token.id(),
            })?;
            PENDING_PAYOUT.save(
                storage,
                &PendingPayout {
                    transfer_id: *transfer_id,
                    fallback: config.fallback_receiver.clone(),
                    coin: coin.clone(),
                },
            )?;
            SubMsg::reply_always(
                BankMsg::Send {
                    to_address: recipient.to_string(),
                    amount: vec![coin],
                },
                PAYOUT_REPLY_ID,
            )
        }
    };
    Ok((msg, recipient, fallback))
}

/// Reply for native payouts: on failure pay the fallback receiver instead.
pub fn handle_payout_reply(deps: DepsMut, msg: Reply) -> Result<Response, ContractError> {
    let pending = PENDING_PAYOUT.load(deps.storage)?;
    PENDING_PAYOUT.remove(deps.storage);

    match msg.result {
        SubMsgResult::Ok(_) => Ok(Response::new()),
        SubMsgResult::Err(err) => Ok(Response::new()
            .add_message(BankMsg::Send {
                to_address: pending.fallback.to_string(),
                amount: vec![pending.coin.clone()],
            })
            .add_attribute("action", "payout_fallback")
            .add_attribute("transfer_id", bytes32_to_hex(&pending.transfer_id))
            .add_attribute("fallback_receiver", pending.fallback)
            .add_attribute("amount", pending.coin.to_string())
            .add_attribute("reason", err)),
    }
}

// ============================================================================
// Outbound Settlement
// ============================================================================

/// Parameters of one outbound settlement message
pub struct Dispatch<'a> {
    pub remote_chain_id: u64,
    pub call: RemoteCall,
    pub kind: SettlementKind,
    pub transfer_ids: Vec<[u8; 32]>,
    pub fee_prepaid: Uint128,
    pub extra: Option<Binary>,
    pub caller: &'a Addr,
}

/// Record the attempt and build the sub-message sending `dispatch.call`
/// through the send service configured for the remote domain.
pub fn dispatch_settlement(
    storage: &mut dyn Storage,
    env: &Env,
    config: &Config,
    dispatch: Dispatch,
) -> Result<SubMsg, ContractError> {
    let route = MESSAGERS
        .may_load(storage, dispatch.remote_chain_id)?
        .ok_or(ContractError::MessagerNotConfigured {
            chain_id: dispatch.remote_chain_id,
        })?;

    // Overpaid transport fees go back to the caller, not to the bridge
    let mut extra = MessageExtra::decode(dispatch.extra.as_ref())?;
    if extra.refund_address.is_none() {
        extra.refund_address = Some(dispatch.caller.to_string());
    }

    let now = env.block.time.seconds();
    for transfer_id in &dispatch.transfer_ids {
        let attempts = SETTLEMENT_MESSAGES
            .may_load(storage, transfer_id)?
            .map(|m| m.attempts)
            .unwrap_or(0);
        SETTLEMENT_MESSAGES.save(
            storage,
            transfer_id,
            &SettlementMessage {
                kind: dispatch.kind.clone(),
                attempts: attempts + 1,
                status: DispatchStatus::Dispatched,
                last_attempt_at: now,
            },
        )?;
    }

    let fee: Vec<Coin> = if dispatch.fee_prepaid.is_zero() {
        vec![]
    } else {
        vec![Coin {
            denom: config.native_denom.clone(),
            amount: dispatch.fee_prepaid,
        }]
    };

    PENDING_DISPATCH.save(
        storage,
        &PendingDispatch {
            transfer_ids: dispatch.transfer_ids,
            refund_to: dispatch.caller.clone(),
            fee: fee.clone(),
        },
    )?;

    let msg = WasmMsg::Execute {
        contract_addr: route.send_service.to_string(),
        msg: to_json_binary(&MessagerExecuteMsg::SendMessage {
            remote_chain_id: dispatch.remote_chain_id,
            message: to_json_binary(&dispatch.call)?,
            extra: Some(extra.encode()?),
        })?,
        funds: fee,
    };
    Ok(SubMsg::reply_always(msg, SETTLEMENT_REPLY_ID))
}

/// Reply for settlement dispatch: on failure mark the messages `Failed` and
/// refund the prepaid fee to the caller.
pub fn handle_settlement_reply(
    deps: DepsMut,
    env: Env,
    msg: Reply,
) -> Result<Response, ContractError> {
    let pending = PENDING_DISPATCH.load(deps.storage)?;
    PENDING_DISPATCH.remove(deps.storage);

    let err = match msg.result {
        SubMsgResult::Ok(_) => return Ok(Response::new()),
        SubMsgResult::Err(err) => err,
    };

    let mut event = Event::new("lnbridge_settlement_dispatch_failed")
        .add_attribute("reason", err.clone())
        .add_attribute("block_time", env.block.time.seconds().to_string());
    for transfer_id in &pending.transfer_ids {
        SETTLEMENT_MESSAGES.update(deps.storage, transfer_id, |m| -> Result<_, ContractError> {
            let mut m = m.ok_or(ContractError::NotSettled {
                transfer_id: bytes32_to_hex(transfer_id),
            })?;
            m.status = DispatchStatus::Failed;
            Ok(m)
        })?;
        event = event.add_attribute("transfer_id", bytes32_to_hex(transfer_id));
    }

    let mut response = Response::new()
        .add_event(event)
        .add_attribute("action", "settlement_dispatch_failed");
    if !pending.fee.is_empty() {
        response = response.add_message(CosmosMsg::Bank(BankMsg::Send {
            to_address: pending.refund_to.to_string(),
            amount: pending.fee,
        }));
    }
    Ok(response)
}
