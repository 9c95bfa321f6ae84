use common::MessageExtra;
use cosmwasm_std::{Binary, Coin, Deps, Order, StdError, StdResult};
use cw_storage_plus::Bound;

use crate::msg::{
    ConfigResponse, IsDeliveredResponse, IsWhitelistedResponse, OutboundMessagesResponse,
    QuoteFeeResponse,
};
use crate::state::{
    OutboundMessage, COLLECTED_FEES, CONFIG, DELIVERED, NEXT_NONCE, OUTBOX, REMOTE_APPS,
    REMOTE_MESSAGERS, WHITELIST,
};
use crate::transport::TransportAdapter;

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 50;

pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        owner: config.owner,
        this_chain_id: config.this_chain_id,
        endpoint: config.endpoint,
        transport_name: config.transport.name().to_string(),
        transport: config.transport,
        fee_denom: config.fee_denom,
        next_nonce: NEXT_NONCE.load(deps.storage)?,
        collected_fees: COLLECTED_FEES.load(deps.storage)?,
    })
}

pub fn query_outbound_message(deps: Deps, nonce: u64) -> StdResult<Option<OutboundMessage>> {
    OUTBOX.may_load(deps.storage, nonce)
}

/// Outbox listing in nonce order, used by the delivery layer to pick up work.
pub fn query_outbound_messages(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<OutboundMessagesResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.map(Bound::exclusive);

    let messages = OUTBOX
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(_, message)| message))
        .collect::<StdResult<Vec<_>>>()?;

    Ok(OutboundMessagesResponse { messages })
}

pub fn query_is_delivered(deps: Deps, src_chain_id: u64, nonce: u64) -> IsDeliveredResponse {
    IsDeliveredResponse {
        delivered: DELIVERED.has(deps.storage, (src_chain_id, nonce)),
    }
}

pub fn query_quote_fee(
    deps: Deps,
    message: Binary,
    extra: Option<Binary>,
) -> StdResult<QuoteFeeResponse> {
    let config = CONFIG.load(deps.storage)?;
    let extra = MessageExtra::decode(extra.as_ref())?;
    let amount = config
        .transport
        .quote_fee(&message, &extra)
        .map_err(|e| StdError::generic_err(e.to_string()))?;
    Ok(QuoteFeeResponse {
        fee: Coin {
            denom: config.fee_denom,
            amount,
        },
    })
}

pub fn query_remote_messager(deps: Deps, remote_chain_id: u64) -> StdResult<Option<String>> {
    REMOTE_MESSAGERS.may_load(deps.storage, remote_chain_id)
}

pub fn query_remote_app(
    deps: Deps,
    app: String,
    remote_chain_id: u64,
) -> StdResult<Option<String>> {
    let app = deps.api.addr_validate(&app)?;
    REMOTE_APPS.may_load(deps.storage, (&app, remote_chain_id))
}

pub fn query_is_whitelisted(deps: Deps, app: String) -> StdResult<IsWhitelistedResponse> {
    let app = deps.api.addr_validate(&app)?;
    Ok(IsWhitelistedResponse {
        whitelisted: WHITELIST.may_load(deps.storage, &app)?.unwrap_or(false),
    })
}
