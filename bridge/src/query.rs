//! Query handlers for the liquidity bridge contract.

use cosmwasm_std::{Binary, Deps, Order, StdError, StdResult, Uint128};
use cw_storage_plus::Bound;

use crate::fee_manager::quote_fee;
use crate::hash::{compute_provider_key, parse_bytes32, transfer_id_of};
use crate::msg::{
    ConfigResponse, FillInfoResponse, LockInfoResponse, MessagerRouteResponse,
    PendingAdminResponse, ProviderInfoResponse, ProviderKeyResponse, QuoteFeeResponse,
    SettlementMessageResponse, TokenInfoResponse, TokensResponse, TransferIdResponse,
    TransferParams,
};
use crate::state::{
    TokenInfo, CONFIG, FILLS, LOCKS, MESSAGERS, PENDING_ADMIN, PROVIDERS, SETTLEMENT_MESSAGES,
    TOKENS,
};

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 30;

fn parse_id(value: &Binary) -> StdResult<[u8; 32]> {
    parse_bytes32(value).map_err(|e| StdError::generic_err(e.to_string()))
}

// ============================================================================
// Core Queries
// ============================================================================

pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        admin: config.admin,
        paused: config.paused,
        this_chain_id: config.this_chain_id,
        native_denom: config.native_denom,
        fallback_receiver: config.fallback_receiver,
        fee_collector: config.fee_collector,
        min_slash_delay: config.min_slash_delay,
    })
}

pub fn query_pending_admin(deps: Deps) -> StdResult<Option<PendingAdminResponse>> {
    Ok(PENDING_ADMIN
        .may_load(deps.storage)?
        .map(|p| PendingAdminResponse {
            new_address: p.new_address,
            execute_after: p.execute_after,
        }))
}

pub fn query_messager_route(deps: Deps, remote_chain_id: u64) -> StdResult<MessagerRouteResponse> {
    let route = MESSAGERS.load(deps.storage, remote_chain_id)?;
    Ok(MessagerRouteResponse {
        remote_chain_id,
        send_service: route.send_service,
        receive_service: route.receive_service,
    })
}

// ============================================================================
// Token Queries
// ============================================================================

fn token_response(token: TokenInfo) -> TokenInfoResponse {
    TokenInfoResponse {
        remote_chain_id: token.remote_chain_id,
        local_token: token.local_token,
        remote_token: token.remote_token,
        local_decimals: token.local_decimals,
        remote_decimals: token.remote_decimals,
        protocol_fee: token.protocol_fee,
        penalty: token.penalty,
    }
}

pub fn query_token_info(
    deps: Deps,
    remote_chain_id: u64,
    local_token: String,
    remote_token: String,
) -> StdResult<TokenInfoResponse> {
    let token = TOKENS.load(deps.storage, (remote_chain_id, &local_token, &remote_token))?;
    Ok(token_response(token))
}

/// List registered token pairs with pagination.
pub fn query_tokens(
    deps: Deps,
    start_after: Option<(u64, String, String)>,
    limit: Option<u32>,
) -> StdResult<TokensResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after
        .as_ref()
        .map(|(chain, local, remote)| Bound::exclusive((*chain, local.as_str(), remote.as_str())));

    let tokens = TOKENS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(_, token)| token_response(token)))
        .collect::<StdResult<Vec<_>>>()?;

    Ok(TokensResponse { tokens })
}

// ============================================================================
// Provider Queries
// ============================================================================

pub fn query_provider_info(
    deps: Deps,
    remote_chain_id: u64,
    provider: String,
    source_token: String,
    target_token: String,
) -> StdResult<ProviderInfoResponse> {
    let provider_key =
        compute_provider_key(remote_chain_id, &provider, &source_token, &target_token);
    let info = PROVIDERS.load(deps.storage, &provider_key)?;
    Ok(ProviderInfoResponse {
        provider_key: Binary::from(provider_key.to_vec()),
        provider: info.provider,
        remote_chain_id: info.remote_chain_id,
        source_token: info.source_token,
        target_token: info.target_token,
        config: info.config,
        penalty_reserve: info.penalty_reserve,
        head_transfer_id: Binary::from(info.head_transfer_id.to_vec()),
    })
}

pub fn query_provider_key(
    remote_chain_id: u64,
    provider: String,
    source_token: String,
    target_token: String,
) -> ProviderKeyResponse {
    let key = compute_provider_key(remote_chain_id, &provider, &source_token, &target_token);
    ProviderKeyResponse {
        provider_key: Binary::from(key.to_vec()),
    }
}

/// Fee a lock of `amount` must carry with the current provider and token
/// configuration.
pub fn query_quote_fee(
    deps: Deps,
    remote_chain_id: u64,
    provider: String,
    source_token: String,
    target_token: String,
    amount: Uint128,
) -> StdResult<QuoteFeeResponse> {
    let token = TOKENS
        .may_load(deps.storage, (remote_chain_id, &source_token, &target_token))?
        .ok_or_else(|| StdError::generic_err("Token pair not registered"))?;
    let provider_key =
        compute_provider_key(remote_chain_id, &provider, &source_token, &target_token);
    let info = PROVIDERS
        .may_load(deps.storage, &provider_key)?
        .ok_or_else(|| StdError::generic_err("Provider not registered"))?;

    let quote = quote_fee(&info.config, &token, amount)?;
    Ok(QuoteFeeResponse {
        provider_fee: quote.provider_fee,
        protocol_fee: quote.protocol_fee,
        total_fee: quote.total_fee,
        penalty: quote.penalty,
    })
}

// ============================================================================
// Transfer Queries
// ============================================================================

pub fn query_compute_transfer_id(params: TransferParams) -> StdResult<TransferIdResponse> {
    let transfer_id =
        transfer_id_of(&params).map_err(|e| StdError::generic_err(e.to_string()))?;
    Ok(TransferIdResponse {
        transfer_id: Binary::from(transfer_id.to_vec()),
    })
}

pub fn query_lock_info(deps: Deps, transfer_id: Binary) -> StdResult<Option<LockInfoResponse>> {
    let transfer_id = parse_id(&transfer_id)?;
    Ok(LOCKS
        .may_load(deps.storage, &transfer_id)?
        .map(|lock| LockInfoResponse {
            provider: lock.provider,
            remote_chain_id: lock.remote_chain_id,
            source_token: lock.source_token,
            target_token: lock.target_token,
            amount_with_fee_and_penalty: lock.amount_with_fee_and_penalty,
            penalty: lock.penalty,
            timestamp: lock.timestamp,
            status: lock.status,
        }))
}

pub fn query_fill_info(deps: Deps, transfer_id: Binary) -> StdResult<Option<FillInfoResponse>> {
    let transfer_id = parse_id(&transfer_id)?;
    Ok(FILLS
        .may_load(deps.storage, &transfer_id)?
        .map(|fill| FillInfoResponse {
            status: fill.status,
            by: fill.by,
            provider: fill.provider,
            source_chain_id: fill.source_chain_id,
            settled_at: fill.settled_at,
        }))
}

pub fn query_settlement_message(
    deps: Deps,
    transfer_id: Binary,
) -> StdResult<Option<SettlementMessageResponse>> {
    let transfer_id = parse_id(&transfer_id)?;
    Ok(SETTLEMENT_MESSAGES
        .may_load(deps.storage, &transfer_id)?
        .map(|m| SettlementMessageResponse {
            kind: m.kind,
            attempts: m.attempts,
            status: m.status,
            last_attempt_at: m.last_attempt_at,
        }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::mock_dependencies;

    #[test]
    fn test_transfer_queries_reject_short_ids() {
        let deps = mock_dependencies();
        let short = Binary::from(vec![1u8; 31]);

        let err = query_lock_info(deps.as_ref(), short.clone()).unwrap_err();
        assert!(err
            .to_string()
            .contains("Invalid hash length: expected 32 bytes, got 31"));
        assert!(query_fill_info(deps.as_ref(), short.clone()).is_err());
        assert!(query_settlement_message(deps.as_ref(), short).is_err());
    }

    #[test]
    fn test_unknown_transfer_is_none() {
        let deps = mock_dependencies();
        let id = Binary::from(vec![9u8; 32]);
        assert!(query_lock_info(deps.as_ref(), id.clone()).unwrap().is_none());
        assert!(query_fill_info(deps.as_ref(), id).unwrap().is_none());
    }
}
