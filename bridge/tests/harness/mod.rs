//! Two-domain test harness.
//!
//! Chain 1 (`bridge_a`, `messager_a`) and chain 2 (`bridge_b`, `messager_b`)
//! live on one simulated chain. Transfers go from chain 1 (`usrc`) to chain 2
//! (`utgt`); settlement messages travel back through the messagers and are
//! delivered by the `endpoint` account.
#![allow(dead_code)]

use cosmwasm_std::{coin, coins, Addr, Binary, Empty, Uint128};
use cw_multi_test::error::AnyResult;
use cw_multi_test::{App, AppResponse, Contract, ContractWrapper, Executor};

use common::AssetInfo;
use liquidity_bridge::hash::transfer_id_of;
use liquidity_bridge::msg::{
    ExecuteMsg, FillInfoResponse, InstantiateMsg, LockInfoResponse, LockParams,
    ProviderInfoResponse, QueryMsg, QuoteFeeResponse, SettlementMessageResponse, TransferParams,
};
use messager::msg::{
    ExecuteMsg as MessagerExecuteMsg, InstantiateMsg as MessagerInstantiateMsg,
    OutboundMessagesResponse, QueryMsg as MessagerQueryMsg,
};
use messager::transport::{ThirdPartyParams, Transport};

pub const CHAIN_A: u64 = 1;
pub const CHAIN_B: u64 = 2;

pub const SRC_DENOM: &str = "usrc";
pub const TGT_DENOM: &str = "utgt";
pub const FEE_DENOM: &str = "unative";

pub const ADMIN: &str = "admin";
pub const PROVIDER: &str = "provider";
pub const USER: &str = "user";
pub const RECEIVER: &str = "receiver";
pub const SLASHER: &str = "slasher";
pub const ENDPOINT: &str = "endpoint";
pub const FALLBACK: &str = "fallback";
pub const FEE_COLLECTOR: &str = "feecollector";

pub const BASE_FEE: u128 = 20;
/// 0.1%
pub const FEE_RATE: u64 = 100;
pub const PROTOCOL_FEE: u128 = 100;
pub const PENALTY: u128 = 100;
pub const TRANSFER_LIMIT: u128 = 1_000_000;
pub const RESERVE: u128 = 1_000;
pub const MESSAGE_FEE: u128 = 100;
pub const SLASH_DELAY: u64 = 1_800;

pub const INITIAL_BALANCE: u128 = 100_000_000;

pub struct Harness {
    pub app: App,
    pub bridge_a: Addr,
    pub bridge_b: Addr,
    pub messager_a: Addr,
    pub messager_b: Addr,
}

/// A lock made on chain 1, as a relayer would observe it.
pub struct Locked {
    pub params: TransferParams,
    pub transfer_id: [u8; 32],
}

impl Locked {
    pub fn id(&self) -> Binary {
        Binary::from(self.transfer_id.to_vec())
    }
}

pub fn contract_bridge() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        liquidity_bridge::contract::execute,
        liquidity_bridge::contract::instantiate,
        liquidity_bridge::contract::query,
    )
    .with_reply(liquidity_bridge::contract::reply);
    Box::new(contract)
}

pub fn contract_messager() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        messager::contract::execute,
        messager::contract::instantiate,
        messager::contract::query,
    );
    Box::new(contract)
}

pub fn contract_cw20() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        cw20_base::contract::execute,
        cw20_base::contract::instantiate,
        cw20_base::contract::query,
    );
    Box::new(contract)
}

fn addr(name: &str) -> Addr {
    Addr::unchecked(name)
}

fn instantiate_bridge(app: &mut App, code_id: u64, chain_id: u64) -> Addr {
    app.instantiate_contract(
        code_id,
        addr(ADMIN),
        &InstantiateMsg {
            admin: ADMIN.to_string(),
            this_chain_id: chain_id,
            native_denom: FEE_DENOM.to_string(),
            fallback_receiver: FALLBACK.to_string(),
            fee_collector: FEE_COLLECTOR.to_string(),
            min_slash_delay: Some(SLASH_DELAY),
        },
        &[],
        format!("bridge-{}", chain_id),
        Some(ADMIN.to_string()),
    )
    .unwrap()
}

fn instantiate_messager(app: &mut App, code_id: u64, chain_id: u64) -> Addr {
    app.instantiate_contract(
        code_id,
        addr(ADMIN),
        &MessagerInstantiateMsg {
            owner: ADMIN.to_string(),
            this_chain_id: chain_id,
            endpoint: ENDPOINT.to_string(),
            transport: Transport::ThirdParty(ThirdPartyParams {
                native_fee: Uint128::new(MESSAGE_FEE),
            }),
            fee_denom: FEE_DENOM.to_string(),
        },
        &[],
        format!("messager-{}", chain_id),
        None,
    )
    .unwrap()
}

fn wire_messager(
    app: &mut App,
    messager: &Addr,
    app_addr: &Addr,
    remote: u64,
    remote_messager: &Addr,
    remote_app: &Addr,
) {
    let msgs = [
        MessagerExecuteMsg::SetWhitelist {
            app: app_addr.to_string(),
            allowed: true,
        },
        MessagerExecuteMsg::SetRemoteMessager {
            remote_chain_id: remote,
            messager: remote_messager.to_string(),
        },
        MessagerExecuteMsg::SetRemoteApp {
            app: app_addr.to_string(),
            remote_chain_id: remote,
            remote_app: remote_app.to_string(),
        },
    ];
    for msg in msgs {
        app.execute_contract(addr(ADMIN), messager.clone(), &msg, &[])
            .unwrap();
    }
}

pub fn admin_exec(h: &mut Harness, bridge: &Addr, msg: &ExecuteMsg) -> AnyResult<AppResponse> {
    h.app.execute_contract(addr(ADMIN), bridge.clone(), msg, &[])
}

/// Register a token pair on both bridges for the chain 1 -> chain 2 direction.
pub fn register_pair(h: &mut Harness, source: AssetInfo, target: AssetInfo) {
    let source_id = source.id();
    let target_id = target.id();
    let (bridge_a, bridge_b) = (h.bridge_a.clone(), h.bridge_b.clone());
    admin_exec(
        h,
        &bridge_a,
        &ExecuteMsg::RegisterToken {
            remote_chain_id: CHAIN_B,
            local_token: source,
            remote_token: target_id.clone(),
            local_decimals: 6,
            remote_decimals: 6,
            protocol_fee: Uint128::new(PROTOCOL_FEE),
            penalty: Uint128::new(PENALTY),
        },
    )
    .unwrap();
    admin_exec(
        h,
        &bridge_b,
        &ExecuteMsg::RegisterToken {
            remote_chain_id: CHAIN_A,
            local_token: target,
            remote_token: source_id,
            local_decimals: 6,
            remote_decimals: 6,
            protocol_fee: Uint128::new(PROTOCOL_FEE),
            penalty: Uint128::new(PENALTY),
        },
    )
    .unwrap();
}

pub fn register_provider(h: &mut Harness, source_token: &str, target_token: &str) {
    let bridge_a = h.bridge_a.clone();
    h.app
        .execute_contract(
            addr(PROVIDER),
            bridge_a,
            &ExecuteMsg::RegisterProvider {
                remote_chain_id: CHAIN_B,
                source_token: source_token.to_string(),
                target_token: target_token.to_string(),
                base_fee: Uint128::new(BASE_FEE),
                liquidity_fee_rate: FEE_RATE,
                transfer_limit: Uint128::new(TRANSFER_LIMIT),
            },
            &[],
        )
        .unwrap();
}

/// Both domains wired together, `usrc -> utgt` registered, provider
/// registered with `RESERVE` penalty reserve.
pub fn setup() -> Harness {
    let mut app = App::default();

    app.init_modules(|router, _, storage| {
        for who in [ADMIN, PROVIDER, USER, SLASHER] {
            router
                .bank
                .init_balance(
                    storage,
                    &addr(who),
                    vec![
                        coin(INITIAL_BALANCE, SRC_DENOM),
                        coin(INITIAL_BALANCE, TGT_DENOM),
                        coin(INITIAL_BALANCE, FEE_DENOM),
                    ],
                )
                .unwrap();
        }
    });

    let bridge_code = app.store_code(contract_bridge());
    let messager_code = app.store_code(contract_messager());

    let bridge_a = instantiate_bridge(&mut app, bridge_code, CHAIN_A);
    let bridge_b = instantiate_bridge(&mut app, bridge_code, CHAIN_B);
    let messager_a = instantiate_messager(&mut app, messager_code, CHAIN_A);
    let messager_b = instantiate_messager(&mut app, messager_code, CHAIN_B);

    wire_messager(&mut app, &messager_a, &bridge_a, CHAIN_B, &messager_b, &bridge_b);
    wire_messager(&mut app, &messager_b, &bridge_b, CHAIN_A, &messager_a, &bridge_a);

    let mut h = Harness {
        app,
        bridge_a,
        bridge_b,
        messager_a,
        messager_b,
    };

    let (bridge_a, bridge_b) = (h.bridge_a.clone(), h.bridge_b.clone());
    let (messager_a, messager_b) = (h.messager_a.clone(), h.messager_b.clone());
    admin_exec(
        &mut h,
        &bridge_a,
        &ExecuteMsg::SetMessager {
            remote_chain_id: CHAIN_B,
            send_service: messager_a.to_string(),
            receive_service: messager_a.to_string(),
        },
    )
    .unwrap();
    admin_exec(
        &mut h,
        &bridge_b,
        &ExecuteMsg::SetMessager {
            remote_chain_id: CHAIN_A,
            send_service: messager_b.to_string(),
            receive_service: messager_b.to_string(),
        },
    )
    .unwrap();

    register_pair(
        &mut h,
        AssetInfo::native(SRC_DENOM),
        AssetInfo::native(TGT_DENOM),
    );
    register_provider(&mut h, SRC_DENOM, TGT_DENOM);
    h.app
        .execute_contract(
            addr(PROVIDER),
            bridge_a,
            &ExecuteMsg::DepositPenaltyReserve {
                remote_chain_id: CHAIN_B,
                source_token: SRC_DENOM.to_string(),
                target_token: TGT_DENOM.to_string(),
            },
            &coins(RESERVE, SRC_DENOM),
        )
        .unwrap();

    h
}

// ============================================================================
// Queries
// ============================================================================

pub fn balance(h: &Harness, who: &str, denom: &str) -> u128 {
    h.app
        .wrap()
        .query_balance(who, denom)
        .unwrap()
        .amount
        .u128()
}

pub fn provider_info(h: &Harness, source_token: &str, target_token: &str) -> ProviderInfoResponse {
    h.app
        .wrap()
        .query_wasm_smart(
            &h.bridge_a,
            &QueryMsg::ProviderInfo {
                remote_chain_id: CHAIN_B,
                provider: PROVIDER.to_string(),
                source_token: source_token.to_string(),
                target_token: target_token.to_string(),
            },
        )
        .unwrap()
}

pub fn quote(h: &Harness, source_token: &str, target_token: &str, amount: u128) -> QuoteFeeResponse {
    h.app
        .wrap()
        .query_wasm_smart(
            &h.bridge_a,
            &QueryMsg::QuoteFee {
                remote_chain_id: CHAIN_B,
                provider: PROVIDER.to_string(),
                source_token: source_token.to_string(),
                target_token: target_token.to_string(),
                amount: Uint128::new(amount),
            },
        )
        .unwrap()
}

pub fn lock_info(h: &Harness, transfer_id: &Binary) -> Option<LockInfoResponse> {
    h.app
        .wrap()
        .query_wasm_smart(
            &h.bridge_a,
            &QueryMsg::LockInfo {
                transfer_id: transfer_id.clone(),
            },
        )
        .unwrap()
}

pub fn fill_info(h: &Harness, transfer_id: &Binary) -> Option<FillInfoResponse> {
    h.app
        .wrap()
        .query_wasm_smart(
            &h.bridge_b,
            &QueryMsg::FillInfo {
                transfer_id: transfer_id.clone(),
            },
        )
        .unwrap()
}

pub fn settlement_message(h: &Harness, transfer_id: &Binary) -> Option<SettlementMessageResponse> {
    h.app
        .wrap()
        .query_wasm_smart(
            &h.bridge_b,
            &QueryMsg::SettlementMessage {
                transfer_id: transfer_id.clone(),
            },
        )
        .unwrap()
}

pub fn has_event(res: &AppResponse, ty: &str) -> bool {
    let wasm_ty = format!("wasm-{}", ty);
    res.events.iter().any(|e| e.ty == wasm_ty)
}

// ============================================================================
// Flows
// ============================================================================

pub fn now(h: &Harness) -> u64 {
    h.app.block_info().time.seconds()
}

pub fn advance(h: &mut Harness, seconds: u64) {
    h.app.update_block(|block| {
        block.time = block.time.plus_seconds(seconds);
        block.height += seconds / 5 + 1;
    });
}

/// Lock parameters for `amount` against the provider's current head.
pub fn lock_params(h: &Harness, amount: u128) -> LockParams {
    let info = provider_info(h, SRC_DENOM, TGT_DENOM);
    let fee = quote(h, SRC_DENOM, TGT_DENOM, amount);
    LockParams {
        remote_chain_id: CHAIN_B,
        provider: PROVIDER.to_string(),
        source_token: SRC_DENOM.to_string(),
        target_token: TGT_DENOM.to_string(),
        total_fee: fee.total_fee,
        amount: Uint128::new(amount),
        receiver: RECEIVER.to_string(),
        snapshot: info.head_transfer_id,
        timestamp: now(h),
    }
}

/// Transfer parameters the target side expects for a lock.
pub fn transfer_params(params: &LockParams) -> TransferParams {
    TransferParams {
        source_chain_id: CHAIN_A,
        target_chain_id: params.remote_chain_id,
        previous_transfer_id: params.snapshot.clone(),
        provider: params.provider.clone(),
        source_token: params.source_token.clone(),
        target_token: params.target_token.clone(),
        receiver: params.receiver.clone(),
        amount: params.amount,
        timestamp: params.timestamp,
    }
}

/// Lock `amount` usrc from `USER` to `receiver`.
pub fn lock_to(h: &mut Harness, amount: u128, receiver: &str) -> Locked {
    let mut params = lock_params(h, amount);
    params.receiver = receiver.to_string();
    let paid = amount + params.total_fee.u128();
    let bridge_a = h.bridge_a.clone();
    h.app
        .execute_contract(
            addr(USER),
            bridge_a,
            &ExecuteMsg::Lock {
                params: params.clone(),
            },
            &coins(paid, SRC_DENOM),
        )
        .unwrap();

    let params = transfer_params(&params);
    let transfer_id = transfer_id_of(&params).unwrap();
    Locked {
        params,
        transfer_id,
    }
}

pub fn lock(h: &mut Harness, amount: u128) -> Locked {
    lock_to(h, amount, RECEIVER)
}

pub fn relay(h: &mut Harness, locked: &Locked) -> AnyResult<AppResponse> {
    let bridge_b = h.bridge_b.clone();
    h.app.execute_contract(
        addr(PROVIDER),
        bridge_b,
        &ExecuteMsg::Relay {
            params: locked.params.clone(),
            expected_transfer_id: locked.id(),
        },
        &coins(locked.params.amount.u128(), TGT_DENOM),
    )
}

pub fn slash(h: &mut Harness, locked: &Locked, fee: u128) -> AnyResult<AppResponse> {
    let bridge_b = h.bridge_b.clone();
    let mut funds = vec![coin(locked.params.amount.u128(), TGT_DENOM)];
    if fee > 0 {
        funds.push(coin(fee, FEE_DENOM));
    }
    h.app.execute_contract(
        addr(SLASHER),
        bridge_b,
        &ExecuteMsg::RequestSlashAndSettle {
            params: locked.params.clone(),
            expected_transfer_id: locked.id(),
            fee_prepaid: Uint128::new(fee),
            extra: None,
        },
        &funds,
    )
}

pub fn request_withdraw(
    h: &mut Harness,
    ids: Vec<Binary>,
    fee: u128,
) -> AnyResult<AppResponse> {
    let bridge_b = h.bridge_b.clone();
    let funds = if fee > 0 { coins(fee, FEE_DENOM) } else { vec![] };
    h.app.execute_contract(
        addr(PROVIDER),
        bridge_b,
        &ExecuteMsg::RequestWithdrawLiquidity {
            remote_chain_id: CHAIN_A,
            transfer_ids: ids,
            provider: PROVIDER.to_string(),
            fee_prepaid: Uint128::new(fee),
            extra: None,
        },
        &funds,
    )
}

/// Messages queued by chain 2's messager, in nonce order.
pub fn outbox_b(h: &Harness) -> OutboundMessagesResponse {
    h.app
        .wrap()
        .query_wasm_smart(
            &h.messager_b,
            &MessagerQueryMsg::OutboundMessages {
                start_after: None,
                limit: Some(50),
            },
        )
        .unwrap()
}

/// Deliver message `nonce` from chain 2's outbox to chain 1.
pub fn deliver_to_a(h: &mut Harness, nonce: u64) -> AnyResult<AppResponse> {
    let outbox = outbox_b(h);
    let message = outbox
        .messages
        .into_iter()
        .find(|m| m.nonce == nonce)
        .expect("message not in outbox");
    let messager_a = h.messager_a.clone();
    h.app.execute_contract(
        addr(ENDPOINT),
        messager_a,
        &MessagerExecuteMsg::DeliverMessage {
            src_chain_id: CHAIN_B,
            nonce,
            from_messager: h.messager_b.to_string(),
            from_app: message.from_app.to_string(),
            to_app: message.to_app,
            message: message.message,
        },
        &[],
    )
}
