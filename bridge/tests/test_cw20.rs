//! CW20 flows: CW20 escrow on the source side and CW20 payouts pulled from
//! the provider's allowance on the target side.

mod harness;

use cosmwasm_std::{coins, to_json_binary, Addr, Binary, Uint128};
use cw20::{BalanceResponse, Cw20Coin, Cw20ExecuteMsg, Cw20QueryMsg};
use cw_multi_test::Executor;

use common::AssetInfo;
use harness::*;
use liquidity_bridge::hash::transfer_id_of;
use liquidity_bridge::msg::{ExecuteMsg, LockParams, ReceiveMsg, TransferParams};
use liquidity_bridge::state::LockStatus;

fn create_token(h: &mut Harness, symbol: &str) -> Addr {
    let code_id = h.app.store_code(contract_cw20());
    h.app
        .instantiate_contract(
            code_id,
            Addr::unchecked(ADMIN),
            &cw20_base::msg::InstantiateMsg {
                name: format!("{} Token", symbol),
                symbol: symbol.to_string(),
                decimals: 6,
                initial_balances: vec![
                    Cw20Coin {
                        address: USER.to_string(),
                        amount: Uint128::new(INITIAL_BALANCE),
                    },
                    Cw20Coin {
                        address: PROVIDER.to_string(),
                        amount: Uint128::new(INITIAL_BALANCE),
                    },
                ],
                mint: None,
                marketing: None,
            },
            &[],
            symbol,
            None,
        )
        .unwrap()
}

fn cw20_balance(h: &Harness, token: &Addr, who: &str) -> u128 {
    let res: BalanceResponse = h
        .app
        .wrap()
        .query_wasm_smart(
            token,
            &Cw20QueryMsg::Balance {
                address: who.to_string(),
            },
        )
        .unwrap();
    res.balance.u128()
}

fn send(h: &mut Harness, token: &Addr, from: &str, amount: u128, msg: &ReceiveMsg) {
    let bridge_a = h.bridge_a.clone();
    h.app
        .execute_contract(
            Addr::unchecked(from),
            token.clone(),
            &Cw20ExecuteMsg::Send {
                contract: bridge_a.to_string(),
                amount: Uint128::new(amount),
                msg: to_json_binary(msg).unwrap(),
            },
            &[],
        )
        .unwrap();
}

#[test]
fn test_cw20_lock_relay_and_withdraw() {
    let mut h = setup();
    let token = create_token(&mut h, "SRCT");
    let token_id = token.to_string();

    register_pair(&mut h, AssetInfo::cw20(token.clone()), AssetInfo::native(TGT_DENOM));
    register_provider(&mut h, &token_id, TGT_DENOM);
    send(
        &mut h,
        &token,
        PROVIDER,
        RESERVE,
        &ReceiveMsg::DepositPenaltyReserve {
            remote_chain_id: CHAIN_B,
            target_token: TGT_DENOM.to_string(),
        },
    );
    assert_eq!(
        provider_info(&h, &token_id, TGT_DENOM).penalty_reserve,
        Uint128::new(RESERVE)
    );

    let fee = quote(&h, &token_id, TGT_DENOM, 300);
    let params = LockParams {
        remote_chain_id: CHAIN_B,
        provider: PROVIDER.to_string(),
        source_token: token_id.clone(),
        target_token: TGT_DENOM.to_string(),
        total_fee: fee.total_fee,
        amount: Uint128::new(300),
        receiver: RECEIVER.to_string(),
        snapshot: Binary::from(vec![0u8; 32]),
        timestamp: now(&h),
    };
    send(
        &mut h,
        &token,
        USER,
        420,
        &ReceiveMsg::Lock {
            params: params.clone(),
        },
    );

    assert_eq!(cw20_balance(&h, &token, FEE_COLLECTOR), PROTOCOL_FEE);
    assert_eq!(cw20_balance(&h, &token, h.bridge_a.as_str()), RESERVE + 320);

    let locked = Locked {
        params: transfer_params(&params),
        transfer_id: transfer_id_of(&transfer_params(&params)).unwrap(),
    };
    relay(&mut h, &locked).unwrap();
    assert_eq!(balance(&h, RECEIVER, TGT_DENOM), 300);

    let provider_before = cw20_balance(&h, &token, PROVIDER);
    request_withdraw(&mut h, vec![locked.id()], MESSAGE_FEE).unwrap();
    deliver_to_a(&mut h, 0).unwrap();

    assert_eq!(cw20_balance(&h, &token, PROVIDER), provider_before + 320);
    assert_eq!(cw20_balance(&h, &token, h.bridge_a.as_str()), RESERVE);
    assert_eq!(
        lock_info(&h, &locked.id()).unwrap().status,
        LockStatus::Withdrawn
    );
}

#[test]
fn test_cw20_lock_rejects_other_token() {
    let mut h = setup();
    let token = create_token(&mut h, "SRCT");
    let other = create_token(&mut h, "OTHR");
    register_pair(&mut h, AssetInfo::cw20(token.clone()), AssetInfo::native(TGT_DENOM));
    register_provider(&mut h, token.as_str(), TGT_DENOM);

    // Params name `token` but the funds are `other`
    let params = LockParams {
        remote_chain_id: CHAIN_B,
        provider: PROVIDER.to_string(),
        source_token: token.to_string(),
        target_token: TGT_DENOM.to_string(),
        total_fee: Uint128::new(120),
        amount: Uint128::new(300),
        receiver: RECEIVER.to_string(),
        snapshot: Binary::from(vec![0u8; 32]),
        timestamp: now(&h),
    };
    let bridge_a = h.bridge_a.clone();
    let err = h
        .app
        .execute_contract(
            Addr::unchecked(USER),
            other.clone(),
            &Cw20ExecuteMsg::Send {
                contract: bridge_a.to_string(),
                amount: Uint128::new(420),
                msg: to_json_binary(&ReceiveMsg::Lock { params }).unwrap(),
            },
            &[],
        )
        .unwrap_err();
    assert!(err
        .root_cause()
        .to_string()
        .contains("does not match the registered asset"));
}

#[test]
fn test_cw20_relay_pulls_from_provider_allowance() {
    let mut h = setup();
    let target = create_token(&mut h, "TGTT");
    let target_id = target.to_string();

    register_pair(&mut h, AssetInfo::native(SRC_DENOM), AssetInfo::cw20(target.clone()));
    register_provider(&mut h, SRC_DENOM, &target_id);
    let bridge_a = h.bridge_a.clone();
    h.app
        .execute_contract(
            Addr::unchecked(PROVIDER),
            bridge_a.clone(),
            &ExecuteMsg::DepositPenaltyReserve {
                remote_chain_id: CHAIN_B,
                source_token: SRC_DENOM.to_string(),
                target_token: target_id.clone(),
            },
            &coins(RESERVE, SRC_DENOM),
        )
        .unwrap();

    let fee = quote(&h, SRC_DENOM, &target_id, 300);
    let head = provider_info(&h, SRC_DENOM, &target_id).head_transfer_id;
    let timestamp = now(&h);
    h.app
        .execute_contract(
            Addr::unchecked(USER),
            bridge_a,
            &ExecuteMsg::Lock {
                params: LockParams {
                    remote_chain_id: CHAIN_B,
                    provider: PROVIDER.to_string(),
                    source_token: SRC_DENOM.to_string(),
                    target_token: target_id.clone(),
                    total_fee: fee.total_fee,
                    amount: Uint128::new(300),
                    receiver: RECEIVER.to_string(),
                    snapshot: head.clone(),
                    timestamp,
                },
            },
            &coins(300 + fee.total_fee.u128(), SRC_DENOM),
        )
        .unwrap();

    let params = TransferParams {
        source_chain_id: CHAIN_A,
        target_chain_id: CHAIN_B,
        previous_transfer_id: head,
        provider: PROVIDER.to_string(),
        source_token: SRC_DENOM.to_string(),
        target_token: target_id.clone(),
        receiver: RECEIVER.to_string(),
        amount: Uint128::new(300),
        timestamp,
    };
    let transfer_id = Binary::from(transfer_id_of(&params).unwrap().to_vec());
    let relay_msg = ExecuteMsg::Relay {
        params,
        expected_transfer_id: transfer_id,
    };
    let bridge_b = h.bridge_b.clone();

    // Without an allowance the payout fails and the relay reverts
    h.app
        .execute_contract(Addr::unchecked(PROVIDER), bridge_b.clone(), &relay_msg, &[])
        .unwrap_err();

    h.app
        .execute_contract(
            Addr::unchecked(PROVIDER),
            target.clone(),
            &Cw20ExecuteMsg::IncreaseAllowance {
                spender: bridge_b.to_string(),
                amount: Uint128::new(300),
                expires: None,
            },
            &[],
        )
        .unwrap();
    h.app
        .execute_contract(Addr::unchecked(PROVIDER), bridge_b, &relay_msg, &[])
        .unwrap();

    assert_eq!(cw20_balance(&h, &target, RECEIVER), 300);
    assert_eq!(cw20_balance(&h, &target, PROVIDER), INITIAL_BALANCE - 300);
}
