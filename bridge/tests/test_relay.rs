//! Target side relay tests: exactly-once settlement, chain continuity and
//! payout resilience.

mod harness;

use cosmwasm_std::{coins, Addr, Binary};
use cw_multi_test::Executor;

use harness::*;
use liquidity_bridge::msg::{ExecuteMsg, QueryMsg, TransferIdResponse};
use liquidity_bridge::state::FillStatus;

#[test]
fn test_relay_pays_receiver_from_provider() {
    let mut h = setup();
    let locked = lock(&mut h, 300);
    let provider_before = balance(&h, PROVIDER, TGT_DENOM);

    let res = relay(&mut h, &locked).unwrap();
    assert!(has_event(&res, "lnbridge_transfer_filled"));

    assert_eq!(balance(&h, RECEIVER, TGT_DENOM), 300);
    assert_eq!(balance(&h, PROVIDER, TGT_DENOM), provider_before - 300);
    assert_eq!(balance(&h, h.bridge_b.as_str(), TGT_DENOM), 0);

    let fill = fill_info(&h, &locked.id()).unwrap();
    assert_eq!(fill.status, FillStatus::Filled);
    assert_eq!(fill.by, Addr::unchecked(PROVIDER));
    assert_eq!(fill.source_chain_id, CHAIN_A);
}

#[test]
fn test_relay_settles_once() {
    let mut h = setup();
    let locked = lock(&mut h, 300);
    relay(&mut h, &locked).unwrap();

    let err = relay(&mut h, &locked).unwrap_err();
    assert!(err.root_cause().to_string().contains("already settled"));

    // The slash path loses the race as well
    advance(&mut h, SLASH_DELAY);
    let err = slash(&mut h, &locked, MESSAGE_FEE).unwrap_err();
    assert!(err.root_cause().to_string().contains("already settled"));
    assert_eq!(balance(&h, RECEIVER, TGT_DENOM), 300);
}

#[test]
fn test_slash_before_delay_after_relay_is_already_settled() {
    let mut h = setup();
    let locked = lock(&mut h, 300);
    relay(&mut h, &locked).unwrap();

    // Waiting would never help, so the delay is not reported
    let err = slash(&mut h, &locked, MESSAGE_FEE).unwrap_err();
    assert!(
        err.root_cause().to_string().contains("already settled"),
        "{}",
        err.root_cause()
    );
    assert_eq!(
        fill_info(&h, &locked.id()).unwrap().status,
        FillStatus::Filled
    );
}

#[test]
fn test_relay_after_slash_is_already_settled() {
    let mut h = setup();
    let locked = lock(&mut h, 300);
    advance(&mut h, SLASH_DELAY);
    slash(&mut h, &locked, MESSAGE_FEE).unwrap();

    let err = relay(&mut h, &locked).unwrap_err();
    assert!(
        err.root_cause().to_string().contains("already settled"),
        "{}",
        err.root_cause()
    );
    assert_eq!(
        fill_info(&h, &locked.id()).unwrap().status,
        FillStatus::Slashed
    );
    assert_eq!(balance(&h, RECEIVER, TGT_DENOM), 300);
}

#[test]
fn test_relay_follows_chain_order() {
    let mut h = setup();
    let first = lock(&mut h, 300);
    let second = lock(&mut h, 500);

    let err = relay(&mut h, &second).unwrap_err();
    assert!(
        err.root_cause().to_string().contains("Predecessor unsettled"),
        "{}",
        err.root_cause()
    );
    assert!(fill_info(&h, &second.id()).is_none());

    relay(&mut h, &first).unwrap();
    relay(&mut h, &second).unwrap();
    assert_eq!(balance(&h, RECEIVER, TGT_DENOM), 800);
}

#[test]
fn test_relay_only_by_provider() {
    let mut h = setup();
    let locked = lock(&mut h, 300);
    let bridge_b = h.bridge_b.clone();

    let err = h
        .app
        .execute_contract(
            Addr::unchecked(SLASHER),
            bridge_b,
            &ExecuteMsg::Relay {
                params: locked.params.clone(),
                expected_transfer_id: locked.id(),
            },
            &coins(300, TGT_DENOM),
        )
        .unwrap_err();
    assert!(err.root_cause().to_string().contains("not the provider"));
}

#[test]
fn test_relay_rejects_mismatched_params() {
    let mut h = setup();
    let locked = lock(&mut h, 300);
    let bridge_b = h.bridge_b.clone();

    let mut tampered = locked.params.clone();
    tampered.receiver = "attacker".to_string();
    let err = h
        .app
        .execute_contract(
            Addr::unchecked(PROVIDER),
            bridge_b.clone(),
            &ExecuteMsg::Relay {
                params: tampered,
                expected_transfer_id: locked.id(),
            },
            &coins(300, TGT_DENOM),
        )
        .unwrap_err();
    assert!(err.root_cause().to_string().contains("Transfer id mismatch"));

    let mut wrong_chain = locked.params.clone();
    wrong_chain.target_chain_id = 3;
    let err = h
        .app
        .execute_contract(
            Addr::unchecked(PROVIDER),
            bridge_b,
            &ExecuteMsg::Relay {
                params: wrong_chain,
                expected_transfer_id: locked.id(),
            },
            &coins(300, TGT_DENOM),
        )
        .unwrap_err();
    assert_eq!(err.root_cause().to_string(), "Invalid chain ID: 3");
}

#[test]
fn test_relay_requires_exact_payout_funds() {
    let mut h = setup();
    let locked = lock(&mut h, 300);
    let bridge_b = h.bridge_b.clone();

    let err = h
        .app
        .execute_contract(
            Addr::unchecked(PROVIDER),
            bridge_b,
            &ExecuteMsg::Relay {
                params: locked.params.clone(),
                expected_transfer_id: locked.id(),
            },
            &coins(299, TGT_DENOM),
        )
        .unwrap_err();
    assert_eq!(
        err.root_cause().to_string(),
        "Invalid funds: expected [300utgt], got [299utgt]"
    );
}

#[test]
fn test_relay_to_invalid_receiver_pays_fallback() {
    let mut h = setup();
    let locked = lock_to(&mut h, 300, "NotAValidReceiver");

    let res = relay(&mut h, &locked).unwrap();
    let event = res
        .events
        .iter()
        .find(|e| e.ty == "wasm-lnbridge_transfer_filled")
        .unwrap();
    assert!(event
        .attributes
        .iter()
        .any(|a| a.key == "fallback" && a.value == "true"));

    assert_eq!(balance(&h, FALLBACK, TGT_DENOM), 300);
    assert_eq!(
        fill_info(&h, &locked.id()).unwrap().status,
        FillStatus::Filled
    );
}

#[test]
fn test_compute_transfer_id_query_matches_lock() {
    let mut h = setup();
    let locked = lock(&mut h, 300);

    let res: TransferIdResponse = h
        .app
        .wrap()
        .query_wasm_smart(
            &h.bridge_b,
            &QueryMsg::ComputeTransferId {
                params: locked.params.clone(),
            },
        )
        .unwrap();
    assert_eq!(res.transfer_id, locked.id());
    assert_eq!(
        provider_info(&h, SRC_DENOM, TGT_DENOM).head_transfer_id,
        Binary::from(locked.transfer_id.to_vec())
    );
}
