#![cfg(test)]
extern crate std;

use crate::testutils::{MockFlashloanExecutor, MockFlashloanExecutorClient, Setup};
use amm_interfaces::constants::{FLASHLOAN_FEE_FLAG, FLASHLOAN_FEE_TOKEN_FLAG};
use amm_interfaces::types::{FlashloanRequest, HookFeeCollection};
use soroban_sdk::testutils::{Address as _, Events};
use soroban_sdk::token::StellarAssetClient;
use soroban_sdk::{Address, Bytes, Symbol, TryFromVal};

fn create_executor<'a>(setup: &Setup<'a>) -> MockFlashloanExecutorClient<'a> {
    let e = &setup.env;
    let executor = MockFlashloanExecutorClient::new(
        e,
        &e.register(MockFlashloanExecutor, (setup.engine.address.clone(),)),
    );
    for token in [&setup.token0, &setup.token1] {
        StellarAssetClient::new(e, &token.address).mint(&executor.address, &1_000_000);
    }
    executor
}

fn request(setup: &Setup, token: &Address, amount: u128, executor: &Address) -> FlashloanRequest {
    FlashloanRequest {
        token: token.clone(),
        amount,
        executor: executor.clone(),
        callback_data: Bytes::new(&setup.env),
    }
}

fn loan<'a>(setup: &Setup<'a>, executor: &MockFlashloanExecutorClient<'a>, amount: u128) -> (Address, u128) {
    setup.engine.flashloan(
        &setup.users[0],
        &request(setup, &setup.token0.address, amount, &executor.address),
        &Bytes::new(&setup.env),
    )
}

#[test]
#[should_panic(expected = "Error(Contract, #1501)")]
fn test_flashloans_disabled_by_default() {
    let setup = Setup::default();
    let executor = create_executor(&setup);
    loan(&setup, &executor, 1_000_000);
}

#[test]
fn test_flashloan() {
    let setup = Setup::default();
    let executor = create_executor(&setup);
    setup.engine.set_flashloan_fee_bps(&setup.fee_manager, &10);

    assert_eq!(
        loan(&setup, &executor, 1_000_000),
        (setup.token0.address.clone(), 1_000)
    );
    assert_eq!(setup.engine.get_protocol_fees(&setup.token0.address), 1_000);
    assert_eq!(setup.engine_balance(&setup.token0), 1_000_001_000);
    assert_eq!(setup.balance(&setup.token0, &executor.address), 999_000);
}

#[test]
fn test_flashloan_fee_rounds_up() {
    let setup = Setup::default();
    let executor = create_executor(&setup);
    setup.engine.set_flashloan_fee_bps(&setup.fee_manager, &10);

    assert_eq!(loan(&setup, &executor, 1_001).1, 2);
}

#[test]
fn test_flashloan_free() {
    let setup = Setup::default();
    let executor = create_executor(&setup);
    setup.engine.set_flashloan_fee_bps(&setup.fee_manager, &0);

    assert_eq!(loan(&setup, &executor, 1_000_000).1, 0);
    assert_eq!(setup.engine.get_protocol_fees(&setup.token0.address), 0);
}

#[test]
fn test_flashloan_surplus_counts_as_fee() {
    let setup = Setup::default();
    let executor = create_executor(&setup);
    setup.engine.set_flashloan_fee_bps(&setup.fee_manager, &10);
    executor.set_behavior(&50, &0, &false);

    assert_eq!(loan(&setup, &executor, 1_000_000).1, 1_050);
    assert_eq!(setup.engine.get_protocol_fees(&setup.token0.address), 1_050);
}

#[test]
#[should_panic(expected = "Error(Contract, #1505)")]
fn test_flashloan_not_repaid() {
    let setup = Setup::default();
    let executor = create_executor(&setup);
    setup.engine.set_flashloan_fee_bps(&setup.fee_manager, &10);
    executor.set_behavior(&0, &1, &false);

    loan(&setup, &executor, 1_000_000);
}

#[test]
#[should_panic(expected = "Error(Contract, #1502)")]
fn test_flashloan_callback_not_acknowledged() {
    let setup = Setup::default();
    let executor = create_executor(&setup);
    setup.engine.set_flashloan_fee_bps(&setup.fee_manager, &10);
    executor.set_behavior(&0, &0, &true);

    loan(&setup, &executor, 1_000_000);
}

#[test]
#[should_panic(expected = "Error(Contract, #1007)")]
fn test_flashloan_zero_amount() {
    let setup = Setup::default();
    let executor = create_executor(&setup);
    setup.engine.set_flashloan_fee_bps(&setup.fee_manager, &10);

    loan(&setup, &executor, 0);
}

#[test]
fn test_flashloan_hook_fee() {
    let setup = Setup::default();
    let executor = create_executor(&setup);
    setup.engine.set_flashloan_fee_bps(&setup.fee_manager, &1_000);
    let hook = setup.create_token_hook(0, FLASHLOAN_FEE_FLAG);
    hook.set_flashloan_quote(&None, &2_000);
    setup.set_token_hook(&setup.token0.address, &hook.address, FLASHLOAN_FEE_FLAG);

    assert_eq!(
        loan(&setup, &executor, 1_000_000),
        (setup.token0.address.clone(), 2_000)
    );
    // protocol keeps its rate of the hook priced fee
    assert_eq!(setup.engine.get_protocol_fees(&setup.token0.address), 200);
    assert_eq!(
        setup
            .engine
            .get_hook_fees_by_token(&setup.token0.address, &setup.token0.address),
        1_800
    );
}

#[test]
#[should_panic(expected = "Error(Contract, #1504)")]
fn test_flashloan_foreign_fee_token_not_allowed() {
    let setup = Setup::default();
    let executor = create_executor(&setup);
    setup.engine.set_flashloan_fee_bps(&setup.fee_manager, &1_000);
    let hook = setup.create_token_hook(0, FLASHLOAN_FEE_FLAG);
    hook.set_flashloan_quote(&Some(setup.token1.address.clone()), &2_000);
    setup.set_token_hook(&setup.token0.address, &hook.address, FLASHLOAN_FEE_FLAG);

    loan(&setup, &executor, 1_000_000);
}

#[test]
fn test_flashloan_foreign_fee_token() {
    let setup = Setup::default();
    let executor = create_executor(&setup);
    setup.engine.set_flashloan_fee_bps(&setup.fee_manager, &1_000);
    let hook = setup.create_token_hook(0, FLASHLOAN_FEE_FLAG);
    hook.set_flashloan_quote(&Some(setup.token1.address.clone()), &2_000);
    setup.set_token_hook(&setup.token0.address, &hook.address, FLASHLOAN_FEE_FLAG);
    let fee_token_hook = setup.create_token_hook(0, FLASHLOAN_FEE_TOKEN_FLAG);
    fee_token_hook.set_allow_fee_token(&true);
    setup.set_token_hook(
        &setup.token1.address,
        &fee_token_hook.address,
        FLASHLOAN_FEE_TOKEN_FLAG,
    );

    assert_eq!(
        loan(&setup, &executor, 1_000_000),
        (setup.token1.address.clone(), 2_000)
    );
    assert_eq!(setup.engine.get_protocol_fees(&setup.token1.address), 200);
    assert_eq!(setup.engine.get_protocol_fees(&setup.token0.address), 0);
    assert_eq!(
        setup
            .engine
            .get_hook_fees_by_token(&setup.token0.address, &setup.token1.address),
        1_800
    );
    assert_eq!(setup.engine_balance(&setup.token0), 1_000_000_000);
    assert_eq!(setup.engine_balance(&setup.token1), 1_000_002_000);
}

#[test]
#[should_panic(expected = "Error(Contract, #1503)")]
fn test_flashloan_fee_token_engine_address() {
    let setup = Setup::default();
    let executor = create_executor(&setup);
    setup.engine.set_flashloan_fee_bps(&setup.fee_manager, &1_000);
    let hook = setup.create_token_hook(0, FLASHLOAN_FEE_FLAG);
    hook.set_flashloan_quote(&Some(setup.engine.address.clone()), &2_000);
    setup.set_token_hook(&setup.token0.address, &hook.address, FLASHLOAN_FEE_FLAG);

    loan(&setup, &executor, 1_000_000);
}

#[test]
#[should_panic(expected = "Error(Contract, #1303)")]
fn test_hook_fee_collection_during_flashloan() {
    let setup = Setup::default();
    let e = &setup.env;
    let executor = create_executor(&setup);
    setup.engine.set_flashloan_fee_bps(&setup.fee_manager, &1_000);
    let hook = setup.create_token_hook(0, FLASHLOAN_FEE_FLAG);
    hook.set_flashloan_quote(&None, &2_000);
    hook.set_collection(&HookFeeCollection {
        token_for: setup.token0.address.clone(),
        token_fee: setup.token0.address.clone(),
        recipient: Address::generate(e),
    });
    setup.set_token_hook(&setup.token0.address, &hook.address, FLASHLOAN_FEE_FLAG);

    loan(&setup, &executor, 1_000_000);
}

#[test]
fn test_flashloan_event() {
    let setup = Setup::default();
    let e = &setup.env;
    let executor = create_executor(&setup);
    setup.engine.set_flashloan_fee_bps(&setup.fee_manager, &10);
    loan(&setup, &executor, 1_000_000);

    let event = e.events().all().last().unwrap();
    assert_eq!(event.0, setup.engine.address);
    assert_eq!(
        Symbol::try_from_val(e, &event.1.get_unchecked(0)).unwrap(),
        Symbol::new(e, "flashloan")
    );
}
