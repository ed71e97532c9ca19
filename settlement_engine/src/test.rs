#![cfg(test)]
extern crate std;

use crate::guard::{check_execution_state, ExecutionGuard};
use crate::testutils::{
    empty_creation_hooks, empty_liquidity_hooks, liquidity_params, pool_type_key,
    MockPoolHook, MockPoolHookClient, MockToken, MockTokenClient, Setup,
};
use crate::{
    DebtKey, EXECUTION_STATE_ADD_LIQUIDITY, EXECUTION_STATE_LIQUIDITY,
    EXECUTION_STATE_MULTI_SWAP, EXECUTION_STATE_POOL_SWAP, EXECUTION_STATE_SINGLE_SWAP,
    EXECUTION_STATE_SWAP,
};
use amm_interfaces::constants::{DYNAMIC_POOL_FEE_BPS, POOL_CREATION_FLAG};
use amm_interfaces::pool_id::decode_fee;
use amm_interfaces::types::{PoolCreationDetails, PoolLiquidityCall};
use soroban_sdk::testutils::{Address as _, Events};
use soroban_sdk::token::TokenClient;
use soroban_sdk::{vec, Address, Bytes, BytesN, Symbol, TryFromVal};
use utils::test_utils::sort;

#[test]
fn test_create_pool() {
    let setup = Setup::default();
    let pool = setup.engine.get_pool_state(&setup.pool_id);

    assert_eq!(pool.token0, setup.token0.address);
    assert_eq!(pool.token1, setup.token1.address);
    assert_eq!(pool.pool_hook, None);
    assert_eq!(pool.reserve0, 1_000_000_000);
    assert_eq!(pool.reserve1, 1_000_000_000);
    assert_eq!(decode_fee(&setup.pool_id), 30);
    assert_eq!(
        setup.engine.get_pool_type_strategy(&setup.pool_type),
        Some(setup.strategy.address.clone())
    );
    assert_eq!(setup.engine_balance(&setup.token0), 1_000_000_000);
}

#[test]
fn test_create_pool_event() {
    let setup = Setup::default();
    let e = &setup.env;
    let pool_id = setup.create_pool(&setup.token1.address, &setup.token2.address, 100, None);

    let event = e.events().all().last().unwrap();
    assert_eq!(event.0, setup.engine.address);
    assert_eq!(
        Symbol::try_from_val(e, &event.1.get_unchecked(0)).unwrap(),
        Symbol::new(e, "pool_created")
    );
    assert_eq!(decode_fee(&pool_id), 100);
}

#[test]
#[should_panic(expected = "Error(Contract, #1102)")]
fn test_create_pool_twice() {
    let setup = Setup::default();
    setup.create_pool(&setup.token0.address, &setup.token1.address, 30, None);
}

#[test]
fn test_same_tokens_different_fee() {
    let setup = Setup::default();
    let pool_id = setup.create_pool(&setup.token0.address, &setup.token1.address, 5, None);
    assert_ne!(pool_id, setup.pool_id);
    assert_eq!(setup.engine.get_pool_state(&pool_id).reserve0, 0);
}

#[test]
#[should_panic(expected = "Error(Contract, #1010)")]
fn test_create_pool_unsorted_tokens() {
    let setup = Setup::default();
    setup.engine.create_pool(
        &setup.lp,
        &PoolCreationDetails {
            pool_type: setup.pool_type.clone(),
            fee: 30,
            token0: setup.token2.address.clone(),
            token1: setup.token1.address.clone(),
            pool_hook: None,
            pool_params: Bytes::new(&setup.env),
        },
        &empty_creation_hooks(&setup.env),
        &None,
    );
}

#[test]
#[should_panic(expected = "Error(Contract, #1013)")]
fn test_create_pool_fee_too_high() {
    let setup = Setup::default();
    setup.create_pool(&setup.token1.address, &setup.token2.address, 10_001, None);
}

#[test]
#[should_panic(expected = "Error(Contract, #1013)")]
fn test_create_dynamic_fee_pool_without_hook() {
    let setup = Setup::default();
    setup.create_pool(
        &setup.token1.address,
        &setup.token2.address,
        DYNAMIC_POOL_FEE_BPS,
        None,
    );
}

#[test]
#[should_panic(expected = "Error(Contract, #1104)")]
fn test_create_pool_unknown_pool_type() {
    let setup = Setup::default();
    setup.engine.create_pool(
        &setup.lp,
        &PoolCreationDetails {
            pool_type: pool_type_key(&setup.env, 9),
            fee: 30,
            token0: setup.token1.address.clone(),
            token1: setup.token2.address.clone(),
            pool_hook: None,
            pool_params: Bytes::new(&setup.env),
        },
        &empty_creation_hooks(&setup.env),
        &None,
    );
}

#[test]
fn test_create_pool_without_token_code() {
    let setup = Setup::default();
    let not_a_token = Address::generate(&setup.env);
    let (token0, token1) = sort(&setup.token2.address, &not_a_token);

    let result = setup.engine.try_create_pool(
        &setup.lp,
        &PoolCreationDetails {
            pool_type: setup.pool_type.clone(),
            fee: 30,
            token0,
            token1,
            pool_hook: None,
            pool_params: Bytes::new(&setup.env),
        },
        &empty_creation_hooks(&setup.env),
        &None,
    );
    assert!(result.is_err());
}

#[test]
#[should_panic(expected = "Error(Contract, #1103)")]
fn test_create_pool_strategy_returns_foreign_id() {
    let setup = Setup::default();
    setup.strategy.set_bad_id(&true);
    setup.create_pool(&setup.token1.address, &setup.token2.address, 30, None);
}

#[test]
#[should_panic(expected = "Error(Contract, #1104)")]
fn test_register_pool_type_with_dirty_prefix() {
    let setup = Setup::default();
    let mut key = [7u8; 20];
    key[0] = 1;
    setup.engine.register_pool_type(
        &setup.operations_admin,
        &BytesN::from_array(&setup.env, &key),
        &setup.strategy.address,
    );
}

#[test]
#[should_panic(expected = "Error(Contract, #1108)")]
fn test_register_pool_type_twice() {
    let setup = Setup::default();
    setup.engine.register_pool_type(
        &setup.operations_admin,
        &setup.pool_type,
        &Address::generate(&setup.env),
    );
}

#[test]
#[should_panic(expected = "Error(Contract, #1101)")]
fn test_unknown_pool() {
    let setup = Setup::default();
    setup
        .engine
        .get_pool_state(&BytesN::from_array(&setup.env, &[3; 32]));
}

#[test]
fn test_create_pool_with_liquidity() {
    let setup = Setup::default();
    let e = &setup.env;
    let lp_balance1 = setup.balance(&setup.token1, &setup.lp);
    let lp_balance2 = setup.balance(&setup.token2, &setup.lp);

    let pool_id = setup.engine.create_pool(
        &setup.lp,
        &PoolCreationDetails {
            pool_type: setup.pool_type.clone(),
            fee: 30,
            token0: setup.token1.address.clone(),
            token1: setup.token2.address.clone(),
            pool_hook: None,
            pool_params: Bytes::new(e),
        },
        &empty_creation_hooks(e),
        &Some(PoolLiquidityCall {
            function: Symbol::new(e, "add_liquidity"),
            // pool id is filled in by the engine
            params: liquidity_params(e, &BytesN::from_array(e, &[0; 32]), 500, 700),
            hooks_data: empty_liquidity_hooks(e),
        }),
    );

    let pool = setup.engine.get_pool_state(&pool_id);
    assert_eq!((pool.reserve0, pool.reserve1), (500, 700));
    assert_eq!(setup.balance(&setup.token1, &setup.lp), lp_balance1 - 500);
    assert_eq!(setup.balance(&setup.token2, &setup.lp), lp_balance2 - 700);
}

#[test]
#[should_panic(expected = "Error(Contract, #1106)")]
fn test_create_pool_with_wrong_liquidity_call() {
    let setup = Setup::default();
    let e = &setup.env;
    setup.engine.create_pool(
        &setup.lp,
        &PoolCreationDetails {
            pool_type: setup.pool_type.clone(),
            fee: 30,
            token0: setup.token1.address.clone(),
            token1: setup.token2.address.clone(),
            pool_hook: None,
            pool_params: Bytes::new(e),
        },
        &empty_creation_hooks(e),
        &Some(PoolLiquidityCall {
            function: Symbol::new(e, "remove_liquidity"),
            params: liquidity_params(e, &BytesN::from_array(e, &[0; 32]), 500, 700),
            hooks_data: empty_liquidity_hooks(e),
        }),
    );
}

#[test]
#[should_panic(expected = "Error(Contract, #1107)")]
fn test_create_pool_with_empty_liquidity_call() {
    let setup = Setup::default();
    let e = &setup.env;
    setup.engine.create_pool(
        &setup.lp,
        &PoolCreationDetails {
            pool_type: setup.pool_type.clone(),
            fee: 30,
            token0: setup.token1.address.clone(),
            token1: setup.token2.address.clone(),
            pool_hook: None,
            pool_params: Bytes::new(e),
        },
        &empty_creation_hooks(e),
        &Some(PoolLiquidityCall {
            function: Symbol::new(e, "add_liquidity"),
            params: liquidity_params(e, &BytesN::from_array(e, &[0; 32]), 0, 0),
            hooks_data: empty_liquidity_hooks(e),
        }),
    );
}

#[test]
fn test_pool_creation_hooks_order() {
    let setup = Setup::default();
    let e = &setup.env;
    let hook1 = setup.create_token_hook(0, POOL_CREATION_FLAG);
    let hook2 = setup.create_token_hook(0, POOL_CREATION_FLAG);
    let pool_hook = MockPoolHookClient::new(e, &e.register(MockPoolHook, (0u32,)));
    hook1.set_recorder(&setup.recorder.address, &Symbol::new(e, "token1"));
    hook2.set_recorder(&setup.recorder.address, &Symbol::new(e, "token2"));
    pool_hook.set_recorder(&setup.recorder.address, &Symbol::new(e, "pool_hook"));
    setup.set_token_hook(&setup.token1.address, &hook1.address, POOL_CREATION_FLAG);
    setup.set_token_hook(&setup.token2.address, &hook2.address, POOL_CREATION_FLAG);

    setup.create_pool(
        &setup.token1.address,
        &setup.token2.address,
        30,
        Some(pool_hook.address.clone()),
    );

    let creation = Symbol::new(e, "creation");
    assert_eq!(
        setup.recorder.calls(),
        vec![
            e,
            (Symbol::new(e, "token1"), creation.clone()),
            (Symbol::new(e, "token2"), creation.clone()),
            (Symbol::new(e, "pool_hook"), creation),
        ]
    );
}

#[test]
fn test_pool_creation_vetoed_by_pool_hook() {
    let setup = Setup::default();
    let e = &setup.env;
    let pool_hook = MockPoolHookClient::new(e, &e.register(MockPoolHook, (0u32,)));
    pool_hook.set_veto(&true);

    let (token0, token1) = sort(&setup.token1.address, &setup.token2.address);
    let result = setup.engine.try_create_pool(
        &setup.lp,
        &PoolCreationDetails {
            pool_type: setup.pool_type.clone(),
            fee: 30,
            token0,
            token1,
            pool_hook: Some(pool_hook.address.clone()),
            pool_params: Bytes::new(e),
        },
        &empty_creation_hooks(e),
        &None,
    );
    assert!(result.is_err());
}

#[test]
fn test_execution_state_layers() {
    let setup = Setup::default();
    let e = &setup.env;

    assert!(!setup.engine.check_execution_state(&EXECUTION_STATE_SWAP));
    e.as_contract(&setup.engine.address, || {
        let guard = ExecutionGuard::acquire(e, EXECUTION_STATE_SINGLE_SWAP);
        assert!(check_execution_state(e, EXECUTION_STATE_SWAP));
        assert!(check_execution_state(e, EXECUTION_STATE_POOL_SWAP));
        assert!(check_execution_state(e, EXECUTION_STATE_SINGLE_SWAP));
        assert!(!check_execution_state(e, EXECUTION_STATE_MULTI_SWAP));
        assert!(!check_execution_state(e, EXECUTION_STATE_LIQUIDITY));
        assert!(!check_execution_state(e, 0));
        drop(guard);

        assert!(!check_execution_state(e, EXECUTION_STATE_SWAP));
        let _guard = ExecutionGuard::acquire(e, EXECUTION_STATE_ADD_LIQUIDITY);
        assert!(check_execution_state(e, EXECUTION_STATE_LIQUIDITY));
        assert!(!check_execution_state(e, EXECUTION_STATE_SWAP));
    });
}

#[test]
#[should_panic(expected = "Error(Contract, #1601)")]
fn test_nested_liquidity_operation_rejected() {
    let setup = Setup::default();
    let e = &setup.env;
    e.as_contract(&setup.engine.address, || {
        let _outer = ExecutionGuard::acquire(e, EXECUTION_STATE_ADD_LIQUIDITY);
        crate::liquidity::add_liquidity(
            e,
            &setup.lp,
            &liquidity_params(e, &setup.pool_id, 10, 10),
            &empty_liquidity_hooks(e),
        );
    });
}

fn mock_token_pool(setup: &Setup) -> (MockTokenClient<'static>, BytesN<32>) {
    let e = &setup.env;
    let token = MockTokenClient::new(e, &e.register(MockToken, (setup.token_admin.clone(),)));
    token.mint(&setup.lp, &1_000_000_000);
    for user in setup.users.iter() {
        token.mint(user, &1_000_000_000);
    }
    let pool_id = setup.create_pool(&token.address, &setup.token0.address, 0, None);
    setup.add_liquidity(&pool_id, 100_000_000, 100_000_000);
    (token, pool_id)
}

#[test]
fn test_failed_payout_becomes_debt() {
    let setup = Setup::default();
    let e = &setup.env;
    let (token, pool_id) = mock_token_pool(&setup);
    let recipient = setup.users[1].clone();
    token.set_blocked(&recipient, &true);

    let order = setup.order(&setup.token0.address, &token.address, 10_000, 0);
    let (amount_in, amount_out) = setup.swap(&order, &pool_id);
    assert_eq!((amount_in, amount_out), (10_000, 10_000));
    assert_eq!(token.balance(&recipient), 1_000_000_000);
    assert_eq!(setup.engine.get_tokens_owed(&recipient, &token.address), 10_000);

    // still blocked: the claim fails and the debt survives
    assert!(setup
        .engine
        .try_claim_tokens_owed(&recipient, &token.address)
        .is_err());
    assert_eq!(setup.engine.get_tokens_owed(&recipient, &token.address), 10_000);

    // second failed payout accumulates under the same key
    setup.swap(&order, &pool_id);
    assert_eq!(setup.engine.get_tokens_owed(&recipient, &token.address), 20_000);

    token.set_blocked(&recipient, &false);
    assert_eq!(setup.engine.claim_tokens_owed(&recipient, &token.address), 20_000);
    assert_eq!(token.balance(&recipient), 1_000_020_000);
    assert_eq!(setup.engine.get_tokens_owed(&recipient, &token.address), 0);
    assert_eq!(setup.engine.claim_tokens_owed(&recipient, &token.address), 0);
    assert_eq!(token.balance(&recipient), 1_000_020_000);
}

#[test]
fn test_debt_namespaces_are_separate() {
    let setup = Setup::default();
    let e = &setup.env;
    let owner = Address::generate(e);
    let token = setup.token0.address.clone();

    e.as_contract(&setup.engine.address, || {
        crate::debt_ledger::credit(e, &DebtKey::TokensOwed(owner.clone(), token.clone()), 5);
        crate::debt_ledger::credit(
            e,
            &DebtKey::HookFeeByHook(owner.clone(), token.clone(), token.clone()),
            7,
        );
        crate::debt_ledger::credit(e, &DebtKey::HookFeeByToken(token.clone(), token.clone()), 9);
    });

    assert_eq!(setup.engine.get_tokens_owed(&owner, &token), 5);
    assert_eq!(setup.engine.get_hook_fees_by_hook(&owner, &token, &token), 7);
    assert_eq!(setup.engine.get_hook_fees_by_token(&token, &token), 9);
    assert_eq!(setup.engine.claim_tokens_owed(&owner, &token), 5);
    assert_eq!(TokenClient::new(e, &token).balance(&owner), 5);
    assert_eq!(setup.engine.get_hook_fees_by_hook(&owner, &token, &token), 7);
    assert_eq!(setup.engine.get_hook_fees_by_token(&token, &token), 9);
}

#[test]
fn test_version() {
    let setup = Setup::default();
    assert_eq!(setup.engine.version(), 100);
}
