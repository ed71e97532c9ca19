#![cfg(test)]
extern crate std;

use crate::testutils::{
    empty_swap_hooks, no_exchange_fee, no_fee_on_top, MockPoolHook, MockPoolHookClient,
    MockTransferHandler, MockTransferHandlerClient, Setup,
};
use crate::EXECUTION_STATE_SINGLE_SWAP;
use amm_interfaces::constants::{
    ADD_LIQUIDITY_FLAG, AFTER_SWAP_FLAG, BEFORE_SWAP_FLAG, DYNAMIC_POOL_FEE_BPS,
    HOOK_MANAGES_FEES_FLAG,
};
use amm_interfaces::types::{
    BpsFeeWithRecipient, DirectSwapParams, HookFeeCollection, SwapHooksExtraData, TokenSettings,
    TransferHandlerData,
};
use soroban_sdk::testutils::{Address as _, Events};
use soroban_sdk::token::StellarAssetClient;
use soroban_sdk::{symbol_short, vec, Address, Bytes, BytesN, Symbol, TryFromVal, Vec};
use utils::test_utils::jump;

fn token1_token2_pool(setup: &Setup, liquidity: u128) -> BytesN<32> {
    let pool_id = setup.create_pool(&setup.token1.address, &setup.token2.address, 30, None);
    setup.add_liquidity(&pool_id, liquidity, liquidity);
    pool_id
}

fn multi_swap_hooks(setup: &Setup, hops: u32) -> Vec<SwapHooksExtraData> {
    let mut hooks_data = Vec::new(&setup.env);
    for _ in 0..hops {
        hooks_data.push_back(empty_swap_hooks(&setup.env));
    }
    hooks_data
}

#[test]
fn test_swap_exact_input() {
    let setup = Setup::default();
    let executor = &setup.users[0];
    let recipient = &setup.users[1];
    let executor_balance = setup.balance(&setup.token0, executor);

    let order = setup.order(&setup.token0.address, &setup.token1.address, 1_000_000, 997_000);
    assert_eq!(setup.swap(&order, &setup.pool_id), (1_000_000, 997_000));

    assert_eq!(
        setup.balance(&setup.token0, executor),
        executor_balance - 1_000_000
    );
    assert_eq!(
        setup.balance(&setup.token1, recipient),
        1_000_000_000_000 + 997_000
    );
    let pool = setup.engine.get_pool_state(&setup.pool_id);
    assert_eq!(pool.reserve0, 1_000_997_000);
    assert_eq!(pool.reserve1, 999_003_000);
    assert_eq!(pool.fee_balance0, 3_000);
    assert_eq!(pool.fee_balance1, 0);
}

#[test]
fn test_swap_exact_output() {
    let setup = Setup::default();
    let order = setup.order(&setup.token1.address, &setup.token0.address, -100_000, 100_301);
    assert_eq!(setup.swap(&order, &setup.pool_id), (100_301, 100_000));

    let pool = setup.engine.get_pool_state(&setup.pool_id);
    assert_eq!(pool.reserve0, 999_900_000);
    assert_eq!(pool.reserve1, 1_000_100_000);
    assert_eq!(pool.fee_balance1, 301);
}

#[test]
#[should_panic(expected = "Error(Contract, #1008)")]
fn test_swap_limit_not_met() {
    let setup = Setup::default();
    let order = setup.order(&setup.token0.address, &setup.token1.address, 1_000_000, 997_001);
    setup.swap(&order, &setup.pool_id);
}

#[test]
#[should_panic(expected = "Error(Contract, #1001)")]
fn test_swap_deadline_expired() {
    let setup = Setup::default();
    let order = setup.order(&setup.token0.address, &setup.token1.address, 1_000_000, 0);
    jump(&setup.env, 1001);
    setup.swap(&order, &setup.pool_id);
}

#[test]
fn test_swap_at_deadline() {
    let setup = Setup::default();
    let order = setup.order(&setup.token0.address, &setup.token1.address, 1_000_000, 0);
    jump(&setup.env, 1000);
    assert_eq!(setup.swap(&order, &setup.pool_id).1, 997_000);
}

#[test]
#[should_panic(expected = "Error(Contract, #1002)")]
fn test_swap_to_engine_address() {
    let setup = Setup::default();
    let mut order = setup.order(&setup.token0.address, &setup.token1.address, 1_000_000, 0);
    order.recipient = setup.engine.address.clone();
    setup.swap(&order, &setup.pool_id);
}

#[test]
#[should_panic(expected = "Error(Contract, #1003)")]
fn test_swap_fee_to_engine_address() {
    let setup = Setup::default();
    let e = &setup.env;
    let order = setup.order(&setup.token0.address, &setup.token1.address, 1_000_000, 0);
    setup.engine.single_swap(
        &setup.users[0],
        &order,
        &setup.pool_id,
        &BpsFeeWithRecipient {
            recipient: setup.engine.address.clone(),
            bps: 10,
        },
        &no_fee_on_top(e),
        &empty_swap_hooks(e),
        &None,
    );
}

#[test]
#[should_panic(expected = "Error(Contract, #1007)")]
fn test_swap_zero_amount() {
    let setup = Setup::default();
    let order = setup.order(&setup.token0.address, &setup.token1.address, 0, 0);
    setup.swap(&order, &setup.pool_id);
}

#[test]
#[should_panic(expected = "Error(Contract, #1006)")]
fn test_swap_same_token() {
    let setup = Setup::default();
    let order = setup.order(&setup.token0.address, &setup.token0.address, 1_000, 0);
    setup.swap(&order, &setup.pool_id);
}

#[test]
#[should_panic(expected = "Error(Contract, #1006)")]
fn test_swap_token_not_in_pool() {
    let setup = Setup::default();
    let order = setup.order(&setup.token2.address, &setup.token1.address, 1_000, 0);
    setup.swap(&order, &setup.pool_id);
}

#[test]
fn test_multi_swap() {
    let setup = Setup::default();
    let e = &setup.env;
    let second_pool = token1_token2_pool(&setup, 1_000_000_000);

    let order = setup.order(&setup.token0.address, &setup.token2.address, 1_000_000, 0);
    let result = setup.engine.multi_swap(
        &setup.users[0],
        &order,
        &vec![e, setup.pool_id.clone(), second_pool.clone()],
        &no_exchange_fee(e),
        &no_fee_on_top(e),
        &multi_swap_hooks(&setup, 2),
        &None,
    );

    // output of the first hop is the input of the second
    assert_eq!(setup.strategy.last_swap().unwrap().amount, 997_000);
    assert_eq!(result, (1_000_000, 994_009));
    assert_eq!(
        setup.balance(&setup.token2, &setup.users[1]),
        1_000_000_000_000 + 994_009
    );
    // intermediate token stays inside the pools
    assert_eq!(setup.engine_balance(&setup.token1), 2_000_000_000);
}

#[test]
fn test_multi_swap_exchange_fee() {
    let setup = Setup::default();
    let e = &setup.env;
    let second_pool = token1_token2_pool(&setup, 1_000_000_000);
    let exchange_fee = BpsFeeWithRecipient {
        recipient: Address::generate(e),
        bps: 100,
    };

    let order = setup.order(&setup.token0.address, &setup.token2.address, 1_000_000, 0);
    let result = setup.engine.multi_swap(
        &setup.users[0],
        &order,
        &vec![e, setup.pool_id.clone(), second_pool],
        &exchange_fee,
        &no_fee_on_top(e),
        &multi_swap_hooks(&setup, 2),
        &None,
    );

    assert_eq!(setup.strategy.last_swap().unwrap().amount, 987_030);
    assert_eq!(result, (1_000_000, 984_069));
    assert_eq!(setup.balance(&setup.token0, &exchange_fee.recipient), 10_000);
}

#[test]
fn test_multi_swap_exact_output() {
    let setup = Setup::default();
    let e = &setup.env;
    let second_pool = token1_token2_pool(&setup, 1_000_000_000);

    let order = setup.order(&setup.token0.address, &setup.token2.address, -100_000, u128::MAX);
    let result = setup.engine.multi_swap(
        &setup.users[0],
        &order,
        &vec![e, setup.pool_id.clone(), second_pool],
        &no_exchange_fee(e),
        &no_fee_on_top(e),
        &multi_swap_hooks(&setup, 2),
        &None,
    );

    // pools are walked backwards: the first hop has to deliver what the second one needs
    assert_eq!(setup.strategy.last_swap().unwrap().amount, 100_301);
    assert_eq!(result, (100_603, 100_000));
}

#[test]
#[should_panic(expected = "Error(Contract, #1004)")]
fn test_multi_swap_hooks_data_mismatch() {
    let setup = Setup::default();
    let e = &setup.env;
    let second_pool = token1_token2_pool(&setup, 1_000_000_000);

    let order = setup.order(&setup.token0.address, &setup.token2.address, 1_000_000, 0);
    setup.engine.multi_swap(
        &setup.users[0],
        &order,
        &vec![e, setup.pool_id.clone(), second_pool],
        &no_exchange_fee(e),
        &no_fee_on_top(e),
        &multi_swap_hooks(&setup, 1),
        &None,
    );
}

#[test]
#[should_panic(expected = "Error(Contract, #1006)")]
fn test_multi_swap_empty_route() {
    let setup = Setup::default();
    let e = &setup.env;
    let order = setup.order(&setup.token0.address, &setup.token1.address, 1_000_000, 0);
    setup.engine.multi_swap(
        &setup.users[0],
        &order,
        &Vec::new(e),
        &no_exchange_fee(e),
        &no_fee_on_top(e),
        &Vec::new(e),
        &None,
    );
}

#[test]
#[should_panic(expected = "Error(Contract, #1006)")]
fn test_multi_swap_route_ends_elsewhere() {
    let setup = Setup::default();
    let e = &setup.env;
    let order = setup.order(&setup.token0.address, &setup.token2.address, 1_000_000, 0);
    setup.engine.multi_swap(
        &setup.users[0],
        &order,
        &vec![e, setup.pool_id.clone(), setup.pool_id.clone()],
        &no_exchange_fee(e),
        &no_fee_on_top(e),
        &multi_swap_hooks(&setup, 2),
        &None,
    );
}

#[test]
fn test_partial_fill_first_hop() {
    let setup = Setup::default();
    let small_pool = setup.create_pool(&setup.token0.address, &setup.token2.address, 30, None);
    setup.add_liquidity(&small_pool, 1_000, 1_000);
    let executor_balance = setup.balance(&setup.token0, &setup.users[0]);

    let order = setup.order(&setup.token0.address, &setup.token2.address, 5_000, 0);
    assert_eq!(setup.swap(&order, &small_pool), (1_004, 1_000));
    assert_eq!(
        setup.balance(&setup.token0, &setup.users[0]),
        executor_balance - 1_004
    );
    assert_eq!(setup.engine.get_pool_state(&small_pool).reserve1, 0);
}

#[test]
fn test_partial_fill_charges_fees_on_consumed_input() {
    let setup = Setup::default();
    let e = &setup.env;
    let small_pool = setup.create_pool(&setup.token0.address, &setup.token2.address, 30, None);
    setup.add_liquidity(&small_pool, 1_000, 1_000);
    setup.engine.set_token_settings(
        &setup.token_admin,
        &setup.token0.address,
        &TokenSettings {
            hop_fee_bps: 100,
            flags: 0,
            hook: None,
        },
    );
    let exchange_recipient = Address::generate(e);
    let executor_balance = setup.balance(&setup.token0, &setup.users[0]);

    let order = setup.order(&setup.token0.address, &setup.token2.address, 5_000, 0);
    let result = setup.engine.single_swap(
        &setup.users[0],
        &order,
        &small_pool,
        &BpsFeeWithRecipient {
            recipient: exchange_recipient.clone(),
            bps: 1_000,
        },
        &no_fee_on_top(e),
        &empty_swap_hooks(e),
        &None,
    );

    // pool takes 1004, hop fee ceil(1004 * 100 / 9900) = 11, exchange fee ceil(1015 * 1000 / 9000) = 113
    assert_eq!(result, (1_128, 1_000));
    assert_eq!(
        setup.balance(&setup.token0, &setup.users[0]),
        executor_balance - 1_128
    );
    assert_eq!(setup.balance(&setup.token0, &exchange_recipient), 113);
    assert_eq!(
        setup
            .engine
            .get_hook_fees_by_token(&setup.token0.address, &setup.token0.address),
        11
    );
}

#[test]
#[should_panic(expected = "Error(Contract, #1012)")]
fn test_partial_fill_second_hop() {
    let setup = Setup::default();
    let e = &setup.env;
    let small_pool = token1_token2_pool(&setup, 1_000);

    let order = setup.order(&setup.token0.address, &setup.token2.address, 5_000, 0);
    setup.engine.multi_swap(
        &setup.users[0],
        &order,
        &vec![e, setup.pool_id.clone(), small_pool],
        &no_exchange_fee(e),
        &no_fee_on_top(e),
        &multi_swap_hooks(&setup, 2),
        &None,
    );
}

#[test]
#[should_panic(expected = "Error(Contract, #1012)")]
fn test_exact_output_above_reserve() {
    let setup = Setup::default();
    let small_pool = token1_token2_pool(&setup, 1_000);
    let order = setup.order(&setup.token1.address, &setup.token2.address, -5_000, u128::MAX);
    setup.swap(&order, &small_pool);
}

#[test]
fn test_token_hook_fees() {
    let setup = Setup::default();
    let hook = setup.create_token_hook(0, BEFORE_SWAP_FLAG | AFTER_SWAP_FLAG);
    hook.set_swap_fees(&1_000, &500);
    setup.set_token_hook(
        &setup.token1.address,
        &hook.address,
        BEFORE_SWAP_FLAG | AFTER_SWAP_FLAG,
    );

    let order = setup.order(&setup.token0.address, &setup.token1.address, 1_000_000, 0);
    assert_eq!(setup.swap(&order, &setup.pool_id), (1_000_000, 995_503));

    let context = hook.last_context().unwrap();
    assert_eq!(context.executor, setup.users[0]);
    assert_eq!(context.execution_state, EXECUTION_STATE_SINGLE_SWAP);
    let swap = hook.last_swap().unwrap();
    assert_eq!(swap.amount_in, 999_000);
    assert_eq!(swap.amount_out, 996_003);

    // before-swap fee in the specified token, after-swap fee in the other one
    assert_eq!(
        setup
            .engine
            .get_hook_fees_by_token(&setup.token1.address, &setup.token0.address),
        1_000
    );
    assert_eq!(
        setup
            .engine
            .get_hook_fees_by_token(&setup.token1.address, &setup.token1.address),
        500
    );
    assert!(!setup.engine.check_execution_state(&EXECUTION_STATE_SINGLE_SWAP));
}

#[test]
fn test_swap_call_order() {
    let setup = Setup::default();
    let e = &setup.env;
    let pool_hook = MockPoolHookClient::new(e, &e.register(MockPoolHook, (25u32,)));
    let pool_id = setup.create_pool(
        &setup.token0.address,
        &setup.token1.address,
        DYNAMIC_POOL_FEE_BPS,
        Some(pool_hook.address.clone()),
    );
    setup.add_liquidity(&pool_id, 1_000_000_000, 1_000_000_000);

    let flags = BEFORE_SWAP_FLAG | AFTER_SWAP_FLAG;
    let hook_in = setup.create_token_hook(0, flags);
    let hook_out = setup.create_token_hook(0, flags);
    setup.set_token_hook(&setup.token0.address, &hook_in.address, flags);
    setup.set_token_hook(&setup.token1.address, &hook_out.address, flags);
    hook_in.set_recorder(&setup.recorder.address, &symbol_short!("tin"));
    hook_out.set_recorder(&setup.recorder.address, &symbol_short!("tout"));
    pool_hook.set_recorder(&setup.recorder.address, &symbol_short!("phook"));
    setup.strategy.set_recorder(&setup.recorder.address);
    setup.recorder.reset();

    let order = setup.order(&setup.token0.address, &setup.token1.address, 1_000_000, 0);
    assert_eq!(setup.swap(&order, &pool_id), (1_000_000, 997_500));
    assert_eq!(setup.strategy.last_swap().unwrap().pool_fee_bps, 25);

    let call = |who: &str, what: &str| (Symbol::new(e, who), Symbol::new(e, what));
    assert_eq!(
        setup.recorder.calls(),
        vec![
            e,
            call("tin", "before_swap"),
            call("tout", "before_swap"),
            call("phook", "pool_fee"),
            call("pool", "swap"),
            call("tin", "after_swap"),
            call("tout", "after_swap"),
        ]
    );
}

#[test]
fn test_static_fee_skips_pool_hook() {
    let setup = Setup::default();
    let e = &setup.env;
    let pool_hook = MockPoolHookClient::new(e, &e.register(MockPoolHook, (25u32,)));
    let pool_id = setup.create_pool(
        &setup.token0.address,
        &setup.token1.address,
        100,
        Some(pool_hook.address.clone()),
    );
    setup.add_liquidity(&pool_id, 1_000_000_000, 1_000_000_000);
    pool_hook.set_recorder(&setup.recorder.address, &symbol_short!("phook"));
    setup.recorder.reset();

    let order = setup.order(&setup.token0.address, &setup.token1.address, 1_000_000, 0);
    assert_eq!(setup.swap(&order, &pool_id), (1_000_000, 990_000));
    assert_eq!(setup.recorder.calls(), Vec::new(e));
}

#[test]
fn test_token_hook_veto() {
    let setup = Setup::default();
    let hook = setup.create_token_hook(0, BEFORE_SWAP_FLAG);
    setup.set_token_hook(&setup.token1.address, &hook.address, BEFORE_SWAP_FLAG);
    hook.set_veto(&true);

    let order = setup.order(&setup.token0.address, &setup.token1.address, 1_000_000, 0);
    assert!(setup
        .engine
        .try_single_swap(
            &setup.users[0],
            &order,
            &setup.pool_id,
            &no_exchange_fee(&setup.env),
            &no_fee_on_top(&setup.env),
            &empty_swap_hooks(&setup.env),
            &None,
        )
        .is_err());
    assert_eq!(
        setup.engine.get_pool_state(&setup.pool_id).reserve0,
        1_000_000_000
    );
}

#[test]
#[should_panic(expected = "Error(Contract, #1301)")]
fn test_token_settings_missing_required_flag() {
    let setup = Setup::default();
    let hook = setup.create_token_hook(BEFORE_SWAP_FLAG, BEFORE_SWAP_FLAG | AFTER_SWAP_FLAG);
    setup.set_token_hook(&setup.token0.address, &hook.address, AFTER_SWAP_FLAG);
}

#[test]
#[should_panic(expected = "Error(Contract, #1302)")]
fn test_token_settings_unsupported_flag() {
    let setup = Setup::default();
    let hook = setup.create_token_hook(0, BEFORE_SWAP_FLAG);
    setup.set_token_hook(
        &setup.token0.address,
        &hook.address,
        BEFORE_SWAP_FLAG | ADD_LIQUIDITY_FLAG,
    );
}

#[test]
#[should_panic(expected = "Error(Contract, #1005)")]
fn test_token_settings_hop_fee_above_max() {
    let setup = Setup::default();
    setup.engine.set_token_settings(
        &setup.token_admin,
        &setup.token0.address,
        &TokenSettings {
            hop_fee_bps: 10_001,
            flags: 0,
            hook: None,
        },
    );
}

#[test]
fn test_token_settings_stored() {
    let setup = Setup::default();
    let hook = setup.create_token_hook(BEFORE_SWAP_FLAG, BEFORE_SWAP_FLAG | AFTER_SWAP_FLAG);
    setup.set_token_hook(&setup.token0.address, &hook.address, BEFORE_SWAP_FLAG);
    assert_eq!(
        setup.engine.get_token_settings(&setup.token0.address),
        TokenSettings {
            hop_fee_bps: 0,
            flags: BEFORE_SWAP_FLAG,
            hook: Some(hook.address.clone()),
        }
    );
}

#[test]
fn test_hook_managed_fees_collected_after_settlement() {
    let setup = Setup::default();
    let e = &setup.env;
    let flags = BEFORE_SWAP_FLAG | HOOK_MANAGES_FEES_FLAG;
    let hook = setup.create_token_hook(0, flags);
    setup.set_token_hook(&setup.token1.address, &hook.address, flags);
    hook.set_swap_fees(&1_000, &0);
    let fee_recipient = Address::generate(e);
    hook.set_collection(&HookFeeCollection {
        token_for: setup.token1.address.clone(),
        token_fee: setup.token0.address.clone(),
        recipient: fee_recipient.clone(),
    });

    let order = setup.order(&setup.token0.address, &setup.token1.address, 1_000_000, 0);
    setup.swap(&order, &setup.pool_id);

    assert_eq!(setup.balance(&setup.token0, &fee_recipient), 1_000);
    assert_eq!(
        setup.engine.get_hook_fees_by_hook(
            &hook.address,
            &setup.token1.address,
            &setup.token0.address
        ),
        0
    );
    assert_eq!(
        setup
            .engine
            .get_hook_fees_by_token(&setup.token1.address, &setup.token0.address),
        0
    );
}

#[test]
fn test_hook_collects_own_fees() {
    let setup = Setup::default();
    let e = &setup.env;
    let flags = BEFORE_SWAP_FLAG | HOOK_MANAGES_FEES_FLAG;
    let hook = setup.create_token_hook(0, flags);
    setup.set_token_hook(&setup.token1.address, &hook.address, flags);
    hook.set_swap_fees(&1_000, &0);

    let order = setup.order(&setup.token0.address, &setup.token1.address, 1_000_000, 0);
    setup.swap(&order, &setup.pool_id);
    assert_eq!(
        setup.engine.get_hook_fees_by_hook(
            &hook.address,
            &setup.token1.address,
            &setup.token0.address
        ),
        1_000
    );

    let fee_recipient = Address::generate(e);
    assert_eq!(
        setup.engine.collect_hook_fees_by_hook(
            &hook.address,
            &setup.token1.address,
            &setup.token0.address,
            &fee_recipient,
        ),
        1_000
    );
    assert_eq!(setup.balance(&setup.token0, &fee_recipient), 1_000);
}

#[test]
fn test_swap_with_transfer_handler() {
    let setup = Setup::default();
    let e = &setup.env;
    let handler = MockTransferHandlerClient::new(
        e,
        &e.register(MockTransferHandler, (setup.engine.address.clone(),)),
    );
    StellarAssetClient::new(e, &setup.token0.address).mint(&handler.address, &1_000_000);
    let executor_balance = setup.balance(&setup.token0, &setup.users[0]);

    let order = setup.order(&setup.token0.address, &setup.token1.address, 1_000_000, 0);
    let result = setup.engine.single_swap(
        &setup.users[0],
        &order,
        &setup.pool_id,
        &no_exchange_fee(e),
        &no_fee_on_top(e),
        &empty_swap_hooks(e),
        &Some(TransferHandlerData {
            handler: handler.address.clone(),
            data: Bytes::new(e),
        }),
    );

    assert_eq!(result, (1_000_000, 997_000));
    assert_eq!(handler.last_payer(), Some(setup.users[0].clone()));
    assert_eq!(setup.balance(&setup.token0, &handler.address), 0);
    assert_eq!(setup.balance(&setup.token0, &setup.users[0]), executor_balance);
}

#[test]
#[should_panic(expected = "Error(Contract, #1402)")]
fn test_transfer_handler_shortfall() {
    let setup = Setup::default();
    let e = &setup.env;
    let handler = MockTransferHandlerClient::new(
        e,
        &e.register(MockTransferHandler, (setup.engine.address.clone(),)),
    );
    StellarAssetClient::new(e, &setup.token0.address).mint(&handler.address, &1_000_000);
    handler.set_shortfall(&1);

    let order = setup.order(&setup.token0.address, &setup.token1.address, 1_000_000, 0);
    setup.engine.single_swap(
        &setup.users[0],
        &order,
        &setup.pool_id,
        &no_exchange_fee(e),
        &no_fee_on_top(e),
        &empty_swap_hooks(e),
        &Some(TransferHandlerData {
            handler: handler.address.clone(),
            data: Bytes::new(e),
        }),
    );
}

#[test]
fn test_direct_swap_exact_input() {
    let setup = Setup::default();
    let e = &setup.env;
    let executor = &setup.users[0];
    let trader = &setup.users[1];

    let order = setup.order(&setup.token0.address, &setup.token1.address, 1_000_000, 990_000);
    let result = setup.engine.direct_swap(
        executor,
        &order,
        &DirectSwapParams {
            swap_amount: 990_000,
        },
        &no_exchange_fee(e),
        &no_fee_on_top(e),
        &empty_swap_hooks(e),
        &None,
    );

    assert_eq!(result, (1_000_000, 990_000));
    let initial = 1_000_000_000_000u128;
    assert_eq!(setup.balance(&setup.token0, trader), initial - 1_000_000);
    assert_eq!(setup.balance(&setup.token1, trader), initial + 990_000);
    assert_eq!(setup.balance(&setup.token0, executor), initial + 1_000_000);
    assert_eq!(setup.balance(&setup.token1, executor), initial - 990_000);
    // pools are not touched
    assert_eq!(
        setup.engine.get_pool_state(&setup.pool_id).reserve0,
        1_000_000_000
    );
}

#[test]
fn test_direct_swap_exact_output() {
    let setup = Setup::default();
    let e = &setup.env;
    let executor = &setup.users[0];
    let exchange_fee = BpsFeeWithRecipient {
        recipient: Address::generate(e),
        bps: 100,
    };

    let order = setup.order(&setup.token0.address, &setup.token1.address, -500_000, 510_102);
    let result = setup.engine.direct_swap(
        executor,
        &order,
        &DirectSwapParams {
            swap_amount: 505_000,
        },
        &exchange_fee,
        &no_fee_on_top(e),
        &empty_swap_hooks(e),
        &None,
    );

    assert_eq!(result, (510_102, 500_000));
    let initial = 1_000_000_000_000u128;
    assert_eq!(setup.balance(&setup.token0, executor), initial + 505_000);
    assert_eq!(setup.balance(&setup.token1, executor), initial - 500_000);
    assert_eq!(setup.balance(&setup.token0, &exchange_fee.recipient), 5_102);
}

#[test]
#[should_panic(expected = "Error(Contract, #1011)")]
fn test_direct_swap_pool_hook_data() {
    let setup = Setup::default();
    let e = &setup.env;
    let mut hooks_data = empty_swap_hooks(e);
    hooks_data.pool_hook = Bytes::from_array(e, &[1]);

    let order = setup.order(&setup.token0.address, &setup.token1.address, 1_000_000, 0);
    setup.engine.direct_swap(
        &setup.users[0],
        &order,
        &DirectSwapParams {
            swap_amount: 990_000,
        },
        &no_exchange_fee(e),
        &no_fee_on_top(e),
        &hooks_data,
        &None,
    );
}

#[test]
fn test_swap_event() {
    let setup = Setup::default();
    let e = &setup.env;
    let order = setup.order(&setup.token0.address, &setup.token1.address, 1_000_000, 0);
    setup.swap(&order, &setup.pool_id);

    let event = e.events().all().last().unwrap();
    assert_eq!(event.0, setup.engine.address);
    assert_eq!(
        Symbol::try_from_val(e, &event.1.get_unchecked(0)).unwrap(),
        Symbol::new(e, "swap")
    );
    assert_eq!(
        Symbol::try_from_val(e, &event.1.get_unchecked(1)).unwrap(),
        Symbol::new(e, "single")
    );
}
