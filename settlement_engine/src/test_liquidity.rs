#![cfg(test)]
extern crate std;

use crate::testutils::{
    empty_liquidity_hooks, liquidity_params, MockLiquidityHook, MockLiquidityHookClient,
    MockPoolHook, MockPoolHookClient, Setup,
};
use crate::{EXECUTION_STATE_ADD_LIQUIDITY, EXECUTION_STATE_SWAP};
use amm_interfaces::constants::{
    ADD_LIQUIDITY_FLAG, HOOK_MANAGES_FEES_FLAG, REMOVE_LIQUIDITY_FLAG,
};
use amm_interfaces::types::{HookFeeCollection, LiquidityModificationParams, LiquidityResult};
use soroban_sdk::testutils::{Address as _, Events};
use soroban_sdk::{symbol_short, vec, Address, BytesN, Symbol, TryFromVal};

#[test]
fn test_add_liquidity() {
    let setup = Setup::default();
    let lp_balance0 = setup.balance(&setup.token0, &setup.lp);
    let lp_balance1 = setup.balance(&setup.token1, &setup.lp);

    let result = setup.add_liquidity(&setup.pool_id, 1_000, 2_000);
    assert_eq!(
        result,
        LiquidityResult {
            amount0: 1_000,
            amount1: 2_000,
            fees0: 0,
            fees1: 0,
        }
    );

    let pool = setup.engine.get_pool_state(&setup.pool_id);
    assert_eq!(pool.reserve0, 1_000_001_000);
    assert_eq!(pool.reserve1, 1_000_002_000);
    assert_eq!(setup.balance(&setup.token0, &setup.lp), lp_balance0 - 1_000);
    assert_eq!(setup.balance(&setup.token1, &setup.lp), lp_balance1 - 2_000);
}

#[test]
fn test_remove_liquidity() {
    let setup = Setup::default();
    let e = &setup.env;
    let lp_balance0 = setup.balance(&setup.token0, &setup.lp);

    let result = setup.engine.remove_liquidity(
        &setup.lp,
        &liquidity_params(e, &setup.pool_id, 400, 500),
        &empty_liquidity_hooks(e),
    );
    assert_eq!((result.amount0, result.amount1), (400, 500));

    let pool = setup.engine.get_pool_state(&setup.pool_id);
    assert_eq!(pool.reserve0, 999_999_600);
    assert_eq!(pool.reserve1, 999_999_500);
    assert_eq!(setup.balance(&setup.token0, &setup.lp), lp_balance0 + 400);
    assert_eq!(setup.engine_balance(&setup.token1), 999_999_500);

    let event = e.events().all().last().unwrap();
    assert_eq!(
        Symbol::try_from_val(e, &event.1.get_unchecked(0)).unwrap(),
        Symbol::new(e, "liquidity_removed")
    );
}

#[test]
fn test_collect_fees() {
    let setup = Setup::default();
    let e = &setup.env;
    let order = setup.order(&setup.token0.address, &setup.token1.address, 1_000_000, 0);
    setup.swap(&order, &setup.pool_id);
    let lp_balance0 = setup.balance(&setup.token0, &setup.lp);

    let result = setup.engine.collect_fees(
        &setup.lp,
        &liquidity_params(e, &setup.pool_id, 0, 0),
        &empty_liquidity_hooks(e),
    );
    assert_eq!(
        result,
        LiquidityResult {
            amount0: 0,
            amount1: 0,
            fees0: 3_000,
            fees1: 0,
        }
    );

    let pool = setup.engine.get_pool_state(&setup.pool_id);
    assert_eq!(pool.fee_balance0, 0);
    assert_eq!(pool.reserve0, 1_000_997_000);
    assert_eq!(setup.balance(&setup.token0, &setup.lp), lp_balance0 + 3_000);
}

#[test]
#[should_panic(expected = "Error(Contract, #1206)")]
fn test_add_liquidity_below_min() {
    let setup = Setup::default();
    let e = &setup.env;
    let mut params = liquidity_params(e, &setup.pool_id, 1_000, 1_000);
    params.min_amount0 = 1_001;
    setup
        .engine
        .add_liquidity(&setup.lp, &params, &empty_liquidity_hooks(e));
}

#[test]
#[should_panic(expected = "Error(Contract, #1207)")]
fn test_add_liquidity_above_max() {
    let setup = Setup::default();
    let e = &setup.env;
    let mut params = liquidity_params(e, &setup.pool_id, 1_000, 1_000);
    params.max_amount1 = 999;
    setup
        .engine
        .add_liquidity(&setup.lp, &params, &empty_liquidity_hooks(e));
}

#[test]
#[should_panic(expected = "Error(Contract, #1101)")]
fn test_add_liquidity_unknown_pool() {
    let setup = Setup::default();
    let e = &setup.env;
    let pool_id = BytesN::from_array(e, &[7; 32]);
    setup.add_liquidity(&pool_id, 1_000, 1_000);
}

#[test]
#[should_panic(expected = "Error(Contract, #1202)")]
fn test_remove_more_than_reserve() {
    let setup = Setup::default();
    let e = &setup.env;
    setup.engine.remove_liquidity(
        &setup.lp,
        &liquidity_params(e, &setup.pool_id, 1_000_000_001, 0),
        &empty_liquidity_hooks(e),
    );
}

#[test]
fn test_liquidity_hooks_order_and_fees() {
    let setup = Setup::default();
    let e = &setup.env;
    let pool_hook = MockPoolHookClient::new(e, &e.register(MockPoolHook, (0u32,)));
    let pool_id = setup.create_pool(
        &setup.token0.address,
        &setup.token1.address,
        100,
        Some(pool_hook.address.clone()),
    );
    let liquidity_hook = MockLiquidityHookClient::new(e, &e.register(MockLiquidityHook, ()));
    liquidity_hook.set_fees(&10, &20);
    pool_hook.set_liquidity_fees(&1, &2);

    let hook0 = setup.create_token_hook(0, ADD_LIQUIDITY_FLAG);
    let hook1 = setup.create_token_hook(0, ADD_LIQUIDITY_FLAG);
    setup.set_token_hook(&setup.token0.address, &hook0.address, ADD_LIQUIDITY_FLAG);
    setup.set_token_hook(&setup.token1.address, &hook1.address, ADD_LIQUIDITY_FLAG);
    hook0.set_recorder(&setup.recorder.address, &symbol_short!("t0"));
    hook1.set_recorder(&setup.recorder.address, &symbol_short!("t1"));
    liquidity_hook.set_recorder(&setup.recorder.address, &symbol_short!("lh"));
    pool_hook.set_recorder(&setup.recorder.address, &symbol_short!("ph"));
    setup.recorder.reset();

    let lp_balance0 = setup.balance(&setup.token0, &setup.lp);
    let lp_balance1 = setup.balance(&setup.token1, &setup.lp);
    let mut params = liquidity_params(e, &pool_id, 1_000, 1_000);
    params.liquidity_hook = Some(liquidity_hook.address.clone());
    params.liquidity_hook_flags = ADD_LIQUIDITY_FLAG;
    setup
        .engine
        .add_liquidity(&setup.lp, &params, &empty_liquidity_hooks(e));

    let call = |who: &str| (Symbol::new(e, who), Symbol::new(e, "liquidity"));
    assert_eq!(
        setup.recorder.calls(),
        vec![e, call("t0"), call("t1"), call("lh"), call("ph")]
    );

    // hook fees are paid on top of the deposit
    assert_eq!(
        setup.balance(&setup.token0, &setup.lp),
        lp_balance0 - 1_000 - 11
    );
    assert_eq!(
        setup.balance(&setup.token1, &setup.lp),
        lp_balance1 - 1_000 - 22
    );
    assert_eq!(
        setup.engine.get_hook_fees_by_hook(
            &liquidity_hook.address,
            &setup.token0.address,
            &setup.token0.address
        ),
        10
    );
    assert_eq!(
        setup.engine.get_hook_fees_by_hook(
            &liquidity_hook.address,
            &setup.token1.address,
            &setup.token1.address
        ),
        20
    );
    assert_eq!(
        setup.engine.get_hook_fees_by_hook(
            &pool_hook.address,
            &setup.token1.address,
            &setup.token1.address
        ),
        2
    );
    let pool = setup.engine.get_pool_state(&pool_id);
    assert_eq!((pool.reserve0, pool.reserve1), (1_000, 1_000));
}

#[test]
fn test_token_hook_liquidity_fees() {
    let setup = Setup::default();
    let hook = setup.create_token_hook(0, ADD_LIQUIDITY_FLAG | REMOVE_LIQUIDITY_FLAG);
    hook.set_liquidity_fees(&5, &7);
    setup.set_token_hook(
        &setup.token0.address,
        &hook.address,
        ADD_LIQUIDITY_FLAG | REMOVE_LIQUIDITY_FLAG,
    );

    setup.add_liquidity(&setup.pool_id, 1_000, 1_000);

    let context = hook.last_context().unwrap();
    assert_eq!(context.executor, setup.lp);
    assert_eq!(context.execution_state, EXECUTION_STATE_ADD_LIQUIDITY);
    assert_eq!(context.execution_state & EXECUTION_STATE_SWAP, 0);
    assert_eq!(
        setup
            .engine
            .get_hook_fees_by_token(&setup.token0.address, &setup.token0.address),
        5
    );
    assert_eq!(
        setup
            .engine
            .get_hook_fees_by_token(&setup.token0.address, &setup.token1.address),
        7
    );
}

#[test]
fn test_remove_liquidity_hook_fee_netted() {
    let setup = Setup::default();
    let e = &setup.env;
    let hook = setup.create_token_hook(0, REMOVE_LIQUIDITY_FLAG);
    hook.set_liquidity_fees(&100, &0);
    setup.set_token_hook(&setup.token0.address, &hook.address, REMOVE_LIQUIDITY_FLAG);
    let lp_balance0 = setup.balance(&setup.token0, &setup.lp);
    let lp_balance1 = setup.balance(&setup.token1, &setup.lp);

    setup.engine.remove_liquidity(
        &setup.lp,
        &liquidity_params(e, &setup.pool_id, 1_000, 1_000),
        &empty_liquidity_hooks(e),
    );

    assert_eq!(setup.balance(&setup.token0, &setup.lp), lp_balance0 + 900);
    assert_eq!(setup.balance(&setup.token1, &setup.lp), lp_balance1 + 1_000);
}

#[test]
fn test_hook_fee_collection_queued_during_liquidity() {
    let setup = Setup::default();
    let e = &setup.env;
    let flags = ADD_LIQUIDITY_FLAG | HOOK_MANAGES_FEES_FLAG;
    let hook = setup.create_token_hook(0, flags);
    hook.set_liquidity_fees(&50, &0);
    let fee_recipient = Address::generate(e);
    hook.set_collection(&HookFeeCollection {
        token_for: setup.token0.address.clone(),
        token_fee: setup.token0.address.clone(),
        recipient: fee_recipient.clone(),
    });
    setup.set_token_hook(&setup.token0.address, &hook.address, flags);

    setup.add_liquidity(&setup.pool_id, 1_000, 1_000);

    assert_eq!(setup.balance(&setup.token0, &fee_recipient), 50);
    assert_eq!(
        setup.engine.get_hook_fees_by_hook(
            &hook.address,
            &setup.token0.address,
            &setup.token0.address
        ),
        0
    );
}

fn liquidity_hook_params<'a>(
    setup: &Setup<'a>,
    flags: u32,
) -> (MockLiquidityHookClient<'a>, LiquidityModificationParams) {
    let e = &setup.env;
    let hook = MockLiquidityHookClient::new(e, &e.register(MockLiquidityHook, ()));
    let mut params = liquidity_params(e, &setup.pool_id, 1_000, 1_000);
    params.liquidity_hook = Some(hook.address.clone());
    params.liquidity_hook_flags = flags;
    (hook, params)
}

#[test]
#[should_panic(expected = "Error(Contract, #1301)")]
fn test_liquidity_hook_missing_required_flag() {
    let setup = Setup::default();
    let e = &setup.env;
    let (hook, params) = liquidity_hook_params(&setup, ADD_LIQUIDITY_FLAG);
    hook.set_hook_flags(&REMOVE_LIQUIDITY_FLAG, &(ADD_LIQUIDITY_FLAG | REMOVE_LIQUIDITY_FLAG));
    setup
        .engine
        .add_liquidity(&setup.lp, &params, &empty_liquidity_hooks(e));
}

#[test]
#[should_panic(expected = "Error(Contract, #1302)")]
fn test_liquidity_hook_unsupported_flag() {
    let setup = Setup::default();
    let e = &setup.env;
    let (hook, params) =
        liquidity_hook_params(&setup, ADD_LIQUIDITY_FLAG | REMOVE_LIQUIDITY_FLAG);
    hook.set_hook_flags(&0, &ADD_LIQUIDITY_FLAG);
    setup
        .engine
        .add_liquidity(&setup.lp, &params, &empty_liquidity_hooks(e));
}

#[test]
#[should_panic(expected = "Error(Contract, #1302)")]
fn test_liquidity_hook_flags_without_hook() {
    let setup = Setup::default();
    let e = &setup.env;
    let mut params = liquidity_params(e, &setup.pool_id, 1_000, 1_000);
    params.liquidity_hook_flags = ADD_LIQUIDITY_FLAG;
    setup
        .engine
        .add_liquidity(&setup.lp, &params, &empty_liquidity_hooks(e));
}

#[test]
fn test_liquidity_hook_skipped_for_disabled_operation() {
    let setup = Setup::default();
    let e = &setup.env;
    let (hook, params) = liquidity_hook_params(&setup, REMOVE_LIQUIDITY_FLAG);
    hook.set_fees(&10, &20);
    let lp_balance0 = setup.balance(&setup.token0, &setup.lp);

    setup
        .engine
        .add_liquidity(&setup.lp, &params, &empty_liquidity_hooks(e));

    assert_eq!(setup.balance(&setup.token0, &setup.lp), lp_balance0 - 1_000);
    assert_eq!(
        setup.engine.get_hook_fees_by_hook(
            &hook.address,
            &setup.token0.address,
            &setup.token0.address
        ),
        0
    );
}
