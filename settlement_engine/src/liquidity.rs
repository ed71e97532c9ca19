use crate::errors::EngineError;
use crate::events::{Events, SettlementEvents};
use crate::fees::{checked_add, checked_sub};
use crate::guard::{
    ExecutionGuard, EXECUTION_STATE_ADD_LIQUIDITY, EXECUTION_STATE_COLLECT_FEES,
    EXECUTION_STATE_REMOVE_LIQUIDITY,
};
use crate::hooks;
use crate::registry;
use crate::settlement::{collect, pay_or_credit};
use crate::storage::{get_pool, put_pool};
use amm_interfaces::types::{
    HookLiquidityParams, LiquidityHooksExtraData, LiquidityModificationParams,
    LiquidityOperation, LiquidityResult, PoolLiquidityParams,
};
use soroban_sdk::{panic_with_error, Address, Env};

pub(crate) fn add_liquidity(
    e: &Env,
    provider: &Address,
    params: &LiquidityModificationParams,
    hooks_data: &LiquidityHooksExtraData,
) -> LiquidityResult {
    let guard = ExecutionGuard::acquire(e, EXECUTION_STATE_ADD_LIQUIDITY);
    let result = modify_position(e, provider, params, hooks_data, LiquidityOperation::Add);
    hooks::flush_queued_fee_collections(e);
    drop(guard);

    Events::new(e).liquidity_added(
        params.pool_id.clone(),
        provider.clone(),
        (result.amount0, result.amount1, result.fees0, result.fees1),
    );
    result
}

pub(crate) fn remove_liquidity(
    e: &Env,
    provider: &Address,
    params: &LiquidityModificationParams,
    hooks_data: &LiquidityHooksExtraData,
) -> LiquidityResult {
    let guard = ExecutionGuard::acquire(e, EXECUTION_STATE_REMOVE_LIQUIDITY);
    let result = modify_position(e, provider, params, hooks_data, LiquidityOperation::Remove);
    hooks::flush_queued_fee_collections(e);
    drop(guard);

    Events::new(e).liquidity_removed(
        params.pool_id.clone(),
        provider.clone(),
        (result.amount0, result.amount1, result.fees0, result.fees1),
    );
    result
}

pub(crate) fn collect_fees(
    e: &Env,
    provider: &Address,
    params: &LiquidityModificationParams,
    hooks_data: &LiquidityHooksExtraData,
) -> LiquidityResult {
    let guard = ExecutionGuard::acquire(e, EXECUTION_STATE_COLLECT_FEES);
    let result = modify_position(e, provider, params, hooks_data, LiquidityOperation::CollectFees);
    hooks::flush_queued_fee_collections(e);
    drop(guard);

    Events::new(e).position_fees_collected(
        params.pool_id.clone(),
        provider.clone(),
        (result.fees0, result.fees1),
    );
    result
}

fn check_bounds(e: &Env, params: &LiquidityModificationParams, result: &LiquidityResult) {
    if result.amount0 < params.min_amount0 || result.amount1 < params.min_amount1 {
        panic_with_error!(e, EngineError::InsufficientLiquidityChange);
    }
    if result.amount0 > params.max_amount0 || result.amount1 > params.max_amount1 {
        panic_with_error!(e, EngineError::ExcessiveLiquidityChange);
    }
}

// Nets what the provider owes against what it is owed for one token.
fn settle_provider(e: &Env, token: &Address, provider: &Address, owed_by: u128, owed_to: u128) {
    if owed_by > owed_to {
        collect(e, token, provider, owed_by - owed_to);
    } else {
        pay_or_credit(e, token, provider, owed_to - owed_by);
    }
}

fn modify_position(
    e: &Env,
    provider: &Address,
    params: &LiquidityModificationParams,
    hooks_data: &LiquidityHooksExtraData,
    operation: LiquidityOperation,
) -> LiquidityResult {
    let mut pool = get_pool(e, &params.pool_id);
    let strategy = registry::pool_strategy(e, &params.pool_id);
    let pool_params = PoolLiquidityParams {
        pool_id: params.pool_id.clone(),
        provider: provider.clone(),
        reserve0: pool.reserve0,
        reserve1: pool.reserve1,
        fee_balance0: pool.fee_balance0,
        fee_balance1: pool.fee_balance1,
        pool_params: params.pool_params.clone(),
    };

    let mut result = match operation {
        LiquidityOperation::Add => strategy.add_liquidity(&pool_params),
        LiquidityOperation::Remove => strategy.remove_liquidity(&pool_params),
        LiquidityOperation::CollectFees => strategy.collect_fees(&pool_params),
    };

    match operation {
        LiquidityOperation::Add => {
            check_bounds(e, params, &result);
            pool.reserve0 = checked_add(e, pool.reserve0, result.amount0);
            pool.reserve1 = checked_add(e, pool.reserve1, result.amount1);
        }
        LiquidityOperation::Remove => {
            check_bounds(e, params, &result);
            pool.reserve0 = checked_sub(e, pool.reserve0, result.amount0);
            pool.reserve1 = checked_sub(e, pool.reserve1, result.amount1);
        }
        LiquidityOperation::CollectFees => {
            result.amount0 = 0;
            result.amount1 = 0;
        }
    }
    pool.fee_balance0 = checked_sub(e, pool.fee_balance0, result.fees0);
    pool.fee_balance1 = checked_sub(e, pool.fee_balance1, result.fees1);
    put_pool(e, &params.pool_id, &pool);

    let (hook_fee0, hook_fee1) = hooks::validate_liquidity(
        e,
        &hooks::hook_context(e, provider),
        &pool,
        &HookLiquidityParams {
            operation,
            pool_id: params.pool_id.clone(),
            provider: provider.clone(),
            amount0: result.amount0,
            amount1: result.amount1,
            fees0: result.fees0,
            fees1: result.fees1,
        },
        &params.liquidity_hook,
        params.liquidity_hook_flags,
        hooks_data,
    );

    let (owed_by0, owed_to0, owed_by1, owed_to1) = match operation {
        LiquidityOperation::Add => (
            checked_add(e, result.amount0, hook_fee0),
            result.fees0,
            checked_add(e, result.amount1, hook_fee1),
            result.fees1,
        ),
        LiquidityOperation::Remove | LiquidityOperation::CollectFees => (
            hook_fee0,
            checked_add(e, result.amount0, result.fees0),
            hook_fee1,
            checked_add(e, result.amount1, result.fees1),
        ),
    };
    settle_provider(e, &pool.token0, provider, owed_by0, owed_to0);
    settle_provider(e, &pool.token1, provider, owed_by1, owed_to1);

    result
}
