use crate::constants::{DYNAMIC_POOL_FEE_BPS, MAX_BPS};
use crate::debt_ledger::{self, DebtKey};
use crate::errors::EngineError;
use crate::events::{Events, SettlementEvents, SwapKind, SwapRecord};
use crate::fees::{
    accrue_protocol_fee, apply_fees_to_input, apply_fees_to_output, bps_of, checked_add,
    checked_sub, gross_up, lp_protocol_bps, resolve_protocol_rates, SwapCache,
};
use crate::guard::{
    ExecutionGuard, EXECUTION_STATE_DIRECT_SWAP, EXECUTION_STATE_MULTI_SWAP,
    EXECUTION_STATE_SINGLE_SWAP,
};
use crate::hooks::{self, hook_context};
use crate::registry;
use crate::settlement::{collect, collect_input, is_zero_address, pay_or_credit};
use crate::storage::{get_pool, get_token_settings, put_pool};
use amm_interfaces::pool_id::decode_fee;
use amm_interfaces::types::{
    BpsFeeWithRecipient, DirectSwapParams, FlatFeeWithRecipient, HookContext, HookSwapParams,
    PoolSwapParams, SwapHooksExtraData, SwapOrder, TransferHandlerData,
};
use soroban_sdk::{panic_with_error, vec, Address, BytesN, Env, Vec};

pub(crate) struct OrderFees {
    pub exchange_fee: BpsFeeWithRecipient,
    pub fee_on_top: FlatFeeWithRecipient,
}

struct HopResult {
    // gross input of the hop, hop fee included
    amount_in: u128,
    amount_out: u128,
}

fn validate_order(e: &Env, order: &SwapOrder, fees: &OrderFees) {
    if e.ledger().timestamp() > order.deadline {
        panic_with_error!(e, EngineError::DeadlineExpired);
    }
    if is_zero_address(e, &order.recipient) {
        panic_with_error!(e, EngineError::RecipientCannotBeAddressZero);
    }
    if (fees.exchange_fee.bps > 0 && is_zero_address(e, &fees.exchange_fee.recipient))
        || (fees.fee_on_top.amount > 0 && is_zero_address(e, &fees.fee_on_top.recipient))
    {
        panic_with_error!(e, EngineError::FeeRecipientCannotBeAddressZero);
    }
    if fees.exchange_fee.bps > MAX_BPS {
        panic_with_error!(e, EngineError::FeeExceedsMaxFee);
    }
    if order.amount_specified == 0 {
        panic_with_error!(e, EngineError::InvalidAmountSpecified);
    }
    if order.token_in == order.token_out {
        panic_with_error!(e, EngineError::InvalidSwapPath);
    }
}

fn specified_amount(order: &SwapOrder) -> u128 {
    order.amount_specified.unsigned_abs()
}

// Token sequence of the route, `path[i]` -> `path[i + 1]` through `pool_ids[i]`.
fn resolve_path(e: &Env, order: &SwapOrder, pool_ids: &Vec<BytesN<32>>) -> Vec<Address> {
    if pool_ids.is_empty() {
        panic_with_error!(e, EngineError::InvalidSwapPath);
    }
    let mut path = vec![e, order.token_in.clone()];
    let mut current = order.token_in.clone();
    for pool_id in pool_ids.iter() {
        let pool = get_pool(e, &pool_id);
        current = if current == pool.token0 {
            pool.token1
        } else if current == pool.token1 {
            pool.token0
        } else {
            panic_with_error!(e, EngineError::InvalidSwapPath)
        };
        path.push_back(current.clone());
    }
    if current != order.token_out {
        panic_with_error!(e, EngineError::InvalidSwapPath);
    }
    path
}

fn hop_pool_fee(
    e: &Env,
    context: &HookContext,
    pool_id: &BytesN<32>,
    swap: &HookSwapParams,
    hook_data: &SwapHooksExtraData,
) -> u32 {
    let fee = decode_fee(pool_id) as u32;
    if fee != DYNAMIC_POOL_FEE_BPS {
        return fee;
    }
    hooks::pool_fee_for_swap(e, context, pool_id, &get_pool(e, pool_id), swap, &hook_data.pool_hook)
}

// One pool traversal. `amount` is the gross input offered (input based) or the exact output
// wanted (output based). Pool reserves, fee balances and protocol/hop fees are booked here.
#[allow(clippy::too_many_arguments)]
fn execute_hop(
    e: &Env,
    context: &HookContext,
    pool_id: &BytesN<32>,
    token_in: &Address,
    token_out: &Address,
    amount: u128,
    input_based: bool,
    recipient: &Address,
    hook_data: &SwapHooksExtraData,
) -> HopResult {
    let hop_fee_bps = get_token_settings(e, token_in).hop_fee_bps;
    let pool_fee_bps = hop_pool_fee(
        e,
        context,
        pool_id,
        &HookSwapParams {
            input_based,
            token_in: token_in.clone(),
            token_out: token_out.clone(),
            amount_in: if input_based { amount } else { 0 },
            amount_out: if input_based { 0 } else { amount },
            recipient: recipient.clone(),
        },
        hook_data,
    );

    let mut pool = get_pool(e, pool_id);
    let zero_for_one = token_in == &pool.token0;
    let (reserve_in, reserve_out) = match zero_for_one {
        true => (pool.reserve0, pool.reserve1),
        false => (pool.reserve1, pool.reserve0),
    };
    let strategy = registry::pool_strategy(e, pool_id);
    let mut params = PoolSwapParams {
        pool_id: pool_id.clone(),
        executor: context.executor.clone(),
        zero_for_one,
        amount,
        reserve_in,
        reserve_out,
        pool_fee_bps,
        swap_data: hook_data.pool_type.clone(),
    };

    let (result, hop_fee) = if input_based {
        let hop_fee = bps_of(e, amount, hop_fee_bps);
        params.amount = amount - hop_fee;
        let result = strategy.swap_by_input(&params);
        if result.amount_in > params.amount {
            panic_with_error!(e, EngineError::LimitAmountExceeded);
        }
        // partial fill, the hop fee covers only the consumed input
        let hop_fee = match result.amount_in < params.amount {
            true => gross_up(e, result.amount_in, hop_fee_bps).min(hop_fee),
            false => hop_fee,
        };
        (result, hop_fee)
    } else {
        let result = strategy.swap_by_output(&params);
        if result.amount_out != amount {
            panic_with_error!(e, EngineError::CannotPartialFillAfterFirstHop);
        }
        let hop_fee = gross_up(e, result.amount_in, hop_fee_bps);
        (result, hop_fee)
    };
    if result.lp_fee > result.amount_in {
        panic_with_error!(e, EngineError::FeeExceedsInput);
    }

    let lp_protocol_fee = bps_of(e, result.lp_fee, lp_protocol_bps(e, pool_id));
    let reserve_in = checked_add(e, reserve_in, result.amount_in - result.lp_fee);
    let reserve_out = checked_sub(e, reserve_out, result.amount_out);
    let fee_balance_in = result.lp_fee - lp_protocol_fee;
    if zero_for_one {
        pool.reserve0 = reserve_in;
        pool.reserve1 = reserve_out;
        pool.fee_balance0 = checked_add(e, pool.fee_balance0, fee_balance_in);
    } else {
        pool.reserve1 = reserve_in;
        pool.reserve0 = reserve_out;
        pool.fee_balance1 = checked_add(e, pool.fee_balance1, fee_balance_in);
    }
    put_pool(e, pool_id, &pool);
    accrue_protocol_fee(e, token_in, lp_protocol_fee);
    debt_ledger::credit(
        e,
        &DebtKey::HookFeeByToken(token_in.clone(), token_in.clone()),
        hop_fee,
    );

    HopResult {
        amount_in: checked_add(e, result.amount_in, hop_fee),
        amount_out: result.amount_out,
    }
}

// Everything the executor pays and the recipient receives, plus the fee bookkeeping.
struct Settlement {
    cache: SwapCache,
    total_in: u128,
}

#[allow(clippy::too_many_arguments)]
fn swap_through_pools(
    e: &Env,
    context: &HookContext,
    order: &SwapOrder,
    pool_ids: &Vec<BytesN<32>>,
    fees: &OrderFees,
    hooks_data: &Vec<SwapHooksExtraData>,
) -> Settlement {
    if hooks_data.len() != pool_ids.len() {
        panic_with_error!(e, EngineError::ArrayLengthMismatch);
    }
    let path = resolve_path(e, order, pool_ids);
    let hops = pool_ids.len();
    let token_in_data = hooks_data.get_unchecked(0).token_in_hook;
    let token_out_data = hooks_data.get_unchecked(hops - 1).token_out_hook;
    let rates = resolve_protocol_rates(e, &fees.exchange_fee.recipient, &fees.fee_on_top.recipient);
    let specified = specified_amount(order);
    let mut cache = SwapCache::default();

    if order.amount_specified > 0 {
        cache.amount_in = specified;
        apply_fees_to_input(e, &mut cache, fees.exchange_fee.bps, fees.fee_on_top.amount, &rates);
        let net_in = cache.amount_in;

        let mut swap = HookSwapParams {
            input_based: true,
            token_in: order.token_in.clone(),
            token_out: order.token_out.clone(),
            amount_in: cache.amount_in,
            amount_out: 0,
            recipient: order.recipient.clone(),
        };
        let hook_fee = hooks::before_swap(e, context, &swap, &token_in_data, &token_out_data);
        if hook_fee > cache.amount_in {
            panic_with_error!(e, EngineError::FeeExceedsInput);
        }
        let offered = cache.amount_in - hook_fee;

        let mut amount = offered;
        let mut unconsumed = 0u128;
        for i in 0..hops {
            let hop = execute_hop(
                e,
                context,
                &pool_ids.get_unchecked(i),
                &path.get_unchecked(i),
                &path.get_unchecked(i + 1),
                amount,
                true,
                &order.recipient,
                &hooks_data.get_unchecked(i),
            );
            if hop.amount_in < amount {
                if i > 0 {
                    panic_with_error!(e, EngineError::CannotPartialFillAfterFirstHop);
                }
                unconsumed = amount - hop.amount_in;
            }
            amount = hop.amount_out;
        }

        swap.amount_in = offered - unconsumed;
        swap.amount_out = amount;
        let hook_fee = hooks::after_swap(e, context, &swap, &token_in_data, &token_out_data);
        if hook_fee > amount {
            panic_with_error!(e, EngineError::FeeExceedsOutput);
        }
        cache.amount_in = swap.amount_in;
        cache.amount_out = amount - hook_fee;
        if cache.amount_out < order.limit_amount {
            panic_with_error!(e, EngineError::LimitAmountNotMet);
        }

        let total_in = if unconsumed > 0 {
            // order fees are re-derived from the input the pools actually used
            let mut consumed = SwapCache {
                amount_in: net_in - unconsumed,
                ..Default::default()
            };
            apply_fees_to_output(
                e,
                &mut consumed,
                fees.exchange_fee.bps,
                fees.fee_on_top.amount,
                &rates,
            );
            cache.exchange_fee = consumed.exchange_fee;
            cache.fee_on_top = consumed.fee_on_top;
            cache.protocol_fee = consumed.protocol_fee;
            consumed.amount_in
        } else {
            specified
        };

        Settlement { total_in, cache }
    } else {
        cache.amount_out = specified;
        let mut swap = HookSwapParams {
            input_based: false,
            token_in: order.token_in.clone(),
            token_out: order.token_out.clone(),
            amount_in: 0,
            amount_out: specified,
            recipient: order.recipient.clone(),
        };
        let hook_fee = hooks::before_swap(e, context, &swap, &token_in_data, &token_out_data);

        let mut amount = checked_add(e, specified, hook_fee);
        for i in (0..hops).rev() {
            let hop = execute_hop(
                e,
                context,
                &pool_ids.get_unchecked(i),
                &path.get_unchecked(i),
                &path.get_unchecked(i + 1),
                amount,
                false,
                &order.recipient,
                &hooks_data.get_unchecked(i),
            );
            amount = hop.amount_in;
        }

        swap.amount_in = amount;
        let hook_fee = hooks::after_swap(e, context, &swap, &token_in_data, &token_out_data);
        cache.amount_in = checked_add(e, amount, hook_fee);
        apply_fees_to_output(e, &mut cache, fees.exchange_fee.bps, fees.fee_on_top.amount, &rates);
        if cache.amount_in > order.limit_amount {
            panic_with_error!(e, EngineError::LimitAmountExceeded);
        }

        Settlement {
            total_in: cache.amount_in,
            cache,
        }
    }
}

fn pay_order_fees(e: &Env, token_in: &Address, fees: &OrderFees, cache: &SwapCache) {
    pay_or_credit(
        e,
        token_in,
        &fees.exchange_fee.recipient,
        cache.exchange_fee.recipient,
    );
    pay_or_credit(
        e,
        token_in,
        &fees.fee_on_top.recipient,
        cache.fee_on_top.recipient,
    );
    accrue_protocol_fee(e, token_in, cache.protocol_fee);
}

fn emit_swap(
    e: &Env,
    kind: SwapKind,
    executor: &Address,
    order: &SwapOrder,
    settlement: &Settlement,
) {
    Events::new(e).swap(
        kind,
        SwapRecord {
            executor: executor.clone(),
            recipient: order.recipient.clone(),
            token_in: order.token_in.clone(),
            token_out: order.token_out.clone(),
            amount_in: settlement.total_in,
            amount_out: settlement.cache.amount_out,
            exchange_fee: settlement.cache.exchange_fee.total(),
            fee_on_top: settlement.cache.fee_on_top.total(),
            protocol_fee: settlement.cache.protocol_fee,
        },
    );
}

fn settle_pool_swap(
    e: &Env,
    context: &HookContext,
    executor: &Address,
    order: &SwapOrder,
    fees: &OrderFees,
    settlement: &Settlement,
    transfer_handler: &Option<TransferHandlerData>,
) {
    collect_input(
        e,
        context,
        executor,
        &order.token_in,
        settlement.total_in,
        transfer_handler,
    );
    pay_or_credit(
        e,
        &order.token_out,
        &order.recipient,
        settlement.cache.amount_out,
    );
    pay_order_fees(e, &order.token_in, fees, &settlement.cache);
    hooks::flush_queued_fee_collections(e);
}

pub(crate) fn single_swap(
    e: &Env,
    executor: &Address,
    order: &SwapOrder,
    pool_id: &BytesN<32>,
    fees: &OrderFees,
    hooks_data: &SwapHooksExtraData,
    transfer_handler: &Option<TransferHandlerData>,
) -> (u128, u128) {
    validate_order(e, order, fees);
    let _guard = ExecutionGuard::acquire(e, EXECUTION_STATE_SINGLE_SWAP);
    let context = hook_context(e, executor);

    let settlement = swap_through_pools(
        e,
        &context,
        order,
        &vec![e, pool_id.clone()],
        fees,
        &vec![e, hooks_data.clone()],
    );
    settle_pool_swap(e, &context, executor, order, fees, &settlement, transfer_handler);
    emit_swap(e, SwapKind::Single, executor, order, &settlement);
    (settlement.total_in, settlement.cache.amount_out)
}

pub(crate) fn multi_swap(
    e: &Env,
    executor: &Address,
    order: &SwapOrder,
    pool_ids: &Vec<BytesN<32>>,
    fees: &OrderFees,
    hooks_data: &Vec<SwapHooksExtraData>,
    transfer_handler: &Option<TransferHandlerData>,
) -> (u128, u128) {
    validate_order(e, order, fees);
    let _guard = ExecutionGuard::acquire(e, EXECUTION_STATE_MULTI_SWAP);
    let context = hook_context(e, executor);

    let settlement = swap_through_pools(e, &context, order, pool_ids, fees, hooks_data);
    settle_pool_swap(e, &context, executor, order, fees, &settlement, transfer_handler);
    emit_swap(e, SwapKind::Multi, executor, order, &settlement);
    (settlement.total_in, settlement.cache.amount_out)
}

// Peer to peer fill: the executor delivers the output and receives the net input, paid by the
// order's recipient (or sourced through a transfer handler on its behalf).
pub(crate) fn direct_swap(
    e: &Env,
    executor: &Address,
    order: &SwapOrder,
    params: &DirectSwapParams,
    fees: &OrderFees,
    hooks_data: &SwapHooksExtraData,
    transfer_handler: &Option<TransferHandlerData>,
) -> (u128, u128) {
    validate_order(e, order, fees);
    if !hooks_data.pool_hook.is_empty() || !hooks_data.pool_type.is_empty() {
        panic_with_error!(e, EngineError::PoolHookDataNotSupported);
    }
    let _guard = ExecutionGuard::acquire(e, EXECUTION_STATE_DIRECT_SWAP);
    let context = hook_context(e, executor);
    let rates = resolve_protocol_rates(e, &fees.exchange_fee.recipient, &fees.fee_on_top.recipient);
    let specified = specified_amount(order);
    let mut cache = SwapCache::default();

    let mut swap = HookSwapParams {
        input_based: order.amount_specified > 0,
        token_in: order.token_in.clone(),
        token_out: order.token_out.clone(),
        amount_in: 0,
        amount_out: 0,
        recipient: order.recipient.clone(),
    };

    // (net input to the executor, output delivered by the executor)
    let (executor_in, executor_out) = if swap.input_based {
        cache.amount_in = specified;
        apply_fees_to_input(e, &mut cache, fees.exchange_fee.bps, fees.fee_on_top.amount, &rates);
        swap.amount_in = cache.amount_in;
        let hook_fee = hooks::before_swap(
            e,
            &context,
            &swap,
            &hooks_data.token_in_hook,
            &hooks_data.token_out_hook,
        );
        if hook_fee > cache.amount_in {
            panic_with_error!(e, EngineError::FeeExceedsInput);
        }
        let executor_in = cache.amount_in - hook_fee;

        swap.amount_in = executor_in;
        swap.amount_out = params.swap_amount;
        let hook_fee = hooks::after_swap(
            e,
            &context,
            &swap,
            &hooks_data.token_in_hook,
            &hooks_data.token_out_hook,
        );
        if hook_fee > params.swap_amount {
            panic_with_error!(e, EngineError::FeeExceedsOutput);
        }
        cache.amount_in = executor_in;
        cache.amount_out = params.swap_amount - hook_fee;
        if cache.amount_out < order.limit_amount {
            panic_with_error!(e, EngineError::LimitAmountNotMet);
        }
        (executor_in, params.swap_amount)
    } else {
        cache.amount_out = specified;
        swap.amount_out = specified;
        let hook_fee = hooks::before_swap(
            e,
            &context,
            &swap,
            &hooks_data.token_in_hook,
            &hooks_data.token_out_hook,
        );
        let executor_out = checked_add(e, specified, hook_fee);

        swap.amount_in = params.swap_amount;
        let hook_fee = hooks::after_swap(
            e,
            &context,
            &swap,
            &hooks_data.token_in_hook,
            &hooks_data.token_out_hook,
        );
        cache.amount_in = checked_add(e, params.swap_amount, hook_fee);
        apply_fees_to_output(e, &mut cache, fees.exchange_fee.bps, fees.fee_on_top.amount, &rates);
        if cache.amount_in > order.limit_amount {
            panic_with_error!(e, EngineError::LimitAmountExceeded);
        }
        (params.swap_amount, executor_out)
    };

    let settlement = Settlement {
        total_in: if swap.input_based { specified } else { cache.amount_in },
        cache,
    };
    collect_input(
        e,
        &context,
        &order.recipient,
        &order.token_in,
        settlement.total_in,
        transfer_handler,
    );
    collect(e, &order.token_out, executor, executor_out);
    pay_or_credit(
        e,
        &order.token_out,
        &order.recipient,
        settlement.cache.amount_out,
    );
    pay_or_credit(e, &order.token_in, executor, executor_in);
    pay_order_fees(e, &order.token_in, fees, &settlement.cache);
    hooks::flush_queued_fee_collections(e);

    emit_swap(e, SwapKind::Direct, executor, order, &settlement);
    (settlement.total_in, settlement.cache.amount_out)
}
