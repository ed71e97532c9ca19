use crate::constants::MAX_BPS;
use crate::debt_ledger::{self, DebtKey};
use crate::errors::EngineError;
use crate::events::{Events, SettlementEvents};
use crate::fees::checked_add;
use crate::guard::EXECUTION_STATE_FLASHLOAN;
use crate::storage::{
    clear_queued_hook_fees, get_execution_state, get_queued_hook_fees, get_token_settings,
    set_queued_hook_fees, QueuedHookFee,
};
use amm_interfaces::constants::{
    ADD_LIQUIDITY_FLAG, AFTER_SWAP_FLAG, BEFORE_SWAP_FLAG, COLLECT_FEES_FLAG,
    FLASHLOAN_FEE_FLAG, FLASHLOAN_FEE_TOKEN_FLAG, HOOK_MANAGES_FEES_FLAG, POOL_CREATION_FLAG,
    REMOVE_LIQUIDITY_FLAG,
};
use amm_interfaces::hooks::{LiquidityHookClient, PoolHookClient, TokenHookClient};
use amm_interfaces::types::{
    FlashloanFeeQuote, HookContext, HookFeeCollection, HookLiquidityParams,
    HookLiquidityResponse, HookSwapParams, LiquidityHooksExtraData, LiquidityOperation,
    PoolCreationDetails, PoolCreationHooksExtraData, PoolState, TokenSettings,
};
use soroban_sdk::{log, panic_with_error, Address, Bytes, BytesN, Env, Vec};

pub(crate) fn hook_context(e: &Env, executor: &Address) -> HookContext {
    HookContext {
        executor: executor.clone(),
        execution_state: get_execution_state(e),
    }
}

fn token_hook(e: &Env, token: &Address, flag: u32) -> Option<(Address, TokenSettings)> {
    let settings = get_token_settings(e, token);
    match &settings.hook {
        Some(hook) if settings.flags & flag == flag => Some((hook.clone(), settings)),
        _ => None,
    }
}

// Capability negotiation for a token's hook configuration.
pub(crate) fn validate_token_settings(e: &Env, settings: &TokenSettings) {
    if settings.hop_fee_bps > MAX_BPS {
        panic_with_error!(e, EngineError::InvalidFeeBps);
    }

    let (required, supported) = match &settings.hook {
        Some(hook) => TokenHookClient::new(e, hook).hook_flags(),
        None => (0, 0),
    };
    negotiate_flags(e, settings.flags, required, supported);
}

fn negotiate_flags(e: &Env, flags: u32, required: u32, supported: u32) {
    if flags & required != required {
        panic_with_error!(e, EngineError::HookFlagsMissingRequired);
    }
    if flags & !supported != 0 {
        panic_with_error!(e, EngineError::UnsupportedHookFlags);
    }
}

// Same negotiation for the position level hook of a liquidity call.
pub(crate) fn validate_liquidity_hook_flags(e: &Env, hook: &Option<Address>, flags: u32) {
    let (required, supported) = match hook {
        Some(hook) => LiquidityHookClient::new(e, hook).hook_flags(),
        None => (0, 0),
    };
    negotiate_flags(e, flags, required, supported);
}

// Hook fees land under the hook's key when it manages its own fees, under the token's key
// otherwise.
fn credit_token_hook_fee(
    e: &Env,
    hook: &Address,
    settings: &TokenSettings,
    token_for: &Address,
    token_fee: &Address,
    amount: u128,
) {
    let key = if settings.flags & HOOK_MANAGES_FEES_FLAG != 0 {
        DebtKey::HookFeeByHook(hook.clone(), token_for.clone(), token_fee.clone())
    } else {
        DebtKey::HookFeeByToken(token_for.clone(), token_fee.clone())
    };
    debt_ledger::credit(e, &key, amount);
}

fn credit_hook_fee(e: &Env, hook: &Address, token: &Address, amount: u128) {
    debt_ledger::credit(
        e,
        &DebtKey::HookFeeByHook(hook.clone(), token.clone(), token.clone()),
        amount,
    );
}

// Collections requested in hook responses. Hooks only answer inside a swap, liquidity or
// flash loan call, so requests are queued until settlement or refused during a flash loan.
// Outside of those calls a hook collects through `collect_hook_fees_by_hook`.
fn request_fee_collection(e: &Env, hook: &Address, collection: &HookFeeCollection) {
    if get_execution_state(e) & EXECUTION_STATE_FLASHLOAN != 0 {
        panic_with_error!(e, EngineError::CannotCollectFeesDuringFlashloan);
    }
    log!(e, "queue hook fee collection", hook.clone());
    let mut queue = get_queued_hook_fees(e);
    queue.push_back(QueuedHookFee {
        hook: hook.clone(),
        collection: collection.clone(),
    });
    set_queued_hook_fees(e, &queue);
}

fn request_fee_collections(e: &Env, hook: &Address, collections: &Vec<HookFeeCollection>) {
    for collection in collections.iter() {
        request_fee_collection(e, hook, &collection);
    }
}

pub(crate) fn execute_fee_collection(
    e: &Env,
    hook: &Address,
    collection: &HookFeeCollection,
) -> u128 {
    let key = DebtKey::HookFeeByHook(
        hook.clone(),
        collection.token_for.clone(),
        collection.token_fee.clone(),
    );
    let amount = debt_ledger::claim(e, &key, &collection.token_fee, &collection.recipient);
    Events::new(e).hook_fees_collected(
        hook.clone(),
        collection.token_for.clone(),
        collection.token_fee.clone(),
        collection.recipient.clone(),
        amount,
    );
    amount
}

// Runs once an operation has settled.
pub(crate) fn flush_queued_fee_collections(e: &Env) {
    let queue = get_queued_hook_fees(e);
    if queue.is_empty() {
        return;
    }
    clear_queued_hook_fees(e);
    for queued in queue.iter() {
        execute_fee_collection(e, &queued.hook, &queued.collection);
    }
}

// Before-swap hooks of the input then the output token. Returns the total fee, denominated
// in the specified token.
pub(crate) fn before_swap(
    e: &Env,
    context: &HookContext,
    swap: &HookSwapParams,
    token_in_data: &Bytes,
    token_out_data: &Bytes,
) -> u128 {
    let fee_token = match swap.input_based {
        true => &swap.token_in,
        false => &swap.token_out,
    };
    let mut total = 0u128;
    for (token, data) in [(&swap.token_in, token_in_data), (&swap.token_out, token_out_data)] {
        if let Some((hook, settings)) = token_hook(e, token, BEFORE_SWAP_FLAG) {
            let response = TokenHookClient::new(e, &hook).before_swap(context, token, swap, data);
            credit_token_hook_fee(e, &hook, &settings, token, fee_token, response.fee);
            request_fee_collections(e, &hook, &response.fee_collections);
            total = checked_add(e, total, response.fee);
        }
    }
    total
}

// After-swap hooks. Returns the total fee, denominated in the unspecified token.
pub(crate) fn after_swap(
    e: &Env,
    context: &HookContext,
    swap: &HookSwapParams,
    token_in_data: &Bytes,
    token_out_data: &Bytes,
) -> u128 {
    let fee_token = match swap.input_based {
        true => &swap.token_out,
        false => &swap.token_in,
    };
    let mut total = 0u128;
    for (token, data) in [(&swap.token_in, token_in_data), (&swap.token_out, token_out_data)] {
        if let Some((hook, settings)) = token_hook(e, token, AFTER_SWAP_FLAG) {
            let response = TokenHookClient::new(e, &hook).after_swap(context, token, swap, data);
            credit_token_hook_fee(e, &hook, &settings, token, fee_token, response.fee);
            request_fee_collections(e, &hook, &response.fee_collections);
            total = checked_add(e, total, response.fee);
        }
    }
    total
}

pub(crate) fn pool_fee_for_swap(
    e: &Env,
    context: &HookContext,
    pool_id: &BytesN<32>,
    pool: &PoolState,
    swap: &HookSwapParams,
    hook_data: &Bytes,
) -> u32 {
    let fee = match &pool.pool_hook {
        Some(hook) => {
            PoolHookClient::new(e, hook).get_pool_fee_for_swap(context, pool_id, swap, hook_data)
        }
        None => panic_with_error!(e, EngineError::InvalidPoolFeeBps),
    };
    if fee > MAX_BPS {
        panic_with_error!(e, EngineError::InvalidPoolFeeBps);
    }
    fee
}

fn liquidity_flag(operation: LiquidityOperation) -> u32 {
    match operation {
        LiquidityOperation::Add => ADD_LIQUIDITY_FLAG,
        LiquidityOperation::Remove => REMOVE_LIQUIDITY_FLAG,
        LiquidityOperation::CollectFees => COLLECT_FEES_FLAG,
    }
}

fn add_liquidity_fees(e: &Env, fees: &mut (u128, u128), response: &HookLiquidityResponse) {
    fees.0 = checked_add(e, fees.0, response.fee0);
    fees.1 = checked_add(e, fees.1, response.fee1);
}

// token0 hook, token1 hook, liquidity hook, pool hook. Returns the hook fees per token.
pub(crate) fn validate_liquidity(
    e: &Env,
    context: &HookContext,
    pool: &PoolState,
    params: &HookLiquidityParams,
    liquidity_hook: &Option<Address>,
    liquidity_hook_flags: u32,
    hooks_data: &LiquidityHooksExtraData,
) -> (u128, u128) {
    let mut fees = (0u128, 0u128);
    let flag = liquidity_flag(params.operation);

    for (token, data) in [
        (&pool.token0, &hooks_data.token0_hook),
        (&pool.token1, &hooks_data.token1_hook),
    ] {
        if let Some((hook, settings)) = token_hook(e, token, flag) {
            let response =
                TokenHookClient::new(e, &hook).validate_liquidity(context, token, params, data);
            credit_token_hook_fee(e, &hook, &settings, token, &pool.token0, response.fee0);
            credit_token_hook_fee(e, &hook, &settings, token, &pool.token1, response.fee1);
            request_fee_collections(e, &hook, &response.fee_collections);
            add_liquidity_fees(e, &mut fees, &response);
        }
    }

    validate_liquidity_hook_flags(e, liquidity_hook, liquidity_hook_flags);
    if let Some(hook) = liquidity_hook.as_ref().filter(|_| liquidity_hook_flags & flag == flag) {
        let response = LiquidityHookClient::new(e, hook).validate_liquidity(
            context,
            params,
            &hooks_data.liquidity_hook,
        );
        credit_hook_fee(e, hook, &pool.token0, response.fee0);
        credit_hook_fee(e, hook, &pool.token1, response.fee1);
        request_fee_collections(e, hook, &response.fee_collections);
        add_liquidity_fees(e, &mut fees, &response);
    }

    if let Some(hook) = &pool.pool_hook {
        let response =
            PoolHookClient::new(e, hook).validate_liquidity(context, params, &hooks_data.pool_hook);
        credit_hook_fee(e, hook, &pool.token0, response.fee0);
        credit_hook_fee(e, hook, &pool.token1, response.fee1);
        request_fee_collections(e, hook, &response.fee_collections);
        add_liquidity_fees(e, &mut fees, &response);
    }

    fees
}

pub(crate) fn validate_pool_creation(
    e: &Env,
    context: &HookContext,
    pool_id: &BytesN<32>,
    details: &PoolCreationDetails,
    hooks_data: &PoolCreationHooksExtraData,
) {
    for (token, data) in [
        (&details.token0, &hooks_data.token0_hook),
        (&details.token1, &hooks_data.token1_hook),
    ] {
        if let Some((hook, _)) = token_hook(e, token, POOL_CREATION_FLAG) {
            TokenHookClient::new(e, &hook)
                .validate_pool_creation(context, pool_id, token, details, data);
        }
    }

    if let Some(hook) = &details.pool_hook {
        PoolHookClient::new(e, hook).validate_pool_creation(
            context,
            pool_id,
            details,
            &hooks_data.pool_hook,
        );
    }
}

// Hook priced flash loan fee, `None` when the loan token has no flash loan fee hook.
pub(crate) fn flashloan_fee_quote(
    e: &Env,
    context: &HookContext,
    token: &Address,
    amount: u128,
    hook_data: &Bytes,
) -> Option<(Address, TokenSettings, FlashloanFeeQuote)> {
    let (hook, settings) = token_hook(e, token, FLASHLOAN_FEE_FLAG)?;
    let quote = TokenHookClient::new(e, &hook).flashloan_fee(context, token, &amount, hook_data);
    request_fee_collections(e, &hook, &quote.fee_collections);
    Some((hook, settings, quote))
}

pub(crate) fn credit_flashloan_hook_fee(
    e: &Env,
    hook: &Address,
    settings: &TokenSettings,
    loan_token: &Address,
    fee_token: &Address,
    amount: u128,
) {
    credit_token_hook_fee(e, hook, settings, loan_token, fee_token, amount);
}

// A fee token other than the loan token has to be approved by its own hook.
pub(crate) fn fee_token_allowed_for_flashloan(
    e: &Env,
    context: &HookContext,
    loan_token: &Address,
    fee_token: &Address,
) -> bool {
    match token_hook(e, fee_token, FLASHLOAN_FEE_TOKEN_FLAG) {
        Some((hook, _)) => TokenHookClient::new(e, &hook).validate_flashloan_fee_token(
            context, loan_token, fee_token,
        ),
        None => false,
    }
}
