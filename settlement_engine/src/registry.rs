use crate::constants::{ADD_LIQUIDITY_FN, DYNAMIC_POOL_FEE_BPS, MAX_BPS};
use crate::errors::EngineError;
use crate::events::{Events, SettlementEvents};
use crate::hooks;
use crate::liquidity;
use crate::storage::{get_pool_type_strategy, has_pool, put_pool, set_pool_type_strategy};
use amm_interfaces::pool_id;
use amm_interfaces::pool_type::PoolTypeClient;
use amm_interfaces::types::{PoolCreationDetails, PoolCreationHooksExtraData, PoolLiquidityCall, PoolState};
use soroban_sdk::token::TokenClient;
use soroban_sdk::{panic_with_error, Address, BytesN, Env, Symbol};

pub(crate) fn register_pool_type(e: &Env, pool_type: &BytesN<20>, strategy: &Address) {
    if !pool_id::is_valid_pool_type(pool_type) {
        panic_with_error!(e, EngineError::InvalidPoolType);
    }
    if get_pool_type_strategy(e, pool_type).is_some() {
        panic_with_error!(e, EngineError::PoolTypeAlreadyRegistered);
    }
    set_pool_type_strategy(e, pool_type, strategy);
    Events::new(e).pool_type_registered(pool_type.clone(), strategy.clone());
}

// Resolves the strategy behind a pool type key.
pub(crate) fn strategy(e: &Env, pool_type: &BytesN<20>) -> PoolTypeClient<'static> {
    if !pool_id::is_valid_pool_type(pool_type) {
        panic_with_error!(e, EngineError::InvalidPoolType);
    }
    match get_pool_type_strategy(e, pool_type) {
        Some(address) => PoolTypeClient::new(e, &address),
        None => panic_with_error!(e, EngineError::InvalidPoolType),
    }
}

pub(crate) fn pool_strategy(e: &Env, pool_id: &BytesN<32>) -> PoolTypeClient<'static> {
    strategy(e, &pool_id::decode_pool_type(e, pool_id))
}

fn validate_token_code(e: &Env, token: &Address) {
    // anything that can't answer a balance query is not a token
    let response = TokenClient::new(e, token).try_balance(&e.current_contract_address());
    if !matches!(response, Ok(Ok(_))) {
        panic_with_error!(e, EngineError::PoolCreationWithNoCodeAtToken);
    }
}

pub(crate) fn create_pool(
    e: &Env,
    creator: &Address,
    details: &PoolCreationDetails,
    hooks_data: &PoolCreationHooksExtraData,
    liquidity: &Option<PoolLiquidityCall>,
) -> BytesN<32> {
    if details.fee > MAX_BPS && details.fee != DYNAMIC_POOL_FEE_BPS {
        panic_with_error!(e, EngineError::InvalidPoolFeeBps);
    }
    // a dynamic fee is priced by the pool hook
    if details.fee == DYNAMIC_POOL_FEE_BPS && details.pool_hook.is_none() {
        panic_with_error!(e, EngineError::InvalidPoolFeeBps);
    }
    if details.token0 >= details.token1 {
        panic_with_error!(e, EngineError::TokensNotSorted);
    }
    let strategy = strategy(e, &details.pool_type);
    validate_token_code(e, &details.token0);
    validate_token_code(e, &details.token1);

    let pool_id = strategy.create_pool(details);
    if pool_id::decode_pool_type(e, &pool_id) != details.pool_type
        || pool_id::decode_fee(&pool_id) as u32 != details.fee
    {
        panic_with_error!(e, EngineError::InvalidPoolId);
    }
    if has_pool(e, &pool_id) {
        panic_with_error!(e, EngineError::PoolAlreadyExists);
    }

    hooks::validate_pool_creation(
        e,
        &hooks::hook_context(e, creator),
        &pool_id,
        details,
        hooks_data,
    );

    put_pool(
        e,
        &pool_id,
        &PoolState {
            token0: details.token0.clone(),
            token1: details.token1.clone(),
            pool_hook: details.pool_hook.clone(),
            reserve0: 0,
            reserve1: 0,
            fee_balance0: 0,
            fee_balance1: 0,
        },
    );
    Events::new(e).pool_created(
        pool_id.clone(),
        details.token0.clone(),
        details.token1.clone(),
        details.pool_hook.clone(),
        details.fee,
    );

    if let Some(call) = liquidity {
        if call.function != Symbol::new(e, ADD_LIQUIDITY_FN) {
            panic_with_error!(e, EngineError::LiquidityDataDoesNotCallAddLiquidity);
        }
        let mut params = call.params.clone();
        params.pool_id = pool_id.clone();
        let result = liquidity::add_liquidity(e, creator, &params, &call.hooks_data);
        if result.amount0 == 0 && result.amount1 == 0 {
            panic_with_error!(e, EngineError::PoolCreationWithLiquidityDidNotAddLiquidity);
        }
    }

    pool_id
}
