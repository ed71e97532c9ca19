use crate::types::{
    FlashloanFeeQuote, HookContext, HookLiquidityParams, HookLiquidityResponse, HookSwapParams,
    HookSwapResponse, PoolCreationDetails,
};
use soroban_sdk::{contractclient, Address, Bytes, BytesN, Env};

#[contractclient(name = "TokenHookClient")]
pub trait TokenHookInterface {
    // (required flags, supported flags)
    fn hook_flags(e: Env) -> (u32, u32);

    fn validate_pool_creation(
        e: Env,
        context: HookContext,
        pool_id: BytesN<32>,
        token: Address,
        details: PoolCreationDetails,
        hook_data: Bytes,
    );

    // Fee is charged in the specified token: input token for input-based swaps, output token
    // otherwise.
    fn before_swap(
        e: Env,
        context: HookContext,
        token: Address,
        swap: HookSwapParams,
        hook_data: Bytes,
    ) -> HookSwapResponse;

    // Fee is charged in the unspecified token.
    fn after_swap(
        e: Env,
        context: HookContext,
        token: Address,
        swap: HookSwapParams,
        hook_data: Bytes,
    ) -> HookSwapResponse;

    fn validate_liquidity(
        e: Env,
        context: HookContext,
        token: Address,
        params: HookLiquidityParams,
        hook_data: Bytes,
    ) -> HookLiquidityResponse;

    fn flashloan_fee(
        e: Env,
        context: HookContext,
        token: Address,
        amount: u128,
        hook_data: Bytes,
    ) -> FlashloanFeeQuote;

    // Asked on the fee token's hook when a loan of `loan_token` wants to be paid in it.
    fn validate_flashloan_fee_token(
        e: Env,
        context: HookContext,
        loan_token: Address,
        fee_token: Address,
    ) -> bool;
}

#[contractclient(name = "PoolHookClient")]
pub trait PoolHookInterface {
    fn validate_pool_creation(
        e: Env,
        context: HookContext,
        pool_id: BytesN<32>,
        details: PoolCreationDetails,
        hook_data: Bytes,
    );

    // LP fee for pools created with the dynamic fee value.
    fn get_pool_fee_for_swap(
        e: Env,
        context: HookContext,
        pool_id: BytesN<32>,
        swap: HookSwapParams,
        hook_data: Bytes,
    ) -> u32;

    fn validate_liquidity(
        e: Env,
        context: HookContext,
        params: HookLiquidityParams,
        hook_data: Bytes,
    ) -> HookLiquidityResponse;
}

// Position level hook supplied per liquidity call.
#[contractclient(name = "LiquidityHookClient")]
pub trait LiquidityHookInterface {
    // (required flags, supported flags), negotiated against the flags of the call
    fn hook_flags(e: Env) -> (u32, u32);

    fn validate_liquidity(
        e: Env,
        context: HookContext,
        params: HookLiquidityParams,
        hook_data: Bytes,
    ) -> HookLiquidityResponse;
}
