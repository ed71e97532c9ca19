use crate::types::{
    LiquidityResult, PoolCreationDetails, PoolLiquidityParams, PoolSwapParams, PoolSwapResult,
};
use soroban_sdk::{contractclient, BytesN, Env};

// Pool type strategy. Owns the pricing curve and position accounting of every pool it
// creates; the engine owns custody, reserves and fee balances.
#[contractclient(name = "PoolTypeClient")]
pub trait PoolTypeInterface {
    // Build a pool id for the creation details. The id must encode the strategy's registered
    // pool type key and `details.fee`.
    fn create_pool(e: Env, details: PoolCreationDetails) -> BytesN<32>;

    // Consume up to `params.amount` of input. Returning a smaller `amount_in` is a partial fill.
    fn swap_by_input(e: Env, params: PoolSwapParams) -> PoolSwapResult;

    // Produce up to `params.amount` of output.
    fn swap_by_output(e: Env, params: PoolSwapParams) -> PoolSwapResult;

    // Amounts the provider deposits plus any accrued fees paid out to them.
    fn add_liquidity(e: Env, params: PoolLiquidityParams) -> LiquidityResult;

    // Amounts withdrawn from reserves plus accrued fees paid out.
    fn remove_liquidity(e: Env, params: PoolLiquidityParams) -> LiquidityResult;

    // Accrued fees only, `amount0`/`amount1` are ignored.
    fn collect_fees(e: Env, params: PoolLiquidityParams) -> LiquidityResult;
}
