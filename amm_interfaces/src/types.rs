use soroban_sdk::{contracttype, Address, Bytes, BytesN, Symbol, Vec};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolState {
    pub token0: Address,
    pub token1: Address,
    pub pool_hook: Option<Address>,
    pub reserve0: u128,
    pub reserve1: u128,
    pub fee_balance0: u128,
    pub fee_balance1: u128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolCreationDetails {
    pub pool_type: BytesN<20>,
    pub fee: u32,
    pub token0: Address,
    pub token1: Address,
    pub pool_hook: Option<Address>,
    pub pool_params: Bytes,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolCreationHooksExtraData {
    pub token0_hook: Bytes,
    pub token1_hook: Bytes,
    pub pool_hook: Bytes,
}

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProtocolFeeStructure {
    pub lp_fee_bps: u32,
    pub exchange_fee_bps: u32,
    pub fee_on_top_bps: u32,
}

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProtocolFeeOverride {
    pub enabled: bool,
    pub fee_bps: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenSettings {
    pub hop_fee_bps: u32,
    pub flags: u32,
    pub hook: Option<Address>,
}

// Swap order. Positive `amount_specified` fixes the input and `limit_amount` is the minimum
// output; negative fixes the output and `limit_amount` is the maximum input.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SwapOrder {
    pub deadline: u64,
    pub recipient: Address,
    pub amount_specified: i128,
    pub limit_amount: u128,
    pub token_in: Address,
    pub token_out: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BpsFeeWithRecipient {
    pub recipient: Address,
    pub bps: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FlatFeeWithRecipient {
    pub recipient: Address,
    pub amount: u128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SwapHooksExtraData {
    pub token_in_hook: Bytes,
    pub token_out_hook: Bytes,
    pub pool_hook: Bytes,
    pub pool_type: Bytes,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransferHandlerData {
    pub handler: Address,
    pub data: Bytes,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DirectSwapParams {
    pub swap_amount: u128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LiquidityModificationParams {
    pub pool_id: BytesN<32>,
    pub liquidity_hook: Option<Address>,
    // operation flags the position enables on its hook
    pub liquidity_hook_flags: u32,
    pub min_amount0: u128,
    pub min_amount1: u128,
    pub max_amount0: u128,
    pub max_amount1: u128,
    pub pool_params: Bytes,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LiquidityHooksExtraData {
    pub token0_hook: Bytes,
    pub token1_hook: Bytes,
    pub liquidity_hook: Bytes,
    pub pool_hook: Bytes,
}

// add-liquidity call chained onto pool creation, `function` has to be `add_liquidity`
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolLiquidityCall {
    pub function: Symbol,
    pub params: LiquidityModificationParams,
    pub hooks_data: LiquidityHooksExtraData,
}

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LiquidityResult {
    pub amount0: u128,
    pub amount1: u128,
    pub fees0: u128,
    pub fees1: u128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FlashloanRequest {
    pub token: Address,
    pub amount: u128,
    pub executor: Address,
    pub callback_data: Bytes,
}

// Snapshot handed to every hook; hooks can't call back into the engine.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HookContext {
    pub executor: Address,
    pub execution_state: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HookSwapParams {
    pub input_based: bool,
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: u128,
    pub amount_out: u128,
    pub recipient: Address,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum LiquidityOperation {
    Add = 0,
    Remove = 1,
    CollectFees = 2,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HookLiquidityParams {
    pub operation: LiquidityOperation,
    pub pool_id: BytesN<32>,
    pub provider: Address,
    pub amount0: u128,
    pub amount1: u128,
    pub fees0: u128,
    pub fees1: u128,
}

// Request from a hook to pay out its own accrued fees for (token_for, token_fee).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HookFeeCollection {
    pub token_for: Address,
    pub token_fee: Address,
    pub recipient: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HookSwapResponse {
    pub fee: u128,
    pub fee_collections: Vec<HookFeeCollection>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HookLiquidityResponse {
    pub fee0: u128,
    pub fee1: u128,
    pub fee_collections: Vec<HookFeeCollection>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FlashloanFeeQuote {
    pub fee_token: Address,
    pub fee_amount: u128,
    pub fee_collections: Vec<HookFeeCollection>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolSwapParams {
    pub pool_id: BytesN<32>,
    pub executor: Address,
    pub zero_for_one: bool,
    pub amount: u128,
    pub reserve_in: u128,
    pub reserve_out: u128,
    pub pool_fee_bps: u32,
    pub swap_data: Bytes,
}

// `lp_fee` is the part of `amount_in` kept as LP fee.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolSwapResult {
    pub amount_in: u128,
    pub amount_out: u128,
    pub lp_fee: u128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolLiquidityParams {
    pub pool_id: BytesN<32>,
    pub provider: Address,
    pub reserve0: u128,
    pub reserve1: u128,
    pub fee_balance0: u128,
    pub fee_balance1: u128,
    pub pool_params: Bytes,
}
