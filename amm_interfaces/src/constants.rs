pub const MAX_BPS: u32 = 10_000;

// pool fee value telling the engine to ask the pool hook for the LP rate on every swap
pub const DYNAMIC_POOL_FEE_BPS: u32 = 55_555;

// Token settings capability flags.
pub const BEFORE_SWAP_FLAG: u32 = 1 << 0;
pub const AFTER_SWAP_FLAG: u32 = 1 << 1;
pub const ADD_LIQUIDITY_FLAG: u32 = 1 << 2;
pub const REMOVE_LIQUIDITY_FLAG: u32 = 1 << 3;
pub const COLLECT_FEES_FLAG: u32 = 1 << 4;
pub const POOL_CREATION_FLAG: u32 = 1 << 5;
pub const FLASHLOAN_FEE_FLAG: u32 = 1 << 6;
pub const FLASHLOAN_FEE_TOKEN_FLAG: u32 = 1 << 7;
pub const HOOK_MANAGES_FEES_FLAG: u32 = 1 << 8;

pub const FLASHLOAN_CALLBACK_SUCCESS: [u8; 32] = *b"FLASHLOAN_CALLBACK_ACKNOWLEDGED_";
