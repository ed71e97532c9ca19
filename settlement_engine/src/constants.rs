pub(crate) use amm_interfaces::constants::{DYNAMIC_POOL_FEE_BPS, MAX_BPS};

// anything above the u16 range switches flash loans off
pub(crate) const FLASHLOANS_DISABLED_BPS: u32 = u16::MAX as u32 + 1;

pub(crate) const ADD_LIQUIDITY_FN: &str = "add_liquidity";
