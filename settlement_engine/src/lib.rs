#![no_std]

mod constants;
mod contract;
mod debt_ledger;
pub mod errors;
mod events;
mod fees;
mod flashloan;
mod guard;
mod hooks;
mod interface;
mod liquidity;
mod registry;
mod settlement;
mod storage;
mod swap;

mod test;
mod test_fees;
mod test_flashloan;
mod test_liquidity;
mod test_permissions;
mod test_swap;
mod testutils;

pub use contract::{SettlementEngine, SettlementEngineArgs, SettlementEngineClient};
pub use debt_ledger::DebtKey;
pub use guard::{
    EXECUTION_STATE_ADD_LIQUIDITY, EXECUTION_STATE_COLLECT_FEES, EXECUTION_STATE_DIRECT_SWAP,
    EXECUTION_STATE_FLASHLOAN, EXECUTION_STATE_LIQUIDITY, EXECUTION_STATE_MULTI_SWAP,
    EXECUTION_STATE_POOL_SWAP, EXECUTION_STATE_REMOVE_LIQUIDITY, EXECUTION_STATE_SINGLE_SWAP,
    EXECUTION_STATE_SWAP,
};
