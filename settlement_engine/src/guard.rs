use crate::errors::EngineError;
use crate::storage::{clear_execution_state, get_execution_state, set_execution_state};
use soroban_sdk::{panic_with_error, Env};

// Layered execution flags: every specific operation carries the bits of its category, so
// `state & SWAP == SWAP` holds for any kind of swap.
pub const EXECUTION_STATE_SWAP: u32 = 0x1;
pub const EXECUTION_STATE_POOL_SWAP: u32 = 0x2 | EXECUTION_STATE_SWAP;
pub const EXECUTION_STATE_SINGLE_SWAP: u32 = 0x4 | EXECUTION_STATE_POOL_SWAP;
pub const EXECUTION_STATE_MULTI_SWAP: u32 = 0x8 | EXECUTION_STATE_POOL_SWAP;
pub const EXECUTION_STATE_DIRECT_SWAP: u32 = 0x10 | EXECUTION_STATE_SWAP;
pub const EXECUTION_STATE_LIQUIDITY: u32 = 0x20;
pub const EXECUTION_STATE_ADD_LIQUIDITY: u32 = 0x40 | EXECUTION_STATE_LIQUIDITY;
pub const EXECUTION_STATE_REMOVE_LIQUIDITY: u32 = 0x80 | EXECUTION_STATE_LIQUIDITY;
pub const EXECUTION_STATE_COLLECT_FEES: u32 = 0x100 | EXECUTION_STATE_LIQUIDITY;
pub const EXECUTION_STATE_FLASHLOAN: u32 = 0x200;

pub(crate) fn check_execution_state(e: &Env, flags: u32) -> bool {
    flags != 0 && get_execution_state(e) & flags == flags
}

// Holds the execution flags of one top-level operation, cleared when dropped.
pub(crate) struct ExecutionGuard {
    env: Env,
}

impl ExecutionGuard {
    pub(crate) fn acquire(e: &Env, flags: u32) -> Self {
        if get_execution_state(e) != 0 {
            panic_with_error!(e, EngineError::ExecutionStateViolation);
        }
        set_execution_state(e, &flags);
        ExecutionGuard { env: e.clone() }
    }
}

impl Drop for ExecutionGuard {
    fn drop(&mut self) {
        clear_execution_state(&self.env);
    }
}
