use crate::constants::MAX_BPS;
use crate::errors::EngineError;
use crate::storage::{
    get_exchange_fee_override, get_fee_on_top_override, get_lp_fee_override,
    get_protocol_fee_structure, get_protocol_fees, set_protocol_fees,
};
use amm_interfaces::types::ProtocolFeeOverride;
use soroban_fixed_point_math::SorobanFixedPoint;
use soroban_sdk::{panic_with_error, Address, BytesN, Env};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct FeeSplit {
    pub recipient: u128,
    pub protocol: u128,
}

impl FeeSplit {
    pub fn total(&self) -> u128 {
        self.recipient + self.protocol
    }
}

// Protocol shares of the order level fees, overrides already applied.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct ProtocolRates {
    pub exchange_fee_bps: u32,
    pub fee_on_top_bps: u32,
}

// Scratch space of one swap call.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct SwapCache {
    pub amount_in: u128,
    pub amount_out: u128,
    pub exchange_fee: FeeSplit,
    pub fee_on_top: FeeSplit,
    // protocol share of the order fees, denominated in the input token
    pub protocol_fee: u128,
}

fn validate_bps(e: &Env, bps: u32) {
    if bps > MAX_BPS {
        panic_with_error!(e, EngineError::FeeExceedsMaxFee);
    }
}

// floor(amount * bps / MAX_BPS)
pub(crate) fn bps_of(e: &Env, amount: u128, bps: u32) -> u128 {
    validate_bps(e, bps);
    amount.fixed_mul_floor(e, &(bps as u128), &(MAX_BPS as u128))
}

// ceil(amount * bps / (MAX_BPS - bps)): the fee that, charged on the result, leaves `amount`
pub(crate) fn gross_up(e: &Env, amount: u128, bps: u32) -> u128 {
    if bps >= MAX_BPS {
        panic_with_error!(e, EngineError::FeeExceedsMaxFee);
    }
    amount.fixed_mul_ceil(e, &(bps as u128), &((MAX_BPS - bps) as u128))
}

pub(crate) fn split(e: &Env, amount: u128, protocol_bps: u32) -> FeeSplit {
    let protocol = bps_of(e, amount, protocol_bps);
    FeeSplit {
        recipient: amount - protocol,
        protocol,
    }
}

pub(crate) fn checked_add(e: &Env, a: u128, b: u128) -> u128 {
    match a.checked_add(b) {
        Some(v) => v,
        None => panic_with_error!(e, EngineError::Overflow),
    }
}

pub(crate) fn checked_sub(e: &Env, a: u128, b: u128) -> u128 {
    match a.checked_sub(b) {
        Some(v) => v,
        None => panic_with_error!(e, EngineError::Underflow),
    }
}

// Input fixed: fee on top comes off the gross input first, the exchange fee is charged on
// what remains.
pub(crate) fn apply_fees_to_input(
    e: &Env,
    cache: &mut SwapCache,
    exchange_fee_bps: u32,
    fee_on_top: u128,
    rates: &ProtocolRates,
) {
    validate_bps(e, exchange_fee_bps);

    if fee_on_top > 0 {
        if fee_on_top > cache.amount_in {
            panic_with_error!(e, EngineError::FeeExceedsInput);
        }
        cache.amount_in -= fee_on_top;
        cache.fee_on_top = split(e, fee_on_top, rates.fee_on_top_bps);
    }

    if exchange_fee_bps > 0 {
        let fee = bps_of(e, cache.amount_in, exchange_fee_bps);
        cache.amount_in -= fee;
        cache.exchange_fee = split(e, fee, rates.exchange_fee_bps);
    }

    cache.protocol_fee = cache.fee_on_top.protocol + cache.exchange_fee.protocol;
}

// Output fixed: `cache.amount_in` holds what the pools need, the exchange fee is grossed up on
// top of it and the flat fee is added last.
pub(crate) fn apply_fees_to_output(
    e: &Env,
    cache: &mut SwapCache,
    exchange_fee_bps: u32,
    fee_on_top: u128,
    rates: &ProtocolRates,
) {
    if exchange_fee_bps > 0 {
        let fee = gross_up(e, cache.amount_in, exchange_fee_bps);
        cache.amount_in = checked_add(e, cache.amount_in, fee);
        cache.exchange_fee = split(e, fee, rates.exchange_fee_bps);
    }

    if fee_on_top > 0 {
        cache.amount_in = checked_add(e, cache.amount_in, fee_on_top);
        cache.fee_on_top = split(e, fee_on_top, rates.fee_on_top_bps);
    }

    cache.protocol_fee = cache.fee_on_top.protocol + cache.exchange_fee.protocol;
}

fn resolve(fee_override: ProtocolFeeOverride, default_bps: u32) -> u32 {
    match fee_override.enabled {
        true => fee_override.fee_bps,
        false => default_bps,
    }
}

pub(crate) fn resolve_protocol_rates(
    e: &Env,
    exchange_fee_recipient: &Address,
    fee_on_top_recipient: &Address,
) -> ProtocolRates {
    let structure = get_protocol_fee_structure(e);
    ProtocolRates {
        exchange_fee_bps: resolve(
            get_exchange_fee_override(e, exchange_fee_recipient),
            structure.exchange_fee_bps,
        ),
        fee_on_top_bps: resolve(
            get_fee_on_top_override(e, fee_on_top_recipient),
            structure.fee_on_top_bps,
        ),
    }
}

pub(crate) fn lp_protocol_bps(e: &Env, pool_id: &BytesN<32>) -> u32 {
    resolve(
        get_lp_fee_override(e, pool_id),
        get_protocol_fee_structure(e).lp_fee_bps,
    )
}

pub(crate) fn accrue_protocol_fee(e: &Env, token: &Address, amount: u128) {
    if amount == 0 {
        return;
    }
    let accrued = checked_add(e, get_protocol_fees(e, token), amount);
    set_protocol_fees(e, token, &accrued);
}
