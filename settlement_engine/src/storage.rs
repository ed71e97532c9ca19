use crate::constants::FLASHLOANS_DISABLED_BPS;
use crate::debt_ledger::DebtKey;
use crate::errors::EngineError;
use amm_interfaces::types::{
    HookFeeCollection, PoolState, ProtocolFeeOverride, ProtocolFeeStructure, TokenSettings,
};
use paste::paste;
use soroban_sdk::{contracttype, panic_with_error, Address, BytesN, Env, Vec};
use utils::bump::{bump_instance, bump_persistent};
use utils::generate_instance_storage_getter_and_setter_with_default;
use utils::generate_instance_storage_getter_with_default;
use utils::generate_instance_storage_setter;

#[derive(Clone)]
#[contracttype]
pub(crate) enum DataKey {
    // instance
    ProtocolFeeStructure,
    FlashloanFeeBps,
    ExecutionState,
    QueuedHookFees,

    // persistent
    PoolTypeStrategy(BytesN<20>),
    Pool(BytesN<32>),
    TokenSettings(Address),
    ExchangeFeeOverride(Address),
    FeeOnTopOverride(Address),
    LpFeeOverride(BytesN<32>),
    ProtocolFees(Address),
    Debt(DebtKey),
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct QueuedHookFee {
    pub hook: Address,
    pub collection: HookFeeCollection,
}

generate_instance_storage_getter_and_setter_with_default!(
    protocol_fee_structure,
    DataKey::ProtocolFeeStructure,
    ProtocolFeeStructure,
    ProtocolFeeStructure::default()
);
generate_instance_storage_getter_and_setter_with_default!(
    flashloan_fee_bps,
    DataKey::FlashloanFeeBps,
    u32,
    FLASHLOANS_DISABLED_BPS
);
generate_instance_storage_getter_and_setter_with_default!(
    execution_state,
    DataKey::ExecutionState,
    u32,
    0
);
pub(crate) fn clear_execution_state(e: &Env) {
    e.storage().instance().remove(&DataKey::ExecutionState);
}

pub(crate) fn get_queued_hook_fees(e: &Env) -> Vec<QueuedHookFee> {
    e.storage()
        .instance()
        .get(&DataKey::QueuedHookFees)
        .unwrap_or(Vec::new(e))
}

pub(crate) fn set_queued_hook_fees(e: &Env, queue: &Vec<QueuedHookFee>) {
    e.storage().instance().set(&DataKey::QueuedHookFees, queue);
}

pub(crate) fn clear_queued_hook_fees(e: &Env) {
    e.storage().instance().remove(&DataKey::QueuedHookFees);
}

fn get_persistent<V>(e: &Env, key: &DataKey) -> Option<V>
where
    V: soroban_sdk::TryFromVal<Env, soroban_sdk::Val>,
{
    let value = e.storage().persistent().get(key);
    if value.is_some() {
        bump_persistent(e, key);
    }
    value
}

fn put_persistent<V>(e: &Env, key: &DataKey, value: &V)
where
    V: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
{
    e.storage().persistent().set(key, value);
    bump_persistent(e, key);
}

// pool types
pub(crate) fn get_pool_type_strategy(e: &Env, pool_type: &BytesN<20>) -> Option<Address> {
    get_persistent(e, &DataKey::PoolTypeStrategy(pool_type.clone()))
}

pub(crate) fn set_pool_type_strategy(e: &Env, pool_type: &BytesN<20>, strategy: &Address) {
    put_persistent(e, &DataKey::PoolTypeStrategy(pool_type.clone()), strategy);
}

// pools
pub(crate) fn has_pool(e: &Env, pool_id: &BytesN<32>) -> bool {
    e.storage()
        .persistent()
        .has(&DataKey::Pool(pool_id.clone()))
}

pub(crate) fn get_pool(e: &Env, pool_id: &BytesN<32>) -> PoolState {
    match get_persistent(e, &DataKey::Pool(pool_id.clone())) {
        Some(pool) => pool,
        None => panic_with_error!(e, EngineError::PoolDoesNotExist),
    }
}

pub(crate) fn put_pool(e: &Env, pool_id: &BytesN<32>, pool: &PoolState) {
    put_persistent(e, &DataKey::Pool(pool_id.clone()), pool);
}

// token settings
pub(crate) fn get_token_settings(e: &Env, token: &Address) -> TokenSettings {
    get_persistent(e, &DataKey::TokenSettings(token.clone())).unwrap_or(TokenSettings {
        hop_fee_bps: 0,
        flags: 0,
        hook: None,
    })
}

pub(crate) fn set_token_settings(e: &Env, token: &Address, settings: &TokenSettings) {
    put_persistent(e, &DataKey::TokenSettings(token.clone()), settings);
}

// protocol fee overrides
pub(crate) fn get_exchange_fee_override(e: &Env, recipient: &Address) -> ProtocolFeeOverride {
    get_persistent(e, &DataKey::ExchangeFeeOverride(recipient.clone())).unwrap_or_default()
}

pub(crate) fn set_exchange_fee_override(
    e: &Env,
    recipient: &Address,
    value: &ProtocolFeeOverride,
) {
    put_persistent(e, &DataKey::ExchangeFeeOverride(recipient.clone()), value);
}

pub(crate) fn get_fee_on_top_override(e: &Env, recipient: &Address) -> ProtocolFeeOverride {
    get_persistent(e, &DataKey::FeeOnTopOverride(recipient.clone())).unwrap_or_default()
}

pub(crate) fn set_fee_on_top_override(e: &Env, recipient: &Address, value: &ProtocolFeeOverride) {
    put_persistent(e, &DataKey::FeeOnTopOverride(recipient.clone()), value);
}

pub(crate) fn get_lp_fee_override(e: &Env, pool_id: &BytesN<32>) -> ProtocolFeeOverride {
    get_persistent(e, &DataKey::LpFeeOverride(pool_id.clone())).unwrap_or_default()
}

pub(crate) fn set_lp_fee_override(e: &Env, pool_id: &BytesN<32>, value: &ProtocolFeeOverride) {
    put_persistent(e, &DataKey::LpFeeOverride(pool_id.clone()), value);
}

// protocol fee accruals
pub(crate) fn get_protocol_fees(e: &Env, token: &Address) -> u128 {
    get_persistent(e, &DataKey::ProtocolFees(token.clone())).unwrap_or(0)
}

pub(crate) fn set_protocol_fees(e: &Env, token: &Address, amount: &u128) {
    put_persistent(e, &DataKey::ProtocolFees(token.clone()), amount);
}

// debts
pub(crate) fn get_debt(e: &Env, key: &DebtKey) -> u128 {
    get_persistent(e, &DataKey::Debt(key.clone())).unwrap_or(0)
}

pub(crate) fn set_debt(e: &Env, key: &DebtKey, amount: &u128) {
    put_persistent(e, &DataKey::Debt(key.clone()), amount);
}
