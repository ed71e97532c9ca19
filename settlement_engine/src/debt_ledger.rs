use crate::errors::EngineError;
use crate::fees::checked_add;
use crate::settlement::try_transfer;
use crate::storage::{get_debt, set_debt};
use soroban_sdk::{contracttype, panic_with_error, Address, Env};

// Owed balances. The variant tag keeps the three namespaces apart.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DebtKey {
    // (owner, token): payouts that could not be transferred
    TokensOwed(Address, Address),
    // (hook, token_for, token_fee): fees collected by the hook itself
    HookFeeByHook(Address, Address, Address),
    // (token_for, token_fee): hook fees collected by the token admin
    HookFeeByToken(Address, Address),
}

pub(crate) fn balance(e: &Env, key: &DebtKey) -> u128 {
    get_debt(e, key)
}

pub(crate) fn credit(e: &Env, key: &DebtKey, amount: u128) {
    if amount == 0 {
        return;
    }
    let owed = checked_add(e, get_debt(e, key), amount);
    set_debt(e, key, &owed);
}

// Zeroes the balance and pays it out. A failed payout is fatal, the balance is never
// re-credited.
pub(crate) fn claim(e: &Env, key: &DebtKey, token: &Address, to: &Address) -> u128 {
    let amount = get_debt(e, key);
    if amount == 0 {
        return 0;
    }
    set_debt(e, key, &0);
    if !try_transfer(e, token, to, amount) {
        panic_with_error!(e, EngineError::TokenOwedTransferFailed);
    }
    amount
}
