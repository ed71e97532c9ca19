use crate::debt_ledger::{self, DebtKey};
use crate::errors::EngineError;
use amm_interfaces::handler::TransferHandlerClient;
use amm_interfaces::types::{HookContext, TransferHandlerData};
use soroban_sdk::token::{StellarAssetClient, TokenClient};
use soroban_sdk::{log, panic_with_error, Address, Env};

pub(crate) fn to_i128(e: &Env, amount: u128) -> i128 {
    match i128::try_from(amount) {
        Ok(v) => v,
        Err(_) => panic_with_error!(e, EngineError::Overflow),
    }
}

// engine address stands in for the zero address
pub(crate) fn is_zero_address(e: &Env, address: &Address) -> bool {
    address == &e.current_contract_address()
}

// Admin of a Stellar asset style token, `None` when the token doesn't expose one.
pub(crate) fn token_admin(e: &Env, token: &Address) -> Option<Address> {
    match StellarAssetClient::new(e, token).try_admin() {
        Ok(Ok(admin)) => Some(admin),
        _ => None,
    }
}

pub(crate) fn balance(e: &Env, token: &Address) -> u128 {
    let balance = TokenClient::new(e, token).balance(&e.current_contract_address());
    if balance < 0 {
        panic_with_error!(e, EngineError::Underflow);
    }
    balance as u128
}

pub(crate) fn try_transfer(e: &Env, token: &Address, to: &Address, amount: u128) -> bool {
    if amount == 0 {
        return true;
    }
    let result = TokenClient::new(e, token).try_transfer(
        &e.current_contract_address(),
        to,
        &to_i128(e, amount),
    );
    matches!(result, Ok(Ok(())))
}

// Pays `to`, or records the amount as owed when the token refuses the transfer.
pub(crate) fn pay_or_credit(e: &Env, token: &Address, to: &Address, amount: u128) {
    if try_transfer(e, token, to, amount) {
        return;
    }
    log!(e, "transfer failed, crediting debt", token.clone(), to.clone(), amount);
    debt_ledger::credit(e, &DebtKey::TokensOwed(to.clone(), token.clone()), amount);
}

// Pulls tokens from an authorized payer. Failure aborts the operation.
pub(crate) fn collect(e: &Env, token: &Address, from: &Address, amount: u128) {
    if amount == 0 {
        return;
    }
    TokenClient::new(e, token).transfer(from, &e.current_contract_address(), &to_i128(e, amount));
}

pub(crate) fn collect_input(
    e: &Env,
    context: &HookContext,
    payer: &Address,
    token: &Address,
    amount: u128,
    transfer_handler: &Option<TransferHandlerData>,
) {
    match transfer_handler {
        None => collect(e, token, payer, amount),
        Some(handler) => {
            let before = balance(e, token);
            TransferHandlerClient::new(e, &handler.handler).handle_transfer(
                context,
                payer,
                token,
                &amount,
                &handler.data,
            );
            let received = balance(e, token).saturating_sub(before);
            if received < amount {
                panic_with_error!(e, EngineError::TransferHandlerFailedToSettle);
            }
        }
    }
}
