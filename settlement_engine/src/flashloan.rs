use crate::constants::MAX_BPS;
use crate::errors::EngineError;
use crate::events::{Events, SettlementEvents};
use crate::fees::{accrue_protocol_fee, bps_of, checked_add};
use crate::guard::{ExecutionGuard, EXECUTION_STATE_FLASHLOAN};
use crate::hooks::{self, hook_context};
use crate::settlement::{balance, is_zero_address, to_i128};
use crate::storage::get_flashloan_fee_bps;
use amm_interfaces::constants::FLASHLOAN_CALLBACK_SUCCESS;
use amm_interfaces::handler::FlashloanCallbackClient;
use amm_interfaces::types::{FlashloanRequest, TokenSettings};
use soroban_fixed_point_math::SorobanFixedPoint;
use soroban_sdk::token::TokenClient;
use soroban_sdk::{log, panic_with_error, Address, Bytes, BytesN, Env};

struct FeeTerms {
    fee_token: Address,
    fee_amount: u128,
    hook: Option<(Address, TokenSettings)>,
}

fn fee_terms(
    e: &Env,
    executor: &Address,
    request: &FlashloanRequest,
    fee_bps: u32,
    fee_hook_data: &Bytes,
) -> FeeTerms {
    let context = hook_context(e, executor);
    match hooks::flashloan_fee_quote(e, &context, &request.token, request.amount, fee_hook_data) {
        Some((hook, settings, quote)) => {
            if is_zero_address(e, &quote.fee_token) {
                panic_with_error!(e, EngineError::FlashloanFeeTokenCannotBeAddressZero);
            }
            if quote.fee_token != request.token
                && !hooks::fee_token_allowed_for_flashloan(
                    e,
                    &context,
                    &request.token,
                    &quote.fee_token,
                )
            {
                panic_with_error!(e, EngineError::FeeTokenNotAllowedForFlashloan);
            }
            FeeTerms {
                fee_token: quote.fee_token,
                fee_amount: quote.fee_amount,
                hook: Some((hook, settings)),
            }
        }
        None => FeeTerms {
            fee_token: request.token.clone(),
            fee_amount: request
                .amount
                .fixed_mul_ceil(e, &(fee_bps as u128), &(MAX_BPS as u128)),
            hook: None,
        },
    }
}

// Lends `request.amount` to the executor contract, runs its callback and checks by balance
// that loan and fee came back. Returns the fee token and the fee actually collected.
pub(crate) fn flashloan(
    e: &Env,
    initiator: &Address,
    request: &FlashloanRequest,
    fee_hook_data: &Bytes,
) -> (Address, u128) {
    let fee_bps = get_flashloan_fee_bps(e);
    if fee_bps > MAX_BPS {
        panic_with_error!(e, EngineError::FlashloansDisabled);
    }
    if request.amount == 0 {
        panic_with_error!(e, EngineError::InvalidAmountSpecified);
    }
    let _guard = ExecutionGuard::acquire(e, EXECUTION_STATE_FLASHLOAN);

    let terms = fee_terms(e, initiator, request, fee_bps, fee_hook_data);
    let same_token = terms.fee_token == request.token;
    let loan_balance = balance(e, &request.token);
    let fee_balance = match same_token {
        true => loan_balance,
        false => balance(e, &terms.fee_token),
    };

    TokenClient::new(e, &request.token).transfer(
        &e.current_contract_address(),
        &request.executor,
        &to_i128(e, request.amount),
    );

    let acknowledged = FlashloanCallbackClient::new(e, &request.executor).try_on_flashloan(
        initiator,
        &request.token,
        &request.amount,
        &terms.fee_token,
        &terms.fee_amount,
        &request.callback_data,
    );
    match acknowledged {
        Ok(Ok(magic)) if magic == BytesN::from_array(e, &FLASHLOAN_CALLBACK_SUCCESS) => (),
        _ => panic_with_error!(e, EngineError::FlashloanExecutionFailed),
    }

    // Anything paid above the quote counts as fee.
    let expected_fee_balance = checked_add(e, fee_balance, terms.fee_amount);
    let fee_balance_after = balance(e, &terms.fee_token);
    if fee_balance_after < expected_fee_balance {
        panic_with_error!(e, EngineError::FlashloanNotRepaid);
    }
    let total_fee = terms.fee_amount + (fee_balance_after - expected_fee_balance);
    if !same_token {
        let loan_balance_after = balance(e, &request.token);
        if loan_balance_after < loan_balance {
            panic_with_error!(e, EngineError::FlashloanNotRepaid);
        }
        accrue_protocol_fee(e, &request.token, loan_balance_after - loan_balance);
    }

    match &terms.hook {
        None => accrue_protocol_fee(e, &terms.fee_token, total_fee),
        Some((hook, settings)) => {
            let protocol_fee = bps_of(e, total_fee, fee_bps);
            accrue_protocol_fee(e, &terms.fee_token, protocol_fee);
            hooks::credit_flashloan_hook_fee(
                e,
                hook,
                settings,
                &request.token,
                &terms.fee_token,
                total_fee - protocol_fee,
            );
        }
    }
    log!(e, "flashloan settled", request.token.clone(), total_fee);

    Events::new(e).flashloan(
        request.executor.clone(),
        request.token.clone(),
        request.amount,
        terms.fee_token.clone(),
        total_fee,
    );
    (terms.fee_token, total_fee)
}
