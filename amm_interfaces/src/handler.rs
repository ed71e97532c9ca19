use crate::types::HookContext;
use soroban_sdk::{contractclient, Address, Bytes, BytesN, Env};

// Alternate source for swap input. The handler must move `amount` of `token` to the engine
// before returning; the engine checks its own balance.
#[contractclient(name = "TransferHandlerClient")]
pub trait TransferHandlerInterface {
    fn handle_transfer(
        e: Env,
        context: HookContext,
        payer: Address,
        token: Address,
        amount: u128,
        data: Bytes,
    );
}

// Flash loan receiver. Repays loan and fee to the engine inside the callback and answers
// with `FLASHLOAN_CALLBACK_SUCCESS`.
#[contractclient(name = "FlashloanCallbackClient")]
pub trait FlashloanCallbackInterface {
    fn on_flashloan(
        e: Env,
        initiator: Address,
        token: Address,
        amount: u128,
        fee_token: Address,
        fee_amount: u128,
        callback_data: Bytes,
    ) -> BytesN<32>;
}
