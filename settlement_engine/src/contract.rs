use crate::constants::{FLASHLOANS_DISABLED_BPS, MAX_BPS};
use crate::debt_ledger::{self, DebtKey};
use crate::errors::EngineError;
use crate::events::{Events, SettlementEvents};
use crate::flashloan;
use crate::guard;
use crate::hooks;
use crate::interface::{
    AdminInterfaceTrait, DebtLedgerTrait, FlashloanTrait, LiquidityTrait, PoolRegistryTrait,
    ProtocolFeeTrait, SwapTrait, TokenSettingsTrait,
};
use crate::liquidity;
use crate::registry;
use crate::settlement::{is_zero_address, pay_or_credit, token_admin};
use crate::storage;
use crate::swap::{self, OrderFees};
use access_control::access::{AccessControl, AccessControlTrait};
use access_control::errors::AccessControlError;
use access_control::events::Events as AccessControlEvents;
use access_control::role::{Role, SymbolRepresentation};
use access_control::utils::{
    require_admin, require_fee_manager_or_admin, require_operations_admin_or_admin, role_holder,
};
use amm_interfaces::types::{
    BpsFeeWithRecipient, DirectSwapParams, FlashloanRequest, FlatFeeWithRecipient,
    HookFeeCollection, LiquidityHooksExtraData, LiquidityModificationParams, LiquidityResult,
    PoolCreationDetails, PoolCreationHooksExtraData, PoolLiquidityCall, PoolState,
    ProtocolFeeOverride, ProtocolFeeStructure, SwapHooksExtraData, SwapOrder, TokenSettings,
    TransferHandlerData,
};
use soroban_sdk::{
    contract, contractimpl, contractmeta, panic_with_error, Address, Bytes, BytesN, Env, Map,
    Symbol, Vec,
};

// Metadata that is added on to the WASM custom section
contractmeta!(
    key = "Description",
    val = "AMM settlement engine with pluggable pool types and hooks"
);

#[contract]
pub struct SettlementEngine;

fn validate_fee_override(e: &Env, value: &ProtocolFeeOverride) {
    if value.fee_bps > MAX_BPS {
        panic_with_error!(e, EngineError::InvalidFeeBps);
    }
}

fn require_token_admin(e: &Env, caller: &Address, token: &Address) {
    match token_admin(e, token) {
        Some(admin) if &admin == caller => (),
        _ => panic_with_error!(e, AccessControlError::Unauthorized),
    }
}

fn require_recipient(e: &Env, recipient: &Address) {
    if is_zero_address(e, recipient) {
        panic_with_error!(e, EngineError::RecipientCannotBeAddressZero);
    }
}

#[contractimpl]
impl SettlementEngine {
    // Initializes the engine roles.
    //
    // # Arguments
    //
    // * `admin` - Owner of the engine, assigns every other role.
    // * `fee_manager` - Manages protocol fee rates and collection.
    // * `operations_admin` - Registers pool types.
    // * `protocol_fee_receiver` - Receives collected protocol fees.
    pub fn __constructor(
        e: Env,
        admin: Address,
        fee_manager: Address,
        operations_admin: Address,
        protocol_fee_receiver: Address,
    ) {
        let access_control = AccessControl::new(&e);
        access_control.set_role_address(Role::Admin, &admin);
        access_control.set_role_address(Role::FeeManager, &fee_manager);
        access_control.set_role_address(Role::OperationsAdmin, &operations_admin);
        access_control.set_role_address(Role::ProtocolFeeReceiver, &protocol_fee_receiver);
    }
}

#[contractimpl]
impl PoolRegistryTrait for SettlementEngine {
    // Registers a pool type strategy.
    //
    // # Arguments
    //
    // * `operator` - Operations admin or admin.
    // * `pool_type` - 20 byte pool type key, the 6 leading bytes must be zero.
    // * `strategy` - Address of the pool type contract.
    fn register_pool_type(e: Env, operator: Address, pool_type: BytesN<20>, strategy: Address) {
        operator.require_auth();
        require_operations_admin_or_admin(&e, &operator);
        registry::register_pool_type(&e, &pool_type, &strategy);
    }

    fn get_pool_type_strategy(e: Env, pool_type: BytesN<20>) -> Option<Address> {
        storage::get_pool_type_strategy(&e, &pool_type)
    }

    // Creates a pool.
    //
    // # Arguments
    //
    // * `creator` - Pool creator, also the liquidity provider of the optional first deposit.
    // * `details` - Pool type, fee, sorted tokens, pool hook and pool type parameters.
    // * `hooks_data` - Opaque data for the token and pool hooks.
    // * `liquidity` - Optional `add_liquidity` call executed right after creation.
    //
    // # Returns
    //
    // The pool id.
    fn create_pool(
        e: Env,
        creator: Address,
        details: PoolCreationDetails,
        hooks_data: PoolCreationHooksExtraData,
        liquidity: Option<PoolLiquidityCall>,
    ) -> BytesN<32> {
        creator.require_auth();
        registry::create_pool(&e, &creator, &details, &hooks_data, &liquidity)
    }

    fn get_pool_state(e: Env, pool_id: BytesN<32>) -> PoolState {
        storage::get_pool(&e, &pool_id)
    }
}

#[contractimpl]
impl SwapTrait for SettlementEngine {
    fn single_swap(
        e: Env,
        executor: Address,
        order: SwapOrder,
        pool_id: BytesN<32>,
        exchange_fee: BpsFeeWithRecipient,
        fee_on_top: FlatFeeWithRecipient,
        hooks_data: SwapHooksExtraData,
        transfer_handler: Option<TransferHandlerData>,
    ) -> (u128, u128) {
        executor.require_auth();
        swap::single_swap(
            &e,
            &executor,
            &order,
            &pool_id,
            &OrderFees {
                exchange_fee,
                fee_on_top,
            },
            &hooks_data,
            &transfer_handler,
        )
    }

    fn multi_swap(
        e: Env,
        executor: Address,
        order: SwapOrder,
        pool_ids: Vec<BytesN<32>>,
        exchange_fee: BpsFeeWithRecipient,
        fee_on_top: FlatFeeWithRecipient,
        hooks_data: Vec<SwapHooksExtraData>,
        transfer_handler: Option<TransferHandlerData>,
    ) -> (u128, u128) {
        executor.require_auth();
        swap::multi_swap(
            &e,
            &executor,
            &order,
            &pool_ids,
            &OrderFees {
                exchange_fee,
                fee_on_top,
            },
            &hooks_data,
            &transfer_handler,
        )
    }

    fn direct_swap(
        e: Env,
        executor: Address,
        order: SwapOrder,
        params: DirectSwapParams,
        exchange_fee: BpsFeeWithRecipient,
        fee_on_top: FlatFeeWithRecipient,
        hooks_data: SwapHooksExtraData,
        transfer_handler: Option<TransferHandlerData>,
    ) -> (u128, u128) {
        executor.require_auth();
        if transfer_handler.is_none() {
            order.recipient.require_auth();
        }
        swap::direct_swap(
            &e,
            &executor,
            &order,
            &params,
            &OrderFees {
                exchange_fee,
                fee_on_top,
            },
            &hooks_data,
            &transfer_handler,
        )
    }
}

#[contractimpl]
impl LiquidityTrait for SettlementEngine {
    fn add_liquidity(
        e: Env,
        provider: Address,
        params: LiquidityModificationParams,
        hooks_data: LiquidityHooksExtraData,
    ) -> LiquidityResult {
        provider.require_auth();
        liquidity::add_liquidity(&e, &provider, &params, &hooks_data)
    }

    fn remove_liquidity(
        e: Env,
        provider: Address,
        params: LiquidityModificationParams,
        hooks_data: LiquidityHooksExtraData,
    ) -> LiquidityResult {
        provider.require_auth();
        liquidity::remove_liquidity(&e, &provider, &params, &hooks_data)
    }

    fn collect_fees(
        e: Env,
        provider: Address,
        params: LiquidityModificationParams,
        hooks_data: LiquidityHooksExtraData,
    ) -> LiquidityResult {
        provider.require_auth();
        liquidity::collect_fees(&e, &provider, &params, &hooks_data)
    }
}

#[contractimpl]
impl FlashloanTrait for SettlementEngine {
    // Lends tokens to `request.executor` for the duration of its callback.
    //
    // # Arguments
    //
    // * `initiator` - Account requesting the loan, forwarded to the callback.
    // * `request` - Token, amount, callback contract and its data.
    // * `fee_hook_data` - Opaque data for the loan token's flash loan fee hook.
    fn flashloan(
        e: Env,
        initiator: Address,
        request: FlashloanRequest,
        fee_hook_data: Bytes,
    ) -> (Address, u128) {
        initiator.require_auth();
        flashloan::flashloan(&e, &initiator, &request, &fee_hook_data)
    }

    fn get_flashloan_fee_bps(e: Env) -> u32 {
        storage::get_flashloan_fee_bps(&e)
    }
}

#[contractimpl]
impl TokenSettingsTrait for SettlementEngine {
    fn set_token_settings(e: Env, caller: Address, token: Address, settings: TokenSettings) {
        caller.require_auth();
        require_token_admin(&e, &caller, &token);
        hooks::validate_token_settings(&e, &settings);

        storage::set_token_settings(&e, &token, &settings);
        Events::new(&e).token_settings_updated(token, settings);
    }

    fn get_token_settings(e: Env, token: Address) -> TokenSettings {
        storage::get_token_settings(&e, &token)
    }
}

#[contractimpl]
impl ProtocolFeeTrait for SettlementEngine {
    fn set_protocol_fee_structure(e: Env, caller: Address, structure: ProtocolFeeStructure) {
        caller.require_auth();
        require_fee_manager_or_admin(&e, &caller);
        if structure.lp_fee_bps > MAX_BPS
            || structure.exchange_fee_bps > MAX_BPS
            || structure.fee_on_top_bps > MAX_BPS
        {
            panic_with_error!(&e, EngineError::InvalidFeeBps);
        }

        storage::set_protocol_fee_structure(&e, &structure);
        Events::new(&e).fee_structure_updated(structure);
    }

    fn get_protocol_fee_structure(e: Env) -> ProtocolFeeStructure {
        storage::get_protocol_fee_structure(&e)
    }

    fn set_exchange_fee_override(
        e: Env,
        caller: Address,
        recipient: Address,
        value: ProtocolFeeOverride,
    ) {
        caller.require_auth();
        require_fee_manager_or_admin(&e, &caller);
        validate_fee_override(&e, &value);

        storage::set_exchange_fee_override(&e, &recipient, &value);
        Events::new(&e).exchange_fee_override_updated(recipient, value);
    }

    fn get_exchange_fee_override(e: Env, recipient: Address) -> ProtocolFeeOverride {
        storage::get_exchange_fee_override(&e, &recipient)
    }

    fn set_fee_on_top_override(
        e: Env,
        caller: Address,
        recipient: Address,
        value: ProtocolFeeOverride,
    ) {
        caller.require_auth();
        require_fee_manager_or_admin(&e, &caller);
        validate_fee_override(&e, &value);

        storage::set_fee_on_top_override(&e, &recipient, &value);
        Events::new(&e).fee_on_top_override_updated(recipient, value);
    }

    fn get_fee_on_top_override(e: Env, recipient: Address) -> ProtocolFeeOverride {
        storage::get_fee_on_top_override(&e, &recipient)
    }

    fn set_lp_fee_override(e: Env, caller: Address, pool_id: BytesN<32>, value: ProtocolFeeOverride) {
        caller.require_auth();
        require_fee_manager_or_admin(&e, &caller);
        validate_fee_override(&e, &value);
        if !storage::has_pool(&e, &pool_id) {
            panic_with_error!(&e, EngineError::PoolDoesNotExist);
        }

        storage::set_lp_fee_override(&e, &pool_id, &value);
        Events::new(&e).lp_fee_override_updated(pool_id, value);
    }

    fn get_lp_fee_override(e: Env, pool_id: BytesN<32>) -> ProtocolFeeOverride {
        storage::get_lp_fee_override(&e, &pool_id)
    }

    fn set_flashloan_fee_bps(e: Env, caller: Address, fee_bps: u32) {
        caller.require_auth();
        require_fee_manager_or_admin(&e, &caller);
        if fee_bps > MAX_BPS && fee_bps < FLASHLOANS_DISABLED_BPS {
            panic_with_error!(&e, EngineError::InvalidFeeBps);
        }

        storage::set_flashloan_fee_bps(&e, &fee_bps);
        Events::new(&e).flashloan_fee_updated(fee_bps);
    }

    fn get_protocol_fees(e: Env, token: Address) -> u128 {
        storage::get_protocol_fees(&e, &token)
    }

    fn collect_protocol_fees(e: Env, caller: Address, tokens: Vec<Address>) -> Vec<u128> {
        caller.require_auth();
        require_fee_manager_or_admin(&e, &caller);
        let receiver = role_holder(&e, Role::ProtocolFeeReceiver);

        let mut collected = Vec::new(&e);
        for token in tokens.iter() {
            let amount = storage::get_protocol_fees(&e, &token);
            if amount > 0 {
                storage::set_protocol_fees(&e, &token, &0);
                pay_or_credit(&e, &token, &receiver, amount);
                Events::new(&e).protocol_fees_collected(token.clone(), receiver.clone(), amount);
            }
            collected.push_back(amount);
        }
        collected
    }
}

#[contractimpl]
impl DebtLedgerTrait for SettlementEngine {
    fn get_tokens_owed(e: Env, owner: Address, token: Address) -> u128 {
        debt_ledger::balance(&e, &DebtKey::TokensOwed(owner, token))
    }

    // Pays out what failed to transfer earlier. The owner is the only one who can claim.
    fn claim_tokens_owed(e: Env, owner: Address, token: Address) -> u128 {
        owner.require_auth();
        let amount = debt_ledger::claim(
            &e,
            &DebtKey::TokensOwed(owner.clone(), token.clone()),
            &token,
            &owner,
        );
        if amount > 0 {
            Events::new(&e).tokens_claimed(owner, token, amount);
        }
        amount
    }

    fn get_hook_fees_by_hook(e: Env, hook: Address, token_for: Address, token_fee: Address) -> u128 {
        debt_ledger::balance(&e, &DebtKey::HookFeeByHook(hook, token_for, token_fee))
    }

    fn collect_hook_fees_by_hook(
        e: Env,
        hook: Address,
        token_for: Address,
        token_fee: Address,
        recipient: Address,
    ) -> u128 {
        hook.require_auth();
        require_recipient(&e, &recipient);
        hooks::execute_fee_collection(
            &e,
            &hook,
            &HookFeeCollection {
                token_for,
                token_fee,
                recipient,
            },
        )
    }

    fn get_hook_fees_by_token(e: Env, token_for: Address, token_fee: Address) -> u128 {
        debt_ledger::balance(&e, &DebtKey::HookFeeByToken(token_for, token_fee))
    }

    fn collect_hook_fees_by_token(
        e: Env,
        caller: Address,
        token_for: Address,
        token_fee: Address,
        recipient: Address,
    ) -> u128 {
        caller.require_auth();
        require_token_admin(&e, &caller, &token_for);
        require_recipient(&e, &recipient);

        let amount = debt_ledger::claim(
            &e,
            &DebtKey::HookFeeByToken(token_for.clone(), token_fee.clone()),
            &token_fee,
            &recipient,
        );
        if amount > 0 {
            Events::new(&e).token_hook_fees_collected(token_for, token_fee, recipient, amount);
        }
        amount
    }
}

#[contractimpl]
impl AdminInterfaceTrait for SettlementEngine {
    // Sets the privileged addresses.
    //
    // # Arguments
    //
    // * `admin` - The address of the admin.
    // * `fee_manager` - The address of the fee manager.
    // * `operations_admin` - The address of the operations admin.
    // * `protocol_fee_receiver` - The address receiving collected protocol fees.
    fn set_privileged_addrs(
        e: Env,
        admin: Address,
        fee_manager: Address,
        operations_admin: Address,
        protocol_fee_receiver: Address,
    ) {
        admin.require_auth();
        require_admin(&e, &admin);

        let access_control = AccessControl::new(&e);
        access_control.set_role_address(Role::FeeManager, &fee_manager);
        access_control.set_role_address(Role::OperationsAdmin, &operations_admin);
        access_control.set_role_address(Role::ProtocolFeeReceiver, &protocol_fee_receiver);
        AccessControlEvents::new(&e).set_privileged_addrs(
            admin,
            fee_manager,
            operations_admin,
            protocol_fee_receiver,
        );
    }

    // Returns a map of privileged roles.
    //
    // # Returns
    //
    // A map of privileged roles to their respective addresses.
    fn get_privileged_addrs(e: Env) -> Map<Symbol, Vec<Address>> {
        let access_control = AccessControl::new(&e);
        let mut result: Map<Symbol, Vec<Address>> = Map::new(&e);
        for role in [
            Role::Admin,
            Role::FeeManager,
            Role::OperationsAdmin,
            Role::ProtocolFeeReceiver,
        ] {
            result.set(
                role.as_symbol(&e),
                match access_control.get_role_safe(role) {
                    Some(v) => Vec::from_array(&e, [v]),
                    None => Vec::new(&e),
                },
            );
        }
        result
    }

    fn check_execution_state(e: Env, flags: u32) -> bool {
        guard::check_execution_state(&e, flags)
    }

    fn version() -> u32 {
        100
    }
}
