use amm_interfaces::types::{
    BpsFeeWithRecipient, DirectSwapParams, FlashloanRequest, FlatFeeWithRecipient,
    LiquidityHooksExtraData, LiquidityModificationParams, LiquidityResult,
    PoolCreationDetails, PoolCreationHooksExtraData, PoolLiquidityCall, PoolState,
    ProtocolFeeOverride, ProtocolFeeStructure, SwapHooksExtraData, SwapOrder, TokenSettings,
    TransferHandlerData,
};
use soroban_sdk::{Address, Bytes, BytesN, Env, Map, Symbol, Vec};

pub trait PoolRegistryTrait {
    // Binds a pool type key to its strategy contract. Operations admin only.
    fn register_pool_type(e: Env, operator: Address, pool_type: BytesN<20>, strategy: Address);

    fn get_pool_type_strategy(e: Env, pool_type: BytesN<20>) -> Option<Address>;

    // Creates a pool through its pool type strategy and optionally seeds it with liquidity.
    // Returns the pool id.
    fn create_pool(
        e: Env,
        creator: Address,
        details: PoolCreationDetails,
        hooks_data: PoolCreationHooksExtraData,
        liquidity: Option<PoolLiquidityCall>,
    ) -> BytesN<32>;

    fn get_pool_state(e: Env, pool_id: BytesN<32>) -> PoolState;
}

pub trait SwapTrait {
    // Swap through one pool.
    // amount_specified > 0: exact input, limit_amount is the minimum output
    // amount_specified < 0: exact output, limit_amount is the maximum input
    // Returns (amount paid by the executor, amount delivered to the recipient)
    fn single_swap(
        e: Env,
        executor: Address,
        order: SwapOrder,
        pool_id: BytesN<32>,
        exchange_fee: BpsFeeWithRecipient,
        fee_on_top: FlatFeeWithRecipient,
        hooks_data: SwapHooksExtraData,
        transfer_handler: Option<TransferHandlerData>,
    ) -> (u128, u128);

    // Swap along a route of pools, one hook data entry per pool.
    fn multi_swap(
        e: Env,
        executor: Address,
        order: SwapOrder,
        pool_ids: Vec<BytesN<32>>,
        exchange_fee: BpsFeeWithRecipient,
        fee_on_top: FlatFeeWithRecipient,
        hooks_data: Vec<SwapHooksExtraData>,
        transfer_handler: Option<TransferHandlerData>,
    ) -> (u128, u128);

    // Fill an order of `order.recipient` directly with the executor's own tokens.
    // params.swap_amount is the executor's quote: output delivered (exact input) or net input
    // asked (exact output).
    fn direct_swap(
        e: Env,
        executor: Address,
        order: SwapOrder,
        params: DirectSwapParams,
        exchange_fee: BpsFeeWithRecipient,
        fee_on_top: FlatFeeWithRecipient,
        hooks_data: SwapHooksExtraData,
        transfer_handler: Option<TransferHandlerData>,
    ) -> (u128, u128);
}

pub trait LiquidityTrait {
    fn add_liquidity(
        e: Env,
        provider: Address,
        params: LiquidityModificationParams,
        hooks_data: LiquidityHooksExtraData,
    ) -> LiquidityResult;

    fn remove_liquidity(
        e: Env,
        provider: Address,
        params: LiquidityModificationParams,
        hooks_data: LiquidityHooksExtraData,
    ) -> LiquidityResult;

    // Withdraws the provider's accumulated LP fees without touching the position.
    fn collect_fees(
        e: Env,
        provider: Address,
        params: LiquidityModificationParams,
        hooks_data: LiquidityHooksExtraData,
    ) -> LiquidityResult;
}

pub trait FlashloanTrait {
    // Returns (fee token, fee collected)
    fn flashloan(
        e: Env,
        initiator: Address,
        request: FlashloanRequest,
        fee_hook_data: Bytes,
    ) -> (Address, u128);

    fn get_flashloan_fee_bps(e: Env) -> u32;
}

pub trait TokenSettingsTrait {
    // Token admin only. Negotiates the flags against the hook's declared capabilities.
    fn set_token_settings(e: Env, caller: Address, token: Address, settings: TokenSettings);

    fn get_token_settings(e: Env, token: Address) -> TokenSettings;
}

pub trait ProtocolFeeTrait {
    fn set_protocol_fee_structure(e: Env, caller: Address, structure: ProtocolFeeStructure);

    fn get_protocol_fee_structure(e: Env) -> ProtocolFeeStructure;

    fn set_exchange_fee_override(
        e: Env,
        caller: Address,
        recipient: Address,
        value: ProtocolFeeOverride,
    );

    fn get_exchange_fee_override(e: Env, recipient: Address) -> ProtocolFeeOverride;

    fn set_fee_on_top_override(
        e: Env,
        caller: Address,
        recipient: Address,
        value: ProtocolFeeOverride,
    );

    fn get_fee_on_top_override(e: Env, recipient: Address) -> ProtocolFeeOverride;

    fn set_lp_fee_override(e: Env, caller: Address, pool_id: BytesN<32>, value: ProtocolFeeOverride);

    fn get_lp_fee_override(e: Env, pool_id: BytesN<32>) -> ProtocolFeeOverride;

    // Anything above u16::MAX disables flash loans.
    fn set_flashloan_fee_bps(e: Env, caller: Address, fee_bps: u32);

    fn get_protocol_fees(e: Env, token: Address) -> u128;

    // Sends accrued protocol fees to the protocol fee receiver. Returns amounts per token.
    fn collect_protocol_fees(e: Env, caller: Address, tokens: Vec<Address>) -> Vec<u128>;
}

pub trait DebtLedgerTrait {
    fn get_tokens_owed(e: Env, owner: Address, token: Address) -> u128;

    fn claim_tokens_owed(e: Env, owner: Address, token: Address) -> u128;

    fn get_hook_fees_by_hook(e: Env, hook: Address, token_for: Address, token_fee: Address) -> u128;

    fn collect_hook_fees_by_hook(
        e: Env,
        hook: Address,
        token_for: Address,
        token_fee: Address,
        recipient: Address,
    ) -> u128;

    fn get_hook_fees_by_token(e: Env, token_for: Address, token_fee: Address) -> u128;

    // caller must be the admin of token_for
    fn collect_hook_fees_by_token(
        e: Env,
        caller: Address,
        token_for: Address,
        token_fee: Address,
        recipient: Address,
    ) -> u128;
}

pub trait AdminInterfaceTrait {
    fn set_privileged_addrs(
        e: Env,
        admin: Address,
        fee_manager: Address,
        operations_admin: Address,
        protocol_fee_receiver: Address,
    );

    fn get_privileged_addrs(e: Env) -> Map<Symbol, Vec<Address>>;

    // true when every bit of `flags` is currently set
    fn check_execution_state(e: Env, flags: u32) -> bool;

    fn version() -> u32;
}
