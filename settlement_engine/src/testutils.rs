#![cfg(test)]
extern crate std;

use crate::contract::SettlementEngineArgs;
use crate::SettlementEngineClient;
use amm_interfaces::types::{
    BpsFeeWithRecipient, FlatFeeWithRecipient, LiquidityHooksExtraData,
    LiquidityModificationParams, LiquidityResult, PoolCreationDetails,
    PoolCreationHooksExtraData, SwapHooksExtraData, SwapOrder, TokenSettings,
};
use soroban_sdk::testutils::Address as _;
use soroban_sdk::token::{StellarAssetClient, TokenClient};
use soroban_sdk::{Address, Bytes, BytesN, Env};
use std::vec;

pub(crate) use call_recorder::{CallRecorder, CallRecorderClient};
pub(crate) use flashloan_executor::{MockFlashloanExecutor, MockFlashloanExecutorClient};
pub(crate) use liquidity_hook::{MockLiquidityHook, MockLiquidityHookClient};
pub(crate) use mock_token::{MockToken, MockTokenClient};
pub(crate) use pool_hook::{MockPoolHook, MockPoolHookClient};
pub(crate) use pool_type::{MockPoolType, MockPoolTypeClient};
pub(crate) use token_hook::{MockTokenHook, MockTokenHookClient};
pub(crate) use transfer_handler::{MockTransferHandler, MockTransferHandlerClient};

// Appends (who, what) pairs so tests can check the order of external calls.
pub(crate) mod call_recorder {
    use soroban_sdk::{contract, contractimpl, symbol_short, Env, Symbol, Vec};

    #[contract]
    pub struct CallRecorder;

    #[contractimpl]
    impl CallRecorder {
        pub fn record(e: Env, who: Symbol, what: Symbol) {
            let mut calls = Self::calls(e.clone());
            calls.push_back((who, what));
            e.storage().instance().set(&symbol_short!("calls"), &calls);
        }

        pub fn calls(e: Env) -> Vec<(Symbol, Symbol)> {
            e.storage()
                .instance()
                .get(&symbol_short!("calls"))
                .unwrap_or(Vec::new(&e))
        }

        pub fn reset(e: Env) {
            e.storage().instance().remove(&symbol_short!("calls"));
        }
    }
}

fn record(e: &Env, recorder: Option<(Address, soroban_sdk::Symbol)>, what: &str) {
    if let Some((recorder, who)) = recorder {
        CallRecorderClient::new(e, &recorder).record(&who, &soroban_sdk::Symbol::new(e, what));
    }
}

pub(crate) mod pool_type {
    use amm_interfaces::pool_id;
    use amm_interfaces::pool_type::PoolTypeInterface;
    use amm_interfaces::types::{
        LiquidityResult, PoolCreationDetails, PoolLiquidityParams, PoolSwapParams,
        PoolSwapResult,
    };
    use soroban_sdk::{contract, contractimpl, contracttype, Address, BytesN, Env, Symbol};

    const MAX_BPS: u128 = 10_000;

    #[contracttype]
    #[derive(Clone)]
    enum DataKey {
        PoolType,
        BadId,
        Recorder,
        LastSwap,
    }

    // 1:1 pricing with the LP fee charged on the input. Output is capped by the reserve, so a
    // too large input is partially filled.
    #[contract]
    pub struct MockPoolType;

    fn amounts(params: &PoolLiquidityParams) -> (u128, u128) {
        let mut amount0 = [0u8; 16];
        let mut amount1 = [0u8; 16];
        params.pool_params.slice(0..16).copy_into_slice(&mut amount0);
        params.pool_params.slice(16..32).copy_into_slice(&mut amount1);
        (u128::from_be_bytes(amount0), u128::from_be_bytes(amount1))
    }

    fn gross_input(amount_out: u128, fee_bps: u32) -> u128 {
        let denominator = MAX_BPS - fee_bps as u128;
        (amount_out * MAX_BPS + denominator - 1) / denominator
    }

    fn record_swap(e: &Env, params: &PoolSwapParams) {
        e.storage().instance().set(&DataKey::LastSwap, params);
        let recorder: Option<Address> = e.storage().instance().get(&DataKey::Recorder);
        super::record(
            e,
            recorder.map(|r| (r, Symbol::new(e, "pool"))),
            "swap",
        );
    }

    #[contractimpl]
    impl MockPoolType {
        pub fn __constructor(e: Env, pool_type: BytesN<20>) {
            e.storage().instance().set(&DataKey::PoolType, &pool_type);
        }

        pub fn set_bad_id(e: Env, bad_id: bool) {
            e.storage().instance().set(&DataKey::BadId, &bad_id);
        }

        pub fn set_recorder(e: Env, recorder: Address) {
            e.storage().instance().set(&DataKey::Recorder, &recorder);
        }

        pub fn last_swap(e: Env) -> Option<PoolSwapParams> {
            e.storage().instance().get(&DataKey::LastSwap)
        }
    }

    #[contractimpl]
    impl PoolTypeInterface for MockPoolType {
        fn create_pool(e: Env, details: PoolCreationDetails) -> BytesN<32> {
            if e.storage().instance().get(&DataKey::BadId).unwrap_or(false) {
                return BytesN::from_array(&e, &[0xff; 32]);
            }
            let hash = pool_id::creation_params_hash(&e, &details);
            pool_id::encode(&e, &details.pool_type, &hash, details.fee).unwrap()
        }

        fn swap_by_input(e: Env, params: PoolSwapParams) -> PoolSwapResult {
            record_swap(&e, &params);
            let lp_fee = params.amount * params.pool_fee_bps as u128 / MAX_BPS;
            let net = params.amount - lp_fee;
            if net <= params.reserve_out {
                return PoolSwapResult {
                    amount_in: params.amount,
                    amount_out: net,
                    lp_fee,
                };
            }
            let amount_in = gross_input(params.reserve_out, params.pool_fee_bps);
            PoolSwapResult {
                amount_in,
                amount_out: params.reserve_out,
                lp_fee: amount_in - params.reserve_out,
            }
        }

        fn swap_by_output(e: Env, params: PoolSwapParams) -> PoolSwapResult {
            record_swap(&e, &params);
            let amount_out = params.amount.min(params.reserve_out);
            let amount_in = gross_input(amount_out, params.pool_fee_bps);
            PoolSwapResult {
                amount_in,
                amount_out,
                lp_fee: amount_in - amount_out,
            }
        }

        fn add_liquidity(_e: Env, params: PoolLiquidityParams) -> LiquidityResult {
            let (amount0, amount1) = amounts(&params);
            LiquidityResult {
                amount0,
                amount1,
                fees0: 0,
                fees1: 0,
            }
        }

        fn remove_liquidity(_e: Env, params: PoolLiquidityParams) -> LiquidityResult {
            let (amount0, amount1) = amounts(&params);
            LiquidityResult {
                amount0,
                amount1,
                fees0: 0,
                fees1: 0,
            }
        }

        fn collect_fees(_e: Env, params: PoolLiquidityParams) -> LiquidityResult {
            LiquidityResult {
                amount0: 0,
                amount1: 0,
                fees0: params.fee_balance0,
                fees1: params.fee_balance1,
            }
        }
    }
}

pub(crate) mod token_hook {
    use amm_interfaces::hooks::TokenHookInterface;
    use amm_interfaces::types::{
        FlashloanFeeQuote, HookContext, HookFeeCollection, HookLiquidityParams,
        HookLiquidityResponse, HookSwapParams, HookSwapResponse, PoolCreationDetails,
    };
    use soroban_sdk::{
        contract, contracterror, contractimpl, contracttype, panic_with_error, vec, Address,
        Bytes, BytesN, Env, Symbol, Vec,
    };

    #[contracterror]
    #[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
    #[repr(u32)]
    pub enum MockHookError {
        Vetoed = 900,
    }

    #[contracttype]
    #[derive(Clone)]
    enum DataKey {
        Flags,
        SwapFees,
        LiquidityFees,
        Collection,
        Quote,
        AllowFeeToken,
        Recorder,
        Veto,
        LastSwap,
        LastContext,
    }

    #[contract]
    pub struct MockTokenHook;

    fn recorder(e: &Env) -> Option<(Address, Symbol)> {
        e.storage().instance().get(&DataKey::Recorder)
    }

    fn check_veto(e: &Env) {
        if e.storage().instance().get(&DataKey::Veto).unwrap_or(false) {
            panic_with_error!(e, MockHookError::Vetoed);
        }
    }

    fn collections(e: &Env) -> Vec<HookFeeCollection> {
        match e.storage().instance().get(&DataKey::Collection) {
            Some(collection) => vec![e, collection],
            None => Vec::new(e),
        }
    }

    fn swap_fees(e: &Env) -> (u128, u128) {
        e.storage().instance().get(&DataKey::SwapFees).unwrap_or((0, 0))
    }

    fn observe_swap(e: &Env, context: &HookContext, swap: &HookSwapParams) {
        e.storage().instance().set(&DataKey::LastSwap, swap);
        e.storage().instance().set(&DataKey::LastContext, context);
    }

    #[contractimpl]
    impl MockTokenHook {
        pub fn __constructor(e: Env, required: u32, supported: u32) {
            e.storage().instance().set(&DataKey::Flags, &(required, supported));
        }

        pub fn set_swap_fees(e: Env, before: u128, after: u128) {
            e.storage().instance().set(&DataKey::SwapFees, &(before, after));
        }

        pub fn set_liquidity_fees(e: Env, fee0: u128, fee1: u128) {
            e.storage().instance().set(&DataKey::LiquidityFees, &(fee0, fee1));
        }

        pub fn set_collection(e: Env, collection: HookFeeCollection) {
            e.storage().instance().set(&DataKey::Collection, &collection);
        }

        pub fn set_flashloan_quote(e: Env, fee_token: Option<Address>, fee_amount: u128) {
            e.storage().instance().set(&DataKey::Quote, &(fee_token, fee_amount));
        }

        pub fn set_allow_fee_token(e: Env, allow: bool) {
            e.storage().instance().set(&DataKey::AllowFeeToken, &allow);
        }

        pub fn set_recorder(e: Env, recorder: Address, tag: Symbol) {
            e.storage().instance().set(&DataKey::Recorder, &(recorder, tag));
        }

        pub fn set_veto(e: Env, veto: bool) {
            e.storage().instance().set(&DataKey::Veto, &veto);
        }

        pub fn last_swap(e: Env) -> Option<HookSwapParams> {
            e.storage().instance().get(&DataKey::LastSwap)
        }

        pub fn last_context(e: Env) -> Option<HookContext> {
            e.storage().instance().get(&DataKey::LastContext)
        }
    }

    #[contractimpl]
    impl TokenHookInterface for MockTokenHook {
        fn hook_flags(e: Env) -> (u32, u32) {
            e.storage().instance().get(&DataKey::Flags).unwrap_or((0, 0))
        }

        fn validate_pool_creation(
            e: Env,
            _context: HookContext,
            _pool_id: BytesN<32>,
            _token: Address,
            _details: PoolCreationDetails,
            _hook_data: Bytes,
        ) {
            super::record(&e, recorder(&e), "creation");
            check_veto(&e);
        }

        fn before_swap(
            e: Env,
            context: HookContext,
            _token: Address,
            swap: HookSwapParams,
            _hook_data: Bytes,
        ) -> HookSwapResponse {
            super::record(&e, recorder(&e), "before_swap");
            check_veto(&e);
            observe_swap(&e, &context, &swap);
            HookSwapResponse {
                fee: swap_fees(&e).0,
                fee_collections: collections(&e),
            }
        }

        fn after_swap(
            e: Env,
            context: HookContext,
            _token: Address,
            swap: HookSwapParams,
            _hook_data: Bytes,
        ) -> HookSwapResponse {
            super::record(&e, recorder(&e), "after_swap");
            check_veto(&e);
            observe_swap(&e, &context, &swap);
            HookSwapResponse {
                fee: swap_fees(&e).1,
                fee_collections: Vec::new(&e),
            }
        }

        fn validate_liquidity(
            e: Env,
            context: HookContext,
            _token: Address,
            _params: HookLiquidityParams,
            _hook_data: Bytes,
        ) -> HookLiquidityResponse {
            super::record(&e, recorder(&e), "liquidity");
            check_veto(&e);
            e.storage().instance().set(&DataKey::LastContext, &context);
            let (fee0, fee1) = e
                .storage()
                .instance()
                .get(&DataKey::LiquidityFees)
                .unwrap_or((0, 0));
            HookLiquidityResponse {
                fee0,
                fee1,
                fee_collections: collections(&e),
            }
        }

        fn flashloan_fee(
            e: Env,
            _context: HookContext,
            token: Address,
            _amount: u128,
            _hook_data: Bytes,
        ) -> FlashloanFeeQuote {
            let (fee_token, fee_amount): (Option<Address>, u128) = e
                .storage()
                .instance()
                .get(&DataKey::Quote)
                .unwrap_or((None, 0));
            FlashloanFeeQuote {
                fee_token: fee_token.unwrap_or(token),
                fee_amount,
                fee_collections: collections(&e),
            }
        }

        fn validate_flashloan_fee_token(
            e: Env,
            _context: HookContext,
            _loan_token: Address,
            _fee_token: Address,
        ) -> bool {
            e.storage()
                .instance()
                .get(&DataKey::AllowFeeToken)
                .unwrap_or(false)
        }
    }
}

pub(crate) mod pool_hook {
    use super::token_hook::MockHookError;
    use amm_interfaces::hooks::PoolHookInterface;
    use amm_interfaces::types::{
        HookContext, HookLiquidityParams, HookLiquidityResponse, HookSwapParams,
        PoolCreationDetails,
    };
    use soroban_sdk::{
        contract, contractimpl, contracttype, panic_with_error, Address, Bytes, BytesN, Env,
        Symbol, Vec,
    };

    #[contracttype]
    #[derive(Clone)]
    enum DataKey {
        Fee,
        LiquidityFees,
        Recorder,
        Veto,
    }

    #[contract]
    pub struct MockPoolHook;

    fn recorder(e: &Env) -> Option<(Address, Symbol)> {
        e.storage().instance().get(&DataKey::Recorder)
    }

    #[contractimpl]
    impl MockPoolHook {
        pub fn __constructor(e: Env, fee: u32) {
            e.storage().instance().set(&DataKey::Fee, &fee);
        }

        pub fn set_liquidity_fees(e: Env, fee0: u128, fee1: u128) {
            e.storage().instance().set(&DataKey::LiquidityFees, &(fee0, fee1));
        }

        pub fn set_recorder(e: Env, recorder: Address, tag: Symbol) {
            e.storage().instance().set(&DataKey::Recorder, &(recorder, tag));
        }

        pub fn set_veto(e: Env, veto: bool) {
            e.storage().instance().set(&DataKey::Veto, &veto);
        }
    }

    #[contractimpl]
    impl PoolHookInterface for MockPoolHook {
        fn validate_pool_creation(
            e: Env,
            _context: HookContext,
            _pool_id: BytesN<32>,
            _details: PoolCreationDetails,
            _hook_data: Bytes,
        ) {
            super::record(&e, recorder(&e), "creation");
            if e.storage().instance().get(&DataKey::Veto).unwrap_or(false) {
                panic_with_error!(&e, MockHookError::Vetoed);
            }
        }

        fn get_pool_fee_for_swap(
            e: Env,
            _context: HookContext,
            _pool_id: BytesN<32>,
            _swap: HookSwapParams,
            _hook_data: Bytes,
        ) -> u32 {
            super::record(&e, recorder(&e), "pool_fee");
            e.storage().instance().get(&DataKey::Fee).unwrap_or(0)
        }

        fn validate_liquidity(
            e: Env,
            _context: HookContext,
            _params: HookLiquidityParams,
            _hook_data: Bytes,
        ) -> HookLiquidityResponse {
            super::record(&e, recorder(&e), "liquidity");
            let (fee0, fee1) = e
                .storage()
                .instance()
                .get(&DataKey::LiquidityFees)
                .unwrap_or((0, 0));
            HookLiquidityResponse {
                fee0,
                fee1,
                fee_collections: Vec::new(&e),
            }
        }
    }
}

pub(crate) mod liquidity_hook {
    use amm_interfaces::constants::{ADD_LIQUIDITY_FLAG, COLLECT_FEES_FLAG, REMOVE_LIQUIDITY_FLAG};
    use amm_interfaces::hooks::LiquidityHookInterface;
    use amm_interfaces::types::{HookContext, HookLiquidityParams, HookLiquidityResponse};
    use soroban_sdk::{contract, contractimpl, contracttype, Address, Bytes, Env, Symbol, Vec};

    #[contracttype]
    #[derive(Clone)]
    enum DataKey {
        Fees,
        Recorder,
        Flags,
    }

    #[contract]
    pub struct MockLiquidityHook;

    #[contractimpl]
    impl MockLiquidityHook {
        pub fn set_hook_flags(e: Env, required: u32, supported: u32) {
            e.storage().instance().set(&DataKey::Flags, &(required, supported));
        }

        pub fn set_fees(e: Env, fee0: u128, fee1: u128) {
            e.storage().instance().set(&DataKey::Fees, &(fee0, fee1));
        }

        pub fn set_recorder(e: Env, recorder: Address, tag: Symbol) {
            e.storage().instance().set(&DataKey::Recorder, &(recorder, tag));
        }
    }

    #[contractimpl]
    impl LiquidityHookInterface for MockLiquidityHook {
        fn hook_flags(e: Env) -> (u32, u32) {
            e.storage().instance().get(&DataKey::Flags).unwrap_or((
                0,
                ADD_LIQUIDITY_FLAG | REMOVE_LIQUIDITY_FLAG | COLLECT_FEES_FLAG,
            ))
        }

        fn validate_liquidity(
            e: Env,
            _context: HookContext,
            _params: HookLiquidityParams,
            _hook_data: Bytes,
        ) -> HookLiquidityResponse {
            super::record(&e, e.storage().instance().get(&DataKey::Recorder), "liquidity");
            let (fee0, fee1) = e.storage().instance().get(&DataKey::Fees).unwrap_or((0, 0));
            HookLiquidityResponse {
                fee0,
                fee1,
                fee_collections: Vec::new(&e),
            }
        }
    }
}

pub(crate) mod transfer_handler {
    use amm_interfaces::handler::TransferHandlerInterface;
    use amm_interfaces::types::HookContext;
    use soroban_sdk::token::TokenClient;
    use soroban_sdk::{contract, contractimpl, contracttype, Address, Bytes, Env};

    #[contracttype]
    #[derive(Clone)]
    enum DataKey {
        Engine,
        Shortfall,
        LastPayer,
    }

    // Pays swap input out of its own balance.
    #[contract]
    pub struct MockTransferHandler;

    #[contractimpl]
    impl MockTransferHandler {
        pub fn __constructor(e: Env, engine: Address) {
            e.storage().instance().set(&DataKey::Engine, &engine);
        }

        pub fn set_shortfall(e: Env, shortfall: u128) {
            e.storage().instance().set(&DataKey::Shortfall, &shortfall);
        }

        pub fn last_payer(e: Env) -> Option<Address> {
            e.storage().instance().get(&DataKey::LastPayer)
        }
    }

    #[contractimpl]
    impl TransferHandlerInterface for MockTransferHandler {
        fn handle_transfer(
            e: Env,
            _context: HookContext,
            payer: Address,
            token: Address,
            amount: u128,
            _data: Bytes,
        ) {
            let engine: Address = e.storage().instance().get(&DataKey::Engine).unwrap();
            let shortfall: u128 = e.storage().instance().get(&DataKey::Shortfall).unwrap_or(0);
            e.storage().instance().set(&DataKey::LastPayer, &payer);
            TokenClient::new(&e, &token).transfer(
                &e.current_contract_address(),
                &engine,
                &((amount - shortfall) as i128),
            );
        }
    }
}

pub(crate) mod flashloan_executor {
    use amm_interfaces::constants::FLASHLOAN_CALLBACK_SUCCESS;
    use amm_interfaces::handler::FlashloanCallbackInterface;
    use soroban_sdk::token::TokenClient;
    use soroban_sdk::{contract, contractimpl, contracttype, Address, Bytes, BytesN, Env};

    #[contracttype]
    #[derive(Clone)]
    enum DataKey {
        Engine,
        Behavior,
    }

    // Repays `amount` plus `fee_amount + extra - shortfall` of the fee token.
    #[contract]
    pub struct MockFlashloanExecutor;

    #[contractimpl]
    impl MockFlashloanExecutor {
        pub fn __constructor(e: Env, engine: Address) {
            e.storage().instance().set(&DataKey::Engine, &engine);
        }

        pub fn set_behavior(e: Env, extra: u128, shortfall: u128, wrong_magic: bool) {
            e.storage()
                .instance()
                .set(&DataKey::Behavior, &(extra, shortfall, wrong_magic));
        }
    }

    #[contractimpl]
    impl FlashloanCallbackInterface for MockFlashloanExecutor {
        fn on_flashloan(
            e: Env,
            _initiator: Address,
            token: Address,
            amount: u128,
            fee_token: Address,
            fee_amount: u128,
            _callback_data: Bytes,
        ) -> BytesN<32> {
            let engine: Address = e.storage().instance().get(&DataKey::Engine).unwrap();
            let (extra, shortfall, wrong_magic): (u128, u128, bool) = e
                .storage()
                .instance()
                .get(&DataKey::Behavior)
                .unwrap_or((0, 0, false));

            let this = e.current_contract_address();
            TokenClient::new(&e, &token).transfer(&this, &engine, &(amount as i128));
            TokenClient::new(&e, &fee_token).transfer(
                &this,
                &engine,
                &((fee_amount + extra - shortfall) as i128),
            );

            match wrong_magic {
                true => BytesN::from_array(&e, &[0u8; 32]),
                false => BytesN::from_array(&e, &FLASHLOAN_CALLBACK_SUCCESS),
            }
        }
    }
}

// Token that refuses transfers to blocked accounts.
pub(crate) mod mock_token {
    use soroban_sdk::{
        contract, contracterror, contractimpl, contracttype, panic_with_error, Address, Env,
    };

    #[contracterror]
    #[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
    #[repr(u32)]
    pub enum MockTokenError {
        RecipientBlocked = 910,
        InsufficientBalance = 911,
    }

    #[contracttype]
    #[derive(Clone)]
    enum DataKey {
        Admin,
        Balance(Address),
        Blocked(Address),
    }

    #[contract]
    pub struct MockToken;

    #[contractimpl]
    impl MockToken {
        pub fn __constructor(e: Env, admin: Address) {
            e.storage().instance().set(&DataKey::Admin, &admin);
        }

        pub fn admin(e: Env) -> Address {
            e.storage().instance().get(&DataKey::Admin).unwrap()
        }

        pub fn mint(e: Env, to: Address, amount: i128) {
            let balance = Self::balance(e.clone(), to.clone());
            e.storage()
                .persistent()
                .set(&DataKey::Balance(to), &(balance + amount));
        }

        pub fn set_blocked(e: Env, account: Address, blocked: bool) {
            e.storage()
                .persistent()
                .set(&DataKey::Blocked(account), &blocked);
        }

        pub fn balance(e: Env, id: Address) -> i128 {
            e.storage()
                .persistent()
                .get(&DataKey::Balance(id))
                .unwrap_or(0)
        }

        pub fn transfer(e: Env, from: Address, to: Address, amount: i128) {
            from.require_auth();
            if e.storage()
                .persistent()
                .get(&DataKey::Blocked(to.clone()))
                .unwrap_or(false)
            {
                panic_with_error!(&e, MockTokenError::RecipientBlocked);
            }
            let from_balance = Self::balance(e.clone(), from.clone());
            if from_balance < amount {
                panic_with_error!(&e, MockTokenError::InsufficientBalance);
            }
            e.storage()
                .persistent()
                .set(&DataKey::Balance(from), &(from_balance - amount));
            Self::mint(e, to, amount);
        }
    }
}

pub(crate) struct TestConfig {
    pub(crate) users_count: u32,
    pub(crate) mint_to_user: i128,
    pub(crate) pool_fee: u32,
    pub(crate) liquidity: u128,
}

impl Default for TestConfig {
    fn default() -> Self {
        TestConfig {
            users_count: 3,
            mint_to_user: 1_000_000_000_000,
            pool_fee: 30,
            liquidity: 1_000_000_000,
        }
    }
}

pub(crate) struct Setup<'a> {
    pub(crate) env: Env,
    pub(crate) users: vec::Vec<Address>,
    pub(crate) admin: Address,
    pub(crate) fee_manager: Address,
    pub(crate) operations_admin: Address,
    pub(crate) protocol_fee_receiver: Address,
    pub(crate) token_admin: Address,
    pub(crate) lp: Address,

    pub(crate) engine: SettlementEngineClient<'a>,
    pub(crate) token0: TokenClient<'a>,
    pub(crate) token1: TokenClient<'a>,
    pub(crate) token2: TokenClient<'a>,

    pub(crate) pool_type: BytesN<20>,
    pub(crate) strategy: MockPoolTypeClient<'a>,
    pub(crate) recorder: CallRecorderClient<'a>,
    // token0/token1 pool seeded with `liquidity` of both tokens
    pub(crate) pool_id: BytesN<32>,
}

impl Default for Setup<'_> {
    fn default() -> Self {
        Self::new_with_config(&TestConfig::default())
    }
}

impl Setup<'_> {
    pub(crate) fn new_with_config(config: &TestConfig) -> Self {
        let e = Env::default();
        e.mock_all_auths();
        e.cost_estimate().budget().reset_unlimited();

        let admin = Address::generate(&e);
        let fee_manager = Address::generate(&e);
        let operations_admin = Address::generate(&e);
        let protocol_fee_receiver = Address::generate(&e);
        let token_admin = Address::generate(&e);
        let lp = Address::generate(&e);

        let engine = create_engine(
            &e,
            &admin,
            &fee_manager,
            &operations_admin,
            &protocol_fee_receiver,
        );

        let mut token_addresses = vec![
            create_token(&e, &token_admin),
            create_token(&e, &token_admin),
            create_token(&e, &token_admin),
        ];
        token_addresses.sort();
        let token0 = TokenClient::new(&e, &token_addresses[0]);
        let token1 = TokenClient::new(&e, &token_addresses[1]);
        let token2 = TokenClient::new(&e, &token_addresses[2]);

        let mut users = vec![];
        for _ in 0..config.users_count {
            users.push(Address::generate(&e));
        }
        for account in users.iter().chain([&lp]) {
            for token in token_addresses.iter() {
                StellarAssetClient::new(&e, token).mint(account, &config.mint_to_user);
            }
        }

        let pool_type = pool_type_key(&e, 1);
        let strategy = MockPoolTypeClient::new(&e, &e.register(MockPoolType, (pool_type.clone(),)));
        engine.register_pool_type(&operations_admin, &pool_type, &strategy.address);
        let recorder = CallRecorderClient::new(&e, &e.register(CallRecorder, ()));
        let placeholder_id = BytesN::from_array(&e, &[0; 32]);

        let mut setup = Setup {
            env: e,
            users,
            admin,
            fee_manager,
            operations_admin,
            protocol_fee_receiver,
            token_admin,
            lp,
            engine,
            token0,
            token1,
            token2,
            pool_type,
            strategy,
            recorder,
            pool_id: placeholder_id,
        };
        let pool_id = setup.create_pool(
            &setup.token0.address.clone(),
            &setup.token1.address.clone(),
            config.pool_fee,
            None,
        );
        setup.add_liquidity(&pool_id, config.liquidity, config.liquidity);
        setup.pool_id = pool_id;
        setup
    }

    pub(crate) fn create_pool(
        &self,
        token_a: &Address,
        token_b: &Address,
        fee: u32,
        pool_hook: Option<Address>,
    ) -> BytesN<32> {
        let (token0, token1) = utils::test_utils::sort(token_a, token_b);
        self.engine.create_pool(
            &self.lp,
            &PoolCreationDetails {
                pool_type: self.pool_type.clone(),
                fee,
                token0,
                token1,
                pool_hook,
                pool_params: Bytes::new(&self.env),
            },
            &empty_creation_hooks(&self.env),
            &None,
        )
    }

    pub(crate) fn add_liquidity(
        &self,
        pool_id: &BytesN<32>,
        amount0: u128,
        amount1: u128,
    ) -> LiquidityResult {
        self.engine.add_liquidity(
            &self.lp,
            &liquidity_params(&self.env, pool_id, amount0, amount1),
            &empty_liquidity_hooks(&self.env),
        )
    }

    // users[1] receives, the deadline is in the future
    pub(crate) fn order(
        &self,
        token_in: &Address,
        token_out: &Address,
        amount_specified: i128,
        limit_amount: u128,
    ) -> SwapOrder {
        SwapOrder {
            deadline: self.env.ledger().timestamp() + 1000,
            recipient: self.users[1].clone(),
            amount_specified,
            limit_amount,
            token_in: token_in.clone(),
            token_out: token_out.clone(),
        }
    }

    // single swap by users[0] without order fees or hooks
    pub(crate) fn swap(&self, order: &SwapOrder, pool_id: &BytesN<32>) -> (u128, u128) {
        self.engine.single_swap(
            &self.users[0],
            order,
            pool_id,
            &no_exchange_fee(&self.env),
            &no_fee_on_top(&self.env),
            &empty_swap_hooks(&self.env),
            &None,
        )
    }

    pub(crate) fn set_token_hook(&self, token: &Address, hook: &Address, flags: u32) {
        self.engine.set_token_settings(
            &self.token_admin,
            token,
            &TokenSettings {
                hop_fee_bps: 0,
                flags,
                hook: Some(hook.clone()),
            },
        );
    }

    pub(crate) fn create_token_hook(&self, required: u32, supported: u32) -> MockTokenHookClient<'_> {
        MockTokenHookClient::new(
            &self.env,
            &self.env.register(MockTokenHook, (required, supported)),
        )
    }

    pub(crate) fn balance(&self, token: &TokenClient, account: &Address) -> u128 {
        token.balance(account) as u128
    }

    pub(crate) fn engine_balance(&self, token: &TokenClient) -> u128 {
        self.balance(token, &self.engine.address)
    }
}

pub(crate) fn create_engine<'a>(
    e: &Env,
    admin: &Address,
    fee_manager: &Address,
    operations_admin: &Address,
    protocol_fee_receiver: &Address,
) -> SettlementEngineClient<'a> {
    SettlementEngineClient::new(
        e,
        &e.register(
            crate::SettlementEngine {},
            SettlementEngineArgs::__constructor(
                admin,
                fee_manager,
                operations_admin,
                protocol_fee_receiver,
            ),
        ),
    )
}

pub(crate) fn create_token(e: &Env, admin: &Address) -> Address {
    e.register_stellar_asset_contract_v2(admin.clone()).address()
}

pub(crate) fn pool_type_key(e: &Env, tail: u8) -> BytesN<20> {
    let mut key = [0u8; 20];
    key[6..].copy_from_slice(&[tail; 14]);
    BytesN::from_array(e, &key)
}

// pool_params understood by the mock pool type: amount0 and amount1 as big endian u128
pub(crate) fn amounts_params(e: &Env, amount0: u128, amount1: u128) -> Bytes {
    let mut raw = [0u8; 32];
    raw[..16].copy_from_slice(&amount0.to_be_bytes());
    raw[16..].copy_from_slice(&amount1.to_be_bytes());
    Bytes::from_array(e, &raw)
}

pub(crate) fn liquidity_params(
    e: &Env,
    pool_id: &BytesN<32>,
    amount0: u128,
    amount1: u128,
) -> LiquidityModificationParams {
    LiquidityModificationParams {
        pool_id: pool_id.clone(),
        liquidity_hook: None,
        liquidity_hook_flags: 0,
        min_amount0: 0,
        min_amount1: 0,
        max_amount0: u128::MAX,
        max_amount1: u128::MAX,
        pool_params: amounts_params(e, amount0, amount1),
    }
}

pub(crate) fn empty_swap_hooks(e: &Env) -> SwapHooksExtraData {
    SwapHooksExtraData {
        token_in_hook: Bytes::new(e),
        token_out_hook: Bytes::new(e),
        pool_hook: Bytes::new(e),
        pool_type: Bytes::new(e),
    }
}

pub(crate) fn empty_liquidity_hooks(e: &Env) -> LiquidityHooksExtraData {
    LiquidityHooksExtraData {
        token0_hook: Bytes::new(e),
        token1_hook: Bytes::new(e),
        liquidity_hook: Bytes::new(e),
        pool_hook: Bytes::new(e),
    }
}

pub(crate) fn empty_creation_hooks(e: &Env) -> PoolCreationHooksExtraData {
    PoolCreationHooksExtraData {
        token0_hook: Bytes::new(e),
        token1_hook: Bytes::new(e),
        pool_hook: Bytes::new(e),
    }
}

pub(crate) fn no_exchange_fee(e: &Env) -> BpsFeeWithRecipient {
    BpsFeeWithRecipient {
        recipient: Address::generate(e),
        bps: 0,
    }
}

pub(crate) fn no_fee_on_top(e: &Env) -> FlatFeeWithRecipient {
    FlatFeeWithRecipient {
        recipient: Address::generate(e),
        amount: 0,
    }
}
