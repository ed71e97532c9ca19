use amm_interfaces::types::{ProtocolFeeOverride, ProtocolFeeStructure, TokenSettings};
use soroban_sdk::{Address, BytesN, Env, Symbol};

#[derive(Clone)]
pub(crate) struct Events(Env);

impl Events {
    #[inline(always)]
    pub(crate) fn env(&self) -> &Env {
        &self.0
    }

    #[inline(always)]
    pub(crate) fn new(env: &Env) -> Events {
        Events(env.clone())
    }
}

#[derive(Clone, Copy)]
pub(crate) enum SwapKind {
    Single,
    Multi,
    Direct,
}

impl SwapKind {
    fn as_symbol(&self, e: &Env) -> Symbol {
        match self {
            SwapKind::Single => Symbol::new(e, "single"),
            SwapKind::Multi => Symbol::new(e, "multi"),
            SwapKind::Direct => Symbol::new(e, "direct"),
        }
    }
}

pub(crate) struct SwapRecord {
    pub executor: Address,
    pub recipient: Address,
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: u128,
    pub amount_out: u128,
    pub exchange_fee: u128,
    pub fee_on_top: u128,
    pub protocol_fee: u128,
}

pub(crate) trait SettlementEvents {
    fn pool_type_registered(&self, pool_type: BytesN<20>, strategy: Address);

    fn pool_created(
        &self,
        pool_id: BytesN<32>,
        token0: Address,
        token1: Address,
        pool_hook: Option<Address>,
        fee: u32,
    );

    fn swap(&self, kind: SwapKind, record: SwapRecord);

    fn liquidity_added(&self, pool_id: BytesN<32>, provider: Address, amounts: (u128, u128, u128, u128));

    fn liquidity_removed(&self, pool_id: BytesN<32>, provider: Address, amounts: (u128, u128, u128, u128));

    fn position_fees_collected(&self, pool_id: BytesN<32>, provider: Address, fees: (u128, u128));

    fn flashloan(
        &self,
        executor: Address,
        token: Address,
        amount: u128,
        fee_token: Address,
        fee_amount: u128,
    );

    fn protocol_fees_collected(&self, token: Address, receiver: Address, amount: u128);

    fn hook_fees_collected(
        &self,
        hook: Address,
        token_for: Address,
        token_fee: Address,
        recipient: Address,
        amount: u128,
    );

    fn token_hook_fees_collected(
        &self,
        token_for: Address,
        token_fee: Address,
        recipient: Address,
        amount: u128,
    );

    fn tokens_claimed(&self, owner: Address, token: Address, amount: u128);

    fn token_settings_updated(&self, token: Address, settings: TokenSettings);

    fn fee_structure_updated(&self, structure: ProtocolFeeStructure);

    fn exchange_fee_override_updated(&self, recipient: Address, value: ProtocolFeeOverride);

    fn fee_on_top_override_updated(&self, recipient: Address, value: ProtocolFeeOverride);

    fn lp_fee_override_updated(&self, pool_id: BytesN<32>, value: ProtocolFeeOverride);

    fn flashloan_fee_updated(&self, fee_bps: u32);
}

impl SettlementEvents for Events {
    fn pool_type_registered(&self, pool_type: BytesN<20>, strategy: Address) {
        self.env().events().publish(
            (Symbol::new(self.env(), "pool_type_registered"), pool_type),
            (strategy,),
        );
    }

    fn pool_created(
        &self,
        pool_id: BytesN<32>,
        token0: Address,
        token1: Address,
        pool_hook: Option<Address>,
        fee: u32,
    ) {
        // topics: ["pool_created", token0, token1]
        // body: [pool_id, pool_hook, fee]
        self.env().events().publish(
            (Symbol::new(self.env(), "pool_created"), token0, token1),
            (pool_id, pool_hook, fee),
        );
    }

    fn swap(&self, kind: SwapKind, record: SwapRecord) {
        // topics: ["swap", kind, token_in, token_out]
        // body: [executor, recipient, amount_in, amount_out, exchange_fee, fee_on_top, protocol_fee]
        self.env().events().publish(
            (
                Symbol::new(self.env(), "swap"),
                kind.as_symbol(self.env()),
                record.token_in,
                record.token_out,
            ),
            (
                record.executor,
                record.recipient,
                record.amount_in,
                record.amount_out,
                record.exchange_fee,
                record.fee_on_top,
                record.protocol_fee,
            ),
        );
    }

    fn liquidity_added(&self, pool_id: BytesN<32>, provider: Address, amounts: (u128, u128, u128, u128)) {
        self.env().events().publish(
            (Symbol::new(self.env(), "liquidity_added"), pool_id, provider),
            amounts,
        );
    }

    fn liquidity_removed(&self, pool_id: BytesN<32>, provider: Address, amounts: (u128, u128, u128, u128)) {
        self.env().events().publish(
            (Symbol::new(self.env(), "liquidity_removed"), pool_id, provider),
            amounts,
        );
    }

    fn position_fees_collected(&self, pool_id: BytesN<32>, provider: Address, fees: (u128, u128)) {
        self.env().events().publish(
            (
                Symbol::new(self.env(), "position_fees_collected"),
                pool_id,
                provider,
            ),
            fees,
        );
    }

    fn flashloan(
        &self,
        executor: Address,
        token: Address,
        amount: u128,
        fee_token: Address,
        fee_amount: u128,
    ) {
        self.env().events().publish(
            (Symbol::new(self.env(), "flashloan"), executor, token),
            (amount, fee_token, fee_amount),
        );
    }

    fn protocol_fees_collected(&self, token: Address, receiver: Address, amount: u128) {
        self.env().events().publish(
            (Symbol::new(self.env(), "protocol_fees_collected"), token),
            (receiver, amount),
        );
    }

    fn hook_fees_collected(
        &self,
        hook: Address,
        token_for: Address,
        token_fee: Address,
        recipient: Address,
        amount: u128,
    ) {
        self.env().events().publish(
            (Symbol::new(self.env(), "hook_fees_collected"), hook, token_for),
            (token_fee, recipient, amount),
        );
    }

    fn token_hook_fees_collected(
        &self,
        token_for: Address,
        token_fee: Address,
        recipient: Address,
        amount: u128,
    ) {
        self.env().events().publish(
            (Symbol::new(self.env(), "token_hook_fees_collected"), token_for),
            (token_fee, recipient, amount),
        );
    }

    fn tokens_claimed(&self, owner: Address, token: Address, amount: u128) {
        self.env().events().publish(
            (Symbol::new(self.env(), "tokens_claimed"), owner, token),
            (amount,),
        );
    }

    fn token_settings_updated(&self, token: Address, settings: TokenSettings) {
        self.env().events().publish(
            (Symbol::new(self.env(), "token_settings_updated"), token),
            (settings,),
        );
    }

    fn fee_structure_updated(&self, structure: ProtocolFeeStructure) {
        self.env().events().publish(
            (Symbol::new(self.env(), "fee_structure_updated"),),
            (structure,),
        );
    }

    fn exchange_fee_override_updated(&self, recipient: Address, value: ProtocolFeeOverride) {
        self.env().events().publish(
            (Symbol::new(self.env(), "exchange_fee_override_updated"), recipient),
            (value,),
        );
    }

    fn fee_on_top_override_updated(&self, recipient: Address, value: ProtocolFeeOverride) {
        self.env().events().publish(
            (Symbol::new(self.env(), "fee_on_top_override_updated"), recipient),
            (value,),
        );
    }

    fn lp_fee_override_updated(&self, pool_id: BytesN<32>, value: ProtocolFeeOverride) {
        self.env().events().publish(
            (Symbol::new(self.env(), "lp_fee_override_updated"), pool_id),
            (value,),
        );
    }

    fn flashloan_fee_updated(&self, fee_bps: u32) {
        self.env().events().publish(
            (Symbol::new(self.env(), "flashloan_fee_updated"),),
            (fee_bps,),
        );
    }
}
