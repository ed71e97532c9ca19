use soroban_sdk::{Address, Env, Symbol};

#[derive(Clone)]
pub struct Events(Env);

impl Events {
    #[inline(always)]
    pub fn env(&self) -> &Env {
        &self.0
    }

    #[inline(always)]
    pub fn new(env: &Env) -> Events {
        Events(env.clone())
    }

    pub fn set_privileged_addrs(
        &self,
        admin: Address,
        fee_manager: Address,
        operations_admin: Address,
        protocol_fee_receiver: Address,
    ) {
        self.env().events().publish(
            (Symbol::new(self.env(), "set_privileged_addrs"),),
            (admin, fee_manager, operations_admin, protocol_fee_receiver),
        )
    }
}
