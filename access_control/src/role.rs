use soroban_sdk::{Env, Symbol};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    Admin,               // owner - assigns every other role
    FeeManager,          // protocol fee rates, overrides and collection
    OperationsAdmin,     // pool type registry
    ProtocolFeeReceiver, // destination of collected protocol fees
}

pub trait SymbolRepresentation {
    fn as_symbol(&self, e: &Env) -> Symbol;
}

impl SymbolRepresentation for Role {
    fn as_symbol(&self, e: &Env) -> Symbol {
        match self {
            Role::Admin => Symbol::new(e, "Admin"),
            Role::FeeManager => Symbol::new(e, "FeeManager"),
            Role::OperationsAdmin => Symbol::new(e, "OperationsAdmin"),
            Role::ProtocolFeeReceiver => Symbol::new(e, "ProtocolFeeReceiver"),
        }
    }
}
