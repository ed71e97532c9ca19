use crate::access::{AccessControl, AccessControlTrait};
use crate::errors::AccessControlError;
use crate::role::Role;
use soroban_sdk::{panic_with_error, Address, Env};

// Oracle surface used by the engine: "does the caller hold role X" and "who holds role X".

pub fn caller_has_role(e: &Env, address: &Address, role: Role) -> bool {
    AccessControl::new(e).address_has_role(address, role)
}

pub fn role_holder(e: &Env, role: Role) -> Address {
    AccessControl::new(e).get_role(role)
}

pub fn require_admin(e: &Env, address: &Address) {
    AccessControl::new(e).assert_address_has_role(address, Role::Admin);
}

pub fn require_fee_manager_or_admin(e: &Env, address: &Address) {
    let access_control = AccessControl::new(e);
    let _ = access_control.address_has_role(address, Role::FeeManager)
        || access_control.address_has_role(address, Role::Admin)
        || panic_with_error!(e, AccessControlError::Unauthorized);
}

pub fn require_operations_admin_or_admin(e: &Env, address: &Address) {
    let access_control = AccessControl::new(e);
    let _ = access_control.address_has_role(address, Role::OperationsAdmin)
        || access_control.address_has_role(address, Role::Admin)
        || panic_with_error!(e, AccessControlError::Unauthorized);
}
