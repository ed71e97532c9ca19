#![cfg(test)]
extern crate std;

use crate::access::{AccessControl, AccessControlTrait};
use crate::role::Role;
use crate::utils::{caller_has_role, require_fee_manager_or_admin, role_holder};
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{contract, contractimpl, Address, Env};

#[contract]
pub struct RoleHost;

#[contractimpl]
impl RoleHost {
    pub fn ping(_e: Env) {}
}

#[test]
fn test_roles_are_independent() {
    let e = Env::default();
    let host = e.register(RoleHost, ());
    let admin = Address::generate(&e);
    let fee_manager = Address::generate(&e);

    e.as_contract(&host, || {
        let access_control = AccessControl::new(&e);
        assert_eq!(access_control.get_role_safe(Role::FeeManager), None);

        access_control.set_role_address(Role::Admin, &admin);
        access_control.set_role_address(Role::FeeManager, &fee_manager);

        assert!(caller_has_role(&e, &admin, Role::Admin));
        assert!(!caller_has_role(&e, &admin, Role::FeeManager));
        assert_eq!(role_holder(&e, Role::FeeManager), fee_manager);

        // admin passes fee manager checks as well
        require_fee_manager_or_admin(&e, &admin);
        require_fee_manager_or_admin(&e, &fee_manager);
    });
}

#[test]
#[should_panic(expected = "Error(Contract, #101)")]
fn test_missing_role_holder() {
    let e = Env::default();
    let host = e.register(RoleHost, ());
    e.as_contract(&host, || {
        role_holder(&e, Role::ProtocolFeeReceiver);
    });
}

#[test]
#[should_panic(expected = "Error(Contract, #102)")]
fn test_unauthorized_fee_manager() {
    let e = Env::default();
    let host = e.register(RoleHost, ());
    let admin = Address::generate(&e);
    e.as_contract(&host, || {
        AccessControl::new(&e).set_role_address(Role::Admin, &admin);
        require_fee_manager_or_admin(&e, &Address::generate(&e));
    });
}
