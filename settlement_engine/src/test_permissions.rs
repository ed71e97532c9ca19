#![cfg(test)]
extern crate std;

use crate::testutils::{empty_swap_hooks, no_exchange_fee, no_fee_on_top, pool_type_key, Setup};
use amm_interfaces::types::{
    DirectSwapParams, ProtocolFeeOverride, ProtocolFeeStructure, TokenSettings,
};
use soroban_sdk::testutils::{Address as _, AuthorizedFunction};
use soroban_sdk::{vec, Address, BytesN, Symbol};

fn fee_structure() -> ProtocolFeeStructure {
    ProtocolFeeStructure {
        lp_fee_bps: 100,
        exchange_fee_bps: 200,
        fee_on_top_bps: 300,
    }
}

#[test]
#[should_panic(expected = "Error(Contract, #102)")]
fn test_register_pool_type_unauthorized() {
    let setup = Setup::default();
    setup.engine.register_pool_type(
        &setup.users[0],
        &pool_type_key(&setup.env, 2),
        &setup.strategy.address,
    );
}

#[test]
fn test_register_pool_type_by_admin() {
    let setup = Setup::default();
    let pool_type = pool_type_key(&setup.env, 2);
    setup
        .engine
        .register_pool_type(&setup.admin, &pool_type, &setup.strategy.address);
    assert_eq!(
        setup.engine.get_pool_type_strategy(&pool_type),
        Some(setup.strategy.address.clone())
    );
}

#[test]
#[should_panic(expected = "Error(Contract, #102)")]
fn test_set_fee_structure_unauthorized() {
    let setup = Setup::default();
    setup
        .engine
        .set_protocol_fee_structure(&setup.operations_admin, &fee_structure());
}

#[test]
fn test_set_fee_structure_by_admin() {
    let setup = Setup::default();
    setup
        .engine
        .set_protocol_fee_structure(&setup.admin, &fee_structure());
    assert_eq!(setup.engine.get_protocol_fee_structure(), fee_structure());
}

#[test]
fn test_fee_overrides_unauthorized() {
    let setup = Setup::default();
    let user = &setup.users[0];
    let value = ProtocolFeeOverride {
        enabled: true,
        fee_bps: 0,
    };

    assert!(setup
        .engine
        .try_set_exchange_fee_override(user, user, &value)
        .is_err());
    assert!(setup
        .engine
        .try_set_fee_on_top_override(user, user, &value)
        .is_err());
    assert!(setup
        .engine
        .try_set_lp_fee_override(user, &setup.pool_id, &value)
        .is_err());
    assert!(setup.engine.try_set_flashloan_fee_bps(user, &10).is_err());
    assert!(setup
        .engine
        .try_collect_protocol_fees(user, &vec![&setup.env, setup.token0.address.clone()])
        .is_err());

    setup
        .engine
        .set_fee_on_top_override(&setup.fee_manager, user, &value);
    assert_eq!(setup.engine.get_fee_on_top_override(user), value);
}

#[test]
#[should_panic(expected = "Error(Contract, #1101)")]
fn test_lp_fee_override_unknown_pool() {
    let setup = Setup::default();
    setup.engine.set_lp_fee_override(
        &setup.fee_manager,
        &BytesN::from_array(&setup.env, &[3; 32]),
        &ProtocolFeeOverride {
            enabled: true,
            fee_bps: 0,
        },
    );
}

#[test]
#[should_panic(expected = "Error(Contract, #102)")]
fn test_set_privileged_addrs_unauthorized() {
    let setup = Setup::default();
    setup.engine.set_privileged_addrs(
        &setup.fee_manager,
        &setup.fee_manager,
        &setup.operations_admin,
        &setup.protocol_fee_receiver,
    );
}

#[test]
fn test_set_privileged_addrs() {
    let setup = Setup::default();
    let e = &setup.env;
    let fee_manager = Address::generate(e);
    let operations_admin = Address::generate(e);
    let protocol_fee_receiver = Address::generate(e);
    setup.engine.set_privileged_addrs(
        &setup.admin,
        &fee_manager,
        &operations_admin,
        &protocol_fee_receiver,
    );

    let addrs = setup.engine.get_privileged_addrs();
    assert_eq!(
        addrs.get(Symbol::new(e, "Admin")).unwrap(),
        vec![e, setup.admin.clone()]
    );
    assert_eq!(
        addrs.get(Symbol::new(e, "FeeManager")).unwrap(),
        vec![e, fee_manager.clone()]
    );
    assert_eq!(
        addrs.get(Symbol::new(e, "OperationsAdmin")).unwrap(),
        vec![e, operations_admin]
    );
    assert_eq!(
        addrs.get(Symbol::new(e, "ProtocolFeeReceiver")).unwrap(),
        vec![e, protocol_fee_receiver]
    );

    assert!(setup
        .engine
        .try_set_protocol_fee_structure(&setup.fee_manager, &fee_structure())
        .is_err());
    setup
        .engine
        .set_protocol_fee_structure(&fee_manager, &fee_structure());
}

#[test]
#[should_panic(expected = "Error(Contract, #102)")]
fn test_set_token_settings_unauthorized() {
    let setup = Setup::default();
    setup.engine.set_token_settings(
        &setup.admin,
        &setup.token0.address,
        &TokenSettings {
            hop_fee_bps: 10,
            flags: 0,
            hook: None,
        },
    );
}

#[test]
#[should_panic(expected = "Error(Contract, #102)")]
fn test_collect_hook_fees_by_token_unauthorized() {
    let setup = Setup::default();
    setup.engine.collect_hook_fees_by_token(
        &setup.fee_manager,
        &setup.token0.address,
        &setup.token0.address,
        &setup.fee_manager,
    );
}

#[test]
fn test_single_swap_authorized_by_executor() {
    let setup = Setup::default();
    let e = &setup.env;
    let order = setup.order(&setup.token0.address, &setup.token1.address, 1_000_000, 0);
    setup.swap(&order, &setup.pool_id);

    let auths = e.auths();
    assert_eq!(auths.len(), 1);
    let (address, invocation) = &auths[0];
    assert_eq!(address, &setup.users[0]);
    match &invocation.function {
        AuthorizedFunction::Contract((contract, function, _)) => {
            assert_eq!(contract, &setup.engine.address);
            assert_eq!(function, &Symbol::new(e, "single_swap"));
        }
        _ => panic!("unexpected authorized function"),
    }
    // input pulled from the executor under the same authorization
    match &invocation.sub_invocations[0].function {
        AuthorizedFunction::Contract((contract, function, _)) => {
            assert_eq!(contract, &setup.token0.address);
            assert_eq!(function, &Symbol::new(e, "transfer"));
        }
        _ => panic!("unexpected authorized function"),
    }
}

#[test]
fn test_direct_swap_authorized_by_both_sides() {
    let setup = Setup::default();
    let e = &setup.env;
    let order = setup.order(&setup.token0.address, &setup.token1.address, 1_000_000, 0);
    setup.engine.direct_swap(
        &setup.users[0],
        &order,
        &DirectSwapParams {
            swap_amount: 990_000,
        },
        &no_exchange_fee(e),
        &no_fee_on_top(e),
        &empty_swap_hooks(e),
        &None,
    );

    let auths = e.auths();
    assert!(auths.iter().any(|(address, _)| address == &setup.users[0]));
    assert!(auths.iter().any(|(address, _)| address == &setup.users[1]));
}
