#![cfg(test)]
extern crate std;

use crate::constants::MAX_BPS;
use crate::fees::{
    apply_fees_to_input, apply_fees_to_output, bps_of, gross_up, split, FeeSplit, ProtocolRates,
    SwapCache,
};
use crate::testutils::{empty_swap_hooks, no_fee_on_top, Setup};
use amm_interfaces::types::{
    BpsFeeWithRecipient, FlatFeeWithRecipient, ProtocolFeeOverride, ProtocolFeeStructure,
    TokenSettings,
};
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{vec, Address, Env};
use utils::test_utils::assert_approx_eq_abs;

fn scenario_structure() -> ProtocolFeeStructure {
    ProtocolFeeStructure {
        lp_fee_bps: 1000,
        exchange_fee_bps: 500,
        fee_on_top_bps: 200,
    }
}

#[test]
fn test_split_keeps_amount() {
    let e = Env::default();
    for amount in [0u128, 1, 999, 29_970, 1_000_000, u64::MAX as u128] {
        for protocol_bps in [0u32, 1, 500, 9_999, MAX_BPS] {
            let FeeSplit {
                recipient,
                protocol,
            } = split(&e, amount, protocol_bps);
            assert_eq!(recipient + protocol, amount);
            assert_eq!(protocol, amount * protocol_bps as u128 / MAX_BPS as u128);
        }
    }
}

#[test]
fn test_input_fees_scenario() {
    let e = Env::default();
    let mut cache = SwapCache {
        amount_in: 1_000_000,
        ..SwapCache::default()
    };
    apply_fees_to_input(
        &e,
        &mut cache,
        300,
        1000,
        &ProtocolRates {
            exchange_fee_bps: 500,
            fee_on_top_bps: 200,
        },
    );

    assert_eq!(
        cache.fee_on_top,
        FeeSplit {
            recipient: 980,
            protocol: 20
        }
    );
    // 29970 at 500 bps: 1498.5 goes down to the protocol's 1498
    assert_eq!(
        cache.exchange_fee,
        FeeSplit {
            recipient: 28_472,
            protocol: 1_498
        }
    );
    assert_eq!(cache.amount_in, 969_030);
    assert_eq!(cache.protocol_fee, 1_518);
}

#[test]
fn test_output_fee_recovers_rate() {
    let e = Env::default();
    for exchange_fee_bps in [1u32, 30, 300, 5_000, 9_999] {
        let mut cache = SwapCache {
            amount_in: 100_301,
            ..SwapCache::default()
        };
        apply_fees_to_output(&e, &mut cache, exchange_fee_bps, 0, &ProtocolRates::default());

        let fee = cache.exchange_fee.total();
        assert_eq!(cache.amount_in, 100_301 + fee);
        assert_approx_eq_abs(bps_of(&e, cache.amount_in, exchange_fee_bps), fee, 1);
    }
}

#[test]
fn test_output_fees_order() {
    let e = Env::default();
    let mut cache = SwapCache {
        amount_in: 100_301,
        ..SwapCache::default()
    };
    apply_fees_to_output(
        &e,
        &mut cache,
        300,
        1000,
        &ProtocolRates {
            exchange_fee_bps: 0,
            fee_on_top_bps: 10_000,
        },
    );
    // exchange fee grossed up on the pool input only, flat fee added afterwards
    assert_eq!(cache.exchange_fee.total(), 3_103);
    assert_eq!(cache.amount_in, 100_301 + 3_103 + 1_000);
    assert_eq!(cache.fee_on_top.protocol, 1_000);
    assert_eq!(cache.protocol_fee, 1_000);
}

#[test]
fn test_gross_up_rounds_up() {
    let e = Env::default();
    assert_eq!(gross_up(&e, 100_000, 0), 0);
    assert_eq!(gross_up(&e, 9_700, 300), 300);
    assert_eq!(gross_up(&e, 9_701, 300), 301);
}

#[test]
#[should_panic(expected = "Error(Contract, #1203)")]
fn test_fee_on_top_above_input() {
    let setup = Setup::default();
    let e = &setup.env;
    e.as_contract(&setup.engine.address, || {
        let mut cache = SwapCache {
            amount_in: 500,
            ..SwapCache::default()
        };
        apply_fees_to_input(e, &mut cache, 0, 501, &ProtocolRates::default());
    });
}

#[test]
#[should_panic(expected = "Error(Contract, #1204)")]
fn test_exchange_fee_above_max() {
    let setup = Setup::default();
    let e = &setup.env;
    e.as_contract(&setup.engine.address, || {
        let mut cache = SwapCache {
            amount_in: 500,
            ..SwapCache::default()
        };
        apply_fees_to_input(e, &mut cache, MAX_BPS + 1, 0, &ProtocolRates::default());
    });
}

#[test]
#[should_panic(expected = "Error(Contract, #1204)")]
fn test_gross_up_full_rate() {
    let setup = Setup::default();
    let e = &setup.env;
    e.as_contract(&setup.engine.address, || {
        gross_up(e, 1, MAX_BPS);
    });
}

#[test]
fn test_swap_scenario() {
    let setup = Setup::default();
    let e = &setup.env;
    setup
        .engine
        .set_protocol_fee_structure(&setup.fee_manager, &scenario_structure());
    let exchange_recipient = Address::generate(e);
    let fee_on_top_recipient = Address::generate(e);
    let executor_balance = setup.balance(&setup.token0, &setup.users[0]);
    let recipient_balance = setup.balance(&setup.token1, &setup.users[1]);

    let order = setup.order(&setup.token0.address, &setup.token1.address, 1_000_000, 0);
    let (amount_in, amount_out) = setup.engine.single_swap(
        &setup.users[0],
        &order,
        &setup.pool_id,
        &BpsFeeWithRecipient {
            recipient: exchange_recipient.clone(),
            bps: 300,
        },
        &FlatFeeWithRecipient {
            recipient: fee_on_top_recipient.clone(),
            amount: 1000,
        },
        &empty_swap_hooks(e),
        &None,
    );

    // 969030 reach the pool: lp fee 2907 (290 of it to the protocol), 966123 out
    assert_eq!(amount_in, 1_000_000);
    assert_eq!(amount_out, 966_123);
    assert_eq!(
        setup.balance(&setup.token0, &setup.users[0]),
        executor_balance - 1_000_000
    );
    assert_eq!(
        setup.balance(&setup.token1, &setup.users[1]),
        recipient_balance + 966_123
    );
    assert_eq!(setup.balance(&setup.token0, &exchange_recipient), 28_472);
    assert_eq!(setup.balance(&setup.token0, &fee_on_top_recipient), 980);
    assert_eq!(
        setup.engine.get_protocol_fees(&setup.token0.address),
        290 + 1_498 + 20
    );

    let pool = setup.engine.get_pool_state(&setup.pool_id);
    assert_eq!(pool.reserve0, 1_000_000_000 + 969_030 - 2_907);
    assert_eq!(pool.reserve1, 1_000_000_000 - 966_123);
    assert_eq!(pool.fee_balance0, 2_907 - 290);
    assert_eq!(
        setup.engine_balance(&setup.token0),
        pool.reserve0 + pool.fee_balance0 + 1_808
    );
}

#[test]
fn test_exchange_fee_override() {
    let setup = Setup::default();
    let e = &setup.env;
    setup
        .engine
        .set_protocol_fee_structure(&setup.fee_manager, &scenario_structure());
    let exchange_recipient = Address::generate(e);
    let value = ProtocolFeeOverride {
        enabled: true,
        fee_bps: 0,
    };
    setup
        .engine
        .set_exchange_fee_override(&setup.fee_manager, &exchange_recipient, &value);
    assert_eq!(
        setup.engine.get_exchange_fee_override(&exchange_recipient),
        value
    );

    let order = setup.order(&setup.token0.address, &setup.token1.address, 1_000_000, 0);
    setup.engine.single_swap(
        &setup.users[0],
        &order,
        &setup.pool_id,
        &BpsFeeWithRecipient {
            recipient: exchange_recipient.clone(),
            bps: 300,
        },
        &no_fee_on_top(e),
        &empty_swap_hooks(e),
        &None,
    );

    assert_eq!(setup.balance(&setup.token0, &exchange_recipient), 30_000);
    // only the lp share: floor(2910 * 1000 / 10000)
    assert_eq!(setup.engine.get_protocol_fees(&setup.token0.address), 291);
}

#[test]
fn test_lp_fee_override() {
    let setup = Setup::default();
    setup.engine.set_lp_fee_override(
        &setup.fee_manager,
        &setup.pool_id,
        &ProtocolFeeOverride {
            enabled: true,
            fee_bps: MAX_BPS,
        },
    );

    let order = setup.order(&setup.token0.address, &setup.token1.address, 1_000_000, 0);
    setup.swap(&order, &setup.pool_id);

    assert_eq!(setup.engine.get_protocol_fees(&setup.token0.address), 3_000);
    assert_eq!(setup.engine.get_pool_state(&setup.pool_id).fee_balance0, 0);
}

#[test]
fn test_exact_output_fees_and_limit() {
    let setup = Setup::default();
    let e = &setup.env;
    let exchange_fee = BpsFeeWithRecipient {
        recipient: Address::generate(e),
        bps: 300,
    };

    // pool needs 100301 for 100000 out, grossed up by 3103
    let order = setup.order(&setup.token0.address, &setup.token1.address, -100_000, 103_403);
    assert!(setup
        .engine
        .try_single_swap(
            &setup.users[0],
            &order,
            &setup.pool_id,
            &exchange_fee,
            &no_fee_on_top(e),
            &empty_swap_hooks(e),
            &None,
        )
        .is_err());

    let order = setup.order(&setup.token0.address, &setup.token1.address, -100_000, 103_404);
    let (amount_in, amount_out) = setup.engine.single_swap(
        &setup.users[0],
        &order,
        &setup.pool_id,
        &exchange_fee,
        &no_fee_on_top(e),
        &empty_swap_hooks(e),
        &None,
    );
    assert_eq!((amount_in, amount_out), (103_404, 100_000));
    assert_eq!(setup.balance(&setup.token0, &exchange_fee.recipient), 3_103);
}

#[test]
fn test_hop_fee() {
    let setup = Setup::default();
    let e = &setup.env;
    setup.engine.set_token_settings(
        &setup.token_admin,
        &setup.token0.address,
        &TokenSettings {
            hop_fee_bps: 100,
            flags: 0,
            hook: None,
        },
    );

    let order = setup.order(&setup.token0.address, &setup.token1.address, 1_000_000, 0);
    let (_, amount_out) = setup.swap(&order, &setup.pool_id);
    // 10000 hop fee, 990000 reach the pool, 2970 lp fee
    assert_eq!(amount_out, 987_030);
    assert_eq!(
        setup
            .engine
            .get_hook_fees_by_token(&setup.token0.address, &setup.token0.address),
        10_000
    );

    let receiver = Address::generate(e);
    assert_eq!(
        setup.engine.collect_hook_fees_by_token(
            &setup.token_admin,
            &setup.token0.address,
            &setup.token0.address,
            &receiver,
        ),
        10_000
    );
    assert_eq!(setup.balance(&setup.token0, &receiver), 10_000);
}

#[test]
fn test_collect_protocol_fees() {
    let setup = Setup::default();
    let e = &setup.env;
    setup
        .engine
        .set_protocol_fee_structure(&setup.fee_manager, &scenario_structure());
    let order = setup.order(&setup.token0.address, &setup.token1.address, 1_000_000, 0);
    setup.swap(&order, &setup.pool_id);
    assert_eq!(setup.engine.get_protocol_fees(&setup.token0.address), 300);

    let collected = setup.engine.collect_protocol_fees(
        &setup.fee_manager,
        &vec![e, setup.token0.address.clone(), setup.token1.address.clone()],
    );
    assert_eq!(collected, vec![e, 300u128, 0u128]);
    assert_eq!(
        setup.balance(&setup.token0, &setup.protocol_fee_receiver),
        300
    );
    assert_eq!(setup.engine.get_protocol_fees(&setup.token0.address), 0);
}

#[test]
#[should_panic(expected = "Error(Contract, #1005)")]
fn test_fee_structure_out_of_bounds() {
    let setup = Setup::default();
    setup.engine.set_protocol_fee_structure(
        &setup.fee_manager,
        &ProtocolFeeStructure {
            lp_fee_bps: MAX_BPS + 1,
            exchange_fee_bps: 0,
            fee_on_top_bps: 0,
        },
    );
}

#[test]
fn test_flashloan_fee_bounds() {
    let setup = Setup::default();
    assert_eq!(setup.engine.get_flashloan_fee_bps(), u16::MAX as u32 + 1);

    setup.engine.set_flashloan_fee_bps(&setup.fee_manager, &MAX_BPS);
    assert_eq!(setup.engine.get_flashloan_fee_bps(), MAX_BPS);
    assert!(setup
        .engine
        .try_set_flashloan_fee_bps(&setup.fee_manager, &(MAX_BPS + 1))
        .is_err());
    setup
        .engine
        .set_flashloan_fee_bps(&setup.fee_manager, &(u16::MAX as u32 + 1));
    assert_eq!(setup.engine.get_flashloan_fee_bps(), u16::MAX as u32 + 1);
}

#[test]
fn test_fee_getters_default() {
    let setup = Setup::default();
    let e = &setup.env;
    assert_eq!(
        setup.engine.get_protocol_fee_structure(),
        ProtocolFeeStructure::default()
    );
    assert_eq!(
        setup.engine.get_fee_on_top_override(&Address::generate(e)),
        ProtocolFeeOverride::default()
    );
    assert_eq!(
        setup.engine.get_lp_fee_override(&setup.pool_id),
        ProtocolFeeOverride::default()
    );
}
