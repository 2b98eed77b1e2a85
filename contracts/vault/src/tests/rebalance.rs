extern crate std;

use normal::error::ErrorCode;
use pretty_assertions::assert_eq;
use soroban_sdk::{
    symbol_short,
    testutils::{ AuthorizedFunction, AuthorizedInvocation, Ledger },
    vec,
    IntoVal,
    Symbol,
};

use super::setup::VaultTest;
use crate::storage::{ RebalancePhase, RebalanceRecord };

#[test]
fn rebalance_commits_realized_weight() {
    let test = VaultTest::new();
    test.env.ledger().with_mut(|li| {
        li.timestamp = 1_000;
    });

    test.vault.deposit(&test.user, &1_000);
    let market = test.add_market(5_000, 1_000);
    assert_eq!(test.vault.total_assets(), 2_000);

    let deltas = vec![&test.env, 100i128];
    let total = test.vault.rebalance(&test.keeper, &deltas);

    assert_eq!(
        test.env.auths(),
        [
            (
                test.keeper.clone(),
                AuthorizedInvocation {
                    function: AuthorizedFunction::Contract((
                        test.vault.address.clone(),
                        Symbol::new(&test.env, "rebalance"),
                        (&test.keeper, deltas.clone()).into_val(&test.env),
                    )),
                    sub_invocations: std::vec![AuthorizedInvocation {
                        function: AuthorizedFunction::Contract((
                            test.asset.address.clone(),
                            symbol_short!("transfer"),
                            (&test.keeper, &test.vault.address, 100i128).into_val(&test.env),
                        )),
                        sub_invocations: std::vec![],
                    }],
                },
            ),
        ]
    );

    assert_eq!(total, 2_100);
    assert_eq!(test.idle(), 1_100);
    assert_eq!(test.asset.balance(&test.keeper), 400);

    // 1000 * 10000 / 2100
    let entry = test.vault.query_market(&market);
    assert_eq!(entry.target_weight, 5_000);
    assert_eq!(entry.realized_weight, 4_761);

    assert_eq!(
        test.vault.query_last_rebalance(),
        Some(RebalanceRecord {
            ts: 1_000,
            keeper: test.keeper.clone(),
            prev_total_assets: 2_000,
            total_assets: 2_100,
            markets: 1,
            phase: RebalancePhase::Committed,
        })
    );
}

#[test]
fn rebalance_pays_keeper_on_negative_delta() {
    let test = VaultTest::new();
    test.vault.deposit(&test.user, &1_000);
    let market = test.add_market(5_000, 1_000);

    let total = test.vault.rebalance(&test.keeper, &vec![&test.env, -50i128]);

    assert_eq!(total, 1_950);
    assert_eq!(test.idle(), 950);
    assert_eq!(test.asset.balance(&test.keeper), 550);
    // 1000 * 10000 / 1950
    assert_eq!(test.vault.query_market(&market).realized_weight, 5_128);
}

#[test]
fn next_rebalance_uses_realized_weight() {
    let test = VaultTest::new();
    test.vault.deposit(&test.user, &1_000);
    let market = test.add_market(5_000, 1_000);

    test.vault.rebalance(&test.keeper, &vec![&test.env, 100i128]);
    assert_eq!(test.vault.query_market(&market).realized_weight, 4_761);

    // back to 5000, inside [4284, 5238] around the realized 4761
    let total = test.vault.rebalance(&test.keeper, &vec![&test.env, -100i128]);
    assert_eq!(total, 2_000);
    assert_eq!(test.vault.query_market(&market).realized_weight, 5_000);
}

#[test]
fn rebalance_walks_markets_in_registry_order() {
    let test = VaultTest::new();
    test.vault.deposit(&test.user, &400);
    let first = test.add_market(5_000, 1_000);
    let second = test.add_market(3_000, 600);
    assert_eq!(test.vault.total_assets(), 2_000);

    let total = test.vault.rebalance(&test.keeper, &vec![&test.env, 100i128, 0i128]);

    assert_eq!(total, 2_100);
    assert_eq!(test.vault.query_market(&first).realized_weight, 4_761);
    // 600 * 10000 / 2100
    assert_eq!(test.vault.query_market(&second).realized_weight, 2_857);
}

#[test]
fn rebalance_with_empty_registry() {
    let test = VaultTest::new();
    test.vault.deposit(&test.user, &1_000);

    assert_eq!(test.vault.rebalance(&test.keeper, &vec![&test.env]), 1_000);
    assert_eq!(test.idle(), 1_000);
}

#[test]
fn delta_length_mismatch() {
    let test = VaultTest::new();
    test.vault.deposit(&test.user, &1_000);
    test.add_market(5_000, 1_000);

    assert_eq!(
        test.vault.try_rebalance(&test.keeper, &vec![&test.env, 1i128, 2i128]),
        Err(Ok(ErrorCode::DeltaLengthMismatch))
    );
    assert_eq!(test.asset.balance(&test.keeper), 500);
    assert_eq!(test.idle(), 1_000);
    assert_eq!(test.vault.query_last_rebalance(), None);
}

#[test]
fn rebalance_only_by_keeper() {
    let test = VaultTest::new();
    test.vault.deposit(&test.user, &1_000);
    test.add_market(5_000, 1_000);

    for sender in [test.user.clone(), test.manager.clone()] {
        assert_eq!(
            test.vault.try_rebalance(&sender, &vec![&test.env, 0i128]),
            Err(Ok(ErrorCode::NotAuthorized))
        );
    }
}

#[test]
fn weight_outside_band_rolls_back() {
    let test = VaultTest::new();
    test.vault.deposit(&test.user, &1_000);
    let market = test.add_market(5_000, 1_000);

    // 1000 / 1100 of total assets is far above [4500, 5500]
    assert_eq!(
        test.vault.try_rebalance(&test.keeper, &vec![&test.env, -900i128]),
        Err(Ok(ErrorCode::WeightThresholdExceeded))
    );

    assert_eq!(test.idle(), 1_000);
    assert_eq!(test.asset.balance(&test.keeper), 500);
    assert_eq!(test.vault.query_market(&market).realized_weight, 5_000);
    assert_eq!(test.vault.query_last_rebalance(), None);
}

#[test]
fn total_assets_outside_band_rolls_back() {
    let test = VaultTest::setup(1_000_000, 1_000, 10_000);
    test.vault.deposit(&test.user, &80);
    let market = test.add_market(5_000, 0);

    // 100 is above the [72, 88] band around 80
    assert_eq!(
        test.vault.try_rebalance(&test.keeper, &vec![&test.env, 20i128]),
        Err(Ok(ErrorCode::AssetThresholdExceeded))
    );

    assert_eq!(test.idle(), 80);
    assert_eq!(test.asset.balance(&test.keeper), 500);
    assert_eq!(test.vault.query_market(&market).realized_weight, 5_000);
    assert_eq!(test.vault.total_assets(), 80);
}

#[test]
fn failed_transfer_aborts() {
    let test = VaultTest::setup(1_000_000, 10_000, 10_000);
    test.vault.deposit(&test.user, &1_000);
    test.add_market(5_000, 1_000);

    // keeper holds only 500
    assert_eq!(
        test.vault.try_rebalance(&test.keeper, &vec![&test.env, 600i128]),
        Err(Ok(ErrorCode::TransferFailed))
    );
    // vault idle is only 1000
    assert_eq!(
        test.vault.try_rebalance(&test.keeper, &vec![&test.env, -1_500i128]),
        Err(Ok(ErrorCode::TransferFailed))
    );

    assert_eq!(test.idle(), 1_000);
    assert_eq!(test.asset.balance(&test.keeper), 500);
}

#[test]
fn later_market_violation_rolls_back_earlier_moves() {
    let test = VaultTest::new();
    test.vault.deposit(&test.user, &1_000);
    let first = test.add_market(5_000, 1_000);
    // no position, so its weight drops to 0 against a reference of 100
    let second = test.add_market(100, 0);

    assert_eq!(
        test.vault.try_rebalance(&test.keeper, &vec![&test.env, 100i128, 0i128]),
        Err(Ok(ErrorCode::WeightThresholdExceeded))
    );

    assert_eq!(test.idle(), 1_000);
    assert_eq!(test.asset.balance(&test.keeper), 500);
    assert_eq!(test.vault.query_market(&first).realized_weight, 5_000);
    assert_eq!(test.vault.query_market(&second).realized_weight, 100);
    assert_eq!(test.vault.query_last_rebalance(), None);
}

#[test]
fn new_market_off_target_blocks_until_reweighted() {
    let test = VaultTest::new();
    test.vault.deposit(&test.user, &1_000);
    // live weight 5000 sits outside [1800, 2200] around the 2000 target
    let market = test.add_market(2_000, 1_000);

    assert_eq!(
        test.vault.try_rebalance(&test.keeper, &vec![&test.env, 0i128]),
        Err(Ok(ErrorCode::WeightThresholdExceeded))
    );

    test.vault.set_weight(&test.manager, &market, &5_000);
    assert_eq!(test.vault.rebalance(&test.keeper, &vec![&test.env, 0i128]), 2_000);
    assert_eq!(test.vault.query_market(&market).realized_weight, 5_000);
}
