use crate::test_helpers::setup;

const FEE_BPS: i128 = 100;

#[test]
fn test_swap_full_collateral() {
    let f = setup();
    f.core.set_flash_loan_fee_bps(&f.admin, &FEE_BPS);
    f.seed_position(&f.asset_x, 1_000, 0);

    f.router
        .swap_full_collateral(&f.user, &f.user, &f.asset_x, &f.asset_y, &950);

    // Flash sized to 990 so that redeeming 1000 covers 990 + 9 fee; the
    // 990 swap output lands in the target market and the 1 X of dust
    // goes to the fee sink.
    assert_eq!(f.core.supplied_balance(&f.user, &f.asset_x), 0);
    assert_eq!(f.core.supplied_balance(&f.user, &f.asset_y), 990);
    assert!(f.core.is_member(&f.user, &f.asset_y));
    assert_eq!(f.balance(&f.asset_x, &f.fee_sink), 1);
    assert_eq!(f.balance(&f.asset_x, &f.router_id), 0);
    assert_eq!(f.balance(&f.asset_y, &f.router_id), 0);
}

#[test]
fn test_swap_partial_collateral() {
    let f = setup();
    f.core.set_flash_loan_fee_bps(&f.admin, &FEE_BPS);
    f.seed_position(&f.asset_x, 1_000, 0);

    f.router
        .swap_partial_collateral(&f.user, &f.user, &f.asset_x, &f.asset_y, &500, &450);

    // Flash 495, fee 4, redeem 500, dust 1.
    assert_eq!(f.core.supplied_balance(&f.user, &f.asset_x), 500);
    assert_eq!(f.core.supplied_balance(&f.user, &f.asset_y), 495);
    assert_eq!(f.balance(&f.asset_x, &f.fee_sink), 1);
}

#[test]
#[should_panic(expected = "HostError: Error(Contract, #16)")]
fn test_swap_collateral_slippage_rejected() {
    let f = setup();
    f.core.set_flash_loan_fee_bps(&f.admin, &FEE_BPS);
    f.seed_position(&f.asset_x, 1_000, 0);
    f.executor.set_rate(&9_000);

    f.router
        .swap_full_collateral(&f.user, &f.user, &f.asset_x, &f.asset_y, &950);
}

#[test]
fn test_swap_collateral_slippage_is_atomic() {
    let f = setup();
    f.core.set_flash_loan_fee_bps(&f.admin, &FEE_BPS);
    f.seed_position(&f.asset_x, 1_000, 0);
    f.executor.set_rate(&9_000);

    let res = f
        .router
        .try_swap_full_collateral(&f.user, &f.user, &f.asset_x, &f.asset_y, &950);
    assert!(res.is_err());

    assert_eq!(f.core.supplied_balance(&f.user, &f.asset_x), 1_000);
    assert_eq!(f.core.supplied_balance(&f.user, &f.asset_y), 0);
    assert_eq!(f.balance(&f.asset_y, &f.fee_sink), 0);
}

#[test]
fn test_swap_full_debt() {
    let f = setup();
    f.core.set_flash_loan_fee_bps(&f.admin, &FEE_BPS);
    f.seed_position(&f.asset_x, 2_000, 0);
    f.core
        .borrow_behalf(&f.user, &f.user, &f.user, &f.asset_y, &800);

    f.router
        .swap_full_debt(&f.user, &f.user, &f.asset_y, &f.native, &810, &800);

    // 810 native flashed and swapped into 810 Y; 800 retires the old
    // debt, new debt is 810 + 8 fee, 10 Y of surplus to the fee sink.
    assert_eq!(f.core.borrow_balance(&f.user, &f.asset_y), 0);
    assert_eq!(f.core.borrow_balance(&f.user, &f.native), 818);
    assert_eq!(f.balance(&f.asset_y, &f.fee_sink), 10);
    assert_eq!(f.balance(&f.native, &f.router_id), 0);
}

#[test]
fn test_swap_partial_debt() {
    let f = setup();
    f.core.set_flash_loan_fee_bps(&f.admin, &FEE_BPS);
    f.seed_position(&f.asset_x, 2_000, 0);
    f.core
        .borrow_behalf(&f.user, &f.user, &f.user, &f.asset_y, &800);

    f.router
        .swap_partial_debt(&f.user, &f.user, &f.asset_y, &f.native, &400, &400, &390);

    assert_eq!(f.core.borrow_balance(&f.user, &f.asset_y), 400);
    assert_eq!(f.core.borrow_balance(&f.user, &f.native), 404);
}

#[test]
fn test_migrate_native_collateral_to_wrapped() {
    let f = setup();
    f.core.set_flash_loan_fee_bps(&f.admin, &FEE_BPS);
    f.seed_position(&f.native, 1_000, 0);

    f.router
        .migrate_native_coll_to_wrapped(&f.user, &f.user, &1_000);

    // 990 flashed, wrapped 1:1 and supplied; redeem 1000, dust 1.
    assert_eq!(f.core.supplied_balance(&f.user, &f.native), 0);
    assert_eq!(f.core.supplied_balance(&f.user, &f.wrapped), 990);
    assert!(f.core.is_member(&f.user, &f.wrapped));
    assert_eq!(f.balance(&f.native, &f.fee_sink), 1);
}

#[test]
fn test_migrate_native_debt_to_wrapped() {
    let f = setup();
    f.core.set_flash_loan_fee_bps(&f.admin, &FEE_BPS);
    f.seed_position(&f.asset_x, 2_000, 0);
    f.core
        .borrow_behalf(&f.user, &f.user, &f.user, &f.native, &500);

    f.router
        .migrate_native_debt_to_wrapped(&f.user, &f.user, &505);

    // 505 wrapped flashed and unwrapped; 500 retires the native debt,
    // new wrapped debt is 505 + 5 fee, 5 native of surplus to the sink.
    assert_eq!(f.core.borrow_balance(&f.user, &f.native), 0);
    assert_eq!(f.core.borrow_balance(&f.user, &f.wrapped), 510);
    assert_eq!(f.balance(&f.native, &f.fee_sink), 5);
}

#[test]
#[should_panic(expected = "HostError: Error(Contract, #5)")]
fn test_migrate_native_debt_without_debt() {
    let f = setup();
    f.router
        .migrate_native_debt_to_wrapped(&f.user, &f.user, &100);
}
