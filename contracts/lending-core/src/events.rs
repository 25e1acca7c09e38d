//! Structured contract events for every state-changing core action.
//!
//! Each action gets its own `#[contractevent]` struct with an `emit_*`
//! helper so there is a single call-site per action.

use soroban_sdk::{contractevent, Address, Env};

/// Emitted when the admin registers a new market.
#[contractevent]
#[derive(Clone, Debug)]
pub struct MarketRegisteredEvent {
    pub asset: Address,
    pub collateral_factor_bps: i128,
    pub price: i128,
}

/// Emitted when collateral is supplied on a beneficiary's behalf.
#[contractevent]
#[derive(Clone, Debug)]
pub struct SuppliedBehalfEvent {
    pub caller: Address,
    pub beneficiary: Address,
    pub asset: Address,
    pub amount: i128,
    pub new_balance: i128,
    pub timestamp: u64,
}

/// Emitted when a borrow is opened on a beneficiary's behalf.
#[contractevent]
#[derive(Clone, Debug)]
pub struct BorrowedBehalfEvent {
    pub caller: Address,
    pub beneficiary: Address,
    pub asset: Address,
    pub amount: i128,
    pub new_debt: i128,
    pub timestamp: u64,
}

/// Emitted when collateral is redeemed on a beneficiary's behalf.
#[contractevent]
#[derive(Clone, Debug)]
pub struct RedeemedBehalfEvent {
    pub caller: Address,
    pub beneficiary: Address,
    pub asset: Address,
    pub amount: i128,
    pub new_balance: i128,
    pub timestamp: u64,
}

/// Emitted when debt is repaid on a beneficiary's behalf.
#[contractevent]
#[derive(Clone, Debug)]
pub struct RepaidBehalfEvent {
    pub caller: Address,
    pub beneficiary: Address,
    pub asset: Address,
    pub amount: i128,
    pub new_debt: i128,
    pub timestamp: u64,
}

/// Emitted when a flash loan principal is handed to the initiator.
#[contractevent]
#[derive(Clone, Debug)]
pub struct FlashLoanIssuedEvent {
    pub initiator: Address,
    pub beneficiary: Address,
    pub asset: Address,
    pub amount: i128,
    pub fee: i128,
}

/// Emitted when a flash loan repayment has been collected.
#[contractevent]
#[derive(Clone, Debug)]
pub struct FlashLoanSettledEvent {
    pub initiator: Address,
    pub asset: Address,
    pub amount: i128,
    pub fee: i128,
    pub repaid: i128,
}

pub fn emit_market_registered(env: &Env, asset: Address, collateral_factor_bps: i128, price: i128) {
    MarketRegisteredEvent {
        asset,
        collateral_factor_bps,
        price,
    }
    .publish(env);
}

pub fn emit_supplied_behalf(
    env: &Env,
    caller: Address,
    beneficiary: Address,
    asset: Address,
    amount: i128,
    new_balance: i128,
) {
    SuppliedBehalfEvent {
        caller,
        beneficiary,
        asset,
        amount,
        new_balance,
        timestamp: env.ledger().timestamp(),
    }
    .publish(env);
}

pub fn emit_borrowed_behalf(
    env: &Env,
    caller: Address,
    beneficiary: Address,
    asset: Address,
    amount: i128,
    new_debt: i128,
) {
    BorrowedBehalfEvent {
        caller,
        beneficiary,
        asset,
        amount,
        new_debt,
        timestamp: env.ledger().timestamp(),
    }
    .publish(env);
}

pub fn emit_redeemed_behalf(
    env: &Env,
    caller: Address,
    beneficiary: Address,
    asset: Address,
    amount: i128,
    new_balance: i128,
) {
    RedeemedBehalfEvent {
        caller,
        beneficiary,
        asset,
        amount,
        new_balance,
        timestamp: env.ledger().timestamp(),
    }
    .publish(env);
}

pub fn emit_repaid_behalf(
    env: &Env,
    caller: Address,
    beneficiary: Address,
    asset: Address,
    amount: i128,
    new_debt: i128,
) {
    RepaidBehalfEvent {
        caller,
        beneficiary,
        asset,
        amount,
        new_debt,
        timestamp: env.ledger().timestamp(),
    }
    .publish(env);
}

pub fn emit_flash_loan_issued(
    env: &Env,
    initiator: Address,
    beneficiary: Address,
    asset: Address,
    amount: i128,
    fee: i128,
) {
    FlashLoanIssuedEvent {
        initiator,
        beneficiary,
        asset,
        amount,
        fee,
    }
    .publish(env);
}

pub fn emit_flash_loan_settled(
    env: &Env,
    initiator: Address,
    asset: Address,
    amount: i128,
    fee: i128,
    repaid: i128,
) {
    FlashLoanSettledEvent {
        initiator,
        asset,
        amount,
        fee,
        repaid,
    }
    .publish(env);
}
