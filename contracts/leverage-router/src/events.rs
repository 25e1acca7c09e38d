//! Structured contract events for completed router operations.
//!
//! One event per operation family, emitted from inside the flash-loan
//! callback once the handler has finished moving funds, plus a residual
//! event per swept asset.

use soroban_sdk::{contractevent, Address, Env};

use crate::context::OperationKind;

/// Emitted when a leveraged position has been opened or increased.
#[contractevent]
#[derive(Clone, Debug)]
pub struct PositionEnteredEvent {
    pub kind: OperationKind,
    pub initiator: Address,
    pub collateral_asset: Address,
    pub debt_asset: Address,
    pub supplied: i128,
    pub borrowed: i128,
    pub timestamp: u64,
}

/// Emitted when a leveraged position has been reduced or closed.
#[contractevent]
#[derive(Clone, Debug)]
pub struct PositionExitedEvent {
    pub kind: OperationKind,
    pub initiator: Address,
    pub collateral_asset: Address,
    pub debt_asset: Address,
    pub redeemed: i128,
    pub repaid: i128,
    pub timestamp: u64,
}

/// Emitted when one leg of a position has been migrated between markets.
#[contractevent]
#[derive(Clone, Debug)]
pub struct PositionMigratedEvent {
    pub kind: OperationKind,
    pub initiator: Address,
    pub source_asset: Address,
    pub target_asset: Address,
    pub moved_out: i128,
    pub moved_in: i128,
    pub timestamp: u64,
}

/// Emitted for each asset whose surplus was forwarded after settlement.
#[contractevent]
#[derive(Clone, Debug)]
pub struct ResidualSweptEvent {
    pub asset: Address,
    pub recipient: Address,
    pub amount: i128,
}

pub fn emit_position_entered(
    env: &Env,
    kind: OperationKind,
    initiator: Address,
    collateral_asset: Address,
    debt_asset: Address,
    supplied: i128,
    borrowed: i128,
) {
    PositionEnteredEvent {
        kind,
        initiator,
        collateral_asset,
        debt_asset,
        supplied,
        borrowed,
        timestamp: env.ledger().timestamp(),
    }
    .publish(env);
}

pub fn emit_position_exited(
    env: &Env,
    kind: OperationKind,
    initiator: Address,
    collateral_asset: Address,
    debt_asset: Address,
    redeemed: i128,
    repaid: i128,
) {
    PositionExitedEvent {
        kind,
        initiator,
        collateral_asset,
        debt_asset,
        redeemed,
        repaid,
        timestamp: env.ledger().timestamp(),
    }
    .publish(env);
}

pub fn emit_position_migrated(
    env: &Env,
    kind: OperationKind,
    initiator: Address,
    source_asset: Address,
    target_asset: Address,
    moved_out: i128,
    moved_in: i128,
) {
    PositionMigratedEvent {
        kind,
        initiator,
        source_asset,
        target_asset,
        moved_out,
        moved_in,
        timestamp: env.ledger().timestamp(),
    }
    .publish(env);
}

pub fn emit_residual_swept(env: &Env, asset: &Address, recipient: &Address, amount: i128) {
    ResidualSweptEvent {
        asset: asset.clone(),
        recipient: recipient.clone(),
        amount,
    }
    .publish(env);
}
