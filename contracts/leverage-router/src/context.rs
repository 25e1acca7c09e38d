use soroban_sdk::{contracttype, Address, Env};

use crate::errors::RouterError;

/// Which operation a flash-loan callback should execute.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OperationKind {
    None,
    EnterWithCollateralSeed,
    EnterWithBorrowedSeed,
    EnterSingleAsset,
    ExitWithSwap,
    ExitSingleAsset,
    SwapCollateral,
    SwapDebt,
    SwapCollateralNativeToWrapped,
    SwapDebtNativeToWrapped,
}

/// Transaction-scoped record of the operation in flight.
///
/// Written exactly once by an entry point immediately before it requests
/// the flash loan, consumed exactly once by the dispatcher inside the
/// callback that request triggers. The meaning of `source_market` and
/// `target_market` depends on `kind`: for enter/exit operations they are
/// the collateral and borrow markets; for position swaps the old and new
/// market of the migrated leg.
#[contracttype]
#[derive(Clone, Debug)]
pub struct OperationContext {
    pub kind: OperationKind,
    pub initiator: Address,
    pub source_market: Address,
    pub target_market: Address,
    pub seed_amount: i128,
    pub redeem_or_repay_amount: i128,
    pub min_output: i128,
}

/// Single-slot storage key for the active context
#[contracttype]
#[derive(Clone)]
enum ContextKey {
    Active,
}

/// Record the operation about to be executed. Fails if a context is
/// already active, which can only mean reentry into an entry point.
pub fn store(env: &Env, ctx: OperationContext) -> Result<(), RouterError> {
    if env.storage().temporary().has(&ContextKey::Active) {
        return Err(RouterError::ReentrantCall);
    }
    env.storage().temporary().set(&ContextKey::Active, &ctx);
    Ok(())
}

/// Remove and return the active context. The remove happens before the
/// handler runs, so a context can never be consumed twice.
pub fn take(env: &Env) -> Result<OperationContext, RouterError> {
    let ctx: OperationContext = env
        .storage()
        .temporary()
        .get(&ContextKey::Active)
        .ok_or(RouterError::NoActiveOperation)?;
    env.storage().temporary().remove(&ContextKey::Active);
    if ctx.kind == OperationKind::None {
        return Err(RouterError::NoActiveOperation);
    }
    Ok(ctx)
}

/// Unconditional cleanup after the flash-loan request returns; a no-op
/// when the callback already consumed the slot.
pub fn clear(env: &Env) {
    env.storage().temporary().remove(&ContextKey::Active);
}

pub fn is_idle(env: &Env) -> bool {
    !env.storage().temporary().has(&ContextKey::Active)
}
