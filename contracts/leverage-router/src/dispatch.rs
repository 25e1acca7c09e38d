use soroban_sdk::{token, vec, Address, Bytes, Env, Vec};

use crate::config;
use crate::context::{self, OperationContext, OperationKind};
use crate::enter;
use crate::errors::RouterError;
use crate::exit;
use crate::guards;
use crate::lending::CoreClient;
use crate::migrate;
use crate::residual;

/// Flash-loan callback entry. The lending core invokes this immediately
/// after transferring the principal to the router.
///
/// Validation order: consume the stored context, then check the claimed
/// initiator against our own address, the claimed beneficiary against the
/// context's initiator, the caller's identity against the configured
/// lending core, and finally the loan cardinality. Only then does the
/// operation handler run. Any failure aborts the whole transaction.
pub fn on_flash_loan(
    env: &Env,
    assets: Vec<Address>,
    amounts: Vec<i128>,
    fees: Vec<i128>,
    initiator_claim: Address,
    beneficiary_claim: Address,
    _data: Bytes,
) -> Result<Vec<i128>, RouterError> {
    let ctx = context::take(env)?;
    if initiator_claim != env.current_contract_address() {
        return Err(RouterError::InitiatorMismatch);
    }
    if beneficiary_claim != ctx.initiator {
        return Err(RouterError::BeneficiaryMismatch);
    }
    let cfg = config::load(env)?;
    cfg.lending_core.require_auth();
    if assets.len() != 1 || amounts.len() != 1 || fees.len() != 1 {
        return Err(RouterError::UnexpectedLoanCardinality);
    }
    let asset = assets
        .get(0)
        .ok_or(RouterError::UnexpectedLoanCardinality)?;
    let amount = amounts
        .get(0)
        .ok_or(RouterError::UnexpectedLoanCardinality)?;
    let fee = fees.get(0).ok_or(RouterError::UnexpectedLoanCardinality)?;

    let repay = match ctx.kind {
        OperationKind::None => Err(RouterError::NoActiveOperation),
        OperationKind::EnterWithCollateralSeed => {
            enter::handle_collateral_seed(env, &cfg, &ctx, &asset, amount, fee)
        }
        OperationKind::EnterWithBorrowedSeed => {
            enter::handle_borrowed_seed(env, &cfg, &ctx, &asset, amount, fee)
        }
        OperationKind::EnterSingleAsset => {
            enter::handle_single_asset(env, &cfg, &ctx, &asset, amount, fee)
        }
        OperationKind::ExitWithSwap => {
            exit::handle_exit_swap(env, &cfg, &ctx, &asset, amount, fee)
        }
        OperationKind::ExitSingleAsset => {
            exit::handle_exit_single(env, &cfg, &ctx, &asset, amount, fee)
        }
        OperationKind::SwapCollateral => {
            migrate::handle_swap_collateral(env, &cfg, &ctx, &asset, amount, fee)
        }
        OperationKind::SwapDebt => migrate::handle_swap_debt(env, &cfg, &ctx, &asset, amount, fee),
        OperationKind::SwapCollateralNativeToWrapped => {
            migrate::handle_native_collateral(env, &cfg, &ctx, &asset, amount, fee)
        }
        OperationKind::SwapDebtNativeToWrapped => {
            migrate::handle_native_debt(env, &cfg, &ctx, &asset, amount, fee)
        }
    }?;

    Ok(vec![env, repay])
}

/// Shared entry-point tail: snapshot the touched legs, arm the context,
/// request the loan, then verify post-operation solvency and forward any
/// surplus. `sweep_to` is the initiator for enter/exit families and the
/// fee sink for position swaps.
pub fn run_operation(
    env: &Env,
    core: &CoreClient,
    ctx: OperationContext,
    flash_asset: &Address,
    flash_amount: i128,
    legs: Vec<Address>,
    sweep_to: &Address,
) -> Result<(), RouterError> {
    let beneficiary = ctx.initiator.clone();
    let snap = residual::snapshot(env, legs);
    context::store(env, ctx)?;
    core.request_flash_loan(env, &beneficiary, flash_asset, flash_amount, Bytes::new(env));
    context::clear(env);
    guards::require_solvent(env, core, &beneficiary)?;
    residual::sweep(env, &snap, sweep_to)?;
    Ok(())
}

/// Fail with `InsufficientRepayment` unless the router holds at least
/// `owed` of `asset`.
pub fn ensure_repayable(env: &Env, asset: &Address, owed: i128) -> Result<(), RouterError> {
    let me = env.current_contract_address();
    if token::Client::new(env, asset).balance(&me) < owed {
        return Err(RouterError::InsufficientRepayment);
    }
    Ok(())
}

/// Approve the lending core to pull the repayment once the callback
/// returns.
pub fn approve_repayment(env: &Env, asset: &Address, core: &Address, owed: i128) {
    if owed > 0 {
        let expiry = env.ledger().sequence() + 100;
        token::Client::new(env, asset).approve(&env.current_contract_address(), core, &owed, &expiry);
    }
}
