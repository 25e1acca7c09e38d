//! Leverage-exit operations.
//!
//! Both variants repay debt out of the flash principal and fund the loan
//! repayment from redeemed collateral. Exits skip the pre-operation
//! solvency check (retiring debt cannot create a shortfall) but always
//! check after, since redeeming too much collateral can.

use soroban_sdk::{token, vec, Address, Env};

use crate::config::RouterConfig;
use crate::context::{OperationContext, OperationKind};
use crate::dispatch::{approve_repayment, ensure_repayable, run_operation};
use crate::errors::RouterError;
use crate::events;
use crate::guards;
use crate::lending::CoreClient;

/// Unwind a cross-asset position: flash the debt asset, repay, redeem
/// collateral, swap it back into the debt asset to settle the loan.
pub fn exit_with_swap(
    env: &Env,
    caller: Address,
    initiator: Address,
    collateral_asset: Address,
    debt_asset: Address,
    repay_amount: i128,
    redeem_amount: i128,
    min_debt_out: i128,
) -> Result<(), RouterError> {
    let cfg = guards::check_entry(env, &caller, &initiator)?;
    guards::require_positive(repay_amount)?;
    guards::require_positive(redeem_amount)?;
    if min_debt_out < 0 {
        return Err(RouterError::InvalidAmount);
    }
    let core = CoreClient::new(cfg.lending_core.clone());
    guards::require_listed(env, &core, &collateral_asset)?;
    guards::require_listed(env, &core, &debt_asset)?;

    let legs = vec![env, collateral_asset.clone(), debt_asset.clone()];
    let ctx = OperationContext {
        kind: OperationKind::ExitWithSwap,
        initiator: initiator.clone(),
        source_market: collateral_asset,
        target_market: debt_asset.clone(),
        seed_amount: 0,
        redeem_or_repay_amount: redeem_amount,
        min_output: min_debt_out,
    };
    run_operation(env, &core, ctx, &debt_asset, repay_amount, legs, &initiator)
}

/// Unwind within a single market: flash the asset, repay debt, redeem
/// exactly enough collateral to settle principal plus fee.
pub fn exit_single_asset(
    env: &Env,
    caller: Address,
    initiator: Address,
    asset: Address,
    repay_amount: i128,
) -> Result<(), RouterError> {
    let cfg = guards::check_entry(env, &caller, &initiator)?;
    guards::require_positive(repay_amount)?;
    let core = CoreClient::new(cfg.lending_core.clone());
    guards::require_listed(env, &core, &asset)?;

    let legs = vec![env, asset.clone()];
    let ctx = OperationContext {
        kind: OperationKind::ExitSingleAsset,
        initiator: initiator.clone(),
        source_market: asset.clone(),
        target_market: asset.clone(),
        seed_amount: 0,
        redeem_or_repay_amount: 0,
        min_output: 0,
    };
    run_operation(env, &core, ctx, &asset, repay_amount, legs, &initiator)
}

pub(crate) fn handle_exit_swap(
    env: &Env,
    cfg: &RouterConfig,
    ctx: &OperationContext,
    asset: &Address,
    amount: i128,
    fee: i128,
) -> Result<i128, RouterError> {
    let me = env.current_contract_address();
    let core = CoreClient::new(cfg.lending_core.clone());

    let debt = core.borrow_balance(env, &ctx.initiator, asset);
    let to_repay = amount.min(debt);
    let applied = if to_repay > 0 {
        token::Client::new(env, asset).transfer(&me, &cfg.lending_core, &to_repay);
        core.repay_behalf(env, &ctx.initiator, asset, to_repay)?
    } else {
        0
    };

    core.redeem_behalf(
        env,
        &ctx.initiator,
        &me,
        &ctx.source_market,
        ctx.redeem_or_repay_amount,
    )?;
    let out = crate::swap::execute(
        env,
        &cfg.swap_executor,
        &ctx.source_market,
        asset,
        ctx.redeem_or_repay_amount,
        ctx.min_output,
    )?;

    let owed = amount.checked_add(fee).ok_or(RouterError::Overflow)?;
    if out < owed {
        return Err(RouterError::InsufficientRepayment);
    }
    approve_repayment(env, asset, &cfg.lending_core, owed);

    events::emit_position_exited(
        env,
        ctx.kind,
        ctx.initiator.clone(),
        ctx.source_market.clone(),
        asset.clone(),
        ctx.redeem_or_repay_amount,
        applied,
    );
    Ok(owed)
}

pub(crate) fn handle_exit_single(
    env: &Env,
    cfg: &RouterConfig,
    ctx: &OperationContext,
    asset: &Address,
    amount: i128,
    fee: i128,
) -> Result<i128, RouterError> {
    let me = env.current_contract_address();
    let core = CoreClient::new(cfg.lending_core.clone());

    let debt = core.borrow_balance(env, &ctx.initiator, asset);
    let to_repay = amount.min(debt);
    let applied = if to_repay > 0 {
        token::Client::new(env, asset).transfer(&me, &cfg.lending_core, &to_repay);
        core.repay_behalf(env, &ctx.initiator, asset, to_repay)?
    } else {
        0
    };

    let owed = amount.checked_add(fee).ok_or(RouterError::Overflow)?;
    // Flash funds not applied to debt still count toward repayment.
    let held = amount - to_repay;
    let need = owed - held;
    let supplied = core.supplied_balance(env, &ctx.initiator, asset);
    let to_redeem = need.min(supplied);
    if to_redeem > 0 {
        core.redeem_behalf(env, &ctx.initiator, &me, asset, to_redeem)?;
    }
    ensure_repayable(env, asset, owed)?;
    approve_repayment(env, asset, &cfg.lending_core, owed);

    events::emit_position_exited(
        env,
        ctx.kind,
        ctx.initiator.clone(),
        asset.clone(),
        asset.clone(),
        to_redeem,
        applied,
    );
    Ok(owed)
}
