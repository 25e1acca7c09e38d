//! Leverage-entry operations.
//!
//! All three variants end with a larger supplied position than the
//! initiator funded directly. Cross-asset variants flash-borrow the debt
//! asset, convert it into collateral, supply, and finance the repayment
//! with a fresh borrow of principal plus fee. The single-asset variant
//! supplies the principal straight back into the core, so only the fee is
//! ever borrowed and repaid.

use soroban_sdk::{token, vec, Address, Env};

use crate::config::RouterConfig;
use crate::context::{OperationContext, OperationKind};
use crate::dispatch::{approve_repayment, ensure_repayable, run_operation};
use crate::errors::RouterError;
use crate::events;
use crate::guards;
use crate::lending::CoreClient;

/// Lever up with a seed already denominated in the collateral asset.
pub fn enter_with_collateral_seed(
    env: &Env,
    caller: Address,
    initiator: Address,
    collateral_asset: Address,
    debt_asset: Address,
    seed_amount: i128,
    flash_amount: i128,
    min_collateral_out: i128,
) -> Result<(), RouterError> {
    let cfg = guards::check_entry(env, &caller, &initiator)?;
    guards::require_positive(flash_amount)?;
    if seed_amount < 0 || min_collateral_out < 0 {
        return Err(RouterError::InvalidAmount);
    }
    let core = CoreClient::new(cfg.lending_core.clone());
    guards::require_listed(env, &core, &collateral_asset)?;
    guards::require_listed(env, &core, &debt_asset)?;
    guards::ensure_membership(env, &core, &initiator, &collateral_asset)?;
    guards::require_solvent(env, &core, &initiator)?;

    if seed_amount > 0 {
        let me = env.current_contract_address();
        token::Client::new(env, &collateral_asset).transfer(&caller, &me, &seed_amount);
    }

    let legs = vec![env, collateral_asset.clone(), debt_asset.clone()];
    let ctx = OperationContext {
        kind: OperationKind::EnterWithCollateralSeed,
        initiator: initiator.clone(),
        source_market: collateral_asset,
        target_market: debt_asset.clone(),
        seed_amount,
        redeem_or_repay_amount: 0,
        min_output: min_collateral_out,
    };
    run_operation(env, &core, ctx, &debt_asset, flash_amount, legs, &initiator)
}

/// Lever up with a seed denominated in the to-be-borrowed asset. Seed and
/// principal are swapped into collateral together.
pub fn enter_with_borrowed_seed(
    env: &Env,
    caller: Address,
    initiator: Address,
    collateral_asset: Address,
    debt_asset: Address,
    seed_amount: i128,
    flash_amount: i128,
    min_collateral_out: i128,
) -> Result<(), RouterError> {
    let cfg = guards::check_entry(env, &caller, &initiator)?;
    guards::require_positive(flash_amount)?;
    if seed_amount < 0 || min_collateral_out < 0 {
        return Err(RouterError::InvalidAmount);
    }
    let core = CoreClient::new(cfg.lending_core.clone());
    guards::require_listed(env, &core, &collateral_asset)?;
    guards::require_listed(env, &core, &debt_asset)?;
    guards::ensure_membership(env, &core, &initiator, &collateral_asset)?;
    guards::require_solvent(env, &core, &initiator)?;

    if seed_amount > 0 {
        let me = env.current_contract_address();
        token::Client::new(env, &debt_asset).transfer(&caller, &me, &seed_amount);
    }

    let legs = vec![env, collateral_asset.clone(), debt_asset.clone()];
    let ctx = OperationContext {
        kind: OperationKind::EnterWithBorrowedSeed,
        initiator: initiator.clone(),
        source_market: collateral_asset,
        target_market: debt_asset.clone(),
        seed_amount,
        redeem_or_repay_amount: 0,
        min_output: min_collateral_out,
    };
    run_operation(env, &core, ctx, &debt_asset, flash_amount, legs, &initiator)
}

/// Lever up within a single market. No swap is involved and the flash
/// principal itself becomes supplied collateral.
pub fn enter_single_asset(
    env: &Env,
    caller: Address,
    initiator: Address,
    asset: Address,
    seed_amount: i128,
    flash_amount: i128,
) -> Result<(), RouterError> {
    let cfg = guards::check_entry(env, &caller, &initiator)?;
    guards::require_positive(flash_amount)?;
    if seed_amount < 0 {
        return Err(RouterError::InvalidAmount);
    }
    let core = CoreClient::new(cfg.lending_core.clone());
    guards::require_listed(env, &core, &asset)?;
    guards::ensure_membership(env, &core, &initiator, &asset)?;
    guards::require_solvent(env, &core, &initiator)?;

    if seed_amount > 0 {
        let me = env.current_contract_address();
        token::Client::new(env, &asset).transfer(&caller, &me, &seed_amount);
    }

    let legs = vec![env, asset.clone()];
    let ctx = OperationContext {
        kind: OperationKind::EnterSingleAsset,
        initiator: initiator.clone(),
        source_market: asset.clone(),
        target_market: asset.clone(),
        seed_amount,
        redeem_or_repay_amount: 0,
        min_output: 0,
    };
    run_operation(env, &core, ctx, &asset, flash_amount, legs, &initiator)
}

pub(crate) fn handle_collateral_seed(
    env: &Env,
    cfg: &RouterConfig,
    ctx: &OperationContext,
    asset: &Address,
    amount: i128,
    fee: i128,
) -> Result<i128, RouterError> {
    let me = env.current_contract_address();
    let core = CoreClient::new(cfg.lending_core.clone());

    let out = crate::swap::execute(
        env,
        &cfg.swap_executor,
        asset,
        &ctx.source_market,
        amount,
        ctx.min_output,
    )?;
    let total = out
        .checked_add(ctx.seed_amount)
        .ok_or(RouterError::Overflow)?;

    token::Client::new(env, &ctx.source_market).transfer(&me, &cfg.lending_core, &total);
    core.supply_behalf(env, &ctx.initiator, &ctx.source_market, total)?;

    let owed = amount.checked_add(fee).ok_or(RouterError::Overflow)?;
    core.borrow_behalf(env, &ctx.initiator, &me, asset, owed)?;
    ensure_repayable(env, asset, owed)?;
    approve_repayment(env, asset, &cfg.lending_core, owed);

    events::emit_position_entered(
        env,
        ctx.kind,
        ctx.initiator.clone(),
        ctx.source_market.clone(),
        asset.clone(),
        total,
        owed,
    );
    Ok(owed)
}

pub(crate) fn handle_borrowed_seed(
    env: &Env,
    cfg: &RouterConfig,
    ctx: &OperationContext,
    asset: &Address,
    amount: i128,
    fee: i128,
) -> Result<i128, RouterError> {
    let me = env.current_contract_address();
    let core = CoreClient::new(cfg.lending_core.clone());

    let swap_in = amount
        .checked_add(ctx.seed_amount)
        .ok_or(RouterError::Overflow)?;
    let out = crate::swap::execute(
        env,
        &cfg.swap_executor,
        asset,
        &ctx.source_market,
        swap_in,
        ctx.min_output,
    )?;

    token::Client::new(env, &ctx.source_market).transfer(&me, &cfg.lending_core, &out);
    core.supply_behalf(env, &ctx.initiator, &ctx.source_market, out)?;

    let owed = amount.checked_add(fee).ok_or(RouterError::Overflow)?;
    core.borrow_behalf(env, &ctx.initiator, &me, asset, owed)?;
    ensure_repayable(env, asset, owed)?;
    approve_repayment(env, asset, &cfg.lending_core, owed);

    events::emit_position_entered(
        env,
        ctx.kind,
        ctx.initiator.clone(),
        ctx.source_market.clone(),
        asset.clone(),
        out,
        owed,
    );
    Ok(owed)
}

pub(crate) fn handle_single_asset(
    env: &Env,
    cfg: &RouterConfig,
    ctx: &OperationContext,
    asset: &Address,
    amount: i128,
    fee: i128,
) -> Result<i128, RouterError> {
    let me = env.current_contract_address();
    let core = CoreClient::new(cfg.lending_core.clone());

    let total = amount
        .checked_add(ctx.seed_amount)
        .ok_or(RouterError::Overflow)?;
    token::Client::new(env, asset).transfer(&me, &cfg.lending_core, &total);
    core.supply_behalf(env, &ctx.initiator, asset, total)?;

    // The principal is supplied collateral now; only the fee is owed back.
    if fee > 0 {
        core.borrow_behalf(env, &ctx.initiator, &me, asset, fee)?;
        ensure_repayable(env, asset, fee)?;
        approve_repayment(env, asset, &cfg.lending_core, fee);
    }

    events::emit_position_entered(
        env,
        ctx.kind,
        ctx.initiator.clone(),
        asset.clone(),
        asset.clone(),
        total,
        fee,
    );
    Ok(fee)
}
