//! Position-swap operations: move a collateral or debt leg from one
//! market to another, including the native/wrapped special case where the
//! two assets are equivalent and the general swap step is skipped in
//! favor of a 1:1 wrap or unwrap.
//!
//! Collateral swaps size the flash loan so that redeeming the requested
//! amount from the source market always covers principal plus fee:
//! `flash = redeem * 10000 / (10000 + fee_bps)`. Residual dust from these
//! operations has no natural return path and goes to the fee sink.

use soroban_sdk::{token, vec, Address, Env};

use crate::config::RouterConfig;
use crate::context::{OperationContext, OperationKind};
use crate::dispatch::{approve_repayment, ensure_repayable, run_operation};
use crate::errors::RouterError;
use crate::events;
use crate::guards;
use crate::lending::CoreClient;

/// Flash amount whose principal plus fee never exceeds `redeem_amount`.
fn flash_for_redeem(env: &Env, core: &CoreClient, redeem_amount: i128) -> Result<i128, RouterError> {
    let fee_bps = core.flash_loan_fee_bps(env);
    let flash = redeem_amount
        .checked_mul(10_000)
        .ok_or(RouterError::Overflow)?
        .checked_div(10_000 + fee_bps)
        .ok_or(RouterError::Overflow)?;
    if flash <= 0 {
        return Err(RouterError::InvalidAmount);
    }
    Ok(flash)
}

fn swap_collateral(
    env: &Env,
    cfg: RouterConfig,
    core: CoreClient,
    initiator: Address,
    source_asset: Address,
    target_asset: Address,
    redeem_amount: i128,
    min_target_out: i128,
) -> Result<(), RouterError> {
    guards::require_positive(redeem_amount)?;
    if min_target_out < 0 {
        return Err(RouterError::InvalidAmount);
    }
    guards::require_listed(env, &core, &source_asset)?;
    guards::require_listed(env, &core, &target_asset)?;
    guards::ensure_membership(env, &core, &initiator, &target_asset)?;
    guards::require_solvent(env, &core, &initiator)?;

    let flash_amount = flash_for_redeem(env, &core, redeem_amount)?;
    let legs = vec![env, source_asset.clone(), target_asset.clone()];
    let ctx = OperationContext {
        kind: OperationKind::SwapCollateral,
        initiator,
        source_market: source_asset.clone(),
        target_market: target_asset,
        seed_amount: 0,
        redeem_or_repay_amount: redeem_amount,
        min_output: min_target_out,
    };
    run_operation(
        env,
        &core,
        ctx,
        &source_asset,
        flash_amount,
        legs,
        &cfg.fee_sink,
    )
}

/// Migrate the initiator's entire supplied balance from `source_asset`'s
/// market to `target_asset`'s market.
pub fn swap_full_collateral(
    env: &Env,
    caller: Address,
    initiator: Address,
    source_asset: Address,
    target_asset: Address,
    min_target_out: i128,
) -> Result<(), RouterError> {
    let cfg = guards::check_entry(env, &caller, &initiator)?;
    let core = CoreClient::new(cfg.lending_core.clone());
    let redeem_amount = core.supplied_balance(env, &initiator, &source_asset);
    swap_collateral(
        env,
        cfg,
        core,
        initiator,
        source_asset,
        target_asset,
        redeem_amount,
        min_target_out,
    )
}

/// Migrate part of the initiator's supplied balance between markets.
pub fn swap_partial_collateral(
    env: &Env,
    caller: Address,
    initiator: Address,
    source_asset: Address,
    target_asset: Address,
    redeem_amount: i128,
    min_target_out: i128,
) -> Result<(), RouterError> {
    let cfg = guards::check_entry(env, &caller, &initiator)?;
    let core = CoreClient::new(cfg.lending_core.clone());
    swap_collateral(
        env,
        cfg,
        core,
        initiator,
        source_asset,
        target_asset,
        redeem_amount,
        min_target_out,
    )
}

fn swap_debt(
    env: &Env,
    cfg: RouterConfig,
    core: CoreClient,
    initiator: Address,
    source_asset: Address,
    target_asset: Address,
    flash_amount: i128,
    repay_cap: i128,
    min_source_out: i128,
) -> Result<(), RouterError> {
    guards::require_positive(flash_amount)?;
    guards::require_positive(repay_cap)?;
    if min_source_out < 0 {
        return Err(RouterError::InvalidAmount);
    }
    guards::require_listed(env, &core, &source_asset)?;
    guards::require_listed(env, &core, &target_asset)?;
    guards::ensure_membership(env, &core, &initiator, &target_asset)?;
    guards::require_solvent(env, &core, &initiator)?;

    let legs = vec![env, source_asset.clone(), target_asset.clone()];
    let ctx = OperationContext {
        kind: OperationKind::SwapDebt,
        initiator,
        source_market: source_asset,
        target_market: target_asset.clone(),
        seed_amount: 0,
        redeem_or_repay_amount: repay_cap,
        min_output: min_source_out,
    };
    run_operation(
        env,
        &core,
        ctx,
        &target_asset,
        flash_amount,
        legs,
        &cfg.fee_sink,
    )
}

/// Move the initiator's entire debt in `source_asset`'s market into a new
/// borrow in `target_asset`'s market. `flash_amount` is the caller's
/// estimate of the target-asset value of that debt.
pub fn swap_full_debt(
    env: &Env,
    caller: Address,
    initiator: Address,
    source_asset: Address,
    target_asset: Address,
    flash_amount: i128,
    min_source_out: i128,
) -> Result<(), RouterError> {
    let cfg = guards::check_entry(env, &caller, &initiator)?;
    let core = CoreClient::new(cfg.lending_core.clone());
    let repay_cap = core.borrow_balance(env, &initiator, &source_asset);
    swap_debt(
        env,
        cfg,
        core,
        initiator,
        source_asset,
        target_asset,
        flash_amount,
        repay_cap,
        min_source_out,
    )
}

/// Move part of the initiator's debt between markets, retiring at most
/// `repay_amount` in the source market.
pub fn swap_partial_debt(
    env: &Env,
    caller: Address,
    initiator: Address,
    source_asset: Address,
    target_asset: Address,
    flash_amount: i128,
    repay_amount: i128,
    min_source_out: i128,
) -> Result<(), RouterError> {
    let cfg = guards::check_entry(env, &caller, &initiator)?;
    let core = CoreClient::new(cfg.lending_core.clone());
    swap_debt(
        env,
        cfg,
        core,
        initiator,
        source_asset,
        target_asset,
        flash_amount,
        repay_amount,
        min_source_out,
    )
}

/// Migrate native-asset collateral into the wrapped market. The wrapper
/// converts 1:1, so there is no slippage parameter.
pub fn migrate_native_collateral_to_wrapped(
    env: &Env,
    caller: Address,
    initiator: Address,
    redeem_amount: i128,
) -> Result<(), RouterError> {
    let cfg = guards::check_entry(env, &caller, &initiator)?;
    guards::require_positive(redeem_amount)?;
    let core = CoreClient::new(cfg.lending_core.clone());
    guards::require_listed(env, &core, &cfg.native_asset)?;
    guards::require_listed(env, &core, &cfg.wrapped_native)?;
    guards::ensure_membership(env, &core, &initiator, &cfg.wrapped_native)?;
    guards::require_solvent(env, &core, &initiator)?;

    let flash_amount = flash_for_redeem(env, &core, redeem_amount)?;
    let legs = vec![env, cfg.native_asset.clone(), cfg.wrapped_native.clone()];
    let ctx = OperationContext {
        kind: OperationKind::SwapCollateralNativeToWrapped,
        initiator,
        source_market: cfg.native_asset.clone(),
        target_market: cfg.wrapped_native.clone(),
        seed_amount: 0,
        redeem_or_repay_amount: redeem_amount,
        min_output: 0,
    };
    run_operation(
        env,
        &core,
        ctx,
        &cfg.native_asset,
        flash_amount,
        legs,
        &cfg.fee_sink,
    )
}

/// Migrate native-asset debt into the wrapped market: flash the wrapped
/// asset, unwrap, retire the native debt, borrow wrapped to settle.
pub fn migrate_native_debt_to_wrapped(
    env: &Env,
    caller: Address,
    initiator: Address,
    amount: i128,
) -> Result<(), RouterError> {
    let cfg = guards::check_entry(env, &caller, &initiator)?;
    guards::require_positive(amount)?;
    let core = CoreClient::new(cfg.lending_core.clone());
    guards::require_listed(env, &core, &cfg.native_asset)?;
    guards::require_listed(env, &core, &cfg.wrapped_native)?;
    guards::ensure_membership(env, &core, &initiator, &cfg.wrapped_native)?;
    guards::require_solvent(env, &core, &initiator)?;

    let repay_cap = core.borrow_balance(env, &initiator, &cfg.native_asset);
    if repay_cap <= 0 {
        return Err(RouterError::InvalidAmount);
    }
    let legs = vec![env, cfg.native_asset.clone(), cfg.wrapped_native.clone()];
    let ctx = OperationContext {
        kind: OperationKind::SwapDebtNativeToWrapped,
        initiator,
        source_market: cfg.native_asset.clone(),
        target_market: cfg.wrapped_native.clone(),
        seed_amount: 0,
        redeem_or_repay_amount: repay_cap,
        min_output: 0,
    };
    run_operation(
        env,
        &core,
        ctx,
        &cfg.wrapped_native,
        amount,
        legs,
        &cfg.fee_sink,
    )
}

pub(crate) fn handle_swap_collateral(
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
        &ctx.target_market,
        amount,
        ctx.min_output,
    )?;
    token::Client::new(env, &ctx.target_market).transfer(&me, &cfg.lending_core, &out);
    core.supply_behalf(env, &ctx.initiator, &ctx.target_market, out)?;

    core.redeem_behalf(
        env,
        &ctx.initiator,
        &me,
        asset,
        ctx.redeem_or_repay_amount,
    )?;
    let owed = amount.checked_add(fee).ok_or(RouterError::Overflow)?;
    ensure_repayable(env, asset, owed)?;
    approve_repayment(env, asset, &cfg.lending_core, owed);

    events::emit_position_migrated(
        env,
        ctx.kind,
        ctx.initiator.clone(),
        asset.clone(),
        ctx.target_market.clone(),
        ctx.redeem_or_repay_amount,
        out,
    );
    Ok(owed)
}

pub(crate) fn handle_swap_debt(
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
    let debt = core.borrow_balance(env, &ctx.initiator, &ctx.source_market);
    let to_repay = out.min(ctx.redeem_or_repay_amount).min(debt);
    let applied = if to_repay > 0 {
        token::Client::new(env, &ctx.source_market).transfer(&me, &cfg.lending_core, &to_repay);
        core.repay_behalf(env, &ctx.initiator, &ctx.source_market, to_repay)?
    } else {
        0
    };

    let owed = amount.checked_add(fee).ok_or(RouterError::Overflow)?;
    core.borrow_behalf(env, &ctx.initiator, &me, asset, owed)?;
    ensure_repayable(env, asset, owed)?;
    approve_repayment(env, asset, &cfg.lending_core, owed);

    events::emit_position_migrated(
        env,
        ctx.kind,
        ctx.initiator.clone(),
        ctx.source_market.clone(),
        asset.clone(),
        applied,
        owed,
    );
    Ok(owed)
}

pub(crate) fn handle_native_collateral(
    env: &Env,
    cfg: &RouterConfig,
    ctx: &OperationContext,
    asset: &Address,
    amount: i128,
    fee: i128,
) -> Result<i128, RouterError> {
    let me = env.current_contract_address();
    let core = CoreClient::new(cfg.lending_core.clone());

    let wrapped = crate::swap::wrap_native(
        env,
        &cfg.native_wrapper,
        &cfg.native_asset,
        &cfg.wrapped_native,
        amount,
    )?;
    token::Client::new(env, &cfg.wrapped_native).transfer(&me, &cfg.lending_core, &wrapped);
    core.supply_behalf(env, &ctx.initiator, &cfg.wrapped_native, wrapped)?;

    core.redeem_behalf(
        env,
        &ctx.initiator,
        &me,
        asset,
        ctx.redeem_or_repay_amount,
    )?;
    let owed = amount.checked_add(fee).ok_or(RouterError::Overflow)?;
    ensure_repayable(env, asset, owed)?;
    approve_repayment(env, asset, &cfg.lending_core, owed);

    events::emit_position_migrated(
        env,
        ctx.kind,
        ctx.initiator.clone(),
        asset.clone(),
        cfg.wrapped_native.clone(),
        ctx.redeem_or_repay_amount,
        wrapped,
    );
    Ok(owed)
}

pub(crate) fn handle_native_debt(
    env: &Env,
    cfg: &RouterConfig,
    ctx: &OperationContext,
    asset: &Address,
    amount: i128,
    fee: i128,
) -> Result<i128, RouterError> {
    let me = env.current_contract_address();
    let core = CoreClient::new(cfg.lending_core.clone());

    let unwrapped = crate::swap::unwrap_native(
        env,
        &cfg.native_wrapper,
        &cfg.wrapped_native,
        &cfg.native_asset,
        amount,
    )?;
    let debt = core.borrow_balance(env, &ctx.initiator, &cfg.native_asset);
    let to_repay = unwrapped.min(ctx.redeem_or_repay_amount).min(debt);
    let applied = if to_repay > 0 {
        token::Client::new(env, &cfg.native_asset).transfer(&me, &cfg.lending_core, &to_repay);
        core.repay_behalf(env, &ctx.initiator, &cfg.native_asset, to_repay)?
    } else {
        0
    };

    let owed = amount.checked_add(fee).ok_or(RouterError::Overflow)?;
    core.borrow_behalf(env, &ctx.initiator, &me, asset, owed)?;
    ensure_repayable(env, asset, owed)?;
    approve_repayment(env, asset, &cfg.lending_core, owed);

    events::emit_position_migrated(
        env,
        ctx.kind,
        ctx.initiator.clone(),
        cfg.native_asset.clone(),
        asset.clone(),
        applied,
        owed,
    );
    Ok(owed)
}
