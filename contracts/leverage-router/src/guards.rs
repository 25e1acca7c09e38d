use soroban_sdk::{Address, Env};

use crate::config::{self, RouterConfig};
use crate::context;
use crate::errors::RouterError;
use crate::lending::CoreClient;
use crate::swap;

/// Shared preconditions for every user entry point: the router is
/// configured and unpaused, no operation is already in flight, and the
/// caller is entitled to act on the position.
///
/// The in-flight check covers both phases of an operation: the armed
/// context before the callback consumes it, and the swap latch while an
/// external executor or wrapper call is outstanding. Without the latter,
/// a hostile executor could reenter an entry point mid-swap.
pub fn check_entry(
    env: &Env,
    caller: &Address,
    position_owner: &Address,
) -> Result<RouterConfig, RouterError> {
    let cfg = config::load(env)?;
    if config::is_paused(env) {
        return Err(RouterError::Paused);
    }
    if !context::is_idle(env) || swap::is_busy(env) {
        return Err(RouterError::ReentrantCall);
    }
    caller.require_auth();
    if caller != position_owner {
        let core = CoreClient::new(cfg.lending_core.clone());
        if !core.is_delegate(env, position_owner, caller) {
            return Err(RouterError::Unauthorized);
        }
    }
    Ok(cfg)
}

pub fn require_positive(amount: i128) -> Result<(), RouterError> {
    if amount <= 0 {
        return Err(RouterError::InvalidAmount);
    }
    Ok(())
}

pub fn require_listed(env: &Env, core: &CoreClient, asset: &Address) -> Result<(), RouterError> {
    if !core.is_listed(env, asset) {
        return Err(RouterError::MarketNotListed);
    }
    Ok(())
}

/// Enroll `user` in a market's membership set if not already in it, so
/// collateral placed there counts toward solvency.
pub fn ensure_membership(
    env: &Env,
    core: &CoreClient,
    user: &Address,
    asset: &Address,
) -> Result<(), RouterError> {
    if !core.is_member(env, user, asset) {
        core.join_market(env, user, asset)?;
    }
    Ok(())
}

/// Fail with `SolvencyShortfall` unless the user's position carries no
/// shortfall at current prices.
pub fn require_solvent(env: &Env, core: &CoreClient, user: &Address) -> Result<(), RouterError> {
    let snapshot = core.account_liquidity(env, user)?;
    if snapshot.shortfall > 0 {
        return Err(RouterError::SolvencyShortfall);
    }
    Ok(())
}
