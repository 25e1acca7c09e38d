use soroban_sdk::{contracttype, token, Address, Env, IntoVal, Symbol};

use crate::errors::RouterError;

/// Reentrancy latch around external swap and wrapper calls. Cleared on
/// drop so an error path inside the guarded section cannot wedge it.
#[contracttype]
#[derive(Clone)]
enum SwapKey {
    Busy,
}

pub struct SwapGuard<'a> {
    env: &'a Env,
}

impl<'a> SwapGuard<'a> {
    pub fn enter(env: &'a Env) -> Result<Self, RouterError> {
        if env.storage().temporary().has(&SwapKey::Busy) {
            return Err(RouterError::ReentrantCall);
        }
        env.storage().temporary().set(&SwapKey::Busy, &true);
        Ok(SwapGuard { env })
    }
}

impl Drop for SwapGuard<'_> {
    fn drop(&mut self) {
        self.env.storage().temporary().remove(&SwapKey::Busy);
    }
}

/// True while an external swap or wrapper call is in progress.
pub fn is_busy(env: &Env) -> bool {
    env.storage().temporary().has(&SwapKey::Busy)
}

/// Swap `amount_in` of `asset_in` for `asset_out` through the configured
/// executor, measuring output by the router's balance delta rather than
/// trusting the executor's return value. Enforces `min_out` on the
/// measured delta.
pub fn execute(
    env: &Env,
    executor: &Address,
    asset_in: &Address,
    asset_out: &Address,
    amount_in: i128,
    min_out: i128,
) -> Result<i128, RouterError> {
    let _guard = SwapGuard::enter(env)?;
    let me = env.current_contract_address();

    let out_token = token::Client::new(env, asset_out);
    let before = out_token.balance(&me);

    // Fund the executor, then ask it to swap back to us.
    token::Client::new(env, asset_in).transfer(&me, executor, &amount_in);
    env.try_invoke_contract::<i128, soroban_sdk::Error>(
        executor,
        &Symbol::new(env, "swap"),
        (asset_in.clone(), asset_out.clone(), amount_in, me.clone()).into_val(env),
    )
    .map_err(|_| RouterError::SwapFailed)?
    .map_err(|_| RouterError::SwapFailed)?;

    let received = out_token
        .balance(&me)
        .checked_sub(before)
        .ok_or(RouterError::Overflow)?;
    if received < min_out {
        return Err(RouterError::SwapOutputBelowMinimum);
    }
    Ok(received)
}

/// Convert native tokens held by the router into the wrapped form at 1:1.
/// No slippage parameter: the wrapper's rate is fixed, so the only check
/// is that the full amount came back.
pub fn wrap_native(
    env: &Env,
    wrapper: &Address,
    native: &Address,
    wrapped: &Address,
    amount: i128,
) -> Result<i128, RouterError> {
    convert(env, wrapper, native, wrapped, amount, "wrap")
}

/// Convert wrapped tokens held by the router back into native at 1:1.
pub fn unwrap_native(
    env: &Env,
    wrapper: &Address,
    wrapped: &Address,
    native: &Address,
    amount: i128,
) -> Result<i128, RouterError> {
    convert(env, wrapper, wrapped, native, amount, "unwrap")
}

fn convert(
    env: &Env,
    wrapper: &Address,
    asset_in: &Address,
    asset_out: &Address,
    amount: i128,
    method: &str,
) -> Result<i128, RouterError> {
    let _guard = SwapGuard::enter(env)?;
    let me = env.current_contract_address();

    let out_token = token::Client::new(env, asset_out);
    let before = out_token.balance(&me);

    token::Client::new(env, asset_in).transfer(&me, wrapper, &amount);
    env.try_invoke_contract::<(), soroban_sdk::Error>(
        wrapper,
        &Symbol::new(env, method),
        (me.clone(), amount).into_val(env),
    )
    .map_err(|_| RouterError::SwapFailed)?
    .map_err(|_| RouterError::SwapFailed)?;

    let received = out_token
        .balance(&me)
        .checked_sub(before)
        .ok_or(RouterError::Overflow)?;
    if received < amount {
        return Err(RouterError::SwapFailed);
    }
    Ok(received)
}
