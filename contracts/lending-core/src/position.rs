use soroban_sdk::{contracterror, contracttype, token, Address, Env};

use crate::events::{
    emit_borrowed_behalf, emit_redeemed_behalf, emit_repaid_behalf, emit_supplied_behalf,
};
use crate::liquidity;
use crate::market;

/// Errors that can occur while mutating positions on behalf of a beneficiary
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum PositionError {
    InvalidAmount = 1,
    Unauthorized = 2,
    MarketNotListed = 3,
    InsufficientBalance = 4,
    InsufficientLiquidity = 5,
    /// Pay-then-call check failed: the declared amount never arrived
    FundsNotReceived = 6,
    InsufficientCollateral = 7,
    Overflow = 8,
}

/// Storage keys for position bookkeeping
#[contracttype]
#[derive(Clone)]
pub enum PositionDataKey {
    /// Supplied balance: (user, asset)
    Supply(Address, Address),
    /// Borrowed balance: (user, asset)
    Debt(Address, Address),
    /// Internal receipts counter per asset, for pay-then-call checks
    Cash(Address),
}

pub fn supplied_balance(env: &Env, user: &Address, asset: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&PositionDataKey::Supply(user.clone(), asset.clone()))
        .unwrap_or(0)
}

pub fn borrow_balance(env: &Env, user: &Address, asset: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&PositionDataKey::Debt(user.clone(), asset.clone()))
        .unwrap_or(0)
}

fn set_supply(env: &Env, user: &Address, asset: &Address, amount: i128) {
    env.storage()
        .persistent()
        .set(&PositionDataKey::Supply(user.clone(), asset.clone()), &amount);
}

fn set_debt(env: &Env, user: &Address, asset: &Address, amount: i128) {
    env.storage()
        .persistent()
        .set(&PositionDataKey::Debt(user.clone(), asset.clone()), &amount);
}

pub fn cash(env: &Env, asset: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&PositionDataKey::Cash(asset.clone()))
        .unwrap_or(0)
}

pub fn set_cash(env: &Env, asset: &Address, amount: i128) {
    env.storage()
        .persistent()
        .set(&PositionDataKey::Cash(asset.clone()), &amount);
}

/// Require that `caller` is the beneficiary or an approved delegate.
///
/// Every behalf mutator takes the acting caller separately from the account
/// whose position changes; caller-equals-beneficiary is never assumed.
fn require_operator(env: &Env, caller: &Address, beneficiary: &Address) -> Result<(), PositionError> {
    caller.require_auth();
    if caller != beneficiary && !market::is_delegate(env, beneficiary, caller) {
        return Err(PositionError::Unauthorized);
    }
    Ok(())
}

fn require_listed(env: &Env, asset: &Address) -> Result<(), PositionError> {
    if !market::is_listed(env, asset) {
        return Err(PositionError::MarketNotListed);
    }
    Ok(())
}

/// Credit a supply to `beneficiary`'s position.
///
/// Pay-then-call: the caller must transfer the tokens to this contract
/// before invoking. The credit is granted only if the contract's token
/// balance exceeds the internal receipts counter by at least `amount`.
pub fn supply_behalf(
    env: &Env,
    caller: Address,
    beneficiary: Address,
    asset: Address,
    amount: i128,
) -> Result<i128, PositionError> {
    if amount <= 0 {
        return Err(PositionError::InvalidAmount);
    }
    require_listed(env, &asset)?;
    require_operator(env, &caller, &beneficiary)?;

    receive_funds(env, &asset, amount)?;

    let new_balance = supplied_balance(env, &beneficiary, &asset)
        .checked_add(amount)
        .ok_or(PositionError::Overflow)?;
    set_supply(env, &beneficiary, &asset, new_balance);
    emit_supplied_behalf(env, caller, beneficiary, asset, amount, new_balance);
    Ok(new_balance)
}

/// Open a borrow on `beneficiary`'s position and pay the funds to `recipient`.
///
/// The borrow is rejected if it would leave the beneficiary with a nonzero
/// shortfall at current prices.
pub fn borrow_behalf(
    env: &Env,
    caller: Address,
    beneficiary: Address,
    recipient: Address,
    asset: Address,
    amount: i128,
) -> Result<i128, PositionError> {
    if amount <= 0 {
        return Err(PositionError::InvalidAmount);
    }
    require_listed(env, &asset)?;
    require_operator(env, &caller, &beneficiary)?;

    let liq = liquidity::account_liquidity_adjusted(env, &beneficiary, Some((&asset, amount)))
        .map_err(|_| PositionError::Overflow)?;
    if liq.shortfall > 0 {
        return Err(PositionError::InsufficientCollateral);
    }

    let token_client = token::Client::new(env, &asset);
    if token_client.balance(&env.current_contract_address()) < amount {
        return Err(PositionError::InsufficientLiquidity);
    }

    let new_debt = borrow_balance(env, &beneficiary, &asset)
        .checked_add(amount)
        .ok_or(PositionError::Overflow)?;
    set_debt(env, &beneficiary, &asset, new_debt);
    set_cash(env, &asset, cash(env, &asset) - amount);
    token_client.transfer(&env.current_contract_address(), &recipient, &amount);
    emit_borrowed_behalf(env, caller, beneficiary, asset, amount, new_debt);
    Ok(new_debt)
}

/// Redeem supplied collateral from `beneficiary`'s position to `recipient`.
///
/// Only the supplied balance is checked here; whether the redemption leaves
/// the account solvent is the calling position manager's responsibility.
pub fn redeem_behalf(
    env: &Env,
    caller: Address,
    beneficiary: Address,
    recipient: Address,
    asset: Address,
    amount: i128,
) -> Result<i128, PositionError> {
    if amount <= 0 {
        return Err(PositionError::InvalidAmount);
    }
    require_listed(env, &asset)?;
    require_operator(env, &caller, &beneficiary)?;

    let supplied = supplied_balance(env, &beneficiary, &asset);
    if supplied < amount {
        return Err(PositionError::InsufficientBalance);
    }
    let token_client = token::Client::new(env, &asset);
    if token_client.balance(&env.current_contract_address()) < amount {
        return Err(PositionError::InsufficientLiquidity);
    }

    let new_balance = supplied - amount;
    set_supply(env, &beneficiary, &asset, new_balance);
    set_cash(env, &asset, cash(env, &asset) - amount);
    token_client.transfer(&env.current_contract_address(), &recipient, &amount);
    emit_redeemed_behalf(env, caller, beneficiary, asset, amount, new_balance);
    Ok(new_balance)
}

/// Reduce `beneficiary`'s debt with funds already transferred in.
///
/// Pay-then-call like `supply_behalf`. Repayment is capped at the
/// outstanding debt; the amount actually applied is returned.
pub fn repay_behalf(
    env: &Env,
    caller: Address,
    beneficiary: Address,
    asset: Address,
    amount: i128,
) -> Result<i128, PositionError> {
    if amount <= 0 {
        return Err(PositionError::InvalidAmount);
    }
    require_listed(env, &asset)?;
    require_operator(env, &caller, &beneficiary)?;

    receive_funds(env, &asset, amount)?;

    let debt = borrow_balance(env, &beneficiary, &asset);
    let applied = if amount > debt { debt } else { amount };
    set_debt(env, &beneficiary, &asset, debt - applied);
    emit_repaid_behalf(env, caller, beneficiary, asset, applied, debt - applied);
    Ok(applied)
}

/// Verify that `amount` of `asset` arrived since the last reconciliation
/// and fold it into the receipts counter.
fn receive_funds(env: &Env, asset: &Address, amount: i128) -> Result<(), PositionError> {
    let balance = token::Client::new(env, asset).balance(&env.current_contract_address());
    let received = balance
        .checked_sub(cash(env, asset))
        .ok_or(PositionError::Overflow)?;
    if received < amount {
        return Err(PositionError::FundsNotReceived);
    }
    set_cash(env, asset, cash(env, asset).checked_add(amount).ok_or(PositionError::Overflow)?);
    Ok(())
}
