use soroban_sdk::{contracterror, contracttype, Address, Env, Vec};

use crate::events::emit_market_registered;

/// Errors that can occur during market administration and membership
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum MarketError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    MarketNotListed = 4,
    MarketAlreadyListed = 5,
    InvalidParams = 6,
}

/// Storage keys for market registry data
#[contracttype]
#[derive(Clone)]
pub enum MarketDataKey {
    Admin,
    /// Market parameters for an underlying asset
    Market(Address),
    /// All registered underlying assets, in registration order
    MarketList,
    /// Membership flag: (user, asset)
    Member(Address, Address),
    /// Delegate approval: (owner, operator)
    Delegate(Address, Address),
}

/// A single lending market, identified by its underlying token address.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct Market {
    /// Collateral factor in basis points (10000 = 100%)
    pub collateral_factor_bps: i128,
    /// Reference price, scaled by PRICE_SCALE
    pub price: i128,
}

/// Scale for market reference prices (1e7 = one unit)
pub const PRICE_SCALE: i128 = 10_000_000;

/// Basis-point scale
pub const BPS_SCALE: i128 = 10_000;

/// Initialize the contract with an admin address
pub fn initialize(env: &Env, admin: Address) -> Result<(), MarketError> {
    if env.storage().instance().has(&MarketDataKey::Admin) {
        return Err(MarketError::AlreadyInitialized);
    }
    admin.require_auth();
    env.storage().instance().set(&MarketDataKey::Admin, &admin);
    Ok(())
}

/// Require that `caller` is the stored admin and has authorized the call
pub fn require_admin(env: &Env, caller: &Address) -> Result<(), MarketError> {
    caller.require_auth();
    let admin: Address = env
        .storage()
        .instance()
        .get(&MarketDataKey::Admin)
        .ok_or(MarketError::NotInitialized)?;
    if admin != *caller {
        return Err(MarketError::Unauthorized);
    }
    Ok(())
}

/// Register a new market for `asset` (admin only)
///
/// # Arguments
/// * `collateral_factor_bps` - Fraction of supplied value usable as
///   collateral, in basis points (0..=10000)
/// * `price` - Reference price scaled by PRICE_SCALE
pub fn register_market(
    env: &Env,
    caller: Address,
    asset: Address,
    collateral_factor_bps: i128,
    price: i128,
) -> Result<(), MarketError> {
    require_admin(env, &caller)?;
    if !(0..=BPS_SCALE).contains(&collateral_factor_bps) || price <= 0 {
        return Err(MarketError::InvalidParams);
    }
    let key = MarketDataKey::Market(asset.clone());
    if env.storage().persistent().has(&key) {
        return Err(MarketError::MarketAlreadyListed);
    }
    env.storage().persistent().set(
        &key,
        &Market {
            collateral_factor_bps,
            price,
        },
    );
    let mut list = market_list(env);
    list.push_back(asset.clone());
    env.storage()
        .persistent()
        .set(&MarketDataKey::MarketList, &list);
    emit_market_registered(env, asset, collateral_factor_bps, price);
    Ok(())
}

/// Update the reference price of a listed market (admin only)
pub fn set_price(env: &Env, caller: Address, asset: Address, price: i128) -> Result<(), MarketError> {
    require_admin(env, &caller)?;
    if price <= 0 {
        return Err(MarketError::InvalidParams);
    }
    let mut market = get_market(env, &asset)?;
    market.price = price;
    env.storage()
        .persistent()
        .set(&MarketDataKey::Market(asset), &market);
    Ok(())
}

pub fn get_market(env: &Env, asset: &Address) -> Result<Market, MarketError> {
    env.storage()
        .persistent()
        .get(&MarketDataKey::Market(asset.clone()))
        .ok_or(MarketError::MarketNotListed)
}

pub fn is_listed(env: &Env, asset: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&MarketDataKey::Market(asset.clone()))
}

pub fn market_list(env: &Env) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(&MarketDataKey::MarketList)
        .unwrap_or_else(|| Vec::new(env))
}

pub fn is_member(env: &Env, user: &Address, asset: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&MarketDataKey::Member(user.clone(), asset.clone()))
        .unwrap_or(false)
}

/// Add `user` to the membership set of a listed market.
///
/// Idempotent. The caller must be the user themselves or an operator the
/// user has approved via `approve_delegate`, so that a position manager can
/// establish membership before supplying on the user's behalf.
pub fn join_market(
    env: &Env,
    caller: Address,
    user: Address,
    asset: Address,
) -> Result<(), MarketError> {
    caller.require_auth();
    if caller != user && !is_delegate(env, &user, &caller) {
        return Err(MarketError::Unauthorized);
    }
    if !is_listed(env, &asset) {
        return Err(MarketError::MarketNotListed);
    }
    env.storage()
        .persistent()
        .set(&MarketDataKey::Member(user, asset), &true);
    Ok(())
}

/// Approve or revoke `operator` as a delegate able to act on behalf of `owner`
pub fn approve_delegate(env: &Env, owner: Address, operator: Address, approved: bool) {
    owner.require_auth();
    let key = MarketDataKey::Delegate(owner, operator);
    if approved {
        env.storage().persistent().set(&key, &true);
    } else {
        env.storage().persistent().remove(&key);
    }
}

pub fn is_delegate(env: &Env, owner: &Address, operator: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&MarketDataKey::Delegate(owner.clone(), operator.clone()))
        .unwrap_or(false)
}
