use soroban_sdk::{contracttype, Address, Env};

use crate::errors::RouterError;

/// Storage keys for router configuration
#[contracttype]
#[derive(Clone)]
pub enum ConfigKey {
    Config,
    Paused,
}

/// Addresses the router is wired to. Written once by `initialize`;
/// the swap executor and fee sink are admin-replaceable.
#[contracttype]
#[derive(Clone, Debug)]
pub struct RouterConfig {
    pub admin: Address,
    pub lending_core: Address,
    pub swap_executor: Address,
    /// Token address of the chain-native asset's market
    pub native_asset: Address,
    /// Token address of the wrapped representation's market
    pub wrapped_native: Address,
    /// Contract performing 1:1 wrap/unwrap between the two
    pub native_wrapper: Address,
    /// Recipient of residual dust from position-swap operations
    pub fee_sink: Address,
}

pub fn initialize(env: &Env, cfg: RouterConfig) -> Result<(), RouterError> {
    if env.storage().instance().has(&ConfigKey::Config) {
        return Err(RouterError::AlreadyInitialized);
    }
    cfg.admin.require_auth();
    env.storage().instance().set(&ConfigKey::Config, &cfg);
    Ok(())
}

pub fn load(env: &Env) -> Result<RouterConfig, RouterError> {
    env.storage()
        .instance()
        .get(&ConfigKey::Config)
        .ok_or(RouterError::NotInitialized)
}

fn require_admin(env: &Env) -> Result<RouterConfig, RouterError> {
    let cfg = load(env)?;
    cfg.admin.require_auth();
    Ok(cfg)
}

pub fn set_paused(env: &Env, paused: bool) -> Result<(), RouterError> {
    require_admin(env)?;
    env.storage().instance().set(&ConfigKey::Paused, &paused);
    Ok(())
}

pub fn is_paused(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&ConfigKey::Paused)
        .unwrap_or(false)
}

pub fn set_swap_executor(env: &Env, executor: Address) -> Result<(), RouterError> {
    let mut cfg = require_admin(env)?;
    cfg.swap_executor = executor;
    env.storage().instance().set(&ConfigKey::Config, &cfg);
    Ok(())
}

pub fn set_fee_sink(env: &Env, sink: Address) -> Result<(), RouterError> {
    let mut cfg = require_admin(env)?;
    cfg.fee_sink = sink;
    env.storage().instance().set(&ConfigKey::Config, &cfg);
    Ok(())
}
