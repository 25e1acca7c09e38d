//! # LoopLend Lending Core
//!
//! A minimal multi-market lending core exposing the surface a position
//! manager needs: market registration and membership, delegate approvals,
//! supply/borrow/redeem/repay performed on behalf of a beneficiary, an
//! account liquidity (solvency) query, and single-asset flash loans with a
//! synchronous callback.
//!
//! Markets are identified by the address of their underlying token.
//! Prices and collateral factors are admin-set; there is no interest
//! accrual or liquidation machinery here.

#![no_std]
use soroban_sdk::{contract, contractimpl, Address, Bytes, Env, Vec};

mod events;
mod flash_loan;
mod liquidity;
mod market;
mod position;

pub use flash_loan::FlashError;
pub use liquidity::{AccountLiquidity, LiquidityError};
pub use market::{Market, MarketError, BPS_SCALE, PRICE_SCALE};
pub use position::PositionError;



#[cfg(test)]
mod market_test;


#[contract]
pub struct LendingCore;

#[contractimpl]
impl LendingCore {
    /// Initialize the contract with an admin address
    pub fn initialize(env: Env, admin: Address) -> Result<(), MarketError> {
        market::initialize(&env, admin)
    }

    /// Register a new market (admin only)
    ///
    /// # Arguments
    /// * `asset` - Underlying token address, which also identifies the market
    /// * `collateral_factor_bps` - Collateral weight in basis points (0..=10000)
    /// * `price` - Reference price scaled by 1e7
    pub fn register_market(
        env: Env,
        caller: Address,
        asset: Address,
        collateral_factor_bps: i128,
        price: i128,
    ) -> Result<(), MarketError> {
        market::register_market(&env, caller, asset, collateral_factor_bps, price)
    }

    /// Update a listed market's reference price (admin only)
    pub fn set_price(env: Env, caller: Address, asset: Address, price: i128) -> Result<(), MarketError> {
        market::set_price(&env, caller, asset, price)
    }

    /// Set the flash loan fee in basis points (admin only, max 1000)
    pub fn set_flash_loan_fee_bps(env: Env, caller: Address, fee_bps: i128) -> Result<(), FlashError> {
        flash_loan::set_fee_bps(&env, caller, fee_bps)
    }

    /// Get the current flash loan fee in basis points
    pub fn flash_loan_fee_bps(env: Env) -> i128 {
        flash_loan::fee_bps(&env)
    }

    pub fn is_market_listed(env: Env, asset: Address) -> bool {
        market::is_listed(&env, &asset)
    }

    pub fn is_member(env: Env, user: Address, asset: Address) -> bool {
        market::is_member(&env, &user, &asset)
    }

    /// Add `user` to a market's membership set so their supplied balance
    /// counts toward solvency. Caller must be the user or an approved
    /// delegate. Idempotent.
    pub fn join_market(env: Env, caller: Address, user: Address, asset: Address) -> Result<(), MarketError> {
        market::join_market(&env, caller, user, asset)
    }

    /// Approve or revoke `operator` as a delegate for `owner`
    pub fn approve_delegate(env: Env, owner: Address, operator: Address, approved: bool) {
        market::approve_delegate(&env, owner, operator, approved)
    }

    pub fn is_delegate(env: Env, owner: Address, operator: Address) -> bool {
        market::is_delegate(&env, &owner, &operator)
    }

    /// Credit supplied collateral to `beneficiary`.
    ///
    /// Pay-then-call: transfer the tokens to this contract first, then
    /// invoke. Fails with `FundsNotReceived` if the declared amount never
    /// arrived.
    ///
    /// # Returns
    /// The beneficiary's new supplied balance
    pub fn supply_behalf(
        env: Env,
        caller: Address,
        beneficiary: Address,
        asset: Address,
        amount: i128,
    ) -> Result<i128, PositionError> {
        position::supply_behalf(&env, caller, beneficiary, asset, amount)
    }

    /// Open a borrow on `beneficiary`'s position, paying `recipient`.
    ///
    /// Rejected with `InsufficientCollateral` if the borrow would leave the
    /// beneficiary with a nonzero shortfall.
    ///
    /// # Returns
    /// The beneficiary's new debt balance
    pub fn borrow_behalf(
        env: Env,
        caller: Address,
        beneficiary: Address,
        recipient: Address,
        asset: Address,
        amount: i128,
    ) -> Result<i128, PositionError> {
        position::borrow_behalf(&env, caller, beneficiary, recipient, asset, amount)
    }

    /// Redeem supplied collateral from `beneficiary` to `recipient`.
    ///
    /// Checks the supplied balance only; post-redeem solvency is the
    /// calling position manager's responsibility.
    ///
    /// # Returns
    /// The beneficiary's new supplied balance
    pub fn redeem_behalf(
        env: Env,
        caller: Address,
        beneficiary: Address,
        recipient: Address,
        asset: Address,
        amount: i128,
    ) -> Result<i128, PositionError> {
        position::redeem_behalf(&env, caller, beneficiary, recipient, asset, amount)
    }

    /// Reduce `beneficiary`'s debt with funds already transferred in.
    /// Capped at the outstanding debt.
    ///
    /// # Returns
    /// The amount actually applied
    pub fn repay_behalf(
        env: Env,
        caller: Address,
        beneficiary: Address,
        asset: Address,
        amount: i128,
    ) -> Result<i128, PositionError> {
        position::repay_behalf(&env, caller, beneficiary, asset, amount)
    }

    pub fn supplied_balance(env: Env, user: Address, asset: Address) -> i128 {
        position::supplied_balance(&env, &user, &asset)
    }

    pub fn borrow_balance(env: Env, user: Address, asset: Address) -> i128 {
        position::borrow_balance(&env, &user, &asset)
    }

    /// Compute `user`'s current liquidity and shortfall at stored prices
    pub fn account_liquidity(env: Env, user: Address) -> Result<AccountLiquidity, LiquidityError> {
        liquidity::account_liquidity(&env, &user)
    }

    /// Issue a single-asset flash loan to `initiator` and synchronously
    /// invoke `on_flash_loan` on it, then collect the repayment the
    /// callback approved. Exactly one asset/amount pair per request.
    pub fn flash_loan(
        env: Env,
        initiator: Address,
        beneficiary: Address,
        assets: Vec<Address>,
        amounts: Vec<i128>,
        data: Bytes,
    ) -> Result<(), FlashError> {
        flash_loan::flash_loan(&env, initiator, beneficiary, assets, amounts, data)
    }
}
