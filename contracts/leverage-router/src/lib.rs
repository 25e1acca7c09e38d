//! # LoopLend Leverage Router
//!
//! Flash-loan-driven position orchestration on top of the LoopLend
//! lending core. A single call levers a position up, unwinds it, or
//! migrates a collateral or debt leg between markets: the entry point
//! records an operation context, requests a single-asset flash loan from
//! the core, and the core's callback is dispatched through that context
//! to the matching handler. The whole chain commits or reverts as one
//! transaction.
//!
//! The router never holds positions of its own. Every supply, borrow,
//! redeem and repay is performed on behalf of the initiator, and any
//! token balance left in the router's custody after settlement is swept
//! out.

#![no_std]
use soroban_sdk::{contract, contractimpl, Address, Bytes, Env, Vec};

mod config;
mod context;
mod dispatch;
mod enter;
mod errors;
mod events;
mod exit;
mod guards;
mod lending;
mod migrate;
mod residual;
mod swap;

pub use config::RouterConfig;
pub use context::{OperationContext, OperationKind};
pub use errors::RouterError;

#[cfg(test)]
mod test_helpers;





#[cfg(test)]
mod migrate_test;

#[contract]
pub struct LeverageRouter;

#[contractimpl]
impl LeverageRouter {
    /// Wire the router to its collaborators. One-shot.
    pub fn initialize(
        env: Env,
        admin: Address,
        lending_core: Address,
        swap_executor: Address,
        native_asset: Address,
        wrapped_native: Address,
        native_wrapper: Address,
        fee_sink: Address,
    ) -> Result<(), RouterError> {
        config::initialize(
            &env,
            RouterConfig {
                admin,
                lending_core,
                swap_executor,
                native_asset,
                wrapped_native,
                native_wrapper,
                fee_sink,
            },
        )
    }

    /// Halt or resume all user entry points (admin only)
    pub fn set_paused(env: Env, paused: bool) -> Result<(), RouterError> {
        config::set_paused(&env, paused)
    }

    pub fn is_paused(env: Env) -> bool {
        config::is_paused(&env)
    }

    /// Replace the swap executor (admin only)
    pub fn set_swap_executor(env: Env, executor: Address) -> Result<(), RouterError> {
        config::set_swap_executor(&env, executor)
    }

    /// Replace the residual fee sink (admin only)
    pub fn set_fee_sink(env: Env, sink: Address) -> Result<(), RouterError> {
        config::set_fee_sink(&env, sink)
    }

    pub fn get_config(env: Env) -> Result<RouterConfig, RouterError> {
        config::load(&env)
    }

    /// Lever up, seeding with the collateral asset. Flash-borrows
    /// `flash_amount` of `debt_asset`, swaps it into `collateral_asset`,
    /// supplies seed plus output on the initiator's behalf and finances
    /// the repayment with a fresh borrow.
    pub fn enter_with_collateral_seed(
        env: Env,
        caller: Address,
        initiator: Address,
        collateral_asset: Address,
        debt_asset: Address,
        seed_amount: i128,
        flash_amount: i128,
        min_collateral_out: i128,
    ) -> Result<(), RouterError> {
        enter::enter_with_collateral_seed(
            &env,
            caller,
            initiator,
            collateral_asset,
            debt_asset,
            seed_amount,
            flash_amount,
            min_collateral_out,
        )
    }

    /// Lever up, seeding with the to-be-borrowed asset.
    pub fn enter_with_borrowed_seed(
        env: Env,
        caller: Address,
        initiator: Address,
        collateral_asset: Address,
        debt_asset: Address,
        seed_amount: i128,
        flash_amount: i128,
        min_collateral_out: i128,
    ) -> Result<(), RouterError> {
        enter::enter_with_borrowed_seed(
            &env,
            caller,
            initiator,
            collateral_asset,
            debt_asset,
            seed_amount,
            flash_amount,
            min_collateral_out,
        )
    }

    /// Lever up within a single market; no swap involved and only the
    /// flash fee is financed by new debt.
    pub fn enter_single_asset(
        env: Env,
        caller: Address,
        initiator: Address,
        asset: Address,
        seed_amount: i128,
        flash_amount: i128,
    ) -> Result<(), RouterError> {
        enter::enter_single_asset(&env, caller, initiator, asset, seed_amount, flash_amount)
    }

    /// Unwind a cross-asset position: repay `repay_amount` of debt from
    /// flash funds, redeem `redeem_amount` of collateral and swap it back
    /// to settle the loan.
    pub fn exit_with_swap(
        env: Env,
        caller: Address,
        initiator: Address,
        collateral_asset: Address,
        debt_asset: Address,
        repay_amount: i128,
        redeem_amount: i128,
        min_debt_out: i128,
    ) -> Result<(), RouterError> {
        exit::exit_with_swap(
            &env,
            caller,
            initiator,
            collateral_asset,
            debt_asset,
            repay_amount,
            redeem_amount,
            min_debt_out,
        )
    }

    /// Unwind within a single market.
    pub fn exit_single_asset(
        env: Env,
        caller: Address,
        initiator: Address,
        asset: Address,
        repay_amount: i128,
    ) -> Result<(), RouterError> {
        exit::exit_single_asset(&env, caller, initiator, asset, repay_amount)
    }

    /// Migrate the initiator's entire supplied balance to another market.
    pub fn swap_full_collateral(
        env: Env,
        caller: Address,
        initiator: Address,
        source_asset: Address,
        target_asset: Address,
        min_target_out: i128,
    ) -> Result<(), RouterError> {
        migrate::swap_full_collateral(
            &env,
            caller,
            initiator,
            source_asset,
            target_asset,
            min_target_out,
        )
    }

    /// Migrate `redeem_amount` of supplied balance to another market.
    pub fn swap_partial_collateral(
        env: Env,
        caller: Address,
        initiator: Address,
        source_asset: Address,
        target_asset: Address,
        redeem_amount: i128,
        min_target_out: i128,
    ) -> Result<(), RouterError> {
        migrate::swap_partial_collateral(
            &env,
            caller,
            initiator,
            source_asset,
            target_asset,
            redeem_amount,
            min_target_out,
        )
    }

    /// Move the initiator's entire source-market debt into a new borrow
    /// in the target market.
    pub fn swap_full_debt(
        env: Env,
        caller: Address,
        initiator: Address,
        source_asset: Address,
        target_asset: Address,
        flash_amount: i128,
        min_source_out: i128,
    ) -> Result<(), RouterError> {
        migrate::swap_full_debt(
            &env,
            caller,
            initiator,
            source_asset,
            target_asset,
            flash_amount,
            min_source_out,
        )
    }

    /// Move at most `repay_amount` of source-market debt into a new
    /// borrow in the target market.
    pub fn swap_partial_debt(
        env: Env,
        caller: Address,
        initiator: Address,
        source_asset: Address,
        target_asset: Address,
        flash_amount: i128,
        repay_amount: i128,
        min_source_out: i128,
    ) -> Result<(), RouterError> {
        migrate::swap_partial_debt(
            &env,
            caller,
            initiator,
            source_asset,
            target_asset,
            flash_amount,
            repay_amount,
            min_source_out,
        )
    }

    /// Migrate native-asset collateral into the wrapped market at 1:1.
    pub fn migrate_native_coll_to_wrapped(
        env: Env,
        caller: Address,
        initiator: Address,
        redeem_amount: i128,
    ) -> Result<(), RouterError> {
        migrate::migrate_native_collateral_to_wrapped(&env, caller, initiator, redeem_amount)
    }

    /// Migrate native-asset debt into the wrapped market at 1:1.
    pub fn migrate_native_debt_to_wrapped(
        env: Env,
        caller: Address,
        initiator: Address,
        amount: i128,
    ) -> Result<(), RouterError> {
        migrate::migrate_native_debt_to_wrapped(&env, caller, initiator, amount)
    }

    /// Flash-loan callback. Invoked by the lending core only; routes to
    /// the handler selected by the active operation context and returns
    /// the repayment amount the core may pull.
    pub fn on_flash_loan(
        env: Env,
        assets: Vec<Address>,
        amounts: Vec<i128>,
        fees: Vec<i128>,
        initiator: Address,
        beneficiary: Address,
        data: Bytes,
    ) -> Result<Vec<i128>, RouterError> {
        dispatch::on_flash_loan(&env, assets, amounts, fees, initiator, beneficiary, data)
    }
}
