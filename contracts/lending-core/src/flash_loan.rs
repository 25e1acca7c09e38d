use soroban_sdk::{contracterror, contracttype, token, vec, Address, Bytes, Env, IntoVal, Symbol, Vec};

use crate::events::{emit_flash_loan_issued, emit_flash_loan_settled};
use crate::market;
use crate::position;

/// Errors that can occur during flash loan operations
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum FlashError {
    InvalidAmount = 1,
    InsufficientRepayment = 2,
    Unauthorized = 3,
    InvalidFee = 4,
    /// Request must carry exactly one market/amount pair
    InvalidLoanRequest = 5,
    InsufficientLiquidity = 6,
    Reentrancy = 7,
    MarketNotListed = 8,
    Overflow = 9,
}

/// Storage keys for flash loan data
#[contracttype]
#[derive(Clone)]
pub enum FlashDataKey {
    FlashLoanFeeBps,
    ReentrancyGuard,
}

const MAX_FEE_BPS: i128 = 1000; // 10% maximum fee

/// Default fee: 9 basis points (0.09%)
const DEFAULT_FEE_BPS: i128 = 9;

/// Issue a single-asset flash loan and synchronously collect repayment.
///
/// Exactly one asset/amount pair may be requested. The principal is
/// transferred to `initiator`, then `on_flash_loan` is invoked on it with
/// the loan terms, the initiator's own claim and the claimed `beneficiary`.
/// The callback returns one repay amount per loan; that amount is pulled
/// from the initiator via token allowance immediately afterwards and must
/// cover at least the fee. A failing callback aborts the whole transaction.
pub fn flash_loan(
    env: &Env,
    initiator: Address,
    beneficiary: Address,
    assets: Vec<Address>,
    amounts: Vec<i128>,
    data: Bytes,
) -> Result<(), FlashError> {
    initiator.require_auth();

    if assets.len() != 1 || amounts.len() != 1 {
        return Err(FlashError::InvalidLoanRequest);
    }
    let asset = assets.get(0).ok_or(FlashError::InvalidLoanRequest)?;
    let amount = amounts.get(0).ok_or(FlashError::InvalidLoanRequest)?;
    if amount <= 0 {
        return Err(FlashError::InvalidAmount);
    }
    if !market::is_listed(env, &asset) {
        return Err(FlashError::MarketNotListed);
    }

    let guard_key = FlashDataKey::ReentrancyGuard;
    if env.storage().temporary().get(&guard_key).unwrap_or(false) {
        return Err(FlashError::Reentrancy);
    }
    env.storage().temporary().set(&guard_key, &true);

    let fee = calculate_fee(env, amount)?;

    let token_client = token::Client::new(env, &asset);
    let this = env.current_contract_address();
    if token_client.balance(&this) < amount {
        return Err(FlashError::InsufficientLiquidity);
    }

    // 1. Hand the principal to the initiator
    position::set_cash(env, &asset, position::cash(env, &asset) - amount);
    token_client.transfer(&this, &initiator, &amount);
    emit_flash_loan_issued(env, initiator.clone(), beneficiary.clone(), asset.clone(), amount, fee);

    // 2. Execute the callback on the initiator
    let fees: Vec<i128> = vec![env, fee];
    let repays: Vec<i128> = env.invoke_contract(
        &initiator,
        &Symbol::new(env, "on_flash_loan"),
        (
            assets.clone(),
            amounts.clone(),
            fees,
            initiator.clone(),
            beneficiary.clone(),
            data,
        )
            .into_val(env),
    );

    // 3. Collect the approved repayment
    if repays.len() != 1 {
        return Err(FlashError::InvalidLoanRequest);
    }
    let repay = repays.get(0).ok_or(FlashError::InvalidLoanRequest)?;
    if repay < fee {
        return Err(FlashError::InsufficientRepayment);
    }
    if repay > 0 {
        token_client.transfer_from(&this, &initiator, &this, &repay);
    }
    position::set_cash(
        env,
        &asset,
        position::cash(env, &asset)
            .checked_add(repay)
            .ok_or(FlashError::Overflow)?,
    );

    env.storage().temporary().remove(&guard_key);
    emit_flash_loan_settled(env, initiator, asset, amount, fee, repay);
    Ok(())
}

/// Calculate the fee for a flash loan
fn calculate_fee(env: &Env, amount: i128) -> Result<i128, FlashError> {
    amount
        .checked_mul(fee_bps(env))
        .ok_or(FlashError::Overflow)?
        .checked_div(10000)
        .ok_or(FlashError::Overflow)
}

/// Set the flash loan fee in basis points (admin only)
pub fn set_fee_bps(env: &Env, caller: Address, fee_bps: i128) -> Result<(), FlashError> {
    market::require_admin(env, &caller).map_err(|_| FlashError::Unauthorized)?;
    if !(0..=MAX_FEE_BPS).contains(&fee_bps) {
        return Err(FlashError::InvalidFee);
    }
    env.storage()
        .persistent()
        .set(&FlashDataKey::FlashLoanFeeBps, &fee_bps);
    Ok(())
}

/// Get the current flash loan fee in basis points
pub fn fee_bps(env: &Env) -> i128 {
    env.storage()
        .persistent()
        .get(&FlashDataKey::FlashLoanFeeBps)
        .unwrap_or(DEFAULT_FEE_BPS)
}
