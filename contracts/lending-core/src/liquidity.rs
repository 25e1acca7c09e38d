use soroban_sdk::{contracterror, contracttype, Address, Env};

use crate::market::{self, BPS_SCALE, PRICE_SCALE};
use crate::position;

/// Errors from the account liquidity computation
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum LiquidityError {
    Overflow = 1,
}

/// Result of the solvency query. At most one field is nonzero: `liquidity`
/// is spare borrowing capacity, `shortfall` the amount by which debt value
/// exceeds collateral capacity.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct AccountLiquidity {
    pub liquidity: i128,
    pub shortfall: i128,
}

/// Compute `user`'s current liquidity and shortfall at stored prices.
///
/// Collateral counts only in markets the user is a member of, weighted by
/// the market's collateral factor. Debt counts in every market.
pub fn account_liquidity(env: &Env, user: &Address) -> Result<AccountLiquidity, LiquidityError> {
    account_liquidity_adjusted(env, user, None)
}

/// Same as [`account_liquidity`], optionally with a hypothetical extra debt
/// of `(asset, amount)` applied, for pre-trade borrow checks.
pub fn account_liquidity_adjusted(
    env: &Env,
    user: &Address,
    extra_debt: Option<(&Address, i128)>,
) -> Result<AccountLiquidity, LiquidityError> {
    let mut collateral_value: i128 = 0;
    let mut debt_value: i128 = 0;

    for asset in market::market_list(env).iter() {
        let market = match market::get_market(env, &asset) {
            Ok(m) => m,
            Err(_) => continue,
        };

        if market::is_member(env, user, &asset) {
            let supplied = position::supplied_balance(env, user, &asset);
            if supplied > 0 {
                let value = value_of(supplied, market.price)?
                    .checked_mul(market.collateral_factor_bps)
                    .ok_or(LiquidityError::Overflow)?
                    .checked_div(BPS_SCALE)
                    .ok_or(LiquidityError::Overflow)?;
                collateral_value = collateral_value
                    .checked_add(value)
                    .ok_or(LiquidityError::Overflow)?;
            }
        }

        let mut debt = position::borrow_balance(env, user, &asset);
        if let Some((extra_asset, extra)) = extra_debt {
            if *extra_asset == asset {
                debt = debt.checked_add(extra).ok_or(LiquidityError::Overflow)?;
            }
        }
        if debt > 0 {
            debt_value = debt_value
                .checked_add(value_of(debt, market.price)?)
                .ok_or(LiquidityError::Overflow)?;
        }
    }

    if collateral_value >= debt_value {
        Ok(AccountLiquidity {
            liquidity: collateral_value - debt_value,
            shortfall: 0,
        })
    } else {
        Ok(AccountLiquidity {
            liquidity: 0,
            shortfall: debt_value - collateral_value,
        })
    }
}

fn value_of(amount: i128, price: i128) -> Result<i128, LiquidityError> {
    amount
        .checked_mul(price)
        .ok_or(LiquidityError::Overflow)?
        .checked_div(PRICE_SCALE)
        .ok_or(LiquidityError::Overflow)
}
