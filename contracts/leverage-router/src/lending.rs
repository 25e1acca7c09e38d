use soroban_sdk::{contracttype, vec, Address, Bytes, Env, IntoVal, Symbol, Vec};

use crate::errors::RouterError;

/// Mirror of the lending core's liquidity answer. Decoded structurally
/// from the cross-contract return value.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccountLiquidity {
    pub liquidity: i128,
    pub shortfall: i128,
}

/// Thin invocation adapter over the lending core.
///
/// Mutators go through `try_invoke_contract` so a core-side refusal maps
/// to a distinct router error instead of an opaque nested panic. The
/// flash-loan request deliberately does not: a failure inside the callback
/// is a router error already and must surface verbatim.
pub struct CoreClient {
    pub address: Address,
}

impl CoreClient {
    pub fn new(address: Address) -> Self {
        CoreClient { address }
    }

    pub fn is_listed(&self, env: &Env, asset: &Address) -> bool {
        env.invoke_contract(
            &self.address,
            &Symbol::new(env, "is_market_listed"),
            (asset.clone(),).into_val(env),
        )
    }

    pub fn is_member(&self, env: &Env, user: &Address, asset: &Address) -> bool {
        env.invoke_contract(
            &self.address,
            &Symbol::new(env, "is_member"),
            (user.clone(), asset.clone()).into_val(env),
        )
    }

    pub fn is_delegate(&self, env: &Env, owner: &Address, operator: &Address) -> bool {
        env.invoke_contract(
            &self.address,
            &Symbol::new(env, "is_delegate"),
            (owner.clone(), operator.clone()).into_val(env),
        )
    }

    pub fn join_market(
        &self,
        env: &Env,
        user: &Address,
        asset: &Address,
    ) -> Result<(), RouterError> {
        let me = env.current_contract_address();
        env.try_invoke_contract::<(), soroban_sdk::Error>(
            &self.address,
            &Symbol::new(env, "join_market"),
            (me, user.clone(), asset.clone()).into_val(env),
        )
        .map_err(|_| RouterError::CoreCallFailed)?
        .map_err(|_| RouterError::CoreCallFailed)
    }

    pub fn account_liquidity(
        &self,
        env: &Env,
        user: &Address,
    ) -> Result<AccountLiquidity, RouterError> {
        env.try_invoke_contract::<AccountLiquidity, soroban_sdk::Error>(
            &self.address,
            &Symbol::new(env, "account_liquidity"),
            (user.clone(),).into_val(env),
        )
        .map_err(|_| RouterError::SolvencyQueryFailed)?
        .map_err(|_| RouterError::SolvencyQueryFailed)
    }

    pub fn borrow_balance(&self, env: &Env, user: &Address, asset: &Address) -> i128 {
        env.invoke_contract(
            &self.address,
            &Symbol::new(env, "borrow_balance"),
            (user.clone(), asset.clone()).into_val(env),
        )
    }

    pub fn supplied_balance(&self, env: &Env, user: &Address, asset: &Address) -> i128 {
        env.invoke_contract(
            &self.address,
            &Symbol::new(env, "supplied_balance"),
            (user.clone(), asset.clone()).into_val(env),
        )
    }

    pub fn flash_loan_fee_bps(&self, env: &Env) -> i128 {
        env.invoke_contract(
            &self.address,
            &Symbol::new(env, "flash_loan_fee_bps"),
            Vec::new(env),
        )
    }

    /// Supply on behalf of `beneficiary`. The tokens must already sit at
    /// the core; it reconciles its cash ledger against its balance.
    pub fn supply_behalf(
        &self,
        env: &Env,
        beneficiary: &Address,
        asset: &Address,
        amount: i128,
    ) -> Result<i128, RouterError> {
        let me = env.current_contract_address();
        env.try_invoke_contract::<i128, soroban_sdk::Error>(
            &self.address,
            &Symbol::new(env, "supply_behalf"),
            (me, beneficiary.clone(), asset.clone(), amount).into_val(env),
        )
        .map_err(|_| RouterError::CoreCallFailed)?
        .map_err(|_| RouterError::CoreCallFailed)
    }

    pub fn borrow_behalf(
        &self,
        env: &Env,
        beneficiary: &Address,
        recipient: &Address,
        asset: &Address,
        amount: i128,
    ) -> Result<i128, RouterError> {
        let me = env.current_contract_address();
        env.try_invoke_contract::<i128, soroban_sdk::Error>(
            &self.address,
            &Symbol::new(env, "borrow_behalf"),
            (
                me,
                beneficiary.clone(),
                recipient.clone(),
                asset.clone(),
                amount,
            )
                .into_val(env),
        )
        .map_err(|_| RouterError::CoreCallFailed)?
        .map_err(|_| RouterError::CoreCallFailed)
    }

    pub fn redeem_behalf(
        &self,
        env: &Env,
        beneficiary: &Address,
        recipient: &Address,
        asset: &Address,
        amount: i128,
    ) -> Result<i128, RouterError> {
        let me = env.current_contract_address();
        env.try_invoke_contract::<i128, soroban_sdk::Error>(
            &self.address,
            &Symbol::new(env, "redeem_behalf"),
            (
                me,
                beneficiary.clone(),
                recipient.clone(),
                asset.clone(),
                amount,
            )
                .into_val(env),
        )
        .map_err(|_| RouterError::CoreCallFailed)?
        .map_err(|_| RouterError::CoreCallFailed)
    }

    /// Repay up to `amount` of `beneficiary`'s debt. The tokens must
    /// already sit at the core. Returns the amount actually applied.
    pub fn repay_behalf(
        &self,
        env: &Env,
        beneficiary: &Address,
        asset: &Address,
        amount: i128,
    ) -> Result<i128, RouterError> {
        let me = env.current_contract_address();
        env.try_invoke_contract::<i128, soroban_sdk::Error>(
            &self.address,
            &Symbol::new(env, "repay_behalf"),
            (me, beneficiary.clone(), asset.clone(), amount).into_val(env),
        )
        .map_err(|_| RouterError::CoreCallFailed)?
        .map_err(|_| RouterError::CoreCallFailed)
    }

    /// Request a flash loan with the router as both initiator and callback
    /// target. Errors raised inside `on_flash_loan` propagate unchanged.
    pub fn request_flash_loan(
        &self,
        env: &Env,
        beneficiary: &Address,
        asset: &Address,
        amount: i128,
        data: Bytes,
    ) {
        let me = env.current_contract_address();
        env.invoke_contract::<()>(
            &self.address,
            &Symbol::new(env, "flash_loan"),
            (
                me,
                beneficiary.clone(),
                vec![env, asset.clone()],
                vec![env, amount],
                data,
            )
                .into_val(env),
        )
    }
}
