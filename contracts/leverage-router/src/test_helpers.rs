use looplend_lending_core::{LendingCore, LendingCoreClient};
use soroban_sdk::{
    contract, contractimpl, contracttype, testutils::Address as _, token, vec, Address, Bytes, Env,
    IntoVal, Symbol, Vec,
};

use crate::errors::RouterError;
use crate::{LeverageRouter, LeverageRouterClient};

pub const PRICE_ONE: i128 = 10_000_000;

#[contracttype]
#[derive(Clone)]
enum ExecKey {
    RateBps,
}

// Swap executor paying out of a pre-funded inventory at a configurable
// rate. Output is rate_bps/10000 of the input, regardless of asset pair.
#[contract]
pub struct MockSwapExecutor;

#[contractimpl]
impl MockSwapExecutor {
    pub fn set_rate(env: Env, rate_bps: i128) {
        env.storage().instance().set(&ExecKey::RateBps, &rate_bps);
    }

    pub fn swap(
        env: Env,
        _asset_in: Address,
        asset_out: Address,
        amount_in: i128,
        recipient: Address,
    ) -> i128 {
        let rate: i128 = env
            .storage()
            .instance()
            .get(&ExecKey::RateBps)
            .unwrap_or(10_000);
        let out = amount_in * rate / 10_000;
        token::Client::new(&env, &asset_out).transfer(
            &env.current_contract_address(),
            &recipient,
            &out,
        );
        out
    }
}

#[contracttype]
#[derive(Clone)]
enum ReenterKey {
    Blocked,
}

// Hostile executor that calls back into the router's own entry points
// mid-swap, records whether the nested call was rejected, then settles
// the swap 1:1 so the outer operation can run to completion.
#[contract]
pub struct ReenteringExecutor;

#[contractimpl]
impl ReenteringExecutor {
    pub fn swap(
        env: Env,
        asset_in: Address,
        asset_out: Address,
        amount_in: i128,
        recipient: Address,
    ) -> i128 {
        let nested = env.try_invoke_contract::<(), soroban_sdk::Error>(
            &recipient,
            &Symbol::new(&env, "enter_single_asset"),
            (
                recipient.clone(),
                recipient.clone(),
                asset_in.clone(),
                0_i128,
                50_i128,
            )
                .into_val(&env),
        );
        let blocked = matches!(
            nested,
            Err(Ok(err)) if err
                == soroban_sdk::Error::from_contract_error(RouterError::ReentrantCall as u32)
        );
        env.storage().instance().set(&ReenterKey::Blocked, &blocked);

        token::Client::new(&env, &asset_out).transfer(
            &env.current_contract_address(),
            &recipient,
            &amount_in,
        );
        amount_in
    }

    pub fn reentry_blocked(env: Env) -> bool {
        env.storage()
            .instance()
            .get(&ReenterKey::Blocked)
            .unwrap_or(false)
    }
}

#[contracttype]
#[derive(Clone)]
enum WrapKey {
    Native,
    Wrapped,
}

// 1:1 converter between the native token and its wrapped form, paying
// from a pre-funded inventory.
#[contract]
pub struct MockWrapper;

#[contractimpl]
impl MockWrapper {
    pub fn set_assets(env: Env, native: Address, wrapped: Address) {
        env.storage().instance().set(&WrapKey::Native, &native);
        env.storage().instance().set(&WrapKey::Wrapped, &wrapped);
    }

    pub fn wrap(env: Env, recipient: Address, amount: i128) {
        let wrapped: Address = env.storage().instance().get(&WrapKey::Wrapped).unwrap();
        token::Client::new(&env, &wrapped).transfer(
            &env.current_contract_address(),
            &recipient,
            &amount,
        );
    }

    pub fn unwrap(env: Env, recipient: Address, amount: i128) {
        let native: Address = env.storage().instance().get(&WrapKey::Native).unwrap();
        token::Client::new(&env, &native).transfer(
            &env.current_contract_address(),
            &recipient,
            &amount,
        );
    }
}

#[contracttype]
#[derive(Clone)]
enum RogueKey {
    Mode,
}

#[contracttype]
#[derive(Clone)]
pub struct RogueLiquidity {
    pub liquidity: i128,
    pub shortfall: i128,
}

pub const ROGUE_FORGED_BENEFICIARY: u32 = 1;
pub const ROGUE_WRONG_INITIATOR: u32 = 2;
pub const ROGUE_BAD_CARDINALITY: u32 = 3;
pub const ROGUE_REENTER_ENTRY: u32 = 4;

// Stand-in lending core that answers every query permissively but forges
// the flash-loan callback according to its configured mode.
#[contract]
pub struct RogueCore;

#[contractimpl]
impl RogueCore {
    pub fn set_mode(env: Env, mode: u32) {
        env.storage().instance().set(&RogueKey::Mode, &mode);
    }

    pub fn is_market_listed(_env: Env, _asset: Address) -> bool {
        true
    }

    pub fn is_member(_env: Env, _user: Address, _asset: Address) -> bool {
        true
    }

    pub fn is_delegate(_env: Env, _owner: Address, _operator: Address) -> bool {
        true
    }

    pub fn join_market(_env: Env, _caller: Address, _user: Address, _asset: Address) {}

    pub fn account_liquidity(_env: Env, _user: Address) -> RogueLiquidity {
        RogueLiquidity {
            liquidity: 1_000_000,
            shortfall: 0,
        }
    }

    pub fn flash_loan_fee_bps(_env: Env) -> i128 {
        0
    }

    pub fn supplied_balance(_env: Env, _user: Address, _asset: Address) -> i128 {
        100
    }

    pub fn borrow_balance(_env: Env, _user: Address, _asset: Address) -> i128 {
        100
    }

    pub fn flash_loan(
        env: Env,
        initiator: Address,
        beneficiary: Address,
        assets: Vec<Address>,
        amounts: Vec<i128>,
        data: Bytes,
    ) {
        let mode: u32 = env.storage().instance().get(&RogueKey::Mode).unwrap_or(0);
        let fees: Vec<i128> = vec![&env, 0];
        let callback = Symbol::new(&env, "on_flash_loan");
        match mode {
            ROGUE_FORGED_BENEFICIARY => {
                let forged = Address::generate(&env);
                env.invoke_contract::<Vec<i128>>(
                    &initiator,
                    &callback,
                    (assets, amounts, fees, initiator.clone(), forged, data).into_val(&env),
                );
            }
            ROGUE_WRONG_INITIATOR => {
                let claim = env.current_contract_address();
                env.invoke_contract::<Vec<i128>>(
                    &initiator,
                    &callback,
                    (assets, amounts, fees, claim, beneficiary, data).into_val(&env),
                );
            }
            ROGUE_BAD_CARDINALITY => {
                let asset = assets.get(0).unwrap();
                let amount = amounts.get(0).unwrap();
                env.invoke_contract::<Vec<i128>>(
                    &initiator,
                    &callback,
                    (
                        vec![&env, asset.clone(), asset],
                        vec![&env, amount, amount],
                        vec![&env, 0_i128, 0_i128],
                        initiator.clone(),
                        beneficiary,
                        data,
                    )
                        .into_val(&env),
                );
            }
            ROGUE_REENTER_ENTRY => {
                let asset = assets.get(0).unwrap();
                env.invoke_contract::<()>(
                    &initiator,
                    &Symbol::new(&env, "enter_single_asset"),
                    (
                        beneficiary.clone(),
                        beneficiary,
                        asset,
                        0_i128,
                        100_i128,
                    )
                        .into_val(&env),
                );
            }
            _ => {
                env.invoke_contract::<Vec<i128>>(
                    &initiator,
                    &callback,
                    (assets, amounts, fees, initiator.clone(), beneficiary, data).into_val(&env),
                );
            }
        }
    }
}

pub struct Fixture {
    pub env: Env,
    pub admin: Address,
    pub user: Address,
    pub fee_sink: Address,
    pub core_id: Address,
    pub core: LendingCoreClient<'static>,
    pub router_id: Address,
    pub router: LeverageRouterClient<'static>,
    pub executor_id: Address,
    pub executor: MockSwapExecutorClient<'static>,
    pub wrapper_id: Address,
    pub asset_x: Address,
    pub asset_y: Address,
    pub native: Address,
    pub wrapped: Address,
}

impl Fixture {
    pub fn mint(&self, asset: &Address, to: &Address, amount: i128) {
        token::StellarAssetClient::new(&self.env, asset).mint(to, &amount);
    }

    pub fn balance(&self, asset: &Address, of: &Address) -> i128 {
        token::Client::new(&self.env, asset).balance(of)
    }

    /// Build a position for `user` the proper way: transfer in, supply,
    /// join the market, optionally borrow back to the user.
    pub fn seed_position(&self, asset: &Address, supply: i128, borrow: i128) {
        self.mint(asset, &self.user, supply);
        token::Client::new(&self.env, asset).transfer(&self.user, &self.core_id, &supply);
        self.core.supply_behalf(&self.user, &self.user, asset, &supply);
        self.core.join_market(&self.user, &self.user, asset);
        if borrow > 0 {
            self.core
                .borrow_behalf(&self.user, &self.user, &self.user, asset, &borrow);
        }
    }
}

pub fn setup() -> Fixture {
    let env = Env::default();
    env.mock_all_auths();
    let admin = Address::generate(&env);
    let user = Address::generate(&env);
    let fee_sink = Address::generate(&env);

    let core_id = env.register(LendingCore, ());
    let core = LendingCoreClient::new(&env, &core_id);
    core.initialize(&admin);

    let asset_x = env
        .register_stellar_asset_contract_v2(admin.clone())
        .address();
    let asset_y = env
        .register_stellar_asset_contract_v2(admin.clone())
        .address();
    let native = env
        .register_stellar_asset_contract_v2(admin.clone())
        .address();
    let wrapped = env
        .register_stellar_asset_contract_v2(admin.clone())
        .address();

    let executor_id = env.register(MockSwapExecutor, ());
    let executor = MockSwapExecutorClient::new(&env, &executor_id);

    let wrapper_id = env.register(MockWrapper, ());
    MockWrapperClient::new(&env, &wrapper_id).set_assets(&native, &wrapped);

    for asset in [&asset_x, &asset_y, &native, &wrapped] {
        core.register_market(&admin, asset, &9000, &PRICE_ONE);
        let sac = token::StellarAssetClient::new(&env, asset);
        sac.mint(&core_id, &1_000_000);
        sac.mint(&executor_id, &1_000_000);
        sac.mint(&wrapper_id, &1_000_000);
    }

    let router_id = env.register(LeverageRouter, ());
    let router = LeverageRouterClient::new(&env, &router_id);
    router.initialize(
        &admin,
        &core_id,
        &executor_id,
        &native,
        &wrapped,
        &wrapper_id,
        &fee_sink,
    );

    // The router mutates positions as the user's approved delegate.
    core.approve_delegate(&user, &router_id, &true);

    Fixture {
        env,
        admin,
        user,
        fee_sink,
        core_id,
        core,
        router_id,
        router,
        executor_id,
        executor,
        wrapper_id,
        asset_x,
        asset_y,
        native,
        wrapped,
    }
}
