use crate::{LendingCore, LendingCoreClient};
use soroban_sdk::{testutils::Address as _, Address, Env};

fn setup() -> (Env, LendingCoreClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(LendingCore, ());
    let client = LendingCoreClient::new(&env, &contract_id);
    let admin = Address::generate(&env);
    client.initialize(&admin);
    (env, client, admin)
}

#[test]
fn test_register_market() {
    let (env, client, admin) = setup();
    let asset = Address::generate(&env);

    assert!(!client.is_market_listed(&asset));
    client.register_market(&admin, &asset, &9000, &10_000_000);
    assert!(client.is_market_listed(&asset));
}

#[test]
#[should_panic(expected = "HostError: Error(Contract, #1)")]
fn test_double_initialize() {
    let (env, client, _admin) = setup();
    let other = Address::generate(&env);
    client.initialize(&other);
}

#[test]
#[should_panic(expected = "HostError: Error(Contract, #5)")]
fn test_register_market_twice() {
    let (env, client, admin) = setup();
    let asset = Address::generate(&env);
    client.register_market(&admin, &asset, &9000, &10_000_000);
    client.register_market(&admin, &asset, &8000, &10_000_000);
}

#[test]
#[should_panic(expected = "HostError: Error(Contract, #3)")]
fn test_register_market_not_admin() {
    let (env, client, _admin) = setup();
    let rando = Address::generate(&env);
    let asset = Address::generate(&env);
    client.register_market(&rando, &asset, &9000, &10_000_000);
}

#[test]
#[should_panic(expected = "HostError: Error(Contract, #6)")]
fn test_register_market_bad_collateral_factor() {
    let (env, client, admin) = setup();
    let asset = Address::generate(&env);
    client.register_market(&admin, &asset, &10_001, &10_000_000);
}

#[test]
fn test_set_price() {
    let (env, client, admin) = setup();
    let asset = Address::generate(&env);
    client.register_market(&admin, &asset, &9000, &10_000_000);
    client.set_price(&admin, &asset, &20_000_000);
}

#[test]
#[should_panic(expected = "HostError: Error(Contract, #4)")]
fn test_set_price_unlisted() {
    let (env, client, admin) = setup();
    let asset = Address::generate(&env);
    client.set_price(&admin, &asset, &20_000_000);
}

#[test]
fn test_join_market_self() {
    let (env, client, admin) = setup();
    let asset = Address::generate(&env);
    let user = Address::generate(&env);
    client.register_market(&admin, &asset, &9000, &10_000_000);

    assert!(!client.is_member(&user, &asset));
    client.join_market(&user, &user, &asset);
    assert!(client.is_member(&user, &asset));

    // Idempotent
    client.join_market(&user, &user, &asset);
    assert!(client.is_member(&user, &asset));
}

#[test]
fn test_join_market_via_delegate() {
    let (env, client, admin) = setup();
    let asset = Address::generate(&env);
    let user = Address::generate(&env);
    let operator = Address::generate(&env);
    client.register_market(&admin, &asset, &9000, &10_000_000);

    client.approve_delegate(&user, &operator, &true);
    client.join_market(&operator, &user, &asset);
    assert!(client.is_member(&user, &asset));
}

#[test]
#[should_panic(expected = "HostError: Error(Contract, #3)")]
fn test_join_market_unauthorized() {
    let (env, client, admin) = setup();
    let asset = Address::generate(&env);
    let user = Address::generate(&env);
    let stranger = Address::generate(&env);
    client.register_market(&admin, &asset, &9000, &10_000_000);
    client.join_market(&stranger, &user, &asset);
}

#[test]
fn test_delegate_approval_lifecycle() {
    let (env, client, _admin) = setup();
    let owner = Address::generate(&env);
    let operator = Address::generate(&env);

    assert!(!client.is_delegate(&owner, &operator));
    client.approve_delegate(&owner, &operator, &true);
    assert!(client.is_delegate(&owner, &operator));
    client.approve_delegate(&owner, &operator, &false);
    assert!(!client.is_delegate(&owner, &operator));
}
