use soroban_sdk::{token, Address, Env, Vec};

use crate::errors::RouterError;
use crate::events;

/// Pre-operation balances of the assets an operation touches, taken at
/// the entry point before any funds move. Whatever exceeds these levels
/// after the flash loan settles is residual dust.
pub struct BalanceSnapshot {
    assets: Vec<Address>,
    balances: Vec<i128>,
}

pub fn snapshot(env: &Env, assets: Vec<Address>) -> BalanceSnapshot {
    let me = env.current_contract_address();
    let mut balances = Vec::new(env);
    for asset in assets.iter() {
        balances.push_back(token::Client::new(env, &asset).balance(&me));
    }
    BalanceSnapshot { assets, balances }
}

/// Forward any balance growth since the snapshot to `recipient`.
/// Idempotent: a second sweep against the same snapshot finds no growth
/// and moves nothing.
pub fn sweep(
    env: &Env,
    snap: &BalanceSnapshot,
    recipient: &Address,
) -> Result<(), RouterError> {
    let me = env.current_contract_address();
    for (asset, baseline) in snap.assets.iter().zip(snap.balances.iter()) {
        let client = token::Client::new(env, &asset);
        let surplus = client
            .balance(&me)
            .checked_sub(baseline)
            .ok_or(RouterError::Overflow)?;
        if surplus > 0 {
            client.transfer(&me, recipient, &surplus);
            events::emit_residual_swept(env, &asset, recipient, surplus);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::testutils::Address as _;
    use soroban_sdk::{contract, vec, Env};

    #[contract]
    struct Host;

    #[test]
    fn sweep_moves_surplus_once() {
        let env = Env::default();
        env.mock_all_auths_allowing_non_root_auth();
        let contract_id = env.register(Host, ());
        let issuer = Address::generate(&env);
        let asset = env
            .register_stellar_asset_contract_v2(issuer.clone())
            .address();
        let sink = Address::generate(&env);

        token::StellarAssetClient::new(&env, &asset).mint(&contract_id, &500);
        env.as_contract(&contract_id, || {
            let snap = snapshot(&env, vec![&env, asset.clone()]);
            token::StellarAssetClient::new(&env, &asset).mint(&contract_id, &37);
            sweep(&env, &snap, &sink).unwrap();
            // Second sweep sees no growth past the baseline.
            sweep(&env, &snap, &sink).unwrap();
        });

        let client = token::Client::new(&env, &asset);
        assert_eq!(client.balance(&sink), 37);
        assert_eq!(client.balance(&contract_id), 500);
    }
}
