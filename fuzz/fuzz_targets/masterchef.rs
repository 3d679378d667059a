#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use masterchef::{MasterChefContract, MasterChefContractClient};
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::StellarAssetClient,
    Address, Env,
};

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Deposit { pool: u8, amount: u32 },
    Withdraw { pool: u8, amount: u32 },
    Collect { pool: u8 },
    Emergency { pool: u8 },
    Advance { blocks: u16 },
    SetWeight { pool: u8, weight: u16, with_update: bool },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().with_mut(|li| {
        li.min_persistent_entry_ttl = 2_000_000;
        li.max_entry_ttl = 3_000_000;
    });

    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let stake_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();

    let contract_id = env.register(MasterChefContract, ());
    let client = MasterChefContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    client.initialize(
        &admin,
        &reward_token,
        &soroban_sdk::Vec::from_array(&env, [200i128, 70, 20]),
        &soroban_sdk::Vec::from_array(&env, [100_000u32, 300_000, 600_000]),
    );
    client.init(&admin, &0);
    client.add_pool(&admin, &100, &stake_token, &false);
    client.add_pool(&admin, &300, &stake_token, &false);
    StellarAssetClient::new(&env, &reward_token).mint(&contract_id, &(i64::MAX as i128));

    let mut users = Vec::new();
    for _ in 0..4 {
        let user = Address::generate(&env);
        StellarAssetClient::new(&env, &stake_token).mint(&user, &(u32::MAX as i128));
        users.push(user);
    }

    // Errors are expected (over-withdrawals, bad indices); panics and
    // broken supply accounting are not.
    for (i, action) in actions.into_iter().enumerate() {
        let caller = &users[i % users.len()];
        match action {
            FuzzAction::Deposit { pool, amount } => {
                let _ = client.try_deposit(caller, &(pool as u32 % 3), &(amount as i128));
            }
            FuzzAction::Withdraw { pool, amount } => {
                let _ = client.try_withdraw(caller, &(pool as u32 % 3), &(amount as i128));
            }
            FuzzAction::Collect { pool } => {
                let _ = client.try_collect_rewards(caller, &(pool as u32 % 3));
            }
            FuzzAction::Emergency { pool } => {
                let _ = client.try_emergency_withdraw(caller, &(pool as u32 % 3));
            }
            FuzzAction::Advance { blocks } => {
                env.ledger()
                    .with_mut(|li| li.sequence_number = li.sequence_number.saturating_add(blocks as u32));
            }
            FuzzAction::SetWeight { pool, weight, with_update } => {
                let _ = client.try_set_weight(&admin, &(pool as u32 % 3), &(weight as u64), &with_update);
            }
        }

        for pool in 0..2u32 {
            let supply = client.get_pool_info(&pool).pool_supply;
            let staked: i128 = users
                .iter()
                .map(|u| client.get_user_info(&pool, u).amount)
                .sum();
            assert_eq!(supply, staked);
        }
    }
});
