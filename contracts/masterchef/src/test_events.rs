extern crate std;

use common::roles::Role;
use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events, Ledger as _},
    token::StellarAssetClient,
    xdr::{ContractEventBody, ScVal},
    Address, Env, IntoVal, Symbol, TryFromVal, Val, Vec,
};

use crate::events::{
    DepositEvent, EmergencyWithdrawEvent, PoolAddedEvent, PoolWeightSetEvent,
    ResidualWithdrawnEvent, RewardPaidEvent, RoleChangedEvent, StartedEvent, WithdrawEvent,
};
use crate::{ContractError, MasterChefContract, MasterChefContractClient};

// ── Test helpers ─────────────────────────────────────────────────────────────

const REWARD_FUNDING: i128 = 40_000_000;

type RawEvent = (std::vec::Vec<ScVal>, ScVal);

fn setup() -> (
    Env,
    MasterChefContractClient<'static>,
    Address, // admin
    Address, // stake_token
) {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().with_mut(|li| {
        li.sequence_number = 0;
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
        &Vec::from_array(&env, [200i128, 70, 20]),
        &Vec::from_array(&env, [100_000u32, 300_000, 600_000]),
    );
    StellarAssetClient::new(&env, &reward_token).mint(&contract_id, &REWARD_FUNDING);

    (env, client, admin, stake_token)
}

fn setup_started() -> (Env, MasterChefContractClient<'static>, Address, Address) {
    let (env, client, admin, stake_token) = setup();
    client.init(&admin, &0);
    client.add_pool(&admin, &100, &stake_token, &false);
    (env, client, admin, stake_token)
}

fn stake(env: &Env, client: &MasterChefContractClient, stake_token: &Address, amount: i128) -> Address {
    let staker = Address::generate(env);
    StellarAssetClient::new(env, stake_token).mint(&staker, &amount);
    client.deposit(&staker, &0, &amount);
    staker
}

fn set_block(env: &Env, block: u32) {
    env.ledger().with_mut(|li| li.sequence_number = block);
}

fn to_scval<T: IntoVal<Env, Val>>(env: &Env, value: T) -> ScVal {
    let val: Val = value.into_val(env);
    ScVal::try_from_val(env, &val).unwrap()
}

fn topics<T: IntoVal<Env, Vec<Val>>>(env: &Env, topics: T) -> std::vec::Vec<ScVal> {
    let topics: Vec<Val> = topics.into_val(env);
    topics
        .iter()
        .map(|topic| ScVal::try_from_val(env, &topic).unwrap())
        .collect()
}

fn raw_events(env: &Env) -> std::vec::Vec<RawEvent> {
    env.events()
        .all()
        .events()
        .iter()
        .map(|event| {
            let ContractEventBody::V0(body) = &event.body;
            (body.topics.to_vec(), body.data.clone())
        })
        .collect()
}

/// Recorded events whose first topic is `name`, oldest first.
fn events_named(env: &Env, name: Symbol) -> std::vec::Vec<RawEvent> {
    let wanted = to_scval(env, name);
    raw_events(env)
        .into_iter()
        .filter(|(topics, _)| topics.first() == Some(&wanted))
        .collect()
}

fn last_event(env: &Env) -> RawEvent {
    raw_events(env).pop().unwrap()
}

// ── Administration ───────────────────────────────────────────────────────────

#[test]
fn test_start_and_pool_events() {
    let (env, client, admin, stake_token) = setup();
    set_block(&env, 7);

    client.init(&admin, &3);
    let (event_topics, data) = last_event(&env);
    assert_eq!(event_topics, topics(&env, (symbol_short!("STARTED"),)));
    assert_eq!(
        data,
        to_scval(&env, StartedEvent { start_block: 10, block: 7 })
    );

    client.add_pool(&admin, &40, &stake_token, &false);
    let (event_topics, data) = last_event(&env);
    assert_eq!(event_topics, topics(&env, (symbol_short!("POOL_ADD"), 0u32)));
    assert_eq!(
        data,
        to_scval(
            &env,
            PoolAddedEvent {
                pool_id: 0,
                staking_token: stake_token.clone(),
                weight: 40,
                total_weight: 40,
                block: 7,
            }
        )
    );

    client.set_weight(&admin, &0, &25, &true);
    let (event_topics, data) = last_event(&env);
    assert_eq!(event_topics, topics(&env, (symbol_short!("POOL_SET"), 0u32)));
    assert_eq!(
        data,
        to_scval(
            &env,
            PoolWeightSetEvent {
                pool_id: 0,
                old_weight: 40,
                new_weight: 25,
                total_weight: 25,
                block: 7,
            }
        )
    );
}

#[test]
fn test_role_events() {
    let (env, client, admin, _) = setup();
    let operator = Address::generate(&env);
    set_block(&env, 5);

    client.grant_role(&admin, &Role::Admin, &operator);
    let expected = RoleChangedEvent {
        role: Role::Admin,
        account: operator.clone(),
        sender: admin.clone(),
        block: 5,
    };
    let (event_topics, data) = last_event(&env);
    assert_eq!(
        event_topics,
        topics(&env, (symbol_short!("ROLE_GRNT"), operator.clone()))
    );
    assert_eq!(data, to_scval(&env, expected.clone()));

    client.revoke_role(&admin, &Role::Admin, &operator);
    let (event_topics, data) = last_event(&env);
    assert_eq!(
        event_topics,
        topics(&env, (symbol_short!("ROLE_RVKD"), operator.clone()))
    );
    assert_eq!(data, to_scval(&env, expected));
}

#[test]
fn test_residual_withdrawn_event() {
    let (env, client, admin, _) = setup_started();
    let treasury = Address::generate(&env);

    client.withdraw_residual(&admin, &treasury);
    let (event_topics, data) = last_event(&env);
    assert_eq!(
        event_topics,
        topics(&env, (symbol_short!("RESIDUAL"), treasury.clone()))
    );
    assert_eq!(
        data,
        to_scval(
            &env,
            ResidualWithdrawnEvent {
                recipient: treasury,
                amount: REWARD_FUNDING,
                block: 0,
            }
        )
    );
}

// ── Staking ──────────────────────────────────────────────────────────────────

#[test]
fn test_deposit_events() {
    let (env, client, _admin, stake_token) = setup_started();
    let staker = stake(&env, &client, &stake_token, 10);

    let (event_topics, data) = last_event(&env);
    assert_eq!(
        event_topics,
        topics(&env, (symbol_short!("DEPOSIT"), 0u32, staker.clone()))
    );
    assert_eq!(
        data,
        to_scval(
            &env,
            DepositEvent {
                pool_id: 0,
                staker: staker.clone(),
                amount: 10,
                new_pool_supply: 10,
                block: 0,
            }
        )
    );

    // A top-up pays out the 2 blocks earned so far, then records the stake.
    set_block(&env, 2);
    StellarAssetClient::new(&env, &stake_token).mint(&staker, &5);
    client.deposit(&staker, &0, &5);

    let (event_topics, data) = events_named(&env, symbol_short!("RWD_PAID")).pop().unwrap();
    assert_eq!(
        event_topics,
        topics(&env, (symbol_short!("RWD_PAID"), 0u32, staker.clone()))
    );
    assert_eq!(
        data,
        to_scval(
            &env,
            RewardPaidEvent {
                pool_id: 0,
                staker: staker.clone(),
                amount: 400,
                block: 2,
            }
        )
    );

    let (_, data) = last_event(&env);
    assert_eq!(
        data,
        to_scval(
            &env,
            DepositEvent {
                pool_id: 0,
                staker,
                amount: 5,
                new_pool_supply: 15,
                block: 2,
            }
        )
    );
}

#[test]
fn test_harvest_publishes_reward_paid_last() {
    let (env, client, _admin, stake_token) = setup_started();
    let staker = stake(&env, &client, &stake_token, 10);

    set_block(&env, 1);
    assert_eq!(client.deposit(&staker, &0, &0), 200);

    let (event_topics, data) = last_event(&env);
    assert_eq!(
        event_topics,
        topics(&env, (symbol_short!("RWD_PAID"), 0u32, staker.clone()))
    );
    assert_eq!(
        data,
        to_scval(
            &env,
            RewardPaidEvent {
                pool_id: 0,
                staker,
                amount: 200,
                block: 1,
            }
        )
    );
}

#[test]
fn test_withdraw_events() {
    let (env, client, _admin, stake_token) = setup_started();
    let staker = stake(&env, &client, &stake_token, 10);

    set_block(&env, 3);
    client.withdraw(&staker, &0, &4);

    let (_, data) = events_named(&env, symbol_short!("RWD_PAID")).pop().unwrap();
    assert_eq!(
        data,
        to_scval(
            &env,
            RewardPaidEvent {
                pool_id: 0,
                staker: staker.clone(),
                amount: 600,
                block: 3,
            }
        )
    );

    let (event_topics, data) = last_event(&env);
    assert_eq!(
        event_topics,
        topics(&env, (symbol_short!("WITHDRAW"), 0u32, staker.clone()))
    );
    assert_eq!(
        data,
        to_scval(
            &env,
            WithdrawEvent {
                pool_id: 0,
                staker,
                amount: 4,
                new_pool_supply: 6,
                block: 3,
            }
        )
    );
}

#[test]
fn test_emergency_withdraw_event() {
    let (env, client, _admin, stake_token) = setup_started();
    let staker = stake(&env, &client, &stake_token, 10);

    set_block(&env, 4);
    client.emergency_withdraw(&staker, &0);

    let (event_topics, data) = last_event(&env);
    assert_eq!(
        event_topics,
        topics(&env, (symbol_short!("EMRG_WD"), 0u32, staker.clone()))
    );
    assert_eq!(
        data,
        to_scval(
            &env,
            EmergencyWithdrawEvent {
                pool_id: 0,
                staker,
                amount: 10,
                block: 4,
            }
        )
    );
    assert!(events_named(&env, symbol_short!("RWD_PAID")).is_empty());
}

// ── Failed calls publish nothing ─────────────────────────────────────────────

#[test]
fn test_failed_deposit_publishes_nothing() {
    let (env, client, _admin, stake_token) = setup_started();
    let staker = Address::generate(&env);
    StellarAssetClient::new(&env, &stake_token).mint(&staker, &5);

    set_block(&env, 3);
    match client.try_deposit(&staker, &0, &10) {
        Err(Ok(e)) => assert_eq!(e, ContractError::TransferFailed),
        _ => unreachable!("Expected TransferFailed error"),
    }
    assert!(events_named(&env, symbol_short!("DEPOSIT")).is_empty());
    assert!(events_named(&env, symbol_short!("RWD_PAID")).is_empty());
}

#[test]
fn test_failed_payout_publishes_nothing() {
    let (env, client, admin, stake_token) = setup_started();
    let staker = stake(&env, &client, &stake_token, 10);
    client.withdraw_residual(&admin, &admin);

    set_block(&env, 4);
    match client.try_withdraw(&staker, &0, &10) {
        Err(Ok(e)) => assert_eq!(e, ContractError::TransferFailed),
        _ => unreachable!("Expected TransferFailed error"),
    }
    assert!(events_named(&env, symbol_short!("RWD_PAID")).is_empty());
    assert!(events_named(&env, symbol_short!("WITHDRAW")).is_empty());
}
