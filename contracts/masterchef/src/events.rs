#![allow(deprecated)] // events().publish migration tracked separately

use common::roles::Role;
use soroban_sdk::{symbol_short, Address, Env, Vec};

use crate::schedule::Epoch;

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the contract is configured.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub reward_token: Address,
    pub epochs: Vec<Epoch>,
    pub block: u32,
}

/// Fired once when emissions are scheduled to begin.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StartedEvent {
    pub start_block: u32,
    pub block: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolAddedEvent {
    pub pool_id: u32,
    pub staking_token: Address,
    pub weight: u64,
    pub total_weight: u64,
    pub block: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolWeightSetEvent {
    pub pool_id: u32,
    pub old_weight: u64,
    pub new_weight: u64,
    pub total_weight: u64,
    pub block: u32,
}

/// Fired when a participant adds stake. A zero-amount deposit only
/// harvests and publishes `RewardPaidEvent` alone.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositEvent {
    pub pool_id: u32,
    pub staker: Address,
    pub amount: i128,
    pub new_pool_supply: i128,
    pub block: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawEvent {
    pub pool_id: u32,
    pub staker: Address,
    pub amount: i128,
    pub new_pool_supply: i128,
    pub block: u32,
}

/// Fired whenever accrued reward is transferred to a participant.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardPaidEvent {
    pub pool_id: u32,
    pub staker: Address,
    pub amount: i128,
    pub block: u32,
}

/// Fired when a participant exits without settling rewards.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyWithdrawEvent {
    pub pool_id: u32,
    pub staker: Address,
    pub amount: i128,
    pub block: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResidualWithdrawnEvent {
    pub recipient: Address,
    pub amount: i128,
    pub block: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoleChangedEvent {
    pub role: Role,
    pub account: Address,
    pub sender: Address,
    pub block: u32,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(env: &Env, admin: Address, reward_token: Address, epochs: Vec<Epoch>) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            reward_token,
            epochs,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_started(env: &Env, start_block: u32) {
    env.events().publish(
        (symbol_short!("STARTED"),),
        StartedEvent {
            start_block,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_pool_added(
    env: &Env,
    pool_id: u32,
    staking_token: Address,
    weight: u64,
    total_weight: u64,
) {
    env.events().publish(
        (symbol_short!("POOL_ADD"), pool_id),
        PoolAddedEvent {
            pool_id,
            staking_token,
            weight,
            total_weight,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_pool_weight_set(
    env: &Env,
    pool_id: u32,
    old_weight: u64,
    new_weight: u64,
    total_weight: u64,
) {
    env.events().publish(
        (symbol_short!("POOL_SET"), pool_id),
        PoolWeightSetEvent {
            pool_id,
            old_weight,
            new_weight,
            total_weight,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_deposit(env: &Env, pool_id: u32, staker: Address, amount: i128, new_pool_supply: i128) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), pool_id, staker.clone()),
        DepositEvent {
            pool_id,
            staker,
            amount,
            new_pool_supply,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_withdraw(env: &Env, pool_id: u32, staker: Address, amount: i128, new_pool_supply: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAW"), pool_id, staker.clone()),
        WithdrawEvent {
            pool_id,
            staker,
            amount,
            new_pool_supply,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_reward_paid(env: &Env, pool_id: u32, staker: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("RWD_PAID"), pool_id, staker.clone()),
        RewardPaidEvent {
            pool_id,
            staker,
            amount,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_emergency_withdraw(env: &Env, pool_id: u32, staker: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("EMRG_WD"), pool_id, staker.clone()),
        EmergencyWithdrawEvent {
            pool_id,
            staker,
            amount,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_residual_withdrawn(env: &Env, recipient: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("RESIDUAL"), recipient.clone()),
        ResidualWithdrawnEvent {
            recipient,
            amount,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_role_granted(env: &Env, role: Role, account: Address, sender: Address) {
    env.events().publish(
        (symbol_short!("ROLE_GRNT"), account.clone()),
        RoleChangedEvent {
            role,
            account,
            sender,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_role_revoked(env: &Env, role: Role, account: Address, sender: Address) {
    env.events().publish(
        (symbol_short!("ROLE_RVKD"), account.clone()),
        RoleChangedEvent {
            role,
            account,
            sender,
            block: env.ledger().sequence(),
        },
    );
}
