use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use crate::rewards;
use crate::schedule::{self, Epoch};
use crate::ContractError;

const POOL: Symbol = symbol_short!("POOL");
const POOL_COUNT: Symbol = symbol_short!("POOL_CNT");

const TTL_THRESHOLD: u32 = 518_400;
const TTL_EXTEND_TO: u32 = 1_036_800;

/// A staking bucket bound to one staking token.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolInfo {
    pub staking_token: Address,
    /// Share of global emission relative to the sum of all pool weights.
    pub weight: u64,
    pub last_settled_block: u32,
    /// Reward per staked unit, scaled by `rewards::PRECISION`.
    pub acc_reward_per_share: i128,
    pub pool_supply: i128,
}

/// Everything settlement needs besides the pool itself.
pub struct Emission {
    pub epochs: Vec<Epoch>,
    /// `None` until the admin starts emissions.
    pub start_block: Option<u32>,
    pub total_weight: u64,
}

impl Emission {
    /// Reward owed to a pool of `weight` for blocks `[from, to)`.
    pub fn pool_reward(&self, from: u32, to: u32, weight: u64) -> Result<i128, ContractError> {
        let Some(start) = self.start_block else {
            return Ok(0);
        };
        let total = schedule::emission_between(&self.epochs, start, from, to);
        rewards::pool_share(total, weight, self.total_weight).ok_or(ContractError::Overflow)
    }
}

/// Bring `pool` up to `current_block`.
///
/// Returns `false` and leaves the pool untouched when `current_block` is not
/// past its last settlement. An empty pool only moves its clock forward so it
/// can never claim emission for blocks in which it held no stake.
///
/// Fails with `Overflow`, leaving the pool untouched, if the accumulator can
/// no longer be represented.
pub fn settle(
    pool: &mut PoolInfo,
    emission: &Emission,
    current_block: u32,
) -> Result<bool, ContractError> {
    if current_block <= pool.last_settled_block {
        return Ok(false);
    }
    if pool.pool_supply > 0 {
        let reward = emission.pool_reward(pool.last_settled_block, current_block, pool.weight)?;
        pool.acc_reward_per_share =
            rewards::accumulate(pool.acc_reward_per_share, reward, pool.pool_supply)
                .ok_or(ContractError::Overflow)?;
    }
    pool.last_settled_block = current_block;
    Ok(true)
}

// ── Storage ──────────────────────────────────────────────────────────────────

fn pool_key(pool_id: u32) -> (Symbol, u32) {
    (POOL, pool_id)
}

pub fn count(env: &Env) -> u32 {
    env.storage().instance().get(&POOL_COUNT).unwrap_or(0)
}

/// Read a pool without touching its TTL. Used by queries.
pub fn read(env: &Env, pool_id: u32) -> Option<PoolInfo> {
    env.storage().persistent().get(&pool_key(pool_id))
}

/// Read a pool and extend its TTL. Used by state-changing calls.
pub fn load(env: &Env, pool_id: u32) -> Option<PoolInfo> {
    let key = pool_key(pool_id);
    let pool = read(env, pool_id);
    if pool.is_some() {
        env.storage()
            .persistent()
            .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
    pool
}

pub fn store(env: &Env, pool_id: u32, pool: &PoolInfo) {
    let key = pool_key(pool_id);
    env.storage().persistent().set(&key, pool);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Append `pool` to the registry and return its index.
pub fn push(env: &Env, pool: &PoolInfo) -> u32 {
    let pool_id = count(env);
    store(env, pool_id, pool);
    env.storage().instance().set(&POOL_COUNT, &(pool_id + 1));
    pool_id
}
