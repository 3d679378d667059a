use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::rewards;
use crate::ContractError;

const POSITION: Symbol = symbol_short!("POS");

const TTL_THRESHOLD: u32 = 518_400;
const TTL_EXTEND_TO: u32 = 1_036_800;

/// A participant's stake in one pool.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UserPosition {
    pub amount: i128,
    /// Portion of `amount × acc_reward_per_share` already paid out or
    /// forgone, scaled like the accumulator is after division.
    pub reward_debt: i128,
}

impl UserPosition {
    /// Reward earned since the last settlement at accumulator `acc`.
    pub fn pending(&self, acc: i128) -> Result<i128, ContractError> {
        rewards::pending(self.amount, acc, self.reward_debt).ok_or(ContractError::Overflow)
    }

    /// Mark everything accrued up to `acc` as paid for the current amount.
    pub fn checkpoint(&mut self, acc: i128) -> Result<(), ContractError> {
        self.reward_debt = rewards::accrued(self.amount, acc).ok_or(ContractError::Overflow)?;
        Ok(())
    }
}

fn position_key(pool_id: u32, staker: &Address) -> (Symbol, u32, Address) {
    (POSITION, pool_id, staker.clone())
}

/// Read a position without touching its TTL, defaulting to an empty one.
pub fn read(env: &Env, pool_id: u32, staker: &Address) -> UserPosition {
    env.storage()
        .persistent()
        .get(&position_key(pool_id, staker))
        .unwrap_or_default()
}

/// Load a position, defaulting to an empty one for first-time stakers.
pub fn load(env: &Env, pool_id: u32, staker: &Address) -> UserPosition {
    let key = position_key(pool_id, staker);
    match env.storage().persistent().get::<_, UserPosition>(&key) {
        Some(position) => {
            env.storage()
                .persistent()
                .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
            position
        }
        None => UserPosition::default(),
    }
}

pub fn store(env: &Env, pool_id: u32, staker: &Address, position: &UserPosition) {
    let key = position_key(pool_id, staker);
    env.storage().persistent().set(&key, position);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
