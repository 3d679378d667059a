#![no_std]

pub mod events;
pub mod pool;
pub mod position;
pub mod rewards;
pub mod schedule;

use common::roles::{self, Role};
use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, token, Address, Env, Symbol, Vec,
};

pub use pool::PoolInfo;
pub use position::UserPosition;
pub use schedule::Epoch;

use pool::Emission;

// ── Storage key constants ────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const REWARD_TOKEN: Symbol = symbol_short!("RWD_TOK");
const SCHEDULE: Symbol = symbol_short!("SCHEDULE");
const START_BLOCK: Symbol = symbol_short!("START_BLK");
const TOTAL_WEIGHT: Symbol = symbol_short!("TOT_WGT");

const INSTANCE_TTL_THRESHOLD: u32 = 518_400;
const INSTANCE_TTL_EXTEND_TO: u32 = 1_036_800;

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidInput = 4,
    NotFound = 5,
    InsufficientStake = 6,
    TransferFailed = 7,
    Overflow = 8,
}

// ── Public-facing types ──────────────────────────────────────────────────────

/// Snapshot of the global counters returned by `get_global_state`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GlobalState {
    pub started: bool,
    /// Meaningful only once `started` is true.
    pub start_block: u32,
    pub total_weight: u64,
    pub pool_count: u32,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct MasterChefContract;

#[contractimpl]
impl MasterChefContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Configure the contract.
    ///
    /// * `admin`            – first holder of the `Admin` role.
    /// * `reward_token`     – token paid out to stakers; the contract must be
    ///                        funded with it separately.
    /// * `rates`            – reward units emitted **per block**, one per epoch.
    /// * `epoch_end_blocks` – strictly increasing end heights, one per epoch.
    ///                        The last one is a hard emission cutoff.
    pub fn initialize(
        env: Env,
        admin: Address,
        reward_token: Address,
        rates: Vec<i128>,
        epoch_end_blocks: Vec<u32>,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }
        let epochs =
            schedule::build(&env, &rates, &epoch_end_blocks).ok_or(ContractError::InvalidInput)?;

        env.storage().instance().set(&INITIALIZED, &true);
        env.storage().instance().set(&REWARD_TOKEN, &reward_token);
        env.storage().instance().set(&SCHEDULE, &epochs);
        env.storage().instance().set(&TOTAL_WEIGHT, &0u64);
        Self::extend_instance(&env);

        roles::set_role(&env, Role::Admin, &admin);

        events::publish_initialized(&env, admin, reward_token, epochs);

        Ok(())
    }

    /// Schedule emissions to begin at the current block plus `start_offset`.
    /// Can only happen once.
    pub fn init(env: Env, caller: Address, start_offset: u32) -> Result<u32, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        if env.storage().instance().has(&START_BLOCK) {
            return Err(ContractError::AlreadyInitialized);
        }

        let start_block = env.ledger().sequence().saturating_add(start_offset);
        env.storage().instance().set(&START_BLOCK, &start_block);
        Self::extend_instance(&env);

        events::publish_started(&env, start_block);

        Ok(start_block)
    }

    // ── Pool administration ─────────────────────────────────────────────────

    /// Register a new pool for `staking_token` and return its index.
    ///
    /// With `with_update` every existing pool is settled first, so blocks
    /// already elapsed are paid at the weights that were in force for them.
    pub fn add_pool(
        env: Env,
        caller: Address,
        weight: u64,
        staking_token: Address,
        with_update: bool,
    ) -> Result<u32, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        let current = env.ledger().sequence();
        if with_update {
            Self::settle_all(&env, current)?;
        }

        let last_settled_block = match Self::start_block(&env) {
            Some(start) if start > current => start,
            _ => current,
        };

        let total_weight = Self::total_weight(&env)
            .checked_add(weight)
            .ok_or(ContractError::Overflow)?;
        env.storage().instance().set(&TOTAL_WEIGHT, &total_weight);

        let pool_id = pool::push(
            &env,
            &PoolInfo {
                staking_token: staking_token.clone(),
                weight,
                last_settled_block,
                acc_reward_per_share: 0,
                pool_supply: 0,
            },
        );
        Self::extend_instance(&env);

        events::publish_pool_added(&env, pool_id, staking_token, weight, total_weight);

        Ok(pool_id)
    }

    /// Change a pool's weight. Past accrual is not rewritten; spans not yet
    /// settled are paid at the new weights unless `with_update` settles
    /// every pool first.
    pub fn set_weight(
        env: Env,
        caller: Address,
        pool_id: u32,
        weight: u64,
        with_update: bool,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        if with_update {
            Self::settle_all(&env, env.ledger().sequence())?;
        }

        // Loaded after settling so the accumulator is current.
        let mut info = pool::load(&env, pool_id).ok_or(ContractError::NotFound)?;
        let old_weight = info.weight;
        let total_weight = Self::total_weight(&env)
            .saturating_sub(old_weight)
            .checked_add(weight)
            .ok_or(ContractError::Overflow)?;

        info.weight = weight;
        pool::store(&env, pool_id, &info);
        env.storage().instance().set(&TOTAL_WEIGHT, &total_weight);
        Self::extend_instance(&env);

        events::publish_pool_weight_set(&env, pool_id, old_weight, weight, total_weight);

        Ok(())
    }

    /// Settle one pool up to the current block and return its new state.
    pub fn update_pool(env: Env, pool_id: u32) -> Result<PoolInfo, ContractError> {
        Self::require_initialized(&env)?;

        let current = env.ledger().sequence();
        let mut info = pool::load(&env, pool_id).ok_or(ContractError::NotFound)?;
        if pool::settle(&mut info, &Self::emission(&env), current)? {
            pool::store(&env, pool_id, &info);
        }
        Ok(info)
    }

    /// Settle every pool up to the current block.
    pub fn mass_update_pools(env: Env) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        Self::settle_all(&env, env.ledger().sequence())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` staking tokens into `pool_id`, first paying out any
    /// reward already earned. A zero amount only harvests.
    ///
    /// Returns the reward paid out.
    pub fn deposit(
        env: Env,
        staker: Address,
        pool_id: u32,
        amount: i128,
    ) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        if amount < 0 {
            return Err(ContractError::InvalidInput);
        }

        // 1. Settle the pool before reading its accumulator.
        let mut info = Self::load_settled(&env, pool_id)?;
        let mut position = position::load(&env, pool_id, &staker);

        // 2. Pay out what the existing stake earned.
        let paid = position.pending(info.acc_reward_per_share)?;
        Self::pay_reward(&env, pool_id, &staker, paid)?;

        // 3. Pull the new stake and grow position and supply.
        if amount > 0 {
            Self::transfer(
                &env,
                &info.staking_token,
                &staker,
                &env.current_contract_address(),
                amount,
            )?;
            position.amount = position
                .amount
                .checked_add(amount)
                .ok_or(ContractError::Overflow)?;
            info.pool_supply = info
                .pool_supply
                .checked_add(amount)
                .ok_or(ContractError::Overflow)?;
        }

        // 4. Reset the debt against the new amount.
        position.checkpoint(info.acc_reward_per_share)?;

        pool::store(&env, pool_id, &info);
        position::store(&env, pool_id, &staker, &position);

        if amount > 0 {
            events::publish_deposit(&env, pool_id, staker, amount, info.pool_supply);
        }

        Ok(paid)
    }

    /// Withdraw `amount` staking tokens from `pool_id`, paying out earned
    /// reward first. A zero amount only harvests.
    ///
    /// Returns the reward paid out.
    pub fn withdraw(
        env: Env,
        staker: Address,
        pool_id: u32,
        amount: i128,
    ) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        if amount < 0 {
            return Err(ContractError::InvalidInput);
        }

        let mut position = position::load(&env, pool_id, &staker);
        let mut info = Self::load_settled(&env, pool_id)?;
        if amount > position.amount {
            return Err(ContractError::InsufficientStake);
        }

        let paid = position.pending(info.acc_reward_per_share)?;
        Self::pay_reward(&env, pool_id, &staker, paid)?;

        if amount > 0 {
            position.amount = position.amount.saturating_sub(amount);
            info.pool_supply = info.pool_supply.saturating_sub(amount);
            Self::transfer(
                &env,
                &info.staking_token,
                &env.current_contract_address(),
                &staker,
                amount,
            )?;
        }

        position.checkpoint(info.acc_reward_per_share)?;

        pool::store(&env, pool_id, &info);
        position::store(&env, pool_id, &staker, &position);

        if amount > 0 {
            events::publish_withdraw(&env, pool_id, staker, amount, info.pool_supply);
        }

        Ok(paid)
    }

    /// Pay out earned reward without changing the stake.
    pub fn collect_rewards(env: Env, staker: Address, pool_id: u32) -> Result<i128, ContractError> {
        Self::withdraw(env, staker, pool_id, 0)
    }

    /// Return the whole stake immediately without settling, forfeiting any
    /// unclaimed reward. Works even when reward payouts are failing.
    ///
    /// Returns the stake returned.
    pub fn emergency_withdraw(
        env: Env,
        staker: Address,
        pool_id: u32,
    ) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        let mut info = pool::load(&env, pool_id).ok_or(ContractError::NotFound)?;
        let position = position::load(&env, pool_id, &staker);
        let amount = position.amount;

        info.pool_supply = info.pool_supply.saturating_sub(amount);
        pool::store(&env, pool_id, &info);
        position::store(&env, pool_id, &staker, &UserPosition::default());

        if amount > 0 {
            Self::transfer(
                &env,
                &info.staking_token,
                &env.current_contract_address(),
                &staker,
                amount,
            )?;
        }

        events::publish_emergency_withdraw(&env, pool_id, staker, amount);

        Ok(amount)
    }

    // ── Fund recovery ───────────────────────────────────────────────────────

    /// Send the contract's entire reward-token balance to `recipient`,
    /// regardless of what stakers are still owed.
    pub fn withdraw_residual(
        env: Env,
        caller: Address,
        recipient: Address,
    ) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        let reward_token = Self::get_reward_token(env.clone())?;
        let contract = env.current_contract_address();
        let balance = token::TokenClient::new(&env, &reward_token).balance(&contract);

        if balance > 0 {
            Self::transfer(&env, &reward_token, &contract, &recipient, balance)?;
        }

        events::publish_residual_withdrawn(&env, recipient, balance);

        Ok(balance)
    }

    // ── Role management ─────────────────────────────────────────────────────

    /// Grant `role` to `account`. Only a current holder of `role` may call this.
    pub fn grant_role(
        env: Env,
        caller: Address,
        role: Role,
        account: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if !roles::grant_role(&env, &caller, role, &account) {
            return Err(ContractError::Unauthorized);
        }
        events::publish_role_granted(&env, role, account, caller);
        Ok(())
    }

    /// Revoke `role` from `account`. Only a current holder of `role` may call
    /// this, and holders may revoke themselves.
    pub fn revoke_role(
        env: Env,
        caller: Address,
        role: Role,
        account: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if !roles::revoke_role(&env, &caller, role, &account) {
            return Err(ContractError::Unauthorized);
        }
        events::publish_role_revoked(&env, role, account, caller);
        Ok(())
    }

    pub fn has_role(env: Env, role: Role, account: Address) -> bool {
        roles::has_role(&env, role, &account)
    }

    pub fn get_role_members(env: Env, role: Role) -> Vec<Address> {
        roles::members(&env, role)
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Reward `staker` would receive from `pool_id` if they collected at the
    /// current block. Nothing is persisted.
    pub fn pending_reward(env: Env, pool_id: u32, staker: Address) -> Result<i128, ContractError> {
        let mut info = pool::read(&env, pool_id).ok_or(ContractError::NotFound)?;
        pool::settle(&mut info, &Self::emission(&env), env.ledger().sequence())?;
        position::read(&env, pool_id, &staker).pending(info.acc_reward_per_share)
    }

    /// Stored pool state, as of the pool's last settlement.
    pub fn get_pool_info(env: Env, pool_id: u32) -> Result<PoolInfo, ContractError> {
        pool::read(&env, pool_id).ok_or(ContractError::NotFound)
    }

    pub fn get_user_info(
        env: Env,
        pool_id: u32,
        staker: Address,
    ) -> Result<UserPosition, ContractError> {
        if pool::read(&env, pool_id).is_none() {
            return Err(ContractError::NotFound);
        }
        Ok(position::read(&env, pool_id, &staker))
    }

    pub fn pool_length(env: Env) -> u32 {
        pool::count(&env)
    }

    pub fn get_total_weight(env: Env) -> u64 {
        Self::total_weight(&env)
    }

    pub fn get_start_block(env: Env) -> Option<u32> {
        Self::start_block(&env)
    }

    pub fn is_started(env: Env) -> bool {
        env.storage().instance().has(&START_BLOCK)
    }

    pub fn get_global_state(env: Env) -> GlobalState {
        let start_block = Self::start_block(&env);
        GlobalState {
            started: start_block.is_some(),
            start_block: start_block.unwrap_or(0),
            total_weight: Self::total_weight(&env),
            pool_count: pool::count(&env),
        }
    }

    pub fn get_reward_token(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&REWARD_TOKEN)
            .ok_or(ContractError::NotInitialized)
    }

    pub fn get_schedule(env: Env) -> Vec<Epoch> {
        Self::epochs(&env)
    }

    /// Total emission across all pools for blocks `[from_block, to_block)`.
    /// Zero until emissions have been started.
    pub fn get_multiplier(env: Env, from_block: u32, to_block: u32) -> i128 {
        match Self::start_block(&env) {
            Some(start) => schedule::emission_between(&Self::epochs(&env), start, from_block, to_block),
            None => 0,
        }
    }

    /// Total emission of one epoch over its whole span. Before emissions
    /// start the first epoch is measured from block zero.
    pub fn total_emission_for_epoch(env: Env, epoch_index: u32) -> Result<i128, ContractError> {
        let start = Self::start_block(&env).unwrap_or(0);
        schedule::epoch_emission(&Self::epochs(&env), start, epoch_index)
            .ok_or(ContractError::NotFound)
    }

    /// Emission a pool of `weight` would earn over `[from_block, to_block)`
    /// against the current global weight.
    pub fn accumulated_reward_at_rate(
        env: Env,
        from_block: u32,
        to_block: u32,
        weight: u64,
    ) -> Result<i128, ContractError> {
        Self::emission(&env).pool_reward(from_block, to_block, weight)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// Guard: revert if the contract is not yet initialized.
    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    /// Guard: revert if `caller` does not hold the `Admin` role.
    fn require_admin(env: &Env, caller: &Address) -> Result<(), ContractError> {
        if !roles::require_role(env, caller, Role::Admin) {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    fn extend_instance(env: &Env) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND_TO);
    }

    fn epochs(env: &Env) -> Vec<Epoch> {
        env.storage()
            .instance()
            .get(&SCHEDULE)
            .unwrap_or(Vec::new(env))
    }

    fn start_block(env: &Env) -> Option<u32> {
        env.storage().instance().get(&START_BLOCK)
    }

    fn total_weight(env: &Env) -> u64 {
        env.storage().instance().get(&TOTAL_WEIGHT).unwrap_or(0)
    }

    fn emission(env: &Env) -> Emission {
        Emission {
            epochs: Self::epochs(env),
            start_block: Self::start_block(env),
            total_weight: Self::total_weight(env),
        }
    }

    /// Load `pool_id` and settle it in memory up to the current block.
    /// The caller decides whether the result is persisted.
    fn load_settled(env: &Env, pool_id: u32) -> Result<PoolInfo, ContractError> {
        let mut info = pool::load(env, pool_id).ok_or(ContractError::NotFound)?;
        pool::settle(&mut info, &Self::emission(env), env.ledger().sequence())?;
        Ok(info)
    }

    fn settle_all(env: &Env, current: u32) -> Result<(), ContractError> {
        let emission = Self::emission(env);
        for pool_id in 0..pool::count(env) {
            if let Some(mut info) = pool::load(env, pool_id) {
                if pool::settle(&mut info, &emission, current)? {
                    pool::store(env, pool_id, &info);
                }
            }
        }
        Ok(())
    }

    /// Transfer reward tokens owed to `staker`. Nothing happens for zero.
    fn pay_reward(
        env: &Env,
        pool_id: u32,
        staker: &Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        if amount <= 0 {
            return Ok(());
        }
        let reward_token = Self::get_reward_token(env.clone())?;
        Self::transfer(
            env,
            &reward_token,
            &env.current_contract_address(),
            staker,
            amount,
        )?;
        events::publish_reward_paid(env, pool_id, staker.clone(), amount);
        Ok(())
    }

    /// Token transfer that reports a rejected transfer as `TransferFailed`
    /// instead of trapping.
    fn transfer(
        env: &Env,
        token_id: &Address,
        from: &Address,
        to: &Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        match token::TokenClient::new(env, token_id).try_transfer(from, to, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => Err(ContractError::TransferFailed),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_events;
