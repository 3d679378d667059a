use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

// ── Storage Keys ─────────────────────────────────────────────────────────────

const ROLE_PREFIX: Symbol = symbol_short!("ROLE");
const ROLE_LIST: Symbol = symbol_short!("ROLE_LST");

const TTL_THRESHOLD: u32 = 518_400;
const TTL_EXTEND_TO: u32 = 1_036_800;

// ── Role Enum ────────────────────────────────────────────────────────────────

/// Roles recognised by the access guard.
///
/// - `Admin` – may start emissions, add and reweight pools, recover the
///             residual reward balance, and grant or revoke `Admin` itself.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Role {
    Admin = 1,
}

// ── Storage Helpers ──────────────────────────────────────────────────────────

fn role_key(role: Role, account: &Address) -> (Symbol, Role, Address) {
    (ROLE_PREFIX, role, account.clone())
}

fn list_key(role: Role) -> (Symbol, Role) {
    (ROLE_LIST, role)
}

fn extend_ttl<K>(env: &Env, key: &K)
where
    K: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
{
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

// ── Core Functions ───────────────────────────────────────────────────────────

/// Returns true if `account` currently holds `role`.
pub fn has_role(env: &Env, role: Role, account: &Address) -> bool {
    let key = role_key(role, account);
    let held = env.storage().persistent().has(&key);
    if held {
        extend_ttl(env, &key);
    }
    held
}

/// Authorization check run at the top of every gated operation.
///
/// Returns `false` if `caller` does not hold `role`. The caller must have
/// already been authenticated via `require_auth()`.
pub fn require_role(env: &Env, caller: &Address, role: Role) -> bool {
    has_role(env, role, caller)
}

/// Assigns `role` to `account` without any authorization check.
/// Only callable internally; used to bootstrap the first holder.
pub fn set_role(env: &Env, role: Role, account: &Address) {
    let key = role_key(role, account);
    env.storage().persistent().set(&key, &true);
    extend_ttl(env, &key);
    track_member(env, role, account);
}

/// Removes `role` from `account` without any authorization check.
pub fn remove_role(env: &Env, role: Role, account: &Address) {
    env.storage().persistent().remove(&role_key(role, account));
    untrack_member(env, role, account);
}

// ── Grant / Revoke ───────────────────────────────────────────────────────────

/// Grants `role` to `target`.
///
/// Only a current holder of `role` may grant it. Returns `false` if the
/// caller does not hold it.
pub fn grant_role(env: &Env, caller: &Address, role: Role, target: &Address) -> bool {
    if !require_role(env, caller, role) {
        return false;
    }
    set_role(env, role, target);
    true
}

/// Revokes `role` from `target`.
///
/// Only a current holder of `role` may revoke it, and a holder may revoke
/// their own membership. Returns `false` if the caller does not hold it.
pub fn revoke_role(env: &Env, caller: &Address, role: Role, target: &Address) -> bool {
    if !require_role(env, caller, role) {
        return false;
    }
    remove_role(env, role, target);
    true
}

// ── Membership list ──────────────────────────────────────────────────────────

/// Returns every address currently holding `role`, in grant order.
pub fn members(env: &Env, role: Role) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(&list_key(role))
        .unwrap_or(Vec::new(env))
}

fn track_member(env: &Env, role: Role, account: &Address) {
    let key = list_key(role);
    let mut list = members(env, role);
    if !list.contains(account) {
        list.push_back(account.clone());
        env.storage().persistent().set(&key, &list);
    }
    extend_ttl(env, &key);
}

fn untrack_member(env: &Env, role: Role, account: &Address) {
    let key = list_key(role);
    let mut list = members(env, role);
    if let Some(index) = list.first_index_of(account) {
        list.remove(index);
        env.storage().persistent().set(&key, &list);
        extend_ttl(env, &key);
    }
}
