/// Fixed-point scaling factor for `acc_reward_per_share` and `reward_debt`.
///
/// Every division in this module floors. The fractional remainder of a
/// settlement stays unallocated in the pool's reward stream rather than being
/// credited to anyone, so an individual collection can come up short by less
/// than one base unit but nothing is ever paid twice.
pub const PRECISION: i128 = 1_000_000_000_000;

// ── Core reward engine ──────────────────────────────────────────────────────
//
// Every function returns `None` when the exact result does not fit in an
// `i128`. Callers surface that as `ContractError::Overflow` and abort.

/// `floor(a × b / d)` for non-negative `a`, `b` and positive `d`, without
/// forming the full product.
///
/// ```text
/// a = q·d + r,  b = s·d + t
/// a × b / d = q·b + r·s + (r·t) / d
/// ```
///
/// Exact for every representable result while `d` is below 2^63.
#[allow(clippy::arithmetic_side_effects)]
pub fn mul_div(a: i128, b: i128, d: i128) -> Option<i128> {
    if a < 0 || b < 0 || d <= 0 {
        return None;
    }
    let (q, r) = (a / d, a % d);
    let (s, t) = (b / d, b % d);
    q.checked_mul(b)?
        .checked_add(r.checked_mul(s)?)?
        .checked_add(r.checked_mul(t)? / d)
}

/// Share of `total_reward` owed to a pool of `weight` out of `total_weight`.
///
/// ```text
/// pool_reward = total_reward × weight / total_weight
/// ```
///
/// A zero `total_weight` means no pool is entitled to emission.
pub fn pool_share(total_reward: i128, weight: u64, total_weight: u64) -> Option<i128> {
    if total_weight == 0 || total_reward <= 0 {
        return Some(0);
    }
    mul_div(total_reward, weight as i128, total_weight as i128)
}

/// Advance an accumulator by `reward` spread over `supply` staked units.
///
/// ```text
/// new_acc = acc + reward × PRECISION / supply
/// ```
///
/// When `supply` is zero we return `acc` unchanged.
pub fn accumulate(acc: i128, reward: i128, supply: i128) -> Option<i128> {
    if supply <= 0 {
        return Some(acc);
    }
    acc.checked_add(mul_div(reward, PRECISION, supply)?)
}

/// Total reward attributable to `amount` at accumulator value `acc`.
///
/// This is also the reward debt recorded after every stake change.
pub fn accrued(amount: i128, acc: i128) -> Option<i128> {
    mul_div(amount, acc, PRECISION)
}

/// Reward earned by a position since it last settled.
///
/// ```text
/// pending = amount × acc / PRECISION − reward_debt
/// ```
///
/// Floored at zero; a negative value can only come from corrupted state.
pub fn pending(amount: i128, acc: i128, reward_debt: i128) -> Option<i128> {
    Some(accrued(amount, acc)?.checked_sub(reward_debt)?.max(0))
}

// ── Unit tests ──────────────────────────────────────────────────────────────
// Pure-math tests with no Soroban environment dependency.
