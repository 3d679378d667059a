use soroban_sdk::{contracttype, Env, Vec};

/// Upper bound on the number of emission epochs.
pub const MAX_EPOCHS: u32 = 3;

/// One constant-rate segment of the emission schedule.
///
/// An epoch covers every block below `end_block` and at or above the previous
/// epoch's `end_block` (the first epoch starts at the global start block).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Epoch {
    /// Reward-token units emitted per block.
    pub rate: i128,
    /// First block height no longer covered by this epoch.
    pub end_block: u32,
}

/// Pair `rates` with `end_blocks` into a validated schedule.
///
/// Returns `None` unless both lists have the same length between 1 and
/// `MAX_EPOCHS`, every rate is non-negative, end heights strictly increase,
/// and the whole schedule's emission from block zero fits in an `i128`.
pub fn build(env: &Env, rates: &Vec<i128>, end_blocks: &Vec<u32>) -> Option<Vec<Epoch>> {
    let len = rates.len();
    if len == 0 || len > MAX_EPOCHS || len != end_blocks.len() {
        return None;
    }

    let mut epochs = Vec::new(env);
    let mut previous_end: Option<u32> = None;
    let mut total: i128 = 0;
    for (rate, end_block) in rates.iter().zip(end_blocks.iter()) {
        if rate < 0 {
            return None;
        }
        if matches!(previous_end, Some(prev) if end_block <= prev) {
            return None;
        }
        let blocks = end_block - previous_end.unwrap_or(0);
        total = total.checked_add(rate.checked_mul(blocks as i128)?)?;
        previous_end = Some(end_block);
        epochs.push_back(Epoch { rate, end_block });
    }
    Some(epochs)
}

/// Hard cutoff: no block at or beyond this height emits anything.
pub fn final_block(epochs: &Vec<Epoch>) -> u32 {
    epochs.last().map(|e| e.end_block).unwrap_or(0)
}

/// Total reward emitted over the half-open block range `[from, to)`.
///
/// Blocks before `start_block` and at or after the final cutoff contribute
/// nothing. An empty or inverted range yields zero. Schedules from `build`
/// never reach the saturation bound.
#[allow(clippy::arithmetic_side_effects)]
pub fn emission_between(epochs: &Vec<Epoch>, start_block: u32, from: u32, to: u32) -> i128 {
    let from = from.max(start_block);
    if from >= to {
        return 0;
    }

    let mut total: i128 = 0;
    let mut lower: u32 = 0;
    for epoch in epochs.iter() {
        if from < epoch.end_block {
            let span_start = from.max(lower);
            let span_end = to.min(epoch.end_block);
            if span_end > span_start {
                let blocks = (span_end - span_start) as i128;
                total = total.saturating_add(epoch.rate.saturating_mul(blocks));
            }
            if to <= epoch.end_block {
                break;
            }
        }
        lower = epoch.end_block;
    }
    total
}

/// Total reward the epoch at `index` emits over its whole span, given the
/// global `start_block`. `None` if there is no such epoch.
pub fn epoch_emission(epochs: &Vec<Epoch>, start_block: u32, index: u32) -> Option<i128> {
    let epoch = epochs.get(index)?;
    let lower = match index.checked_sub(1) {
        Some(prev) => epochs.get(prev)?.end_block,
        None => 0,
    };
    Some(emission_between(epochs, start_block, lower, epoch.end_block))
}
