//! Batch distribution for parallel trials.
//!
//! Trials are split into more batches than threads so uneven fight lengths balance out.

use rayon::prelude::*;

use crate::combat::engine::FighterTemplate;
use crate::parallel::pool::WorkerPool;
use crate::simulator::monte_carlo::{run_trial_range, TrialAggregate};

const BATCHES_PER_THREAD: usize = 4;

/// Split `total` items into up to `num_batches` ranges `[start, end)`.
/// Batches are as equal in size as possible; later batches may be smaller.
///
/// # Example
/// ```
/// # use duelsim::parallel::batch_ranges;
/// let ranges = batch_ranges(100, 4);
/// assert_eq!(ranges, vec![(0, 25), (25, 50), (50, 75), (75, 100)]);
/// ```
pub fn batch_ranges(total: usize, num_batches: usize) -> Vec<(usize, usize)> {
    if total == 0 || num_batches == 0 {
        return Vec::new();
    }
    let num_batches = num_batches.min(total);
    let base = total / num_batches;
    let remainder = total % num_batches;
    let mut ranges = Vec::with_capacity(num_batches);
    let mut start = 0;
    for i in 0..num_batches {
        let size = base + if i < remainder { 1 } else { 0 };
        let end = start + size;
        ranges.push((start, end));
        start = end;
    }
    ranges
}

/// Runs `trials` fights in batches on `pool` and folds the partial aggregates.
/// Each batch owns its trial indices, so the result matches a sequential run.
pub fn run_trial_batches(
    attacker: &FighterTemplate,
    defender: &FighterTemplate,
    trials: u32,
    base_seed: u64,
    pool: &WorkerPool,
) -> TrialAggregate {
    let total = u64::from(trials);
    pool.install(|| {
        batch_ranges(trials as usize, rayon::current_num_threads() * BATCHES_PER_THREAD)
            .into_par_iter()
            .map(|(start, end)| {
                run_trial_range(attacker, defender, start as u64..end as u64, total, base_seed)
            })
            .reduce(TrialAggregate::default, TrialAggregate::merge)
    })
}
