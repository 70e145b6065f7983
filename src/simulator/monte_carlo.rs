//! Repeated fights between two prepared fighters.
//!
//! Trial `i` always runs on seed `base_seed + i` and only the final trial keeps its battle log,
//! so any split of the trial range folds back into the same [TrialAggregate].

use std::collections::BTreeMap;
use std::ops::Range;

use serde::Serialize;
use tracing::{debug, info};

use crate::combat::engine::{simulate_fight, FightOutcome, FighterTemplate, Side, TraceMode};
use crate::data::config::SimulationRequest;
use crate::data::game_data::GameDataSource;
use crate::parallel::{run_trial_batches, WorkerPool};

/// Running totals over any range of trials.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrialAggregate {
    pub trials: u64,
    pub attacker_wins: u64,
    pub defender_wins: u64,
    pub stalemates: u64,
    pub total_rounds: u64,
    pub attacker_life_total: u64,
    pub defender_life_total: u64,
    /// Terminal attacker life -> fights ending there.
    pub attacker_life: BTreeMap<u32, u64>,
    pub defender_life: BTreeMap<u32, u64>,
    pub sample_log: Vec<String>,
    /// Trial index that produced `sample_log`.
    pub sample_trial: Option<u64>,
}

impl TrialAggregate {
    pub fn record(&mut self, trial: u64, outcome: &FightOutcome) {
        self.trials += 1;
        match outcome.winner {
            Some(Side::Attacker) => self.attacker_wins += 1,
            Some(Side::Defender) => self.defender_wins += 1,
            None => self.stalemates += 1,
        }
        self.total_rounds += u64::from(outcome.rounds);
        self.attacker_life_total += u64::from(outcome.attacker_life);
        self.defender_life_total += u64::from(outcome.defender_life);
        *self.attacker_life.entry(outcome.attacker_life).or_default() += 1;
        *self.defender_life.entry(outcome.defender_life).or_default() += 1;
        if !outcome.log.is_empty() && self.sample_trial.map_or(true, |kept| trial >= kept) {
            self.sample_log = outcome.log.iter().map(|e| e.message.clone()).collect();
            self.sample_trial = Some(trial);
        }
    }

    /// Folds `other` in. The sample log from the later trial wins.
    pub fn merge(mut self, other: Self) -> Self {
        self.trials += other.trials;
        self.attacker_wins += other.attacker_wins;
        self.defender_wins += other.defender_wins;
        self.stalemates += other.stalemates;
        self.total_rounds += other.total_rounds;
        self.attacker_life_total += other.attacker_life_total;
        self.defender_life_total += other.defender_life_total;
        for (life, count) in other.attacker_life {
            *self.attacker_life.entry(life).or_default() += count;
        }
        for (life, count) in other.defender_life {
            *self.defender_life.entry(life).or_default() += count;
        }
        if other.sample_trial > self.sample_trial {
            self.sample_log = other.sample_log;
            self.sample_trial = other.sample_trial;
        }
        self
    }

    fn rate(&self, count: u64) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            count as f64 / self.trials as f64
        }
    }

    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary {
            trials: self.trials,
            attacker_wins: self.attacker_wins,
            defender_wins: self.defender_wins,
            stalemates: self.stalemates,
            attacker_win_rate: self.rate(self.attacker_wins),
            defender_win_rate: self.rate(self.defender_wins),
            stalemate_rate: self.rate(self.stalemates),
            attacker_win_rate_95_ci: binomial_95_ci(self.attacker_wins, self.trials),
            average_rounds: self.rate(self.total_rounds),
            average_attacker_life: self.rate(self.attacker_life_total),
            average_defender_life: self.rate(self.defender_life_total),
            sample_log: self.sample_log.clone(),
            attacker_life: self.attacker_life.clone(),
            defender_life: self.defender_life.clone(),
        }
    }
}

/// Aggregate statistics handed to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationSummary {
    pub trials: u64,
    pub attacker_wins: u64,
    pub defender_wins: u64,
    pub stalemates: u64,
    pub attacker_win_rate: f64,
    pub defender_win_rate: f64,
    pub stalemate_rate: f64,
    pub attacker_win_rate_95_ci: [f64; 2],
    pub average_rounds: f64,
    pub average_attacker_life: f64,
    pub average_defender_life: f64,
    pub sample_log: Vec<String>,
    pub attacker_life: BTreeMap<u32, u64>,
    pub defender_life: BTreeMap<u32, u64>,
}

fn binomial_95_ci(wins: u64, n: u64) -> [f64; 2] {
    if n == 0 {
        return [0.0, 0.0];
    }
    let p = wins as f64 / n as f64;
    let z = 1.96;
    let se = (p * (1.0 - p) / n as f64).sqrt();
    [(p - z * se).max(0.0), (p + z * se).min(1.0)]
}

/// Runs trials `range` out of `total`.
pub fn run_trial_range(
    attacker: &FighterTemplate,
    defender: &FighterTemplate,
    range: Range<u64>,
    total: u64,
    base_seed: u64,
) -> TrialAggregate {
    let mut aggregate = TrialAggregate::default();
    for trial in range {
        let trace = if trial + 1 == total {
            TraceMode::Events
        } else {
            TraceMode::Off
        };
        let outcome = simulate_fight(attacker, defender, base_seed.wrapping_add(trial), trace);
        aggregate.record(trial, &outcome);
    }
    aggregate
}

pub fn run_trials(
    attacker: &FighterTemplate,
    defender: &FighterTemplate,
    trials: u32,
    base_seed: u64,
) -> TrialAggregate {
    let total = u64::from(trials);
    run_trial_range(attacker, defender, 0..total, total, base_seed)
}

/// Like [run_trials] but splits the trials into batches across the rayon pool.
pub fn run_trials_parallel(
    attacker: &FighterTemplate,
    defender: &FighterTemplate,
    trials: u32,
    base_seed: u64,
    pool: &WorkerPool,
) -> TrialAggregate {
    run_trial_batches(attacker, defender, trials, base_seed, pool)
}

/// Prepares both fighters against `data` and runs `request.trials` fights in parallel.
pub fn run_simulation(
    request: &SimulationRequest,
    data: &impl GameDataSource,
    seed: u64,
    pool: &WorkerPool,
) -> SimulationSummary {
    let attacker = FighterTemplate::prepare(&request.attacker, data);
    let defender = FighterTemplate::prepare(&request.defender, data);
    debug!(
        attacker = %attacker.name,
        defender = %defender.name,
        trials = request.trials,
        seed,
        "starting simulation"
    );
    let summary = run_trials_parallel(&attacker, &defender, request.trials, seed, pool).summary();
    info!(
        trials = summary.trials,
        attacker_win_rate = summary.attacker_win_rate,
        average_rounds = summary.average_rounds,
        "simulation finished"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::engine::BattleEvent;

    fn outcome(attacker_life: u32, defender_life: u32, logged: bool) -> FightOutcome {
        let winner = match (attacker_life, defender_life) {
            (_, 0) => Some(Side::Attacker),
            (0, _) => Some(Side::Defender),
            _ => None,
        };
        FightOutcome {
            attacker_life,
            defender_life,
            rounds: 3,
            winner,
            log: if logged {
                vec![BattleEvent {
                    round: 1,
                    actor: Side::Attacker,
                    message: "A hit B".into(),
                }]
            } else {
                Vec::new()
            },
        }
    }

    #[test]
    fn record_counts_outcomes_and_histograms() {
        let mut aggregate = TrialAggregate::default();
        aggregate.record(0, &outcome(100, 0, false));
        aggregate.record(1, &outcome(0, 50, false));
        aggregate.record(2, &outcome(100, 50, true));
        assert_eq!(aggregate.trials, 3);
        assert_eq!(
            (aggregate.attacker_wins, aggregate.defender_wins, aggregate.stalemates),
            (1, 1, 1)
        );
        assert_eq!(aggregate.attacker_life.get(&100), Some(&2));
        assert_eq!(aggregate.defender_life.get(&0), Some(&1));
        assert_eq!(aggregate.sample_log, vec!["A hit B".to_string()]);
        assert_eq!(aggregate.sample_trial, Some(2));

        let summary = aggregate.summary();
        assert!((summary.attacker_win_rate - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(summary.average_rounds, 3.0);
        assert!(summary.attacker_win_rate_95_ci[0] <= summary.attacker_win_rate);
    }

    #[test]
    fn merge_keeps_the_latest_sample() {
        let mut early = TrialAggregate::default();
        early.record(0, &outcome(1, 0, true));
        let mut late = TrialAggregate::default();
        late.record(5, &outcome(0, 1, true));
        late.sample_log = vec!["late".into()];

        let forward = early.clone().merge(late.clone());
        let backward = late.merge(early);
        assert_eq!(forward, backward);
        assert_eq!(forward.sample_log, vec!["late".to_string()]);
    }

    #[test]
    fn empty_aggregate_summarises_to_zeroes() {
        let summary = TrialAggregate::default().summary();
        assert_eq!(summary.trials, 0);
        assert_eq!(summary.attacker_win_rate, 0.0);
        assert_eq!(summary.attacker_win_rate_95_ci, [0.0, 0.0]);
    }
}
