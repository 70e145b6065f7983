//! Compare sequential vs parallel trial run times.
//!
//! Run with: `cargo bench --bench monte_carlo_parallel`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use duelsim::combat::{Combatant, FighterTemplate};
use duelsim::data::GameData;
use duelsim::parallel::WorkerPool;
use duelsim::simulator::{run_trials, run_trials_parallel};

fn bench_monte_carlo_sequential_vs_parallel(c: &mut Criterion) {
    let data = GameData::builtin();
    let attacker = FighterTemplate::prepare(&Combatant::named("A"), &data);
    let defender = FighterTemplate::prepare(&Combatant::named("B"), &data);
    let trials = 10_000;
    let seed = 42u64;
    let pool = WorkerPool::default_workers();

    let mut group = c.benchmark_group("monte_carlo");
    group.sample_size(20);
    group.measurement_time(std::time::Duration::from_secs(10));

    group.bench_function("sequential", |b| {
        b.iter(|| black_box(run_trials(&attacker, &defender, trials, seed)));
    });

    group.bench_function("parallel", |b| {
        b.iter(|| black_box(run_trials_parallel(&attacker, &defender, trials, seed, &pool)));
    });

    group.finish();
}

criterion_group!(benches, bench_monte_carlo_sequential_vs_parallel);
criterion_main!(benches);
