pub mod export_csv;
pub mod monte_carlo;

pub use export_csv::{export_summary_csv, write_summary_csv, ExportError};
pub use monte_carlo::{
    run_simulation, run_trial_range, run_trials, run_trials_parallel, SimulationSummary,
    TrialAggregate,
};
