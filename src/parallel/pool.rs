//! Rayon thread pool configuration for trial workloads.
//!
//! Use [WorkerPool::install] to run trials with a fixed number of threads, or rely on Rayon's
//! default (all CPU cores).

use std::env;

use rayon::ThreadPoolBuilder;
use tracing::warn;

/// Worker thread count; unset or 0 means all cores.
pub const WORKERS_ENV: &str = "DUELSIM_WORKERS";

/// Configures how many worker threads are used for parallel batch execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerPool {
    /// Number of worker threads. If 0, use Rayon default (num_cpus).
    pub workers: usize,
}

impl WorkerPool {
    /// Use all available CPU cores (Rayon default).
    pub fn default_workers() -> Self {
        Self::default()
    }

    /// Use exactly `n` worker threads.
    pub fn with_workers(n: usize) -> Self {
        Self { workers: n }
    }

    /// Reads `DUELSIM_WORKERS`. Unparseable values fall back to all cores.
    pub fn from_env() -> Self {
        match env::var(WORKERS_ENV) {
            Ok(raw) => match raw.trim().parse() {
                Ok(workers) => Self::with_workers(workers),
                Err(_) => {
                    warn!(value = %raw, "ignoring invalid {WORKERS_ENV}");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Run a closure with this worker count. If [workers](WorkerPool::workers) is 0, or a
    /// dedicated pool cannot be built, the closure runs on the global Rayon pool.
    pub fn install<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            return f();
        }
        match ThreadPoolBuilder::new().num_threads(self.workers).build() {
            Ok(pool) => pool.install(f),
            Err(err) => {
                warn!(workers = self.workers, error = %err, "falling back to the global pool");
                f()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedicated_pool_uses_the_requested_thread_count() {
        let threads = WorkerPool::with_workers(2).install(rayon::current_num_threads);
        assert_eq!(threads, 2);
    }

    #[test]
    fn zero_workers_runs_on_the_global_pool() {
        let value = WorkerPool::default_workers().install(|| 40 + 2);
        assert_eq!(value, 42);
    }
}
