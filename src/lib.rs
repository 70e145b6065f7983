//! Monte Carlo duel simulator.
//!
//! [combat] holds the single-fight engine, [simulator] folds many fights into summary
//! statistics, and [server] / [cli] expose both over HTTP and the command line.

pub mod cli;
pub mod combat;
pub mod data;
pub mod parallel;
pub mod server;
pub mod simulator;
