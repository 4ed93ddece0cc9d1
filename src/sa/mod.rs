//! Simulated annealing engine.
//!
//! A single-solution trajectory search: at each epoch a neighbor of
//! the current state is proposed and accepted by the Metropolis rule,
//! with the acceptance probability for worsening moves controlled by a
//! [`CoolingSchedule`]. The engine is generic over an
//! [`AnnealProblem`] binding and reports progress through a
//! [`RunObserver`], keeping file layout and domain policy out of the
//! loop.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Häggström (2002), *Finite Markov Chains and Algorithmic Applications*

mod config;
mod runner;
mod types;

pub use config::{AnnealConfig, CoolingSchedule};
pub use runner::{seed_for_run, AnnealOutcome, Annealer};
pub use types::{
    AnnealProblem, CheckpointReport, EpochStamp, LogEntry, NullObserver, RunObserver,
};
