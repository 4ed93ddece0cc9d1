//! Core traits and report records for the annealing engine.

use std::time::Duration;

use rand::Rng;

use crate::error::Result;

/// Defines an annealing problem over an associated state type.
///
/// The implementor supplies neighbor generation, the objective and
/// state plumbing; the engine owns temperature management, the
/// acceptance rule and bookkeeping. There is exactly one binding per
/// process run, so the engine is generic over this trait rather than
/// dynamically dispatched.
///
/// # Minimization
///
/// The engine minimizes `objective`; lower is better.
pub trait AnnealProblem {
    /// The mutable search-state representation.
    type State;

    /// Objective of a state. Must not mutate the state.
    fn objective(&self, state: &Self::State) -> f64;

    /// Samples a neighbor of `from` into the caller-owned scratch
    /// state `into`, using the engine's random generator.
    ///
    /// Draw order from `rng` is part of the reproducibility contract.
    fn sample_neighbor<R: Rng>(
        &self,
        from: &Self::State,
        into: &mut Self::State,
        rng: &mut R,
    ) -> Result<()>;

    /// Fully independent copy of a state.
    fn duplicate(&self, state: &Self::State) -> Self::State;

    /// Copies all state information from `from` into `into`.
    fn copy_into(&self, from: &Self::State, into: &mut Self::State) -> Result<()>;

    /// Serializes a state for checkpointing.
    fn render(&self, state: &Self::State) -> String;
}

/// An epoch number paired with the wall time accumulated to reach it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EpochStamp {
    pub epoch: u64,
    pub wall_time: Duration,
}

/// One line of the improvement log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogEntry {
    pub run_id: u32,
    pub epoch: u64,
    pub obj_curr: f64,
    pub obj_best: f64,
    pub wall_time: Duration,
}

/// Everything needed to persist a best-state checkpoint.
#[derive(Debug, Clone)]
pub struct CheckpointReport<'a> {
    pub run_id: u32,
    pub seed: u64,
    pub obj_curr: f64,
    pub obj_best: f64,
    pub curr: EpochStamp,
    pub best: EpochStamp,
    pub cooling_descr: &'a str,
    /// Rendered current state, present when the run is configured to
    /// checkpoint it alongside the best state.
    pub current_state: Option<String>,
    /// Rendered best state.
    pub best_state: String,
}

/// Receives checkpoints and log lines as a run progresses.
///
/// File layout lives behind this trait so the engine never touches
/// paths. An observer error aborts the run and is surfaced to the
/// caller unmodified.
pub trait RunObserver {
    fn on_log(&mut self, entry: &LogEntry) -> Result<()>;
    fn on_checkpoint(&mut self, report: &CheckpointReport<'_>) -> Result<()>;
}

/// Observer that discards everything. Useful for benchmarks and for
/// runs whose only consumer is the returned outcome.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl RunObserver for NullObserver {
    fn on_log(&mut self, _entry: &LogEntry) -> Result<()> {
        Ok(())
    }

    fn on_checkpoint(&mut self, _report: &CheckpointReport<'_>) -> Result<()> {
        Ok(())
    }
}
