//! Metropolis-Hastings execution loop.
//!
//! # Algorithm
//!
//! At each epoch a neighbor of the current state is sampled into
//! scratch storage. A strictly better neighbor is accepted outright;
//! a worse one is accepted with probability
//! `exp((obj_curr - obj_neighbor) / temperature(epoch))`. The best
//! state ever visited is tracked separately and checkpointed as it
//! improves.
//!
//! # Reference
//!
//! Häggström, O. (2002), *Finite Markov Chains and Algorithmic
//! Applications*, ch. 13.

use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::{AnnealConfig, CoolingSchedule};
use super::types::{AnnealProblem, CheckpointReport, EpochStamp, LogEntry, RunObserver};
use crate::error::Result;

/// Maps a run id to the seed of its random generator.
///
/// The identity mapping keeps every run reproducible from its id
/// alone. It is an easy system to manage distinct seeds for distinct
/// run ids, though not necessarily a statistically strong one.
pub fn seed_for_run(run_id: u32) -> u64 {
    run_id as u64
}

/// Summary of a finished (or cancelled) annealing run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealOutcome {
    pub run_id: u32,
    /// Objective of the state the chain ended on.
    pub obj_curr: f64,
    /// Best objective ever visited; never worse than any earlier best.
    pub obj_best: f64,
    /// Epoch count and wall time at the end of the run.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub curr: EpochStamp,
    /// Epoch and wall time at which the best state was found.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub best: EpochStamp,
    /// Accepted moves, improving or not.
    pub accepted_moves: u64,
    /// Strictly improving moves.
    pub improving_moves: u64,
    /// Whether the run was ended early by the cancellation flag.
    pub cancelled: bool,
}

/// Simulated annealing engine, generic over the problem binding.
///
/// The random generator is seeded solely from the run id, so a run is
/// fully reproducible given the same id, starting state and epoch
/// count.
pub struct Annealer<P: AnnealProblem> {
    run_id: u32,
    problem: P,
    cooling: CoolingSchedule,
    state_curr: P::State,
    state_best: Option<P::State>,
    rng: StdRng,
}

impl<P: AnnealProblem> Annealer<P> {
    pub fn new(
        run_id: u32,
        problem: P,
        start_state: P::State,
        cooling: CoolingSchedule,
    ) -> Result<Self> {
        cooling.validate()?;
        Ok(Self {
            run_id,
            problem,
            cooling,
            state_curr: start_state,
            state_best: None,
            rng: StdRng::seed_from_u64(seed_for_run(run_id)),
        })
    }

    /// Best state recorded by the last [`run`](Self::run).
    pub fn best_state(&self) -> Option<&P::State> {
        self.state_best.as_ref()
    }

    /// Runs `config.epochs` Metropolis epochs, reporting improvements
    /// through `observer`.
    ///
    /// `cancel` is checked at epoch boundaries; a set flag ends the
    /// run after any in-flight reporting has completed. Observer and
    /// state-copy errors abort the run and propagate unchanged.
    pub fn run<O: RunObserver>(
        &mut self,
        config: &AnnealConfig,
        observer: &mut O,
        cancel: Option<&AtomicBool>,
    ) -> Result<AnnealOutcome> {
        config.validate()?;

        let cooling_descr = self.cooling.describe();
        let seed = seed_for_run(self.run_id);

        let mut obj_curr = self.problem.objective(&self.state_curr);
        let mut obj_best = obj_curr;
        let mut state_best = self.problem.duplicate(&self.state_curr);
        let mut scratch = self.problem.duplicate(&self.state_curr);

        // Checkpoint and log gates start high enough that the first
        // epoch always reports.
        let mut obj_prev_saved = 10.0 * obj_curr.max(1.0);
        let mut obj_prev_logged = obj_prev_saved;

        let mut wall_curr = Duration::ZERO;
        let mut stamp_best = EpochStamp::default();
        let mut epochs_run = 0u64;
        let mut accepted_moves = 0u64;
        let mut improving_moves = 0u64;
        let mut cancelled = false;

        let mut start = Instant::now();

        for epoch in 1..=config.epochs {
            if let Some(flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }
            epochs_run = epoch;

            self.problem
                .sample_neighbor(&self.state_curr, &mut scratch, &mut self.rng)?;
            let obj_next = self.problem.objective(&scratch);

            if obj_next < obj_curr {
                // A strictly better neighbor is accepted without
                // drawing any probability.
                mem::swap(&mut self.state_curr, &mut scratch);
                obj_curr = obj_next;
                accepted_moves += 1;
                improving_moves += 1;

                if obj_curr < obj_best {
                    let now = Instant::now();
                    wall_curr += now - start;
                    start = now;
                    stamp_best = EpochStamp {
                        epoch,
                        wall_time: wall_curr,
                    };
                    self.problem.copy_into(&self.state_curr, &mut state_best)?;
                    obj_best = obj_curr;
                }
            } else {
                // Boltzmann acceptance. The exponent is <= 0 here
                // because this branch only runs when the neighbor is
                // not strictly better.
                let log_move_prob =
                    (obj_curr - obj_next) / self.cooling.temperature(epoch);
                if self.rng.random_range(0.0..1.0) < log_move_prob.exp() {
                    mem::swap(&mut self.state_curr, &mut scratch);
                    obj_curr = obj_next;
                    accepted_moves += 1;
                }
            }

            let edge_epoch = epoch == 1 || epoch == config.epochs;
            let should_log = obj_best < obj_prev_logged || edge_epoch;
            let should_save = obj_best < obj_prev_saved - config.save_tolerance || edge_epoch;

            if should_log || should_save {
                let now = Instant::now();
                wall_curr += now - start;
                start = now;

                if should_save {
                    let report = CheckpointReport {
                        run_id: self.run_id,
                        seed,
                        obj_curr,
                        obj_best,
                        curr: EpochStamp {
                            epoch,
                            wall_time: wall_curr,
                        },
                        best: stamp_best,
                        cooling_descr: &cooling_descr,
                        current_state: config
                            .checkpoint_current
                            .then(|| self.problem.render(&self.state_curr)),
                        best_state: self.problem.render(&state_best),
                    };
                    observer.on_checkpoint(&report)?;
                    obj_prev_saved = obj_best;
                }

                if should_log {
                    observer.on_log(&LogEntry {
                        run_id: self.run_id,
                        epoch,
                        obj_curr,
                        obj_best,
                        wall_time: wall_curr,
                    })?;
                    obj_prev_logged = obj_best;
                }
            }

            if config.verbose_every > 0 && epoch % config.verbose_every == 0 {
                log::info!(
                    "run {}: epoch {}, temperature {:.6e}, objective {:.10e} (curr) {:.10e} (best)",
                    self.run_id,
                    epoch,
                    self.cooling.temperature(epoch),
                    obj_curr,
                    obj_best,
                );
            }
        }

        wall_curr += start.elapsed();
        self.state_best = Some(state_best);

        Ok(AnnealOutcome {
            run_id: self.run_id,
            obj_curr,
            obj_best,
            curr: EpochStamp {
                epoch: epochs_run,
                wall_time: wall_curr,
            },
            best: stamp_best,
            accepted_moves,
            improving_moves,
            cancelled,
        })
    }
}
