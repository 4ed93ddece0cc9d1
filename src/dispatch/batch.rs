//! Per-run pipeline and static multi-thread batching.

use std::sync::atomic::AtomicBool;
use std::thread;

use crate::error::Result;
use crate::io::{load_directions, write_greedy, FileReporter, RunPaths};
use crate::sa::{AnnealConfig, Annealer, CoolingSchedule};
use crate::solver::{nearest_neighbor, ScheduleProblem};

/// Everything a single run needs besides its id and paths.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub anneal: AnnealConfig,
    pub cooling: CoolingSchedule,
    /// Enable the representation-switching coin in the neighbor move.
    pub switch_rep: bool,
}

/// Final figures of one completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: u32,
    /// Best objective the annealer reached.
    pub anneal_best: f64,
    /// Greedy baseline objective; absent when the run was cancelled
    /// before the baseline was computed.
    pub greedy_objective: Option<f64>,
    pub cancelled: bool,
}

/// Executes one run end to end: load the catalog, anneal with
/// checkpointing, then construct and persist the greedy baseline.
///
/// A failure during setup (catalog load, parameter validation)
/// produces no output files; a failure mid-search may leave behind
/// checkpoints already written, which is expected. A cancelled run
/// skips the greedy baseline.
pub fn run_one(
    run_id: u32,
    config: &RunConfig,
    paths: &RunPaths,
    cancel: Option<&AtomicBool>,
) -> Result<RunSummary> {
    let input = paths.input_file(run_id);
    let db = load_directions(&input, run_id)?;
    log::info!(
        "run {run_id}: loaded {} directions from {}",
        db.len(),
        input.display()
    );

    let problem = ScheduleProblem::new(&db, config.switch_rep)?;
    let start_state = problem.start_state();
    let mut annealer = Annealer::new(run_id, problem, start_state, config.cooling)?;
    let mut reporter = FileReporter::create(paths, run_id)?;

    log::info!("run {run_id}: annealing for {} epochs", config.anneal.epochs);
    let outcome = annealer.run(&config.anneal, &mut reporter, cancel)?;
    if outcome.cancelled {
        log::warn!("run {run_id}: cancelled at epoch {}", outcome.curr.epoch);
        return Ok(RunSummary {
            run_id,
            anneal_best: outcome.obj_best,
            greedy_objective: None,
            cancelled: true,
        });
    }
    log::info!(
        "run {run_id}: annealing best {:.10} found at epoch {}",
        outcome.obj_best,
        outcome.best.epoch
    );

    log::info!("run {run_id}: trying greedy approach");
    let greedy = nearest_neighbor(&db)?;
    write_greedy(paths, run_id, &greedy)?;
    log::info!("run {run_id}: greedy objective {:.10}", greedy.objective);

    Ok(RunSummary {
        run_id,
        anneal_best: outcome.obj_best,
        greedy_objective: Some(greedy.objective),
        cancelled: false,
    })
}

/// Runs a batch of run ids across `threads` workers.
///
/// The id list is partitioned statically into contiguous chunks, one
/// chunk per worker, with no work stealing; every run owns its catalog,
/// generator and output streams, so workers share nothing mutable. A
/// failed run is reported and does not disturb its siblings.
pub fn run_batch(
    run_ids: &[u32],
    threads: usize,
    config: &RunConfig,
    paths: &RunPaths,
    cancel: Option<&AtomicBool>,
) -> Vec<(u32, Result<RunSummary>)> {
    let threads = threads.clamp(1, run_ids.len().max(1));
    if threads == 1 {
        return run_ids
            .iter()
            .map(|&run_id| execute(run_id, config, paths, cancel))
            .collect();
    }

    let chunk_len = run_ids.len().div_ceil(threads);
    let mut results = Vec::with_capacity(run_ids.len());
    thread::scope(|scope| {
        let workers: Vec<_> = run_ids
            .chunks(chunk_len)
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|&run_id| execute(run_id, config, paths, cancel))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for worker in workers {
            match worker.join() {
                Ok(mut part) => results.append(&mut part),
                Err(_) => log::error!("a batch worker thread panicked"),
            }
        }
    });
    results
}

fn execute(
    run_id: u32,
    config: &RunConfig,
    paths: &RunPaths,
    cancel: Option<&AtomicBool>,
) -> (u32, Result<RunSummary>) {
    let result = run_one(run_id, config, paths, cancel);
    if let Err(err) = &result {
        log::error!("run {run_id} failed: {err}");
    }
    (run_id, result)
}
