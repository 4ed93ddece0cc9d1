//! Output artifact layout and writers.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::sa::{CheckpointReport, LogEntry, RunObserver};
use crate::solver::GreedyOutcome;

/// Horizontal rule used between sections of the text artifacts.
pub const SEPARATOR: &str = "--------------------------------------------------";

/// Where a run reads its input and writes its artifacts.
///
/// Passed explicitly into the reporters at construction time; there is
/// no global path state.
#[derive(Debug, Clone)]
pub struct RunPaths {
    input_dir: PathBuf,
    output_dir: PathBuf,
}

impl Default for RunPaths {
    fn default() -> Self {
        Self::new("input", "output")
    }
}

impl RunPaths {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Input catalog for a run: `<input_dir>/directions-<run_id>.txt`.
    pub fn input_file(&self, run_id: u32) -> PathBuf {
        self.input_dir.join(format!("directions-{run_id}.txt"))
    }

    /// Directory holding every artifact of a run.
    pub fn run_dir(&self, run_id: u32) -> PathBuf {
        self.output_dir.join(format!("run-{run_id}"))
    }

    /// Checkpoint written while annealing at the given epoch.
    pub fn checkpoint_file(&self, run_id: u32, epoch: u64) -> PathBuf {
        self.run_dir(run_id).join(format!("simanneal-{epoch}.txt"))
    }

    /// Log of annealing improvements and their compute times.
    pub fn full_log_file(&self, run_id: u32) -> PathBuf {
        self.run_dir(run_id).join("simanneal-full-log.txt")
    }

    /// Greedy baseline solution.
    pub fn greedy_file(&self, run_id: u32) -> PathBuf {
        self.run_dir(run_id).join("greedy-solution.txt")
    }
}

/// Creates the parent directory as needed and opens the file for
/// buffered writing.
fn create_for_writing(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(BufWriter::new(File::create(path)?))
}

/// Writes checkpoints and the full improvement log for one run.
pub struct FileReporter {
    paths: RunPaths,
    run_id: u32,
    full_log: BufWriter<File>,
}

impl FileReporter {
    /// Opens the run's full log and writes its header.
    pub fn create(paths: &RunPaths, run_id: u32) -> Result<Self> {
        let mut full_log = create_for_writing(&paths.full_log_file(run_id))?;
        writeln!(full_log, "Run id: {run_id}")?;
        writeln!(
            full_log,
            "Best objective remained constant between epochs listed below."
        )?;
        writeln!(full_log, "(Current objective may have changed, however.)")?;
        writeln!(full_log, "Epoch, Current Objective, Best Objective, Wall Time (ns)")?;
        Ok(Self {
            paths: paths.clone(),
            run_id,
            full_log,
        })
    }
}

impl RunObserver for FileReporter {
    fn on_log(&mut self, entry: &LogEntry) -> Result<()> {
        writeln!(
            self.full_log,
            "{}, {:.10}, {:.10}, {}",
            entry.epoch,
            entry.obj_curr,
            entry.obj_best,
            entry.wall_time.as_nanos()
        )?;
        // log lines are rare (improvements only); flushing each keeps
        // the log current for a cancelled run
        self.full_log.flush()?;
        Ok(())
    }

    fn on_checkpoint(&mut self, report: &CheckpointReport<'_>) -> Result<()> {
        let path = self
            .paths
            .checkpoint_file(self.run_id, report.curr.epoch);
        let mut out = create_for_writing(&path)?;
        writeln!(out, "Run id: {}", report.run_id)?;
        writeln!(out, "Current objective: {:.10}", report.obj_curr)?;
        writeln!(out, "Best objective: {:.10}", report.obj_best)?;
        writeln!(out, "{SEPARATOR}")?;
        writeln!(out, "Current epoch: {}", report.curr.epoch)?;
        writeln!(out, "Time running (ns): {}", report.curr.wall_time.as_nanos())?;
        writeln!(out, "Cooling method description:")?;
        writeln!(out, "{}", report.cooling_descr)?;
        writeln!(out, "{SEPARATOR}")?;
        writeln!(out, "Random start: {}", report.seed)?;
        writeln!(out, "{SEPARATOR}")?;
        if let Some(current) = &report.current_state {
            writeln!(out, "Current State:")?;
            write!(out, "{current}")?;
            writeln!(out, "{SEPARATOR}")?;
        }
        writeln!(out, "Best state from epoch: {}", report.best.epoch)?;
        writeln!(out, "Best found after time (ns): {}", report.best.wall_time.as_nanos())?;
        writeln!(out, "Best State:")?;
        write!(out, "{}", report.best_state)?;
        writeln!(out, "{SEPARATOR}")?;
        out.flush()?;
        Ok(())
    }
}

/// Writes the greedy baseline artifact for a run.
pub fn write_greedy(paths: &RunPaths, run_id: u32, outcome: &GreedyOutcome<'_>) -> Result<()> {
    let mut out = create_for_writing(&paths.greedy_file(run_id))?;
    writeln!(out, "Run id: {run_id}")?;
    writeln!(out, "Objective: {:.10}", outcome.objective)?;
    writeln!(out, "Time running (ns): {}", outcome.elapsed.as_nanos())?;
    writeln!(out, "{SEPARATOR}")?;
    writeln!(out, "Greedy solution:")?;
    write!(out, "{}", outcome.schedule)?;
    writeln!(out, "{SEPARATOR}")?;
    out.flush()?;
    Ok(())
}
