//! Run orchestration: one run end to end, and batches of runs spread
//! across worker threads.

mod batch;

pub use batch::{run_batch, run_one, RunConfig, RunSummary};
