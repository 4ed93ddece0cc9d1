//! Command-line entry point.
//!
//! ```text
//! dirsched <RUN_IDS> <EPOCHS> <VERBOSE_EVERY> <COOL_INIT> <COOL_BASE> <COOL_FLAT>
//! ```
//!
//! Numeric arguments may use `_` separators (`1_000_000`). Parameters
//! are validated before any run starts; a batch of run ids can be
//! spread over worker threads with `--threads`.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Result};
use clap::{arg, value_parser, Command};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use dirsched::dispatch::{run_batch, RunConfig};
use dirsched::io::RunPaths;
use dirsched::sa::{AnnealConfig, CoolingSchedule};

fn cli() -> Command {
    Command::new("dirsched")
        .about("Searches for low-cost visiting orders over direction catalogs")
        .arg_required_else_help(true)
        .arg(
            arg!(<RUN_IDS> "Run id, or comma-separated list of run ids")
                .value_delimiter(',')
                .value_parser(parse_uint::<u32>),
        )
        .arg(arg!(<EPOCHS> "Number of simulated annealing epochs").value_parser(parse_uint::<u64>))
        .arg(
            arg!(<VERBOSE_EVERY> "Frequency of progress updates, in epochs")
                .value_parser(parse_uint::<u64>),
        )
        .arg(
            arg!(<COOL_INIT> "Cooling initial scale (strictly positive)")
                .value_parser(parse_decimal),
        )
        .arg(
            arg!(<COOL_BASE> "Cooling exponential base (strictly between 0 and 1)")
                .value_parser(parse_decimal),
        )
        .arg(
            arg!(<COOL_FLAT> "Epochs per flat cooling block (strictly positive)")
                .value_parser(parse_uint::<u64>),
        )
        .arg(
            arg!(--threads [N] "Worker threads when batching run ids")
                .default_value("1")
                .value_parser(parse_uint::<usize>),
        )
        .arg(
            arg!(--"input-dir" [DIR] "Directory holding directions-<id>.txt inputs")
                .default_value("input")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            arg!(--"output-dir" [DIR] "Directory receiving run-<id>/ artifacts")
                .default_value("output")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            arg!(--"save-tolerance" [TOL] "Objective decrease required before checkpointing again")
                .default_value("0.1")
                .value_parser(parse_decimal),
        )
        .arg(arg!(--"no-switch-rep" "Disable the representation-switching move component"))
        .arg(arg!(--"checkpoint-current" "Include the current state in checkpoints"))
}

/// Integer parser tolerating `_` separators.
fn parse_uint<T: FromStr>(raw: &str) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    let cleaned: String = raw.chars().filter(|&c| c != '_').collect();
    cleaned
        .parse()
        .map_err(|err| format!("{raw:?} is not a valid integer: {err}"))
}

/// Decimal parser tolerating `_` separators.
fn parse_decimal(raw: &str) -> Result<f64, String> {
    let cleaned: String = raw.chars().filter(|&c| c != '_').collect();
    cleaned
        .parse()
        .map_err(|err| format!("{raw:?} is not a valid decimal number: {err}"))
}

fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|level| level.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(false)
        .init();

    let matches = cli().get_matches();
    let run_ids: Vec<u32> = matches
        .get_many::<u32>("RUN_IDS")
        .unwrap()
        .copied()
        .collect();
    let epochs = *matches.get_one::<u64>("EPOCHS").unwrap();
    let verbose_every = *matches.get_one::<u64>("VERBOSE_EVERY").unwrap();
    let cool_init = *matches.get_one::<f64>("COOL_INIT").unwrap();
    let cool_base = *matches.get_one::<f64>("COOL_BASE").unwrap();
    let cool_flat = *matches.get_one::<u64>("COOL_FLAT").unwrap();
    let threads = *matches.get_one::<usize>("threads").unwrap();
    let input_dir = matches.get_one::<PathBuf>("input-dir").unwrap().clone();
    let output_dir = matches.get_one::<PathBuf>("output-dir").unwrap().clone();
    let save_tolerance = *matches.get_one::<f64>("save-tolerance").unwrap();
    let switch_rep = !matches.get_flag("no-switch-rep");
    let checkpoint_current = matches.get_flag("checkpoint-current");

    // Validate everything up front; nothing runs on bad parameters.
    if verbose_every == 0 {
        bail!("VERBOSE_EVERY must be strictly positive");
    }
    if threads == 0 {
        bail!("--threads must be strictly positive");
    }
    let cooling = CoolingSchedule::PiecewiseGeometric {
        scale0: cool_init,
        base: cool_base,
        flat_epochs: cool_flat,
    };
    cooling.validate()?;
    let anneal = AnnealConfig::default()
        .with_epochs(epochs)
        .with_verbose_every(verbose_every)
        .with_save_tolerance(save_tolerance)
        .with_checkpoint_current(checkpoint_current);
    anneal.validate()?;

    let config = RunConfig {
        anneal,
        cooling,
        switch_rep,
    };
    let paths = RunPaths::new(input_dir, output_dir);

    let results = run_batch(&run_ids, threads, &config, &paths, None);

    let mut failures = 0usize;
    for (run_id, result) in &results {
        match result {
            Ok(summary) => {
                let greedy = summary
                    .greedy_objective
                    .map(|objective| format!("{objective:.10}"))
                    .unwrap_or_else(|| "skipped".to_string());
                println!(
                    "run {run_id}: annealing best {:.10}, greedy {greedy}{}",
                    summary.anneal_best,
                    if summary.cancelled { " (cancelled)" } else { "" },
                );
            }
            Err(err) => {
                failures += 1;
                eprintln!("run {run_id} failed: {err}");
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} runs failed", results.len());
    }
    Ok(())
}
