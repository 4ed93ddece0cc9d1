//! Domain bindings gluing the direction catalog to the search
//! machinery: the annealing neighbor policy over schedules and the
//! greedy nearest-neighbor baseline constructor.

mod annealing;
mod greedy;

pub use annealing::ScheduleProblem;
pub use greedy::{nearest_neighbor, GreedyOutcome};
