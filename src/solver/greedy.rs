//! Greedy nearest-neighbor schedule construction.

use std::time::{Duration, Instant};

use crate::direction::{DirId, DirectionDatabase};
use crate::error::Result;
use crate::schedule::Schedule;

/// A completed greedy construction.
#[derive(Debug)]
pub struct GreedyOutcome<'db> {
    pub schedule: Schedule<'db>,
    /// Total transition cost of the schedule.
    pub objective: f64,
    /// Wall time spent constructing it.
    pub elapsed: Duration,
}

/// Builds a schedule by repeated nearest-neighbor selection.
///
/// Starts from id 0 in the primary representation (the fixed anchor
/// position) and repeatedly appends the unvisited (id, representation)
/// pair closest to the current position. Deterministic: candidates are
/// scanned in ascending id order with the primary representation
/// before the alternate, and only a strictly smaller distance
/// displaces the incumbent, so ties resolve to the lowest id and
/// primary representation. O(N^2) distance evaluations, no randomness.
pub fn nearest_neighbor(db: &DirectionDatabase) -> Result<GreedyOutcome<'_>> {
    let n = db.len();
    let mut ids: Vec<DirId> = Vec::with_capacity(n);
    let mut alternate: Vec<bool> = Vec::with_capacity(n);

    let start = Instant::now();
    if n > 0 {
        let mut visited = vec![false; n];
        ids.push(0);
        alternate.push(false);
        visited[0] = true;
        let mut current = db.entry(0, false);

        for _ in 1..n {
            let mut best_id: DirId = 0;
            let mut best_alt = false;
            let mut best_dist = f64::INFINITY;

            for id in 0..n as DirId {
                if visited[id as usize] {
                    continue;
                }
                for alt in [false, true] {
                    let dist = current.dist_to(db.entry(id, alt));
                    if dist < best_dist {
                        best_id = id;
                        best_alt = alt;
                        best_dist = dist;
                    }
                }
            }

            ids.push(best_id);
            alternate.push(best_alt);
            visited[best_id as usize] = true;
            current = db.entry(best_id, best_alt);
        }
    }
    let elapsed = start.elapsed();

    let schedule = Schedule::from_parts(ids, alternate, db)?;
    let objective = schedule.cost();
    Ok(GreedyOutcome {
        schedule,
        objective,
        elapsed,
    })
}
