//! Schedule-backed annealing problem.

use rand::Rng;

use crate::direction::DirectionDatabase;
use crate::error::{Error, Result};
use crate::sa::AnnealProblem;
use crate::schedule::Schedule;

/// Binds [`Schedule`] to the annealing engine.
///
/// The neighbor move reverses a random segment of the schedule,
/// optionally toggling the representation of every direction in it:
/// the classic traveling-salesman segment reversal (Häggström, ch. 13)
/// extended with the representation coin. Position 0 never moves.
pub struct ScheduleProblem<'db> {
    db: &'db DirectionDatabase,
    switch_rep: bool,
}

impl<'db> ScheduleProblem<'db> {
    /// Creates the binding.
    ///
    /// `switch_rep` enables the fair-coin representation toggle on
    /// each proposed move. The segment-flip neighborhood is empty for
    /// fewer than three directions, so smaller catalogs are rejected.
    pub fn new(db: &'db DirectionDatabase, switch_rep: bool) -> Result<Self> {
        if db.len() < 3 {
            return Err(Error::InvalidParameter {
                name: "num_directions",
                message: format!(
                    "segment-flip annealing needs at least 3 directions, got {}",
                    db.len()
                ),
            });
        }
        Ok(Self { db, switch_rep })
    }

    /// Identity-permutation starting state over the bound catalog.
    pub fn start_state(&self) -> Schedule<'db> {
        Schedule::identity(self.db)
    }
}

impl<'db> AnnealProblem for ScheduleProblem<'db> {
    type State = Schedule<'db>;

    fn objective(&self, schedule: &Schedule<'db>) -> f64 {
        schedule.cost()
    }

    /// Draws `i` from `[1, N-1]` and `j` from `[1, N-2]`; a collision
    /// forces `j` to `N-1`, so the pair is always distinct and never
    /// touches the anchor. The representation coin is drawn only when
    /// switching is enabled. Draw order (i, j, coin) is part of the
    /// reproducibility contract.
    fn sample_neighbor<R: Rng>(
        &self,
        from: &Schedule<'db>,
        into: &mut Schedule<'db>,
        rng: &mut R,
    ) -> Result<()> {
        let n = from.len();
        let i = rng.random_range(1..n);
        let mut j = rng.random_range(1..n - 1);
        if i == j {
            j = n - 1;
        }
        let toggle = self.switch_rep && rng.random_range(0.0..1.0) < 0.5;

        into.copy_from(from)?;
        into.flip_segment(i, j, toggle)
    }

    fn duplicate(&self, schedule: &Schedule<'db>) -> Schedule<'db> {
        schedule.clone()
    }

    fn copy_into(&self, from: &Schedule<'db>, into: &mut Schedule<'db>) -> Result<()> {
        into.copy_from(from)
    }

    fn render(&self, schedule: &Schedule<'db>) -> String {
        schedule.to_string()
    }
}
