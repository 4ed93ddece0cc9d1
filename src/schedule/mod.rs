//! Visiting order over a direction catalog.
//!
//! A [`Schedule`] is a permutation of every catalog id together with a
//! per-position representation flag. Position 0 is a fixed anchor: the
//! neighbor move never reverses across it or re-flags it. The segment
//! flip in [`Schedule::flip_segment`] is the sole mutation primitive
//! used by the annealing engine.

mod iter;
mod route;

pub use iter::Entries;
pub use route::Schedule;
