//! Directional targets and the catalog that holds them.
//!
//! A [`Direction`] is a point on the pointing sphere carrying two
//! equivalent coordinate encodings (primary and alternate). The
//! [`DirectionDatabase`] is an append-only catalog of directions keyed
//! by dense sequential ids; it is built once from input and then
//! shared read-only by every schedule and solver.

mod database;
mod entity;

pub use database::DirectionDatabase;
pub use entity::{Direction, TWO_PI};

/// Dense identifier assigned to a direction at catalog insertion.
pub type DirId = u32;
