//! The schedule permutation and its mutation primitives.

use std::fmt;

use super::Entries;
use crate::direction::{DirId, DirectionDatabase};
use crate::error::{Error, Result};

/// An ordered visiting sequence over all catalog entries.
///
/// Holds a permutation of the ids `0..db.len()` and, per position, the
/// flag selecting the alternate representation. Borrows the catalog;
/// the catalog is never mutated through a schedule.
#[derive(Debug, Clone)]
pub struct Schedule<'db> {
    db: &'db DirectionDatabase,
    ids: Vec<DirId>,
    alternate: Vec<bool>,
}

impl<'db> Schedule<'db> {
    /// Identity permutation, every position in the primary
    /// representation.
    pub fn identity(db: &'db DirectionDatabase) -> Self {
        let n = db.len();
        Self {
            db,
            ids: (0..n as DirId).collect(),
            alternate: vec![false; n],
        }
    }

    /// Builds a schedule from externally computed arrays.
    ///
    /// Fails with [`Error::SizeMismatch`] when either array length
    /// differs from the catalog size.
    pub fn from_parts(
        ids: Vec<DirId>,
        alternate: Vec<bool>,
        db: &'db DirectionDatabase,
    ) -> Result<Self> {
        if ids.len() != db.len() || alternate.len() != db.len() {
            let src = if ids.len() != db.len() {
                ids.len()
            } else {
                alternate.len()
            };
            return Err(Error::SizeMismatch { src, dst: db.len() });
        }
        Ok(Self { db, ids, alternate })
    }

    /// Number of scheduled positions (equals the catalog size).
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Scheduled ids in position order.
    pub fn ids(&self) -> &[DirId] {
        &self.ids
    }

    /// Per-position alternate-representation flags.
    pub fn alternate_flags(&self) -> &[bool] {
        &self.alternate
    }

    /// Lazy iterator of resolved directions in position order.
    pub fn entries(&self) -> Entries<'_> {
        Entries::new(self.db, &self.ids, &self.alternate)
    }

    /// Total transition cost: the sum of pairwise distances between
    /// consecutive resolved entries. A schedule of length 0 or 1 costs
    /// nothing.
    pub fn cost(&self) -> f64 {
        let mut entries = self.entries();
        let Some(mut prev) = entries.next() else {
            return 0.0;
        };
        let mut total = 0.0;
        for next in entries {
            total += prev.dist_to(next);
            prev = next;
        }
        total
    }

    /// Reverses the closed position range `[min(i,j), max(i,j)]` in
    /// both the id and flag arrays; with `toggle_rep`, additionally
    /// inverts every representation flag in that range.
    ///
    /// Position 0 is a fixed anchor and may never be a reversal
    /// boundary; both indices must be within range. Applying the same
    /// call twice restores the schedule exactly.
    pub fn flip_segment(&mut self, i: usize, j: usize, toggle_rep: bool) -> Result<()> {
        let (lo, hi) = if i <= j { (i, j) } else { (j, i) };
        if lo == 0 || hi >= self.ids.len() {
            return Err(Error::InvalidSegment {
                i,
                j,
                len: self.ids.len(),
            });
        }
        self.ids[lo..=hi].reverse();
        self.alternate[lo..=hi].reverse();
        if toggle_rep {
            for flag in &mut self.alternate[lo..=hi] {
                *flag = !*flag;
            }
        }
        Ok(())
    }

    /// Overwrites this schedule with `source`.
    ///
    /// Fails with [`Error::SizeMismatch`] when the lengths differ.
    pub fn copy_from(&mut self, source: &Schedule<'db>) -> Result<()> {
        if source.len() != self.len() {
            return Err(Error::SizeMismatch {
                src: source.len(),
                dst: self.len(),
            });
        }
        self.ids.copy_from_slice(&source.ids);
        self.alternate.copy_from_slice(&source.alternate);
        Ok(())
    }
}

impl fmt::Display for Schedule<'_> {
    /// All directions as ordered in the schedule, one per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for direction in self.entries() {
            writeln!(f, "{direction}")?;
        }
        Ok(())
    }
}
