//! Append-only catalog of directions with dense sequential ids.

use super::{DirId, Direction};
use crate::error::{Error, Result};

/// Ordered catalog of [`Direction`]s.
///
/// Ids must be incremental (0, 1, 2, ...) and inserted in order; this
/// gives O(1) id lookup and lets schedules store bare ids instead of
/// full entities. For each inserted direction a precomputed
/// alternate-representation view is stored alongside the primary one.
///
/// Immutable once loaded; shared by reference across schedules,
/// solvers and worker threads.
#[derive(Debug, Default)]
pub struct DirectionDatabase {
    primary: Vec<Direction>,
    alternate: Vec<Direction>,
}

impl DirectionDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty catalog with capacity for `n` directions.
    pub fn with_capacity(n: usize) -> Self {
        let mut db = Self::new();
        db.reserve(n);
        db
    }

    /// Allocation hint; no semantic effect.
    pub fn reserve(&mut self, n: usize) {
        self.primary.reserve(n);
        self.alternate.reserve(n);
    }

    /// Appends a direction.
    ///
    /// Fails with [`Error::OutOfOrderInsert`] unless `direction.id`
    /// equals the current catalog size.
    pub fn insert(&mut self, direction: Direction) -> Result<()> {
        let expected = self.primary.len() as DirId;
        if direction.id != expected {
            return Err(Error::OutOfOrderInsert {
                got: direction.id,
                expected,
            });
        }
        let mut other = direction.clone();
        other.switch_rep();
        self.primary.push(direction);
        self.alternate.push(other);
        Ok(())
    }

    /// Number of directions defined.
    pub fn len(&self) -> usize {
        self.primary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }

    /// Looks up a direction by id in the requested representation.
    pub fn get(&self, id: DirId, alternate: bool) -> Result<&Direction> {
        let store = if alternate {
            &self.alternate
        } else {
            &self.primary
        };
        store.get(id as usize).ok_or(Error::IndexOutOfRange {
            id,
            len: self.primary.len(),
        })
    }

    /// Infallible lookup for callers that maintain the permutation
    /// invariant (ids drawn from `0..len()`).
    pub(crate) fn entry(&self, id: DirId, alternate: bool) -> &Direction {
        if alternate {
            &self.alternate[id as usize]
        } else {
            &self.primary[id as usize]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_db(n: u32) -> DirectionDatabase {
        let mut db = DirectionDatabase::with_capacity(n as usize);
        for id in 0..n {
            db.insert(Direction::new(id, 0.1 * id as f64, 0.05 * id as f64))
                .unwrap();
        }
        db
    }

    #[test]
    fn test_insert_in_order() {
        let db = sample_db(4);
        assert_eq!(db.len(), 4);
        assert_eq!(db.get(2, false).unwrap().id, 2);
    }

    #[test]
    fn test_insert_out_of_order_rejected() {
        let mut db = sample_db(1);
        let err = db.insert(Direction::new(2, 0.0, 0.0)).unwrap_err();
        match err {
            Error::OutOfOrderInsert { got, expected } => {
                assert_eq!(got, 2);
                assert_eq!(expected, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut db = sample_db(2);
        assert!(db.insert(Direction::new(1, 0.0, 0.0)).is_err());
    }

    #[test]
    fn test_alternate_view_precomputed() {
        let db = sample_db(3);
        let prime = db.get(2, false).unwrap();
        let other = db.get(2, true).unwrap();
        assert_eq!(other.id, prime.id);
        assert_eq!(other.theta(), prime.theta_alt());
        assert_eq!(other.phi(), prime.phi_alt());
    }

    #[test]
    fn test_get_out_of_range() {
        let db = sample_db(2);
        assert!(matches!(
            db.get(5, false),
            Err(Error::IndexOutOfRange { id: 5, len: 2 })
        ));
    }
}
