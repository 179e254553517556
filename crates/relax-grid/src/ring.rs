//! Ring neighbour table over worker ranks (always-wrap periodic boundary).

use relax_core::Rank;

use crate::error::GridError;

/// The two logical neighbours of a worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Neighbours {
    /// `(r - 1 + P) mod P`: owner of the columns to the left.
    pub prev: Rank,
    /// `(r + 1) mod P`: owner of the columns to the right.
    pub next: Rank,
}

/// A ring of `P` workers.
///
/// Rank `0` and rank `P - 1` are adjacent, so the left and right edges of
/// the global image are periodically connected. With a single worker both
/// neighbours are the worker itself.
///
/// # Examples
///
/// ```
/// use relax_core::Rank;
/// use relax_grid::RingTopology;
///
/// let ring = RingTopology::new(4).unwrap();
/// assert_eq!(ring.next(Rank(3)), Rank(0));
/// assert_eq!(ring.prev(Rank(0)), Rank(3));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RingTopology {
    size: usize,
}

impl RingTopology {
    /// Create a ring of `size` workers.
    ///
    /// Returns `Err(GridError::NoWorkers)` if `size == 0`.
    pub fn new(size: usize) -> Result<Self, GridError> {
        if size == 0 {
            return Err(GridError::NoWorkers);
        }
        Ok(Self { size })
    }

    /// Number of workers in the ring.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Right-hand neighbour, `(r + 1) mod P`.
    pub fn next(&self, rank: Rank) -> Rank {
        Rank((rank.index() + 1) % self.size)
    }

    /// Left-hand neighbour, `(r - 1 + P) mod P`.
    pub fn prev(&self, rank: Rank) -> Rank {
        Rank((rank.index() + self.size - 1) % self.size)
    }

    /// Both neighbours of `rank`.
    pub fn neighbours(&self, rank: Rank) -> Neighbours {
        Neighbours {
            prev: self.prev(rank),
            next: self.next(rank),
        }
    }
}
