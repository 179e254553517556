//! 1-D column partitioning of a global image across a worker group.
//!
//! [`Decomposition`] validates the global geometry once; every worker then
//! derives its own [`Partition`]. Only columns are split: each worker owns
//! all `H` rows of a contiguous block of `W / P` columns.

use std::ops::Range;

use relax_core::Rank;

use crate::error::GridError;

/// Validated split of a `width × height` image over `workers` workers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decomposition {
    width: usize,
    height: usize,
    workers: usize,
}

impl Decomposition {
    /// Validate the geometry.
    ///
    /// Returns `Err(GridError::NoWorkers)` if `workers == 0`,
    /// `Err(GridError::Empty)` for a zero-sized image, and
    /// `Err(GridError::NotDivisible)` unless `width % workers == 0`.
    pub fn new(width: usize, height: usize, workers: usize) -> Result<Self, GridError> {
        if workers == 0 {
            return Err(GridError::NoWorkers);
        }
        if width == 0 || height == 0 {
            return Err(GridError::Empty { width, height });
        }
        if width % workers != 0 {
            return Err(GridError::NotDivisible { width, workers });
        }
        Ok(Self {
            width,
            height,
            workers,
        })
    }

    /// Global image width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Global image height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of workers.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Columns per worker, `W / P`.
    pub fn local_width(&self) -> usize {
        self.width / self.workers
    }

    /// Rows per worker, always `H`.
    pub fn local_height(&self) -> usize {
        self.height
    }

    /// Samples in one worker's unpadded block.
    pub fn block_len(&self) -> usize {
        self.local_width() * self.local_height()
    }

    /// Samples in the whole image.
    pub fn global_len(&self) -> usize {
        self.width * self.height
    }

    /// The partition owned by `rank`.
    pub fn partition(&self, rank: Rank) -> Result<Partition, GridError> {
        if rank.index() >= self.workers {
            return Err(GridError::RankOutOfRange {
                rank,
                workers: self.workers,
            });
        }
        let lw = self.local_width();
        let start = rank.index() * lw;
        Ok(Partition {
            rank,
            columns: start..start + lw,
            local_height: self.height,
        })
    }

    /// Every partition, in rank order.
    pub fn partitions(&self) -> impl Iterator<Item = Partition> + '_ {
        let lw = self.local_width();
        (0..self.workers).map(move |r| Partition {
            rank: Rank(r),
            columns: r * lw..(r + 1) * lw,
            local_height: self.height,
        })
    }
}

/// One worker's share of the image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    rank: Rank,
    columns: Range<usize>,
    local_height: usize,
}

impl Partition {
    /// Owning worker.
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Global column range `[rank * W/P, (rank + 1) * W/P)`.
    pub fn columns(&self) -> Range<usize> {
        self.columns.clone()
    }

    /// Number of owned columns.
    pub fn local_width(&self) -> usize {
        self.columns.len()
    }

    /// Number of owned rows.
    pub fn local_height(&self) -> usize {
        self.local_height
    }

    /// Samples in the unpadded block.
    pub fn block_len(&self) -> usize {
        self.local_width() * self.local_height
    }

    /// Offset of this block inside the column-major global buffer.
    pub fn global_offset(&self) -> usize {
        self.columns.start * self.local_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn even_split() {
        let d = Decomposition::new(12, 5, 3).unwrap();
        assert_eq!(d.local_width(), 4);
        assert_eq!(d.local_height(), 5);
        assert_eq!(d.block_len(), 20);
        let p = d.partition(Rank(2)).unwrap();
        assert_eq!(p.columns(), 8..12);
        assert_eq!(p.global_offset(), 40);
    }

    #[test]
    fn rejects_non_divisible_width() {
        assert_eq!(
            Decomposition::new(10, 4, 3),
            Err(GridError::NotDivisible {
                width: 10,
                workers: 3
            })
        );
    }

    #[test]
    fn rejects_zero_workers_and_empty_images() {
        assert_eq!(Decomposition::new(4, 4, 0), Err(GridError::NoWorkers));
        assert!(matches!(
            Decomposition::new(0, 4, 1),
            Err(GridError::Empty { .. })
        ));
        assert!(matches!(
            Decomposition::new(4, 0, 2),
            Err(GridError::Empty { .. })
        ));
    }

    #[test]
    fn more_workers_than_columns_is_not_divisible() {
        assert!(matches!(
            Decomposition::new(2, 2, 4),
            Err(GridError::NotDivisible { .. })
        ));
    }

    #[test]
    fn partition_rejects_foreign_rank() {
        let d = Decomposition::new(4, 2, 2).unwrap();
        assert_eq!(
            d.partition(Rank(2)),
            Err(GridError::RankOutOfRange {
                rank: Rank(2),
                workers: 2
            })
        );
    }

    proptest! {
        #[test]
        fn divisible_widths_partition_exactly(lw in 1usize..20, p in 1usize..9, h in 1usize..10) {
            let w = lw * p;
            let d = Decomposition::new(w, h, p).unwrap();
            prop_assert_eq!(d.local_width(), w / p);
            prop_assert_eq!(p * d.local_width(), w);

            // Ranges tile 0..w in rank order with no gaps or overlap.
            let mut next = 0;
            for (r, part) in d.partitions().enumerate() {
                prop_assert_eq!(part.rank(), Rank(r));
                prop_assert_eq!(part.columns().start, next);
                prop_assert_eq!(part.local_width(), lw);
                prop_assert_eq!(part.global_offset(), next * h);
                next = part.columns().end;
            }
            prop_assert_eq!(next, w);
        }

        #[test]
        fn non_divisible_widths_are_rejected(w in 1usize..200, p in 2usize..9) {
            prop_assume!(w % p != 0);
            let rejected = matches!(
                Decomposition::new(w, 3, p),
                Err(GridError::NotDivisible { .. })
            );
            prop_assert!(rejected);
        }
    }
}
