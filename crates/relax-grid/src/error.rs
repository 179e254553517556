//! Error types for grid construction and partitioning.

use relax_core::Rank;
use thiserror::Error;

/// Errors arising from grid construction, block copies, or partitioning.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// A grid or image with zero columns or zero rows.
    #[error("grid must have at least one cell (got {width}x{height})")]
    Empty {
        /// Requested number of columns.
        width: usize,
        /// Requested number of rows.
        height: usize,
    },
    /// A worker group with zero members.
    #[error("worker count must be at least 1")]
    NoWorkers,
    /// The image width cannot be split evenly across the workers.
    #[error("image width {width} is not divisible by {workers} workers")]
    NotDivisible {
        /// Global image width.
        width: usize,
        /// Worker count.
        workers: usize,
    },
    /// A rank outside the worker group.
    #[error("rank {rank} is outside a group of {workers} workers")]
    RankOutOfRange {
        /// The offending rank.
        rank: Rank,
        /// Worker count.
        workers: usize,
    },
    /// An unpadded block whose length does not match the grid interior.
    #[error("block of {actual} samples does not fit an interior of {expected}")]
    BlockSizeMismatch {
        /// `width * height` of the grid interior.
        expected: usize,
        /// Length of the supplied block.
        actual: usize,
    },
    /// Two grids that must share a shape do not.
    #[error("grid shape {actual_width}x{actual_height} does not match {expected_width}x{expected_height}")]
    ShapeMismatch {
        /// Interior columns of the reference grid.
        expected_width: usize,
        /// Interior rows of the reference grid.
        expected_height: usize,
        /// Interior columns of the offending grid.
        actual_width: usize,
        /// Interior rows of the offending grid.
        actual_height: usize,
    },
}
