//! Per-iteration halo exchange around the worker ring.
//!
//! Two blocking combined send/receive phases, issued in the same order by
//! every worker:
//!
//! ```text
//! phase 1:  interior col W  ──▶ next      ghost col 0   ◀── prev
//! phase 2:  interior col 1  ──▶ prev      ghost col W+1 ◀── next
//! ```
//!
//! Each message is rows `1..=H` of one column; the fixed boundary rows are
//! never sent. Rank `0`'s `prev` is rank `P - 1`, so the image wraps
//! around horizontally.

use relax_core::{CommError, Communicator, Tag};
use relax_grid::{Neighbours, PaddedGrid};

/// Refresh both ghost columns of `grid` from the neighbouring workers.
pub fn exchange_halo<C: Communicator + ?Sized>(
    comm: &mut C,
    grid: &mut PaddedGrid,
    neighbours: Neighbours,
    tag: Tag,
) -> Result<(), CommError> {
    let width = grid.width();

    let (east_edge, west_ghost) = grid.split_columns(width, 0);
    comm.send_receive(east_edge, neighbours.next, west_ghost, neighbours.prev, tag)?;

    let (west_edge, east_ghost) = grid.split_columns(1, width + 1);
    comm.send_receive(west_edge, neighbours.prev, east_ghost, neighbours.next, tag)?;

    Ok(())
}
