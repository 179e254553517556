//! Per-worker iteration driver.
//!
//! A [`Worker`] owns everything one rank touches during the sweep loop:
//! the double-buffered state, the read-only source block, and its place in
//! the ring. Each [`step`](Worker::step) runs
//!
//! ```text
//! Exchanging ──▶ Updating ──▶ Swapped
//! ```
//!
//! and after the last sweep [`finish`](Worker::finish) moves to `Done` and
//! hands back the unpadded result block.

use std::time::Instant;

use relax_core::{Communicator, Tag};
use relax_grid::{GridError, Neighbours, PaddedGrid, Partition, PingPongGrid, RingTopology};
use relax_kernel::relax_interior;

use crate::error::RunError;
use crate::halo::exchange_halo;
use crate::metrics::{elapsed_us, RunMetrics};

/// Where a worker is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Buffers allocated and populated; no sweep started.
    Initialized,
    /// Refreshing ghost columns from the neighbours.
    Exchanging,
    /// Computing the next state.
    Updating,
    /// A sweep completed and the buffers swapped roles.
    Swapped,
    /// The result has been extracted.
    Done,
}

/// One rank's share of the relaxation.
#[derive(Debug)]
pub struct Worker {
    partition: Partition,
    neighbours: Neighbours,
    tag: Tag,
    state: PingPongGrid,
    source: PaddedGrid,
    phase: Phase,
    completed: u32,
}

impl Worker {
    /// Allocate the working buffers for `partition` and load `block`.
    ///
    /// Every slot of every buffer starts at `boundary`; `block` (unpadded,
    /// column-major) populates only the interior of the source buffer.
    pub fn new(
        partition: Partition,
        ring: &RingTopology,
        block: &[f32],
        boundary: f32,
        tag: Tag,
    ) -> Result<Self, GridError> {
        let (w, h) = (partition.local_width(), partition.local_height());
        let mut source = PaddedGrid::new(w, h, boundary)?;
        source.load_interior(block)?;
        Ok(Self {
            neighbours: ring.neighbours(partition.rank()),
            partition,
            tag,
            state: PingPongGrid::new(w, h, boundary)?,
            source,
            phase: Phase::Initialized,
            completed: 0,
        })
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Sweeps completed so far.
    pub fn completed(&self) -> u32 {
        self.completed
    }

    /// The partition this worker owns.
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Ring neighbours.
    pub fn neighbours(&self) -> Neighbours {
        self.neighbours
    }

    /// The latest state, ghost frame included.
    pub fn current(&self) -> &PaddedGrid {
        self.state.current()
    }

    /// The read-only source buffer.
    pub fn source(&self) -> &PaddedGrid {
        &self.source
    }

    /// Run one sweep: exchange, update, swap.
    ///
    /// Adds the time spent in each phase to `metrics`.
    pub fn step<C: Communicator + ?Sized>(
        &mut self,
        comm: &mut C,
        metrics: &mut RunMetrics,
    ) -> Result<(), RunError> {
        let rank = self.partition.rank();

        self.phase = Phase::Exchanging;
        tracing::trace!(%rank, sweep = self.completed, "exchanging halo");
        let t = Instant::now();
        exchange_halo(comm, self.state.current_mut(), self.neighbours, self.tag)?;
        metrics.exchange_us += elapsed_us(t);

        self.phase = Phase::Updating;
        tracing::trace!(%rank, sweep = self.completed, "updating interior");
        let t = Instant::now();
        let (prev, next) = self.state.split();
        relax_interior(next, prev, &self.source)?;
        metrics.update_us += elapsed_us(t);

        self.state.swap();
        self.phase = Phase::Swapped;
        self.completed += 1;
        metrics.iterations = self.completed;
        Ok(())
    }

    /// Run `iterations` sweeps.
    pub fn run<C: Communicator + ?Sized>(
        &mut self,
        comm: &mut C,
        iterations: u32,
        metrics: &mut RunMetrics,
    ) -> Result<(), RunError> {
        for _ in 0..iterations {
            self.step(comm, metrics)?;
        }
        Ok(())
    }

    /// Copy the interior of the current state into an unpadded block and
    /// mark the worker done.
    pub fn finish(&mut self) -> Vec<f32> {
        self.phase = Phase::Done;
        self.state.current().interior_block()
    }
}
