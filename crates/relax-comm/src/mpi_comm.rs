//! MPI-backed worker group over `MPI_COMM_WORLD`.
//!
//! One process per worker, launched with `mpirun -n P relax ...`. The
//! halo exchange maps onto `MPI_Sendrecv`, scatter and gather onto the
//! matching collectives, and the coordinator status onto a one-byte
//! broadcast.

use mpi::environment::Universe;
use mpi::point_to_point::send_receive_into_with_tags;
use mpi::topology::SimpleCommunicator;
use mpi::traits::*;
use relax_core::{CommError, Communicator, Rank, Tag};

use crate::{check_global, check_rank};

/// This process's endpoint in the MPI world.
pub struct MpiComm {
    world: SimpleCommunicator,
    rank: Rank,
    size: usize,
    // Finalizes MPI on drop; declared last so `world` is released first.
    _universe: Universe,
}

impl MpiComm {
    /// Initialise MPI and attach to the world communicator.
    ///
    /// Returns `Err(CommError::Init)` if MPI was already initialised in this
    /// process.
    pub fn init() -> Result<Self, CommError> {
        let universe = mpi::initialize().ok_or_else(|| CommError::Init {
            reason: "MPI is already initialised in this process".into(),
        })?;
        let world = universe.world();
        let rank = Rank(world.rank() as usize);
        let size = world.size() as usize;
        tracing::debug!(%rank, size, "joined MPI world");
        Ok(Self {
            world,
            rank,
            size,
            _universe: universe,
        })
    }

    /// Terminate every process in the world with `code`.
    pub fn abort(&self, code: i32) -> ! {
        self.world.abort(code)
    }
}

/// Ranks are validated against the world size, which MPI reports as `i32`.
fn mpi_rank(rank: Rank) -> mpi::Rank {
    rank.index() as mpi::Rank
}

impl Communicator for MpiComm {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn broadcast_status(&mut self, root: Rank, ok: bool) -> Result<bool, CommError> {
        check_rank(root, self.size)?;
        let mut flag = u8::from(ok);
        self.world.process_at_rank(mpi_rank(root)).broadcast_into(&mut flag);
        Ok(flag != 0)
    }

    fn scatter(
        &mut self,
        root: Rank,
        global: Option<&[f32]>,
        local: &mut [f32],
    ) -> Result<(), CommError> {
        check_rank(root, self.size)?;
        let root_process = self.world.process_at_rank(mpi_rank(root));
        if self.rank != root {
            root_process.scatter_into(local);
            return Ok(());
        }
        check_global(global.map(<[f32]>::len), local.len(), self.size)?;
        if let Some(global) = global {
            root_process.scatter_into_root(global, local);
        }
        Ok(())
    }

    fn gather(
        &mut self,
        root: Rank,
        local: &[f32],
        global: Option<&mut [f32]>,
    ) -> Result<(), CommError> {
        check_rank(root, self.size)?;
        let root_process = self.world.process_at_rank(mpi_rank(root));
        if self.rank != root {
            root_process.gather_into(local);
            return Ok(());
        }
        check_global(global.as_deref().map(<[f32]>::len), local.len(), self.size)?;
        if let Some(global) = global {
            root_process.gather_into_root(local, global);
        }
        Ok(())
    }

    fn send_receive(
        &mut self,
        send: &[f32],
        dest: Rank,
        recv: &mut [f32],
        source: Rank,
        tag: Tag,
    ) -> Result<(), CommError> {
        check_rank(dest, self.size)?;
        check_rank(source, self.size)?;
        let status = send_receive_into_with_tags(
            send,
            &self.world.process_at_rank(mpi_rank(dest)),
            tag.0,
            recv,
            &self.world.process_at_rank(mpi_rank(source)),
            tag.0,
        );
        let actual = status.count(f32::equivalent_datatype()) as usize;
        if actual != recv.len() {
            return Err(CommError::SizeMismatch {
                peer: source,
                expected: recv.len(),
                actual,
            });
        }
        Ok(())
    }
}
