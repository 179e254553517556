//! Worker group runtimes implementing [`relax_core::Communicator`].
//!
//! - [`ChannelComm`]: one endpoint per thread, connected by a full mesh of
//!   crossbeam channels. Always available; used by the threaded runner and
//!   by every test.
//! - `MpiComm` (feature `mpi`): one endpoint per MPI process over
//!   `MPI_COMM_WORLD`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod channel;
#[cfg(feature = "mpi")]
pub mod mpi_comm;

pub use channel::ChannelComm;
#[cfg(feature = "mpi")]
pub use mpi_comm::MpiComm;

use relax_core::{CommError, Rank};

/// Reject ranks outside `0..size`.
pub(crate) fn check_rank(rank: Rank, size: usize) -> Result<(), CommError> {
    if rank.index() >= size {
        return Err(CommError::InvalidRank { rank, size });
    }
    Ok(())
}

/// Validate the root-side buffer of a scatter or gather.
pub(crate) fn check_global(
    global_len: Option<usize>,
    block_len: usize,
    size: usize,
) -> Result<(), CommError> {
    match global_len {
        None => Err(CommError::BufferMismatch {
            reason: "root must supply the global buffer".into(),
        }),
        Some(len) if len != block_len * size => Err(CommError::BufferMismatch {
            reason: format!(
                "global buffer holds {len} values, expected {} ({size} blocks of {block_len})",
                block_len * size
            ),
        }),
        Some(_) => Ok(()),
    }
}
