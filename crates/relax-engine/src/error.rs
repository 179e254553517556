//! Top-level run error and its classification.

use relax_core::{CodecError, CommError, Rank};
use relax_grid::GridError;
use thiserror::Error;

use crate::config::ConfigError;

/// Coarse failure category, used to pick an exit status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected before any allocation or communication. Soft failure.
    Configuration,
    /// The image could not be read or the result could not be written.
    Io,
    /// A worker or the group runtime failed mid-run.
    Communication,
    /// A broken internal invariant, e.g. a worker thread panicked.
    Internal,
}

/// Everything that can stop a run.
#[derive(Debug, Error)]
pub enum RunError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Image read or write failed.
    #[error("image I/O failed: {0}")]
    Codec(#[from] CodecError),
    /// The worker group failed.
    #[error("communication failed: {0}")]
    Comm(#[from] CommError),
    /// Buffer geometry disagreed with the plan.
    #[error("grid error: {0}")]
    Grid(#[from] GridError),
    /// A worker thread could not be started.
    #[error("failed to spawn worker {rank}: {source}")]
    Spawn {
        /// Rank the thread was meant to run.
        rank: Rank,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },
    /// A worker thread panicked.
    #[error("worker {rank} panicked")]
    WorkerPanicked {
        /// Rank of the panicked worker.
        rank: Rank,
    },
}

impl RunError {
    /// Which category this failure belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RunError::Config(_) => ErrorKind::Configuration,
            RunError::Codec(_) => ErrorKind::Io,
            RunError::Comm(_) => ErrorKind::Communication,
            RunError::Grid(_) | RunError::Spawn { .. } | RunError::WorkerPanicked { .. } => {
                ErrorKind::Internal
            }
        }
    }

    /// Whether this error is only a consequence of another worker's
    /// failure (a vanished peer or a coordinator-initiated abort).
    pub fn is_secondary(&self) -> bool {
        matches!(
            self,
            RunError::Comm(CommError::Disconnected { .. } | CommError::Aborted { .. })
        )
    }
}
