//! relax: iterative smoothing of a grayscale image over a group of workers.
//!
//! This is the facade crate that re-exports the public API of every relax
//! sub-crate.
//!
//! # Quick start
//!
//! ```rust
//! use relax::prelude::*;
//!
//! let dir = std::env::temp_dir().join(format!("relax-doc-{}", std::process::id()));
//! std::fs::create_dir_all(&dir).unwrap();
//! let input = dir.join("in.pgm");
//!
//! // A 4x2 image: black on the left, 200 on the right.
//! let pixels = [0.0, 0.0, 200.0, 200.0, 0.0, 0.0, 200.0, 200.0];
//! PgmCodec.encode(&input, &pixels, 4, 2).unwrap();
//!
//! let mut config = RunConfig::new(&input, 10);
//! config.workers = 2;
//! config.output_dir = dir.clone();
//! let outcome = run_threaded(&config, &PgmCodec).unwrap();
//!
//! assert_eq!(outcome.output, Some(dir.join("output_10.pgm")));
//! assert_eq!(PgmCodec.dimensions(&dir.join("output_10.pgm")).unwrap(), (4, 2));
//! # std::fs::remove_dir_all(&dir).unwrap();
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `relax-core` | `Rank`, `Tag`, collaborator traits, shared errors |
//! | [`grid`] | `relax-grid` | Padded grids, double buffering, partitioning, ring topology |
//! | [`kernel`] | `relax-kernel` | The 5-point stencil and the single-process reference |
//! | [`comm`] | `relax-comm` | Channel and MPI worker groups |
//! | [`pgm`] | `relax-pgm` | Binary PGM codec |
//! | [`engine`] | `relax-engine` | Configuration, halo exchange, distribution, runs |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Identifiers, collaborator traits, and shared errors (`relax-core`).
pub use relax_core as types;

/// Grid storage and decomposition geometry (`relax-grid`).
pub use relax_grid as grid;

/// The relaxation stencil (`relax-kernel`).
pub use relax_kernel as kernel;

/// Worker group runtimes (`relax-comm`).
///
/// [`comm::ChannelComm`] is always available; `MpiComm` needs the `mpi`
/// feature.
pub use relax_comm as comm;

/// Binary PGM reader and writer (`relax-pgm`).
pub use relax_pgm as pgm;

/// The relaxation engine (`relax-engine`).
pub use relax_engine as engine;

/// Common imports for typical relax usage.
pub mod prelude {
    // Core types and traits
    pub use relax_core::{Communicator, ImageCodec, Rank, Tag, COORDINATOR, HALO_TAG, SENTINEL};

    // Errors
    pub use relax_core::{CodecError, CommError};
    pub use relax_engine::{ConfigError, ErrorKind, RunError};

    // Grid
    pub use relax_grid::{Decomposition, PaddedGrid, RingTopology};

    // Runtimes and codec
    pub use relax_comm::ChannelComm;
    pub use relax_pgm::PgmCodec;

    // Engine
    pub use relax_engine::{run_threaded, run_worker, RunConfig, RunMetrics, RunOutcome};
}
