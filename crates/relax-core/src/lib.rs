//! Core types and traits for the relax workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the identifiers, error types, and the two collaborator traits the
//! relaxation engine is written against:
//!
//! - [`Communicator`]: the worker group runtime (rank, scatter, gather,
//!   paired send/receive).
//! - [`ImageCodec`]: the grayscale image reader/writer.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod traits;

pub use error::{CodecError, CommError};
pub use id::{Rank, Tag};
pub use traits::{Communicator, ImageCodec};

/// Fill value for every padded buffer before it is populated.
///
/// The fixed top and bottom boundary rows keep this value for the whole
/// run because they are neither exchanged nor updated.
pub const SENTINEL: f32 = 255.0;

/// Tag carried by every halo exchange message.
pub const HALO_TAG: Tag = Tag(333);

/// The rank that owns the global image and performs all file I/O.
pub const COORDINATOR: Rank = Rank(0);
