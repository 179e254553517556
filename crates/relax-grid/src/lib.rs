//! Grid storage and decomposition geometry for relax.
//!
//! Everything the engine indexes lives here, so that the offset
//! arithmetic is centralised and testable without any communication:
//!
//! - [`PaddedGrid`]: one worker's column block plus a one-cell ghost frame.
//! - [`PingPongGrid`]: two padded grids with an O(1) current/next swap.
//! - [`Decomposition`] / [`Partition`]: 1-D column partitioning.
//! - [`RingTopology`]: the periodic neighbour table used by halo exchange.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod padded;
pub mod partition;
pub mod pingpong;
pub mod ring;

pub use error::GridError;
pub use padded::PaddedGrid;
pub use partition::{Decomposition, Partition};
pub use pingpong::{Buffer, PingPongGrid};
pub use ring::{Neighbours, RingTopology};
