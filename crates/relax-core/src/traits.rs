//! Collaborator traits consumed by the relaxation engine.
//!
//! The engine's distribution and halo exchange logic is written purely
//! in terms of [`Communicator`]; all file access goes through
//! [`ImageCodec`]. Neither trait says anything about transport or
//! on-disk format.

use std::path::Path;

use crate::error::{CodecError, CommError};
use crate::id::{Rank, Tag};

/// A member of a fixed-size worker group.
///
/// Every method that moves data is blocking: it returns only once this
/// worker's side of the operation has completed. Collectives must be
/// entered by every member of the group, in the same order.
///
/// Methods take `&mut self` because an endpoint belongs to exactly one
/// worker and is never shared.
pub trait Communicator {
    /// This worker's rank, in `0..size()`.
    fn rank(&self) -> Rank;

    /// Number of workers in the group.
    fn size(&self) -> usize;

    /// Whether this worker is `root`.
    fn is_root(&self, root: Rank) -> bool {
        self.rank() == root
    }

    /// Announce `root`'s status to every worker.
    ///
    /// `ok` is only significant on `root`. Returns `root`'s value on every
    /// worker, so a coordinator that failed to load its data can stop the
    /// whole group before any data is distributed.
    fn broadcast_status(&mut self, root: Rank, ok: bool) -> Result<bool, CommError>;

    /// Distribute equal-size contiguous blocks of `global` from `root`.
    ///
    /// Worker `r` receives `global[r * n..(r + 1) * n]` into `local`, where
    /// `n = local.len()`. `global` must be `Some` on `root` with length
    /// `n * size()`; it is ignored elsewhere.
    fn scatter(
        &mut self,
        root: Rank,
        global: Option<&[f32]>,
        local: &mut [f32],
    ) -> Result<(), CommError>;

    /// Inverse of [`scatter`](Communicator::scatter): collect every
    /// worker's `local` block into `global` on `root`, in rank order.
    fn gather(
        &mut self,
        root: Rank,
        local: &[f32],
        global: Option<&mut [f32]>,
    ) -> Result<(), CommError>;

    /// Send `send` to `dest` and receive exactly `recv.len()` values from
    /// `source`, both carrying `tag`, as one combined operation.
    ///
    /// The send never waits for the matching receive, so a ring of workers
    /// that all call this in the same order cannot deadlock.
    fn send_receive(
        &mut self,
        send: &[f32],
        dest: Rank,
        recv: &mut [f32],
        source: Rank,
        tag: Tag,
    ) -> Result<(), CommError>;
}

/// Reads and writes single-channel grayscale images as flat `f32` buffers.
///
/// Buffers are row-major (scanline order): sample `(x, y)` lives at
/// `y * width + x`.
pub trait ImageCodec: Send + Sync {
    /// Read `(width, height)` from the file header without decoding pixels.
    fn dimensions(&self, path: &Path) -> Result<(usize, usize), CodecError>;

    /// Decode the whole image into `width * height` samples.
    fn decode(&self, path: &Path) -> Result<Vec<f32>, CodecError>;

    /// Encode `samples` as a `width × height` image at `path`.
    fn encode(
        &self,
        path: &Path,
        samples: &[f32],
        width: usize,
        height: usize,
    ) -> Result<(), CodecError>;
}
