//! Error types shared by the collaborator traits.
//!
//! [`CommError`] covers the worker group runtime and [`CodecError`] the
//! image codec. Both are fatal to a run: there is no retry policy.

use std::io;

use thiserror::Error;

use crate::id::{Rank, Tag};

/// Errors from the worker group runtime.
#[derive(Debug, Error)]
pub enum CommError {
    /// A peer endpoint went away before the exchange completed.
    #[error("worker {peer} disconnected")]
    Disconnected {
        /// The unreachable peer.
        peer: Rank,
    },
    /// A received message carried a different payload length than expected.
    #[error("malformed exchange from worker {peer}: expected {expected} values, got {actual}")]
    SizeMismatch {
        /// Sender of the malformed message.
        peer: Rank,
        /// Length of the receive buffer.
        expected: usize,
        /// Length of the received payload.
        actual: usize,
    },
    /// A received message carried a different tag than the receive posted.
    #[error("unexpected tag from worker {peer}: expected {expected}, got {actual}")]
    TagMismatch {
        /// Sender of the mismatched message.
        peer: Rank,
        /// Tag the receive was posted with.
        expected: Tag,
        /// Tag carried by the message.
        actual: Tag,
    },
    /// A message of the wrong kind arrived, e.g. halo data where a
    /// collective block was expected.
    #[error("unexpected message from worker {peer}: expected {expected}")]
    UnexpectedMessage {
        /// Sender of the message.
        peer: Rank,
        /// The kind of message the receive was waiting for.
        expected: &'static str,
    },
    /// A rank outside `0..size` was addressed.
    #[error("rank {rank} is outside a group of {size} workers")]
    InvalidRank {
        /// The offending rank.
        rank: Rank,
        /// Number of workers in the group.
        size: usize,
    },
    /// A collective was called with buffers whose lengths do not agree.
    #[error("collective buffer mismatch: {reason}")]
    BufferMismatch {
        /// What went wrong.
        reason: String,
    },
    /// The coordinator announced that it could not load its data.
    #[error("coordinator {root} aborted the run")]
    Aborted {
        /// The coordinator that aborted.
        root: Rank,
    },
    /// The runtime could not be initialised.
    #[error("worker group initialisation failed: {reason}")]
    Init {
        /// What went wrong.
        reason: String,
    },
}

/// Errors from reading or writing an image.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The underlying reader or writer failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The file header could not be parsed.
    #[error("invalid image header: {reason}")]
    InvalidHeader {
        /// What went wrong.
        reason: String,
    },
    /// The file is a valid image in an encoding this codec does not handle.
    #[error("unsupported image encoding: {reason}")]
    Unsupported {
        /// What went wrong.
        reason: String,
    },
    /// The pixel payload ended early.
    #[error("truncated image data: expected {expected} samples, found {found}")]
    Truncated {
        /// Samples announced by the header.
        expected: usize,
        /// Samples actually present.
        found: usize,
    },
    /// A sample buffer does not match the dimensions it is encoded with.
    #[error("buffer of {len} samples does not match a {width}x{height} image")]
    DimensionMismatch {
        /// Image width.
        width: usize,
        /// Image height.
        height: usize,
        /// Length of the supplied buffer.
        len: usize,
    },
}
