//! Test utilities and in-memory collaborators for relax development.
//!
//! - [`MemoryCodec`]: an [`ImageCodec`] backed by a map instead of files.
//! - [`RecordingComm`]: wraps a [`Communicator`] and logs every call.
//! - [`with_group`]: runs a closure on every rank of a [`ChannelComm`]
//!   group, one thread each.
//! - [`fixtures`]: small images with known contents.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::thread;

use relax_comm::ChannelComm;
use relax_core::{CodecError, CommError, Communicator, ImageCodec, Rank, Tag};

/// An image held by [`MemoryCodec`]. Samples are row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredImage {
    pub width: usize,
    pub height: usize,
    pub samples: Vec<f32>,
}

/// In-memory [`ImageCodec`].
///
/// Pre-populate inputs with [`insert`](MemoryCodec::insert); read what the
/// engine wrote back with [`get`](MemoryCodec::get). Paths that were never
/// inserted behave like missing files.
#[derive(Debug, Default)]
pub struct MemoryCodec {
    images: Mutex<HashMap<PathBuf, StoredImage>>,
    fail_decode: bool,
}

impl MemoryCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// A codec whose headers read fine but whose pixel data never decodes.
    pub fn failing_decode() -> Self {
        Self {
            fail_decode: true,
            ..Self::default()
        }
    }

    pub fn insert(&self, path: impl Into<PathBuf>, width: usize, height: usize, samples: Vec<f32>) {
        assert_eq!(samples.len(), width * height, "fixture has wrong length");
        self.lock().insert(
            path.into(),
            StoredImage {
                width,
                height,
                samples,
            },
        );
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<StoredImage> {
        self.lock().get(path.as_ref()).cloned()
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.lock().contains_key(path.as_ref())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, StoredImage>> {
        self.images.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn stored(&self, path: &Path) -> Result<StoredImage, CodecError> {
        self.get(path).ok_or_else(|| {
            CodecError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            ))
        })
    }
}

impl ImageCodec for MemoryCodec {
    fn dimensions(&self, path: &Path) -> Result<(usize, usize), CodecError> {
        let image = self.stored(path)?;
        Ok((image.width, image.height))
    }

    fn decode(&self, path: &Path) -> Result<Vec<f32>, CodecError> {
        let image = self.stored(path)?;
        if self.fail_decode {
            return Err(CodecError::Truncated {
                expected: image.samples.len(),
                found: 0,
            });
        }
        Ok(image.samples)
    }

    fn encode(
        &self,
        path: &Path,
        samples: &[f32],
        width: usize,
        height: usize,
    ) -> Result<(), CodecError> {
        if samples.len() != width * height {
            return Err(CodecError::DimensionMismatch {
                width,
                height,
                len: samples.len(),
            });
        }
        self.insert(path, width, height, samples.to_vec());
        Ok(())
    }
}

/// A [`Communicator`] that forwards to `inner` and records each call by
/// name (`"broadcast_status"`, `"scatter"`, `"gather"`, `"send_receive"`).
#[derive(Debug)]
pub struct RecordingComm<C> {
    pub inner: C,
    pub calls: Vec<&'static str>,
}

impl<C> RecordingComm<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            calls: Vec::new(),
        }
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls.iter().filter(|&&c| c == name).count()
    }
}

impl<C: Communicator> Communicator for RecordingComm<C> {
    fn rank(&self) -> Rank {
        self.inner.rank()
    }

    fn size(&self) -> usize {
        self.inner.size()
    }

    fn broadcast_status(&mut self, root: Rank, ok: bool) -> Result<bool, CommError> {
        self.calls.push("broadcast_status");
        self.inner.broadcast_status(root, ok)
    }

    fn scatter(
        &mut self,
        root: Rank,
        global: Option<&[f32]>,
        local: &mut [f32],
    ) -> Result<(), CommError> {
        self.calls.push("scatter");
        self.inner.scatter(root, global, local)
    }

    fn gather(
        &mut self,
        root: Rank,
        local: &[f32],
        global: Option<&mut [f32]>,
    ) -> Result<(), CommError> {
        self.calls.push("gather");
        self.inner.gather(root, local, global)
    }

    fn send_receive(
        &mut self,
        send: &[f32],
        dest: Rank,
        recv: &mut [f32],
        source: Rank,
        tag: Tag,
    ) -> Result<(), CommError> {
        self.calls.push("send_receive");
        self.inner.send_receive(send, dest, recv, source, tag)
    }
}

/// Run `f` on every endpoint of a fresh `size`-rank group, one thread per
/// rank, and return the results in rank order.
///
/// Panics (failing the test) if any rank panics.
pub fn with_group<T, F>(size: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(ChannelComm) -> T + Sync,
{
    let group = ChannelComm::group(size).expect("group size must be positive");
    thread::scope(|s| {
        let handles: Vec<_> = group
            .into_iter()
            .map(|comm| s.spawn(|| f(comm)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("worker thread panicked"))
            .collect()
    })
}
