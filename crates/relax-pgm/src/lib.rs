//! Binary PGM (`P5`) codec for relax.
//!
//! Reading accepts any 8-bit `P5` file (`maxval` up to 255, `#` comments
//! anywhere in the header). Writing always produces `maxval 255`, with each
//! sample rounded to the nearest integer and clamped to `0..=255`.
//!
//! Sample buffers are row-major: pixel `(x, y)` is at `y * width + x`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod header;

pub use codec::{quantize, read_pgm, write_pgm, PgmCodec};
pub use header::{read_header, PgmHeader};

/// Magic number of a binary graymap.
pub const MAGIC: &[u8; 2] = b"P5";

/// Largest `maxval` this codec reads: one byte per sample.
pub const MAX_SAMPLE: u16 = 255;
