//! Raster read/write and the file-backed [`ImageCodec`].

use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::Path;

use relax_core::{CodecError, ImageCodec};

use crate::header::{read_header, PgmHeader};

/// Upper bound on the raster buffer reserved from header dimensions alone.
const PREALLOC_LIMIT: usize = 1 << 20;

/// Map a relaxed sample to an output byte: round to nearest, clamp to
/// `0..=255`. NaN maps to 0.
pub fn quantize(sample: f32) -> u8 {
    // Float-to-int `as` saturates and sends NaN to 0.
    sample.round().clamp(0.0, 255.0) as u8
}

/// Decode a whole `P5` image from `r` into row-major samples.
pub fn read_pgm(r: &mut dyn Read) -> Result<(PgmHeader, Vec<f32>), CodecError> {
    let header = read_header(r)?;
    let expected = header.sample_count();
    let mut raster = Vec::with_capacity(expected.min(PREALLOC_LIMIT));
    r.take(expected as u64).read_to_end(&mut raster)?;
    if raster.len() < expected {
        return Err(CodecError::Truncated {
            expected,
            found: raster.len(),
        });
    }
    Ok((header, raster.into_iter().map(f32::from).collect()))
}

/// Encode `samples` as a `width × height` `P5` image with `maxval 255`.
pub fn write_pgm(
    w: &mut dyn Write,
    samples: &[f32],
    width: usize,
    height: usize,
) -> Result<(), CodecError> {
    if width == 0 || height == 0 || width.checked_mul(height) != Some(samples.len()) {
        return Err(CodecError::DimensionMismatch {
            width,
            height,
            len: samples.len(),
        });
    }
    write!(w, "P5\n{width} {height}\n255\n")?;
    let raster: Vec<u8> = samples.iter().copied().map(quantize).collect();
    w.write_all(&raster)?;
    Ok(())
}

/// [`ImageCodec`] over binary PGM files on disk.
#[derive(Clone, Copy, Debug, Default)]
pub struct PgmCodec;

impl ImageCodec for PgmCodec {
    fn dimensions(&self, path: &Path) -> Result<(usize, usize), CodecError> {
        let mut r = BufReader::new(File::open(path)?);
        let header = read_header(&mut r)?;
        Ok((header.width, header.height))
    }

    fn decode(&self, path: &Path) -> Result<Vec<f32>, CodecError> {
        let mut r = BufReader::new(File::open(path)?);
        let (header, samples) = read_pgm(&mut r)?;
        tracing::debug!(
            path = %path.display(),
            width = header.width,
            height = header.height,
            maxval = header.maxval,
            "decoded image"
        );
        Ok(samples)
    }

    fn encode(
        &self,
        path: &Path,
        samples: &[f32],
        width: usize,
        height: usize,
    ) -> Result<(), CodecError> {
        // Encode fully before touching the file system.
        let mut bytes = Vec::with_capacity(samples.len() + 32);
        write_pgm(&mut bytes, samples, width, height)?;
        fs::write(path, &bytes)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote image");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn quantize_rounds_and_clamps() {
        assert_eq!(quantize(0.0), 0);
        assert_eq!(quantize(127.4), 127);
        assert_eq!(quantize(127.5), 128);
        assert_eq!(quantize(305.0), 255);
        assert_eq!(quantize(-3.0), 0);
        assert_eq!(quantize(f32::NAN), 0);
    }

    #[test]
    fn reads_row_major_samples() {
        let mut c = Cursor::new(&b"P5\n3 2\n255\n\x00\x01\x02\x0a\x0b\xff"[..]);
        let (h, samples) = read_pgm(&mut c).unwrap();
        assert_eq!((h.width, h.height), (3, 2));
        assert_eq!(samples, vec![0.0, 1.0, 2.0, 10.0, 11.0, 255.0]);
    }

    #[test]
    fn samples_are_not_rescaled_by_maxval() {
        let mut c = Cursor::new(&b"P5\n2 1\n15\n\x0f\x07"[..]);
        let (h, samples) = read_pgm(&mut c).unwrap();
        assert_eq!(h.maxval, 15);
        assert_eq!(samples, vec![15.0, 7.0]);
    }

    #[test]
    fn short_raster_is_truncated() {
        let mut c = Cursor::new(&b"P5\n2 2\n255\n\x01\x02\x03"[..]);
        assert!(matches!(
            read_pgm(&mut c),
            Err(CodecError::Truncated {
                expected: 4,
                found: 3
            })
        ));
    }

    #[test]
    fn oversized_header_on_short_file_is_truncated() {
        let mut c = Cursor::new(&b"P5\n4000000000 4000000\n255\n\x00"[..]);
        assert!(matches!(
            read_pgm(&mut c),
            Err(CodecError::Truncated { found: 1, .. })
        ));
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let mut c = Cursor::new(&b"P5\n1 1\n255\n\x05junk"[..]);
        assert_eq!(read_pgm(&mut c).unwrap().1, vec![5.0]);
    }

    #[test]
    fn writes_maxval_255_header_and_quantized_raster() {
        let mut out = Vec::new();
        write_pgm(&mut out, &[0.0, 254.6, 305.0, -1.0], 2, 2).unwrap();
        assert_eq!(out, b"P5\n2 2\n255\n\x00\xff\xff\x00");
    }

    #[test]
    fn write_rejects_mismatched_buffer() {
        let mut out = Vec::new();
        let err = write_pgm(&mut out, &[0.0; 5], 2, 2).unwrap_err();
        assert!(matches!(
            err,
            CodecError::DimensionMismatch {
                width: 2,
                height: 2,
                len: 5
            }
        ));
        assert!(out.is_empty());
    }
}
