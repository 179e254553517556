//! Benchmark profiles for the relax engine.
//!
//! - [`reference_profile`]: 256x256 image, the size most benches use.
//! - [`stress_profile`]: 1024x512 image for scaling runs.
//! - [`block_fixture`]: populated padded buffers for kernel micro-benches.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use relax_core::SENTINEL;
use relax_grid::{GridError, PaddedGrid};

/// A benchmark image: dimensions plus scanline samples.
#[derive(Clone, Debug)]
pub struct Profile {
    /// Columns.
    pub width: usize,
    /// Rows.
    pub height: usize,
    /// Row-major samples.
    pub pixels: Vec<f32>,
}

/// Deterministic byte-valued pixels.
fn pattern(width: usize, height: usize) -> Vec<f32> {
    (0..width * height)
        .map(|i| ((i.wrapping_mul(2654435761) >> 7) % 256) as f32)
        .collect()
}

/// 256x256 (64K pixels).
pub fn reference_profile() -> Profile {
    Profile {
        width: 256,
        height: 256,
        pixels: pattern(256, 256),
    }
}

/// 1024x512 (512K pixels).
pub fn stress_profile() -> Profile {
    Profile {
        width: 1024,
        height: 512,
        pixels: pattern(1024, 512),
    }
}

/// `(prev, source)` padded buffers for a `width × height` block, filled as
/// a worker would fill them before its first sweep.
pub fn block_fixture(width: usize, height: usize) -> Result<(PaddedGrid, PaddedGrid), GridError> {
    let prev = PaddedGrid::new(width, height, SENTINEL)?;
    let mut source = PaddedGrid::new(width, height, SENTINEL)?;
    source.load_interior(&pattern(width, height))?;
    Ok((prev, source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_have_consistent_sizes() {
        for p in [reference_profile(), stress_profile()] {
            assert_eq!(p.pixels.len(), p.width * p.height);
            assert!(p.pixels.iter().all(|&v| (0.0..256.0).contains(&v)));
        }
    }

    #[test]
    fn block_fixture_populates_source_interior_only() {
        let (prev, source) = block_fixture(4, 3).unwrap();
        assert!(prev.as_slice().iter().all(|&v| v == SENTINEL));
        assert_eq!(source[(0, 1)], SENTINEL);
        assert_eq!(source.interior_block().len(), 12);
    }
}
