//! Five-point weighted relaxation over the interior of a padded block.
//!
//! ```text
//! next[i,j] = 0.25 * (source[i,j] + prev[i-1,j] + prev[i+1,j] + prev[i,j-1] + prev[i,j+1])
//! ```
//!
//! The sweep is pure Jacobi: it reads only `prev` and `source` and writes
//! only `next`, so cell order is irrelevant to the result.

use relax_grid::{GridError, PaddedGrid};

/// Weight applied to the five-term sum.
pub const WEIGHT: f32 = 0.25;

/// Update one cell from its source value and four neighbours.
///
/// Terms are summed left to right in the order given, which fixes the
/// floating-point result bit-for-bit.
#[inline]
pub fn relax_point(source: f32, west: f32, east: f32, north: f32, south: f32) -> f32 {
    WEIGHT * (source + west + east + north + south)
}

/// Compute every interior cell of `next` from `prev` and `source`.
///
/// Ghost columns and boundary rows of `next` are not written. All three
/// grids must have the same interior shape.
pub fn relax_interior(
    next: &mut PaddedGrid,
    prev: &PaddedGrid,
    source: &PaddedGrid,
) -> Result<(), GridError> {
    check_shape(prev, next)?;
    check_shape(prev, source)?;

    let stride = prev.stride();
    let height = prev.height();
    let p = prev.as_slice();
    let s = source.as_slice();
    let n = next.as_mut_slice();

    for col in prev.interior_cols() {
        let base = col * stride;
        for k in base + 1..=base + height {
            n[k] = relax_point(s[k], p[k - stride], p[k + stride], p[k - 1], p[k + 1]);
        }
    }
    Ok(())
}

fn check_shape(expected: &PaddedGrid, actual: &PaddedGrid) -> Result<(), GridError> {
    if expected.width() != actual.width() || expected.height() != actual.height() {
        return Err(GridError::ShapeMismatch {
            expected_width: expected.width(),
            expected_height: expected.height(),
            actual_width: actual.width(),
            actual_height: actual.height(),
        });
    }
    Ok(())
}
