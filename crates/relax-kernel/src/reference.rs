//! Single-process reference relaxation.
//!
//! Runs the stencil over an un-partitioned image with the same boundary
//! conditions a ring of workers produces: columns wrap around (the last
//! column is the west neighbour of the first), and the rows above and
//! below the image hold `boundary` forever. Because the per-cell
//! arithmetic is shared with [`relax_interior`], a distributed run over
//! any worker count agrees with this bit-for-bit.

use relax_grid::{GridError, PaddedGrid, PingPongGrid};

use crate::stencil::relax_interior;

/// Relax a column-major `width × height` image for `iterations` sweeps.
///
/// Both working buffers start with every slot at `boundary`; `image` only
/// populates the source term. Returns the final state, column-major.
pub fn relax_serial(
    image: &[f32],
    width: usize,
    height: usize,
    iterations: u32,
    boundary: f32,
) -> Result<Vec<f32>, GridError> {
    let mut source = PaddedGrid::new(width, height, boundary)?;
    source.load_interior(image)?;
    let mut state = PingPongGrid::new(width, height, boundary)?;

    for _ in 0..iterations {
        wrap_columns(state.current_mut());
        let (prev, next) = state.split();
        relax_interior(next, prev, &source)?;
        state.swap();
    }
    Ok(state.current().interior_block())
}

/// Fill both ghost columns from the opposite edge of the interior.
fn wrap_columns(grid: &mut PaddedGrid) {
    let width = grid.width();
    let (last, west_ghost) = grid.split_columns(width, 0);
    west_ghost.copy_from_slice(last);
    let (first, east_ghost) = grid.split_columns(1, width + 1);
    east_ghost.copy_from_slice(first);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_iterations_returns_initial_fill() {
        let out = relax_serial(&[1.0, 2.0, 3.0, 4.0], 2, 2, 0, 255.0).unwrap();
        assert_eq!(out, vec![255.0; 4]);
    }

    #[test]
    fn two_by_two_first_sweep() {
        // Column-major: column 0 is black, column 1 is 200.
        let image = [0.0, 0.0, 200.0, 200.0];
        let out = relax_serial(&image, 2, 2, 1, 255.0).unwrap();
        assert_eq!(out, vec![255.0, 255.0, 305.0, 305.0]);
    }

    #[test]
    fn two_by_two_second_sweep_sees_wrapped_neighbours() {
        let image = [0.0, 0.0, 200.0, 200.0];
        let out = relax_serial(&image, 2, 2, 2, 255.0).unwrap();
        assert_eq!(out, vec![280.0, 280.0, 317.5, 317.5]);
    }

    #[test]
    fn uniform_two_row_image_follows_scalar_recurrence() {
        // Every cell sees two equal horizontal neighbours, one interior row
        // and one boundary row: x' = (s + 3x + b) / 4.
        let (s, b) = (100.0f32, 255.0f32);
        let out = relax_serial(&[s; 8], 4, 2, 3, b).unwrap();
        let mut x = b;
        for _ in 0..3 {
            x = 0.25 * (s + 3.0 * x + b);
        }
        assert_relative_eq!(x, 312.8125);
        assert!(out.iter().all(|&v| v == 312.8125));
    }

    #[test]
    fn single_column_wraps_onto_itself() {
        let out = relax_serial(&[0.0, 0.0, 0.0], 1, 3, 1, 4.0).unwrap();
        assert_eq!(out, vec![4.0, 4.0, 4.0]);
    }

    #[test]
    fn zero_source_keeps_boundary_fill() {
        let out = relax_serial(&vec![0.0; 6 * 5], 6, 5, 50, 255.0).unwrap();
        assert!(out.iter().all(|&v| v == 255.0));
    }

    #[test]
    fn reaches_a_steady_state() {
        let image: Vec<f32> = (0..6 * 5).map(|k| (k * 37 % 256) as f32).collect();
        let a = relax_serial(&image, 6, 5, 400, 255.0).unwrap();
        let b = relax_serial(&image, 6, 5, 401, 255.0).unwrap();
        for (x, y) in a.iter().zip(&b) {
            assert_relative_eq!(*x, *y, max_relative = 1e-5);
        }
    }

    #[test]
    fn mismatched_image_rejected() {
        let err = relax_serial(&[0.0; 3], 2, 2, 1, 255.0).unwrap_err();
        assert_eq!(
            err,
            GridError::BlockSizeMismatch {
                expected: 4,
                actual: 3
            }
        );
    }
}
