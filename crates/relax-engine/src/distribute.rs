//! One-time distribution of the image and collection of the result.
//!
//! The image travels in column-major order (`(x, y)` at `x * H + y`), so a
//! worker's column partition is one contiguous run of `W/P * H` samples and
//! scatter/gather reduce to equal-size block collectives in rank order.
//! The codec speaks scanline order; [`to_column_major`] and
//! [`to_row_major`] convert at the coordinator.

use relax_core::{CommError, Communicator, Rank};
use relax_grid::{GridError, Partition};

/// Reorder a scanline (`y * W + x`) buffer to column-major (`x * H + y`).
pub fn to_column_major(
    row_major: &[f32],
    width: usize,
    height: usize,
) -> Result<Vec<f32>, GridError> {
    check_len(row_major.len(), width, height)?;
    let mut out = Vec::with_capacity(row_major.len());
    for x in 0..width {
        out.extend((0..height).map(|y| row_major[y * width + x]));
    }
    Ok(out)
}

/// Reorder a column-major (`x * H + y`) buffer to scanline (`y * W + x`).
pub fn to_row_major(col_major: &[f32], width: usize, height: usize) -> Result<Vec<f32>, GridError> {
    check_len(col_major.len(), width, height)?;
    let mut out = Vec::with_capacity(col_major.len());
    for y in 0..height {
        out.extend((0..width).map(|x| col_major[x * height + y]));
    }
    Ok(out)
}

fn check_len(len: usize, width: usize, height: usize) -> Result<(), GridError> {
    if len != width * height {
        return Err(GridError::BlockSizeMismatch {
            expected: width * height,
            actual: len,
        });
    }
    Ok(())
}

/// Receive this worker's block of the column-major image from `root`.
///
/// `global` is only read on `root`.
pub fn scatter_image<C: Communicator + ?Sized>(
    comm: &mut C,
    root: Rank,
    global: Option<&[f32]>,
    partition: &Partition,
) -> Result<Vec<f32>, CommError> {
    let mut block = vec![0.0; partition.block_len()];
    comm.scatter(root, global, &mut block)?;
    Ok(block)
}

/// Send this worker's block to `root`; returns the assembled column-major
/// image on `root` and `None` elsewhere.
pub fn gather_image<C: Communicator + ?Sized>(
    comm: &mut C,
    root: Rank,
    block: &[f32],
    global_len: usize,
) -> Result<Option<Vec<f32>>, CommError> {
    if !comm.is_root(root) {
        comm.gather(root, block, None)?;
        return Ok(None);
    }
    let mut global = vec![0.0; global_len];
    comm.gather(root, block, Some(&mut global))?;
    Ok(Some(global))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_major_groups_columns() {
        // 3x2 scanline image:
        //   0 1 2
        //   3 4 5
        let rows = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let cols = to_column_major(&rows, 3, 2).unwrap();
        assert_eq!(cols, vec![0.0, 3.0, 1.0, 4.0, 2.0, 5.0]);
        assert_eq!(to_row_major(&cols, 3, 2).unwrap(), rows);
    }

    #[test]
    fn partition_block_is_contiguous_in_column_major() {
        use relax_grid::Decomposition;
        let rows: Vec<f32> = (0..12).map(|v| v as f32).collect(); // 4x3
        let cols = to_column_major(&rows, 4, 3).unwrap();
        let part = Decomposition::new(4, 3, 2)
            .unwrap()
            .partition(Rank(1))
            .unwrap();
        let block = &cols[part.global_offset()..part.global_offset() + part.block_len()];
        // Columns 2 and 3 of the scanline image.
        assert_eq!(block, [2.0, 6.0, 10.0, 3.0, 7.0, 11.0]);
    }

    #[test]
    fn length_mismatch_rejected() {
        assert!(to_column_major(&[0.0; 5], 2, 3).is_err());
        assert!(to_row_major(&[0.0; 7], 2, 3).is_err());
    }
}
