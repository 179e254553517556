//! Padded column-block grid with a one-cell ghost frame.
//!
//! A worker owning `width` columns of `height` rows stores them in a
//! `(width + 2) × (height + 2)` buffer. Columns are contiguous:
//!
//! ```text
//! flat(col, row) = col * (height + 2) + row
//!
//!            col 0     1 ..= width      width+1
//! row 0      [ fixed boundary row (sentinel)      ]
//! row 1..=h  [ ghost | interior columns  | ghost ]
//! row h+1    [ fixed boundary row (sentinel)      ]
//! ```
//!
//! Ghost columns `0` and `width + 1` are written only by halo exchange;
//! rows `0` and `height + 1` keep their fill value for the whole run.
//! Interior cell `(col, row)` corresponds to entry
//! `(col - 1) * height + (row - 1)` of an unpadded block.

use std::ops::{Index, IndexMut, RangeInclusive};

use crate::error::GridError;

/// A padded grid stored as one flat, column-major `Vec<f32>`.
#[derive(Clone, Debug, PartialEq)]
pub struct PaddedGrid {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl PaddedGrid {
    /// Allocate a grid with `width × height` interior cells, every slot
    /// (interior, ghost columns and boundary rows) set to `fill`.
    ///
    /// Returns `Err(GridError::Empty)` if either dimension is zero.
    pub fn new(width: usize, height: usize, fill: f32) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::Empty { width, height });
        }
        Ok(Self {
            width,
            height,
            data: vec![fill; (width + 2) * (height + 2)],
        })
    }

    /// Number of interior columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of interior rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Distance between the starts of two adjacent columns.
    pub fn stride(&self) -> usize {
        self.height + 2
    }

    /// Total number of slots, `(width + 2) * (height + 2)`.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always `false`: construction rejects empty grids.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Interior column indices, `1..=width`.
    pub fn interior_cols(&self) -> RangeInclusive<usize> {
        1..=self.width
    }

    /// Interior row indices, `1..=height`.
    pub fn interior_rows(&self) -> RangeInclusive<usize> {
        1..=self.height
    }

    /// Flat offset of `(col, row)`, or `None` outside the padded range.
    pub fn flat_index(&self, col: usize, row: usize) -> Option<usize> {
        if col <= self.width + 1 && row <= self.height + 1 {
            Some(col * self.stride() + row)
        } else {
            None
        }
    }

    /// Value at `(col, row)`, or `None` outside the padded range.
    pub fn get(&self, col: usize, row: usize) -> Option<f32> {
        self.flat_index(col, row).map(|i| self.data[i])
    }

    /// Overwrite every slot with `value`.
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Copy an unpadded `width × height` block into the interior.
    ///
    /// Block entry `(col - 1) * height + (row - 1)` lands at `(col, row)`.
    /// Ghost columns and boundary rows are left untouched.
    pub fn load_interior(&mut self, block: &[f32]) -> Result<(), GridError> {
        self.check_block(block.len())?;
        let h = self.height;
        for (c, src) in block.chunks_exact(h).enumerate() {
            self.column_interior_mut(c + 1).copy_from_slice(src);
        }
        Ok(())
    }

    /// Copy the interior out into an unpadded `width × height` block.
    pub fn store_interior(&self, block: &mut [f32]) -> Result<(), GridError> {
        self.check_block(block.len())?;
        let h = self.height;
        for (c, dst) in block.chunks_exact_mut(h).enumerate() {
            dst.copy_from_slice(self.column_interior(c + 1));
        }
        Ok(())
    }

    /// The interior as a freshly allocated unpadded block.
    pub fn interior_block(&self) -> Vec<f32> {
        let mut block = vec![0.0; self.width * self.height];
        for (c, dst) in block.chunks_exact_mut(self.height).enumerate() {
            dst.copy_from_slice(self.column_interior(c + 1));
        }
        block
    }

    /// Full padded column `col`, boundary rows included.
    ///
    /// # Panics
    ///
    /// Panics if `col > width + 1`.
    pub fn column(&self, col: usize) -> &[f32] {
        let start = self.column_start(col);
        &self.data[start..start + self.stride()]
    }

    /// Rows `1..=height` of column `col`: the slice a halo exchange moves.
    ///
    /// # Panics
    ///
    /// Panics if `col > width + 1`.
    pub fn column_interior(&self, col: usize) -> &[f32] {
        let start = self.column_start(col) + 1;
        &self.data[start..start + self.height]
    }

    /// Mutable rows `1..=height` of column `col`.
    ///
    /// # Panics
    ///
    /// Panics if `col > width + 1`.
    pub fn column_interior_mut(&mut self, col: usize) -> &mut [f32] {
        let start = self.column_start(col) + 1;
        let h = self.height;
        &mut self.data[start..start + h]
    }

    /// Borrow rows `1..=height` of column `send` immutably and of column
    /// `recv` mutably at the same time.
    ///
    /// # Panics
    ///
    /// Panics if `send == recv` or either column is out of range.
    pub fn split_columns(&mut self, send: usize, recv: usize) -> (&[f32], &mut [f32]) {
        assert_ne!(send, recv, "send and receive columns must differ");
        let h = self.height;
        let send_start = self.column_start(send) + 1;
        let recv_start = self.column_start(recv) + 1;
        if send < recv {
            let (lo, hi) = self.data.split_at_mut(recv_start);
            (&lo[send_start..send_start + h], &mut hi[..h])
        } else {
            let (lo, hi) = self.data.split_at_mut(send_start);
            (&hi[..h], &mut lo[recv_start..recv_start + h])
        }
    }

    /// The whole padded buffer in flat order.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// The whole padded buffer in flat order, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    fn column_start(&self, col: usize) -> usize {
        assert!(
            col <= self.width + 1,
            "column {col} outside padded range 0..={}",
            self.width + 1
        );
        col * self.stride()
    }

    fn check_block(&self, len: usize) -> Result<(), GridError> {
        let expected = self.width * self.height;
        if len != expected {
            return Err(GridError::BlockSizeMismatch {
                expected,
                actual: len,
            });
        }
        Ok(())
    }
}

impl Index<(usize, usize)> for PaddedGrid {
    type Output = f32;

    /// `grid[(col, row)]`; panics outside the padded range.
    fn index(&self, (col, row): (usize, usize)) -> &f32 {
        match self.flat_index(col, row) {
            Some(i) => &self.data[i],
            None => panic!(
                "cell ({col}, {row}) outside padded range {}x{}",
                self.width + 2,
                self.height + 2
            ),
        }
    }
}

impl IndexMut<(usize, usize)> for PaddedGrid {
    fn index_mut(&mut self, (col, row): (usize, usize)) -> &mut f32 {
        match self.flat_index(col, row) {
            Some(i) => &mut self.data[i],
            None => panic!(
                "cell ({col}, {row}) outside padded range {}x{}",
                self.width + 2,
                self.height + 2
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn numbered(width: usize, height: usize) -> PaddedGrid {
        let mut g = PaddedGrid::new(width, height, 255.0).unwrap();
        let block: Vec<f32> = (0..width * height).map(|v| v as f32).collect();
        g.load_interior(&block).unwrap();
        g
    }

    #[test]
    fn new_rejects_empty() {
        assert_eq!(
            PaddedGrid::new(0, 4, 0.0),
            Err(GridError::Empty {
                width: 0,
                height: 4
            })
        );
        assert!(PaddedGrid::new(3, 0, 0.0).is_err());
    }

    #[test]
    fn new_fills_every_slot() {
        let g = PaddedGrid::new(3, 2, 255.0).unwrap();
        assert_eq!(g.len(), 5 * 4);
        assert!(g.as_slice().iter().all(|&v| v == 255.0));
    }

    #[test]
    fn flat_index_matches_column_major_formula() {
        let g = PaddedGrid::new(3, 4, 0.0).unwrap();
        assert_eq!(g.flat_index(0, 0), Some(0));
        assert_eq!(g.flat_index(1, 1), Some(7));
        assert_eq!(g.flat_index(2, 3), Some(2 * 6 + 3));
        assert_eq!(g.flat_index(4, 5), Some(29));
        assert_eq!(g.flat_index(5, 0), None);
        assert_eq!(g.flat_index(0, 6), None);
    }

    #[test]
    fn load_interior_offsets_by_one() {
        let g = numbered(2, 3);
        // block[(c-1)*h + (r-1)] lands at (c, r)
        assert_eq!(g[(1, 1)], 0.0);
        assert_eq!(g[(1, 3)], 2.0);
        assert_eq!(g[(2, 1)], 3.0);
        assert_eq!(g[(2, 3)], 5.0);
        // frame untouched
        for r in 0..5 {
            assert_eq!(g[(0, r)], 255.0);
            assert_eq!(g[(3, r)], 255.0);
        }
        for c in 0..4 {
            assert_eq!(g[(c, 0)], 255.0);
            assert_eq!(g[(c, 4)], 255.0);
        }
    }

    #[test]
    fn load_interior_rejects_wrong_length() {
        let mut g = PaddedGrid::new(2, 3, 0.0).unwrap();
        assert_eq!(
            g.load_interior(&[1.0; 5]),
            Err(GridError::BlockSizeMismatch {
                expected: 6,
                actual: 5
            })
        );
    }

    #[test]
    fn store_interior_inverts_load() {
        let g = numbered(3, 2);
        let mut out = vec![0.0; 6];
        g.store_interior(&mut out).unwrap();
        assert_eq!(out, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(g.interior_block(), out);
    }

    #[test]
    fn column_interior_excludes_boundary_rows() {
        let g = numbered(2, 3);
        assert_eq!(g.column(1), &[255.0, 0.0, 1.0, 2.0, 255.0]);
        assert_eq!(g.column_interior(2), &[3.0, 4.0, 5.0]);
        assert_eq!(g.column_interior(0), &[255.0; 3]);
    }

    #[test]
    fn split_columns_both_orders() {
        let mut g = numbered(2, 2);
        {
            let (send, recv) = g.split_columns(2, 0);
            assert_eq!(send, &[2.0, 3.0]);
            recv.copy_from_slice(send);
        }
        {
            let (send, recv) = g.split_columns(1, 3);
            assert_eq!(send, &[0.0, 1.0]);
            recv.copy_from_slice(send);
        }
        assert_eq!(g.column_interior(0), &[2.0, 3.0]);
        assert_eq!(g.column_interior(3), &[0.0, 1.0]);
        // boundary rows of the ghost columns stay at the fill value
        assert_eq!(g[(0, 0)], 255.0);
        assert_eq!(g[(3, 3)], 255.0);
    }

    #[test]
    #[should_panic(expected = "must differ")]
    fn split_columns_same_column_panics() {
        let mut g = numbered(2, 2);
        let _ = g.split_columns(1, 1);
    }

    #[test]
    #[should_panic(expected = "outside padded range")]
    fn index_out_of_range_panics() {
        let g = numbered(2, 2);
        let _ = g[(4, 0)];
    }

    proptest! {
        #[test]
        fn flat_index_is_a_bijection(width in 1usize..12, height in 1usize..12) {
            let g = PaddedGrid::new(width, height, 0.0).unwrap();
            let mut seen = HashSet::new();
            for c in 0..width + 2 {
                for r in 0..height + 2 {
                    let i = g.flat_index(c, r).unwrap();
                    prop_assert!(i < g.len());
                    prop_assert!(seen.insert(i));
                }
            }
            prop_assert_eq!(seen.len(), (width + 2) * (height + 2));
        }

        #[test]
        fn load_then_store_is_identity(
            width in 1usize..8,
            height in 1usize..8,
            seed in 0u32..1000,
        ) {
            let block: Vec<f32> = (0..width * height)
                .map(|v| ((v as u32 * 31 + seed) % 256) as f32)
                .collect();
            let mut g = PaddedGrid::new(width, height, 255.0).unwrap();
            g.load_interior(&block).unwrap();
            prop_assert_eq!(g.interior_block(), block);
        }
    }
}
