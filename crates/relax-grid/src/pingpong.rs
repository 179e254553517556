//! Double-buffered ping-pong grid for Jacobi updates.
//!
//! [`PingPongGrid`] owns two [`PaddedGrid`]s (buffer A and buffer B) that
//! alternate between the "current" (read) and "next" (write) roles. A
//! [`swap`](PingPongGrid::swap) flips the role indirection; no sample is
//! ever copied between the buffers.
//!
//! ```text
//! buffer_a: PaddedGrid  ←─── current (even generations) / next (odd)
//! buffer_b: PaddedGrid  ←─── next (even generations) / current (odd)
//! ```

use crate::error::GridError;
use crate::padded::PaddedGrid;

/// Names one of the two physical buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Buffer {
    /// The first buffer.
    A,
    /// The second buffer.
    B,
}

impl Buffer {
    /// The other buffer.
    pub fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

/// Two equally sized padded grids with an O(1) current/next swap.
#[derive(Clone, Debug)]
pub struct PingPongGrid {
    buffer_a: PaddedGrid,
    buffer_b: PaddedGrid,
    /// Which buffer currently plays the "current" role.
    current: Buffer,
    /// Number of swaps since construction.
    generation: u64,
}

impl PingPongGrid {
    /// Allocate both buffers with `width × height` interior cells, every
    /// slot set to `fill`. Buffer A starts as current.
    pub fn new(width: usize, height: usize, fill: f32) -> Result<Self, GridError> {
        Ok(Self {
            buffer_a: PaddedGrid::new(width, height, fill)?,
            buffer_b: PaddedGrid::new(width, height, fill)?,
            current: Buffer::A,
            generation: 0,
        })
    }

    /// Which physical buffer is current.
    pub fn current_buffer(&self) -> Buffer {
        self.current
    }

    /// Number of completed swaps.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The buffer holding the latest state.
    pub fn current(&self) -> &PaddedGrid {
        match self.current {
            Buffer::A => &self.buffer_a,
            Buffer::B => &self.buffer_b,
        }
    }

    /// Mutable access to the current buffer (halo exchange writes its
    /// ghost columns here).
    pub fn current_mut(&mut self) -> &mut PaddedGrid {
        match self.current {
            Buffer::A => &mut self.buffer_a,
            Buffer::B => &mut self.buffer_b,
        }
    }

    /// The buffer the next update writes into.
    pub fn next(&self) -> &PaddedGrid {
        match self.current {
            Buffer::A => &self.buffer_b,
            Buffer::B => &self.buffer_a,
        }
    }

    /// Borrow `(current, next)` at once: read from one, write the other.
    pub fn split(&mut self) -> (&PaddedGrid, &mut PaddedGrid) {
        match self.current {
            Buffer::A => (&self.buffer_a, &mut self.buffer_b),
            Buffer::B => (&self.buffer_b, &mut self.buffer_a),
        }
    }

    /// Exchange the current and next roles.
    pub fn swap(&mut self) {
        self.current = self.current.other();
        self.generation += 1;
    }

    /// Overwrite every slot of both buffers with `value` and make buffer A
    /// current again.
    pub fn reset(&mut self, value: f32) {
        self.buffer_a.fill(value);
        self.buffer_b.fill(value);
        self.current = Buffer::A;
        self.generation = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_a_current() {
        let g = PingPongGrid::new(2, 2, 255.0).unwrap();
        assert_eq!(g.current_buffer(), Buffer::A);
        assert_eq!(g.generation(), 0);
        assert!(g.current().as_slice().iter().all(|&v| v == 255.0));
        assert!(g.next().as_slice().iter().all(|&v| v == 255.0));
    }

    #[test]
    fn written_next_becomes_current_after_swap() {
        let mut g = PingPongGrid::new(2, 2, 0.0).unwrap();
        {
            let (cur, next) = g.split();
            assert_eq!(cur[(1, 1)], 0.0);
            next[(1, 1)] = 42.0;
        }
        assert_eq!(g.current()[(1, 1)], 0.0);
        g.swap();
        assert_eq!(g.current()[(1, 1)], 42.0);
        assert_eq!(g.current_buffer(), Buffer::B);
        assert_eq!(g.generation(), 1);
    }

    #[test]
    fn swap_moves_no_data() {
        let mut g = PingPongGrid::new(3, 2, 1.0).unwrap();
        g.current_mut()[(2, 2)] = 7.0;
        let before = g.current().as_slice().as_ptr();
        g.swap();
        g.swap();
        // Two swaps return to the same allocation with its contents intact.
        assert_eq!(g.current().as_slice().as_ptr(), before);
        assert_eq!(g.current()[(2, 2)], 7.0);
        assert_eq!(g.generation(), 2);
    }

    #[test]
    fn reset_refills_and_restores_roles() {
        let mut g = PingPongGrid::new(2, 2, 0.0).unwrap();
        g.current_mut()[(1, 1)] = 3.0;
        g.swap();
        g.reset(9.0);
        assert_eq!(g.current_buffer(), Buffer::A);
        assert_eq!(g.generation(), 0);
        assert!(g.current().as_slice().iter().all(|&v| v == 9.0));
        assert!(g.next().as_slice().iter().all(|&v| v == 9.0));
    }

    #[test]
    fn other_is_an_involution() {
        assert_eq!(Buffer::A.other(), Buffer::B);
        assert_eq!(Buffer::A.other().other(), Buffer::A);
    }
}
