//! Per-worker timing for one run.

/// Wall-clock breakdown of one worker's run.
///
/// All durations are in microseconds. Load and write are only non-zero on
/// the coordinator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunMetrics {
    /// Completed sweeps.
    pub iterations: u32,
    /// Reading and reordering the input image.
    pub load_us: u64,
    /// Distributing blocks to the group.
    pub scatter_us: u64,
    /// Sum over sweeps of the halo exchange.
    pub exchange_us: u64,
    /// Sum over sweeps of the stencil update.
    pub update_us: u64,
    /// Collecting blocks from the group.
    pub gather_us: u64,
    /// Encoding and writing the output image.
    pub write_us: u64,
    /// The whole run, end to end.
    pub total_us: u64,
}

impl RunMetrics {
    /// Mean time per sweep spent exchanging and updating, in microseconds.
    pub fn mean_sweep_us(&self) -> u64 {
        if self.iterations == 0 {
            return 0;
        }
        (self.exchange_us + self.update_us) / u64::from(self.iterations)
    }
}

/// Microseconds elapsed since `start`, saturating.
pub(crate) fn elapsed_us(start: std::time::Instant) -> u64 {
    u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = RunMetrics::default();
        assert_eq!(m.iterations, 0);
        assert_eq!(m.total_us, 0);
        assert_eq!(m.mean_sweep_us(), 0);
    }

    #[test]
    fn mean_sweep_divides_by_iterations() {
        let m = RunMetrics {
            iterations: 4,
            exchange_us: 30,
            update_us: 10,
            ..RunMetrics::default()
        };
        assert_eq!(m.mean_sweep_us(), 10);
    }
}
