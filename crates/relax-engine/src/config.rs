//! Run configuration, validation, and the validated run plan.
//!
//! [`RunConfig`] is what the user asked for. [`validate()`](RunConfig::validate)
//! checks everything that can be checked before the image is opened;
//! [`plan()`](RunConfig::plan) adds the image geometry and worker count and
//! yields a [`RunPlan`] the engine can execute without further checks.

use std::path::PathBuf;

use relax_core::{Tag, HALO_TAG, SENTINEL};
use relax_grid::{Decomposition, GridError};
use thiserror::Error;

// ── ConfigError ────────────────────────────────────────────────────

/// A run that must not start.
///
/// Configuration errors are detected before any buffer is allocated or any
/// message is sent, and terminate the run cleanly without output.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// Iteration count is zero or negative.
    #[error("iteration count must be greater than 0 (got {value})")]
    NonPositiveIterations {
        /// The count as given.
        value: i64,
    },
    /// Iteration count does not fit the engine's counter.
    #[error("iteration count {value} exceeds the maximum of {max}", max = u32::MAX)]
    TooManyIterations {
        /// The count as given.
        value: i64,
    },
    /// A worker group with no members was requested.
    #[error("worker count must be at least 1")]
    NoWorkers,
    /// The boundary value is NaN or infinite.
    #[error("boundary value must be finite (got {value})")]
    InvalidBoundary {
        /// The value as given.
        value: f32,
    },
    /// The image cannot be decomposed over the worker group.
    #[error(transparent)]
    Geometry(#[from] GridError),
}

/// Check a user-supplied iteration count.
///
/// Counts `<= 0` are rejected, as are counts above `u32::MAX`.
pub fn validate_iterations(value: i64) -> Result<u32, ConfigError> {
    if value <= 0 {
        return Err(ConfigError::NonPositiveIterations { value });
    }
    u32::try_from(value).map_err(|_| ConfigError::TooManyIterations { value })
}

// ── RunConfig ──────────────────────────────────────────────────────

/// Everything needed to start a run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    /// Grayscale image to relax.
    pub image_path: PathBuf,
    /// Number of sweeps, as given by the user. Must be positive.
    pub iterations: i64,
    /// Size of the in-process worker group. Ignored under MPI, where the
    /// world size decides. Default: 1.
    pub workers: usize,
    /// Initial value of every padded slot, and therefore of the fixed rows
    /// above and below the image. Default: [`SENTINEL`].
    pub boundary_value: f32,
    /// Directory receiving `output_<iterations>.pgm`. Default: `.`.
    pub output_dir: PathBuf,
    /// Tag carried by halo exchange messages. Default: [`HALO_TAG`].
    pub tag: Tag,
}

impl RunConfig {
    /// A configuration with every optional field at its default.
    pub fn new(image_path: impl Into<PathBuf>, iterations: i64) -> Self {
        Self {
            image_path: image_path.into(),
            iterations,
            workers: 1,
            boundary_value: SENTINEL,
            output_dir: PathBuf::from("."),
            tag: HALO_TAG,
        }
    }

    /// Where the coordinator writes the result.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(format!("output_{}.pgm", self.iterations))
    }

    /// Check everything that does not depend on the image.
    ///
    /// Returns the iteration count as the engine's counter type.
    pub fn validate(&self) -> Result<u32, ConfigError> {
        // 1. Positive iteration count.
        let iterations = validate_iterations(self.iterations)?;
        // 2. Non-empty worker group.
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        // 3. A finite fill value; NaN would poison every cell it touches.
        if !self.boundary_value.is_finite() {
            return Err(ConfigError::InvalidBoundary {
                value: self.boundary_value,
            });
        }
        Ok(iterations)
    }

    /// Validate against the image geometry and the actual group size.
    ///
    /// `workers` is the size of the group that will run the plan, which
    /// under MPI may differ from [`RunConfig::workers`].
    pub fn plan(
        &self,
        width: usize,
        height: usize,
        workers: usize,
    ) -> Result<RunPlan, ConfigError> {
        let iterations = self.validate()?;
        // 4. Width divisible by the group size.
        let decomposition = Decomposition::new(width, height, workers)?;
        Ok(RunPlan {
            decomposition,
            iterations,
            boundary_value: self.boundary_value,
            tag: self.tag,
        })
    }
}

// ── RunPlan ────────────────────────────────────────────────────────

/// A fully validated run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunPlan {
    /// Image geometry split over the group.
    pub decomposition: Decomposition,
    /// Number of sweeps.
    pub iterations: u32,
    /// Fill value for every padded buffer.
    pub boundary_value: f32,
    /// Halo exchange tag.
    pub tag: Tag,
}
