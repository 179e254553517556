//! Domain-decomposed relaxation engine.
//!
//! Ties the grid, kernel, and communication layers into a run:
//!
//! - [`config`]: [`RunConfig`], its validation, and the resulting [`RunPlan`].
//! - [`distribute`]: scatter of the image and gather of the result.
//! - [`halo`]: the two-phase ring exchange of boundary columns.
//! - [`worker`]: the per-rank exchange → update → swap loop.
//! - [`run`]: [`run_worker`] for any [`Communicator`](relax_core::Communicator),
//!   and [`run_threaded`] for an in-process group.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod distribute;
pub mod error;
pub mod halo;
pub mod metrics;
pub mod run;
pub mod worker;

pub use config::{validate_iterations, ConfigError, RunConfig, RunPlan};
pub use distribute::{gather_image, scatter_image, to_column_major, to_row_major};
pub use error::{ErrorKind, RunError};
pub use halo::exchange_halo;
pub use metrics::RunMetrics;
pub use run::{run_threaded, run_worker, RunOutcome};
pub use worker::{Phase, Worker};
