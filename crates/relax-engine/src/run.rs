//! Whole-run orchestration.
//!
//! [`run_worker`] is the program every rank executes, whatever carries its
//! messages:
//!
//! 1. validate the configuration and read the image geometry;
//! 2. the coordinator decodes the image and announces whether it succeeded,
//!    so a failed load stops every worker before anything is scattered;
//! 3. scatter, sweep, gather;
//! 4. the coordinator writes `output_<iterations>.pgm`.
//!
//! [`run_threaded`] runs a whole group in-process, one named thread per
//! rank over [`ChannelComm`].

use std::path::PathBuf;
use std::thread;
use std::time::Instant;

use relax_comm::ChannelComm;
use relax_core::{CodecError, CommError, Communicator, ImageCodec, Rank, COORDINATOR};
use relax_grid::RingTopology;

use crate::config::RunConfig;
use crate::distribute::{gather_image, scatter_image, to_column_major, to_row_major};
use crate::error::RunError;
use crate::metrics::{elapsed_us, RunMetrics};
use crate::worker::Worker;

/// What one rank reports after a successful run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunOutcome {
    /// The reporting rank.
    pub rank: Rank,
    /// Image width and height.
    pub dimensions: (usize, usize),
    /// Final image in scanline order. Only the coordinator has it.
    pub image: Option<Vec<f32>>,
    /// Path of the written output. Only the coordinator writes.
    pub output: Option<PathBuf>,
    /// Timing for this rank.
    pub metrics: RunMetrics,
}

/// Execute one rank's part of a run over `comm`.
///
/// Every member of the group must call this with an equivalent `config`.
pub fn run_worker<C: Communicator + ?Sized>(
    comm: &mut C,
    config: &RunConfig,
    codec: &dyn ImageCodec,
) -> Result<RunOutcome, RunError> {
    let started = Instant::now();
    let rank = comm.rank();
    let root = COORDINATOR;
    let mut metrics = RunMetrics::default();

    config.validate()?;
    let (width, height) = codec.dimensions(&config.image_path)?;
    let plan = config.plan(width, height, comm.size())?;
    let decomposition = plan.decomposition;
    let partition = decomposition.partition(rank)?;
    let ring = RingTopology::new(decomposition.workers())?;

    if comm.is_root(root) {
        tracing::info!(
            image = %config.image_path.display(),
            width,
            height,
            workers = decomposition.workers(),
            iterations = plan.iterations,
            "starting relaxation"
        );
    }

    // Only the coordinator touches the pixel data.
    let loaded = if comm.is_root(root) {
        let t = Instant::now();
        let image = load_image(codec, config, width, height);
        metrics.load_us = elapsed_us(t);
        Some(image)
    } else {
        None
    };
    let ok = comm.broadcast_status(root, matches!(loaded, Some(Ok(_))))?;
    let global = match loaded {
        Some(Err(e)) => {
            tracing::error!(%rank, error = %e, "failed to load image, aborting run");
            return Err(e);
        }
        Some(Ok(image)) => Some(image),
        None if !ok => {
            tracing::warn!(%rank, "coordinator aborted the run");
            return Err(CommError::Aborted { root }.into());
        }
        None => None,
    };

    let t = Instant::now();
    let block = scatter_image(comm, root, global.as_deref(), &partition)?;
    drop(global);
    metrics.scatter_us = elapsed_us(t);

    let mut worker = Worker::new(partition, &ring, &block, plan.boundary_value, plan.tag)?;
    tracing::debug!(
        %rank,
        columns = ?worker.partition().columns(),
        prev = %worker.neighbours().prev,
        next = %worker.neighbours().next,
        "worker initialised"
    );
    worker.run(comm, plan.iterations, &mut metrics)?;
    let block = worker.finish();

    let t = Instant::now();
    let gathered = gather_image(comm, root, &block, decomposition.global_len())?;
    metrics.gather_us = elapsed_us(t);

    let (image, output) = match gathered {
        Some(col_major) => {
            let t = Instant::now();
            let image = to_row_major(&col_major, width, height)?;
            let path = config.output_path();
            codec.encode(&path, &image, width, height)?;
            metrics.write_us = elapsed_us(t);
            tracing::info!(output = %path.display(), "wrote result");
            (Some(image), Some(path))
        }
        None => (None, None),
    };

    metrics.total_us = elapsed_us(started);
    tracing::debug!(
        %rank,
        total_us = metrics.total_us,
        mean_sweep_us = metrics.mean_sweep_us(),
        "worker finished"
    );
    Ok(RunOutcome {
        rank,
        dimensions: (width, height),
        image,
        output,
        metrics,
    })
}

/// Decode the image and reorder it for distribution.
fn load_image(
    codec: &dyn ImageCodec,
    config: &RunConfig,
    width: usize,
    height: usize,
) -> Result<Vec<f32>, RunError> {
    let pixels = codec.decode(&config.image_path)?;
    if pixels.len() != width * height {
        return Err(CodecError::DimensionMismatch {
            width,
            height,
            len: pixels.len(),
        }
        .into());
    }
    Ok(to_column_major(&pixels, width, height)?)
}

/// Run a whole group of `config.workers` ranks on scoped threads.
///
/// Returns the coordinator's outcome. If any rank fails, the error that
/// caused the failure is returned in preference to the disconnects it
/// triggers in the other ranks.
pub fn run_threaded(config: &RunConfig, codec: &dyn ImageCodec) -> Result<RunOutcome, RunError> {
    config.validate()?;
    let group = ChannelComm::group(config.workers)?;

    let results: Vec<Result<RunOutcome, RunError>> = thread::scope(|s| {
        let mut handles = Vec::with_capacity(group.len());
        for mut comm in group {
            let rank = comm.rank();
            let spawned = thread::Builder::new()
                .name(format!("relax-worker-{rank}"))
                .spawn_scoped(s, move || run_worker(&mut comm, config, codec));
            handles.push((rank, spawned));
        }
        handles
            .into_iter()
            .map(|(rank, spawned)| match spawned {
                Ok(handle) => handle
                    .join()
                    .unwrap_or_else(|_| Err(RunError::WorkerPanicked { rank })),
                Err(source) => Err(RunError::Spawn { rank, source }),
            })
            .collect()
    });

    let mut outcome = None;
    let mut secondary = None;
    for result in results {
        match result {
            Ok(o) if o.rank == COORDINATOR => outcome = Some(o),
            Ok(_) => {}
            Err(e) if e.is_secondary() => {
                secondary.get_or_insert(e);
            }
            Err(e) => return Err(e),
        }
    }
    if let Some(e) = secondary {
        return Err(e);
    }
    outcome.ok_or(RunError::WorkerPanicked { rank: COORDINATOR })
}
