//! relax - iterative smoothing of a grayscale image over a group of workers.
//!
//! # Examples
//!
//! ```bash
//! # 100 sweeps over 4 in-process workers
//! relax photo.pgm 100 --workers 4
//!
//! # One MPI process per worker (build with --features mpi)
//! mpirun -n 4 relax photo.pgm 100 --backend mpi
//! ```
//!
//! The result is written to `output_<iterations>.pgm`. Usage errors and
//! invalid settings (a non-positive iteration count, an image width that
//! does not divide by the worker count) print a diagnostic and exit with
//! status 0; I/O and communication failures exit with status 1.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use relax_core::{HALO_TAG, SENTINEL};
use relax_engine::{run_threaded, ErrorKind, RunConfig, RunError, RunOutcome};
use relax_pgm::PgmCodec;
use tracing_subscriber::EnvFilter;

/// Iterative 5-point relaxation of a PGM image over a ring of workers
#[derive(Debug, Parser)]
#[command(name = "relax")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input image (binary PGM, P5)
    image: PathBuf,

    /// Number of relaxation sweeps (must be greater than 0)
    #[arg(allow_negative_numbers = true)]
    iterations: i64,

    /// Number of in-process workers; must divide the image width
    #[arg(short, long, default_value_t = 1)]
    workers: usize,

    /// Directory receiving output_<iterations>.pgm
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Value of the fixed rows above and below the image
    #[arg(short, long, default_value_t = SENTINEL)]
    boundary: f32,

    /// Worker group runtime
    #[arg(long, value_enum, default_value_t = Backend::Threads)]
    backend: Backend,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// One thread per worker in this process
    Threads,
    /// One MPI process per worker; the world size is the worker count
    Mpi,
}

impl Cli {
    fn config(&self) -> RunConfig {
        RunConfig {
            image_path: self.image.clone(),
            iterations: self.iterations,
            workers: self.workers,
            boundary_value: self.boundary,
            output_dir: self.output_dir.clone(),
            tag: HALO_TAG,
        }
    }
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// What the process should do with a run result.
#[derive(Debug, PartialEq, Eq)]
enum Report {
    Done,
    /// Soft failure: print to stdout, exit 0.
    Rejected(String),
    /// Hard failure: print to stderr, exit 1.
    Failed(String),
}

fn report(result: Result<RunOutcome, RunError>) -> Report {
    match result {
        Ok(_) => Report::Done,
        Err(e) if e.kind() == ErrorKind::Configuration => Report::Rejected(e.to_string()),
        Err(e) => Report::Failed(e.to_string()),
    }
}

fn exit(report: Report) -> ExitCode {
    match report {
        Report::Done => ExitCode::SUCCESS,
        Report::Rejected(msg) => {
            println!("{msg}");
            ExitCode::SUCCESS
        }
        Report::Failed(msg) => {
            eprintln!("Error: {msg}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(feature = "mpi"))]
fn run_mpi(_config: &RunConfig) -> ExitCode {
    exit(Report::Failed(
        "this build has no MPI support (rebuild with --features mpi)".into(),
    ))
}

#[cfg(feature = "mpi")]
fn run_mpi(config: &RunConfig) -> ExitCode {
    use relax_comm::MpiComm;
    use relax_core::{Communicator, COORDINATOR};

    let mut comm = match MpiComm::init() {
        Ok(comm) => comm,
        Err(e) => return exit(Report::Failed(e.to_string())),
    };
    let result = relax_engine::run_worker(&mut comm, config, &PgmCodec);
    match report(result) {
        Report::Failed(msg) => {
            tracing::error!(
                rank = %comm.rank(),
                error = %msg,
                "run failed, aborting the MPI job"
            );
            // A failed rank cannot leave its peers blocked in a collective.
            comm.abort(1)
        }
        // Every rank rejects the same configuration; print it once.
        Report::Rejected(_) if comm.rank() != COORDINATOR => ExitCode::SUCCESS,
        other => exit(other),
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // Help, version, and usage errors all exit 0.
            return ExitCode::SUCCESS;
        }
    };

    setup_logging(cli.verbose, cli.quiet);
    let config = cli.config();
    tracing::debug!(
        backend = ?cli.backend,
        workers = config.workers,
        iterations = config.iterations,
        "dispatching run"
    );

    match cli.backend {
        Backend::Threads => exit(report(run_threaded(&config, &PgmCodec))),
        Backend::Mpi => run_mpi(&config),
    }
}
