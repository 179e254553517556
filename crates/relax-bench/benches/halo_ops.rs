//! Criterion micro-benchmarks for halo exchange and image reordering.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use relax_bench::reference_profile;
use relax_comm::ChannelComm;
use relax_core::{Rank, HALO_TAG};
use relax_engine::{exchange_halo, to_column_major, to_row_major};
use relax_grid::{PaddedGrid, RingTopology};

/// Benchmark: both exchange phases of a single worker wrapping onto itself
/// (512-row columns), measuring channel and copy overhead without
/// cross-thread waits.
fn bench_exchange_self_512(c: &mut Criterion) {
    let mut comm = ChannelComm::group(1).unwrap().remove(0);
    let ring = RingTopology::new(1).unwrap();
    let neighbours = ring.neighbours(Rank(0));
    let mut grid = PaddedGrid::new(8, 512, 1.0).unwrap();

    c.bench_function("exchange_halo_self_512", |b| {
        b.iter(|| {
            exchange_halo(&mut comm, &mut grid, neighbours, HALO_TAG).unwrap();
            black_box(&grid);
        });
    });
}

/// Benchmark: scanline to column-major and back for a 256x256 image.
fn bench_reorder_256(c: &mut Criterion) {
    let profile = reference_profile();

    c.bench_function("reorder_256x256", |b| {
        b.iter(|| {
            let cols = to_column_major(black_box(&profile.pixels), 256, 256).unwrap();
            let rows = to_row_major(&cols, 256, 256).unwrap();
            black_box(rows);
        });
    });
}

criterion_group!(benches, bench_exchange_self_512, bench_reorder_256);
criterion_main!(benches);
