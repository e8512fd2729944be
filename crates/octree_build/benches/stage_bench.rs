//! Bootstrap stage benchmarks.
//!
//! Measures one construction pass over sorted Morton codes for:
//! - **uniform**: points spread over the whole cube (wide, shallow frontier)
//! - **clustered**: points packed into a small sphere (narrow, deep frontier)
//!
//! The scan is benchmarked separately at full group width.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use octree_build::{morton, scan, BuildConfig, InitialStage, OctreeStorage, TaskQueue};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// =============================================================================
// Point clouds
// =============================================================================

fn uniform_codes(n: usize, seed: u64) -> Vec<u32> {
  let mut rng = StdRng::seed_from_u64(seed);
  let mut codes: Vec<u32> = (0..n)
    .map(|_| {
      let p = Vec3::new(rng.random(), rng.random(), rng.random());
      morton::encode_point(p, Vec3::ZERO, Vec3::ONE)
    })
    .collect();
  codes.sort_unstable();
  codes
}

fn clustered_codes(n: usize, seed: u64) -> Vec<u32> {
  let mut rng = StdRng::seed_from_u64(seed);
  let mut codes: Vec<u32> = (0..n)
    .map(|_| {
      let p = Vec3::splat(0.3)
        + Vec3::new(
          rng.random_range(-0.02..0.02),
          rng.random_range(-0.02..0.02),
          rng.random_range(-0.02..0.02),
        );
      morton::encode_point(p, Vec3::ZERO, Vec3::ONE)
    })
    .collect();
  codes.sort_unstable();
  codes
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_initial_stage(c: &mut Criterion) {
  let mut group = c.benchmark_group("initial_stage");

  for &n in &[10_000usize, 100_000, 1_000_000] {
    let clouds = [("uniform", uniform_codes(n, 1)), ("clustered", clustered_codes(n, 2))];
    for (name, codes) in &clouds {
      let stage = InitialStage::new(BuildConfig::DEFAULT);
      let mut storage = OctreeStorage::new();
      let mut queue = TaskQueue::new();

      group.bench_with_input(BenchmarkId::new(*name, n), codes, |b, codes| {
        b.iter(|| {
          let report = stage
            .run(black_box(codes), codes.len(), &mut storage, &mut queue)
            .unwrap();
          black_box(report.nodes_num)
        })
      });
    }
  }

  group.finish();
}

fn bench_scan(c: &mut Criterion) {
  let counts: Vec<u32> = (0..octree_build::constants::CTA_SIZE as u32)
    .map(|i| i % 9)
    .collect();

  c.bench_function("exclusive_scan_group", |b| {
    b.iter(|| {
      let mut lanes = counts.clone();
      black_box(scan::exclusive_scan(black_box(&mut lanes)))
    })
  });
}

criterion_group!(benches, bench_initial_stage, bench_scan);
criterion_main!(benches);
