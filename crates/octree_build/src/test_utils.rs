//! Shared fixtures for builder tests.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::{LEVEL_BITS, MORTON_LEVELS};
use crate::morton::encode_point;

/// Code whose leading digits are `digits` (level 0 first), rest zero.
pub fn code_with_digits(digits: &[u32]) -> u32 {
  digits.iter().enumerate().fold(0u32, |acc, (level, &d)| {
    acc | (d << ((MORTON_LEVELS - 1 - level as u32) * LEVEL_BITS))
  })
}

/// Eight points, one in each root octant, sorted.
pub fn one_point_per_digit() -> Vec<u32> {
  (0..8).map(|d| code_with_digits(&[d])).collect()
}

/// `n` uniformly random points in the unit cube, encoded and sorted.
pub fn random_sorted_codes(n: usize, seed: u64) -> Vec<u32> {
  let mut rng = StdRng::seed_from_u64(seed);
  let mut codes: Vec<u32> = (0..n)
    .map(|_| {
      let p = Vec3::new(rng.random(), rng.random(), rng.random());
      encode_point(p, Vec3::ZERO, Vec3::ONE)
    })
    .collect();
  codes.sort_unstable();
  codes
}

/// `n` points packed into a small sphere in one corner, encoded and sorted.
/// Produces deep, narrow trees.
pub fn clustered_sorted_codes(n: usize, seed: u64) -> Vec<u32> {
  let mut rng = StdRng::seed_from_u64(seed);
  let center = Vec3::splat(0.1);
  let mut codes: Vec<u32> = (0..n)
    .map(|_| {
      let offset = Vec3::new(
        rng.random_range(-0.01..0.01),
        rng.random_range(-0.01..0.01),
        rng.random_range(-0.01..0.01),
      );
      encode_point(center + offset, Vec3::ZERO, Vec3::ONE)
    })
    .collect();
  codes.sort_unstable();
  codes
}
