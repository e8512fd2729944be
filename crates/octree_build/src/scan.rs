//! Group-wide prefix sums over lane scratch buffers.
//!
//! Short buffers are scanned serially. Longer buffers use a three-phase
//! blocked scan on rayon:
//!
//! 1. Each block computes its local exclusive scan and its block total
//! 2. Block totals are scanned serially
//! 3. Each block adds its scanned total back to every element
//!
//! The call returns only when every slot holds its final value, which is the
//! barrier the builder relies on between counting and writing children.

use rayon::prelude::*;

/// Elements per block in the parallel scan.
pub const SCAN_BLOCK: usize = 256;

/// Serial exclusive scan. Returns the sum of all inputs.
#[inline]
fn exclusive_scan_serial(values: &mut [u32]) -> u32 {
  let mut sum = 0u32;
  for value in values.iter_mut() {
    let count = *value;
    *value = sum;
    sum += count;
  }
  sum
}

/// Exclusive prefix sum in place: `values[i]` becomes the sum of all inputs
/// before `i`. Returns the sum of all inputs.
pub fn exclusive_scan(values: &mut [u32]) -> u32 {
  if values.len() <= SCAN_BLOCK {
    return exclusive_scan_serial(values);
  }

  let mut block_sums: Vec<u32> = values
    .par_chunks_mut(SCAN_BLOCK)
    .map(exclusive_scan_serial)
    .collect();

  let total = exclusive_scan_serial(&mut block_sums);

  values
    .par_chunks_mut(SCAN_BLOCK)
    .zip(block_sums.par_iter())
    .for_each(|(block, &base)| {
      for value in block.iter_mut() {
        *value += base;
      }
    });

  total
}

/// Inclusive prefix sum in place: `values[i]` becomes the sum of inputs
/// `0..=i`. Returns the sum of all inputs.
pub fn inclusive_scan(values: &mut [u32]) -> u32 {
  let originals: Vec<u32> = values.to_vec();
  let total = exclusive_scan(values);
  values
    .par_iter_mut()
    .zip(originals.par_iter())
    .for_each(|(value, &original)| *value += original);
  total
}
