//! Child cell partitioning of a node's point range.
//!
//! Given a node's half-open range into the sorted codes and the node's depth,
//! a partitioner reports which child digits hold points and where each child's
//! sub-range begins. The builder only consumes this contract through
//! [`CellPartitioner`]; [`MortonCells`] is the standard implementation for
//! Morton-sorted codes.

use smallvec::SmallVec;

use crate::builder::BuildConfig;
use crate::constants::{ARITY, MAX_POINTS_PER_LEAF, MORTON_LEVELS};
use crate::morton::extract_level_code;

/// Non-empty children of one node, in ascending digit order.
///
/// Child `i` has digit `digits[i]` and point range `begs[i]..begs[i + 1]`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cells {
  begs: SmallVec<[u32; ARITY + 1]>,
  digits: SmallVec<[u8; ARITY]>,
}

impl Cells {
  /// No children: the node is a leaf.
  pub fn leaf() -> Self {
    Self::default()
  }

  /// Start a new child with `digit` whose points begin at `beg`.
  ///
  /// Digits must be strictly increasing and `beg` must not decrease.
  pub fn open(&mut self, digit: u8, beg: u32) {
    debug_assert!((digit as usize) < ARITY);
    debug_assert!(self.digits.last().map_or(true, |&last| last < digit));
    debug_assert!(self.begs.last().map_or(true, |&last| last <= beg));
    self.begs.push(beg);
    self.digits.push(digit);
  }

  /// Close the last opened child at `end`.
  pub fn finish(&mut self, end: u32) {
    if !self.digits.is_empty() {
      debug_assert!(self.begs.len() == self.digits.len());
      self.begs.push(end);
    }
  }

  /// Build from `(digit, beg)` pairs and the end of the last child.
  pub fn from_runs(runs: impl IntoIterator<Item = (u8, u32)>, end: u32) -> Self {
    let mut cells = Self::default();
    for (digit, beg) in runs {
      cells.open(digit, beg);
    }
    cells.finish(end);
    cells
  }

  /// Number of non-empty children (0..=8).
  #[inline]
  pub fn count(&self) -> usize {
    self.digits.len()
  }

  #[inline]
  pub fn is_leaf(&self) -> bool {
    self.digits.is_empty()
  }

  /// Existence bitmask: bit `d` set iff digit `d` is present.
  pub fn mask(&self) -> u8 {
    self
      .digits
      .iter()
      .fold(0u8, |mask, &digit| mask | (1 << digit))
  }

  /// Iterate children as `(digit, beg, end)`.
  pub fn iter(&self) -> impl Iterator<Item = (u8, u32, u32)> + '_ {
    self
      .digits
      .iter()
      .zip(self.begs.windows(2))
      .map(|(&digit, bounds)| (digit, bounds[0], bounds[1]))
  }
}

/// Determines the non-empty children of a node.
///
/// `codes` are the sorted point codes, `beg..end` the node's point range and
/// `level` the node's depth (0 for the root). Implementations must return
/// children whose ranges exactly partition `beg..end` in digit order.
pub trait CellPartitioner: Sync {
  fn find_cells(&self, codes: &[u32], beg: u32, end: u32, level: u32) -> Cells;
}

impl<F> CellPartitioner for F
where
  F: Fn(&[u32], u32, u32, u32) -> Cells + Sync,
{
  fn find_cells(&self, codes: &[u32], beg: u32, end: u32, level: u32) -> Cells {
    self(codes, beg, end, level)
  }
}

/// Partitions Morton-sorted codes by the digit at the node's level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MortonCells {
  /// Nodes with this many points or fewer are leaves.
  max_points_per_leaf: usize,
  /// Nodes at this depth are leaves. Never deeper than the code.
  max_depth: u32,
}

impl MortonCells {
  pub fn new(max_points_per_leaf: usize, max_depth: u32) -> Self {
    Self {
      max_points_per_leaf,
      max_depth: max_depth.min(MORTON_LEVELS),
    }
  }

  pub fn from_config(config: &BuildConfig) -> Self {
    Self::new(config.max_points_per_leaf, config.max_depth)
  }

  #[inline]
  pub fn max_points_per_leaf(&self) -> usize {
    self.max_points_per_leaf
  }

  #[inline]
  pub fn max_depth(&self) -> u32 {
    self.max_depth
  }
}

impl Default for MortonCells {
  fn default() -> Self {
    Self::new(MAX_POINTS_PER_LEAF, MORTON_LEVELS)
  }
}

impl CellPartitioner for MortonCells {
  fn find_cells(&self, codes: &[u32], beg: u32, end: u32, level: u32) -> Cells {
    let mut cells = Cells::leaf();
    let len = end.saturating_sub(beg) as usize;
    if len <= self.max_points_per_leaf || level >= self.max_depth.min(MORTON_LEVELS) {
      return cells;
    }

    // All codes in the range share the node prefix, so the digit at this
    // level is non-decreasing and each child is one run.
    let run = &codes[beg as usize..end as usize];
    let mut start = 0usize;
    while start < run.len() {
      let digit = extract_level_code(run[start], level);
      let stop = start + run[start..].partition_point(|&code| extract_level_code(code, level) <= digit);
      cells.open(digit as u8, beg + start as u32);
      start = stop;
    }
    cells.finish(end);
    cells
  }
}

#[cfg(test)]
#[path = "cells_test.rs"]
mod cells_test;
