//! Frontier expansion: grows the octree one breadth-first level at a time.
//!
//! Each level runs four phases in strict order:
//!
//! ```text
//! ┌───────────┐   ┌──────┐   ┌───────┐   ┌────────┐
//! │ Partition ├──►│ Scan ├──►│ Write ├──►│ Commit ├──► next level / overflow
//! └───────────┘   └──────┘   └───────┘   └────────┘
//!  per task        group      per task    once
//!  child counts    offsets    rows +      frontier bounds,
//!  into lanes                 descriptor  nodes_num, terminate
//! ```
//!
//! The exclusive scan over lane counts hands every task a private, contiguous
//! block of new rows, so the write phase needs no atomics or locks. The
//! commit phase is the only writer of the scalar frontier state.

use std::ops::Range;

use rayon::prelude::*;

use super::{BuildConfig, StageStats};
use crate::cells::{CellPartitioner, Cells};
use crate::constants::{LEVEL_BITS, MAX_NODE_INDEX};
use crate::error::BuildError;
use crate::scan::exclusive_scan;
use crate::storage::{Descriptor, OctreeStorage};

/// How a construction pass ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageOutcome {
  /// The frontier emptied; the tree is fully built.
  Complete,
  /// The next frontier exceeds the group capacity. The residual frontier sits
  /// at depth `level` and must be expanded by a continuation stage.
  Overflow { level: u32 },
}

impl StageOutcome {
  #[inline]
  pub fn needs_continuation(&self) -> bool {
    matches!(self, Self::Overflow { .. })
  }

  /// Depth recorded with the residual frontier (0 when complete).
  #[inline]
  pub fn level(&self) -> u32 {
    match *self {
      Self::Complete => 0,
      Self::Overflow { level } => level,
    }
  }
}

/// Scratch state owned by one pass.
#[derive(Clone, Debug)]
pub struct LevelScratch {
  pub tasks_beg: usize,
  pub tasks_end: usize,
  /// One slot per lane: child counts, then exclusive offsets after the scan.
  pub offsets: Vec<u32>,
  pub terminate: bool,
  pub nodes_num: usize,
}

impl LevelScratch {
  fn new(group_capacity: usize) -> Self {
    Self {
      tasks_beg: 0,
      tasks_end: 0,
      offsets: vec![0; group_capacity],
      terminate: false,
      nodes_num: 0,
    }
  }

  #[inline]
  pub fn task_count(&self) -> usize {
    self.tasks_end - self.tasks_beg
  }

  /// Current frontier as a node range.
  #[inline]
  pub fn frontier(&self) -> Range<usize> {
    self.tasks_beg..self.tasks_end
  }
}

/// Partition result of one active lane.
struct LaneCells {
  task: usize,
  code: u32,
  cells: Cells,
}

/// Expands frontiers inside one cooperative group until the tree is built or
/// the frontier outgrows the group.
pub struct FrontierExpansion<'a, P: CellPartitioner> {
  config: BuildConfig,
  partitioner: &'a P,
  codes: &'a [u32],
  storage: &'a mut OctreeStorage,
  scratch: LevelScratch,
  stats: StageStats,
}

impl<'a, P: CellPartitioner> FrontierExpansion<'a, P> {
  pub fn new(
    config: BuildConfig,
    partitioner: &'a P,
    codes: &'a [u32],
    storage: &'a mut OctreeStorage,
  ) -> Self {
    Self {
      config,
      partitioner,
      codes,
      storage,
      scratch: LevelScratch::new(config.group_capacity),
      stats: StageStats::default(),
    }
  }

  pub fn scratch(&self) -> &LevelScratch {
    &self.scratch
  }

  /// Hand back the final scratch state and level statistics.
  pub fn finish(self) -> (LevelScratch, StageStats) {
    (self.scratch, self.stats)
  }

  /// Build from the root over `points_num` sorted points.
  ///
  /// On overflow the level just written stays committed and
  /// [`LevelScratch::frontier`] is the unexpanded residual.
  pub fn build(&mut self, points_num: u32) -> Result<StageOutcome, BuildError> {
    if self.codes.len() < points_num as usize {
      return Err(BuildError::CodesTooShort {
        points_num: points_num as usize,
        codes_len: self.codes.len(),
      });
    }
    self.init_root(points_num);
    let mut level = 0u32;

    while self.scratch.task_count() > 0 {
      let lanes = self.partition_frontier(level);
      self.stage_counts(&lanes);
      let scanned_total = exclusive_scan(&mut self.scratch.offsets);
      self.write_children(&lanes, scanned_total as usize)?;

      level += 1;
      let total_new = self.commit_level(&lanes);
      debug_assert_eq!(total_new, scanned_total as usize);
      self.stats.record(level - 1, lanes.len(), total_new);

      if self.scratch.terminate {
        #[cfg(feature = "tracing")]
        tracing::debug!(
          level,
          frontier = self.scratch.task_count(),
          capacity = self.config.group_capacity,
          "frontier exceeds group capacity"
        );
        return Ok(StageOutcome::Overflow { level });
      }
    }

    Ok(StageOutcome::Complete)
  }

  fn init_root(&mut self, points_num: u32) {
    self.storage.reset_root(points_num);
    self.scratch.nodes_num = 1;
    self.scratch.tasks_beg = 0;
    self.scratch.tasks_end = 1;
    self.scratch.terminate = false;
  }

  /// Phase 1: each active lane partitions its task.
  fn partition_frontier(&self, level: u32) -> Vec<LaneCells> {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("partition", level).entered();

    debug_assert!(self.scratch.task_count() <= self.config.group_capacity);
    let storage = &*self.storage;
    let codes = self.codes;
    let partitioner = self.partitioner;

    self
      .scratch
      .frontier()
      .into_par_iter()
      .map(|task| LaneCells {
        task,
        code: storage.codes()[task],
        cells: partitioner.find_cells(codes, storage.begs()[task], storage.ends()[task], level),
      })
      .collect()
  }

  /// Phase 2: stage per-lane counts. Idle lanes contribute zero.
  fn stage_counts(&mut self, lanes: &[LaneCells]) {
    self
      .scratch
      .offsets
      .par_iter_mut()
      .enumerate()
      .for_each(|(lane, slot)| {
        *slot = lanes.get(lane).map_or(0, |l| l.cells.count() as u32);
      });
  }

  /// Phase 3: every lane with children writes them into its scanned block
  /// and sets its own descriptor.
  fn write_children(&mut self, lanes: &[LaneCells], total_new: usize) -> Result<(), BuildError> {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("write_children", total_new).entered();

    if total_new == 0 {
      return Ok(());
    }

    let nodes_num = self.scratch.nodes_num;
    check_node_index(nodes_num, total_new)?;

    self.storage.grow(nodes_num + total_new);
    let offsets = &self.scratch.offsets[..lanes.len()];
    let (descriptors, rows) = self.storage.level_rows_mut(self.scratch.frontier(), nodes_num);

    // Carve each lane's block at its scanned offset.
    let mut blocks = Vec::with_capacity(lanes.len());
    let mut rest = rows;
    let mut carved = 0usize;
    for (lane, &offset) in lanes.iter().zip(offsets) {
      debug_assert_eq!(carved, offset as usize);
      let (block, tail) = rest.split_at(lane.cells.count());
      blocks.push(block);
      rest = tail;
      carved += lane.cells.count();
    }
    debug_assert_eq!(rest.len(), 0);

    descriptors
      .par_iter_mut()
      .zip(lanes.par_iter())
      .zip(offsets.par_iter())
      .zip(blocks.into_par_iter())
      .for_each(|(((descriptor, lane), &offset), mut block)| {
        if lane.cells.is_leaf() {
          return;
        }
        let parent_code_shifted = lane.code << LEVEL_BITS;
        for (i, (digit, beg, end)) in lane.cells.iter().enumerate() {
          block.write(i, parent_code_shifted | digit as u32, beg, end, lane.task as i32);
        }
        let first_child = (nodes_num + offset as usize) as u32;
        *descriptor = Descriptor::new(first_child, lane.cells.mask());
      });

    Ok(())
  }

  /// Phase 4: single-writer bookkeeping. Returns the nodes created.
  fn commit_level(&mut self, lanes: &[LaneCells]) -> usize {
    let scratch = &mut self.scratch;
    let last = lanes.len() - 1;
    let total_new = scratch.offsets[last] as usize + lanes[last].cells.count();

    scratch.nodes_num += total_new;
    scratch.tasks_beg = scratch.tasks_end;
    scratch.tasks_end += total_new;

    if total_new > self.config.group_capacity {
      scratch.terminate = true;
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
      nodes_num = scratch.nodes_num,
      new_nodes = total_new,
      "level committed"
    );

    total_new
  }
}

/// The last of `total_new` rows appended after `nodes_num` must be
/// addressable from a descriptor.
fn check_node_index(nodes_num: usize, total_new: usize) -> Result<(), BuildError> {
  let last_index = nodes_num + total_new - 1;
  if last_index > MAX_NODE_INDEX as usize {
    return Err(BuildError::NodeIndexOverflow { index: last_index });
  }
  Ok(())
}

#[cfg(test)]
#[path = "expansion_test.rs"]
mod expansion_test;
