//! Double-buffered frontier handoff between construction stages.
//!
//! One line is active (read by the stage that consumes it) while a pass writes
//! the other. Publishing a frontier fills the inactive line and its count,
//! then flips `active_selector` so the next stage reads it.
//!
//! ```text
//!   pass N reads  lines[sel]      ──┐
//!   pass N writes lines[sel ^ 1]    │ publish → sel ^= 1
//!   pass N+1 reads lines[sel ^ 1] ◄─┘
//! ```

use std::ops::Range;

use rayon::prelude::*;

use crate::constants::TASK_LEVEL_BITS;

/// A node awaiting child discovery, with the depth it sits at.
///
/// The depth travels with the node because child codes are derived by
/// shifting the parent code one level further.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Task {
  pub node: u32,
  pub level: u32,
}

impl Task {
  pub fn new(node: u32, level: u32) -> Self {
    Self { node, level }
  }

  /// Pack as `(node << 8) | level`.
  #[inline]
  pub fn pack(self) -> u32 {
    debug_assert!(self.level < (1 << TASK_LEVEL_BITS));
    (self.node << TASK_LEVEL_BITS) | self.level
  }

  #[inline]
  pub fn unpack(packed: u32) -> Self {
    Self {
      node: packed >> TASK_LEVEL_BITS,
      level: packed & ((1 << TASK_LEVEL_BITS) - 1),
    }
  }
}

/// Two frontier lines, their counts, and the active selector.
#[derive(Clone, Debug, Default)]
pub struct TaskQueue {
  lines: [Vec<Task>; 2],
  counts: [usize; 2],
  active_selector: usize,
}

impl TaskQueue {
  pub fn new() -> Self {
    Self::default()
  }

  /// Reserve `tasks` entries in each line.
  pub fn with_capacity(tasks: usize) -> Self {
    Self {
      lines: [Vec::with_capacity(tasks), Vec::with_capacity(tasks)],
      counts: [0, 0],
      active_selector: 0,
    }
  }

  /// Index of the line consumers read.
  #[inline]
  pub fn active_selector(&self) -> usize {
    self.active_selector
  }

  /// Index of the line the next pass writes.
  #[inline]
  pub fn inactive_selector(&self) -> usize {
    self.active_selector ^ 1
  }

  /// Tasks of the active line.
  pub fn active(&self) -> &[Task] {
    let sel = self.active_selector;
    &self.lines[sel][..self.counts[sel]]
  }

  #[inline]
  pub fn active_count(&self) -> usize {
    self.counts[self.active_selector]
  }

  /// Count recorded for line `selector`.
  #[inline]
  pub fn count(&self, selector: usize) -> usize {
    self.counts[selector & 1]
  }

  /// Line `selector`, trimmed to its count.
  pub fn line(&self, selector: usize) -> &[Task] {
    let sel = selector & 1;
    &self.lines[sel][..self.counts[sel]]
  }

  /// Flip which line is active.
  #[inline]
  pub fn swap(&mut self) {
    self.active_selector ^= 1;
  }

  /// Empty both lines and reset the selector.
  pub fn clear(&mut self) {
    for line in &mut self.lines {
      line.clear();
    }
    self.counts = [0, 0];
    self.active_selector = 0;
  }

  /// Write `nodes` at `level` into the inactive line, record its count and
  /// make it active. Returns the number of tasks published.
  pub fn publish(&mut self, nodes: Range<usize>, level: u32) -> usize {
    let sel = self.inactive_selector();
    let line = &mut self.lines[sel];
    line.clear();
    line.par_extend(
      nodes
        .into_par_iter()
        .map(|node| Task::new(node as u32, level)),
    );
    self.counts[sel] = line.len();
    self.swap();
    self.counts[sel]
  }
}

#[cfg(test)]
#[path = "task_queue_test.rs"]
mod task_queue_test;
