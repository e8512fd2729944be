//! Per-level statistics of a construction pass.

/// One committed level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LevelStats {
  /// Depth of the tasks that were expanded.
  pub level: u32,
  /// Frontier width (active lanes).
  pub tasks: usize,
  /// Nodes created for the next level.
  pub new_nodes: usize,
}

/// Statistics from one stage pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StageStats {
  /// Committed levels in order.
  pub levels: Vec<LevelStats>,
  /// Wall time of the pass in microseconds.
  pub elapsed_us: u64,
}

impl StageStats {
  pub(crate) fn record(&mut self, level: u32, tasks: usize, new_nodes: usize) {
    self.levels.push(LevelStats {
      level,
      tasks,
      new_nodes,
    });
  }

  /// Number of committed levels.
  #[inline]
  pub fn levels_committed(&self) -> usize {
    self.levels.len()
  }

  /// Widest frontier the group expanded.
  pub fn max_frontier(&self) -> usize {
    self.levels.iter().map(|l| l.tasks).max().unwrap_or(0)
  }

  /// Nodes created below the root.
  pub fn total_new_nodes(&self) -> usize {
    self.levels.iter().map(|l| l.new_nodes).sum()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_stats() {
    let stats = StageStats::default();
    assert_eq!(stats.levels_committed(), 0);
    assert_eq!(stats.max_frontier(), 0);
    assert_eq!(stats.total_new_nodes(), 0);
  }

  #[test]
  fn test_stats_totals() {
    let mut stats = StageStats::default();
    stats.record(0, 1, 8);
    stats.record(1, 8, 20);
    stats.record(2, 20, 0);
    assert_eq!(stats.levels_committed(), 3);
    assert_eq!(stats.max_frontier(), 20);
    assert_eq!(stats.total_new_nodes(), 28);
  }
}
