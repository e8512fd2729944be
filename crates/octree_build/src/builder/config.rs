//! BuildConfig - sizing of the bootstrap cooperative group and leaf rules.

use crate::constants::{CTA_SIZE, MAX_POINTS_PER_LEAF, MORTON_LEVELS};
use crate::error::BuildError;

/// Configuration for one construction pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildConfig {
  /// Lanes in the cooperative group. A level creating more nodes than this
  /// ends the pass and hands the frontier to a continuation stage.
  pub group_capacity: usize,
  /// Nodes holding this many points or fewer are leaves.
  pub max_points_per_leaf: usize,
  /// Depth at which nodes become leaves regardless of point count.
  pub max_depth: u32,
}

impl BuildConfig {
  /// Full-size group with the standard leaf size.
  pub const DEFAULT: Self = Self {
    group_capacity: CTA_SIZE,
    max_points_per_leaf: MAX_POINTS_PER_LEAF,
    max_depth: MORTON_LEVELS,
  };

  /// Split until every leaf holds a single point (or full depth is reached).
  pub const FINE: Self = Self {
    group_capacity: CTA_SIZE,
    max_points_per_leaf: 1,
    max_depth: MORTON_LEVELS,
  };

  /// Same leaf rules with a different group capacity.
  pub const fn with_capacity(self, group_capacity: usize) -> Self {
    Self {
      group_capacity,
      ..self
    }
  }

  pub fn validate(&self) -> Result<(), BuildError> {
    if self.group_capacity == 0 {
      return Err(BuildError::InvalidConfig("group_capacity must be at least 1"));
    }
    if self.max_depth > MORTON_LEVELS {
      return Err(BuildError::InvalidConfig(
        "max_depth exceeds the levels encoded in a Morton code",
      ));
    }
    Ok(())
  }
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self::DEFAULT
  }
}
