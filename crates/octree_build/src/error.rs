//! Error types for stage construction and storage validation.

use thiserror::Error;

/// Reasons a construction pass refuses to run or cannot finish.
///
/// Capacity overflow of the cooperative group is not an error; it is reported
/// as [`crate::builder::StageOutcome::Overflow`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
  #[error("invalid build config: {0}")]
  InvalidConfig(&'static str),

  #[error("{points_num} points requested but only {codes_len} codes supplied")]
  CodesTooShort { points_num: usize, codes_len: usize },

  #[error("{points_num} points do not fit 32-bit point ranges")]
  PointCountOverflow { points_num: usize },

  #[error("node index {index} does not fit a node descriptor")]
  NodeIndexOverflow { index: usize },
}

/// An invariant of the built octree that does not hold.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
  #[error("storage holds {rows} rows but publishes nodes_num = {nodes_num}")]
  NodeCountMismatch { rows: usize, nodes_num: usize },

  #[error("root node is malformed")]
  BadRoot,

  #[error("node {node} has inverted point range {beg}..{end}")]
  InvertedRange { node: usize, beg: u32, end: u32 },

  #[error("node {node} has parent {parent} which was not created before it")]
  BadParent { node: usize, parent: i32 },

  #[error("node {node} has code {code:#x} which does not extend its parent's code")]
  BadCode { node: usize, code: u32 },

  #[error("node {node} references children beyond the last node")]
  ChildOutOfBounds { node: usize },

  #[error("child {child} of node {node} does not point back at it")]
  ChildParentMismatch { node: usize, child: usize },

  #[error("children of node {node} do not partition its point range")]
  BrokenPartition { node: usize },

  #[error("node {node} is not listed by its parent's descriptor")]
  Orphan { node: usize },

  #[error("point {point} in node {node} does not share the node's code prefix")]
  PointOutsideCell { node: usize, point: usize },
}
