//! octree_build - level-synchronous parallel octree construction
//!
//! Builds an octree over points already sorted by Morton code. The bootstrap
//! stage expands the tree breadth-first inside one fixed-capacity cooperative
//! group: every level partitions the frontier in parallel, allocates all new
//! nodes with one exclusive scan, writes them without contention and commits
//! the next frontier. When a level creates more nodes than the group has
//! lanes, the stage stops and hands the residual frontier (and its depth) to
//! a continuation stage through a double-buffered task queue.
//!
//! # Example
//!
//! ```ignore
//! use octree_build::{build_initial_stage, morton, BuildConfig};
//!
//! let mut codes: Vec<u32> = points
//!     .iter()
//!     .map(|&p| morton::encode_point(p, min, max))
//!     .collect();
//! codes.sort_unstable();
//!
//! let (storage, queue, report) = build_initial_stage(&codes, BuildConfig::DEFAULT)?;
//! if report.needs_continuation() {
//!     // queue.active() holds the unexpanded frontier
//! }
//! ```

pub mod constants;
pub mod error;
pub mod morton;
pub mod scan;

// Cell partitioning (FindCells contract)
pub mod cells;
pub use cells::{CellPartitioner, Cells, MortonCells};

// Node storage
pub mod storage;
pub use storage::{Descriptor, NodeView, OctreeStorage};

// Frontier handoff between stages
pub mod task_queue;
pub use task_queue::{Task, TaskQueue};

// Construction
pub mod builder;
pub use builder::{
  build_initial_stage, BuildConfig, FrontierExpansion, InitialStage, StageOutcome, StageReport,
  StageStats,
};

pub mod validate;

pub use error::{BuildError, ValidationError};

#[cfg(test)]
pub mod test_utils;
