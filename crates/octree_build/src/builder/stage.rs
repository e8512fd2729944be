//! Stage driver: the entry point of one bootstrap construction pass.
//!
//! Runs the frontier expansion, then publishes the pass results:
//!
//! 1. `nodes_num` into [`OctreeStorage`]
//! 2. the residual frontier, tagged with its depth, into the inactive line of
//!    the [`TaskQueue`], together with that line's count
//! 3. flips the queue selector so a continuation stage reads it
//!
//! Nothing else outside the pass is touched.

use std::ops::Range;

use web_time::Instant;

use super::expansion::{FrontierExpansion, StageOutcome};
use super::{BuildConfig, StageStats};
use crate::cells::{CellPartitioner, MortonCells};
use crate::error::BuildError;
use crate::storage::OctreeStorage;
use crate::task_queue::TaskQueue;

/// Result of one pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageReport {
  pub outcome: StageOutcome,
  /// Nodes in storage after the pass.
  pub nodes_num: usize,
  /// Unexpanded frontier handed to the continuation stage (empty when
  /// complete).
  pub residual: Range<usize>,
  pub stats: StageStats,
}

impl StageReport {
  #[inline]
  pub fn needs_continuation(&self) -> bool {
    self.outcome.needs_continuation()
  }
}

/// Bootstrap construction stage: one cooperative group, built from the root.
pub struct InitialStage<P: CellPartitioner = MortonCells> {
  config: BuildConfig,
  partitioner: P,
}

impl InitialStage<MortonCells> {
  /// Stage using Morton partitioning with the config's leaf rules.
  pub fn new(config: BuildConfig) -> Self {
    Self {
      config,
      partitioner: MortonCells::from_config(&config),
    }
  }
}

impl Default for InitialStage<MortonCells> {
  fn default() -> Self {
    Self::new(BuildConfig::DEFAULT)
  }
}

impl<P: CellPartitioner> InitialStage<P> {
  /// Stage with a custom partitioner. Leaf rules of `config` are only used by
  /// partitioners that read them.
  pub fn with_partitioner(config: BuildConfig, partitioner: P) -> Self {
    Self {
      config,
      partitioner,
    }
  }

  pub fn config(&self) -> &BuildConfig {
    &self.config
  }

  /// Run one pass over the first `points_num` of the sorted `codes`.
  ///
  /// Overflow of the group capacity is a normal outcome: check
  /// [`StageReport::needs_continuation`] (or the queue's active count), not
  /// the recorded level.
  #[cfg_attr(
    feature = "tracing",
    tracing::instrument(skip_all, name = "octree::initial_stage", fields(points_num = points_num))
  )]
  pub fn run(
    &self,
    codes: &[u32],
    points_num: usize,
    storage: &mut OctreeStorage,
    queue: &mut TaskQueue,
  ) -> Result<StageReport, BuildError> {
    self.config.validate()?;
    if codes.len() < points_num {
      return Err(BuildError::CodesTooShort {
        points_num,
        codes_len: codes.len(),
      });
    }
    let points =
      u32::try_from(points_num).map_err(|_| BuildError::PointCountOverflow { points_num })?;

    let start = Instant::now();

    let mut engine = FrontierExpansion::new(
      self.config,
      &self.partitioner,
      &codes[..points_num],
      storage,
    );
    let outcome = engine.build(points)?;
    let (scratch, mut stats) = engine.finish();

    storage.publish_nodes_num(scratch.nodes_num);
    let residual = scratch.frontier();
    let published = queue.publish(residual.clone(), outcome.level());
    debug_assert_eq!(published, residual.len());

    stats.elapsed_us = start.elapsed().as_micros() as u64;

    #[cfg(feature = "tracing")]
    tracing::debug!(
      nodes_num = scratch.nodes_num,
      residual = residual.len(),
      level = outcome.level(),
      "stage finished"
    );

    Ok(StageReport {
      outcome,
      nodes_num: scratch.nodes_num,
      residual,
      stats,
    })
  }
}

/// Build the bootstrap stage into fresh storage and queue.
pub fn build_initial_stage(
  codes: &[u32],
  config: BuildConfig,
) -> Result<(OctreeStorage, TaskQueue, StageReport), BuildError> {
  let stage = InitialStage::new(config);
  let mut storage = OctreeStorage::new();
  let mut queue = TaskQueue::new();
  let report = stage.run(codes, codes.len(), &mut storage, &mut queue)?;
  Ok((storage, queue, report))
}

#[cfg(test)]
#[path = "stage_test.rs"]
mod stage_test;
