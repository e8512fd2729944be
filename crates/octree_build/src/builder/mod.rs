//! Bootstrap octree construction.
//!
//! - [`config`]: `BuildConfig` - group capacity and leaf rules
//! - [`expansion`]: `FrontierExpansion` - the level-synchronous loop
//! - [`stage`]: `InitialStage` - pass entry point and handoff to the
//!   continuation stage
//! - [`stats`]: per-level statistics

pub mod config;
pub mod expansion;
pub mod stage;
pub mod stats;

// Re-exports
pub use config::BuildConfig;
pub use expansion::{FrontierExpansion, LevelScratch, StageOutcome};
pub use stage::{build_initial_stage, InitialStage, StageReport};
pub use stats::{LevelStats, StageStats};
