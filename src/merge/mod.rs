//! Merge engine
//!
//! Two-phase pattern:
//! 1. Plan - create `MergePlan` from resolved targets (pure, testable)
//! 2. Execute - merge each target, falling back to a PR on conflict (effectful)

mod execute;
mod fallback;
mod plan;
mod progress;

pub use execute::{MergeExecutionResult, TargetOutcome, execute_merge};
pub use fallback::{CONFLICT_PR_BODY, FallbackRequest, conflict_pr_title, open_conflict_pr};
pub use plan::{ConflictPolicy, MergePlan, MergePlanOptions, create_merge_plan};
pub use progress::{NoopProgress, ProgressCallback};
