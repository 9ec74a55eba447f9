//! Merge execution - effectful operations
//!
//! Takes a `MergePlan` and merges the source into each target through the
//! platform API, one target at a time. A failing target never stops the
//! ones after it, and nothing already merged is rolled back.

use crate::merge::fallback::{FallbackRequest, open_conflict_pr};
use crate::merge::plan::{ConflictPolicy, MergePlan};
use crate::merge::progress::ProgressCallback;
use crate::platform::PlatformService;
use crate::types::{BranchMergeResult, FailureCause, MergeAttempt, MergeOutcome, PullRequestRef};
use tracing::{info, warn};

/// Outcome for one target branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOutcome {
    /// Target branch
    pub target: String,
    /// What happened
    pub outcome: MergeOutcome,
}

/// Result of merge execution
#[derive(Debug, Clone, Default)]
pub struct MergeExecutionResult {
    /// One outcome per target, in plan order
    pub outcomes: Vec<TargetOutcome>,
}

impl MergeExecutionResult {
    /// Check if every target succeeded (vacuously true with no targets)
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.outcome.is_success())
    }

    /// Targets that ended in failure
    pub fn failed_targets(&self) -> Vec<&TargetOutcome> {
        self.outcomes
            .iter()
            .filter(|o| !o.outcome.is_success())
            .collect()
    }

    /// Targets merged directly
    pub fn merged_targets(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.outcome, MergeOutcome::Merged { .. }))
            .map(|o| o.target.as_str())
            .collect()
    }

    /// Pull requests created or found for conflicting targets
    pub fn pull_requests(&self) -> Vec<&PullRequestRef> {
        self.outcomes
            .iter()
            .filter_map(|o| o.outcome.pull_request())
            .collect()
    }
}

/// Execute the merge plan (EFFECTFUL)
///
/// Every target yields exactly one outcome; per-target errors are captured
/// in the outcome rather than returned.
pub async fn execute_merge(
    plan: &MergePlan,
    platform: &dyn PlatformService,
    progress: &dyn ProgressCallback,
) -> MergeExecutionResult {
    let mut result = MergeExecutionResult::default();

    for attempt in &plan.attempts {
        let outcome = merge_one(plan, attempt, platform, progress).await;
        progress.on_outcome(&attempt.base.name, &outcome).await;
        result.outcomes.push(TargetOutcome {
            target: attempt.base.name.clone(),
            outcome,
        });
    }

    result
}

async fn merge_one(
    plan: &MergePlan,
    attempt: &MergeAttempt,
    platform: &dyn PlatformService,
    progress: &dyn ProgressCallback,
) -> MergeOutcome {
    let (head, base) = (attempt.head.name.as_str(), attempt.base.name.as_str());
    progress
        .on_message(&format!("Attempting to merge {head} into {base}"))
        .await;

    match platform
        .merge_branch(base, head, &attempt.commit_message)
        .await
    {
        Ok(BranchMergeResult::Merged { sha }) => {
            info!(head, base, %sha, "merged");
            MergeOutcome::Merged { sha: Some(sha) }
        }
        Ok(BranchMergeResult::UpToDate) => {
            info!(head, base, "base already contains head");
            MergeOutcome::Merged { sha: None }
        }
        Ok(BranchMergeResult::Conflict) => match plan.on_conflict {
            ConflictPolicy::Reject => {
                warn!(head, base, "merge conflict, pull request fallback disabled");
                MergeOutcome::Failed(FailureCause::Conflict)
            }
            ConflictPolicy::PullRequest => {
                progress
                    .on_message("Automatic merge conflict, creating a pull request.")
                    .await;
                let request =
                    FallbackRequest::new(head, base).with_notify(plan.notify, plan.actor.as_ref());
                open_conflict_pr(platform, &request, progress).await
            }
        },
        Err(e) => {
            warn!(head, base, error = %e, "merge failed");
            MergeOutcome::Failed(FailureCause::Merge(e.to_string()))
        }
    }
}
