//! Merge planning - pure functions for creating merge plans
//!
//! No I/O happens here. The resolved target list is frozen into the plan and
//! never re-resolved while it executes.

use crate::types::{Actor, Branch, MergeAttempt, NotifyPolicy};

/// What to do when a merge conflicts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Record the target as failed
    Reject,
    /// Open a pull request for manual resolution
    PullRequest,
}

impl std::fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reject => write!(f, "fail"),
            Self::PullRequest => write!(f, "open pull request"),
        }
    }
}

/// Options for merge planning
#[derive(Debug, Clone, Default)]
pub struct MergePlanOptions {
    /// Open a pull request on conflict instead of failing
    pub create_pull_request: bool,
    /// Who to notify on fallback pull requests
    pub notify: NotifyPolicy,
    /// The triggering actor
    pub actor: Option<Actor>,
}

/// Merge plan - the functional core output
///
/// Created by `create_merge_plan()` (pure) and executed by
/// `execute_merge()` (effectful).
#[derive(Debug, Clone)]
pub struct MergePlan {
    /// Branch being merged
    pub source_branch: String,
    /// One attempt per target, in resolver order
    pub attempts: Vec<MergeAttempt>,
    /// Conflict handling
    pub on_conflict: ConflictPolicy,
    /// Post-creation notification for fallback PRs
    pub notify: NotifyPolicy,
    /// Actor to notify
    pub actor: Option<Actor>,
}

impl MergePlan {
    /// Check if there is nothing to merge
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    /// Target branch names in execution order
    pub fn targets(&self) -> Vec<&str> {
        self.attempts.iter().map(|a| a.base.name.as_str()).collect()
    }
}

impl std::fmt::Display for MergePlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "merge {} into {} target(s), on conflict: {}",
            self.source_branch,
            self.attempts.len(),
            self.on_conflict
        )?;
        for attempt in &self.attempts {
            writeln!(f, "  {} <- {}", attempt.base.name, attempt.head.name)?;
        }
        Ok(())
    }
}

/// Create a merge plan (PURE - no I/O, easily testable)
///
/// # Arguments
/// * `source_branch` - Branch that triggered the run
/// * `targets` - Resolved target branches, in resolver order
/// * `commit_message` - Message for every merge commit
/// * `options` - Conflict and notification policy
#[must_use]
pub fn create_merge_plan(
    source_branch: &str,
    targets: &[String],
    commit_message: &str,
    options: &MergePlanOptions,
) -> MergePlan {
    let attempts = targets
        .iter()
        .map(|target| MergeAttempt {
            base: Branch::new(target.as_str()),
            head: Branch::new(source_branch),
            commit_message: commit_message.to_string(),
        })
        .collect();

    MergePlan {
        source_branch: source_branch.to_string(),
        attempts,
        on_conflict: if options.create_pull_request {
            ConflictPolicy::PullRequest
        } else {
            ConflictPolicy::Reject
        },
        notify: options.notify,
        actor: options.actor.clone(),
    }
}
