//! Platform services for the remote repository host
//!
//! Provides the branch listing and repository mutation capabilities the
//! resolver and merge engine depend on.

mod github;

pub use github::{GitHubService, GitHubServiceOptions, DEFAULT_API_URL, DEFAULT_GRAPHQL_URL};

use crate::error::Result;
use crate::types::{BranchMergeResult, BranchPage, PageCursor, PlatformConfig, PullRequestRef};
use async_trait::async_trait;

/// Platform service trait for branch and PR operations
///
/// Implementations map host responses into typed results at the boundary.
/// A merge conflict is a value ([`BranchMergeResult::Conflict`]), not an
/// error; a duplicate pull request is reported as
/// [`Error::PullRequestExists`](crate::error::Error::PullRequestExists).
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Fetch one page of branches
    ///
    /// `after` is `None` for the first page, then the `next` cursor of the
    /// previous page.
    async fn list_branches(&self, after: Option<&PageCursor>, page_size: u32)
    -> Result<BranchPage>;

    /// Merge `head` into `base` with the given commit message
    async fn merge_branch(
        &self,
        base: &str,
        head: &str,
        commit_message: &str,
    ) -> Result<BranchMergeResult>;

    /// Find an open PR from `head` into `base`
    async fn find_open_pr(&self, head: &str, base: &str) -> Result<Option<PullRequestRef>>;

    /// Create a PR from `head` into `base`
    async fn create_pr(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequestRef>;

    /// Add assignees to a PR
    async fn add_assignees(&self, pr_number: u64, logins: &[String]) -> Result<()>;

    /// Request reviews on a PR
    async fn request_reviewers(&self, pr_number: u64, logins: &[String]) -> Result<()>;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}
