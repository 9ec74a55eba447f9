//! Pull request fallback for conflicting merges

use crate::error::Error;
use crate::merge::progress::ProgressCallback;
use crate::platform::PlatformService;
use crate::types::{Actor, FailureCause, MergeOutcome, NotifyPolicy, PullRequestRef};
use tracing::{info, warn};

/// Body used for conflict pull requests
pub const CONFLICT_PR_BODY: &str = "Automatic merge conflict, please resolve manually.";

/// Title used for conflict pull requests
pub fn conflict_pr_title(head: &str, base: &str) -> String {
    format!("Merge {head} into {base}")
}

/// A conflict to turn into a pull request
#[derive(Debug, Clone)]
pub struct FallbackRequest<'a> {
    /// Source branch
    pub head: &'a str,
    /// Target branch
    pub base: &'a str,
    /// PR title
    pub title: String,
    /// PR body
    pub body: String,
    /// Who to notify once the PR exists
    pub notify: NotifyPolicy,
    /// The triggering actor
    pub actor: Option<&'a Actor>,
}

impl<'a> FallbackRequest<'a> {
    /// Request with the default title and body
    pub fn new(head: &'a str, base: &'a str) -> Self {
        Self {
            head,
            base,
            title: conflict_pr_title(head, base),
            body: CONFLICT_PR_BODY.to_string(),
            notify: NotifyPolicy::None,
            actor: None,
        }
    }

    /// Notify `actor` according to `notify` after creation
    #[must_use]
    pub fn with_notify(mut self, notify: NotifyPolicy, actor: Option<&'a Actor>) -> Self {
        self.notify = notify;
        self.actor = actor;
        self
    }
}

/// Open a pull request for a conflicting merge (EFFECTFUL)
///
/// An open PR for the same head/base, found up front or reported by the
/// host on creation, is a success. Notification only follows a fresh PR and
/// its failure never changes the outcome.
pub async fn open_conflict_pr(
    platform: &dyn PlatformService,
    request: &FallbackRequest<'_>,
    progress: &dyn ProgressCallback,
) -> MergeOutcome {
    let (head, base) = (request.head, request.base);

    match platform.find_open_pr(head, base).await {
        Ok(Some(existing)) => {
            info!(head, base, pr_number = existing.number, "pull request already open");
            progress
                .on_message(&format!(
                    "A pull request already exists: #{} {}",
                    existing.number, existing.url
                ))
                .await;
            return MergeOutcome::ConflictPrAlreadyExists(Some(existing));
        }
        Ok(None) => {}
        // Lookup is an optimization; creation still detects duplicates
        Err(e) => warn!(head, base, error = %e, "failed to look up existing pull request"),
    }

    match platform
        .create_pr(head, base, &request.title, &request.body)
        .await
    {
        Ok(pr) => {
            info!(head, base, pr_number = pr.number, "pull request created");
            progress
                .on_message(&format!("Pull request created: {}", pr.url))
                .await;
            notify_actor(platform, &pr, request.notify, request.actor, progress).await;
            MergeOutcome::ConflictResolvedByPr(pr)
        }
        Err(Error::PullRequestExists { .. }) => {
            info!(head, base, "host reports pull request already exists");
            progress.on_message("A pull request already exists").await;
            MergeOutcome::ConflictPrAlreadyExists(None)
        }
        Err(e) => {
            warn!(head, base, error = %e, "failed to create pull request");
            MergeOutcome::Failed(FailureCause::PullRequest(e.to_string()))
        }
    }
}

/// Best-effort assignee/reviewer attach
async fn notify_actor(
    platform: &dyn PlatformService,
    pr: &PullRequestRef,
    notify: NotifyPolicy,
    actor: Option<&Actor>,
    progress: &dyn ProgressCallback,
) {
    let Some(actor) = actor else {
        return;
    };
    let logins = std::slice::from_ref(&actor.login);

    let result = match notify {
        NotifyPolicy::None => return,
        NotifyPolicy::Assignee => platform.add_assignees(pr.number, logins).await,
        NotifyPolicy::Reviewer => platform.request_reviewers(pr.number, logins).await,
    };

    match result {
        Ok(()) => {
            progress
                .on_message(&format!(
                    "Added {} as {notify} on #{}",
                    actor.login, pr.number
                ))
                .await;
        }
        Err(e) => {
            warn!(
                pr_number = pr.number,
                login = %actor.login,
                %notify,
                error = %e,
                "failed to notify actor"
            );
            progress
                .on_message(&format!(
                    "Could not add {} as {notify} on #{}: {e}",
                    actor.login, pr.number
                ))
                .await;
        }
    }
}
