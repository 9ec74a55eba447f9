//! Core types for merge-branch

/// What to merge into: a single named branch, or every branch matching a regex
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSpec {
    /// A single branch name, used as-is
    Literal(String),
    /// A regular expression matched against every branch name
    Pattern(String),
}

impl std::fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(name) => write!(f, "{name}"),
            Self::Pattern(pattern) => write!(f, "/{pattern}/"),
        }
    }
}

/// A branch in the remote repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    /// Branch name without the `refs/heads/` prefix
    pub name: String,
}

impl Branch {
    /// Create a branch reference from a name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Intent to merge `head` into `base`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeAttempt {
    /// Branch receiving the merge (the target)
    pub base: Branch,
    /// Branch being merged (the source)
    pub head: Branch,
    /// Message for the merge commit
    pub commit_message: String,
}

/// Identity of a pull request on the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    /// PR number
    pub number: u64,
    /// Web URL for the PR
    pub url: String,
}

/// The user (or bot) that triggered the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Host login
    pub login: String,
}

/// Who to notify on a fallback pull request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotifyPolicy {
    /// Do nothing after creating the PR
    #[default]
    None,
    /// Add the actor as assignee
    Assignee,
    /// Request a review from the actor
    Reviewer,
}

impl std::fmt::Display for NotifyPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Assignee => write!(f, "assignee"),
            Self::Reviewer => write!(f, "reviewer"),
        }
    }
}

/// Why a target ended in failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureCause {
    /// Merge conflicted and pull request fallback is disabled
    Conflict,
    /// The merge call itself failed (auth, not found, rate limit, ...)
    Merge(String),
    /// Merge conflicted and the fallback pull request could not be created
    PullRequest(String),
}

impl std::fmt::Display for FailureCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conflict => write!(f, "merge conflict"),
            Self::Merge(msg) => write!(f, "merge failed: {msg}"),
            Self::PullRequest(msg) => write!(f, "merge conflict, pull request failed: {msg}"),
        }
    }
}

/// Terminal state of one target branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Merged cleanly; `sha` is `None` when the base already contained the head
    Merged {
        /// Merge commit SHA
        sha: Option<String>,
    },
    /// Conflict, a pull request was opened instead
    ConflictResolvedByPr(PullRequestRef),
    /// Conflict, an open pull request for this head/base already existed
    ConflictPrAlreadyExists(Option<PullRequestRef>),
    /// Target failed
    Failed(FailureCause),
}

impl MergeOutcome {
    /// Whether this outcome counts as success for the run
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    /// Pull request associated with this outcome, if any
    pub const fn pull_request(&self) -> Option<&PullRequestRef> {
        match self {
            Self::ConflictResolvedByPr(pr) | Self::ConflictPrAlreadyExists(Some(pr)) => Some(pr),
            _ => None,
        }
    }
}

impl std::fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Merged { sha: Some(sha) } => write!(f, "merged ({sha})"),
            Self::Merged { sha: None } => write!(f, "already up to date"),
            Self::ConflictResolvedByPr(pr) => write!(f, "conflict, opened PR #{}", pr.number),
            Self::ConflictPrAlreadyExists(Some(pr)) => {
                write!(f, "conflict, PR #{} already open", pr.number)
            }
            Self::ConflictPrAlreadyExists(None) => write!(f, "conflict, PR already open"),
            Self::Failed(cause) => write!(f, "failed: {cause}"),
        }
    }
}

/// Result of the host's merge endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchMergeResult {
    /// A merge commit was created
    Merged {
        /// SHA of the merge commit
        sha: String,
    },
    /// Base already contains head, nothing to do
    UpToDate,
    /// Merge cannot be applied without manual resolution
    Conflict,
}

/// Position in a paginated branch listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCursor {
    /// Opaque cursor (GraphQL `endCursor`)
    After(String),
    /// 1-based page number (REST)
    Page(u32),
}

/// One page of a branch listing
#[derive(Debug, Clone, Default)]
pub struct BranchPage {
    /// Branches on this page, in host order
    pub branches: Vec<Branch>,
    /// Whether the host reports more pages
    pub has_next_page: bool,
    /// Cursor for the next page (present when `has_next_page`)
    pub next: Option<PageCursor>,
}

/// How branch listings are paginated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BranchListing {
    /// GraphQL `refs` connection with cursors
    #[default]
    GraphQl,
    /// REST `/branches` with page numbers and `Link` headers
    Rest,
}

impl std::fmt::Display for BranchListing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GraphQl => write!(f, "graphql"),
            Self::Rest => write!(f, "rest"),
        }
    }
}

impl std::str::FromStr for BranchListing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "graphql" => Ok(Self::GraphQl),
            "rest" => Ok(Self::Rest),
            other => Err(format!(
                "unknown branch listing '{other}' (expected graphql or rest)"
            )),
        }
    }
}

/// Repository coordinates for the platform
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
}
