//! Mock platform service for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use merge_branch::error::{Error, Result};
use merge_branch::platform::PlatformService;
use merge_branch::types::{
    Branch, BranchMergeResult, BranchPage, PageCursor, PlatformConfig, PullRequestRef,
};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Call record for `list_branches`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListBranchesCall {
    pub after: Option<PageCursor>,
    pub page_size: u32,
}

/// Call record for `merge_branch`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeCall {
    pub base: String,
    pub head: String,
    pub commit_message: String,
}

/// Call record for `create_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePrCall {
    pub head: String,
    pub base: String,
    pub title: String,
    pub body: String,
}

/// Call record for `add_assignees` / `request_reviewers`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyCall {
    pub pr_number: u64,
    pub logins: Vec<String>,
}

/// Scripted response for `merge_branch`
#[derive(Debug, Clone)]
pub enum MergeResponse {
    Merged(String),
    UpToDate,
    Conflict,
    Error(String),
}

/// Simple mock platform service for testing
///
/// Features:
/// - Branch listing sliced into pages (cursor or page-number style)
/// - Scripted merge responses per base branch
/// - Stateful open-PR store, so duplicate creation behaves like the host
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockPlatformService {
    config: PlatformConfig,
    next_pr_number: AtomicU64,
    branches: Mutex<Vec<String>>,
    use_page_numbers: Mutex<bool>,
    drop_next_cursor: Mutex<bool>,
    merge_responses: Mutex<HashMap<String, MergeResponse>>,
    open_prs: Mutex<HashMap<(String, String), PullRequestRef>>,
    // Call tracking
    list_branches_calls: Mutex<Vec<ListBranchesCall>>,
    merge_calls: Mutex<Vec<MergeCall>>,
    find_pr_calls: Mutex<Vec<(String, String)>>,
    create_pr_calls: Mutex<Vec<CreatePrCall>>,
    assignee_calls: Mutex<Vec<NotifyCall>>,
    reviewer_calls: Mutex<Vec<NotifyCall>>,
    // Error injection
    error_on_list_branches: Mutex<Option<String>>,
    error_on_find_pr: Mutex<Option<String>>,
    error_on_create_pr: Mutex<Option<String>>,
    duplicate_on_create_pr: Mutex<bool>,
    error_on_notify: Mutex<Option<String>>,
}

impl MockPlatformService {
    /// Create a new mock with the given config
    pub fn with_config(config: PlatformConfig) -> Self {
        Self {
            config,
            next_pr_number: AtomicU64::new(1),
            branches: Mutex::new(Vec::new()),
            use_page_numbers: Mutex::new(false),
            drop_next_cursor: Mutex::new(false),
            merge_responses: Mutex::new(HashMap::new()),
            open_prs: Mutex::new(HashMap::new()),
            list_branches_calls: Mutex::new(Vec::new()),
            merge_calls: Mutex::new(Vec::new()),
            find_pr_calls: Mutex::new(Vec::new()),
            create_pr_calls: Mutex::new(Vec::new()),
            assignee_calls: Mutex::new(Vec::new()),
            reviewer_calls: Mutex::new(Vec::new()),
            error_on_list_branches: Mutex::new(None),
            error_on_find_pr: Mutex::new(None),
            error_on_create_pr: Mutex::new(None),
            duplicate_on_create_pr: Mutex::new(false),
            error_on_notify: Mutex::new(None),
        }
    }

    // === Setup methods ===

    /// Set the repository's branches, in host order
    pub fn set_branches(&self, names: &[&str]) {
        *self.branches.lock().unwrap() = names.iter().map(ToString::to_string).collect();
    }

    /// Paginate with page numbers (REST style) instead of cursors
    pub fn use_page_numbers(&self) {
        *self.use_page_numbers.lock().unwrap() = true;
    }

    /// Report `has_next_page` without a cursor (protocol violation)
    pub fn drop_next_cursor(&self) {
        *self.drop_next_cursor.lock().unwrap() = true;
    }

    /// Set the response for `merge_branch` for a specific base branch
    pub fn set_merge_response(&self, base: &str, response: MergeResponse) {
        self.merge_responses
            .lock()
            .unwrap()
            .insert(base.to_string(), response);
    }

    /// Register an open PR for (head, base)
    pub fn add_open_pr(&self, head: &str, base: &str, number: u64) {
        self.open_prs.lock().unwrap().insert(
            (head.to_string(), base.to_string()),
            PullRequestRef {
                number,
                url: format!("https://github.com/test/repo/pull/{number}"),
            },
        );
    }

    // === Error injection methods ===

    /// Make `list_branches` return an error
    pub fn fail_list_branches(&self, msg: &str) {
        *self.error_on_list_branches.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `find_open_pr` return an error
    pub fn fail_find_pr(&self, msg: &str) {
        *self.error_on_find_pr.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_pr` return an error
    pub fn fail_create_pr(&self, msg: &str) {
        *self.error_on_create_pr.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_pr` report a duplicate, as the host does when the
    /// lookup misses an existing PR
    pub fn duplicate_on_create_pr(&self) {
        *self.duplicate_on_create_pr.lock().unwrap() = true;
    }

    /// Make `add_assignees` and `request_reviewers` return an error
    pub fn fail_notify(&self, msg: &str) {
        *self.error_on_notify.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification methods ===

    /// Get all `list_branches` calls
    pub fn get_list_branches_calls(&self) -> Vec<ListBranchesCall> {
        self.list_branches_calls.lock().unwrap().clone()
    }

    /// Get all `merge_branch` calls
    pub fn get_merge_calls(&self) -> Vec<MergeCall> {
        self.merge_calls.lock().unwrap().clone()
    }

    /// Base branches of all merge calls, in call order
    pub fn merged_bases(&self) -> Vec<String> {
        self.get_merge_calls().into_iter().map(|c| c.base).collect()
    }

    /// Get all `find_open_pr` calls
    pub fn get_find_pr_calls(&self) -> Vec<(String, String)> {
        self.find_pr_calls.lock().unwrap().clone()
    }

    /// Get all `create_pr` calls
    pub fn get_create_pr_calls(&self) -> Vec<CreatePrCall> {
        self.create_pr_calls.lock().unwrap().clone()
    }

    /// Get all `add_assignees` calls
    pub fn get_assignee_calls(&self) -> Vec<NotifyCall> {
        self.assignee_calls.lock().unwrap().clone()
    }

    /// Get all `request_reviewers` calls
    pub fn get_reviewer_calls(&self) -> Vec<NotifyCall> {
        self.reviewer_calls.lock().unwrap().clone()
    }

    /// Assert that `create_pr` was called with specific head and base
    pub fn assert_create_pr_called(&self, head: &str, base: &str) {
        let calls = self.get_create_pr_calls();
        assert!(
            calls.iter().any(|c| c.head == head && c.base == base),
            "Expected create_pr({head}, {base}) but got: {calls:?}"
        );
    }

    /// Assert that no PR was created
    pub fn assert_no_create_pr(&self) {
        let calls = self.get_create_pr_calls();
        assert!(calls.is_empty(), "Expected no create_pr calls but got: {calls:?}");
    }

    /// Count of PRs currently open in the mock
    pub fn open_pr_count(&self) -> usize {
        self.open_prs.lock().unwrap().len()
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn list_branches(
        &self,
        after: Option<&PageCursor>,
        page_size: u32,
    ) -> Result<BranchPage> {
        self.list_branches_calls
            .lock()
            .unwrap()
            .push(ListBranchesCall {
                after: after.cloned(),
                page_size,
            });

        if let Some(msg) = self.error_on_list_branches.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        let size = page_size as usize;
        let start = match after {
            None => 0,
            Some(PageCursor::After(cursor)) => cursor.parse::<usize>().unwrap(),
            Some(PageCursor::Page(page)) => (*page as usize - 1) * size,
        };

        let branches = self.branches.lock().unwrap();
        let end = (start + size).min(branches.len());
        let has_next_page = end < branches.len();

        let next = if !has_next_page || *self.drop_next_cursor.lock().unwrap() {
            None
        } else if *self.use_page_numbers.lock().unwrap() {
            Some(PageCursor::Page(u32::try_from(end / size + 1).unwrap()))
        } else {
            Some(PageCursor::After(end.to_string()))
        };

        Ok(BranchPage {
            branches: branches[start..end].iter().map(Branch::new).collect(),
            has_next_page,
            next,
        })
    }

    async fn merge_branch(
        &self,
        base: &str,
        head: &str,
        commit_message: &str,
    ) -> Result<BranchMergeResult> {
        self.merge_calls.lock().unwrap().push(MergeCall {
            base: base.to_string(),
            head: head.to_string(),
            commit_message: commit_message.to_string(),
        });

        let response = self.merge_responses.lock().unwrap().get(base).cloned();
        match response {
            None => Ok(BranchMergeResult::Merged {
                sha: format!("merged_sha_{base}"),
            }),
            Some(MergeResponse::Merged(sha)) => Ok(BranchMergeResult::Merged { sha }),
            Some(MergeResponse::UpToDate) => Ok(BranchMergeResult::UpToDate),
            Some(MergeResponse::Conflict) => Ok(BranchMergeResult::Conflict),
            Some(MergeResponse::Error(msg)) => Err(Error::GitHubApi(msg)),
        }
    }

    async fn find_open_pr(&self, head: &str, base: &str) -> Result<Option<PullRequestRef>> {
        self.find_pr_calls
            .lock()
            .unwrap()
            .push((head.to_string(), base.to_string()));

        if let Some(msg) = self.error_on_find_pr.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        Ok(self
            .open_prs
            .lock()
            .unwrap()
            .get(&(head.to_string(), base.to_string()))
            .cloned())
    }

    async fn create_pr(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequestRef> {
        self.create_pr_calls.lock().unwrap().push(CreatePrCall {
            head: head.to_string(),
            base: base.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        });

        if let Some(msg) = self.error_on_create_pr.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        let key = (head.to_string(), base.to_string());
        let mut open_prs = self.open_prs.lock().unwrap();
        if *self.duplicate_on_create_pr.lock().unwrap() || open_prs.contains_key(&key) {
            return Err(Error::PullRequestExists {
                head: head.to_string(),
                base: base.to_string(),
            });
        }

        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        let pr = PullRequestRef {
            number,
            url: format!("https://github.com/test/repo/pull/{number}"),
        };
        open_prs.insert(key, pr.clone());
        Ok(pr)
    }

    async fn add_assignees(&self, pr_number: u64, logins: &[String]) -> Result<()> {
        self.assignee_calls.lock().unwrap().push(NotifyCall {
            pr_number,
            logins: logins.to_vec(),
        });
        if let Some(msg) = self.error_on_notify.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }
        Ok(())
    }

    async fn request_reviewers(&self, pr_number: u64, logins: &[String]) -> Result<()> {
        self.reviewer_calls.lock().unwrap().push(NotifyCall {
            pr_number,
            logins: logins.to_vec(),
        });
        if let Some(msg) = self.error_on_notify.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }
        Ok(())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
