//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{
    Branch, BranchListing, BranchMergeResult, BranchPage, PageCursor, PlatformConfig,
    PullRequestRef,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

/// Public GitHub REST API root
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Public GitHub GraphQL endpoint
pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

const BRANCH_REFS_QUERY: &str = r#"
    query BranchRefs($owner: String!, $name: String!, $first: Int!, $after: String) {
        repository(owner: $owner, name: $name) {
            refs(refPrefix: "refs/heads/", first: $first, after: $after) {
                pageInfo {
                    hasNextPage
                    endCursor
                }
                nodes {
                    name
                }
            }
        }
    }
"#;

// GraphQL response types for the branch refs query

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct RefsData {
    repository: Option<RefsRepository>,
}

#[derive(Deserialize)]
struct RefsRepository {
    refs: RefConnection,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefConnection {
    page_info: PageInfo,
    nodes: Vec<RefNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Deserialize)]
struct RefNode {
    name: String,
}

// REST payloads

#[derive(Deserialize)]
struct RestBranch {
    name: String,
}

#[derive(Serialize)]
struct MergePayload<'a> {
    base: &'a str,
    head: &'a str,
    commit_message: &'a str,
}

#[derive(Deserialize)]
struct MergeCommit {
    sha: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Endpoint and pagination options for [`GitHubService`]
#[derive(Debug, Clone, Default)]
pub struct GitHubServiceOptions {
    /// REST API root (defaults to [`DEFAULT_API_URL`])
    pub api_url: Option<String>,
    /// GraphQL endpoint (defaults to [`DEFAULT_GRAPHQL_URL`])
    pub graphql_url: Option<String>,
    /// Branch listing strategy
    pub branch_listing: BranchListing,
}

/// GitHub service using octocrab for PR operations and raw HTTP for the
/// merge, branch listing and GraphQL endpoints
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
    /// Token for raw HTTP requests
    token: String,
    /// HTTP client for raw requests
    http_client: Client,
    /// REST root without trailing slash
    api_url: String,
    graphql_url: String,
    branch_listing: BranchListing,
}

impl GitHubService {
    /// Create a new GitHub service
    pub fn new(
        token: &str,
        owner: String,
        repo: String,
        options: GitHubServiceOptions,
    ) -> Result<Self> {
        let api_url = normalize_url(options.api_url.as_deref().unwrap_or(DEFAULT_API_URL))?;
        let graphql_url =
            normalize_url(options.graphql_url.as_deref().unwrap_or(DEFAULT_GRAPHQL_URL))?;

        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(&api_url)
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent(concat!("merge-branch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config: PlatformConfig { owner, repo },
            token: token.to_string(),
            http_client,
            api_url,
            graphql_url,
            branch_listing: options.branch_listing,
        })
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.api_url, self.config.owner, self.config.repo, path
        )
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    async fn list_branches_graphql(
        &self,
        after: Option<&PageCursor>,
        page_size: u32,
    ) -> Result<BranchPage> {
        let after = match after {
            None => None,
            Some(PageCursor::After(cursor)) => Some(cursor.as_str()),
            Some(PageCursor::Page(_)) => {
                return Err(Error::Platform(
                    "GraphQL branch listing cannot continue from a page number".to_string(),
                ));
            }
        };

        let response: GraphQlResponse<RefsData> = self
            .authorized(self.http_client.post(&self.graphql_url))
            .json(&serde_json::json!({
                "query": BRANCH_REFS_QUERY,
                "variables": {
                    "owner": self.config.owner,
                    "name": self.config.repo,
                    "first": page_size,
                    "after": after,
                }
            }))
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitHubApi(format!("GraphQL request failed: {e}")))?
            .json()
            .await?;

        // Check for GraphQL errors
        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
            return Err(Error::GitHubApi(format!(
                "GraphQL error: {}",
                messages.join(", ")
            )));
        }

        let refs = response
            .data
            .ok_or_else(|| Error::GitHubApi("No data in GraphQL response".to_string()))?
            .repository
            .ok_or_else(|| {
                Error::GitHubApi(format!(
                    "repository {}/{} not found",
                    self.config.owner, self.config.repo
                ))
            })?
            .refs;

        let has_next_page = refs.page_info.has_next_page;
        Ok(BranchPage {
            branches: refs.nodes.into_iter().map(|n| Branch::new(n.name)).collect(),
            has_next_page,
            next: if has_next_page {
                refs.page_info.end_cursor.map(PageCursor::After)
            } else {
                None
            },
        })
    }

    async fn list_branches_rest(
        &self,
        after: Option<&PageCursor>,
        page_size: u32,
    ) -> Result<BranchPage> {
        let page = match after {
            None => 1,
            Some(PageCursor::Page(page)) => *page,
            Some(PageCursor::After(_)) => {
                return Err(Error::Platform(
                    "REST branch listing cannot continue from a GraphQL cursor".to_string(),
                ));
            }
        };

        let response = self
            .authorized(self.http_client.get(self.repo_url("/branches")))
            .query(&[("per_page", page_size), ("page", page)])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitHubApi(format!("Failed to list branches: {e}")))?;

        let has_next_page = has_next_link(
            response
                .headers()
                .get(reqwest::header::LINK)
                .and_then(|v| v.to_str().ok()),
        );
        let branches: Vec<RestBranch> = response.json().await?;

        Ok(BranchPage {
            branches: branches.into_iter().map(|b| Branch::new(b.name)).collect(),
            has_next_page,
            next: has_next_page.then(|| PageCursor::Page(page + 1)),
        })
    }
}

/// Validate an endpoint URL and strip its trailing slash
fn normalize_url(raw: &str) -> Result<String> {
    let url = Url::parse(raw).map_err(|e| Error::Config(format!("invalid URL '{raw}': {e}")))?;
    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Whether a `Link` header advertises a `rel="next"` page
fn has_next_link(link: Option<&str>) -> bool {
    link.is_some_and(|header| {
        header.split(',').any(|entry| {
            entry
                .split(';')
                .skip(1)
                .any(|param| param.trim() == r#"rel="next""#)
        })
    })
}

/// Whether a host error describes a duplicate pull request
fn is_duplicate_pr_error(error: &octocrab::Error) -> bool {
    let octocrab::Error::GitHub { source, .. } = error else {
        return false;
    };
    mentions_already_exists(&source.message)
        || source
            .errors
            .iter()
            .flatten()
            .any(|detail| mentions_already_exists(&detail.to_string()))
}

fn mentions_already_exists(message: &str) -> bool {
    message.to_ascii_lowercase().contains("already exists")
}

/// Helper to convert octocrab PR to our `PullRequestRef` type
fn pr_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> PullRequestRef {
    PullRequestRef {
        number: pr.number,
        url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn list_branches(
        &self,
        after: Option<&PageCursor>,
        page_size: u32,
    ) -> Result<BranchPage> {
        debug!(listing = %self.branch_listing, ?after, page_size, "listing branches");
        let page = match self.branch_listing {
            BranchListing::GraphQl => self.list_branches_graphql(after, page_size).await?,
            BranchListing::Rest => self.list_branches_rest(after, page_size).await?,
        };
        debug!(
            count = page.branches.len(),
            has_next_page = page.has_next_page,
            "listed branches"
        );
        Ok(page)
    }

    async fn merge_branch(
        &self,
        base: &str,
        head: &str,
        commit_message: &str,
    ) -> Result<BranchMergeResult> {
        debug!(base, head, "merging branch");
        let response = self
            .authorized(self.http_client.post(self.repo_url("/merges")))
            .json(&MergePayload {
                base,
                head,
                commit_message,
            })
            .send()
            .await?;

        let status = response.status();
        let result = match status {
            StatusCode::CONFLICT => BranchMergeResult::Conflict,
            StatusCode::NO_CONTENT => BranchMergeResult::UpToDate,
            s if s.is_success() => {
                let commit: MergeCommit = response.json().await?;
                BranchMergeResult::Merged { sha: commit.sha }
            }
            _ => {
                let text = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiErrorBody>(&text)
                    .map(|body| body.message)
                    .unwrap_or(text);
                return Err(Error::GitHubApi(format!("{message} ({status})")));
            }
        };

        debug!(base, head, ?result, "merge complete");
        Ok(result)
    }

    async fn find_open_pr(&self, head: &str, base: &str) -> Result<Option<PullRequestRef>> {
        debug!(head, base, "finding existing PR");
        let prs = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list()
            .head(format!("{}:{}", &self.config.owner, head))
            .base(base)
            .state(octocrab::params::State::Open)
            .send()
            .await?;

        let result = prs.items.first().map(pr_from_octocrab);
        if let Some(ref pr) = result {
            debug!(pr_number = pr.number, "found existing PR");
        } else {
            debug!("no existing PR found");
        }
        Ok(result)
    }

    async fn create_pr(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequestRef> {
        debug!(head, base, "creating PR");
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .create(title, head, base)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if is_duplicate_pr_error(&e) {
                    Error::PullRequestExists {
                        head: head.to_string(),
                        base: base.to_string(),
                    }
                } else {
                    e.into()
                }
            })?;

        let result = pr_from_octocrab(&pr);
        debug!(pr_number = result.number, "created PR");
        Ok(result)
    }

    async fn add_assignees(&self, pr_number: u64, logins: &[String]) -> Result<()> {
        debug!(pr_number, ?logins, "adding assignees");
        let logins: Vec<&str> = logins.iter().map(String::as_str).collect();
        self.client
            .issues(&self.config.owner, &self.config.repo)
            .add_assignees(pr_number, &logins)
            .await?;
        debug!(pr_number, "added assignees");
        Ok(())
    }

    async fn request_reviewers(&self, pr_number: u64, logins: &[String]) -> Result<()> {
        debug!(pr_number, ?logins, "requesting reviewers");
        self.client
            .pulls(&self.config.owner, &self.config.repo)
            .request_reviews(pr_number, logins.to_vec(), Vec::<String>::new())
            .await?;
        debug!(pr_number, "requested reviewers");
        Ok(())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
