//! Run configuration
//!
//! Raw workflow inputs ([`Inputs`]) are validated into a [`Config`] before
//! any remote call is made.

use crate::error::{Error, Result};
use crate::platform::GitHubServiceOptions;
use crate::resolve::target_spec_from_inputs;
use crate::types::{Actor, BranchListing, NotifyPolicy, TargetSpec};

/// Raw inputs as supplied by the workflow (or command line)
#[derive(Clone, Default)]
pub struct Inputs {
    /// Literal target branch
    pub target_branch: Option<String>,
    /// Regex target
    pub target_branch_pattern: Option<String>,
    /// Merge commit message
    pub message: Option<String>,
    /// API token
    pub github_token: Option<String>,
    /// Open a PR when the merge conflicts (Actions boolean)
    pub create_pull_request: Option<String>,
    /// Assign the actor to fallback PRs (Actions boolean, absent is false)
    pub add_assignee: Option<String>,
    /// Request a review from the actor on fallback PRs (Actions boolean,
    /// absent is false)
    pub add_pr_reviewer: Option<String>,
    /// `owner/name`
    pub repository: Option<String>,
    /// Login of whoever triggered the run
    pub actor: Option<String>,
    /// REST root override
    pub api_url: Option<String>,
    /// GraphQL endpoint override
    pub graphql_url: Option<String>,
    /// Branch listing strategy
    pub branch_listing: BranchListing,
}

/// Validated configuration for one run
#[derive(Clone)]
pub struct Config {
    /// Which branches to merge into
    pub target: TargetSpec,
    /// Merge commit message
    pub commit_message: String,
    /// API token
    pub token: String,
    /// Open a PR when the merge conflicts
    pub create_pull_request: bool,
    /// Post-creation notification for fallback PRs
    pub notify: NotifyPolicy,
    /// Actor to notify (present whenever `notify` is not `None`)
    pub actor: Option<Actor>,
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Endpoint and pagination options
    pub service: GitHubServiceOptions,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("target", &self.target)
            .field("commit_message", &self.commit_message)
            .field("token", &"<redacted>")
            .field("create_pull_request", &self.create_pull_request)
            .field("notify", &self.notify)
            .field("actor", &self.actor)
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("service", &self.service)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse an optional boolean input; empty counts as absent
fn bool_input(name: &str, value: Option<String>) -> Result<Option<bool>> {
    non_empty(value)
        .map(|v| parse_action_bool(&v).map_err(|e| Error::Config(format!("{name}: {e}"))))
        .transpose()
}

impl Config {
    /// Validate raw inputs
    pub fn from_inputs(inputs: Inputs) -> Result<Self> {
        let target = target_spec_from_inputs(
            inputs.target_branch.as_deref(),
            inputs.target_branch_pattern.as_deref(),
        )?;

        let commit_message = non_empty(inputs.message)
            .ok_or_else(|| Error::Config("input required and not supplied: message".to_string()))?;
        let token = non_empty(inputs.github_token).ok_or_else(|| {
            Error::Config("input required and not supplied: github_token".to_string())
        })?;

        let create_pull_request = bool_input("create_pull_request", inputs.create_pull_request)?
            .ok_or_else(|| {
                Error::Config("input required and not supplied: create_pull_request".to_string())
            })?;
        let add_assignee = bool_input("add_assignee", inputs.add_assignee)?.unwrap_or(false);
        let add_pr_reviewer =
            bool_input("add_pr_reviewer", inputs.add_pr_reviewer)?.unwrap_or(false);

        let (owner, repo) = parse_repository(
            non_empty(inputs.repository)
                .as_deref()
                .ok_or_else(|| Error::Config("repository not set (owner/name)".to_string()))?,
        )?;

        let notify = match (add_assignee, add_pr_reviewer) {
            (false, false) => NotifyPolicy::None,
            (true, false) => NotifyPolicy::Assignee,
            (false, true) => NotifyPolicy::Reviewer,
            (true, true) => {
                return Err(Error::Config(
                    "add_assignee and add_pr_reviewer are mutually exclusive".to_string(),
                ));
            }
        };

        let actor = non_empty(inputs.actor).map(|login| Actor {
            login: login.trim().to_string(),
        });
        if notify != NotifyPolicy::None && actor.is_none() {
            return Err(Error::Config(format!(
                "notification policy '{notify}' needs the triggering actor (GITHUB_ACTOR)"
            )));
        }

        Ok(Self {
            target,
            commit_message,
            token,
            create_pull_request,
            notify,
            actor,
            owner,
            repo,
            service: GitHubServiceOptions {
                api_url: non_empty(inputs.api_url),
                graphql_url: non_empty(inputs.graphql_url),
                branch_listing: inputs.branch_listing,
            },
        })
    }
}

/// Split `owner/name`
pub fn parse_repository(value: &str) -> Result<(String, String)> {
    match value.trim().split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(Error::Config(format!(
            "invalid repository '{value}', expected owner/name"
        ))),
    }
}

/// Parse a boolean the way GitHub Actions does
///
/// Only the YAML 1.2 core schema spellings are accepted.
pub fn parse_action_bool(value: &str) -> std::result::Result<bool, String> {
    match value.trim() {
        "true" | "True" | "TRUE" => Ok(true),
        "false" | "False" | "FALSE" => Ok(false),
        other => Err(format!(
            "'{other}' is not a boolean (use true | True | TRUE | false | False | FALSE)"
        )),
    }
}
