//! Target branch resolution
//!
//! Turns a [`TargetSpec`] into the ordered list of branches to merge into.
//! A literal resolves locally; a pattern pages through every branch of the
//! repository and keeps the matches in host order.

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{Branch, TargetSpec};
use regex::Regex;
use tracing::{debug, info};

/// Page size used when listing branches
pub const BRANCH_PAGE_SIZE: u32 = 100;

/// Build a target spec from the two mutually exclusive inputs
///
/// Empty strings count as absent.
pub fn target_spec_from_inputs(
    literal: Option<&str>,
    pattern: Option<&str>,
) -> Result<TargetSpec> {
    let literal = literal.map(str::trim).filter(|s| !s.is_empty());
    let pattern = pattern.filter(|s| !s.trim().is_empty());

    match (literal, pattern) {
        (Some(name), None) => Ok(TargetSpec::Literal(name.to_string())),
        (None, Some(pattern)) => {
            compile_pattern(pattern)?;
            Ok(TargetSpec::Pattern(pattern.to_string()))
        }
        (Some(_), Some(_)) => Err(Error::Config(
            "target_branch and target_branch_pattern are mutually exclusive".to_string(),
        )),
        (None, None) => Err(Error::Config(
            "no target branch: set target_branch or target_branch_pattern".to_string(),
        )),
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex> {
    Ok(Regex::new(pattern)?)
}

/// Fetch every branch in the repository, following pages until the host
/// reports there are no more
pub async fn fetch_all_branches(
    platform: &dyn PlatformService,
    page_size: u32,
) -> Result<Vec<Branch>> {
    let mut branches = Vec::new();
    let mut cursor = None;
    let mut pages = 0_usize;

    loop {
        let page = platform.list_branches(cursor.as_ref(), page_size).await?;
        pages += 1;
        branches.extend(page.branches);

        if !page.has_next_page {
            break;
        }
        cursor = Some(page.next.ok_or_else(|| {
            Error::Platform("host reported another branch page without a cursor".to_string())
        })?);
    }

    debug!(pages, count = branches.len(), "fetched all branches");
    Ok(branches)
}

/// Resolve a target spec to branch names
///
/// Literal targets never touch the platform. An empty result for a pattern
/// means no branch matched and is not an error.
pub async fn resolve_targets(
    spec: &TargetSpec,
    platform: &dyn PlatformService,
) -> Result<Vec<String>> {
    match spec {
        TargetSpec::Literal(name) => Ok(vec![name.clone()]),
        TargetSpec::Pattern(pattern) => {
            let regex = compile_pattern(pattern)?;
            let branches = fetch_all_branches(platform, BRANCH_PAGE_SIZE).await?;
            let total = branches.len();

            let matched: Vec<String> = branches
                .into_iter()
                .filter(|b| regex.is_match(&b.name))
                .map(|b| b.name)
                .collect();

            info!(
                pattern = %pattern,
                total,
                matched = matched.len(),
                "resolved target branches"
            );
            Ok(matched)
        }
    }
}
