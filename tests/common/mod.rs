//! Shared test helpers

#![allow(dead_code)]

mod mock_platform;

#[allow(unused_imports)]
pub use mock_platform::{
    CreatePrCall, ListBranchesCall, MergeCall, MergeResponse, MockPlatformService, NotifyCall,
};

use merge_branch::merge::{MergePlan, MergePlanOptions, create_merge_plan};
use merge_branch::types::{Actor, NotifyPolicy, PlatformConfig};

/// Repository coordinates used by every mock
pub fn github_config() -> PlatformConfig {
    PlatformConfig {
        owner: "test".to_string(),
        repo: "repo".to_string(),
    }
}

/// The actor used in notification tests
pub fn octocat() -> Actor {
    Actor {
        login: "octocat".to_string(),
    }
}

/// Plan merging `source` into `targets` with the given policies
pub fn make_plan(
    source: &str,
    targets: &[&str],
    create_pull_request: bool,
    notify: NotifyPolicy,
) -> MergePlan {
    let targets: Vec<String> = targets.iter().map(ToString::to_string).collect();
    create_merge_plan(
        source,
        &targets,
        "Automatic merge",
        &MergePlanOptions {
            create_pull_request,
            notify,
            actor: (notify != NotifyPolicy::None).then(octocat),
        },
    )
}
