//! Shared command context
//!
//! Validates configuration, reads the trigger payload and builds the
//! platform service, in that order, so a bad input never reaches the API.

use merge_branch::config::{Config, Inputs};
use merge_branch::error::{Error, Result};
use merge_branch::event::TriggerPayload;
use merge_branch::platform::{GitHubService, PlatformService};
use std::path::Path;

/// Everything a run needs before it touches the remote
pub struct CommandContext {
    /// Validated configuration
    pub config: Config,
    /// Branch that was pushed
    pub source_branch: String,
    /// Platform service (GitHub)
    pub platform: Box<dyn PlatformService>,
}

impl CommandContext {
    /// Create a new command context
    pub fn new(inputs: Inputs, event_path: Option<&Path>) -> Result<Self> {
        let config = Config::from_inputs(inputs)?;

        let event_path = event_path.ok_or_else(|| {
            Error::Precondition("event payload path not set (GITHUB_EVENT_PATH)".to_string())
        })?;
        let source_branch = TriggerPayload::load(event_path)?.source_branch()?;

        let platform = GitHubService::new(
            &config.token,
            config.owner.clone(),
            config.repo.clone(),
            config.service.clone(),
        )?;

        Ok(Self {
            config,
            source_branch,
            platform: Box::new(platform),
        })
    }
}
