//! Trigger payload handling
//!
//! The push event that started the run carries the source branch as a full
//! ref (`refs/heads/<branch>`).

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

const BRANCH_REF_PREFIX: &str = "refs/heads/";

/// The subset of a webhook payload this tool reads
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TriggerPayload {
    /// Full ref that was pushed
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
}

impl TriggerPayload {
    /// Parse a payload from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read the payload file the workflow runner provides
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Precondition(format!(
                "failed to read event payload {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&content).map_err(|e| {
            Error::Precondition(format!(
                "failed to parse event payload {}: {e}",
                path.display()
            ))
        })
    }

    /// Name of the pushed branch
    pub fn source_branch(&self) -> Result<String> {
        let git_ref = self.git_ref.as_deref().ok_or_else(|| {
            Error::Precondition(
                "Invalid payload. Could not find the branch information.".to_string(),
            )
        })?;
        source_branch_from_ref(git_ref)
    }
}

/// Strip `refs/heads/` from a pushed ref
pub fn source_branch_from_ref(git_ref: &str) -> Result<String> {
    match git_ref.strip_prefix(BRANCH_REF_PREFIX) {
        Some(branch) if !branch.is_empty() => Ok(branch.to_string()),
        _ => Err(Error::Precondition(format!(
            "Invalid payload. '{git_ref}' is not a branch ref."
        ))),
    }
}
