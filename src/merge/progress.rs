//! Progress reporting for merge execution

use crate::types::MergeOutcome;
use async_trait::async_trait;

/// Receives human-readable progress while targets are processed
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// A free-form status line
    async fn on_message(&self, message: &str);

    /// A target reached its terminal state
    async fn on_outcome(&self, target: &str, outcome: &MergeOutcome);
}

/// Progress callback that discards everything
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_message(&self, _message: &str) {}

    async fn on_outcome(&self, _target: &str, _outcome: &MergeOutcome) {}
}
