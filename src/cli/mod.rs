//! Command-line front end

pub mod actions;
mod context;
mod run;
mod style;

pub use run::{RunOptions, run};

use crate::cli::style::{Stylize, check, cross};
use anstream::println;
use async_trait::async_trait;
use merge_branch::merge::ProgressCallback;
use merge_branch::types::MergeOutcome;

/// Progress callback that prints to stdout
pub struct CliProgress;

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_message(&self, message: &str) {
        println!("{message}");
    }

    async fn on_outcome(&self, target: &str, outcome: &MergeOutcome) {
        let mark = if outcome.is_success() { check() } else { cross() };
        let detail = outcome.to_string();
        let detail = if outcome.is_success() {
            detail.muted()
        } else {
            detail.error()
        };
        println!("{mark} {} {detail}", target.accent());
    }
}
