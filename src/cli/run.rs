//! The merge run: resolve, plan, execute, report

use crate::cli::CliProgress;
use crate::cli::actions;
use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check};
use anstream::println;
use anyhow::{Context, bail};
use merge_branch::config::Inputs;
use merge_branch::merge::{
    MergeExecutionResult, MergePlan, MergePlanOptions, create_merge_plan, execute_merge,
};
use merge_branch::resolve::resolve_targets;
use merge_branch::types::TargetSpec;
use std::path::Path;
use tracing::debug;

/// Options for a run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Resolve and print the plan without merging
    pub dry_run: bool,
}

/// Run the merge
///
/// Fails if configuration or the trigger payload is invalid, if targets
/// cannot be resolved, or if any target ends in failure. Every target is
/// attempted before failures are reported.
pub async fn run(
    inputs: Inputs,
    event_path: Option<&Path>,
    options: RunOptions,
) -> anyhow::Result<()> {
    let ctx = CommandContext::new(inputs, event_path)?;
    let config = &ctx.config;

    println!("Source branch: {}", ctx.source_branch.accent());
    match &config.target {
        TargetSpec::Literal(name) => println!("Target branch: {}", name.accent()),
        TargetSpec::Pattern(pattern) => {
            println!("Target branch regex pattern: {}", pattern.accent());
        }
    }

    let repo = ctx.platform.config();
    debug!(owner = %repo.owner, repo = %repo.repo, target = %config.target, "resolving targets");
    let targets = resolve_targets(&config.target, ctx.platform.as_ref())
        .await
        .context("failed to resolve target branches")?;

    if targets.is_empty() {
        println!("{}", "No matching branches".muted());
        return Ok(());
    }

    let plan = create_merge_plan(
        &ctx.source_branch,
        &targets,
        &config.commit_message,
        &MergePlanOptions {
            create_pull_request: config.create_pull_request,
            notify: config.notify,
            actor: config.actor.clone(),
        },
    );

    if options.dry_run {
        report_dry_run(&plan);
        return Ok(());
    }

    let result = execute_merge(&plan, ctx.platform.as_ref(), &CliProgress).await;
    print_summary(&result);

    let failed = result.failed_targets();
    if !failed.is_empty() {
        let details: Vec<String> = failed
            .iter()
            .map(|o| format!("{}: {}", o.target, o.outcome))
            .collect();
        bail!(
            "{} of {} target(s) failed: {}",
            failed.len(),
            result.outcomes.len(),
            details.join("; ")
        );
    }

    Ok(())
}

fn report_dry_run(plan: &MergePlan) {
    println!("{}:", "Merge plan".emphasis());
    for target in plan.targets() {
        println!("  {} <- {}", target.accent(), plan.source_branch);
    }
    println!("  on conflict: {}", plan.on_conflict);
    println!("{}", "Run without --dry-run to execute.".muted());
}

fn print_summary(result: &MergeExecutionResult) {
    println!();
    let merged = result.merged_targets();
    let prs = result.pull_requests();

    if result.is_success() {
        println!("{} Merge complete", check());
    } else {
        println!("{}", "Merge partially complete".warn());
    }
    if !merged.is_empty() {
        println!("   Merged: {}", merged.join(", ").accent());
    }
    for pr in &prs {
        actions::notice(&format!("Pull request #{} needs manual merge: {}", pr.number, pr.url));
    }
}
