//! merge-branch - merge the pushed branch into target branches
//!
//! Runs as a GitHub Actions step: inputs arrive as `INPUT_*` environment
//! variables and repository/actor/event details as `GITHUB_*` variables.
//! Every option can also be passed as a flag.

mod cli;

use clap::{Parser, ValueEnum};
use merge_branch::config::Inputs;
use merge_branch::types::BranchListing;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    /// Human-readable lines
    Text,
    /// Newline-delimited JSON
    Json,
}

#[derive(Parser)]
#[command(name = "merge-branch")]
#[command(version)]
#[command(about = "Merge the pushed branch into target branches, opening a pull request on conflict")]
struct Cli {
    /// Branch to merge into
    #[arg(long, env = "INPUT_TARGET_BRANCH")]
    target_branch: Option<String>,

    /// Regex selecting every branch to merge into
    #[arg(long, env = "INPUT_TARGET_BRANCH_PATTERN")]
    target_branch_pattern: Option<String>,

    /// Merge commit message
    #[arg(long, env = "INPUT_MESSAGE")]
    message: Option<String>,

    /// Token used for API calls
    #[arg(long, env = "INPUT_GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// Open a pull request when the merge conflicts (true or false)
    #[arg(long, env = "INPUT_CREATE_PULL_REQUEST")]
    create_pull_request: Option<String>,

    /// Assign the triggering actor to conflict pull requests (true or false)
    #[arg(long, env = "INPUT_ADD_ASSIGNEE")]
    add_assignee: Option<String>,

    /// Request a review from the triggering actor on conflict pull requests (true or false)
    #[arg(long, env = "INPUT_ADD_PR_REVIEWER")]
    add_pr_reviewer: Option<String>,

    /// Branch listing strategy for pattern targets (graphql or rest)
    #[arg(long, env = "INPUT_BRANCH_LISTING", value_parser = parse_branch_listing, default_value = "graphql")]
    branch_listing: BranchListing,

    /// Repository as owner/name
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Option<String>,

    /// Login of whoever triggered the run
    #[arg(long, env = "GITHUB_ACTOR")]
    actor: Option<String>,

    /// Path to the triggering event payload
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: Option<PathBuf>,

    /// REST API root
    #[arg(long, env = "GITHUB_API_URL")]
    api_url: Option<String>,

    /// GraphQL endpoint
    #[arg(long, env = "GITHUB_GRAPHQL_URL")]
    graphql_url: Option<String>,

    /// Resolve targets and show the plan without merging
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

impl Cli {
    fn inputs(&self) -> Inputs {
        Inputs {
            target_branch: self.target_branch.clone(),
            target_branch_pattern: self.target_branch_pattern.clone(),
            message: self.message.clone(),
            github_token: self.github_token.clone(),
            create_pull_request: self.create_pull_request.clone(),
            add_assignee: self.add_assignee.clone(),
            add_pr_reviewer: self.add_pr_reviewer.clone(),
            repository: self.repository.clone(),
            actor: self.actor.clone(),
            api_url: self.api_url.clone(),
            graphql_url: self.graphql_url.clone(),
            branch_listing: self.branch_listing,
        }
    }
}

fn parse_branch_listing(value: &str) -> Result<BranchListing, String> {
    value.parse()
}

/// Install the global subscriber, respecting `RUST_LOG`
fn init_tracing(verbose: bool, format: LogFormat) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr).json())
            .try_init()
            .ok(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init()
            .ok(),
    };
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_format);

    let options = cli::RunOptions {
        dry_run: cli.dry_run,
    };

    match cli::run(cli.inputs(), cli.event_path.as_deref(), options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            cli::actions::set_failed(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
