//! merge-branch - propagate a pushed branch into target branches
//!
//! Resolves target branches (a literal name or a regex over every branch in
//! the repository), merges the pushed branch into each one through the
//! GitHub API, and opens a pull request when a merge conflicts.

pub mod config;
pub mod error;
pub mod event;
pub mod merge;
pub mod platform;
pub mod resolve;
pub mod types;
