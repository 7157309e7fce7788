//! Launchpad Git - Git inspection and operations for release automation
//!
//! Read-only inspection (status, branch, tags, history, remotes) goes through
//! libgit2. Mutations (commit, tag, push) shell out to the `git` executable so
//! hooks, signing and credentials behave exactly as they do for the operator.

mod cli;
mod commits;
mod remote;
mod repository;
mod status;
mod tags;
pub mod types;

pub use cli::{CommitOutcome, GitCli};
pub use remote::parse_repo_id;
pub use repository::{GitRepo, Result};
pub use types::{CommitRecord, TagInfo};
