//! Launchpad Core - Core library for package release automation
//!
//! This crate provides the foundational types, error handling, configuration,
//! and command execution shared by the Launchpad release pipeline.

pub mod config;
pub mod error;
pub mod process;
pub mod types;

pub use config::ReleaseConfig;
pub use error::{LaunchpadError, Result};
pub use process::{CommandOutput, CommandRunner, CommandSpec, SystemRunner};
pub use types::{BumpMode, GitTagStyle, NpmClient, PublishClient, ReleaseType};
