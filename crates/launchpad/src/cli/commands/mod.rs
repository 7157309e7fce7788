//! CLI commands

mod changelog;
mod completions;
mod init;
mod release;
mod status;

pub use changelog::ChangelogCommand;
pub use completions::CompletionsCommand;
pub use init::InitCommand;
pub use release::ReleaseCommand;
pub use status::StatusCommand;
