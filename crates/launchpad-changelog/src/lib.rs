//! Launchpad Changelog - changelog derivation from commit history
//!
//! Commit subjects since the previous release are filtered for noise,
//! rewritten with author and pull-request links, and rendered as a dated
//! Markdown section that is prepended to the changelog file.

pub mod filter;
mod generator;
pub mod links;
pub mod translate;
pub mod types;
mod writer;

pub use filter::filter_logs;
pub use generator::{derive_changelog, ChangelogGenerator};
pub use translate::{translate_changelog, GeminiTranslator, Translator};
pub use types::ChangelogSection;
pub use writer::prepend_changelog;
