//! Launchpad npm - package.json, package managers and manifest sync
//!
//! This crate wraps the npm-family side of a release: reading and rewriting
//! `package.json`, running scripts and publishes through the configured
//! clients, detecting pnpm workspaces, and keeping dependent manifests in
//! step with a new version.

pub mod client;
pub mod manifest;
pub mod sync;
pub mod workspace;

pub use client::PackageManager;
pub use manifest::PackageJson;
pub use sync::SyncPlan;
pub use workspace::is_monorepo;
