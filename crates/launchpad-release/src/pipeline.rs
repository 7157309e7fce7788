//! Release pipeline orchestration
//!
//! The pipeline runs [`Stage::all`] in order. `Init` and `GuardChecks` only
//! read; every later stage may mutate the package, the registry or the
//! repository, and a failure there stops the run without undoing earlier
//! stages. In a dry run every mutation is logged and recorded as rehearsed
//! while all inspection, validation and guards still run.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, error, info, instrument, warn};

use launchpad_changelog::{derive_changelog, prepend_changelog, translate_changelog};
use launchpad_changelog::{GeminiTranslator, Translator};
use launchpad_core::config::{validate_config, ReleaseConfig};
use launchpad_core::error::{
    CommandError, ConfigError, GitError, LaunchpadError, Result, VersionError, WorkflowError,
};
use launchpad_core::process::CommandRunner;
use launchpad_core::types::{resolve_dist_tag, BumpMode, ReleaseType};
use launchpad_git::{CommitOutcome, GitCli, GitRepo};
use launchpad_npm::sync::{sync_deps, sync_versions, write_satellite_version};
use launchpad_npm::{PackageJson, PackageManager, SyncPlan};

use crate::context::{PipelineEnv, RepoContext};
use crate::github::{create_release, ReleaseNotes, GH};
use crate::guards::{check_access, check_git_status, check_ownership};
use crate::report::{ReleaseReport, StageOutcome};
use crate::reporter::{NoopReporter, ReleaseReporter, VersionPrompt};
use crate::stage::Stage;

/// Everything the stages share, built by `Init`
struct ReleaseState {
    git: GitRepo,
    manifest: PackageJson,
    name: String,
    repo: RepoContext,
    bump: BumpMode,
    plan: SyncPlan,
    previous_version: semver::Version,
    version: String,
    dist_tag: String,
    tag: Option<String>,
    changelog: Option<String>,
    report: ReleaseReport,
}

impl ReleaseState {
    fn set_version(&mut self, version: String, config: &ReleaseConfig) {
        self.dist_tag = resolve_dist_tag(config.dist_tag.as_deref(), &version);
        self.tag = config.git_tag.tag_name(&self.name, &version);
        self.version = version;
    }

    fn bumped(&self) -> bool {
        self.version != self.previous_version.to_string()
    }

    fn branch(&self) -> Result<&str> {
        self.repo.branch.as_deref().ok_or_else(|| GitError::NoBranch.into())
    }

    fn repo_id(&self) -> Result<&str> {
        self.repo.repo_id.as_deref().ok_or_else(|| {
            LaunchpadError::other("repository identifier is unknown; cannot build links")
        })
    }

    fn into_report(self) -> ReleaseReport {
        ReleaseReport {
            package: self.name,
            previous_version: self.previous_version.to_string(),
            version: self.version,
            dist_tag: self.dist_tag,
            tag: self.tag,
            changelog: self.changelog,
            ..self.report
        }
    }
}

/// Runs one release
pub struct ReleasePipeline<'a> {
    config: &'a ReleaseConfig,
    env: &'a PipelineEnv,
    runner: &'a dyn CommandRunner,
    reporter: &'a dyn ReleaseReporter,
    prompt: Option<&'a dyn VersionPrompt>,
    translator: Option<&'a dyn Translator>,
}

impl<'a> ReleasePipeline<'a> {
    /// Create a new release pipeline
    pub fn new(
        config: &'a ReleaseConfig,
        env: &'a PipelineEnv,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        Self {
            config,
            env,
            runner,
            reporter: &NoopReporter,
            prompt: None,
            translator: None,
        }
    }

    /// Report stage progress
    pub fn with_reporter(mut self, reporter: &'a dyn ReleaseReporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Answer `prompt` bumps
    pub fn with_prompt(mut self, prompt: &'a dyn VersionPrompt) -> Self {
        self.prompt = Some(prompt);
        self
    }

    /// Translate the changelog with this translator instead of the API
    pub fn with_translator(mut self, translator: &'a dyn Translator) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Check if this is a dry run
    pub fn is_dry_run(&self) -> bool {
        self.config.dry_run
    }

    /// Execute the release
    #[instrument(skip(self), fields(cwd = %self.env.cwd.display(), dry_run = self.is_dry_run()))]
    pub fn run(&self) -> Result<ReleaseReport> {
        let start = Instant::now();
        info!(dry_run = self.is_dry_run(), "executing release pipeline");

        self.reporter.stage_started(Stage::Init);
        let mut state = self.init().map_err(|e| self.fail(Stage::Init, e))?;
        let outcome = StageOutcome::Completed(format!("{}@{}", state.name, state.previous_version));
        self.reporter.stage_finished(Stage::Init, &outcome);
        state.report.record(Stage::Init, outcome);

        for &stage in &Stage::all()[1..] {
            self.reporter.stage_started(stage);
            let outcome = self
                .execute(stage, &mut state)
                .map_err(|e| self.fail(stage, e))?;
            debug!(stage = %stage, outcome = ?outcome, "stage finished");
            self.reporter.stage_finished(stage, &outcome);
            state.report.record(stage, outcome);
        }

        info!(
            package = %state.name,
            version = %state.version,
            dry_run = self.is_dry_run(),
            duration_ms = start.elapsed().as_millis(),
            "release pipeline complete"
        );
        Ok(state.into_report())
    }

    fn fail(&self, stage: Stage, err: LaunchpadError) -> LaunchpadError {
        self.reporter.stage_failed(stage, &err);
        error!(stage = %stage, error = %err, "release stage failed");
        WorkflowError::StageFailed {
            stage: stage.to_string(),
            source: Box::new(err),
        }
        .into()
    }

    fn execute(&self, stage: Stage, state: &mut ReleaseState) -> Result<StageOutcome> {
        match stage {
            Stage::Init => Ok(StageOutcome::Completed(String::new())),
            Stage::GuardChecks => self.guard_checks(state),
            Stage::Build => self.build(state),
            Stage::VersionBump => self.version_bump(state),
            Stage::Publish => self.publish(state),
            Stage::SyncDeps => self.sync_deps(state),
            Stage::SyncVersions => self.sync_versions(state),
            Stage::SyncPublishes => self.sync_publishes(state),
            Stage::Changelog => self.changelog(state),
            Stage::GitFinalize => self.git_finalize(state),
            Stage::GithubRelease => self.github_release(state),
        }
    }

    fn cwd(&self) -> &Path {
        &self.env.cwd
    }

    fn package_manager(&self) -> PackageManager<'a> {
        PackageManager::new(self.runner, &self.env.cwd)
            .with_npm_client(self.config.npm_client)
            .with_publish_client(self.config.publish_client)
    }

    fn rehearse(&self, stage: Stage, action: String) -> StageOutcome {
        info!(stage = %stage, action = %action, "dry run, skipping");
        StageOutcome::Rehearsed(action)
    }

    fn init(&self) -> Result<ReleaseState> {
        let config = self.config;
        validate_config(config)?;
        let bump = config.bump_mode()?;
        if bump == BumpMode::Prompt && self.prompt.is_none() {
            return Err(ConfigError::InvalidValue {
                field: "bump".to_string(),
                message: "prompt needs an interactive terminal".to_string(),
            }
            .into());
        }

        let manifest = PackageJson::load_dir(self.cwd())?;
        let name = manifest.require_name()?.to_string();
        let previous_version = manifest.semver()?;

        let git = GitRepo::discover(self.cwd())?;
        let repo = RepoContext::inspect(&git, self.cwd(), &name, config.git_tag, &config.remote)?;
        if repo.branch.is_none() {
            return Err(GitError::NoBranch.into());
        }

        let needs_links = config.github_release || (config.changelog && repo.latest_tag.is_some());
        if needs_links && repo.repo_id.is_none() {
            return Err(ConfigError::InvalidValue {
                field: "remote".to_string(),
                message: format!(
                    "cannot derive owner/name from remote '{}', needed for changelog and release links",
                    config.remote
                ),
            }
            .into());
        }

        let plan = SyncPlan::prepare(self.cwd(), config, &name)?;

        if config.github_release && !self.runner.is_available(GH) {
            return Err(CommandError::ToolMissing(GH.to_string()).into());
        }

        let mut state = ReleaseState {
            git,
            manifest,
            name,
            repo,
            bump,
            plan,
            previous_version: previous_version.clone(),
            version: String::new(),
            dist_tag: String::new(),
            tag: None,
            changelog: None,
            report: ReleaseReport {
                dry_run: config.dry_run,
                ..Default::default()
            },
        };
        state.set_version(previous_version.to_string(), config);

        info!(
            package = %state.name,
            version = %state.previous_version,
            bump = %state.bump,
            "release initialized"
        );
        Ok(state)
    }

    fn guard_checks(&self, state: &mut ReleaseState) -> Result<StageOutcome> {
        let mut passed = Vec::new();

        if self.config.check_git_status {
            check_git_status(&state.git)?;
            passed.push("git-status");
        }

        check_access(&state.manifest, self.config.publish_client)?;
        passed.push("access");

        if self.config.check_ownership {
            check_ownership(&self.package_manager(), &state.name)?;
            passed.push("ownership");
        }

        Ok(StageOutcome::Completed(format!("passed: {}", passed.join(", "))))
    }

    fn build(&self, state: &mut ReleaseState) -> Result<StageOutcome> {
        if !self.config.build {
            return Ok(StageOutcome::Skipped("build disabled".to_string()));
        }
        if !state.manifest.has_script("build") {
            return Ok(StageOutcome::Skipped("no build script found".to_string()));
        }

        let mut scripts = vec!["build"];
        if state.manifest.has_script("doctor") {
            scripts.push("doctor");
        }

        if self.is_dry_run() {
            return Ok(self.rehearse(
                Stage::Build,
                format!("{} run {}", self.config.npm_client, scripts.join(", ")),
            ));
        }

        let pm = self.package_manager();
        for script in &scripts {
            pm.run_script(script)?;
        }
        Ok(StageOutcome::Completed(format!("ran {}", scripts.join(", "))))
    }

    fn version_bump(&self, state: &mut ReleaseState) -> Result<StageOutcome> {
        let current = state.previous_version.clone();

        match state.bump {
            BumpMode::Skip => Ok(StageOutcome::Skipped(format!("keeping {}", current))),
            BumpMode::Release(release_type) => self.bump_release(state, &current, release_type),
            BumpMode::Prompt => {
                let prompt = self.prompt.ok_or(WorkflowError::Cancelled)?;
                let answer = prompt.ask_version(&current)?;
                let answer = answer.trim();
                let next = semver::Version::parse(answer)
                    .map_err(|e| VersionError::ParseFailed(answer.to_string(), e.to_string()))?;
                ensure_increased(&current, &next)?;

                state.set_version(next.to_string(), self.config);
                if self.is_dry_run() {
                    return Ok(self.rehearse(
                        Stage::VersionBump,
                        format!("write version {} -> {}", current, next),
                    ));
                }

                state.manifest.set_version(&state.version);
                state.manifest.save()?;
                state.manifest = PackageJson::load_dir(self.cwd())?;
                Ok(StageOutcome::Completed(format!("{} -> {}", current, next)))
            }
        }
    }

    fn bump_release(
        &self,
        state: &mut ReleaseState,
        current: &semver::Version,
        release_type: ReleaseType,
    ) -> Result<StageOutcome> {
        if self.is_dry_run() {
            let planned = release_type.apply(current);
            state.set_version(planned.to_string(), self.config);
            return Ok(self.rehearse(
                Stage::VersionBump,
                format!(
                    "npm version {} --no-git-tag-version ({} -> {})",
                    release_type, current, planned
                ),
            ));
        }

        self.package_manager().version(release_type)?;

        // The package manager is the writer; read back what it wrote
        state.manifest = PackageJson::load_dir(self.cwd())?;
        let next = state.manifest.semver()?;
        ensure_increased(current, &next)?;
        state.set_version(next.to_string(), self.config);

        info!(from = %current, to = %next, "bumped version");
        Ok(StageOutcome::Completed(format!("{} -> {}", current, next)))
    }

    fn publish(&self, state: &mut ReleaseState) -> Result<StageOutcome> {
        let action = format!(
            "{} publish --tag {} ({}@{})",
            self.config.publish_client, state.dist_tag, state.name, state.version
        );
        if self.is_dry_run() {
            return Ok(self.rehearse(Stage::Publish, action));
        }

        self.package_manager().publish(self.cwd(), &state.dist_tag)?;
        Ok(StageOutcome::Completed(action))
    }

    fn sync_deps(&self, state: &mut ReleaseState) -> Result<StageOutcome> {
        let targets = &state.plan.deps;
        if targets.is_empty() {
            return Ok(StageOutcome::Skipped("no sync_deps targets".to_string()));
        }

        let action = format!("rewrite {} in {} manifest(s)", state.name, targets.len());
        if self.is_dry_run() {
            return Ok(self.rehearse(Stage::SyncDeps, action));
        }

        sync_deps(targets, &state.name, &state.version)?;
        Ok(StageOutcome::Completed(action))
    }

    fn sync_versions(&self, state: &mut ReleaseState) -> Result<StageOutcome> {
        let targets = &state.plan.versions;
        if targets.is_empty() {
            return Ok(StageOutcome::Skipped("no sync_versions targets".to_string()));
        }

        let action = format!("set version {} in {} manifest(s)", state.version, targets.len());
        if self.is_dry_run() {
            return Ok(self.rehearse(Stage::SyncVersions, action));
        }

        sync_versions(targets, &state.version)?;
        Ok(StageOutcome::Completed(action))
    }

    fn sync_publishes(&self, state: &mut ReleaseState) -> Result<StageOutcome> {
        let satellites = &state.plan.satellites;
        if satellites.is_empty() {
            return Ok(StageOutcome::Skipped("no sync_publishes targets".to_string()));
        }

        let action = format!(
            "publish {} satellite package(s) at {} --tag {}",
            satellites.len(),
            state.version,
            state.dist_tag
        );
        if self.is_dry_run() {
            return Ok(self.rehearse(Stage::SyncPublishes, action));
        }

        let pm = self.package_manager();
        for dir in satellites {
            write_satellite_version(dir, &state.version)?;
            pm.publish(dir, &state.dist_tag)?;
        }
        Ok(StageOutcome::Completed(action))
    }

    fn changelog(&self, state: &mut ReleaseState) -> Result<StageOutcome> {
        if !self.config.changelog {
            return Ok(StageOutcome::Skipped("changelog disabled".to_string()));
        }
        let Some(since) = state.repo.latest_tag.clone() else {
            warn!("no previous release tag, skipping changelog");
            return Ok(StageOutcome::Skipped("no previous release tag".to_string()));
        };

        let block = derive_changelog(&state.git, &since, &state.version, state.repo_id()?)?;
        state.changelog = Some(block.clone());

        let path = self.cwd().join(&self.config.changelog_file);
        if self.is_dry_run() {
            return Ok(self.rehearse(
                Stage::Changelog,
                format!("prepend {} since {} to {}", state.version, since, path.display()),
            ));
        }

        prepend_changelog(&path, &block)?;
        let mut detail = format!("prepended {} since {}", state.version, since);
        if let Some(note) = self.translate(&block) {
            detail.push_str("; ");
            detail.push_str(&note);
        }
        Ok(StageOutcome::Completed(detail))
    }

    /// Translate the new block. Failures are reported, never raised.
    fn translate(&self, block: &str) -> Option<String> {
        let path = self.cwd().join(&self.config.translated_changelog_file);

        let owned;
        let translator: &dyn Translator = match (self.translator, &self.env.translation_key) {
            (Some(translator), _) => translator,
            (None, Some(key)) => match GeminiTranslator::new(key.clone()) {
                Ok(t) => {
                    owned = t;
                    &owned
                }
                Err(e) => {
                    warn!(error = %e, "translation client unavailable");
                    return Some("translation failed".to_string());
                }
            },
            (None, None) => return None,
        };

        match translate_changelog(translator, block, &path) {
            Ok(()) => Some(format!("translated to {}", path.display())),
            Err(e) => {
                warn!(error = %e, "changelog translation failed, continuing");
                Some("translation failed".to_string())
            }
        }
    }

    fn git_finalize(&self, state: &mut ReleaseState) -> Result<StageOutcome> {
        let branch = state.branch()?.to_string();
        let remote = &self.config.remote;
        let message = if state.repo.monorepo {
            format!("release: {}@{}", state.name, state.version)
        } else {
            format!("release: {}", state.version)
        };

        let tag = match &state.tag {
            Some(tag) if !state.bumped() && state.git.find_tag(tag)?.is_some() => {
                warn!(tag = %tag, "tag already exists, not tagging");
                None
            }
            other => other.clone(),
        };

        let action = format!(
            "commit \"{}\"{}, push {} {}",
            message,
            tag.as_deref().map(|t| format!(", tag {}", t)).unwrap_or_default(),
            remote,
            branch
        );
        if self.is_dry_run() {
            return Ok(self.rehearse(Stage::GitFinalize, action));
        }

        if state.bumped() {
            self.package_manager().install()?;
        }

        let git = GitCli::new(self.runner, self.cwd());
        git.add_all()?;
        if git.commit(&message, self.config.no_verify)? == CommitOutcome::NothingToCommit {
            info!("nothing to commit");
        }
        if let Some(tag) = &tag {
            git.tag(tag)?;
        }
        git.push_with_tags(remote, &branch)?;

        Ok(StageOutcome::Completed(action))
    }

    fn github_release(&self, state: &mut ReleaseState) -> Result<StageOutcome> {
        if !self.config.github_release {
            return Ok(StageOutcome::Skipped("hosted release disabled".to_string()));
        }
        let tag = state.tag.clone().ok_or_else(|| ConfigError::InvalidValue {
            field: "git_tag".to_string(),
            message: "a release needs a tag".to_string(),
        })?;

        let changelog_path = state
            .repo
            .repo_relative(&self.cwd().join(&self.config.changelog_file));
        let notes = ReleaseNotes {
            repo_id: state.repo_id()?,
            branch: state.branch()?,
            changelog_path: &changelog_path,
            version: &state.version,
            previous_tag: state.repo.latest_tag.as_deref(),
            tag: &tag,
        }
        .render();

        if self.is_dry_run() {
            return Ok(self.rehearse(Stage::GithubRelease, format!("gh release create {}", tag)));
        }

        let prerelease = semver::Version::parse(&state.version)
            .map(|v| !v.pre.is_empty())
            .unwrap_or(false);
        create_release(self.runner, self.cwd(), &tag, &notes, prerelease)?;
        Ok(StageOutcome::Completed(format!("created release {}", tag)))
    }
}

fn ensure_increased(previous: &semver::Version, next: &semver::Version) -> Result<()> {
    if next > previous {
        Ok(())
    } else {
        Err(VersionError::NotIncreased {
            previous: previous.to_string(),
            next: next.to_string(),
        }
        .into())
    }
}
