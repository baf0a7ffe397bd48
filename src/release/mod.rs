//! Release workflow orchestration
//!
//! Drives one release from the latest tag to published remotes. The workflow
//! owns no I/O of its own: git, shell commands and prompts come in as
//! collaborators so the whole sequence runs against mocks in tests.
//!
//! Every step is fail-fast. The only undo is the explicit rollback when the
//! maintainer rejects the built release.

use std::path::PathBuf;

use crate::config::Config;
use crate::domain::version::self_check;
use crate::domain::{latest_tag, Bump, ReleaseTags, Version};
use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use crate::patch;
use crate::runner::CommandRunner;
use crate::ui::{self, Prompter};

/// Question gating the rollback
pub const REVIEW_QUESTION: &str = "Does this look correct?";
/// Question gating the pushes
pub const PUBLISH_QUESTION: &str = "Publish?";

/// Today's date in the format written into the docs
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Everything computed before the repository is touched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePlan {
    /// Latest existing version tag, as listed by git
    pub previous_tag: String,
    pub previous: Version,
    pub version: Version,
    pub tags: ReleaseTags,
    pub date: String,
}

impl ReleasePlan {
    /// Pick the latest of `tags` in natural order and bump it.
    ///
    /// # Returns
    /// * `Err(ReleaseError::Precondition)` - If there is no tag to start from
    /// * `Err(ReleaseError::Version)` - If the latest tag is not a dotted number
    pub fn compute<I, S>(tags: I, bump: Bump, date: impl Into<String>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let previous_tag = latest_tag(tags)
            .map(|tag| tag.as_ref().trim().to_string())
            .ok_or_else(|| ReleaseError::precondition("no version tags to release from"))?;

        let previous = Version::parse(&previous_tag)?;
        let version = previous.increment(bump)?;

        Ok(ReleasePlan {
            previous_tag,
            previous,
            version,
            tags: ReleaseTags::new(&version),
            date: date.into(),
        })
    }

    /// Version as written into files, without the `v` prefix
    pub fn readable(&self) -> &str {
        &self.tags.bare
    }
}

/// How a run that did not fail ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Pushed to every configured remote
    Published { tag: String, remotes: Vec<String> },
    /// Rejected at review; release commit and tags were removed
    RolledBack { tag: String },
    /// Built and tagged locally but not pushed
    NotPublished { tag: String },
}

impl ReleaseOutcome {
    /// Process exit status for this outcome
    pub fn exit_code(&self) -> i32 {
        match self {
            ReleaseOutcome::Published { .. } => 0,
            ReleaseOutcome::RolledBack { .. } | ReleaseOutcome::NotPublished { .. } => 1,
        }
    }
}

/// One release run against a repository
pub struct ReleaseWorkflow<'a, R, C, P> {
    config: &'a Config,
    repo: &'a R,
    runner: &'a C,
    prompter: &'a P,
    root: PathBuf,
}

impl<'a, R, C, P> ReleaseWorkflow<'a, R, C, P>
where
    R: Repository,
    C: CommandRunner,
    P: Prompter,
{
    /// # Arguments
    /// * `root` - Repository root; configured file paths are relative to it
    pub fn new(
        config: &'a Config,
        repo: &'a R,
        runner: &'a C,
        prompter: &'a P,
        root: impl Into<PathBuf>,
    ) -> Self {
        ReleaseWorkflow {
            config,
            repo,
            runner,
            prompter,
            root: root.into(),
        }
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    fn render(&self, template: &str, plan: &ReleasePlan) -> String {
        self.config.render(template, plan.readable())
    }

    /// Run the whole release: plan, patch, commit, tag, build, review, publish.
    pub fn run(&self, bump: Bump, date: &str) -> Result<ReleaseOutcome> {
        self_check()?;

        let plan = self.plan(bump, date)?;
        ui::display_release_plan(&plan.previous_tag, &plan.tags.prefixed, &plan.date);

        self.ensure_clean()?;
        self.update_files(&plan)?;
        self.commit_and_tag(&plan)?;
        self.build_and_verify(&plan)?;

        self.runner.show(&self.config.build.review_command)?;

        if !self.prompter.confirm(REVIEW_QUESTION)? {
            self.rollback(&plan)?;
            return Ok(ReleaseOutcome::RolledBack {
                tag: plan.tags.prefixed,
            });
        }

        if !self.prompter.confirm(PUBLISH_QUESTION)? {
            tracing::info!(component = "release", tag = %plan.tags.prefixed, "not publishing");
            return Ok(ReleaseOutcome::NotPublished {
                tag: plan.tags.prefixed,
            });
        }

        let remotes = self.publish(&plan)?;
        Ok(ReleaseOutcome::Published {
            tag: plan.tags.prefixed,
            remotes,
        })
    }

    /// Read the latest version tag and compute the next version
    pub fn plan(&self, bump: Bump, date: &str) -> Result<ReleasePlan> {
        let tags = self.repo.list_tags(&self.config.project.tag_glob)?;
        let plan = ReleasePlan::compute(tags, bump, date)?;

        tracing::info!(component = "release", "Old version: {}", plan.previous_tag);
        tracing::info!(
            component = "release",
            %bump,
            "New version: {} {} {}",
            plan.readable(),
            plan.tags.prefixed,
            plan.date
        );

        Ok(plan)
    }

    /// Refuse to start with unstaged or staged changes
    pub fn ensure_clean(&self) -> Result<()> {
        if self.repo.has_unstaged_changes()? {
            return Err(ReleaseError::precondition(
                "working tree has unstaged changes",
            ));
        }
        if self.repo.has_staged_changes()? {
            return Err(ReleaseError::precondition(
                "index has uncommitted changes",
            ));
        }
        Ok(())
    }

    /// Write the new version into the README, man page and changelog, then
    /// regenerate derived files
    pub fn update_files(&self, plan: &ReleasePlan) -> Result<()> {
        let files = &self.config.files;
        let scripts = &self.config.scripts;

        let replaced = patch::replace_in_file(
            &self.path(&files.readme),
            &plan.previous.bare(),
            plan.readable(),
        )?;
        if replaced == 0 {
            tracing::warn!(
                component = "patch",
                file = %files.readme,
                old = %plan.previous.bare(),
                "old version not found"
            );
        }

        patch::update_man_page(&self.path(&files.man_page), plan.readable(), &plan.date)?;
        self.runner.run(&self.render(&scripts.generate_doc, plan))?;

        patch::update_changelog(
            &self.path(&files.changelog),
            plan.readable(),
            &plan.date,
            &files.changelog_sentinel,
        )?;

        self.runner.run(&self.render(&scripts.update_generated, plan))?;
        Ok(())
    }

    /// Commit the patched files and cut both release tags
    pub fn commit_and_tag(&self, plan: &ReleasePlan) -> Result<()> {
        let commit = self.repo.commit_all(&plan.tags.commit_message())?;
        tracing::info!(component = "git", %commit, "committed release");

        for name in plan.tags.names() {
            self.repo.create_annotated_tag(name, &plan.tags.message())?;
            tracing::debug!(component = "git", tag = name, "created tag");
        }
        Ok(())
    }

    /// Build the tarball, smoke-build it, and check the binary reports the new version
    pub fn build_and_verify(&self, plan: &ReleasePlan) -> Result<()> {
        let build = &self.config.build;

        self.runner.run(&self.render(&build.clean_command, plan))?;
        self.runner
            .run(&self.render(&self.config.scripts.make_release, plan))?;
        for step in &build.steps {
            self.runner.run(&self.render(step, plan))?;
        }

        let reported = self.runner.run(&self.render(&build.version_command, plan))?;
        let expected = self.render(&build.expected_version, plan);
        if reported.trim() != expected {
            tracing::info!(component = "release", %expected, actual = %reported.trim(), "version mismatch");
            return Err(ReleaseError::assertion(expected, reported.trim()));
        }

        Ok(())
    }

    /// Undo the release commit and delete both tags
    pub fn rollback(&self, plan: &ReleasePlan) -> Result<()> {
        tracing::info!(component = "release", tag = %plan.tags.prefixed, "rolling back");

        self.repo.reset_hard_to_parent()?;
        for name in plan.tags.names() {
            self.repo.delete_tag(name)?;
        }
        Ok(())
    }

    /// Push the branch and both tags to every configured remote, in order
    pub fn publish(&self, plan: &ReleasePlan) -> Result<Vec<String>> {
        let project = &self.config.project;
        let tags = plan.tags.names();

        for remote in &project.remotes {
            self.repo.push(remote, &project.branch, &tags)?;
            tracing::info!(component = "git", %remote, branch = %project.branch, "pushed");
        }

        Ok(project.remotes.clone())
    }
}
