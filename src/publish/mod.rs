//! Publish pipeline orchestration.
//!
//! Stages run in a fixed order and each stage gates the next: a failure
//! before or at the primary upload aborts the run, while failures on the
//! secondary platform only produce warnings. Stages hand back
//! [`StageReport`]s; all presentation happens here.

mod demote;
mod mirror;
mod summary;
mod upload;

pub use demote::demote_current_release;
pub use mirror::{mirror_release, sync_repo_description};
pub use summary::sync_summary;
pub use upload::upload_primary;

use log::warn;

use crate::config::Config;
use crate::github::{GitHubApi, RepoId};
use crate::modrinth::{ModrinthApi, NewVersion};
use crate::report::{StageOutcome, StageReport};

/// Platform-specific changelog texts rendered from one base changelog.
#[derive(Debug, Clone, PartialEq)]
pub struct Changelogs {
    pub modrinth: String,
    pub github: String,
}

/// Modrinth gets the base text verbatim; the GitHub body links back to the
/// Modrinth project.
pub fn render_changelogs(base: &str, modrinth_project_id: &str) -> Changelogs {
    Changelogs {
        modrinth: base.to_string(),
        github: format!(
            "{}\n\n---\nAlso available on [Modrinth](https://modrinth.com/project/{}).",
            base.trim_end(),
            modrinth_project_id
        ),
    }
}

/// What the run accomplished. Neither flag affects the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishOutcome {
    /// The new version made it to Modrinth.
    pub primary_ok: bool,
    /// Both secondary-platform stages succeeded.
    pub secondary_ok: bool,
}

pub struct Publisher<'a, M: ModrinthApi + ?Sized, G: GitHubApi + ?Sized> {
    modrinth: &'a M,
    github: &'a G,
    config: &'a Config,
}

impl<'a, M: ModrinthApi + ?Sized, G: GitHubApi + ?Sized> Publisher<'a, M, G> {
    pub fn new(modrinth: &'a M, github: &'a G, config: &'a Config) -> Self {
        Self {
            modrinth,
            github,
            config,
        }
    }

    /// Runs the full pipeline: summary sync, demotion, primary upload, then
    /// the secondary-platform stages. No rollback on partial failure.
    pub async fn run(&self) -> PublishOutcome {
        let project = &self.config.project;
        let version = &self.config.version;
        let version_name = self.config.version_name();
        let summary = self.config.summary();
        let file_path = self.config.artifact_path();
        let changelogs = render_changelogs(&version.changelog, &project.modrinth_id);

        let halted = PublishOutcome {
            primary_ok: false,
            secondary_ok: false,
        };

        println!("Checking Modrinth project summary...");
        let report = sync_summary(self.modrinth, &project.modrinth_id, &summary).await;
        present(&report);
        if !report.is_success() {
            eprintln!("\nPublishing halted because the project summary could not be updated.");
            return halted;
        }

        println!("\nChecking for a previous release to demote...");
        let report = demote_current_release(self.modrinth, &project.modrinth_id).await;
        present(&report);
        if !report.is_success() {
            eprintln!("\nPublishing halted because the previous release could not be demoted.");
            return halted;
        }

        println!("\nUploading new release to Modrinth: {}...", version_name);
        let new_version = NewVersion::new(
            project.modrinth_id.clone(),
            version_name.clone(),
            version.number.clone(),
            changelogs.modrinth.clone(),
            version.game_versions.clone(),
            version.loaders.clone(),
        );
        let report = upload_primary(self.modrinth, &new_version, &file_path).await;
        present(&report);
        if !report.is_success() {
            eprintln!("\nPublishing halted because the new version could not be uploaded.");
            return halted;
        }

        let repo = RepoId {
            owner: project.github_owner.clone(),
            repo: project.github_repo.clone(),
        };

        println!("\nUpdating GitHub repository description...");
        let description_report = sync_repo_description(self.github, &repo, &summary).await;
        present(&description_report);

        println!("\nMirroring release on GitHub...");
        let mirror_report = mirror_release(
            self.github,
            &repo,
            &version.number,
            &version_name,
            &changelogs.github,
            &file_path,
        )
        .await;
        present(&mirror_report);

        let secondary_ok = description_report.is_success() && mirror_report.is_success();
        if !secondary_ok {
            warn!("Modrinth upload succeeded, but the GitHub mirror did not complete.");
        }

        PublishOutcome {
            primary_ok: true,
            secondary_ok,
        }
    }
}

fn present(report: &StageReport) {
    match report.outcome {
        StageOutcome::Success => println!("{}", report.message),
        StageOutcome::Failed => {
            eprintln!("{}", report.message);
            if let Some(body) = &report.response_body {
                eprintln!("Response body: {}", body);
            }
        }
    }
}
