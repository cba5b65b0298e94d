//! Secondary-platform stages: repository description sync and release mirror.

use log::debug;
use std::path::Path;

use crate::error::PublishError;
use crate::github::{resolve_unique_tag, CreateReleaseOutcome, GitHubApi, NewRelease, RepoId};
use crate::report::StageReport;

/// Brings the GitHub repository description in line with the desired text.
pub async fn sync_repo_description<G: GitHubApi + ?Sized>(
    github: &G,
    repo: &RepoId,
    description: &str,
) -> StageReport {
    match github.update_repo_description(repo, description).await {
        Ok(()) => StageReport::success(format!("Updated description of {}", repo)),
        Err(err) => StageReport::from_error("Failed to update repository description", &err),
    }
}

/// Mirrors the already-published version as a tagged GitHub release with the
/// artifact attached as an asset.
///
/// The tag is made unique up front; if the create call still collides (the
/// probe and the create are not atomic) the existing release is fetched and
/// reused as the upload target.
pub async fn mirror_release<G: GitHubApi + ?Sized>(
    github: &G,
    repo: &RepoId,
    version_number: &str,
    version_name: &str,
    changelog: &str,
    file_path: &Path,
) -> StageReport {
    if !file_path.exists() {
        return StageReport::from_error(
            "GitHub mirror failed",
            &PublishError::FileNotFound(file_path.to_path_buf()),
        );
    }

    let resolved = match resolve_unique_tag(github, repo, version_number).await {
        Ok(resolved) => resolved,
        Err(err) => return StageReport::from_error("Failed to resolve a release tag", &err),
    };

    // Annotate the display name when the tag needed a suffix.
    let name = if resolved.suffix > 0 {
        format!("{} ({})", version_name, resolved.suffix)
    } else {
        version_name.to_string()
    };

    let new_release = NewRelease {
        tag_name: resolved.tag.clone(),
        name,
        body: changelog.to_string(),
        draft: false,
        prerelease: false,
    };

    let release = match github.create_release(repo, &new_release).await {
        Ok(CreateReleaseOutcome::Created(release)) => release,
        Ok(CreateReleaseOutcome::TagExists) => {
            debug!("Tag {} was taken after all, reusing its release", resolved.tag);
            match github.get_release_by_tag(repo, &resolved.tag).await {
                Ok(release) => release,
                Err(err) => {
                    return StageReport::from_error("Failed to fetch existing release", &err)
                }
            }
        }
        Err(err) => return StageReport::from_error("Failed to create GitHub release", &err),
    };

    match github.upload_asset(release.upload_target(), file_path).await {
        Ok(()) => StageReport::success(format!("Mirrored release {} on GitHub", resolved.tag)),
        Err(err) => StageReport::from_error("Failed to upload release asset", &err),
    }
}
