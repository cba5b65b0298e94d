//! Unique release-tag resolution.

use log::debug;

use crate::error::PublishError;

use super::client::GitHubApi;
use super::types::RepoId;

/// Upper bound on suffix probing. A safety stop, not an expected case.
const MAX_SUFFIX: u32 = 1000;

/// A tag known to be free in the repository at resolution time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTag {
    pub tag: String,
    /// 0 means the base tag itself was free.
    pub suffix: u32,
}

/// Computes a release tag not already present in the repository.
///
/// The candidate is `v<version>`. A 404 on the ref probe means the candidate
/// is free and it is returned with suffix 0. On collision the full tag list
/// is fetched once and increasing suffixes are tried as `<base>-<n>`; the
/// lowest free suffix wins. Deterministic: the same existing-tag set always
/// yields the same answer.
pub async fn resolve_unique_tag<G: GitHubApi + ?Sized>(
    github: &G,
    repo: &RepoId,
    version: &str,
) -> Result<ResolvedTag, PublishError> {
    let base = format!("v{}", version);

    if !github.tag_exists(repo, &base).await? {
        return Ok(ResolvedTag {
            tag: base,
            suffix: 0,
        });
    }

    debug!("Tag {} is taken, searching for a free suffix...", base);
    let tags = github.list_tags(repo).await?;
    if tags.is_empty() {
        // The repository reports no tags at all, so the base tag is usable.
        return Ok(ResolvedTag {
            tag: base,
            suffix: 0,
        });
    }

    for suffix in 1..=MAX_SUFFIX {
        let candidate = format!("{}-{}", base, suffix);
        if !tags.iter().any(|tag| tag == &candidate) {
            debug!("Using tag {} (suffix {})", candidate, suffix);
            return Ok(ResolvedTag {
                tag: candidate,
                suffix,
            });
        }
    }

    Err(PublishError::Exhausted { base })
}
