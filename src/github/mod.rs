//! GitHub API client (secondary platform).

mod client;
mod tag;
mod types;

pub use client::{CreateReleaseOutcome, GitHub, GitHubApi, DEFAULT_API_URL};
pub use tag::{resolve_unique_tag, ResolvedTag};
pub use types::{ApiError, NewRelease, Release, RepoId};

#[cfg(test)]
pub use client::MockGitHubApi;
