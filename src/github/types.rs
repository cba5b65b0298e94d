use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Repository coordinates on GitHub.
#[derive(Debug, PartialEq, Clone)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl std::fmt::Display for RepoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepoId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            Err(anyhow!("Invalid repository format. Expected 'owner/repo'."))
        } else {
            Ok(RepoId {
                owner: parts[0].to_string(),
                repo: parts[1].to_string(),
            })
        }
    }
}

/// A GitHub release, reduced to the fields the mirror needs.
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct Release {
    pub tag_name: String,
    /// URI template; everything from `{` onward must be stripped before use.
    pub upload_url: String,
    pub html_url: Option<String>,
}

impl Release {
    /// Asset-upload endpoint with the URI-template suffix stripped.
    pub fn upload_target(&self) -> &str {
        self.upload_url
            .split('{')
            .next()
            .unwrap_or(&self.upload_url)
    }
}

/// Request body for creating a release.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewRelease {
    pub tag_name: String,
    pub name: String,
    pub body: String,
    pub draft: bool,
    pub prerelease: bool,
}

/// A git ref as returned by the refs API.
#[derive(Deserialize, Debug, Clone)]
pub struct GitRef {
    #[serde(rename = "ref")]
    pub name: String,
}

impl GitRef {
    /// Tag name with the `refs/tags/` prefix stripped.
    pub fn tag_name(&self) -> &str {
        self.name.strip_prefix("refs/tags/").unwrap_or(&self.name)
    }
}

/// Structured error body returned by the GitHub API.
#[derive(Deserialize, Debug, Default)]
pub struct ApiError {
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<ApiErrorItem>,
}

#[derive(Deserialize, Debug)]
pub struct ApiErrorItem {
    pub resource: Option<String>,
    pub code: Option<String>,
    pub field: Option<String>,
}

impl ApiError {
    /// True when the error says the release tag is already taken. Matched on
    /// the structured fields, not the status code alone.
    pub fn is_tag_collision(&self) -> bool {
        self.errors.iter().any(|e| {
            e.code.as_deref() == Some("already_exists") && e.field.as_deref() == Some("tag_name")
        })
    }
}
