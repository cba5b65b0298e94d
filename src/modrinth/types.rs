use serde::{Deserialize, Serialize};

/// Modrinth project, reduced to the fields this tool touches.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Project {
    /// Public summary text shown on the project page.
    pub description: Option<String>,
}

/// Visibility tier of a published version.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VersionType {
    Release,
    Beta,
    Alpha,
}

impl std::fmt::Display for VersionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VersionType::Release => write!(f, "release"),
            VersionType::Beta => write!(f, "beta"),
            VersionType::Alpha => write!(f, "alpha"),
        }
    }
}

/// A version already published on a Modrinth project.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ProjectVersion {
    pub id: String,
    pub version_number: String,
    pub version_type: VersionType,
}

/// Metadata for a version about to be uploaded.
///
/// Serialized as the `data` field of the multipart upload. New versions are
/// always featured, listed, top-tier releases with a single file part.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewVersion {
    pub project_id: String,
    pub name: String,
    pub version_number: String,
    pub changelog: String,
    pub game_versions: Vec<String>,
    pub loaders: Vec<String>,
    pub version_type: VersionType,
    pub featured: bool,
    pub status: String,
    pub dependencies: Vec<serde_json::Value>,
    pub file_parts: Vec<String>,
}

impl NewVersion {
    pub fn new(
        project_id: String,
        name: String,
        version_number: String,
        changelog: String,
        game_versions: Vec<String>,
        loaders: Vec<String>,
    ) -> Self {
        Self {
            project_id,
            name,
            version_number,
            changelog,
            game_versions,
            loaders,
            version_type: VersionType::Release,
            featured: true,
            status: "listed".to_string(),
            dependencies: Vec::new(),
            file_parts: vec!["file".to_string()],
        }
    }
}
