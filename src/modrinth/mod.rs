//! Modrinth API client (primary platform).

mod client;
mod types;

pub use client::{Modrinth, ModrinthApi, DEFAULT_API_URL};
pub use types::{NewVersion, Project, ProjectVersion, VersionType};

#[cfg(test)]
pub use client::MockModrinthApi;
