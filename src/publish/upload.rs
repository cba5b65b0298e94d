//! Primary artifact upload stage.

use std::path::Path;

use crate::modrinth::{ModrinthApi, NewVersion};
use crate::report::StageReport;

/// Uploads the new version to Modrinth. The client verifies the artifact
/// exists before any network call is made.
pub async fn upload_primary<M: ModrinthApi + ?Sized>(
    modrinth: &M,
    version: &NewVersion,
    file_path: &Path,
) -> StageReport {
    match modrinth.create_version(version, file_path).await {
        Ok(()) => StageReport::success(format!("Uploaded {} to Modrinth", version.name)),
        Err(err) => StageReport::from_error("Modrinth upload failed", &err),
    }
}
