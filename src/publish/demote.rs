//! Release demoter stage.

use log::debug;

use crate::modrinth::{ModrinthApi, VersionType};
use crate::report::StageReport;

/// Relabels the current top-tier version as beta so the incoming upload
/// becomes the only release-tier version.
///
/// The version list is scanned in returned order and the first release-tier
/// entry wins; no release-tier entry means there is nothing to do.
pub async fn demote_current_release<M: ModrinthApi + ?Sized>(
    modrinth: &M,
    project_id: &str,
) -> StageReport {
    let versions = match modrinth.list_versions(project_id).await {
        Ok(versions) => versions,
        Err(err) => return StageReport::from_error("Failed to list versions", &err),
    };

    let Some(current) = versions
        .iter()
        .find(|v| v.version_type == VersionType::Release)
    else {
        debug!("No release-tier version on {}", project_id);
        return StageReport::success("No previous release to demote");
    };

    match modrinth
        .set_version_type(&current.id, VersionType::Beta)
        .await
    {
        Ok(()) => StageReport::success(format!(
            "Demoted v{} to beta",
            current.version_number
        )),
        Err(err) => StageReport::from_error("Failed to demote previous release", &err),
    }
}
