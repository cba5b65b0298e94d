//! Summary synchronizer stage.

use log::debug;

use crate::modrinth::ModrinthApi;
use crate::report::StageReport;

/// Brings the Modrinth project summary in line with the desired text.
///
/// The comparison is an exact string match; the update call is only issued
/// when the remote text differs.
pub async fn sync_summary<M: ModrinthApi + ?Sized>(
    modrinth: &M,
    project_id: &str,
    desired: &str,
) -> StageReport {
    let project = match modrinth.get_project(project_id).await {
        Ok(project) => project,
        Err(err) => return StageReport::from_error("Failed to fetch project summary", &err),
    };

    if project.description.as_deref() == Some(desired) {
        debug!("Summary for {} already matches", project_id);
        return StageReport::success("Project summary is already up to date");
    }

    match modrinth.update_description(project_id, desired).await {
        Ok(()) => StageReport::success("Updated project summary"),
        Err(err) => StageReport::from_error("Failed to update project summary", &err),
    }
}
