//! Project, tracker and baseline operations.

use serde_json::{Value, json};
use tracing::instrument;

use super::types::{
    ProjectDetails, ProjectList, ProjectSummary, RemoteTracker, TrackerDetails, TrackerList,
    TrackerSummary,
};
use super::{ToolError, TrackerService};
use crate::gateway::{Credential, RemoteGateway, RemoteRequest};

impl<G: RemoteGateway> TrackerService<G> {
    /// Lists all projects accessible to the credential.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Gateway`] on request failure or when an entry
    /// lacks `id`/`name`.
    #[instrument(skip(self, credential))]
    pub async fn list_projects(&self, credential: &Credential) -> Result<ProjectList, ToolError> {
        let projects: Vec<ProjectSummary> = self
            .send_decoded(credential, RemoteRequest::get("v3/projects"))
            .await?;
        Ok(ProjectList { projects })
    }

    /// Lists the trackers of a project.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Gateway`] on request failure or malformed entries.
    #[instrument(skip(self, credential))]
    pub async fn list_trackers(
        &self,
        credential: &Credential,
        project_id: u64,
    ) -> Result<TrackerList, ToolError> {
        let trackers: Vec<TrackerSummary> = self
            .send_decoded(
                credential,
                RemoteRequest::get(format!("v3/projects/{project_id}/trackers")),
            )
            .await?;
        Ok(TrackerList { trackers })
    }

    /// Gets project metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Gateway`] on request failure or malformed payload.
    #[instrument(skip(self, credential))]
    pub async fn get_project_details(
        &self,
        credential: &Credential,
        project_id: u64,
    ) -> Result<ProjectDetails, ToolError> {
        self.send_decoded(credential, RemoteRequest::get(format!("v3/projects/{project_id}")))
            .await
    }

    /// Gets tracker metadata, flattening the owning project to its id.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Gateway`] on request failure or when `type` or
    /// `project.id` is missing.
    #[instrument(skip(self, credential))]
    pub async fn get_tracker_details(
        &self,
        credential: &Credential,
        tracker_id: u64,
    ) -> Result<TrackerDetails, ToolError> {
        let remote: RemoteTracker = self
            .send_decoded(credential, RemoteRequest::get(format!("v3/trackers/{tracker_id}")))
            .await?;
        Ok(remote.into())
    }

    /// Creates a named baseline snapshot of a project.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Gateway`] on request failure.
    #[instrument(skip(self, credential))]
    pub async fn create_baseline(
        &self,
        credential: &Credential,
        project_id: u64,
        name: &str,
    ) -> Result<Value, ToolError> {
        let baseline = self
            .send(
                credential,
                RemoteRequest::post("v3/baselines").json(json!({
                    "project": {"id": project_id},
                    "name": name,
                })),
            )
            .await?;
        Ok(json!({ "baseline": baseline }))
    }
}
