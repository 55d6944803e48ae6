//! Reshaped response types for the operations that project remote payloads.
//!
//! Field names follow the remote API's camelCase JSON. Unknown remote fields
//! are ignored; a missing required field is a decode failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Project identity as listed by `list_projects`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    /// Project id.
    pub id: u64,
    /// Project name.
    pub name: String,
}

/// `list_projects` result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectList {
    /// Accessible projects.
    pub projects: Vec<ProjectSummary>,
}

/// Tracker identity as listed by `list_trackers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerSummary {
    /// Tracker id.
    pub id: u64,
    /// Tracker name.
    pub name: String,
    /// Tracker type reference, when the remote service provides one.
    #[serde(rename = "type", default)]
    pub tracker_type: Option<Value>,
}

/// `list_trackers` result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerList {
    /// Trackers of the project.
    pub trackers: Vec<TrackerSummary>,
}

/// `get_project_details` result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetails {
    /// Project id.
    pub id: u64,
    /// Project name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<Value>,
    /// Project key.
    #[serde(default)]
    pub key: Option<Value>,
    /// Creation timestamp as sent by the remote service.
    #[serde(default)]
    pub created_at: Option<Value>,
    /// Project status.
    #[serde(default)]
    pub status: Option<Value>,
}

/// `get_tracker_details` result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerDetails {
    /// Tracker id.
    pub id: u64,
    /// Tracker name.
    pub name: String,
    /// Tracker type reference.
    #[serde(rename = "type")]
    pub tracker_type: Value,
    /// Free-text description.
    pub description: Option<Value>,
    /// Owning project id.
    pub project_id: u64,
}

/// Tracker payload as returned by `GET v3/trackers/{id}`.
#[derive(Debug, Deserialize)]
pub(crate) struct RemoteTracker {
    pub(crate) id: u64,
    pub(crate) name: String,
    #[serde(rename = "type")]
    pub(crate) tracker_type: Value,
    #[serde(default)]
    pub(crate) description: Option<Value>,
    pub(crate) project: IdRef,
}

/// `{ "id": n }` reference.
#[derive(Debug, Deserialize)]
pub(crate) struct IdRef {
    pub(crate) id: u64,
}

impl From<RemoteTracker> for TrackerDetails {
    fn from(remote: RemoteTracker) -> Self {
        Self {
            id: remote.id,
            name: remote.name,
            tracker_type: remote.tracker_type,
            description: remote.description,
            project_id: remote.project.id,
        }
    }
}
