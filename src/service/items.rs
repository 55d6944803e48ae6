//! Item operations: reads, writes, workflow actions, hierarchy and export.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value, json};
use tracing::instrument;

use super::{ToolError, TrackerService};
use crate::gateway::{Credential, RemoteGateway, RemoteRequest};

/// Single explicit action accepted by [`TrackerService::item_action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemAction {
    /// Add a comment (multipart upload).
    Comment,
    /// Update the item, typically to move it through its workflow.
    Transition,
}

impl FromStr for ItemAction {
    type Err = ToolError;

    fn from_str(action: &str) -> Result<Self, Self::Err> {
        match action {
            "comment" => Ok(Self::Comment),
            "transition" => Ok(Self::Transition),
            other => Err(ToolError::UnsupportedAction {
                action: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ItemAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comment => f.write_str("comment"),
            Self::Transition => f.write_str("transition"),
        }
    }
}

impl<G: RemoteGateway> TrackerService<G> {
    /// Gets full details of one item.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Gateway`] on request failure.
    #[instrument(skip(self, credential))]
    pub async fn get_item_details(
        &self,
        credential: &Credential,
        item_id: u64,
    ) -> Result<Value, ToolError> {
        self.send(credential, RemoteRequest::get(format!("v3/items/{item_id}")))
            .await
    }

    /// Gets the change history of an item.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Gateway`] on request failure.
    #[instrument(skip(self, credential))]
    pub async fn get_item_history(
        &self,
        credential: &Credential,
        item_id: u64,
    ) -> Result<Value, ToolError> {
        let history = self
            .send(credential, RemoteRequest::get(format!("v3/items/{item_id}/history")))
            .await?;
        Ok(json!({ "history": history }))
    }

    /// Gets all fields and values of an item.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Gateway`] on request failure.
    #[instrument(skip(self, credential))]
    pub async fn get_item_fields(
        &self,
        credential: &Credential,
        item_id: u64,
    ) -> Result<Value, ToolError> {
        let fields = self
            .send(credential, RemoteRequest::get(format!("v3/items/{item_id}/fields")))
            .await?;
        Ok(json!({ "fields": fields }))
    }

    /// Gets the workflow transitions allowed for an item.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Gateway`] on request failure.
    #[instrument(skip(self, credential))]
    pub async fn get_item_transitions(
        &self,
        credential: &Credential,
        item_id: u64,
    ) -> Result<Value, ToolError> {
        let transitions = self
            .send(
                credential,
                RemoteRequest::get(format!("v3/items/{item_id}/transitions")),
            )
            .await?;
        Ok(json!({ "transitions": transitions }))
    }

    /// Creates an item in a tracker.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Gateway`] on request failure.
    #[instrument(skip(self, credential, fields))]
    pub async fn create_item(
        &self,
        credential: &Credential,
        tracker_id: u64,
        fields: Value,
    ) -> Result<Value, ToolError> {
        let item = self
            .send(
                credential,
                RemoteRequest::post("v3/items").json(json!({
                    "tracker": {"id": tracker_id},
                    "fields": fields,
                })),
            )
            .await?;
        Ok(json!({ "item": item }))
    }

    /// Moves an item to the trash.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Gateway`] on request failure.
    #[instrument(skip(self, credential))]
    pub async fn delete_item(
        &self,
        credential: &Credential,
        item_id: u64,
    ) -> Result<Value, ToolError> {
        self.send(credential, RemoteRequest::delete(format!("v3/items/{item_id}")))
            .await?;
        Ok(json!({ "deleted": true, "itemId": item_id }))
    }

    /// Updates fields of many items in one request.
    ///
    /// With `atomic` the remote service applies all updates or none.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Gateway`] on request failure.
    #[instrument(skip(self, credential, updates), fields(updates = updates.len()))]
    pub async fn bulk_update_items(
        &self,
        credential: &Credential,
        updates: Vec<Value>,
        atomic: bool,
    ) -> Result<Value, ToolError> {
        let result = self
            .send(
                credential,
                RemoteRequest::put("v3/items/fields")
                    .query_param("atomic", atomic.to_string())
                    .json(Value::Array(updates)),
            )
            .await?;
        Ok(json!({ "result": result }))
    }

    /// Performs one explicit action on an item.
    ///
    /// `action` is `comment` (payload sent as multipart text fields) or
    /// `transition` (payload sent as the JSON update body).
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::UnsupportedAction`] for any other action, before
    /// any request is sent, or [`ToolError::Gateway`] on request failure.
    #[instrument(skip(self, credential, payload))]
    pub async fn item_action(
        &self,
        credential: &Credential,
        item_id: u64,
        action: &str,
        payload: Map<String, Value>,
    ) -> Result<Value, ToolError> {
        let request = match action.parse::<ItemAction>()? {
            ItemAction::Comment => {
                let fields = payload
                    .into_iter()
                    .map(|(name, value)| {
                        let text = match value {
                            Value::String(text) => text,
                            other => other.to_string(),
                        };
                        (name, text)
                    })
                    .collect();
                RemoteRequest::post(format!("v3/items/{item_id}/comments")).multipart(fields)
            }
            ItemAction::Transition => {
                RemoteRequest::put(format!("v3/items/{item_id}")).json(Value::Object(payload))
            }
        };
        let result = self.send(credential, request).await?;
        Ok(json!({ "result": result }))
    }

    /// Starts an export job for the given items.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Gateway`] on request failure.
    #[instrument(skip(self, credential, item_ids), fields(items = item_ids.len()))]
    pub async fn export_items(
        &self,
        credential: &Credential,
        item_ids: &[u64],
    ) -> Result<Value, ToolError> {
        let job = self
            .send(
                credential,
                RemoteRequest::post("v3/export/items").json(json!({ "items": item_ids })),
            )
            .await?;
        Ok(json!({ "job": job }))
    }

    /// Fetches upstream and downstream relations for many items at once.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Gateway`] on request failure.
    #[instrument(skip(self, credential, item_ids), fields(items = item_ids.len()))]
    pub async fn expand_relations(
        &self,
        credential: &Credential,
        item_ids: &[u64],
    ) -> Result<Value, ToolError> {
        let relations = self
            .send(
                credential,
                RemoteRequest::post("v3/items/relations").json(json!({ "items": item_ids })),
            )
            .await?;
        Ok(json!({ "relations": relations }))
    }

    /// Gets the child items of an item.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Gateway`] on request failure.
    #[instrument(skip(self, credential))]
    pub async fn get_item_children(
        &self,
        credential: &Credential,
        item_id: u64,
    ) -> Result<Value, ToolError> {
        let children = self
            .send(credential, RemoteRequest::get(format!("v3/items/{item_id}/children")))
            .await?;
        Ok(json!({ "children": children }))
    }

    /// Adds `child_id` under `parent_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Gateway`] on request failure.
    #[instrument(skip(self, credential))]
    pub async fn add_item_child(
        &self,
        credential: &Credential,
        parent_id: u64,
        child_id: u64,
    ) -> Result<Value, ToolError> {
        let result = self
            .send(
                credential,
                RemoteRequest::post(format!("v3/items/{parent_id}/children"))
                    .json(json!({ "items": [{"id": child_id}] })),
            )
            .await?;
        Ok(json!({ "result": result }))
    }

    /// Locks an item for editing.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Gateway`] on request failure.
    #[instrument(skip(self, credential))]
    pub async fn lock_item(&self, credential: &Credential, item_id: u64) -> Result<Value, ToolError> {
        self.send(credential, RemoteRequest::put(format!("v3/items/{item_id}/lock")))
            .await?;
        Ok(json!({ "locked": true }))
    }

    /// Releases an item lock.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Gateway`] on request failure.
    #[instrument(skip(self, credential))]
    pub async fn unlock_item(
        &self,
        credential: &Credential,
        item_id: u64,
    ) -> Result<Value, ToolError> {
        self.send(credential, RemoteRequest::delete(format!("v3/items/{item_id}/lock")))
            .await?;
        Ok(json!({ "locked": false }))
    }
}
