//! Associations, comments and attachments.

use serde_json::{Value, json};
use tracing::instrument;

use super::{ToolError, TrackerService};
use crate::gateway::{Credential, RemoteGateway, RemoteRequest};

impl<G: RemoteGateway> TrackerService<G> {
    /// Creates a typed relation from `source_item_id` to `target_item_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Gateway`] on request failure.
    #[instrument(skip(self, credential))]
    pub async fn create_association(
        &self,
        credential: &Credential,
        source_item_id: u64,
        target_item_id: u64,
        association_type_id: u64,
    ) -> Result<Value, ToolError> {
        let association = self
            .send(
                credential,
                RemoteRequest::post("v3/associations").json(json!({
                    "sourceItem": {"id": source_item_id},
                    "targetItem": {"id": target_item_id},
                    "type": {"id": association_type_id},
                })),
            )
            .await?;
        Ok(json!({ "association": association }))
    }

    /// Deletes an association.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Gateway`] on request failure.
    #[instrument(skip(self, credential))]
    pub async fn delete_association(
        &self,
        credential: &Credential,
        association_id: u64,
    ) -> Result<Value, ToolError> {
        self.send(
            credential,
            RemoteRequest::delete(format!("v3/associations/{association_id}")),
        )
        .await?;
        Ok(json!({ "deleted": true, "associationId": association_id }))
    }

    /// Lists the association types defined on the server.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Gateway`] on request failure.
    #[instrument(skip(self, credential))]
    pub async fn list_association_types(
        &self,
        credential: &Credential,
    ) -> Result<Value, ToolError> {
        let types = self
            .send(credential, RemoteRequest::get("v3/associations/types"))
            .await?;
        Ok(json!({ "associationTypes": types }))
    }

    /// Lists the comments on an item.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Gateway`] on request failure.
    #[instrument(skip(self, credential))]
    pub async fn list_comments(
        &self,
        credential: &Credential,
        item_id: u64,
    ) -> Result<Value, ToolError> {
        let comments = self
            .send(credential, RemoteRequest::get(format!("v3/items/{item_id}/comments")))
            .await?;
        Ok(json!({ "comments": comments }))
    }

    /// Replaces the text of a comment.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Gateway`] on request failure.
    #[instrument(skip(self, credential, text))]
    pub async fn update_comment(
        &self,
        credential: &Credential,
        item_id: u64,
        comment_id: u64,
        text: &str,
    ) -> Result<Value, ToolError> {
        let comment = self
            .send(
                credential,
                RemoteRequest::put(format!("v3/items/{item_id}/comments/{comment_id}"))
                    .json(json!({ "text": text })),
            )
            .await?;
        Ok(json!({ "comment": comment }))
    }

    /// Deletes a comment.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Gateway`] on request failure.
    #[instrument(skip(self, credential))]
    pub async fn delete_comment(
        &self,
        credential: &Credential,
        item_id: u64,
        comment_id: u64,
    ) -> Result<Value, ToolError> {
        self.send(
            credential,
            RemoteRequest::delete(format!("v3/items/{item_id}/comments/{comment_id}")),
        )
        .await?;
        Ok(json!({ "deleted": true }))
    }

    /// Lists the attachments of an item.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Gateway`] on request failure.
    #[instrument(skip(self, credential))]
    pub async fn list_attachments(
        &self,
        credential: &Credential,
        item_id: u64,
    ) -> Result<Value, ToolError> {
        let attachments = self
            .send(
                credential,
                RemoteRequest::get(format!("v3/items/{item_id}/attachments")),
            )
            .await?;
        Ok(json!({ "attachments": attachments }))
    }

    /// Deletes an attachment.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Gateway`] on request failure.
    #[instrument(skip(self, credential))]
    pub async fn delete_attachment(
        &self,
        credential: &Credential,
        item_id: u64,
        attachment_id: u64,
    ) -> Result<Value, ToolError> {
        self.send(
            credential,
            RemoteRequest::delete(format!("v3/items/{item_id}/attachments/{attachment_id}")),
        )
        .await?;
        Ok(json!({ "deleted": true }))
    }
}
