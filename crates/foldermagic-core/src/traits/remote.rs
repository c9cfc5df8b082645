//! Remote hierarchical store trait and its request/response shapes.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{AppError, ErrorKind};
use crate::result::AppResult;
use crate::types::ActionType;

/// Largest number of sub-requests a remote store accepts in one grouped request.
///
/// This bounds a dispatcher chunk. Whether a chunk reaches the remote as a
/// single request is up to the provider: the Drive provider fans a chunk out
/// as concurrent individual calls.
pub const MAX_BATCH_SIZE: usize = 100;

/// Category of a remote failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteErrorKind {
    /// The entity or parent does not exist.
    NotFound,
    /// The caller may not modify the entity.
    PermissionDenied,
    /// The remote store throttled the request.
    RateLimited,
    /// Any other transport or remote failure.
    Other,
}

/// A failure reported by the remote store for a single request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RemoteError {
    /// Failure category.
    pub kind: RemoteErrorKind,
    /// Transport-level status code, when one was received.
    pub status: Option<u16>,
    /// Human-readable message.
    pub message: String,
}

impl RemoteError {
    /// Create a remote error.
    pub fn new(kind: RemoteErrorKind, status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            kind,
            status,
            message: message.into(),
        }
    }

    /// Create a not-found error with status 404.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::NotFound, Some(404), message)
    }

    /// Create a permission-denied error with status 403.
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::PermissionDenied, Some(403), message)
    }

    /// Create a rate-limited error with status 429.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::RateLimited, Some(429), message)
    }

    /// Create an error with no transport status (connection reset, decode failure, ...).
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Other, None, message)
    }

    /// Classify an HTTP status code.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let kind = match status {
            404 => RemoteErrorKind::NotFound,
            401 | 403 => RemoteErrorKind::PermissionDenied,
            429 => RemoteErrorKind::RateLimited,
            _ => RemoteErrorKind::Other,
        };
        Self::new(kind, Some(status), message)
    }

    /// Status code rendered the way action outcomes carry it.
    pub fn code(&self) -> Option<String> {
        self.status.map(|s| s.to_string())
    }
}

impl From<RemoteError> for AppError {
    fn from(err: RemoteError) -> Self {
        let kind = match err.kind {
            RemoteErrorKind::NotFound => ErrorKind::NotFound,
            _ => ErrorKind::ExternalService,
        };
        let message = format!("Remote store error: {}", err.message);
        AppError::with_source(kind, message, err)
    }
}

/// Whether a remote entry is a folder or a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteEntryKind {
    /// A folder that may contain other entries.
    Folder,
    /// A leaf file.
    File,
}

/// Metadata of a single remote entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteMetadata {
    /// Remote identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Folder or file.
    pub kind: RemoteEntryKind,
    /// Identifiers of the folders currently listing this entry.
    #[serde(default)]
    pub parents: Vec<String>,
}

impl RemoteMetadata {
    /// Whether the entry is a folder.
    pub fn is_folder(&self) -> bool {
        self.kind == RemoteEntryKind::Folder
    }
}

/// Partial update of an existing entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePatch {
    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Parent to add.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_parent: Option<String>,
    /// Parents to remove.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remove_parents: Vec<String>,
}

impl UpdatePatch {
    /// A metadata-only rename.
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// A re-parent that adds `add_parent` and drops every parent in `remove_parents`.
    pub fn reparent(add_parent: impl Into<String>, remove_parents: Vec<String>) -> Self {
        Self {
            name: None,
            add_parent: Some(add_parent.into()),
            remove_parents,
        }
    }
}

/// One sub-request of a grouped submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RemoteRequest {
    /// Update an existing entry.
    Update {
        /// Entry to update.
        id: String,
        /// Fields to change.
        patch: UpdatePatch,
    },
    /// Create a folder under a single parent.
    CreateFolder {
        /// Parent folder.
        parent_id: String,
        /// Folder name.
        name: String,
    },
}

/// Success payload of a sub-request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteResponse {
    /// Identifier of the affected (or newly created) entry.
    pub id: String,
}

/// A sub-request tagged with the caller's correlation index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    /// Correlation tag echoed back in the matching [`BatchResponse`].
    pub tag: usize,
    /// The request to execute.
    pub request: RemoteRequest,
}

/// Result of one sub-request, carrying the tag it was submitted with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResponse {
    /// Tag of the originating [`BatchRequest`].
    pub tag: usize,
    /// Success payload or the per-request failure.
    pub result: Result<RemoteResponse, RemoteError>,
}

/// Client abstraction over a remote hierarchical file store.
///
/// Implementations live in `foldermagic-remote`. Per-request failures are
/// returned as [`RemoteError`] values so the engine can record them per
/// action; only [`RemoteStore::ensure_ready`] reports call-level failure.
#[async_trait]
pub trait RemoteStore: Send + Sync + fmt::Debug + 'static {
    /// Return the provider type name (e.g. `"memory"`, `"drive"`).
    fn provider_type(&self) -> &str;

    /// Verify the client is usable (authenticated, configured).
    async fn ensure_ready(&self) -> AppResult<()>;

    /// Whether this store can execute actions of the given type.
    fn supports(&self, _action_type: ActionType) -> bool {
        true
    }

    /// Largest grouped request this store accepts.
    fn max_batch_size(&self) -> usize {
        MAX_BATCH_SIZE
    }

    /// Fetch metadata of an entry, including its current parents.
    async fn get_metadata(&self, id: &str) -> Result<RemoteMetadata, RemoteError>;

    /// List the direct children of a folder.
    async fn list_children(&self, parent_id: &str) -> Result<Vec<RemoteMetadata>, RemoteError>;

    /// Create a folder and return its identifier.
    async fn create(&self, parent_id: &str, name: &str) -> Result<String, RemoteError>;

    /// Apply a partial update to an entry.
    async fn update(&self, id: &str, patch: &UpdatePatch) -> Result<RemoteResponse, RemoteError>;

    /// Execute a single sub-request through the plain calls.
    async fn execute(&self, request: &RemoteRequest) -> Result<RemoteResponse, RemoteError> {
        match request {
            RemoteRequest::Update { id, patch } => self.update(id, patch).await,
            RemoteRequest::CreateFolder { parent_id, name } => self
                .create(parent_id, name)
                .await
                .map(|id| RemoteResponse { id }),
        }
    }

    /// Execute a grouped submission.
    ///
    /// Responses may come back in any order but must carry the tags of the
    /// submitted requests, one response per request. An `Err` means the
    /// grouped request as a whole failed.
    async fn execute_batch(
        &self,
        requests: Vec<BatchRequest>,
    ) -> Result<Vec<BatchResponse>, RemoteError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_classification() {
        assert_eq!(
            RemoteError::from_status(404, "gone").kind,
            RemoteErrorKind::NotFound
        );
        assert_eq!(
            RemoteError::from_status(403, "no").kind,
            RemoteErrorKind::PermissionDenied
        );
        assert_eq!(
            RemoteError::from_status(429, "slow down").kind,
            RemoteErrorKind::RateLimited
        );
        let other = RemoteError::from_status(500, "boom");
        assert_eq!(other.kind, RemoteErrorKind::Other);
        assert_eq!(other.code().as_deref(), Some("500"));
    }

    #[test]
    fn test_transport_error_has_no_code() {
        assert_eq!(RemoteError::transport("reset").code(), None);
    }

    #[test]
    fn test_into_app_error() {
        let err: AppError = RemoteError::not_found("File not found: x").into();
        assert_eq!(err.kind, ErrorKind::NotFound);
        let err: AppError = RemoteError::rate_limited("quota").into();
        assert_eq!(err.kind, ErrorKind::ExternalService);
    }
}
