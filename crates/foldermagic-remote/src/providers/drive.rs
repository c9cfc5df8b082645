//! Drive v3 REST provider.
//!
//! Grouped requests are executed client-side rather than through the Drive
//! batch endpoint: each sub-request of a group is its own HTTP call, run
//! concurrently (bounded by `max_concurrency`) and answered in completion
//! order with its submission tag. A group is therefore never rejected as a
//! whole by this provider.

use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use foldermagic_core::config::remote::DriveConfig;
use foldermagic_core::error::{AppError, ErrorKind};
use foldermagic_core::result::AppResult;
use foldermagic_core::traits::remote::{
    BatchRequest, BatchResponse, RemoteEntryKind, RemoteError, RemoteMetadata, RemoteResponse,
    RemoteStore, UpdatePatch,
};

/// MIME type Drive uses for folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

const METADATA_FIELDS: &str = "id,name,mimeType,parents";

/// Drive REST API provider.
#[derive(Debug, Clone)]
pub struct DriveRemoteStore {
    client: Client,
    base_url: String,
    access_token: String,
    max_concurrency: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    mime_type: String,
    #[serde(default)]
    parents: Vec<String>,
}

impl From<DriveFile> for RemoteMetadata {
    fn from(file: DriveFile) -> Self {
        let kind = if file.mime_type == FOLDER_MIME_TYPE {
            RemoteEntryKind::Folder
        } else {
            RemoteEntryKind::File
        };
        RemoteMetadata {
            id: file.id,
            name: file.name,
            kind,
            parents: file.parents,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DriveErrorBody {
    error: DriveErrorDetail,
}

#[derive(Debug, Deserialize)]
struct DriveErrorDetail {
    message: String,
}

impl DriveRemoteStore {
    /// Create a new Drive provider.
    pub fn new(config: &DriveConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    "Failed to build Drive HTTP client",
                    e,
                )
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
            max_concurrency: config.max_concurrency.max(1),
        })
    }

    /// Build `<base_url>/<segments...>?<query>`. Segments are percent-encoded,
    /// so ids cannot alter the path.
    fn url(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, RemoteError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| RemoteError::transport(format!("Invalid Drive URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| {
                RemoteError::transport(format!("Invalid Drive base URL: {}", self.base_url))
            })?
            .extend(segments);
        url.query_pairs_mut()
            .append_pair("supportsAllDrives", "true")
            .extend_pairs(query);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.access_token)
    }

    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, RemoteError> {
        let response = builder.send().await.map_err(transport_error)?;
        let response = check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| RemoteError::transport(format!("Invalid Drive response: {e}")))
    }
}

/// Quote a value for a Drive search query (`q`).
fn quote_query_value(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

fn transport_error(err: reqwest::Error) -> RemoteError {
    match err.status() {
        Some(status) => RemoteError::from_status(status.as_u16(), err.to_string()),
        None => RemoteError::transport(err.to_string()),
    }
}

async fn check_status(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<DriveErrorBody>(&body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| format!("Drive request failed with status {status}"));
    Err(RemoteError::from_status(status.as_u16(), message))
}

#[async_trait]
impl RemoteStore for DriveRemoteStore {
    fn provider_type(&self) -> &str {
        "drive"
    }

    async fn ensure_ready(&self) -> AppResult<()> {
        if self.access_token.trim().is_empty() {
            return Err(AppError::external_service(
                "Drive client has no access token; authenticate before applying changes",
            ));
        }
        Ok(())
    }

    async fn get_metadata(&self, id: &str) -> Result<RemoteMetadata, RemoteError> {
        let url = self.url(&["files", id], &[("fields", METADATA_FIELDS)])?;
        let file: DriveFile = self.send(self.request(Method::GET, url)).await?;
        Ok(file.into())
    }

    async fn list_children(&self, parent_id: &str) -> Result<Vec<RemoteMetadata>, RemoteError> {
        let q = format!(
            "{} in parents and trashed = false",
            quote_query_value(parent_id)
        );
        let fields = format!("nextPageToken,files({METADATA_FIELDS})");
        let mut children = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![
                ("q", q.as_str()),
                ("fields", fields.as_str()),
                ("orderBy", "folder,name"),
                ("pageSize", "1000"),
                ("includeItemsFromAllDrives", "true"),
            ];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }
            let url = self.url(&["files"], &query)?;
            let page: DriveFileList = self.send(self.request(Method::GET, url)).await?;
            children.extend(page.files.into_iter().map(RemoteMetadata::from));

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(parent_id, count = children.len(), "Listed Drive children");
        Ok(children)
    }

    async fn create(&self, parent_id: &str, name: &str) -> Result<String, RemoteError> {
        let url = self.url(&["files"], &[("fields", "id")])?;
        let body = json!({
            "name": name,
            "mimeType": FOLDER_MIME_TYPE,
            "parents": [parent_id],
        });
        let created: RemoteResponse = self
            .send(self.request(Method::POST, url).json(&body))
            .await?;
        Ok(created.id)
    }

    async fn update(&self, id: &str, patch: &UpdatePatch) -> Result<RemoteResponse, RemoteError> {
        let remove = patch.remove_parents.join(",");
        let mut query = vec![("fields", "id")];
        if let Some(add) = patch.add_parent.as_deref() {
            query.push(("addParents", add));
        }
        if !remove.is_empty() {
            query.push(("removeParents", remove.as_str()));
        }
        let url = self.url(&["files", id], &query)?;

        let body = match &patch.name {
            Some(name) => json!({ "name": name }),
            None => json!({}),
        };
        self.send(self.request(Method::PATCH, url).json(&body)).await
    }

    async fn execute_batch(
        &self,
        requests: Vec<BatchRequest>,
    ) -> Result<Vec<BatchResponse>, RemoteError> {
        let responses = stream::iter(requests)
            .map(|BatchRequest { tag, request }| async move {
                let result = self.execute(&request).await;
                BatchResponse { tag, result }
            })
            .buffer_unordered(self.max_concurrency)
            .collect::<Vec<_>>()
            .await;
        Ok(responses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(token: &str) -> DriveRemoteStore {
        let config = DriveConfig {
            access_token: token.to_string(),
            ..DriveConfig::default()
        };
        DriveRemoteStore::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_missing_token_is_not_ready() {
        assert!(store("").ensure_ready().await.is_err());
        assert!(store("ya29.token").ensure_ready().await.is_ok());
    }

    #[test]
    fn test_url_includes_query() {
        let url = store("t")
            .url(&["files", "abc"], &[("fields", "id"), ("addParents", "g")])
            .unwrap();
        let query = url.query().unwrap();
        assert!(url.path().ends_with("/drive/v3/files/abc"));
        assert!(query.contains("supportsAllDrives=true"));
        assert!(query.contains("addParents=g"));
    }

    #[test]
    fn test_url_encodes_ids_as_one_segment() {
        let url = store("t").url(&["files", "a/b c?x"], &[]).unwrap();
        assert!(url.path().ends_with("/drive/v3/files/a%2Fb%20c%3Fx"));
        assert_eq!(url.query(), Some("supportsAllDrives=true"));
    }

    #[test]
    fn test_query_value_is_escaped() {
        assert_eq!(quote_query_value("abc"), "'abc'");
        assert_eq!(quote_query_value("it's"), r"'it\'s'");
        assert_eq!(quote_query_value(r"a\b"), r"'a\\b'");
    }

    #[test]
    fn test_folder_mime_maps_to_folder_kind() {
        let file = DriveFile {
            id: "x".into(),
            name: "Docs".into(),
            mime_type: FOLDER_MIME_TYPE.into(),
            parents: vec!["root".into()],
        };
        let meta = RemoteMetadata::from(file);
        assert!(meta.is_folder());
    }
}
