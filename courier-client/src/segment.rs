//! Segment Public API: Reverse ETL endpoints

use async_trait::async_trait;
use courier_core::domain::sync::{SyncHandle, SyncStatus};
use courier_core::dto::sync::{CreateSyncRequest, CreateSyncResponse, SyncStatusResponse};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder};
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::{handle_response, normalize_base_url};

/// Content type negotiated with the Segment Public API
const SEGMENT_CONTENT_TYPE: &str = "application/vnd.segment.v1alpha+json";

/// Remote operations needed to run and observe a Reverse ETL sync
///
/// Implemented by [`SegmentClient`]; tasks depend on this trait so the poll
/// policy can be exercised without a network.
#[async_trait]
pub trait SyncApi: Send + Sync {
    /// Triggers a manual sync and returns its handle
    async fn start_sync(&self, request: &CreateSyncRequest) -> Result<SyncHandle>;

    /// Fetches the current status of a sync
    ///
    /// `Ok(None)` means Segment answered without status data yet.
    async fn fetch_sync_status(&self, model_id: &str, sync_id: &str) -> Result<Option<SyncStatus>>;
}

/// HTTP client for the Segment Public API
#[derive(Debug, Clone)]
pub struct SegmentClient {
    /// Base URL of the API (e.g., "https://api.segmentapis.com")
    base_url: String,
    /// Bearer token
    token: String,
    /// HTTP client instance
    client: Client,
}

impl SegmentClient {
    /// Public Segment API endpoint
    pub const DEFAULT_BASE_URL: &'static str = "https://api.segmentapis.com";

    /// Create a client against the public Segment API
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_client(Self::DEFAULT_BASE_URL, token, Client::new())
    }

    /// Create a client with a custom base URL and HTTP client
    ///
    /// # Example
    /// ```
    /// use courier_client::SegmentClient;
    /// use reqwest::Client;
    ///
    /// let client = SegmentClient::with_client("http://localhost:28181/", "token", Client::new());
    /// assert_eq!(client.base_url(), "http://localhost:28181");
    /// ```
    pub fn with_client(base_url: impl Into<String>, token: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            token: token.into(),
            client,
        }
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Authenticated request builder for `path`
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, url)
            .bearer_auth(&self.token)
            .header(CONTENT_TYPE, SEGMENT_CONTENT_TYPE)
    }

    // =============================================================================
    // Reverse ETL
    // =============================================================================

    /// Trigger a manual Reverse ETL sync
    ///
    /// # Arguments
    /// * `request` - Source, model and subscription identifiers
    ///
    /// # Returns
    /// The handle of the started sync
    pub async fn start_sync(&self, request: &CreateSyncRequest) -> Result<SyncHandle> {
        let body = serde_json::to_vec(request)
            .map_err(|e| ClientError::InvalidRequest(format!("Failed to encode request: {}", e)))?;

        let response = self
            .request(Method::POST, "/reverse-etl-syncs")
            .body(body)
            .send()
            .await?;

        let created: CreateSyncResponse = handle_response(response).await?;

        created.into_handle().ok_or_else(|| {
            ClientError::ParseError(
                "response is missing data.reverseETLManualSync.syncId".to_string(),
            )
        })
    }

    /// Get the status of a Reverse ETL sync
    ///
    /// # Arguments
    /// * `model_id` - The model the sync belongs to
    /// * `sync_id` - The sync identifier
    ///
    /// # Returns
    /// The latest status, or `None` when the response carries no status data
    pub async fn fetch_sync_status(
        &self,
        model_id: &str,
        sync_id: &str,
    ) -> Result<Option<SyncStatus>> {
        if model_id.trim().is_empty() || sync_id.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "model id and sync id are required".to_string(),
            ));
        }

        let path = format!("/reverse-etl-models/{}/syncs/{}", model_id, sync_id);
        let response = self.request(Method::GET, &path).send().await?;

        let status: SyncStatusResponse = handle_response(response).await?;
        let status = status.into_status();

        debug!(
            "Sync {} status: {}",
            sync_id,
            status.as_ref().map_or("UNAVAILABLE", |s| s.state_label())
        );

        Ok(status)
    }
}

#[async_trait]
impl SyncApi for SegmentClient {
    async fn start_sync(&self, request: &CreateSyncRequest) -> Result<SyncHandle> {
        SegmentClient::start_sync(self, request).await
    }

    async fn fetch_sync_status(&self, model_id: &str, sync_id: &str) -> Result<Option<SyncStatus>> {
        SegmentClient::fetch_sync_status(self, model_id, sync_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::serve;
    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use courier_core::domain::sync::SyncState;
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured {
        requests: Arc<Mutex<Vec<(HeaderMap, String)>>>,
    }

    fn sync_request() -> CreateSyncRequest {
        CreateSyncRequest {
            source_id: "source".to_string(),
            model_id: "model".to_string(),
            subscription_id: "subscription".to_string(),
        }
    }

    #[test]
    fn test_client_defaults_to_public_api() {
        let client = SegmentClient::new("token");
        assert_eq!(client.base_url(), "https://api.segmentapis.com");
    }

    #[tokio::test]
    async fn test_start_sync_returns_handle() {
        let captured = Captured::default();
        let app = Router::new()
            .route(
                "/reverse-etl-syncs",
                post(|State(c): State<Captured>, headers: HeaderMap, body: String| async move {
                    c.requests.lock().unwrap().push((headers, body));
                    Json(json!({
                        "data": {
                            "reverseETLManualSync": {
                                "syncId": "sync-123",
                                "startedAt": "2025-01-01T00:00:00Z"
                            }
                        }
                    }))
                }),
            )
            .with_state(captured.clone());
        let base_url = serve(app).await;

        let client = SegmentClient::with_client(&base_url, "test-token", Client::new());
        let handle = client.start_sync(&sync_request()).await.unwrap();

        assert_eq!(handle.id(), "sync-123");
        assert!(handle.started_at().is_some());

        let requests = captured.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let (headers, body) = &requests[0];
        assert_eq!(headers["authorization"], "Bearer test-token");
        assert_eq!(headers["content-type"], SEGMENT_CONTENT_TYPE);
        let body: Value = serde_json::from_str(body).unwrap();
        assert_eq!(
            body,
            json!({"sourceId": "source", "modelId": "model", "subscriptionId": "subscription"})
        );
    }

    #[tokio::test]
    async fn test_start_sync_without_id_is_parse_error() {
        let app = Router::new().route(
            "/reverse-etl-syncs",
            post(|| async { Json(json!({"data": {"reverseETLManualSync": {}}})) }),
        );
        let base_url = serve(app).await;

        let client = SegmentClient::with_client(&base_url, "token", Client::new());
        let err = client.start_sync(&sync_request()).await.unwrap_err();
        assert!(matches!(err, ClientError::ParseError(_)));
    }

    #[tokio::test]
    async fn test_start_sync_error_status() {
        let app = Router::new().route(
            "/reverse-etl-syncs",
            post(|| async { (StatusCode::UNAUTHORIZED, "invalid token") }),
        );
        let base_url = serve(app).await;

        let client = SegmentClient::with_client(&base_url, "token", Client::new());
        let err = client.start_sync(&sync_request()).await.unwrap_err();
        match err {
            ClientError::ApiError { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid token");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_start_sync_malformed_body() {
        let app = Router::new().route("/reverse-etl-syncs", post(|| async { "not json" }));
        let base_url = serve(app).await;

        let client = SegmentClient::with_client(&base_url, "token", Client::new());
        let err = client.start_sync(&sync_request()).await.unwrap_err();
        assert!(matches!(err, ClientError::ParseError(_)));
    }

    #[tokio::test]
    async fn test_fetch_sync_status() {
        let app = Router::new().route(
            "/reverse-etl-models/{model_id}/syncs/{sync_id}",
            get(|Path((model_id, sync_id)): Path<(String, String)>| async move {
                assert_eq!(model_id, "model-123");
                Json(json!({
                    "data": {
                        "reverseETLSyncStatus": {"syncId": sync_id, "syncStatus": "SUCCESS"}
                    }
                }))
            }),
        );
        let base_url = serve(app).await;

        let client = SegmentClient::with_client(&base_url, "token", Client::new());
        let status = client
            .fetch_sync_status("model-123", "sync-456")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(status.sync_id.as_deref(), Some("sync-456"));
        assert_eq!(status.status, Some(SyncState::Success));
        assert!(status.is_terminal());
        assert!(status.is_successful());
    }

    #[tokio::test]
    async fn test_fetch_sync_status_without_data() {
        let app = Router::new().route(
            "/reverse-etl-models/{model_id}/syncs/{sync_id}",
            get(|| async { Json(json!({"data": {}})) }),
        );
        let base_url = serve(app).await;

        let client = SegmentClient::with_client(&base_url, "token", Client::new());
        let status = client.fetch_sync_status("model", "sync").await.unwrap();
        assert!(status.is_none());
    }

    #[tokio::test]
    async fn test_zoneless_timestamps_are_accepted() {
        let app = Router::new()
            .route(
                "/reverse-etl-syncs",
                post(|| async {
                    Json(json!({
                        "data": {
                            "reverseETLManualSync": {
                                "syncId": "sync-123",
                                "startedAt": "2025-01-01 00:00:00"
                            }
                        }
                    }))
                }),
            )
            .route(
                "/reverse-etl-models/{model_id}/syncs/{sync_id}",
                get(|| async {
                    Json(json!({
                        "data": {
                            "reverseETLSyncStatus": {
                                "syncId": "sync-123",
                                "syncStatus": "SUCCESS",
                                "finishedAt": "2025-01-01T00:00:12",
                                "extractPhase": {"addedCount": "n/a"}
                            }
                        }
                    }))
                }),
            );
        let base_url = serve(app).await;

        let client = SegmentClient::with_client(&base_url, "token", Client::new());
        let handle = client.start_sync(&sync_request()).await.unwrap();
        assert_eq!(handle.id(), "sync-123");
        assert_eq!(handle.started_at(), Some("2025-01-01 00:00:00"));

        let status = client
            .fetch_sync_status("model", handle.id())
            .await
            .unwrap()
            .unwrap();
        assert!(status.is_successful());
        assert_eq!(status.extract_phase.unwrap().added_count, None);
    }

    #[tokio::test]
    async fn test_fetch_sync_status_requires_ids() {
        let client = SegmentClient::new("token");
        let err = client.fetch_sync_status("", "sync").await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_sync_api_delegates_to_client() {
        let app = Router::new().route(
            "/reverse-etl-models/{model_id}/syncs/{sync_id}",
            get(|| async {
                Json(json!({"data": {"reverseETLSyncStatus": {"syncStatus": "IN_PROGRESS"}}}))
            }),
        );
        let base_url = serve(app).await;

        let api: Arc<dyn SyncApi> =
            Arc::new(SegmentClient::with_client(&base_url, "token", Client::new()));
        let status = api.fetch_sync_status("model", "sync").await.unwrap().unwrap();
        assert_eq!(status.status, Some(SyncState::InProgress));
        assert!(!status.is_terminal());
    }
}
