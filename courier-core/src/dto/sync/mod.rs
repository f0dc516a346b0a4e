//! Reverse ETL sync DTOs
//!
//! Segment wraps every payload in a `data` object keyed by operation name.

use serde::{Deserialize, Serialize};

use crate::domain::sync::{SyncHandle, SyncStatus, lenient};

/// Request to trigger a manual Reverse ETL sync
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSyncRequest {
    /// Warehouse source backing the model
    pub source_id: String,
    /// Reverse ETL model to execute
    pub model_id: String,
    /// Subscription (mapping) to deliver through
    pub subscription_id: String,
}

/// Response to [`CreateSyncRequest`]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSyncResponse {
    #[serde(default)]
    pub data: Option<CreateSyncData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSyncData {
    #[serde(default, rename = "reverseETLManualSync")]
    pub manual_sync: Option<ManualSync>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualSync {
    #[serde(default)]
    pub sync_id: Option<String>,
    /// Kept as sent; an unexpected shape never hides the sync id
    #[serde(default, deserialize_with = "lenient")]
    pub started_at: Option<String>,
}

impl CreateSyncResponse {
    /// Extracts the sync handle, `None` when the sync id is missing or blank
    pub fn into_handle(self) -> Option<SyncHandle> {
        let sync = self.data?.manual_sync?;
        let sync_id = sync.sync_id.filter(|id| !id.trim().is_empty())?;
        Some(SyncHandle::new(sync_id, sync.started_at))
    }
}

/// Response to a sync status request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncStatusResponse {
    #[serde(default)]
    pub data: Option<SyncStatusData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncStatusData {
    #[serde(default, rename = "reverseETLSyncStatus")]
    pub sync_status: Option<SyncStatus>,
}

impl SyncStatusResponse {
    /// Extracts the status, `None` when Segment has nothing to report yet
    pub fn into_status(self) -> Option<SyncStatus> {
        self.data?.sync_status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sync::SyncState;

    #[test]
    fn test_request_uses_camel_case() {
        let req = CreateSyncRequest {
            source_id: "source".to_string(),
            model_id: "model".to_string(),
            subscription_id: "subscription".to_string(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "sourceId": "source",
                "modelId": "model",
                "subscriptionId": "subscription"
            })
        );
    }

    #[test]
    fn test_create_response_into_handle() {
        let response: CreateSyncResponse = serde_json::from_str(
            r#"{"data":{"reverseETLManualSync":{"syncId":"sync-123","startedAt":"2025-01-01T00:00:00Z"}}}"#,
        )
        .unwrap();
        let handle = response.into_handle().unwrap();
        assert_eq!(handle.id(), "sync-123");
        assert_eq!(handle.started_at(), Some("2025-01-01T00:00:00Z"));
    }

    #[test]
    fn test_unusual_start_time_keeps_handle() {
        for started_at in [r#""2025-01-01 00:00:00""#, "1735689600", "{}"] {
            let json = format!(
                r#"{{"data":{{"reverseETLManualSync":{{"syncId":"sync-123","startedAt":{}}}}}}}"#,
                started_at
            );
            let response: CreateSyncResponse = serde_json::from_str(&json).unwrap();
            let handle = response.into_handle().unwrap();
            assert_eq!(handle.id(), "sync-123");
        }
    }

    #[test]
    fn test_terminal_status_with_zoneless_finish_time() {
        let response: SyncStatusResponse = serde_json::from_str(
            r#"{"data":{"reverseETLSyncStatus":{"syncId":"sync-123","syncStatus":"SUCCESS","finishedAt":"2025-01-01T00:00:12"}}}"#,
        )
        .unwrap();
        let status = response.into_status().unwrap();
        assert!(status.is_terminal());
        assert_eq!(status.finished_at.as_deref(), Some("2025-01-01T00:00:12"));
    }

    #[test]
    fn test_create_response_without_id() {
        let empty: CreateSyncResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.into_handle().is_none());

        let blank: CreateSyncResponse =
            serde_json::from_str(r#"{"data":{"reverseETLManualSync":{"syncId":" "}}}"#).unwrap();
        assert!(blank.into_handle().is_none());
    }

    #[test]
    fn test_status_response_into_status() {
        let response: SyncStatusResponse = serde_json::from_str(
            r#"{"data":{"reverseETLSyncStatus":{"syncId":"sync-456","syncStatus":"SUCCESS"}}}"#,
        )
        .unwrap();
        let status = response.into_status().unwrap();
        assert_eq!(status.sync_id.as_deref(), Some("sync-456"));
        assert_eq!(status.status, Some(SyncState::Success));
    }

    #[test]
    fn test_status_response_without_data() {
        let response: SyncStatusResponse = serde_json::from_str(r#"{"data":null}"#).unwrap();
        assert!(response.into_status().is_none());
    }
}
