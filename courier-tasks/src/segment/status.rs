//! Reverse ETL status task

use async_trait::async_trait;
use courier_client::SyncApi;
use courier_core::domain::sync::SyncStatus;
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::{Result, TaskError};
use crate::task::{Task, until_cancelled};

/// Current status of a sync, absent when Segment has nothing to report yet
#[derive(Debug, Clone, Serialize)]
pub struct StatusOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SyncStatus>,
}

/// Reads the status of a Segment Reverse ETL sync once
pub struct StatusTask {
    api: Arc<dyn SyncApi>,
    model_id: String,
    sync_id: String,
}

impl StatusTask {
    pub fn new(
        api: Arc<dyn SyncApi>,
        model_id: impl Into<String>,
        sync_id: impl Into<String>,
    ) -> Self {
        Self {
            api,
            model_id: model_id.into(),
            sync_id: sync_id.into(),
        }
    }
}

#[async_trait]
impl Task for StatusTask {
    type Output = StatusOutput;

    fn kind(&self) -> &'static str {
        "segment.reverseetl.Status"
    }

    async fn run(&self, cancel: CancellationToken) -> Result<StatusOutput> {
        if self.model_id.trim().is_empty() || self.sync_id.trim().is_empty() {
            return Err(TaskError::InvalidConfig(
                "model_id and sync_id cannot be empty".to_string(),
            ));
        }

        let status = until_cancelled(
            &cancel,
            "fetching Segment Reverse ETL sync status",
            self.api.fetch_sync_status(&self.model_id, &self.sync_id),
        )
        .await?;

        info!(
            "Segment Reverse ETL sync {} status={}",
            self.sync_id,
            status.as_ref().map_or("UNAVAILABLE", SyncStatus::state_label)
        );

        Ok(StatusOutput { status })
    }
}
