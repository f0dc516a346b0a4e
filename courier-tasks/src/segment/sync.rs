//! Reverse ETL sync task
//!
//! Triggers a manual sync, then (when asked to wait) polls its status until it
//! reaches a terminal state and applies the failure policy.

use async_trait::async_trait;
use courier_client::{ClientError, SyncApi};
use courier_core::domain::sync::{SyncHandle, SyncStatus};
use courier_core::dto::sync::CreateSyncRequest;
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{Result, TaskError};
use crate::poll::{PollConfig, PollError, poll_until_terminal};
use crate::task::{Task, until_cancelled};

/// Parameters of a sync run
#[derive(Debug, Clone, Default)]
pub struct SyncParams {
    /// Warehouse source backing the sync
    pub source_id: String,
    /// Reverse ETL model to execute
    pub model_id: String,
    /// Subscription (mapping) to deliver through
    pub subscription_id: String,
    /// Wait for the sync to finish before completing the task
    pub wait: bool,
    /// Poll interval, max wait and failure policy used when `wait` is set;
    /// a zero interval is rejected either way
    pub poll: PollConfig,
}

impl SyncParams {
    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("source_id", &self.source_id),
            ("model_id", &self.model_id),
            ("subscription_id", &self.subscription_id),
        ] {
            if value.trim().is_empty() {
                return Err(TaskError::InvalidConfig(format!("{} cannot be empty", name)));
            }
        }

        if self.poll.interval.is_zero() {
            return Err(TaskError::InvalidConfig(
                "poll_interval must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Output of a sync run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutput {
    pub sync_id: String,
    /// Handle returned when the sync was created
    pub created: SyncHandle,
    /// Final status, only present when the task waited
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SyncStatus>,
}

/// Triggers a Segment Reverse ETL sync
pub struct SyncTask {
    api: Arc<dyn SyncApi>,
    params: SyncParams,
}

impl SyncTask {
    pub fn new(api: Arc<dyn SyncApi>, params: SyncParams) -> Self {
        Self { api, params }
    }

    /// Polls the sync until it reaches a terminal status
    async fn wait_for_completion(
        &self,
        handle: &SyncHandle,
        cancel: &CancellationToken,
    ) -> Result<SyncStatus> {
        let model_id = self.params.model_id.as_str();
        let sync_id = handle.id();

        poll_until_terminal(
            &self.params.poll,
            cancel,
            || self.api.fetch_sync_status(model_id, sync_id),
            SyncStatus::is_terminal,
        )
        .await
        .map_err(|e| poll_failure(sync_id, e))
    }
}

/// Describes the last sample seen before polling stopped
fn last_status(last_seen: Option<SyncStatus>) -> String {
    last_seen.map_or("UNAVAILABLE", |s| s.state_label()).to_string()
}

fn poll_failure(sync_id: &str, err: PollError<SyncStatus, ClientError>) -> TaskError {
    match err {
        PollError::Fetch { attempts, source } => {
            warn!(
                "Status request {} for sync {} failed, giving up: {}",
                attempts, sync_id, source
            );
            TaskError::StatusFetch {
                sync_id: sync_id.to_string(),
                source,
            }
        }
        PollError::Timeout {
            elapsed, last_seen, ..
        } => TaskError::Timeout {
            sync_id: sync_id.to_string(),
            elapsed,
            last_status: last_status(last_seen),
        },
        PollError::Cancelled { last_seen, .. } => TaskError::Cancelled(format!(
            "waiting for Segment Reverse ETL sync {} (last status: {})",
            sync_id,
            last_status(last_seen)
        )),
        PollError::InvalidInterval => {
            TaskError::InvalidConfig("poll_interval must be greater than 0".to_string())
        }
    }
}

#[async_trait]
impl Task for SyncTask {
    type Output = SyncOutput;

    fn kind(&self) -> &'static str {
        "segment.reverseetl.Sync"
    }

    async fn run(&self, cancel: CancellationToken) -> Result<SyncOutput> {
        self.params.validate()?;

        let request = CreateSyncRequest {
            source_id: self.params.source_id.clone(),
            model_id: self.params.model_id.clone(),
            subscription_id: self.params.subscription_id.clone(),
        };

        let handle = until_cancelled(
            &cancel,
            "triggering Segment Reverse ETL sync",
            self.api.start_sync(&request),
        )
        .await?;

        info!("Triggered Segment Reverse ETL sync with id={}", handle.id());

        if !self.params.wait {
            return Ok(SyncOutput {
                sync_id: handle.id().to_string(),
                created: handle,
                status: None,
            });
        }

        let status = self.wait_for_completion(&handle, &cancel).await?;

        info!(
            "Segment Reverse ETL sync {} finished with status={}",
            handle.id(),
            status.state_label()
        );
        if let Some(run_time) = status.run_time() {
            debug!("Sync {} ran for {}s", handle.id(), run_time.num_seconds());
        }

        if self.params.poll.fail_on_failure && !status.is_successful() {
            return Err(TaskError::JobFailed {
                sync_id: handle.id().to_string(),
                status: status.state_label().to_string(),
            });
        }

        Ok(SyncOutput {
            sync_id: handle.id().to_string(),
            created: handle,
            status: Some(status),
        })
    }
}
