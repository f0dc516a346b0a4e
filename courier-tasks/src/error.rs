//! Task error types

use courier_client::ClientError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for task runs
pub type Result<T> = std::result::Result<T, TaskError>;

/// Errors surfaced to the workflow when a task run fails
#[derive(Debug, Error)]
pub enum TaskError {
    /// Parameters rejected before any request was made
    #[error("invalid task configuration: {0}")]
    InvalidConfig(String),

    /// A remote request failed outside of a poll
    #[error(transparent)]
    Request(#[from] ClientError),

    /// A status request failed while waiting for a sync; polling stopped
    #[error("failed to fetch status of Segment Reverse ETL sync {sync_id}: {source}")]
    StatusFetch {
        sync_id: String,
        #[source]
        source: ClientError,
    },

    /// The sync did not reach a terminal status in time
    #[error(
        "Segment Reverse ETL sync {sync_id} did not finish within {elapsed:?} (last status: {last_status})"
    )]
    Timeout {
        sync_id: String,
        elapsed: Duration,
        last_status: String,
    },

    /// The sync finished but not successfully, and the task was asked to fail
    #[error("Segment Reverse ETL sync {sync_id} failed with status: {status}")]
    JobFailed { sync_id: String, status: String },

    #[error("task cancelled: {0}")]
    Cancelled(String),

    #[error("failed to read attachment {}: {source}", path.display())]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
