//! Task abstraction
//!
//! Every plugin task takes its parameters pre-resolved at construction and is
//! run once with a cancellation token supplied by the host.

use async_trait::async_trait;
use serde::Serialize;
use std::future::Future;
use tokio_util::sync::CancellationToken;

use crate::error::{Result, TaskError};

/// A runnable workflow task
#[async_trait]
pub trait Task: Send + Sync {
    /// Output handed back to the workflow
    type Output: Serialize + Send;

    /// Stable task type name, used in logs
    fn kind(&self) -> &'static str;

    /// Runs the task to completion
    ///
    /// Implementations must stop promptly once `cancel` fires.
    async fn run(&self, cancel: CancellationToken) -> Result<Self::Output>;
}

/// Await `future` unless `cancel` fires first
pub(crate) async fn until_cancelled<T, E, F>(
    cancel: &CancellationToken,
    what: &str,
    future: F,
) -> Result<T>
where
    F: Future<Output = std::result::Result<T, E>>,
    E: Into<TaskError>,
{
    tokio::select! {
        _ = cancel.cancelled() => Err(TaskError::Cancelled(what.to_string())),
        result = future => result.map_err(Into::into),
    }
}
