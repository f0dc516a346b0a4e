//! Twilio Notify task

use async_trait::async_trait;
use courier_client::TwilioClient;
use courier_core::domain::notify::Notification;
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::{Result, TaskError};
use crate::task::{Task, until_cancelled};

/// What was delivered, echoed back to the workflow
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyOutput {
    pub url: String,
    pub notification: Notification,
}

/// Sends a notification to a Twilio Notify service
pub struct NotifyTask {
    client: Arc<TwilioClient>,
    url: String,
    notification: Notification,
}

impl NotifyTask {
    pub fn new(client: Arc<TwilioClient>, url: impl Into<String>, notification: Notification) -> Self {
        Self {
            client,
            url: url.into(),
            notification,
        }
    }
}

#[async_trait]
impl Task for NotifyTask {
    type Output = NotifyOutput;

    fn kind(&self) -> &'static str {
        "twilio.notify.TwilioAlert"
    }

    async fn run(&self, cancel: CancellationToken) -> Result<NotifyOutput> {
        if self.notification.body.trim().is_empty() {
            return Err(TaskError::InvalidConfig("body cannot be empty".to_string()));
        }

        if !self.notification.is_addressed() {
            return Err(TaskError::InvalidConfig(
                "identity or tag is required".to_string(),
            ));
        }

        until_cancelled(
            &cancel,
            "sending notification",
            self.client.notify(&self.url, &self.notification),
        )
        .await?;

        info!("Twilio notification sent to {}", self.url);

        Ok(NotifyOutput {
            url: self.url.clone(),
            notification: self.notification.clone(),
        })
    }
}
