//! Twilio Notify endpoint

use courier_core::domain::notify::Notification;
use reqwest::Client;
use tracing::debug;

use crate::check_status;
use crate::error::{ClientError, Result};

/// HTTP client for Twilio Notify services
///
/// Notify URLs are service specific
/// (`https://notify.twilio.com/v1/Services/<SID>/Notifications`), so the URL is
/// passed per call rather than fixed at construction.
#[derive(Debug, Clone)]
pub struct TwilioClient {
    account_sid: String,
    auth_token: String,
    client: Client,
}

impl TwilioClient {
    pub fn new(account_sid: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self::with_client(account_sid, auth_token, Client::new())
    }

    pub fn with_client(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        client: Client,
    ) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            client,
        }
    }

    /// Account the client authenticates as
    pub fn account_sid(&self) -> &str {
        &self.account_sid
    }

    /// Create a notification on the Notify service at `url`
    pub async fn notify(&self, url: &str, notification: &Notification) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::InvalidRequest(format!(
                "notify url must start with http:// or https://, got {:?}",
                url
            )));
        }

        let response = self
            .client
            .post(url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(notification)
            .send()
            .await?;

        let response = check_status(response).await?;
        debug!("Twilio accepted notification with status {}", response.status());

        Ok(())
    }
}
