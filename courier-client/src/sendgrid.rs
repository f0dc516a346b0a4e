//! SendGrid v3 mail endpoint

use courier_core::domain::mail::{Mail, MailReceipt};
use reqwest::Client;
use std::collections::HashMap;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::normalize_base_url;

/// HTTP client for the SendGrid v3 API
#[derive(Debug, Clone)]
pub struct SendGridClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl SendGridClient {
    /// Public SendGrid API endpoint
    pub const DEFAULT_BASE_URL: &'static str = "https://api.sendgrid.com";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_client(Self::DEFAULT_BASE_URL, api_key, Client::new())
    }

    pub fn with_client(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        client: Client,
    ) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            api_key: api_key.into(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a mail
    ///
    /// # Returns
    /// Status code, headers and body of the API answer. Any non-2xx answer is
    /// turned into [`ClientError::ApiError`]; a blank API key is rejected
    /// before anything is sent.
    pub async fn send(&self, mail: &Mail) -> Result<MailReceipt> {
        if self.api_key.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "SendGrid API key cannot be empty".to_string(),
            ));
        }

        let url = format!("{}/v3/mail/send", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(mail)
            .send()
            .await?;

        let status = response.status();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::api_error(status.as_u16(), body));
        }

        debug!("SendGrid accepted mail with status {}", status);

        Ok(MailReceipt {
            status_code: status.as_u16(),
            headers,
            body,
        })
    }
}
