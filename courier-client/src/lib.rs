//! Courier HTTP Clients
//!
//! Small, type-safe HTTP clients for the third-party APIs the Courier tasks talk to:
//! - [`SegmentClient`]: Segment Public API (Reverse ETL syncs)
//! - [`SendGridClient`]: SendGrid v3 mail
//! - [`TwilioClient`]: Twilio Notify
//!
//! Every client wraps a [`reqwest::Client`], which can be shared between clients
//! and configured through [`HttpOptions`].
//!
//! # Example
//!
//! ```no_run
//! use courier_client::SegmentClient;
//! use courier_core::dto::sync::CreateSyncRequest;
//!
//! #[tokio::main]
//! async fn main() -> courier_client::Result<()> {
//!     let client = SegmentClient::new("segment-token");
//!
//!     let handle = client.start_sync(&CreateSyncRequest {
//!         source_id: "warehouse".to_string(),
//!         model_id: "model".to_string(),
//!         subscription_id: "subscription".to_string(),
//!     }).await?;
//!
//!     println!("Triggered sync: {}", handle.id());
//!     Ok(())
//! }
//! ```

pub mod error;
mod options;
mod segment;
mod sendgrid;
mod twilio;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use options::HttpOptions;
pub use segment::{SegmentClient, SyncApi};
pub use sendgrid::SendGridClient;
pub use twilio::TwilioClient;

use serde::de::DeserializeOwned;

// =============================================================================
// Response Handlers
// =============================================================================

/// Check the status code of a response
///
/// Returns the response untouched on 2xx, otherwise an [`ClientError::ApiError`]
/// carrying the response body.
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ClientError::api_error(status.as_u16(), error_text));
    }

    Ok(response)
}

/// Handle an API response and deserialize its JSON body
///
/// The body is read as text first so that decoding errors can name what was
/// received.
pub(crate) async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let response = check_status(response).await?;
    let body = response.text().await?;

    serde_json::from_str(&body).map_err(|e| {
        ClientError::ParseError(format!(
            "Failed to parse JSON response: {} (body: {})",
            e,
            truncate(&body, 200)
        ))
    })
}

/// Normalize a base URL by dropping trailing slashes
pub(crate) fn normalize_base_url(base_url: impl Into<String>) -> String {
    base_url.into().trim_end_matches('/').to_string()
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
