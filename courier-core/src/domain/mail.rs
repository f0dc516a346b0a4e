//! Mail domain types
//!
//! Mirrors the SendGrid v3 `mail/send` payload.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Text shown by clients that cannot render the HTML part
pub const TEXT_FALLBACK: &str = "Please view this email in a modern email client";

/// Default MIME type of attachments
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    pub email: String,
}

impl EmailAddress {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

/// Recipients and subject of one delivery
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personalization {
    pub to: Vec<EmailAddress>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<EmailAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

/// One body part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    #[serde(rename = "type")]
    pub mime_type: String,
    pub value: String,
}

impl Content {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            mime_type: "text/plain".to_string(),
            value: value.into(),
        }
    }

    pub fn html(value: impl Into<String>) -> Self {
        Self {
            mime_type: "text/html".to_string(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    Attachment,
    Inline,
}

/// Attachment with base64-encoded content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub content: String,
    pub filename: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub disposition: Disposition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
}

/// Complete mail payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mail {
    pub personalizations: Vec<Personalization>,
    pub from: EmailAddress,
    pub content: Vec<Content>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

/// Raw answer of the mail API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailReceipt {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}
