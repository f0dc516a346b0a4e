//! SendGrid mail task
//!
//! Builds a v3 mail payload from plain parameters, reads attachments from disk
//! and sends the mail in one request.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use courier_client::SendGridClient;
use courier_core::domain::mail::{
    Attachment, Content, DEFAULT_CONTENT_TYPE, Disposition, EmailAddress, Mail, MailReceipt,
    Personalization, TEXT_FALLBACK,
};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{Result, TaskError};
use crate::task::{Task, until_cancelled};

/// A local file to attach
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentSource {
    pub path: PathBuf,
    /// File name shown to the recipient, defaults to the path's file name
    pub name: Option<String>,
    /// MIME type, defaults to `application/octet-stream`
    pub content_type: Option<String>,
}

impl AttachmentSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            name: None,
            content_type: None,
        }
    }

    fn file_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.path.display().to_string())
        })
    }

    async fn load(&self, disposition: Disposition) -> Result<Attachment> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| TaskError::Attachment {
                path: self.path.clone(),
                source,
            })?;

        let filename = self.file_name();
        let content_id = match disposition {
            Disposition::Inline => Some(filename.clone()),
            Disposition::Attachment => None,
        };

        Ok(Attachment {
            content: STANDARD.encode(bytes),
            mime_type: self
                .content_type
                .clone()
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            filename,
            disposition,
            content_id,
        })
    }
}

/// Parses `PATH` or `PATH=CONTENT_TYPE`
impl FromStr for AttachmentSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (path, content_type) = match s.split_once('=') {
            Some((path, content_type)) => (path, Some(content_type.trim())),
            None => (s, None),
        };

        if path.trim().is_empty() {
            return Err(format!("invalid attachment {:?}: missing path", s));
        }
        if content_type.is_some_and(str::is_empty) {
            return Err(format!("invalid attachment {:?}: empty content type", s));
        }

        Ok(Self {
            path: PathBuf::from(path.trim()),
            name: None,
            content_type: content_type.map(str::to_string),
        })
    }
}

/// Parameters of a mail
#[derive(Debug, Clone, Default)]
pub struct MailParams {
    pub from: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub subject: Option<String>,
    /// Plain text part; an empty value is replaced by a short fallback
    pub text_content: Option<String>,
    pub html_content: Option<String>,
    pub attachments: Vec<AttachmentSource>,
    /// Images referenced from the HTML part by file name (`cid:<name>`)
    pub embedded_images: Vec<AttachmentSource>,
}

impl MailParams {
    fn validate(&self) -> Result<()> {
        if self.from.trim().is_empty() {
            return Err(TaskError::InvalidConfig("from cannot be empty".to_string()));
        }

        if self.to.is_empty() {
            return Err(TaskError::InvalidConfig(
                "at least one recipient is required".to_string(),
            ));
        }

        if let Some(address) = self.to.iter().chain(&self.cc).find(|a| a.trim().is_empty()) {
            return Err(TaskError::InvalidConfig(format!(
                "invalid recipient address {:?}",
                address
            )));
        }

        Ok(())
    }
}

/// Builds the mail payload, reading attachments from disk
pub async fn build_mail(params: &MailParams) -> Result<Mail> {
    params.validate()?;

    let mut content = Vec::new();
    if let Some(text) = &params.text_content {
        if text.is_empty() {
            content.push(Content::text(TEXT_FALLBACK));
        } else {
            content.push(Content::text(text.as_str()));
        }
    }
    if let Some(html) = &params.html_content {
        content.push(Content::html(html.as_str()));
    }

    let mut attachments = Vec::with_capacity(params.attachments.len() + params.embedded_images.len());
    for source in &params.attachments {
        attachments.push(source.load(Disposition::Attachment).await?);
    }
    for source in &params.embedded_images {
        attachments.push(source.load(Disposition::Inline).await?);
    }

    Ok(Mail {
        personalizations: vec![Personalization {
            to: params.to.iter().map(EmailAddress::new).collect(),
            cc: params.cc.iter().map(EmailAddress::new).collect(),
            subject: params.subject.clone(),
        }],
        from: EmailAddress::new(params.from.as_str()),
        content,
        attachments,
    })
}

/// Sends an email through SendGrid
pub struct MailSendTask {
    client: Arc<SendGridClient>,
    params: MailParams,
}

impl MailSendTask {
    pub fn new(client: Arc<SendGridClient>, params: MailParams) -> Self {
        Self { client, params }
    }
}

#[async_trait]
impl Task for MailSendTask {
    type Output = MailReceipt;

    fn kind(&self) -> &'static str {
        "sendgrid.SendGridMailSend"
    }

    async fn run(&self, cancel: CancellationToken) -> Result<MailReceipt> {
        let mail = build_mail(&self.params).await?;

        debug!(
            "Sending an email to {} with {} attachment(s)",
            self.params.to.join(", "),
            mail.attachments.len()
        );

        let receipt = until_cancelled(&cancel, "sending mail", self.client.send(&mail)).await?;

        info!("SendGrid accepted mail with status {}", receipt.status_code);

        Ok(receipt)
    }
}
