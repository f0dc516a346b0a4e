//! SendGrid command handlers

use anyhow::Result;
use clap::Subcommand;
use courier_client::SendGridClient;
use courier_tasks::CancellationToken;
use courier_tasks::sendgrid::{AttachmentSource, MailParams, MailSendTask};
use std::sync::Arc;

use super::run_task;
use crate::config::Config;

/// SendGrid subcommands
#[derive(Subcommand, Debug)]
pub enum SendGridCommands {
    /// Send an email
    Send {
        /// SendGrid API key
        #[arg(long, env = "SENDGRID_API_KEY", hide_env_values = true)]
        api_key: String,

        /// SendGrid API base URL
        #[arg(long, env = "SENDGRID_API_URL", default_value = SendGridClient::DEFAULT_BASE_URL)]
        api_url: String,

        /// Sender address
        #[arg(long)]
        from: String,

        /// Recipient address (repeatable)
        #[arg(long, required = true)]
        to: Vec<String>,

        /// Copy recipient address (repeatable)
        #[arg(long)]
        cc: Vec<String>,

        #[arg(long)]
        subject: Option<String>,

        /// Plain text body
        #[arg(long = "text")]
        text_content: Option<String>,

        /// HTML body
        #[arg(long = "html")]
        html_content: Option<String>,

        /// File to attach, as PATH or PATH=CONTENT_TYPE (repeatable)
        #[arg(long = "attachment")]
        attachments: Vec<AttachmentSource>,

        /// Image to embed, referenced from HTML as cid:<file name> (repeatable)
        #[arg(long = "embedded-image")]
        embedded_images: Vec<AttachmentSource>,
    },
}

/// Handle SendGrid commands
pub async fn handle_sendgrid_command(
    command: SendGridCommands,
    config: &Config,
    cancel: CancellationToken,
) -> Result<()> {
    match command {
        SendGridCommands::Send {
            api_key,
            api_url,
            from,
            to,
            cc,
            subject,
            text_content,
            html_content,
            attachments,
            embedded_images,
        } => {
            let client = SendGridClient::with_client(api_url, api_key, config.http.clone());
            let task = MailSendTask::new(
                Arc::new(client),
                MailParams {
                    from,
                    to,
                    cc,
                    subject,
                    text_content,
                    html_content,
                    attachments,
                    embedded_images,
                },
            );
            run_task(task, cancel).await
        }
    }
}
