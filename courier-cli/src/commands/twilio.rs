//! Twilio command handlers

use anyhow::Result;
use clap::Subcommand;
use courier_client::TwilioClient;
use courier_core::domain::notify::Notification;
use courier_tasks::CancellationToken;
use courier_tasks::twilio::NotifyTask;
use std::sync::Arc;

use super::run_task;
use crate::config::Config;

/// Twilio subcommands
#[derive(Subcommand, Debug)]
pub enum TwilioCommands {
    /// Send a notification through a Notify service
    Notify {
        #[arg(long, env = "TWILIO_ACCOUNT_SID")]
        account_sid: String,

        #[arg(long, env = "TWILIO_AUTH_TOKEN", hide_env_values = true)]
        auth_token: String,

        /// Notify service URL, e.g. https://notify.twilio.com/v1/Services/<SID>/Notifications
        #[arg(long, env = "TWILIO_NOTIFY_URL")]
        url: String,

        /// Identity of the user to notify
        #[arg(long)]
        identity: Option<String>,

        /// Tag of the bindings to notify
        #[arg(long)]
        tag: Option<String>,

        #[arg(long)]
        title: Option<String>,

        /// Message body
        #[arg(long)]
        body: String,
    },
}

/// Handle Twilio commands
pub async fn handle_twilio_command(
    command: TwilioCommands,
    config: &Config,
    cancel: CancellationToken,
) -> Result<()> {
    match command {
        TwilioCommands::Notify {
            account_sid,
            auth_token,
            url,
            identity,
            tag,
            title,
            body,
        } => {
            let client = TwilioClient::with_client(account_sid, auth_token, config.http.clone());
            let notification = Notification {
                identity,
                tag,
                title,
                body,
            };
            run_task(NotifyTask::new(Arc::new(client), url, notification), cancel).await
        }
    }
}
