//! Segment command handlers

use anyhow::Result;
use clap::{Args, Subcommand};
use courier_client::SegmentClient;
use courier_tasks::CancellationToken;
use courier_tasks::config::{SegmentConfig, parse_duration};
use courier_tasks::poll::PollConfig;
use courier_tasks::segment::{StatusTask, SyncParams, SyncTask};
use std::sync::Arc;
use std::time::Duration;

use super::run_task;
use crate::config::Config;

/// Segment API connection flags
#[derive(Args, Debug)]
pub struct SegmentArgs {
    /// Segment API token
    #[arg(long, env = "SEGMENT_TOKEN", hide_env_values = true)]
    token: String,

    /// Segment API base URL
    #[arg(long, env = "SEGMENT_API_URL", default_value = SegmentClient::DEFAULT_BASE_URL)]
    api_url: String,
}

/// Segment subcommands
#[derive(Subcommand, Debug)]
pub enum SegmentCommands {
    /// Trigger a Reverse ETL sync
    Sync {
        #[command(flatten)]
        connection: SegmentArgs,

        /// Warehouse source ID
        #[arg(long)]
        source_id: String,

        /// Reverse ETL model ID
        #[arg(long)]
        model_id: String,

        /// Subscription (mapping) ID
        #[arg(long)]
        subscription_id: String,

        /// Wait for the sync to finish
        #[arg(long)]
        wait: bool,

        /// Delay between status requests while waiting
        #[arg(long, default_value = "5s", value_parser = parse_duration)]
        poll_interval: Duration,

        /// Give up waiting after this long
        #[arg(long, default_value = "1h", value_parser = parse_duration)]
        max_wait: Duration,

        /// Fail when the sync finishes without succeeding
        #[arg(long)]
        fail_on_failure: bool,
    },
    /// Show the status of a Reverse ETL sync
    Status {
        #[command(flatten)]
        connection: SegmentArgs,

        /// Reverse ETL model ID
        #[arg(long)]
        model_id: String,

        /// Sync ID
        #[arg(long)]
        sync_id: String,
    },
}

/// Handle Segment commands
pub async fn handle_segment_command(
    command: SegmentCommands,
    config: &Config,
    cancel: CancellationToken,
) -> Result<()> {
    match command {
        SegmentCommands::Sync {
            connection,
            source_id,
            model_id,
            subscription_id,
            wait,
            poll_interval,
            max_wait,
            fail_on_failure,
        } => {
            let client = segment_client(connection, config)?;

            let task = SyncTask::new(
                Arc::new(client),
                SyncParams {
                    source_id,
                    model_id,
                    subscription_id,
                    wait,
                    poll: PollConfig {
                        interval: poll_interval,
                        max_wait,
                        fail_on_failure,
                    },
                },
            );
            run_task(task, cancel).await
        }
        SegmentCommands::Status {
            connection,
            model_id,
            sync_id,
        } => {
            let client = segment_client(connection, config)?;
            run_task(StatusTask::new(Arc::new(client), model_id, sync_id), cancel).await
        }
    }
}

/// Builds the client; poll settings are checked by the task itself
fn segment_client(connection: SegmentArgs, config: &Config) -> Result<SegmentClient> {
    let segment = SegmentConfig::new(connection.token).with_base_url(connection.api_url);
    segment.validate()?;

    Ok(segment.client(config.http.clone()))
}
